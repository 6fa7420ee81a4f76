//! Cosmetic state for the renderer: floating text, death particles, screen shake.
//! Nothing in the simulation reads it back.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rampart_core::constants::*;
use rampart_core::state::{FloatingTextView, ParticleView};

#[derive(Debug, Clone)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub life_ms: f32,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life_ms: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Effects {
    texts: Vec<FloatingText>,
    particles: Vec<Particle>,
    shake: f32,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>) {
        self.texts.push(FloatingText {
            pos,
            text: text.into(),
            life_ms: FLOATING_TEXT_LIFE_MS,
        });
    }

    /// Damage number over an enemy.
    pub fn damage_number(&mut self, pos: Vec2, damage: f32, is_crit: bool) {
        let amount = damage.round() as i64;
        let text = if is_crit {
            format!("CRIT {amount}")
        } else {
            format!("-{amount}")
        };
        self.text(pos, text);
    }

    /// Scatter a particle burst around `pos`.
    pub fn burst(&mut self, pos: Vec2, rng: &mut ChaCha8Rng) {
        for _ in 0..PARTICLES_PER_DEATH {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = PARTICLE_SPEED * rng.gen_range(0.5..1.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                life_ms: PARTICLE_LIFE_MS,
            });
        }
    }

    pub fn shake(&mut self) {
        self.shake += SHAKE_PER_HIT;
    }

    pub fn shake_magnitude(&self) -> f32 {
        self.shake
    }

    /// Age texts and particles, dropping the expired ones.
    pub fn update(&mut self, dt: f32) {
        let dt_ms = dt * 1000.0;
        for t in &mut self.texts {
            t.life_ms -= dt_ms;
            t.pos.y -= FLOATING_TEXT_RISE * dt;
        }
        self.texts.retain(|t| t.life_ms > 0.0);

        for p in &mut self.particles {
            p.life_ms -= dt_ms;
            p.pos += p.vel * dt;
        }
        self.particles.retain(|p| p.life_ms > 0.0);
    }

    pub fn decay_shake(&mut self, dt: f32) {
        self.shake = (self.shake - SHAKE_DECAY_PER_SEC * dt).max(0.0);
    }

    pub fn clear(&mut self) {
        self.texts.clear();
        self.particles.clear();
        self.shake = 0.0;
    }

    pub fn text_views(&self) -> Vec<FloatingTextView> {
        self.texts
            .iter()
            .map(|t| FloatingTextView {
                position: t.pos,
                text: t.text.clone(),
                alpha: t.life_ms / FLOATING_TEXT_LIFE_MS,
            })
            .collect()
    }

    pub fn particle_views(&self) -> Vec<ParticleView> {
        self.particles
            .iter()
            .map(|p| ParticleView {
                position: p.pos,
                alpha: p.life_ms / PARTICLE_LIFE_MS,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_text_rises_and_expires() {
        let mut fx = Effects::new();
        fx.damage_number(Vec2::new(10.0, 100.0), 12.4, false);
        fx.update(0.1);
        let views = fx.text_views();
        assert_eq!(views[0].text, "-12");
        assert!((views[0].position.y - 97.0).abs() < 1e-4);
        for _ in 0..7 {
            fx.update(0.1);
        }
        assert!(fx.text_views().is_empty());
    }

    #[test]
    fn test_crit_label() {
        let mut fx = Effects::new();
        fx.damage_number(Vec2::ZERO, 25.0, true);
        assert_eq!(fx.text_views()[0].text, "CRIT 25");
    }

    #[test]
    fn test_burst_spawns_particles_that_fade() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut fx = Effects::new();
        fx.burst(Vec2::ZERO, &mut rng);
        assert_eq!(fx.particle_views().len(), PARTICLES_PER_DEATH);
        fx.update(0.25);
        assert!(fx.particle_views().iter().all(|p| (p.alpha - 0.5).abs() < 1e-4));
        fx.update(0.25);
        assert!(fx.particle_views().is_empty());
    }

    #[test]
    fn test_shake_decays_to_zero() {
        let mut fx = Effects::new();
        fx.shake();
        fx.shake();
        assert_eq!(fx.shake_magnitude(), 16.0);
        fx.decay_shake(0.1);
        assert!((fx.shake_magnitude() - 12.0).abs() < 1e-4);
        fx.decay_shake(1.0);
        assert_eq!(fx.shake_magnitude(), 0.0);
    }
}
