//! Enemy path model: preset path shapes evaluated against the viewport.
//!
//! One path is generated per wave and shared by every enemy in it.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rampart_core::constants::{CASTLE_EXIT_INSET, SPAWN_OFFSCREEN};
use rampart_core::types::{Viewport, Waypoint};

/// Ordered waypoints. The first is the off-screen spawn point, the last is
/// the castle-adjacent exit. Always at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
}

impl Path {
    /// Build a path from raw waypoints. Returns `None` for fewer than two points.
    pub fn from_waypoints(waypoints: Vec<Waypoint>) -> Option<Self> {
        if waypoints.len() < 2 {
            return None;
        }
        Some(Self { waypoints })
    }

    /// The straight preset, used before the first wave picks a shape.
    pub fn straight(viewport: Viewport) -> Self {
        Self {
            waypoints: straight(viewport),
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Waypoint> {
        self.waypoints.get(index).copied()
    }

    pub fn spawn(&self) -> Waypoint {
        self.waypoints[0]
    }

    pub fn exit(&self) -> Waypoint {
        self.waypoints[self.waypoints.len() - 1]
    }
}

/// A preset shape, evaluated against the current viewport.
pub type PathPreset = fn(Viewport) -> Vec<Waypoint>;

/// The fixed catalogue of path shapes.
pub const PRESETS: [PathPreset; 4] = [straight, zigzag, s_curve, hook];

/// Pick a preset uniformly at random and evaluate it.
pub fn generate(viewport: Viewport, rng: &mut ChaCha8Rng) -> Path {
    let preset = PRESETS[rng.gen_range(0..PRESETS.len())];
    Path {
        waypoints: preset(viewport),
    }
}

fn spawn_at(vp: Viewport, y_frac: f32) -> Waypoint {
    Vec2::new(-SPAWN_OFFSCREEN, vp.height * y_frac)
}

fn exit_of(vp: Viewport) -> Waypoint {
    Vec2::new(vp.width - CASTLE_EXIT_INSET, vp.height * 0.5)
}

fn at(vp: Viewport, x_frac: f32, y_frac: f32) -> Waypoint {
    Vec2::new(vp.width * x_frac, vp.height * y_frac)
}

/// Straight run across the middle.
pub fn straight(vp: Viewport) -> Vec<Waypoint> {
    vec![spawn_at(vp, 0.5), exit_of(vp)]
}

/// Three switchbacks between the top and bottom bands.
pub fn zigzag(vp: Viewport) -> Vec<Waypoint> {
    vec![
        spawn_at(vp, 0.2),
        at(vp, 0.25, 0.2),
        at(vp, 0.25, 0.8),
        at(vp, 0.5, 0.8),
        at(vp, 0.5, 0.2),
        at(vp, 0.75, 0.2),
        at(vp, 0.75, 0.5),
        exit_of(vp),
    ]
}

/// Enters low, climbs, then drops back to the castle line.
pub fn s_curve(vp: Viewport) -> Vec<Waypoint> {
    vec![
        spawn_at(vp, 0.8),
        at(vp, 0.3, 0.8),
        at(vp, 0.3, 0.3),
        at(vp, 0.65, 0.3),
        at(vp, 0.65, 0.5),
        exit_of(vp),
    ]
}

/// Runs along the top edge, down the right side, and hooks back in.
pub fn hook(vp: Viewport) -> Vec<Waypoint> {
    vec![
        spawn_at(vp, 0.1),
        at(vp, 0.8, 0.1),
        at(vp, 0.8, 0.9),
        at(vp, 0.4, 0.9),
        at(vp, 0.4, 0.5),
        exit_of(vp),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_every_preset_starts_offscreen_and_ends_at_castle() {
        let vp = Viewport::new(1024.0, 768.0);
        for preset in PRESETS {
            let points = preset(vp);
            assert!(points.len() >= 2);
            assert!(points[0].x < 0.0, "spawn must be off-view");
            assert_eq!(*points.last().unwrap(), exit_of(vp));
        }
    }

    #[test]
    fn test_presets_scale_with_viewport() {
        let large_vp = Viewport::new(800.0, 600.0);
        let small = zigzag(Viewport::new(400.0, 300.0));
        let large = zigzag(large_vp);
        let interior = small.len() - 1;
        for (a, b) in small.iter().zip(large.iter()).take(interior).skip(1) {
            assert!((b.x - a.x * 2.0).abs() < 1e-3);
            assert!((b.y - a.y * 2.0).abs() < 1e-3);
        }
        // The exit keeps a fixed inset from the right edge.
        assert_eq!(large[interior], exit_of(large_vp));
        assert_eq!(large[interior].x, 800.0 - CASTLE_EXIT_INSET);
    }

    #[test]
    fn test_generate_covers_catalogue() {
        let vp = Viewport::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut lengths: Vec<usize> = (0..64).map(|_| generate(vp, &mut rng).len()).collect();
        lengths.sort_unstable();
        lengths.dedup();
        // straight = 2, s_curve/hook = 6, zigzag = 8
        assert_eq!(lengths, vec![2, 6, 8]);
    }

    #[test]
    fn test_from_waypoints_rejects_short_paths() {
        assert!(Path::from_waypoints(vec![Vec2::ZERO]).is_none());
        let path = Path::from_waypoints(vec![Vec2::ZERO, Vec2::new(3.0, 4.0)]).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.spawn(), Vec2::ZERO);
        assert_eq!(path.exit(), Vec2::new(3.0, 4.0));
    }
}
