//! World queries the particle simulation needs from the host.
//!
//! The host keeps this resource in sync with its own world model. The
//! particle systems only ever ask two questions: "is this point inside
//! liquid?" and "how high is the ground here?".

use bevy::prelude::{Resource, Vec3};

/// An axis-aligned box of liquid in world space.
#[derive(Clone, Copy, Debug)]
pub struct LiquidVolume {
    pub min: Vec3,
    pub max: Vec3,
}

impl LiquidVolume {
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// Host-populated environment lookups.
#[derive(Resource, Clone, Debug)]
pub struct WorldEnvironment {
    /// Global ground plane height particles settle on.
    pub ground_height: f32,
    /// Optional global water surface; everything below it counts as liquid.
    pub water_level: Option<f32>,
    /// Additional liquid regions (pools, lakes) on top of the water plane.
    pub liquid_volumes: Vec<LiquidVolume>,
}

impl Default for WorldEnvironment {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            water_level: None,
            liquid_volumes: Vec::new(),
        }
    }
}

impl WorldEnvironment {
    /// Whether `point` lies inside a liquid cell.
    ///
    /// Sampled once per tick at the particle's current position; a particle
    /// moving more than one cell per tick can skip a liquid transition,
    /// which is an accepted approximation.
    pub fn is_liquid_at(&self, point: Vec3) -> bool {
        if self.water_level.is_some_and(|level| point.y <= level) {
            return true;
        }
        self.liquid_volumes
            .iter()
            .any(|volume| volume.contains(point))
    }

    /// Ground height below `point`.
    pub fn ground_height_at(&self, _point: Vec3) -> f32 {
        self.ground_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_plane() {
        let environment = WorldEnvironment {
            water_level: Some(2.0),
            ..Default::default()
        };
        assert!(environment.is_liquid_at(Vec3::new(10.0, 1.5, -3.0)));
        assert!(!environment.is_liquid_at(Vec3::new(10.0, 2.5, -3.0)));
    }

    #[test]
    fn test_liquid_volume() {
        let environment = WorldEnvironment {
            liquid_volumes: vec![LiquidVolume {
                min: Vec3::new(-1.0, 0.0, -1.0),
                max: Vec3::new(1.0, 2.0, 1.0),
            }],
            ..Default::default()
        };
        assert!(environment.is_liquid_at(Vec3::new(0.5, 1.0, 0.0)));
        assert!(!environment.is_liquid_at(Vec3::new(1.5, 1.0, 0.0)));
    }

    #[test]
    fn test_dry_by_default() {
        let environment = WorldEnvironment::default();
        assert!(!environment.is_liquid_at(Vec3::new(0.0, -100.0, 0.0)));
    }
}
