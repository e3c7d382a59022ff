//! Configuration resource for the blood effects layer.
//!
//! All configuration is read-only input from the host's own settings store;
//! this crate only provides the resource type and sensible defaults. The
//! serde derives let the host round-trip it through its config files.

use std::collections::HashMap;

use bevy::prelude::{Reflect, ReflectResource, Resource};
use serde::{Deserialize, Serialize};

/// Entity kinds without a circulatory system: skeletal, construct,
/// gelatinous, elemental, spectral and boss-undead types. They may bleed
/// (debris, dust) on hit or death, but never drip passively at low health.
const NON_CIRCULATORY_KINDS: &[&str] = &[
    // Skeletal
    "skeleton",
    "wither_skeleton",
    "stray",
    "bogged",
    "skeleton_horse",
    "parched",
    // Constructs
    "iron_golem",
    "snow_golem",
    "copper_golem",
    "creaking",
    // Gelatinous
    "slime",
    "magma_cube",
    // Elementals
    "blaze",
    "breeze",
    // Spectral
    "vex",
    "allay",
    "ghast",
    "phantom",
    // Boss undead and End creatures
    "wither",
    "warden",
    "ender_dragon",
    "enderman",
    "endermite",
    "shulker",
];

/// Entity kinds that do not bleed at all unless the host overrides them.
const DEFAULT_NO_BLEED_KINDS: &[&str] = &[
    "skeleton",
    "wither_skeleton",
    "stray",
    "bogged",
    "skeleton_horse",
    "zombie_horse",
    "phantom",
    "wither",
    "ender_dragon",
    "enderman",
    "endermite",
    "shulker",
    "warden",
    "slime",
    "magma_cube",
    "blaze",
    "breeze",
    "ghast",
    "vex",
    "allay",
    "iron_golem",
    "snow_golem",
    "silverfish",
];

/// Global configuration for blood effects.
///
/// Insert a customized instance before adding [`BloodVfxPlugin`]
/// (crate::BloodVfxPlugin) to override the defaults.
#[derive(Resource, Reflect, Clone, Debug, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct BloodVfxConfig {
    /// Master switch; when false nothing spawns at all.
    pub mod_enabled: bool,
    /// Whether player-controlled entities bleed.
    pub player_bleed: bool,
    /// Whether damage events produce time-spread hit bursts.
    pub hit_burst: bool,
    /// Whether deaths produce the one-shot radial burst.
    pub death_burst: bool,
    /// Whether badly wounded entities trickle blood every so often.
    pub low_health_drip: bool,
    /// Whether blood sound events are emitted at all.
    pub sound_enabled: bool,
    /// Health percentage (5-100) below which the low-health drip starts.
    pub low_health_threshold: u32,
    /// Particle size percentage (50-300) applied to every spawned particle.
    pub particle_size: u32,
    /// Per-kind bleed overrides. Kinds not present bleed by default.
    pub entity_overrides: HashMap<String, bool>,
}

impl Default for BloodVfxConfig {
    fn default() -> Self {
        Self {
            mod_enabled: true,
            player_bleed: true,
            hit_burst: true,
            death_burst: true,
            low_health_drip: true,
            sound_enabled: true,
            low_health_threshold: 50,
            particle_size: 210,
            entity_overrides: DEFAULT_NO_BLEED_KINDS
                .iter()
                .map(|kind| (kind.to_string(), false))
                .collect(),
        }
    }
}

impl BloodVfxConfig {
    /// The low-health threshold as a `[0, 1]` health ratio.
    pub fn low_health_threshold_fraction(&self) -> f32 {
        self.low_health_threshold as f32 / 100.0
    }

    /// The particle size multiplier as a plain factor.
    pub fn particle_size_multiplier(&self) -> f32 {
        self.particle_size as f32 / 100.0
    }

    /// Whether this entity kind produces blood at all.
    ///
    /// Unknown kinds bleed by default so modded entities work unconfigured.
    pub fn entity_bleeds(&self, kind: &str) -> bool {
        self.entity_overrides.get(kind).copied().unwrap_or(true)
    }

    /// Whether this entity kind drips passively at low health.
    ///
    /// Kinds without a circulatory system are excluded even when they bleed
    /// on hit or death.
    pub fn drips_at_low_health(&self, kind: &str) -> bool {
        self.entity_bleeds(kind) && !NON_CIRCULATORY_KINDS.contains(&kind)
    }

    /// Whether this kind's particles become fog clouds underwater.
    ///
    /// Follows the circulatory-system distinction: debris emitters (bone
    /// dust, construct fragments) sink instead of clouding.
    pub fn becomes_fog_underwater(&self, kind: &str) -> bool {
        !NON_CIRCULATORY_KINDS.contains(&kind)
    }

    /// Whether this kind's particles melt away on liquid contact.
    pub fn melts_in_liquid(&self, kind: &str) -> bool {
        kind == "snow_golem"
    }
}

/// Host-set pause signal. While set, bursts hold their remaining ticks and
/// particles freeze in place, resuming exactly where they left off.
#[derive(Resource, Reflect, Clone, Copy, Debug, Default)]
#[reflect(Resource)]
pub struct SimulationPaused(pub bool);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_bleeds_by_default() {
        let config = BloodVfxConfig::default();
        assert!(config.entity_bleeds("cow"));
        assert!(config.entity_bleeds("some_modded_entity"));
    }

    #[test]
    fn test_default_no_bleed_kinds() {
        let config = BloodVfxConfig::default();
        assert!(!config.entity_bleeds("skeleton"));
        assert!(!config.entity_bleeds("iron_golem"));
        assert!(config.entity_bleeds("zombie"));
    }

    #[test]
    fn test_override_wins() {
        let mut config = BloodVfxConfig::default();
        config.entity_overrides.insert("skeleton".into(), true);
        config.entity_overrides.insert("cow".into(), false);
        assert!(config.entity_bleeds("skeleton"));
        assert!(!config.entity_bleeds("cow"));
    }

    #[test]
    fn test_non_circulatory_kinds_never_drip_passively() {
        let mut config = BloodVfxConfig::default();
        // Even when overridden to bleed, a skeleton has nothing to drip
        config.entity_overrides.insert("skeleton".into(), true);
        assert!(!config.drips_at_low_health("skeleton"));
        assert!(!config.drips_at_low_health("iron_golem"));
        assert!(config.drips_at_low_health("zombie"));
        assert!(config.drips_at_low_health("cow"));
    }

    #[test]
    fn test_percent_accessors() {
        let config = BloodVfxConfig::default();
        assert!((config.low_health_threshold_fraction() - 0.5).abs() < f32::EPSILON);
        assert!((config.particle_size_multiplier() - 2.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snow_golem_particles_melt() {
        let config = BloodVfxConfig::default();
        assert!(config.melts_in_liquid("snow_golem"));
        assert!(!config.melts_in_liquid("zombie"));
    }
}
