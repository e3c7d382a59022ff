//! Low-health trickle: badly wounded entities irregularly drip blood.
//!
//! Runs once per fixed tick per bleeding entity strictly below the
//! configured health-ratio threshold. A per-tick probability roll (more
//! frequent in the lower sub-tier) keeps the trickle irregular and
//! attention-grabbing instead of a constant stream. Kinds without a
//! circulatory system never drip passively.

use bevy::prelude::{
    App, Assets, Commands, EventWriter, FixedUpdate, GlobalTransform, Has, Image, Plugin, Query,
    Res, ResMut, Vec3, Without,
};
use rand::Rng;

use crate::{
    audio::{queue_drip_sound, SoundCategory},
    color::resolve_blood_color,
    components::{
        spawn_blood_particle, Bleeder, BloodParticleKind, BloodParticleParams, Dead, EntityAge,
        Health, PlayerCharacter, PrimaryTexture, Submerged,
    },
    events::BloodSoundEvent,
    resources::{BloodVfxConfig, EntityColorCache, SimulationPaused},
};

/// Wounded-ness tier of an entity relative to the configured threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DripTier {
    /// Below the threshold: 1-in-10 roll, 2 drips.
    Low,
    /// Below half the threshold: 1-in-6 roll, 3 drips.
    VeryLow,
    /// Below 30% of the threshold: as VeryLow plus 1-2 splashes.
    Critical,
}

impl DripTier {
    /// Classifies a health ratio against the threshold.
    ///
    /// Strict "below threshold" semantics: a ratio exactly equal to the
    /// threshold is not eligible.
    pub fn classify(health_ratio: f32, threshold: f32) -> Option<DripTier> {
        if health_ratio >= threshold {
            None
        } else if health_ratio < threshold * 0.3 {
            Some(DripTier::Critical)
        } else if health_ratio < threshold * 0.5 {
            Some(DripTier::VeryLow)
        } else {
            Some(DripTier::Low)
        }
    }

    /// One-in-N odds of dripping this tick.
    pub fn roll_odds(self) -> u32 {
        match self {
            DripTier::Low => 10,
            DripTier::VeryLow | DripTier::Critical => 6,
        }
    }

    pub fn drip_count(self) -> u32 {
        match self {
            DripTier::Low => 2,
            DripTier::VeryLow | DripTier::Critical => 3,
        }
    }
}

pub fn low_health_drip_system(
    mut commands: Commands,
    query: Query<
        (
            &Bleeder,
            &Health,
            &GlobalTransform,
            Has<Submerged>,
            Has<PlayerCharacter>,
            Option<&PrimaryTexture>,
            Option<&EntityAge>,
        ),
        Without<Dead>,
    >,
    images: Res<Assets<Image>>,
    config: Res<BloodVfxConfig>,
    paused: Res<SimulationPaused>,
    mut color_cache: ResMut<EntityColorCache>,
    mut sound_events: EventWriter<BloodSoundEvent>,
) {
    if paused.0 || !config.mod_enabled || !config.low_health_drip {
        return;
    }

    let mut rng = rand::thread_rng();
    let threshold = config.low_health_threshold_fraction();
    let size_multiplier = config.particle_size_multiplier();

    for (bleeder, health, transform, submerged, is_player, texture, age) in query.iter() {
        if is_player && !config.player_bleed {
            continue;
        }
        if !config.drips_at_low_health(&bleeder.kind) {
            continue;
        }
        if submerged {
            continue;
        }
        let Some(ratio) = health.ratio() else {
            continue;
        };
        let Some(tier) = DripTier::classify(ratio, threshold) else {
            continue;
        };

        if rng.gen_range(0..tier.roll_odds()) != 0 {
            continue;
        }

        let feet = transform.translation();
        let origin = feet + Vec3::Y * bleeder.height * 0.6;

        // Occasional drip sound, independent of the particle roll outcome
        if rng.gen_range(0..5) == 0 {
            let category = if is_player {
                SoundCategory::PlayerCombat
            } else {
                SoundCategory::OtherCombat
            };
            queue_drip_sound(&mut sound_events, &config, &mut rng, 0.3, category, origin);
        }

        let color = resolve_blood_color(
            &bleeder.kind,
            texture,
            age,
            &images,
            &mut color_cache,
            &mut rng,
        );
        let drip_params = BloodParticleParams {
            kind: BloodParticleKind::Drip,
            color,
            size_multiplier,
            can_become_fog: config.becomes_fog_underwater(&bleeder.kind),
            melts_in_liquid: config.melts_in_liquid(&bleeder.kind),
        };

        for _ in 0..tier.drip_count() {
            let offset = Vec3::new(
                (rng.gen::<f32>() - 0.5) * bleeder.width * 0.8,
                (rng.gen::<f32>() - 0.5) * 0.2,
                (rng.gen::<f32>() - 0.5) * bleeder.width * 0.8,
            );
            let velocity = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 0.1,
                -1.5 - rng.gen::<f32>() * 0.5,
                (rng.gen::<f32>() - 0.5) * 0.1,
            );
            spawn_blood_particle(&mut commands, origin + offset, velocity, &drip_params, &mut rng);
        }

        if tier == DripTier::Critical {
            let splash_params = BloodParticleParams {
                kind: BloodParticleKind::Splash,
                ..drip_params
            };
            let splash_count = rng.gen_range(1..=2);
            for _ in 0..splash_count {
                let offset = Vec3::new(
                    (rng.gen::<f32>() - 0.5) * bleeder.width * 0.6,
                    -0.1,
                    (rng.gen::<f32>() - 0.5) * bleeder.width * 0.6,
                );
                let velocity = Vec3::new(
                    (rng.gen::<f32>() - 0.5) * 0.15,
                    -1.2 - rng.gen::<f32>() * 0.4,
                    (rng.gen::<f32>() - 0.5) * 0.15,
                );
                spawn_blood_particle(
                    &mut commands,
                    origin + offset,
                    velocity,
                    &splash_params,
                    &mut rng,
                );
            }
        }
    }
}

/// Plugin that registers the low-health drip system.
pub struct LowHealthDripPlugin;

impl Plugin for LowHealthDripPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, low_health_drip_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_equal_to_threshold_is_not_eligible() {
        assert_eq!(DripTier::classify(0.5, 0.5), None);
        assert_eq!(DripTier::classify(0.51, 0.5), None);
    }

    #[test]
    fn test_ratio_just_below_threshold_is_eligible() {
        assert_eq!(DripTier::classify(0.49, 0.5), Some(DripTier::Low));
    }

    #[test]
    fn test_tier_breakpoints() {
        // threshold 0.5: VeryLow below 0.25, Critical below 0.15
        assert_eq!(DripTier::classify(0.30, 0.5), Some(DripTier::Low));
        assert_eq!(DripTier::classify(0.20, 0.5), Some(DripTier::VeryLow));
        assert_eq!(DripTier::classify(0.10, 0.5), Some(DripTier::Critical));
        assert_eq!(DripTier::classify(0.0, 0.5), Some(DripTier::Critical));
    }

    #[test]
    fn test_tier_parameters() {
        assert_eq!(DripTier::Low.roll_odds(), 10);
        assert_eq!(DripTier::VeryLow.roll_odds(), 6);
        assert_eq!(DripTier::Low.drip_count(), 2);
        assert_eq!(DripTier::Critical.drip_count(), 3);
    }
}
