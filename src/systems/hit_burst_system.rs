//! Hit burst effect: converts one damage event into a time-spread emission
//! schedule.
//!
//! Each damage event becomes a [`BurstTask`] whose duration scales with the
//! damage dealt. The tick system re-reads the entity's bounding box every
//! tick so particles originate from wherever the entity currently is,
//! including knockback displacement, and stops immediately when the entity
//! dies or despawns.

use std::f32::consts::TAU;

use bevy::prelude::{
    App, Assets, Commands, EventReader, EventWriter, FixedUpdate, GlobalTransform, Has, Image,
    Plugin, Query, Res, ResMut, Update, Vec3, Without,
};
use rand::Rng;

use crate::{
    audio::{queue_hit_sound, SoundCategory},
    color::resolve_blood_color,
    components::{
        spawn_blood_particle, Bleeder, BloodParticleKind, BloodParticleParams, Dead, EntityAge,
        PlayerCharacter, PrimaryTexture, Submerged,
    },
    events::{BloodDamageEvent, BloodSoundEvent},
    resources::{ActiveBursts, BloodVfxConfig, BurstTask, EntityColorCache, SimulationPaused},
};

/// Creates a burst task per damage event, freezing the blood color at
/// creation time.
pub fn hit_burst_trigger_system(
    mut damage_events: EventReader<BloodDamageEvent>,
    query: Query<(&Bleeder, Option<&PrimaryTexture>, Option<&EntityAge>, Has<PlayerCharacter>)>,
    images: Res<Assets<Image>>,
    config: Res<BloodVfxConfig>,
    mut color_cache: ResMut<EntityColorCache>,
    mut bursts: ResMut<ActiveBursts>,
) {
    if !config.mod_enabled || !config.hit_burst {
        damage_events.clear();
        return;
    }

    let mut rng = rand::thread_rng();

    for event in damage_events.read() {
        let Ok((bleeder, texture, age, is_player)) = query.get(event.entity) else {
            continue;
        };
        if is_player && !config.player_bleed {
            continue;
        }
        if !config.entity_bleeds(&bleeder.kind) {
            continue;
        }

        // Captures texture/oxidation state once, not re-sampled per tick
        let color = resolve_blood_color(
            &bleeder.kind,
            texture,
            age,
            &images,
            &mut color_cache,
            &mut rng,
        );

        bursts.0.push(BurstTask::new(
            event.entity,
            event.damage,
            color,
            config.becomes_fog_underwater(&bleeder.kind),
            config.melts_in_liquid(&bleeder.kind),
        ));
    }
}

/// Ticks every active burst once per fixed tick and prunes finished ones.
pub fn hit_burst_tick_system(
    mut commands: Commands,
    mut bursts: ResMut<ActiveBursts>,
    query: Query<(&Bleeder, &GlobalTransform, Has<Submerged>, Has<PlayerCharacter>), Without<Dead>>,
    config: Res<BloodVfxConfig>,
    paused: Res<SimulationPaused>,
    mut sound_events: EventWriter<BloodSoundEvent>,
) {
    if paused.0 {
        // Hold every burst in place without emitting
        return;
    }

    let mut rng = rand::thread_rng();
    let size_multiplier = config.particle_size_multiplier();

    bursts.0.retain_mut(|task| {
        if task.ticks_remaining == 0 {
            return false;
        }

        // Entity dead or despawned: stop immediately, no further particles
        let Ok((bleeder, transform, submerged, is_player)) = query.get(task.entity) else {
            return false;
        };

        // Bounding box re-read every tick so the burst follows knockback
        let feet = transform.translation();
        let bb_min = Vec3::new(
            feet.x - bleeder.width * 0.5,
            feet.y,
            feet.z - bleeder.width * 0.5,
        );

        if !task.sound_played {
            if !submerged {
                let category = if is_player {
                    SoundCategory::PlayerCombat
                } else {
                    SoundCategory::OtherCombat
                };
                queue_hit_sound(&mut sound_events, &config, &mut rng, task.damage, category, feet);
            }
            task.sound_played = true;
        }

        let spread = task.spread_factor();
        let drip_params = BloodParticleParams {
            kind: BloodParticleKind::Drip,
            color: task.color,
            size_multiplier,
            can_become_fog: task.can_become_fog,
            melts_in_liquid: task.melts_in_liquid,
        };
        let splash_params = BloodParticleParams {
            kind: BloodParticleKind::Splash,
            ..drip_params
        };

        for _ in 0..task.drips_per_tick() {
            let position = bb_min
                + Vec3::new(
                    rng.gen::<f32>() * bleeder.width,
                    rng.gen::<f32>() * bleeder.height,
                    rng.gen::<f32>() * bleeder.width,
                );
            let velocity = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 0.2 * spread,
                -1.2 - rng.gen::<f32>() * 0.8 * spread,
                (rng.gen::<f32>() - 0.5) * 0.2 * spread,
            );
            spawn_blood_particle(&mut commands, position, velocity, &drip_params, &mut rng);
        }

        for _ in 0..task.splashes_per_tick() {
            let position = bb_min
                + Vec3::new(
                    rng.gen::<f32>() * bleeder.width,
                    rng.gen::<f32>() * bleeder.height,
                    rng.gen::<f32>() * bleeder.width,
                );
            let angle = rng.gen::<f32>() * TAU;
            let speed = (0.1 + rng.gen::<f32>() * 0.15) * spread;
            let velocity = Vec3::new(
                angle.cos() * speed * 0.5,
                (-0.8 - rng.gen::<f32>() * 0.6) * spread,
                angle.sin() * speed * 0.5,
            );
            spawn_blood_particle(&mut commands, position, velocity, &splash_params, &mut rng);
        }

        task.ticks_remaining -= 1;
        task.ticks_remaining > 0
    });
}

/// Plugin that registers the hit burst systems.
pub struct HitBurstPlugin;

impl Plugin for HitBurstPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, hit_burst_trigger_system)
            .add_systems(FixedUpdate, hit_burst_tick_system);
    }
}
