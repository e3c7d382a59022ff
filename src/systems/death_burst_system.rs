//! One-shot death burst: a large radial spray at the moment an entity dies.
//!
//! Counts scale linearly with the entity's width so a large beast bleeds
//! proportionally more than a small one. Fully submerged entities produce
//! nothing at all; their blood disperses invisibly.

use std::f32::consts::TAU;

use bevy::prelude::{
    App, Assets, Commands, EventReader, EventWriter, GlobalTransform, Has, Image, Plugin, Query,
    Res, ResMut, Update, Vec3,
};
use rand::Rng;

use crate::{
    audio::{queue_drip_sound, SoundCategory},
    color::resolve_blood_color,
    components::{
        spawn_blood_particle, Bleeder, BloodParticleKind, BloodParticleParams, EntityAge,
        PlayerCharacter, PrimaryTexture, Submerged,
    },
    events::{BloodDeathEvent, BloodSoundEvent},
    resources::{BloodVfxConfig, EntityColorCache},
};

// Particle counts per unit of entity width
const DRIPS_PER_WIDTH: f32 = 30.0;
const SPLASHES_PER_WIDTH: f32 = 25.0;

/// Spawns the death burst for each death event.
pub fn death_burst_system(
    mut commands: Commands,
    mut death_events: EventReader<BloodDeathEvent>,
    query: Query<(
        &Bleeder,
        &GlobalTransform,
        Has<Submerged>,
        Has<PlayerCharacter>,
        Option<&PrimaryTexture>,
        Option<&EntityAge>,
    )>,
    images: Res<Assets<Image>>,
    config: Res<BloodVfxConfig>,
    mut color_cache: ResMut<EntityColorCache>,
    mut sound_events: EventWriter<BloodSoundEvent>,
) {
    if !config.mod_enabled || !config.death_burst {
        death_events.clear();
        return;
    }

    let mut rng = rand::thread_rng();
    let size_multiplier = config.particle_size_multiplier();

    for event in death_events.read() {
        let Ok((bleeder, transform, submerged, is_player, texture, age)) = query.get(event.entity)
        else {
            continue;
        };
        if is_player && !config.player_bleed {
            continue;
        }
        if !config.entity_bleeds(&bleeder.kind) {
            continue;
        }
        if submerged {
            // No particles and no sound
            continue;
        }

        let feet = transform.translation();
        let center = feet + Vec3::Y * bleeder.height * 0.5;
        let size_factor = bleeder.width;

        let category = if is_player {
            SoundCategory::PlayerCombat
        } else {
            SoundCategory::OtherCombat
        };
        queue_drip_sound(&mut sound_events, &config, &mut rng, size_factor, category, center);

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
        let splash_params = BloodParticleParams {
            kind: BloodParticleKind::Splash,
            ..drip_params
        };

        // Drips: spread across the full bounding volume, falling fast
        let drip_count = (DRIPS_PER_WIDTH * size_factor) as u32;
        for _ in 0..drip_count {
            let offset = Vec3::new(
                (rng.gen::<f32>() - 0.5) * bleeder.width * 1.8,
                rng.gen::<f32>() * bleeder.height * 0.8,
                (rng.gen::<f32>() - 0.5) * bleeder.width * 1.8,
            );
            let velocity = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 0.4,
                -0.5 - rng.gen::<f32>() * 1.5,
                (rng.gen::<f32>() - 0.5) * 0.4,
            );
            spawn_blood_particle(&mut commands, center + offset, velocity, &drip_params, &mut rng);
        }

        // Splashes: radial burst outward from the vertical center
        let splash_count = (SPLASHES_PER_WIDTH * size_factor) as u32;
        for _ in 0..splash_count {
            let angle = rng.gen::<f32>() * TAU;
            let radius = 0.2 + rng.gen::<f32>() * bleeder.width * 1.2;
            let offset = Vec3::new(
                angle.cos() * radius,
                (rng.gen::<f32>() - 0.3) * bleeder.height * 0.6,
                angle.sin() * radius,
            );

            // Velocity points outward in the same direction as the offset
            let speed = 0.3 + rng.gen::<f32>() * 0.4;
            let velocity = Vec3::new(
                angle.cos() * speed,
                -0.2 - rng.gen::<f32>() * 0.6,
                angle.sin() * speed,
            );
            spawn_blood_particle(
                &mut commands,
                center + offset,
                velocity,
                &splash_params,
                &mut rng,
            );
        }

        log::debug!(
            "death burst for {} ({drip_count} drips, {splash_count} splashes)",
            bleeder.kind
        );
    }
}

/// Plugin that registers the death burst system.
pub struct DeathBurstPlugin;

impl Plugin for DeathBurstPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, death_burst_system);
    }
}

#[cfg(test)]
mod tests {
    use bevy::{
        ecs::system::RunSystemOnce,
        prelude::{Entity, Events, Transform, World},
    };

    use super::*;
    use crate::components::BloodParticle;

    fn death_world() -> World {
        let mut world = World::new();
        world.init_resource::<BloodVfxConfig>();
        world.init_resource::<EntityColorCache>();
        world.init_resource::<Assets<Image>>();
        world.init_resource::<Events<BloodDeathEvent>>();
        world.init_resource::<Events<BloodSoundEvent>>();
        world
    }

    fn spawn_dead_bleeder(world: &mut World, width: f32) -> Entity {
        world
            .spawn((
                Bleeder::new("cow", width, 1.4),
                Transform::from_xyz(0.0, 0.0, 0.0),
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 0.0)),
            ))
            .id()
    }

    fn particle_count(world: &mut World) -> usize {
        world.query::<&BloodParticle>().iter(world).count()
    }

    #[test]
    fn test_counts_scale_with_width() {
        let mut world = death_world();
        let entity = spawn_dead_bleeder(&mut world, 0.9);
        world
            .resource_mut::<Events<BloodDeathEvent>>()
            .send(BloodDeathEvent { entity });

        let _ = world.run_system_once(death_burst_system);

        // 30 * 0.9 = 27 drips, 25 * 0.9 = 22 splashes
        assert_eq!(particle_count(&mut world), 27 + 22);
        assert!(!world.resource::<Events<BloodSoundEvent>>().is_empty());
    }

    #[test]
    fn test_submerged_death_produces_nothing() {
        let mut world = death_world();
        let entity = spawn_dead_bleeder(&mut world, 0.9);
        world.entity_mut(entity).insert(Submerged);
        world
            .resource_mut::<Events<BloodDeathEvent>>()
            .send(BloodDeathEvent { entity });

        let _ = world.run_system_once(death_burst_system);

        assert_eq!(particle_count(&mut world), 0);
        assert!(world.resource::<Events<BloodSoundEvent>>().is_empty());
    }

    #[test]
    fn test_disabled_death_burst_produces_nothing() {
        let mut world = death_world();
        let entity = spawn_dead_bleeder(&mut world, 0.9);
        world.resource_mut::<BloodVfxConfig>().death_burst = false;
        world
            .resource_mut::<Events<BloodDeathEvent>>()
            .send(BloodDeathEvent { entity });

        let _ = world.run_system_once(death_burst_system);
        assert_eq!(particle_count(&mut world), 0);
    }
}
