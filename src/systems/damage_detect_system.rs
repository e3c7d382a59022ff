//! Derives damage and death signals from host health changes.
//!
//! The host only mirrors health into the [`Health`] component; this module
//! turns decreases into [`BloodDamageEvent`]s, with a short wall-clock
//! cooldown so rapid server updates don't spam bursts, and turns `Dead`
//! insertions into [`BloodDeathEvent`]s plus bookkeeping cleanup.

use bevy::prelude::{
    Added, App, Commands, Entity, EventWriter, IntoScheduleConfigs, Plugin, Query, Real, Res,
    ResMut, Time, Update, With, Without,
};

use crate::{
    components::{Bleeder, BleedTracker, Dead, Health},
    events::{BloodDamageEvent, BloodDeathEvent},
    resources::{ActiveBursts, SimulationPaused},
};

/// Damage deltas within this window are treated as duplicates of the same
/// blow. Wall-clock rather than tick-based so it stays robust to variable
/// tick rate.
pub const DAMAGE_COOLDOWN_SECS: f64 = 0.1;

/// Watches health decreases on bleeders and emits damage events.
///
/// The first frame an entity is seen only seeds its [`BleedTracker`]; from
/// then on any drop in health is a damage delta.
pub fn damage_detect_system(
    mut commands: Commands,
    mut query: Query<(Entity, &Health, Option<&mut BleedTracker>), (With<Bleeder>, Without<Dead>)>,
    time: Res<Time<Real>>,
    paused: Res<SimulationPaused>,
    mut damage_events: EventWriter<BloodDamageEvent>,
) {
    if paused.0 {
        return;
    }

    let now = time.elapsed_secs_f64();

    for (entity, health, tracker) in query.iter_mut() {
        let Some(mut tracker) = tracker else {
            commands.entity(entity).insert(BleedTracker::new(health.hp));
            continue;
        };

        if health.hp >= tracker.last_health {
            // Healed or unchanged
            tracker.last_health = health.hp;
            continue;
        }

        let damage = tracker.last_health - health.hp;
        tracker.last_health = health.hp;

        if tracker
            .last_damage_at
            .is_some_and(|last| now - last < DAMAGE_COOLDOWN_SECS)
        {
            continue;
        }
        tracker.last_damage_at = Some(now);

        log::debug!("entity {entity} took {damage} damage");
        damage_events.write(BloodDamageEvent { entity, damage });
    }
}

/// Emits death events and cleans up per-entity bookkeeping.
///
/// Trackers are removed and in-flight bursts dropped the frame an entity is
/// marked dead, keeping both tables bounded.
pub fn death_detect_system(
    mut commands: Commands,
    query: Query<Entity, (Added<Dead>, With<Bleeder>)>,
    mut bursts: ResMut<ActiveBursts>,
    mut death_events: EventWriter<BloodDeathEvent>,
) {
    for entity in query.iter() {
        commands.entity(entity).remove::<BleedTracker>();
        bursts.remove_entity(entity);
        death_events.write(BloodDeathEvent { entity });
    }
}

/// Plugin that registers the damage/death signal derivation systems.
pub struct DamageDetectPlugin;

impl Plugin for DamageDetectPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (damage_detect_system, death_detect_system).chain());
    }
}
