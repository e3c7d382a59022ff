//! In-progress hit burst effects.
//!
//! A damage event converts into one [`BurstTask`] that spreads its particles
//! over several ticks so a blow reads as proportional rather than as one
//! simultaneous cloud. The tick system owns the list and prunes tasks the
//! first tick they report completion.

use bevy::prelude::{Entity, Resource};

use crate::color::BloodColor;

/// Burst duration range in ticks: weak hit to strong hit.
pub const MIN_BURST_TICKS: u32 = 3;
pub const MAX_BURST_TICKS: u32 = 16;
/// Damage value that maps to the maximum duration; higher damage is clamped.
pub const DAMAGE_CAP: f32 = 20.0;

/// Computes the burst duration in ticks for a damage value.
///
/// Damage below 3.0 uses a separate very-short ramp so a one-point graze
/// reads as near-instant, while stronger hits interpolate linearly up to the
/// cap and visibly spread over most of a second.
pub fn burst_duration_ticks(damage: f32) -> u32 {
    if damage < 3.0 {
        MIN_BURST_TICKS + (damage.max(0.0) * 0.5) as u32
    } else {
        let t = (damage / DAMAGE_CAP).min(1.0);
        MIN_BURST_TICKS + ((MAX_BURST_TICKS - MIN_BURST_TICKS) as f32 * t) as u32
    }
}

/// Total drip particles a burst of this damage emits over its lifetime.
pub fn burst_total_drips(damage: f32) -> u32 {
    ((1.0 + damage * 1.2) as u32).min(15)
}

/// Total splash particles a burst of this damage emits over its lifetime.
pub fn burst_total_splashes(damage: f32) -> u32 {
    ((1.0 + damage * 1.8) as u32).min(23)
}

/// One in-progress hit effect, ticked until its duration is exhausted or its
/// entity dies or despawns.
#[derive(Clone, Debug)]
pub struct BurstTask {
    /// The bleeding entity; its bounding box is re-read every tick so the
    /// particles follow knockback.
    pub entity: Entity,
    pub damage: f32,
    /// Color resolved once at creation and frozen for the task's lifetime.
    pub color: BloodColor,
    pub duration_ticks: u32,
    pub ticks_remaining: u32,
    /// One-shot flag for the positional hit sound.
    pub sound_played: bool,
    pub can_become_fog: bool,
    pub melts_in_liquid: bool,
}

impl BurstTask {
    pub fn new(
        entity: Entity,
        damage: f32,
        color: BloodColor,
        can_become_fog: bool,
        melts_in_liquid: bool,
    ) -> Self {
        let duration_ticks = burst_duration_ticks(damage);
        Self {
            entity,
            damage,
            color,
            duration_ticks,
            ticks_remaining: duration_ticks,
            sound_played: false,
            can_become_fog,
            melts_in_liquid,
        }
    }

    /// Drips to emit this tick; short bursts still front-load at least one.
    pub fn drips_per_tick(&self) -> u32 {
        (burst_total_drips(self.damage) / self.duration_ticks).max(1)
    }

    /// Splashes to emit this tick.
    pub fn splashes_per_tick(&self) -> u32 {
        (burst_total_splashes(self.damage) / self.duration_ticks).max(1)
    }

    /// Horizontal spread factor for this burst's particle velocities.
    pub fn spread_factor(&self) -> f32 {
        (self.damage / 10.0).min(2.0)
    }
}

/// The list of in-progress bursts, owned and pruned by the burst tick system.
#[derive(Resource, Default, Debug)]
pub struct ActiveBursts(pub Vec<BurstTask>);

impl ActiveBursts {
    /// Drops every burst belonging to `entity` (called on death/removal).
    pub fn remove_entity(&mut self, entity: Entity) {
        self.0.retain(|task| task.entity != entity);
    }
}
