//! Events flowing through the blood effects layer.
//!
//! [`BloodDamageEvent`] and [`BloodDeathEvent`] are internal signals derived
//! from host health changes; [`BloodSoundEvent`] is the outbound sink the
//! host's audio subsystem consumes.

use bevy::prelude::{Entity, Event, Reflect, Vec3};

use crate::audio::{BloodSoundId, SoundCategory};

/// An entity took damage; one of these starts a hit burst.
#[derive(Event, Reflect, Clone, Copy, Debug)]
pub struct BloodDamageEvent {
    pub entity: Entity,
    /// Health lost, already deduplicated by the cooldown window.
    pub damage: f32,
}

/// An entity died; triggers the one-shot death burst.
#[derive(Event, Reflect, Clone, Copy, Debug)]
pub struct BloodDeathEvent {
    pub entity: Entity,
}

/// Request for one positional sound, consumed by the host's audio subsystem.
#[derive(Event, Reflect, Clone, Copy, Debug)]
pub struct BloodSoundEvent {
    pub sound: BloodSoundId,
    pub category: SoundCategory,
    pub volume: f32,
    pub pitch: f32,
    pub position: Vec3,
}
