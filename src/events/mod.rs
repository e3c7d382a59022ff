//! Events for the blood effects layer.

pub mod blood_events;

pub use blood_events::{BloodDamageEvent, BloodDeathEvent, BloodSoundEvent};
