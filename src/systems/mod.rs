//! Systems driving the blood effects layer.
//!
//! Detection runs in `Update` off the host's wall clock; everything that
//! spawns or moves particles runs in `FixedUpdate` so the effect speed is
//! independent of frame rate.

pub mod damage_detect_system;
pub mod death_burst_system;
pub mod hit_burst_system;
pub mod low_health_drip_system;
pub mod particle_update_system;

pub use damage_detect_system::{damage_detect_system, death_detect_system, DamageDetectPlugin};
pub use death_burst_system::{death_burst_system, DeathBurstPlugin};
pub use hit_burst_system::{hit_burst_tick_system, hit_burst_trigger_system, HitBurstPlugin};
pub use low_health_drip_system::{low_health_drip_system, DripTier, LowHealthDripPlugin};
pub use particle_update_system::{
    particle_update_system, step_particle, ParticleStep, ParticleUpdatePlugin,
};
