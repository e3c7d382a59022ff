//! Components for the blood effects layer.

pub mod bleeder;
pub mod blood_particle;

pub use bleeder::{
    Bleeder, BleedTracker, Dead, EntityAge, Health, PlayerCharacter, PrimaryTexture, Submerged,
};
pub use blood_particle::{
    spawn_blood_particle, BloodParticle, BloodParticleKind, BloodParticleParams, ParticleMode,
};
