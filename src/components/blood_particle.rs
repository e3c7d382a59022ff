//! The simulated blood particle and its spawn parameters.

use bevy::prelude::{Commands, Component, Name, Reflect, Transform, Vec3};
use rand::Rng;

use crate::color::BloodColor;

/// Particle sub-kind, distinguished by the velocity distribution it is
/// spawned with (mostly-downward drips vs. radial splashes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum BloodParticleKind {
    Drip,
    Splash,
}

/// Physical mode of a particle.
///
/// Particles start `Falling`, settle on ground contact, and may transform
/// into a `Fog` cloud on liquid contact when eligible.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub enum ParticleMode {
    Falling { settled: bool },
    Fog,
}

/// One simulated blood particle.
///
/// Spawned with an explicit initial state via [`BloodParticleParams`] and
/// mutated once per fixed tick by the particle update system. Position lives
/// in the entity's `Transform`; everything else lives here. `alpha` and
/// `color` are read by whatever renderer the host attaches.
#[derive(Component, Reflect, Clone, Debug)]
pub struct BloodParticle {
    pub kind: BloodParticleKind,
    /// World units per tick.
    pub velocity: Vec3,
    pub age: u32,
    pub max_age: u32,
    pub scale: f32,
    /// Scale the particle grows toward after settling or fog transition.
    pub target_scale: f32,
    /// Color captured at spawn, kept for the fog desaturation blend.
    pub base_color: BloodColor,
    pub color: BloodColor,
    pub alpha: f32,
    pub mode: ParticleMode,
    /// Whether liquid contact turns this particle into a fog cloud.
    pub can_become_fog: bool,
    /// Whether liquid contact destroys this particle outright (snow/ice
    /// debris melting). Takes precedence over `can_become_fog`.
    pub melts_in_liquid: bool,
}

// Lifetime in ticks, jittered so a burst doesn't vanish in one frame
const BASE_LIFE: u32 = 40;
const LIFE_JITTER: u32 = 10;

// Base scale range before the config multiplier
const MIN_SCALE: f32 = 0.08;
const MAX_SCALE: f32 = 0.16;

/// Everything needed to construct a particle, captured per effect and passed
/// straight into the constructor at spawn time.
#[derive(Clone, Copy, Debug)]
pub struct BloodParticleParams {
    pub kind: BloodParticleKind,
    pub color: BloodColor,
    pub size_multiplier: f32,
    pub can_become_fog: bool,
    pub melts_in_liquid: bool,
}

impl BloodParticle {
    pub fn new(velocity: Vec3, params: &BloodParticleParams, rng: &mut impl Rng) -> Self {
        let max_age = BASE_LIFE + rng.gen_range(0..=LIFE_JITTER * 2) - LIFE_JITTER;
        let scale = rng.gen_range(MIN_SCALE..MAX_SCALE) * params.size_multiplier;

        Self {
            kind: params.kind,
            velocity,
            age: 0,
            max_age,
            scale,
            target_scale: scale,
            base_color: params.color,
            color: params.color,
            alpha: 1.0,
            mode: ParticleMode::Falling { settled: false },
            can_become_fog: params.can_become_fog,
            melts_in_liquid: params.melts_in_liquid,
        }
    }

    /// Fraction of lifetime remaining, in `[0, 1]`.
    pub fn life_fraction(&self) -> f32 {
        if self.max_age == 0 {
            return 0.0;
        }
        (1.0 - self.age as f32 / self.max_age as f32).clamp(0.0, 1.0)
    }
}

/// Spawns one blood particle entity at `position` with the given initial
/// velocity.
pub fn spawn_blood_particle(
    commands: &mut Commands,
    position: Vec3,
    velocity: Vec3,
    params: &BloodParticleParams,
    rng: &mut impl Rng,
) {
    let particle = BloodParticle::new(velocity, params, rng);
    let scale = particle.scale;
    commands.spawn((
        Name::new("BloodParticle"),
        particle,
        Transform::from_translation(position).with_scale(Vec3::splat(scale)),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    fn params() -> BloodParticleParams {
        BloodParticleParams {
            kind: BloodParticleKind::Drip,
            color: color::RED,
            size_multiplier: 2.1,
            can_become_fog: true,
            melts_in_liquid: false,
        }
    }

    #[test]
    fn test_new_particle_initial_state() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let particle = BloodParticle::new(Vec3::new(0.0, -1.2, 0.0), &params(), &mut rng);
            assert_eq!(particle.age, 0);
            assert!((30..=50).contains(&particle.max_age));
            assert!(particle.scale >= MIN_SCALE * 2.1);
            assert!(particle.scale <= MAX_SCALE * 2.1);
            assert_eq!(particle.scale, particle.target_scale);
            assert_eq!(particle.alpha, 1.0);
            assert_eq!(particle.mode, ParticleMode::Falling { settled: false });
        }
    }

    #[test]
    fn test_life_fraction_bounds() {
        let mut rng = rand::thread_rng();
        let mut particle = BloodParticle::new(Vec3::ZERO, &params(), &mut rng);
        assert_eq!(particle.life_fraction(), 1.0);
        particle.age = particle.max_age;
        assert_eq!(particle.life_fraction(), 0.0);
        particle.age = particle.max_age + 5;
        assert_eq!(particle.life_fraction(), 0.0);
    }
}
