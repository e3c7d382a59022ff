//! Per-tick blood particle simulation.
//!
//! Advances every live particle once per fixed tick: falling particles
//! integrate gravity and drag, settle into splats on ground contact, and
//! transform into drifting fog clouds on liquid contact when eligible. The
//! pure stepping function is separated from the ECS system so the state
//! machine is testable without a world.

use bevy::prelude::{App, Commands, Entity, FixedUpdate, Plugin, Query, Res, Transform, Vec3};
use rand::Rng;

use crate::{
    components::{BloodParticle, ParticleMode},
    resources::{BloodVfxConfig, SimulationPaused, WorldEnvironment},
};

// Falling phase
const GRAVITY: f32 = 0.04;
const AIR_DRAG: f32 = 0.98;
const SUBMERGED_DRAG: f32 = 0.70;
// Settled splats swell toward their target by 15% of the gap per tick
const SETTLE_GROWTH_RATE: f32 = 0.15;
const SETTLE_SCALE_MIN: f32 = 1.0;
const SETTLE_SCALE_MAX: f32 = 1.2;
// Particles turn transparent over the last quarter of their life
const FADE_WINDOW: f32 = 0.25;

// Fog phase
const FOG_BASE_LIFE: u32 = 60;
const FOG_LIFE_JITTER: u32 = 10;
const FOG_DRAG: f32 = 0.92;
const FOG_SINK: f32 = 0.002;
const FOG_JITTER: f32 = 0.0005;
const FOG_ALPHA: f32 = 0.5;
const FOG_FADE_MAX: f32 = 0.6;
const FOG_GROWTH_RATE: f32 = 0.01;
const FOG_SCALE_MIN: f32 = 1.2;
const FOG_SCALE_MAX: f32 = 2.4;
// Fog color is a washed-out blend of the spawn color
const FOG_COLOR_KEEP: f32 = 0.6;
const FOG_COLOR_LIFT: f32 = 0.16;

/// Outcome of stepping a particle by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleStep {
    Alive,
    Despawn,
}

/// Advances one particle by one fixed tick, mutating it and its position.
pub fn step_particle(
    particle: &mut BloodParticle,
    position: &mut Vec3,
    env: &WorldEnvironment,
    size_multiplier: f32,
    rng: &mut impl Rng,
) -> ParticleStep {
    particle.age += 1;
    if particle.age > particle.max_age {
        return ParticleStep::Despawn;
    }

    match particle.mode {
        ParticleMode::Falling { settled } => {
            let in_liquid = env.is_liquid_at(*position);
            if in_liquid {
                if particle.melts_in_liquid {
                    return ParticleStep::Despawn;
                }
                if particle.can_become_fog {
                    become_fog(particle, size_multiplier, rng);
                    return ParticleStep::Alive;
                }
                // Ineligible particles keep falling under gravity, the heavy
                // drag below reads as debris sinking slowly
            }

            if !settled {
                *position += particle.velocity;
                particle.velocity.y -= GRAVITY;
                particle.velocity *= if in_liquid { SUBMERGED_DRAG } else { AIR_DRAG };

                let ground = env.ground_height_at(*position);
                if position.y <= ground {
                    position.y = ground;
                    particle.velocity = Vec3::ZERO;
                    particle.mode = ParticleMode::Falling { settled: true };
                    particle.target_scale =
                        particle.scale * rng.gen_range(SETTLE_SCALE_MIN..SETTLE_SCALE_MAX);
                }
            } else {
                particle.scale += (particle.target_scale - particle.scale) * SETTLE_GROWTH_RATE;
            }

            let life = particle.life_fraction();
            particle.alpha = if life < FADE_WINDOW {
                life / FADE_WINDOW
            } else {
                1.0
            };
        }
        ParticleMode::Fog => {
            particle.velocity *= FOG_DRAG;
            particle.velocity.y -= FOG_SINK;
            particle.velocity.x += (rng.gen::<f32>() * 2.0 - 1.0) * FOG_JITTER;
            particle.velocity.z += (rng.gen::<f32>() * 2.0 - 1.0) * FOG_JITTER;
            *position += particle.velocity;

            particle.alpha = FOG_FADE_MAX * particle.life_fraction();
            particle.scale += (particle.target_scale - particle.scale) * FOG_GROWTH_RATE;
        }
    }

    ParticleStep::Alive
}

/// Transforms a falling particle into a fog cloud on liquid contact.
fn become_fog(particle: &mut BloodParticle, size_multiplier: f32, rng: &mut impl Rng) {
    particle.mode = ParticleMode::Fog;
    particle.age = 0;
    particle.max_age = FOG_BASE_LIFE + rng.gen_range(0..=FOG_LIFE_JITTER * 2) - FOG_LIFE_JITTER;

    particle.color.red = particle.base_color.red * FOG_COLOR_KEEP + FOG_COLOR_LIFT;
    particle.color.green = particle.base_color.green * FOG_COLOR_KEEP + FOG_COLOR_LIFT;
    particle.color.blue = particle.base_color.blue * FOG_COLOR_KEEP + FOG_COLOR_LIFT;

    particle.velocity *= 0.1;
    particle.alpha = FOG_ALPHA;
    particle.target_scale = rng.gen_range(FOG_SCALE_MIN..FOG_SCALE_MAX) * size_multiplier;
}

pub fn particle_update_system(
    mut commands: Commands,
    mut particles: Query<(Entity, &mut BloodParticle, &mut Transform)>,
    env: Res<WorldEnvironment>,
    config: Res<BloodVfxConfig>,
    paused: Res<SimulationPaused>,
) {
    if paused.0 {
        return;
    }

    let mut rng = rand::thread_rng();
    let size_multiplier = config.particle_size_multiplier();

    for (entity, mut particle, mut transform) in particles.iter_mut() {
        let mut position = transform.translation;
        let step = step_particle(&mut particle, &mut position, &env, size_multiplier, &mut rng);

        match step {
            ParticleStep::Despawn => {
                commands.entity(entity).despawn();
            }
            ParticleStep::Alive => {
                transform.translation = position;
                transform.scale = Vec3::splat(particle.scale);
            }
        }
    }
}

/// Plugin that registers the particle simulation on the fixed schedule.
pub struct ParticleUpdatePlugin;

impl Plugin for ParticleUpdatePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, particle_update_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::components::{BloodParticleKind, BloodParticleParams};

    fn particle(can_become_fog: bool, melts_in_liquid: bool) -> BloodParticle {
        let params = BloodParticleParams {
            kind: BloodParticleKind::Drip,
            color: color::RED,
            size_multiplier: 1.05,
            can_become_fog,
            melts_in_liquid,
        };
        BloodParticle::new(Vec3::new(0.0, -1.2, 0.0), &params, &mut rand::thread_rng())
    }

    fn dry_env() -> WorldEnvironment {
        WorldEnvironment {
            ground_height: -100.0,
            water_level: None,
            liquid_volumes: Vec::new(),
        }
    }

    fn flooded_env() -> WorldEnvironment {
        WorldEnvironment {
            ground_height: -100.0,
            water_level: Some(100.0),
            liquid_volumes: Vec::new(),
        }
    }

    #[test]
    fn test_falling_particle_integrates_gravity_and_drag() {
        let mut rng = rand::thread_rng();
        let mut p = particle(false, false);
        p.velocity = Vec3::new(0.1, -0.5, 0.0);
        let mut pos = Vec3::new(0.0, 5.0, 0.0);

        let step = step_particle(&mut p, &mut pos, &dry_env(), 1.0, &mut rng);
        assert_eq!(step, ParticleStep::Alive);
        assert_eq!(pos, Vec3::new(0.1, 4.5, 0.0));
        assert!(p.velocity.y < -0.5);
        assert!(p.velocity.x < 0.1);
    }

    #[test]
    fn test_particle_despawns_past_max_age() {
        let mut rng = rand::thread_rng();
        let mut p = particle(false, false);
        p.age = p.max_age;
        let mut pos = Vec3::new(0.0, 5.0, 0.0);

        let step = step_particle(&mut p, &mut pos, &dry_env(), 1.0, &mut rng);
        assert_eq!(step, ParticleStep::Despawn);
    }

    #[test]
    fn test_ground_contact_settles_into_splat() {
        let mut rng = rand::thread_rng();
        let mut p = particle(false, false);
        p.velocity = Vec3::new(0.0, -2.0, 0.0);
        let mut pos = Vec3::new(0.0, 1.0, 0.0);
        let env = WorldEnvironment {
            ground_height: 0.0,
            ..dry_env()
        };

        let step = step_particle(&mut p, &mut pos, &env, 1.0, &mut rng);
        assert_eq!(step, ParticleStep::Alive);
        assert_eq!(pos.y, 0.0);
        assert_eq!(p.velocity, Vec3::ZERO);
        assert_eq!(p.mode, ParticleMode::Falling { settled: true });
        assert!(p.target_scale >= p.scale);
        assert!(p.target_scale <= p.scale * SETTLE_SCALE_MAX);
    }

    #[test]
    fn test_settled_splat_grows_toward_target() {
        let mut rng = rand::thread_rng();
        let mut p = particle(false, false);
        p.mode = ParticleMode::Falling { settled: true };
        p.scale = 0.10;
        p.target_scale = 0.12;
        let mut pos = Vec3::ZERO;

        let before = p.scale;
        let _ = step_particle(&mut p, &mut pos, &dry_env(), 1.0, &mut rng);
        assert!(p.scale > before);
        assert!(p.scale <= p.target_scale);
        assert_eq!(pos, Vec3::ZERO);
    }

    #[test]
    fn test_fade_over_last_quarter_of_life() {
        let mut rng = rand::thread_rng();
        let mut p = particle(false, false);
        p.max_age = 40;
        p.mode = ParticleMode::Falling { settled: true };
        let mut pos = Vec3::ZERO;

        p.age = 19;
        let _ = step_particle(&mut p, &mut pos, &dry_env(), 1.0, &mut rng);
        assert_eq!(p.alpha, 1.0);

        p.age = 35;
        let _ = step_particle(&mut p, &mut pos, &dry_env(), 1.0, &mut rng);
        assert!(p.alpha < 1.0);
        assert!(p.alpha > 0.0);
    }

    #[test]
    fn test_liquid_contact_melts_eligible_particle() {
        let mut rng = rand::thread_rng();
        let mut p = particle(true, true);
        let mut pos = Vec3::new(0.0, 5.0, 0.0);

        let step = step_particle(&mut p, &mut pos, &flooded_env(), 1.0, &mut rng);
        assert_eq!(step, ParticleStep::Despawn);
    }

    #[test]
    fn test_liquid_contact_transforms_into_fog() {
        let mut rng = rand::thread_rng();
        let mut p = particle(true, false);
        p.age = 20;
        p.velocity = Vec3::new(0.0, -2.0, 0.0);
        let mut pos = Vec3::new(0.0, 5.0, 0.0);

        let step = step_particle(&mut p, &mut pos, &flooded_env(), 2.0, &mut rng);
        assert_eq!(step, ParticleStep::Alive);
        assert_eq!(p.mode, ParticleMode::Fog);
        assert_eq!(p.age, 0);
        assert!((50..=70).contains(&p.max_age));
        assert_eq!(p.alpha, FOG_ALPHA);
        assert_eq!(p.velocity, Vec3::new(0.0, -0.2, 0.0));
        assert!(p.target_scale >= FOG_SCALE_MIN * 2.0);
        assert!(p.target_scale <= FOG_SCALE_MAX * 2.0);
        let expected_red = color::RED.red * FOG_COLOR_KEEP + FOG_COLOR_LIFT;
        assert!((p.color.red - expected_red).abs() < 1e-6);
    }

    #[test]
    fn test_liquid_never_destroys_plain_particle() {
        let mut rng = rand::thread_rng();
        let mut p = particle(false, false);
        p.velocity = Vec3::new(0.0, -1.0, 0.0);
        let mut pos = Vec3::new(0.0, 50.0, 0.0);

        for _ in 0..p.max_age - 1 {
            let step = step_particle(&mut p, &mut pos, &flooded_env(), 1.0, &mut rng);
            assert_eq!(step, ParticleStep::Alive);
            assert_eq!(p.mode, ParticleMode::Falling { settled: false });
        }
        assert!(pos.y < 50.0);
    }

    #[test]
    fn test_submerged_debris_sinks_at_terminal_velocity() {
        let mut rng = rand::thread_rng();
        let mut p = particle(false, false);
        p.max_age = 200;
        p.velocity = Vec3::ZERO;
        let mut pos = Vec3::new(0.0, 100.0, 0.0);
        let env = flooded_env();

        for _ in 0..30 {
            let _ = step_particle(&mut p, &mut pos, &env, 1.0, &mut rng);
        }
        // Gravity against the heavy drag settles on a slow terminal
        // velocity of 0.04 * 0.7 / 0.3 per tick
        let y_after_warmup = pos.y;
        for _ in 0..30 {
            let _ = step_particle(&mut p, &mut pos, &env, 1.0, &mut rng);
        }
        let sunk = y_after_warmup - pos.y;
        assert!(sunk > 2.0, "sank only {sunk} units over 30 ticks");
        assert!(sunk < 4.0);
        assert_eq!(p.mode, ParticleMode::Falling { settled: false });
    }

    #[test]
    fn test_submerged_debris_settles_on_ground() {
        let mut rng = rand::thread_rng();
        let mut p = particle(false, false);
        p.max_age = 200;
        p.velocity = Vec3::new(0.0, -1.0, 0.0);
        let mut pos = Vec3::new(0.0, 3.0, 0.0);
        let env = WorldEnvironment {
            ground_height: 0.0,
            ..flooded_env()
        };

        for _ in 0..100 {
            let _ = step_particle(&mut p, &mut pos, &env, 1.0, &mut rng);
            if p.mode == (ParticleMode::Falling { settled: true }) {
                break;
            }
        }
        assert_eq!(p.mode, ParticleMode::Falling { settled: true });
        assert_eq!(pos.y, 0.0);
        assert_eq!(p.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_fog_drifts_sinks_and_grows() {
        let mut rng = rand::thread_rng();
        let mut p = particle(true, false);
        let mut pos = Vec3::new(0.0, 5.0, 0.0);
        let _ = step_particle(&mut p, &mut pos, &flooded_env(), 1.0, &mut rng);
        assert_eq!(p.mode, ParticleMode::Fog);

        let scale_before = p.scale;
        let y_before = pos.y;
        for _ in 0..10 {
            let step = step_particle(&mut p, &mut pos, &flooded_env(), 1.0, &mut rng);
            assert_eq!(step, ParticleStep::Alive);
            assert!(p.scale >= scale_before);
            // Fog fades against a 0.6 ceiling, not its 0.5 transition alpha
            assert!(p.alpha <= FOG_FADE_MAX);
            assert!((p.alpha - FOG_FADE_MAX * p.life_fraction()).abs() < 1e-6);
        }
        assert!(pos.y < y_before);
        assert!(p.scale > scale_before);
    }
}
