//! Cosmetic blood particle effects for Bevy games.
//!
//! This crate layers blood visuals on top of a host game's combat state:
//! - Hit bursts of drip and splash particles, spread over several ticks
//! - Large one-shot bursts when an entity dies
//! - Irregular trickles from entities at critically low health
//! - Per-kind blood colors, including texture-sampled and age-staged ones
//!
//! The host attaches [`Bleeder`](components::Bleeder) and
//! [`Health`](components::Health) to its entities, keeps
//! [`WorldEnvironment`](resources::WorldEnvironment) in sync with its world
//! model, and plays the queued [`BloodSoundEvent`](events::BloodSoundEvent)s
//! with its own audio backend. Everything else is driven from health changes
//! observed here.
//!
//! # Usage
//!
//! Add the plugin to your Bevy app:
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_blood_vfx::BloodVfxPlugin;
//!
//! App::new()
//!     .add_plugins(BloodVfxPlugin)
//!     .run();
//! ```
//!
//! # Configuration
//!
//! The plugin uses the [`BloodVfxConfig`](resources::BloodVfxConfig)
//! resource. Insert it before adding the plugin to customize behavior:
//!
//! ```ignore
//! app.insert_resource(BloodVfxConfig {
//!     death_burst: false,
//!     ..Default::default()
//! })
//! .add_plugins(BloodVfxPlugin);
//! ```

#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

use bevy::prelude::{App, Plugin};

pub mod audio;
pub mod color;
pub mod components;
pub mod events;
pub mod resources;
pub mod systems;

use crate::{
    events::{BloodDamageEvent, BloodDeathEvent, BloodSoundEvent},
    resources::{
        ActiveBursts, BloodVfxConfig, EntityColorCache, SimulationPaused, WorldEnvironment,
    },
    systems::{
        DamageDetectPlugin, DeathBurstPlugin, HitBurstPlugin, LowHealthDripPlugin,
        ParticleUpdatePlugin,
    },
};

/// Plugin that registers all blood effect systems, resources and events.
pub struct BloodVfxPlugin;

impl Plugin for BloodVfxPlugin {
    fn build(&self, app: &mut App) {
        // Register the config resource with defaults, unless the host
        // inserted its own beforehand
        app.init_resource::<BloodVfxConfig>();
        app.init_resource::<WorldEnvironment>();
        app.init_resource::<SimulationPaused>();
        app.init_resource::<EntityColorCache>();
        app.init_resource::<ActiveBursts>();

        app.add_event::<BloodDamageEvent>();
        app.add_event::<BloodDeathEvent>();
        app.add_event::<BloodSoundEvent>();

        app.register_type::<components::Bleeder>();
        app.register_type::<components::Health>();
        app.register_type::<components::Dead>();
        app.register_type::<components::Submerged>();
        app.register_type::<components::PlayerCharacter>();
        app.register_type::<components::EntityAge>();
        app.register_type::<components::BloodParticle>();
        app.register_type::<resources::BloodVfxConfig>();

        // Add the sub-plugins
        app.add_plugins((
            DamageDetectPlugin,
            HitBurstPlugin,
            DeathBurstPlugin,
            LowHealthDripPlugin,
            ParticleUpdatePlugin,
        ));

        log::info!("Blood vfx plugin initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_builds() {
        let mut app = App::new();
        app.add_plugins(bevy::time::TimePlugin);
        app.add_plugins(BloodVfxPlugin);
        assert!(app.world().contains_resource::<BloodVfxConfig>());
        assert!(app.world().contains_resource::<ActiveBursts>());
    }
}
