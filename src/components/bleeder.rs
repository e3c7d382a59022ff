//! Host-attached descriptor components for entities that can bleed.
//!
//! The host game attaches these to its living entities; the blood systems
//! only read them (plus `GlobalTransform` for position). [`BleedTracker`] is
//! the one component this crate inserts itself, to watch for health drops.

use bevy::prelude::{Component, Handle, Image, Reflect, ReflectComponent};

/// Descriptor for a living entity that participates in blood effects.
///
/// `kind` is the entity-type identifier used for color resolution and the
/// per-kind config overrides (e.g. `"zombie"`, `"creeper"`). `width` and
/// `height` describe the entity's bounding box around its feet position.
#[derive(Component, Reflect, Clone, Debug)]
#[reflect(Component)]
pub struct Bleeder {
    pub kind: String,
    pub width: f32,
    pub height: f32,
}

impl Default for Bleeder {
    fn default() -> Self {
        Self {
            kind: String::new(),
            width: 0.6,
            height: 1.8,
        }
    }
}

impl Bleeder {
    pub fn new(kind: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            kind: kind.into(),
            width,
            height,
        }
    }
}

/// Current and maximum health, mirrored from the host's own health model.
#[derive(Component, Reflect, Clone, Copy, Debug, Default)]
#[reflect(Component)]
pub struct Health {
    pub hp: f32,
    pub max_hp: f32,
}

impl Health {
    pub fn new(hp: f32, max_hp: f32) -> Self {
        Self { hp, max_hp }
    }

    /// Health ratio in `[0, 1]`, or `None` when max health is not positive.
    pub fn ratio(&self) -> Option<f32> {
        (self.max_hp > 0.0).then(|| (self.hp / self.max_hp).clamp(0.0, 1.0))
    }
}

/// Marker the host inserts when an entity dies.
#[derive(Component, Reflect, Clone, Copy, Debug, Default)]
#[reflect(Component)]
pub struct Dead;

/// Marker the host maintains while an entity is submerged in or touching
/// liquid. Suppresses hit/death sounds and the death burst.
#[derive(Component, Reflect, Clone, Copy, Debug, Default)]
#[reflect(Component)]
pub struct Submerged;

/// Marker for player-controlled entities, gated by the `player_bleed` config.
#[derive(Component, Reflect, Clone, Copy, Debug, Default)]
#[reflect(Component)]
pub struct PlayerCharacter;

/// Age-like tick counter, used for oxidation staging of copper constructs.
#[derive(Component, Reflect, Clone, Copy, Debug, Default)]
#[reflect(Component)]
pub struct EntityAge(pub u32);

/// The entity's primary texture, for kinds whose blood color is sampled from
/// their rendered texture.
#[derive(Component, Clone, Debug)]
pub struct PrimaryTexture(pub Handle<Image>);

/// Per-entity damage bookkeeping, inserted automatically by the damage
/// detection system and removed when the entity dies.
#[derive(Component, Clone, Debug)]
pub struct BleedTracker {
    /// Health value seen last frame; a decrease means damage was taken.
    pub last_health: f32,
    /// Wall-clock timestamp (seconds) of the last accepted damage event,
    /// used for the duplicate-suppression cooldown.
    pub last_damage_at: Option<f64>,
}

impl BleedTracker {
    pub fn new(current_health: f32) -> Self {
        Self {
            last_health: current_health,
            last_damage_at: None,
        }
    }
}
