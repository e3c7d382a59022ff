//! Sound requests for blood effects.
//!
//! The crate owns no audio playback; it queues [`BloodSoundEvent`]s with
//! precomputed volume/pitch and the host plays them with whatever backend it
//! uses. All effects share the single drip sound, pitched per effect.

use bevy::prelude::{EventWriter, Reflect, Vec3};
use rand::Rng;

use crate::{events::BloodSoundEvent, resources::BloodVfxConfig};

/// Identifier of a blood sound asset on the host side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum BloodSoundId {
    /// Wet drip, used for hits, death bursts and low-health trickles.
    Drip,
}

/// Mixer category the host should route the sound through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum SoundCategory {
    PlayerCombat,
    OtherCombat,
}

/// Queues the one-shot hit sound for a burst, volume scaled by damage.
pub fn queue_hit_sound(
    sound_events: &mut EventWriter<BloodSoundEvent>,
    config: &BloodVfxConfig,
    rng: &mut impl Rng,
    damage: f32,
    category: SoundCategory,
    position: Vec3,
) {
    if !config.sound_enabled {
        return;
    }

    sound_events.write(BloodSoundEvent {
        sound: BloodSoundId::Drip,
        category,
        volume: (0.4 + damage * 0.02).min(1.0),
        pitch: 0.9 + rng.gen::<f32>() * 0.2,
        position,
    });
}

/// Queues a drip sound, volume scaled by entity size (death bursts pass the
/// entity width, low-health trickles a small constant).
pub fn queue_drip_sound(
    sound_events: &mut EventWriter<BloodSoundEvent>,
    config: &BloodVfxConfig,
    rng: &mut impl Rng,
    size_factor: f32,
    category: SoundCategory,
    position: Vec3,
) {
    if !config.sound_enabled {
        return;
    }

    sound_events.write(BloodSoundEvent {
        sound: BloodSoundId::Drip,
        category,
        volume: (0.3 + size_factor * 0.2).min(1.0),
        pitch: 0.8 + rng.gen::<f32>() * 0.3,
        position,
    });
}
