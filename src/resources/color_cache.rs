//! Write-once cache of texture-sampled blood colors.

use std::collections::HashMap;

use bevy::prelude::{AssetId, Image, Resource};

use crate::color::BloodColor;

/// Result of the one-time texture readability probe.
///
/// Once a texture format turns out to be unreadable, sampling is never
/// attempted again for the rest of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureProbe {
    #[default]
    Unprobed,
    Readable,
    Unreadable,
}

/// Process-wide cache of sampled blood colors, keyed by texture asset id.
///
/// Entries are write-once: textures are assumed static for the process
/// lifetime, so nothing is ever invalidated or evicted.
#[derive(Resource, Default, Debug)]
pub struct EntityColorCache {
    colors: HashMap<AssetId<Image>, BloodColor>,
    probe: TextureProbe,
}

impl EntityColorCache {
    pub fn get(&self, texture_id: AssetId<Image>) -> Option<BloodColor> {
        self.colors.get(&texture_id).copied()
    }

    /// Inserts a sampled color unless one is already cached for this texture.
    pub fn insert(&mut self, texture_id: AssetId<Image>, color: BloodColor) {
        self.colors.entry(texture_id).or_insert(color);
    }

    pub fn probe(&self) -> TextureProbe {
        self.probe
    }

    pub fn set_probe(&mut self, probe: TextureProbe) {
        self.probe = probe;
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    #[test]
    fn test_entries_are_write_once() {
        let mut cache = EntityColorCache::default();
        let id = AssetId::<Image>::default();

        cache.insert(id, color::CREEPER_GREEN);
        cache.insert(id, color::RED);

        assert_eq!(cache.get(id), Some(color::CREEPER_GREEN));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_probe_starts_unprobed() {
        let cache = EntityColorCache::default();
        assert_eq!(cache.probe(), TextureProbe::Unprobed);
        assert!(cache.is_empty());
    }
}
