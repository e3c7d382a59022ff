//! Blood color resolution for entity kinds.
//!
//! Every entity kind maps to a biologically-inspired base color: vertebrates
//! bleed red, arthropods green, cephalopods blue (hemocyanin), nether-dwellers
//! orange, constructs gray, and so on. Two kinds need dynamic resolution
//! instead of a table lookup: creepers sample their actual texture (so the
//! blood matches resource packs), and copper golems derive their color from
//! their oxidation stage.

use std::collections::HashMap;

use bevy::{
    prelude::{Assets, Image, Reflect},
    render::render_resource::TextureFormat,
};
use lazy_static::lazy_static;
use rand::Rng;
use thiserror::Error;

use crate::{
    components::{EntityAge, PrimaryTexture},
    resources::{EntityColorCache, TextureProbe},
};

/// An immutable RGB triple, each channel in `[0.0, 1.0]`.
///
/// Resolved once per effect and copied into each particle at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct BloodColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl BloodColor {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Applies the ±10% per-channel variance pass.
    ///
    /// Each channel is independently scaled by a factor drawn uniformly from
    /// `[0.9, 1.1]` and clamped back into `[0, 1]`. Called once per effect so
    /// all particles of one burst share the same varied color.
    pub fn with_variance(self, rng: &mut impl Rng) -> Self {
        const VARIANCE: f32 = 0.10;
        let mut vary = |channel: f32| {
            let factor = 1.0 + (rng.gen::<f32>() * 2.0 - 1.0) * VARIANCE;
            (channel * factor).clamp(0.0, 1.0)
        };
        let red = vary(self.red);
        let green = vary(self.green);
        let blue = vary(self.blue);
        Self { red, green, blue }
    }
}

// Standard red blood for most mammals
pub const RED: BloodColor = BloodColor::new(0.40, 0.02, 0.02);
// Bright red for high-oxygen creatures (dolphins, axolotls)
pub const BRIGHT_RED: BloodColor = BloodColor::new(0.50, 0.03, 0.03);
// Coagulated dark red for zombies
pub const DARK_RED: BloodColor = BloodColor::new(0.35, 0.05, 0.05);
// Purple for End creatures
pub const PURPLE: BloodColor = BloodColor::new(0.45, 0.10, 0.45);
// Deep purple for the warden
pub const DEEP_PURPLE: BloodColor = BloodColor::new(0.20, 0.08, 0.30);
// Green for spiders
pub const GREEN: BloodColor = BloodColor::new(0.15, 0.45, 0.10);
// Bright green for slimes
pub const SLIME_GREEN: BloodColor = BloodColor::new(0.30, 0.70, 0.20);
// Hemocyanin blue for squids
pub const BLUE: BloodColor = BloodColor::new(0.10, 0.20, 0.50);
// Darker alien blue for guardians
pub const DEEP_BLUE: BloodColor = BloodColor::new(0.15, 0.25, 0.40);
// Orange for nether creatures
pub const ORANGE: BloodColor = BloodColor::new(0.60, 0.30, 0.05);
// Bright fire orange for blazes
pub const BRIGHT_ORANGE: BloodColor = BloodColor::new(0.90, 0.50, 0.10);
// Lava for magma cubes
pub const LAVA: BloodColor = BloodColor::new(0.80, 0.20, 0.05);
// Strider lava tone
pub const STRIDER_LAVA: BloodColor = BloodColor::new(0.70, 0.25, 0.10);
// Hemolymph yellow for bees
pub const YELLOW: BloodColor = BloodColor::new(0.70, 0.60, 0.10);
// Gray tones for constructs
pub const GRAY: BloodColor = BloodColor::new(0.40, 0.40, 0.40);
pub const LIGHT_GRAY: BloodColor = BloodColor::new(0.50, 0.50, 0.52);
// White/pale colors
pub const WHITE: BloodColor = BloodColor::new(0.85, 0.85, 0.85);
pub const ICY_WHITE: BloodColor = BloodColor::new(0.85, 0.90, 0.95);
// Cyan for the breeze
pub const CYAN: BloodColor = BloodColor::new(0.40, 0.70, 0.75);
// Night blue for phantoms
pub const NIGHT_BLUE: BloodColor = BloodColor::new(0.15, 0.20, 0.35);
// Potion green for witches
pub const POTION_GREEN: BloodColor = BloodColor::new(0.25, 0.35, 0.15);
// Pale blue for spirits (vex, allay)
pub const SPIRIT_BLUE: BloodColor = BloodColor::new(0.60, 0.70, 0.85);
// Fallback green when creeper texture sampling fails
pub const CREEPER_GREEN: BloodColor = BloodColor::new(0.12, 0.42, 0.08);
// Bone dust for skeletons
pub const BONE: BloodColor = BloodColor::new(0.75, 0.72, 0.65);
// Very dark for wither skeletons and the wither
pub const BLACK: BloodColor = BloodColor::new(0.08, 0.08, 0.08);
// Copper golem oxidation stages
pub const COPPER_FRESH: BloodColor = BloodColor::new(0.75, 0.38, 0.20);
pub const COPPER_EXPOSED: BloodColor = BloodColor::new(0.65, 0.42, 0.32);
pub const COPPER_WEATHERED: BloodColor = BloodColor::new(0.45, 0.50, 0.35);
pub const COPPER_OXIDIZED: BloodColor = BloodColor::new(0.30, 0.55, 0.40);
// Tree sap for the creaking
pub const WOOD_SAP: BloodColor = BloodColor::new(0.55, 0.35, 0.15);
// Mummified dust for the parched
pub const DRIED_DUST: BloodColor = BloodColor::new(0.60, 0.52, 0.40);
// Aggressive dark red for ravagers
pub const RAVAGER_RED: BloodColor = BloodColor::new(0.45, 0.08, 0.08);

/// How the base color for an entity kind is produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorSource {
    /// Fixed color straight from the table.
    Fixed(BloodColor),
    /// Sampled from the entity's primary texture, with a fixed fallback when
    /// sampling fails.
    TextureSampled { fallback: BloodColor },
    /// Derived from the entity's age counter via [`OxidationStage`].
    OxidationStaged,
}

lazy_static! {
    static ref COLOR_TABLE: HashMap<&'static str, ColorSource> = {
        let mut table = HashMap::new();
        let mut fixed = |kinds: &[&'static str], color: BloodColor| {
            for kind in kinds {
                table.insert(*kind, ColorSource::Fixed(color));
            }
        };

        // Skeletal undead emit bone dust rather than blood
        fixed(&["skeleton", "stray", "bogged", "skeleton_horse"], BONE);
        fixed(&["wither_skeleton", "wither"], BLACK);
        fixed(&["parched"], DRIED_DUST);

        // Zombies bleed coagulated dark red
        fixed(
            &[
                "zombie",
                "zombie_villager",
                "husk",
                "drowned",
                "zombie_horse",
                "zombified_piglin",
                "zoglin",
            ],
            DARK_RED,
        );

        // End creatures
        fixed(
            &["enderman", "endermite", "shulker", "ender_dragon"],
            PURPLE,
        );
        fixed(&["warden"], DEEP_PURPLE);

        // Arthropods and slimes
        fixed(&["spider", "cave_spider"], GREEN);
        fixed(&["slime"], SLIME_GREEN);
        fixed(&["bee"], YELLOW);
        fixed(&["silverfish"], LIGHT_GRAY);

        // Aquatic creatures
        fixed(&["squid", "glow_squid"], BLUE);
        fixed(&["guardian", "elder_guardian"], DEEP_BLUE);
        fixed(&["dolphin", "axolotl"], BRIGHT_RED);
        fixed(
            &["cod", "salmon", "tropical_fish", "pufferfish", "tadpole", "frog"],
            RED,
        );

        // Nether creatures
        fixed(&["blaze"], BRIGHT_ORANGE);
        fixed(&["magma_cube"], LAVA);
        fixed(&["hoglin", "piglin", "piglin_brute"], ORANGE);
        fixed(&["strider"], STRIDER_LAVA);
        fixed(&["ghast", "happy_ghast"], WHITE);

        // Golems and constructs
        fixed(&["iron_golem"], GRAY);
        fixed(&["snow_golem"], ICY_WHITE);
        fixed(&["creaking"], WOOD_SAP);

        // Elementals and spirits
        fixed(&["breeze"], CYAN);
        fixed(&["phantom"], NIGHT_BLUE);
        fixed(&["vex", "allay"], SPIRIT_BLUE);

        // Magic users and misc hostiles
        fixed(&["witch"], POTION_GREEN);
        fixed(&["ravager"], RAVAGER_RED);

        // Dynamic resolution
        table.insert(
            "creeper",
            ColorSource::TextureSampled {
                fallback: CREEPER_GREEN,
            },
        );
        table.insert("copper_golem", ColorSource::OxidationStaged);

        table
    };
}

/// Returns how the base color for `kind` is resolved.
///
/// Unmapped kinds (all common mammals, villagers, players, modded entities)
/// default to standard red.
pub fn color_source_for(kind: &str) -> ColorSource {
    COLOR_TABLE
        .get(kind)
        .copied()
        .unwrap_or(ColorSource::Fixed(RED))
}

/// Discrete oxidation stage of a copper construct, derived from its age.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OxidationStage {
    Fresh,
    Exposed,
    Weathered,
    Oxidized,
}

impl OxidationStage {
    /// Stage breakpoints in ticks: fresh < 5 min, exposed < 10 min,
    /// weathered < 15 min, oxidized after.
    pub fn from_age_ticks(age: u32) -> Self {
        if age < 6000 {
            OxidationStage::Fresh
        } else if age < 12000 {
            OxidationStage::Exposed
        } else if age < 18000 {
            OxidationStage::Weathered
        } else {
            OxidationStage::Oxidized
        }
    }

    pub fn color(self) -> BloodColor {
        match self {
            OxidationStage::Fresh => COPPER_FRESH,
            OxidationStage::Exposed => COPPER_EXPOSED,
            OxidationStage::Weathered => COPPER_WEATHERED,
            OxidationStage::Oxidized => COPPER_OXIDIZED,
        }
    }
}

/// Why a texture-sampling attempt produced no color.
///
/// None of these are surfaced to callers as errors; resolution always falls
/// back to the kind's fixed fallback color.
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("texture asset is not loaded")]
    NotLoaded,
    #[error("texture has no CPU-side pixel data")]
    NoImageData,
    #[error("unsupported texture format {0:?}")]
    UnsupportedFormat(TextureFormat),
    #[error("no opaque pixels found in sample region")]
    NoOpaquePixels,
}

// Pixels with alpha below this are treated as transparent and skipped.
const OPAQUE_ALPHA_MIN: u8 = 200;
// The averaged texture color is darkened by this factor to read as blood.
const DARKEN_FACTOR: f32 = 0.4;
// Stride of the sample grid; keeps the one-time cost bounded on big textures.
const SAMPLE_STRIDE: u32 = 2;

/// Averages the opaque pixels of the central 50%×50% region of `image` and
/// darkens the result into a blood tone.
///
/// The central region restriction avoids the transparent padding around most
/// entity textures.
pub fn sample_image_color(image: &Image) -> Result<BloodColor, SampleError> {
    match image.texture_descriptor.format {
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => {}
        format => return Err(SampleError::UnsupportedFormat(format)),
    }
    let data = image.data.as_ref().ok_or(SampleError::NoImageData)?;

    let width = image.width();
    let height = image.height();
    let (start_x, end_x) = (width / 4, width * 3 / 4);
    let (start_y, end_y) = (height / 4, height * 3 / 4);

    let mut total = [0u64; 3];
    let mut sample_count = 0u64;

    let mut y = start_y;
    while y < end_y {
        let mut x = start_x;
        while x < end_x {
            let index = ((y * width + x) * 4) as usize;
            if let Some(pixel) = data.get(index..index + 4) {
                if pixel[3] >= OPAQUE_ALPHA_MIN {
                    total[0] += pixel[0] as u64;
                    total[1] += pixel[1] as u64;
                    total[2] += pixel[2] as u64;
                    sample_count += 1;
                }
            }
            x += SAMPLE_STRIDE;
        }
        y += SAMPLE_STRIDE;
    }

    if sample_count == 0 {
        return Err(SampleError::NoOpaquePixels);
    }

    let average = |channel: u64| (channel as f32 / sample_count as f32) / 255.0;
    Ok(BloodColor::new(
        average(total[0]) * DARKEN_FACTOR,
        average(total[1]) * DARKEN_FACTOR,
        average(total[2]) * DARKEN_FACTOR,
    ))
}

/// Resolves the blood color for one effect, variance pass included.
///
/// Texture-sampled kinds consult the write-once [`EntityColorCache`] first;
/// a successful sample is cached per texture id, a failed one falls back to
/// the kind's fixed fallback and is retried only while the cache stays empty.
/// Formats the one-time capability probe rejected are never retried.
pub fn resolve_blood_color(
    kind: &str,
    texture: Option<&PrimaryTexture>,
    age: Option<&EntityAge>,
    images: &Assets<Image>,
    cache: &mut EntityColorCache,
    rng: &mut impl Rng,
) -> BloodColor {
    let base = match color_source_for(kind) {
        ColorSource::Fixed(color) => color,
        ColorSource::TextureSampled { fallback } => {
            resolve_sampled_color(kind, texture, images, cache).unwrap_or(fallback)
        }
        ColorSource::OxidationStaged => {
            // Missing age counter defaults to the fresh stage
            OxidationStage::from_age_ticks(age.map_or(0, |age| age.0)).color()
        }
    };

    base.with_variance(rng)
}

fn resolve_sampled_color(
    kind: &str,
    texture: Option<&PrimaryTexture>,
    images: &Assets<Image>,
    cache: &mut EntityColorCache,
) -> Option<BloodColor> {
    let texture = texture?;
    let texture_id = texture.0.id();

    if let Some(color) = cache.get(texture_id) {
        return Some(color);
    }
    if cache.probe() == TextureProbe::Unreadable {
        return None;
    }

    let result = images
        .get(&texture.0)
        .ok_or(SampleError::NotLoaded)
        .and_then(sample_image_color);

    match result {
        Ok(color) => {
            cache.set_probe(TextureProbe::Readable);
            cache.insert(texture_id, color);
            log::info!(
                "sampled {} texture for blood color: R={:.2} G={:.2} B={:.2}",
                kind,
                color.red,
                color.green,
                color.blue
            );
            Some(color)
        }
        Err(error @ SampleError::UnsupportedFormat(_)) => {
            // Capability probe failed; do not try this again this session
            cache.set_probe(TextureProbe::Unreadable);
            log::warn!("cannot sample {} texture: {}", kind, error);
            None
        }
        Err(error) => {
            log::debug!("failed to sample {} texture: {}", kind, error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::{
        asset::RenderAssetUsages,
        render::render_resource::{Extent3d, TextureDimension},
    };

    use super::*;

    fn solid_image(width: u32, height: u32, pixel: [u8; 4]) -> Image {
        let data = pixel.repeat((width * height) as usize);
        Image::new(
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::MAIN_WORLD,
        )
    }

    #[test]
    fn test_table_lookup_deterministic() {
        for _ in 0..8 {
            assert_eq!(color_source_for("zombie"), ColorSource::Fixed(DARK_RED));
            assert_eq!(color_source_for("skeleton"), ColorSource::Fixed(BONE));
            assert_eq!(color_source_for("squid"), ColorSource::Fixed(BLUE));
            assert_eq!(color_source_for("happy_ghast"), ColorSource::Fixed(WHITE));
        }
    }

    #[test]
    fn test_unmapped_kind_defaults_to_red() {
        assert_eq!(color_source_for("cow"), ColorSource::Fixed(RED));
        assert_eq!(color_source_for("some_modded_entity"), ColorSource::Fixed(RED));
    }

    #[test]
    fn test_dynamic_sources() {
        assert_eq!(
            color_source_for("creeper"),
            ColorSource::TextureSampled {
                fallback: CREEPER_GREEN
            }
        );
        assert_eq!(color_source_for("copper_golem"), ColorSource::OxidationStaged);
    }

    #[test]
    fn test_variance_stays_in_unit_range() {
        let mut rng = rand::thread_rng();
        for base in [WHITE, BLACK, RED, BloodColor::new(1.0, 1.0, 1.0)] {
            for _ in 0..200 {
                let varied = base.with_variance(&mut rng);
                for channel in [varied.red, varied.green, varied.blue] {
                    assert!((0.0..=1.0).contains(&channel));
                }
            }
        }
    }

    #[test]
    fn test_oxidation_breakpoints() {
        assert_eq!(OxidationStage::from_age_ticks(0), OxidationStage::Fresh);
        assert_eq!(OxidationStage::from_age_ticks(5999), OxidationStage::Fresh);
        assert_eq!(OxidationStage::from_age_ticks(6000), OxidationStage::Exposed);
        assert_eq!(
            OxidationStage::from_age_ticks(12000),
            OxidationStage::Weathered
        );
        assert_eq!(
            OxidationStage::from_age_ticks(18000),
            OxidationStage::Oxidized
        );
    }

    #[test]
    fn test_sample_solid_image_darkens_average() {
        let image = solid_image(16, 16, [255, 0, 0, 255]);
        let color = sample_image_color(&image).unwrap();
        assert!((color.red - 0.4).abs() < 0.01);
        assert!(color.green.abs() < 0.01);
        assert!(color.blue.abs() < 0.01);
    }

    #[test]
    fn test_sample_skips_transparent_pixels() {
        // Fully transparent image has no opaque samples
        let image = solid_image(16, 16, [120, 200, 40, 0]);
        assert!(matches!(
            sample_image_color(&image),
            Err(SampleError::NoOpaquePixels)
        ));
    }

    #[test]
    fn test_sample_rejects_unsupported_format() {
        let data = vec![0u8; 16 * 16 * 4];
        let image = Image::new(
            Extent3d {
                width: 16,
                height: 16,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Bgra8UnormSrgb,
            RenderAssetUsages::MAIN_WORLD,
        );
        assert!(matches!(
            sample_image_color(&image),
            Err(SampleError::UnsupportedFormat(_))
        ));
    }
}
