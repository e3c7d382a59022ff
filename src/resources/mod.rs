//! Resources for the blood effects layer.

pub mod active_bursts;
pub mod color_cache;
pub mod config;
pub mod world_environment;

pub use active_bursts::{
    burst_duration_ticks, burst_total_drips, burst_total_splashes, ActiveBursts, BurstTask,
};
pub use color_cache::{EntityColorCache, TextureProbe};
pub use config::{BloodVfxConfig, SimulationPaused};
pub use world_environment::{LiquidVolume, WorldEnvironment};
