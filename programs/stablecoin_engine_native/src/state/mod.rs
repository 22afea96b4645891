//! Engine account state

pub mod config;
pub mod position;

pub use config::{CollateralAssetConfig, EngineConfig, ENGINE_CONFIG_DISCRIMINATOR};
pub use position::{UserPosition, USER_POSITION_DISCRIMINATOR};
