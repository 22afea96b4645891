//! Engine-wide constants
//!
//! Fixed-point scales and the collateralization parameters baked into the
//! engine at initialization.

/// Account discriminator size in bytes
pub const DISCRIMINATOR_SIZE: usize = 8;

/// 18-decimal fixed-point scale used for all internal USD math
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Price feeds report 8-decimal prices
pub const FEED_PRECISION: u128 = 100_000_000;

/// Scales an 8-decimal feed price up to the 18-decimal internal scale
pub const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000;

/// Fraction of raw collateral value counted toward solvency (50 = 50%,
/// i.e. positions must be 200% overcollateralized)
pub const LIQUIDATION_THRESHOLD: u64 = 50;

/// Denominator for `LIQUIDATION_THRESHOLD` and `LIQUIDATION_BONUS`
pub const LIQUIDATION_PRECISION: u64 = 100;

/// Extra collateral percentage awarded to a liquidator
pub const LIQUIDATION_BONUS: u64 = 10;

/// Minimum health factor, 1.0 in 18-decimal fixed point
pub const MIN_HEALTH_FACTOR: u128 = PRECISION;

/// Sentinel health factor for positions with zero debt
pub const MAX_HEALTH_FACTOR: u128 = u128::MAX;
