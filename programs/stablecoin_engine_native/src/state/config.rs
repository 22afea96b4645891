//! Engine configuration account
//!
//! The allowed collateral set and the collateralization parameters, fixed at
//! initialization and immutable afterwards.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::{
        DISCRIMINATOR_SIZE, LIQUIDATION_BONUS, LIQUIDATION_PRECISION, LIQUIDATION_THRESHOLD,
        MIN_HEALTH_FACTOR,
    },
    error::EngineError,
};

/// Engine config discriminator
pub const ENGINE_CONFIG_DISCRIMINATOR: [u8; 8] = *b"ENGCONFG";

/// One approved collateral asset and its price feed, bound 1:1 at
/// initialization.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct CollateralAssetConfig {
    /// Collateral token mint
    pub mint: Pubkey,

    /// Price feed account reporting this asset's USD price
    pub price_feed: Pubkey,
}

/// Engine configuration - created once, never mutated
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct EngineConfig {
    /// Discriminator
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    /// Mint of the pegged stable token
    pub stable_mint: Pubkey,

    /// Bump of the engine authority PDA (vault owner and mint authority)
    pub authority_bump: u8,

    /// Percentage of collateral USD value counted toward solvency
    pub liquidation_threshold: u64,

    /// Denominator for threshold and bonus percentages
    pub liquidation_precision: u64,

    /// Liquidator bonus percentage
    pub liquidation_bonus: u64,

    /// Minimum health factor in 18-decimal fixed point
    pub min_health_factor: u128,

    /// Approved collateral assets, in declaration order
    pub assets: Vec<CollateralAssetConfig>,
}

impl EngineConfig {
    /// Builds the config from the two construction-time lists. The lists
    /// must be equal length; each mint is paired with the feed at the same
    /// index.
    pub fn try_new(
        stable_mint: Pubkey,
        authority_bump: u8,
        collateral_mints: Vec<Pubkey>,
        price_feeds: Vec<Pubkey>,
    ) -> Result<Self, ProgramError> {
        if collateral_mints.len() != price_feeds.len() {
            return Err(EngineError::ConfigLengthMismatch.into());
        }

        let assets = collateral_mints
            .into_iter()
            .zip(price_feeds)
            .map(|(mint, price_feed)| CollateralAssetConfig { mint, price_feed })
            .collect();

        Ok(Self {
            discriminator: ENGINE_CONFIG_DISCRIMINATOR,
            stable_mint,
            authority_bump,
            liquidation_threshold: LIQUIDATION_THRESHOLD,
            liquidation_precision: LIQUIDATION_PRECISION,
            liquidation_bonus: LIQUIDATION_BONUS,
            min_health_factor: MIN_HEALTH_FACTOR,
            assets,
        })
    }

    /// Serialized size for a config holding `asset_count` assets
    pub fn size_for(asset_count: usize) -> usize {
        DISCRIMINATOR_SIZE + 32 + 1 + 8 + 8 + 8 + 16 + 4 + asset_count * 64
    }

    /// Validate config account data
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.discriminator != ENGINE_CONFIG_DISCRIMINATOR {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(())
    }

    /// Index of `mint` in the approved asset list
    pub fn asset_index(&self, mint: &Pubkey) -> Result<usize, ProgramError> {
        self.assets
            .iter()
            .position(|asset| asset.mint == *mint)
            .ok_or_else(|| EngineError::AssetNotAllowed.into())
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}
