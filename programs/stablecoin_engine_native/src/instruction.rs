//! Instruction definitions for the stablecoin engine

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// Instructions accepted by the engine. Account lists are documented on the
/// corresponding `process_*` handlers.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum EngineInstruction {
    // === Construction ===
    /// One-time initialization. `collateral_mints` and `price_feeds` must be
    /// equal length; each pairing is bound 1:1 in declaration order and the
    /// asset set is immutable afterwards.
    InitializeEngine {
        collateral_mints: Vec<Pubkey>,
        price_feeds: Vec<Pubkey>,
    },

    // === Collateral ===
    /// Deposit collateral into the caller's position
    DepositCollateral {
        amount: u128,
    },

    /// Redeem collateral back to the caller; the position must stay healthy
    RedeemCollateral {
        amount: u128,
    },

    // === Pegged unit ===
    /// Mint pegged units against the caller's collateral
    MintStable {
        amount: u128,
    },

    /// Burn pegged units, reducing the caller's debt
    BurnStable {
        amount: u128,
    },

    // === Composed ===
    /// Deposit collateral and mint in one transaction
    DepositCollateralAndMint {
        collateral_amount: u128,
        mint_amount: u128,
    },

    /// Burn pegged units and redeem collateral in one transaction
    RedeemCollateralForStable {
        collateral_amount: u128,
        burn_amount: u128,
    },

    // === Liquidation ===
    /// Cover `debt_to_cover` of an unhealthy target's debt in exchange for
    /// the equivalent collateral plus the liquidation bonus
    Liquidate {
        debt_to_cover: u128,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_round_trip() {
        let original = EngineInstruction::InitializeEngine {
            collateral_mints: vec![Pubkey::new_unique()],
            price_feeds: vec![Pubkey::new_unique()],
        };
        let bytes = original.try_to_vec().unwrap();
        let decoded = EngineInstruction::try_from_slice(&bytes).unwrap();
        assert_eq!(decoded, original);

        let original = EngineInstruction::Liquidate { debt_to_cover: 42 };
        let bytes = original.try_to_vec().unwrap();
        assert_eq!(EngineInstruction::try_from_slice(&bytes).unwrap(), original);
    }

    #[test]
    fn test_unknown_instruction_rejected() {
        assert!(EngineInstruction::try_from_slice(&[255]).is_err());
    }
}
