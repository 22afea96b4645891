//! Per-user position account
//!
//! The authoritative collateral and debt ledger for one user. Created
//! implicitly on first deposit and never destroyed; a zeroed position is
//! indistinguishable from a never-used one.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::{constants::DISCRIMINATOR_SIZE, error::EngineError};

/// User position discriminator
pub const USER_POSITION_DISCRIMINATOR: [u8; 8] = *b"USERPOSN";

/// A user's deposited collateral and minted debt
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct UserPosition {
    /// Discriminator
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    /// Owner of the position
    pub owner: Pubkey,

    /// Deposited amounts, parallel to the config's asset list
    pub deposited: Vec<u128>,

    /// Pegged units minted against this position
    pub debt: u128,
}

impl UserPosition {
    pub fn new(owner: Pubkey, asset_count: usize) -> Self {
        Self {
            discriminator: USER_POSITION_DISCRIMINATOR,
            owner,
            deposited: vec![0; asset_count],
            debt: 0,
        }
    }

    /// Serialized size for a position tracking `asset_count` assets
    pub fn size_for(asset_count: usize) -> usize {
        DISCRIMINATOR_SIZE + 32 + 4 + asset_count * 16 + 16
    }

    /// Validate position account data against its expected owner
    pub fn validate(&self, expected_owner: &Pubkey) -> Result<(), ProgramError> {
        if self.discriminator != USER_POSITION_DISCRIMINATOR {
            return Err(ProgramError::InvalidAccountData);
        }
        if self.owner != *expected_owner {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(())
    }

    /// Deposited amount for the asset at `index`
    pub fn collateral(&self, index: usize) -> u128 {
        self.deposited.get(index).copied().unwrap_or(0)
    }

    pub fn add_collateral(&mut self, index: usize, amount: u128) -> Result<(), ProgramError> {
        let balance = self
            .deposited
            .get_mut(index)
            .ok_or(ProgramError::InvalidAccountData)?;
        *balance = balance
            .checked_add(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn remove_collateral(&mut self, index: usize, amount: u128) -> Result<(), ProgramError> {
        let balance = self
            .deposited
            .get_mut(index)
            .ok_or(ProgramError::InvalidAccountData)?;
        *balance = balance
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientCollateral)?;
        Ok(())
    }

    pub fn add_debt(&mut self, amount: u128) -> Result<(), ProgramError> {
        self.debt = self
            .debt
            .checked_add(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn remove_debt(&mut self, amount: u128) -> Result<(), ProgramError> {
        self.debt = self
            .debt
            .checked_sub(amount)
            .ok_or(EngineError::BurnExceedsDebt)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_position_is_zeroed() {
        let owner = Pubkey::new_unique();
        let position = UserPosition::new(owner, 2);

        assert_eq!(position.deposited, vec![0, 0]);
        assert_eq!(position.debt, 0);
        assert!(position.validate(&owner).is_ok());
    }

    #[test]
    fn test_deposit_redeem_round_trip() {
        let mut position = UserPosition::new(Pubkey::new_unique(), 2);

        position.add_collateral(1, 10_000).unwrap();
        assert_eq!(position.collateral(1), 10_000);
        assert_eq!(position.collateral(0), 0);

        position.remove_collateral(1, 10_000).unwrap();
        assert_eq!(position.collateral(1), 0);
        assert_eq!(position.debt, 0);
    }

    #[test]
    fn test_remove_more_than_deposited() {
        let mut position = UserPosition::new(Pubkey::new_unique(), 1);
        position.add_collateral(0, 5).unwrap();

        assert_eq!(
            position.remove_collateral(0, 6),
            Err(EngineError::InsufficientCollateral.into())
        );
        // failed removal leaves the balance untouched
        assert_eq!(position.collateral(0), 5);
    }

    #[test]
    fn test_burn_exceeding_debt() {
        let mut position = UserPosition::new(Pubkey::new_unique(), 1);
        position.add_debt(100).unwrap();

        assert_eq!(position.remove_debt(101), Err(EngineError::BurnExceedsDebt.into()));
        assert_eq!(position.debt, 100);

        position.remove_debt(100).unwrap();
        assert_eq!(position.debt, 0);
    }

    #[test]
    fn test_validate_rejects_wrong_owner() {
        let position = UserPosition::new(Pubkey::new_unique(), 1);
        assert!(position.validate(&Pubkey::new_unique()).is_err());
    }

    #[test]
    fn test_serialized_size() {
        let position = UserPosition::new(Pubkey::new_unique(), 3);
        let bytes = position.try_to_vec().unwrap();
        assert_eq!(bytes.len(), UserPosition::size_for(3));
    }
}
