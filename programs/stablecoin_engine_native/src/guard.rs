//! Reentrancy guard
//!
//! Every balance-mutating instruction runs inside a scoped guard. The guard
//! lives in its own PDA; the entered flag is persisted to the account before
//! the first CPI of the operation, so an external program re-entering the
//! engine observes the lock and fails. The error path relies on transaction
//! rollback to restore the flag together with the rest of the state.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, msg, program_error::ProgramError,
};

use crate::{constants::DISCRIMINATOR_SIZE, error::EngineError};

/// Guard discriminator
pub const REENTRANCY_GUARD_DISCRIMINATOR: [u8; 8] = *b"REENTRGD";

/// Guard states
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Ready for a new operation
    NotEntered,
    /// Operation in progress
    Entered,
}

/// Reentrancy guard account
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct ReentrancyGuard {
    /// Discriminator
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    /// Current state
    pub state: GuardState,

    /// Completed operation counter
    pub operation_count: u64,
}

impl ReentrancyGuard {
    pub const SIZE: usize = DISCRIMINATOR_SIZE + 1 + 8;

    pub fn new() -> Self {
        Self {
            discriminator: REENTRANCY_GUARD_DISCRIMINATOR,
            state: GuardState::NotEntered,
            operation_count: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.discriminator != REENTRANCY_GUARD_DISCRIMINATOR {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(())
    }

    pub fn enter(&mut self) -> Result<(), ProgramError> {
        match self.state {
            GuardState::NotEntered => {
                self.state = GuardState::Entered;
                Ok(())
            }
            GuardState::Entered => {
                msg!("Reentrancy detected");
                Err(EngineError::ReentrancyDetected.into())
            }
        }
    }

    pub fn exit(&mut self) -> Result<(), ProgramError> {
        match self.state {
            GuardState::Entered => {
                self.state = GuardState::NotEntered;
                self.operation_count += 1;
                Ok(())
            }
            GuardState::NotEntered => {
                msg!("Guard exit without matching enter");
                Err(EngineError::InvalidGuardState.into())
            }
        }
    }
}

/// Scoped guard over one mutating instruction. Entering persists the locked
/// state to the guard account immediately; `exit` must be called on the
/// success path before the instruction returns.
pub struct GuardContext<'a, 'b> {
    guard_account: &'a AccountInfo<'b>,
    guard: ReentrancyGuard,
}

impl<'a, 'b> GuardContext<'a, 'b> {
    pub fn enter(guard_account: &'a AccountInfo<'b>) -> Result<Self, ProgramError> {
        let mut guard = ReentrancyGuard::try_from_slice(&guard_account.data.borrow())?;
        guard.validate()?;
        guard.enter()?;
        guard.serialize(&mut &mut guard_account.data.borrow_mut()[..])?;
        Ok(Self {
            guard_account,
            guard,
        })
    }

    pub fn exit(mut self) -> ProgramResult {
        self.guard.exit()?;
        self.guard
            .serialize(&mut &mut self.guard_account.data.borrow_mut()[..])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_exit_cycle() {
        let mut guard = ReentrancyGuard::new();
        assert_eq!(guard.state, GuardState::NotEntered);

        guard.enter().unwrap();
        assert_eq!(guard.state, GuardState::Entered);

        guard.exit().unwrap();
        assert_eq!(guard.state, GuardState::NotEntered);
        assert_eq!(guard.operation_count, 1);
    }

    #[test]
    fn test_double_enter_rejected() {
        let mut guard = ReentrancyGuard::new();
        guard.enter().unwrap();
        assert_eq!(guard.enter(), Err(EngineError::ReentrancyDetected.into()));
    }

    #[test]
    fn test_exit_without_enter_rejected() {
        let mut guard = ReentrancyGuard::new();
        assert_eq!(guard.exit(), Err(EngineError::InvalidGuardState.into()));
    }

    #[test]
    fn test_guard_size() {
        let guard = ReentrancyGuard::new();
        assert_eq!(guard.try_to_vec().unwrap().len(), ReentrancyGuard::SIZE);
    }
}
