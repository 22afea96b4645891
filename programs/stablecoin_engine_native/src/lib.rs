//! Collateral-backed stable-value engine
//!
//! Users deposit approved collateral, mint a pegged unit against it, and must
//! stay overcollateralized or be liquidated by a third party for a bonus.
//! All valuation runs through external price feed accounts in 18-decimal
//! integer fixed point; every mutating instruction is guarded against
//! reentrancy and commits all-or-nothing.

pub mod collateral;
pub mod compound;
pub mod constants;
pub mod cpi;
pub mod error;
pub mod events;
pub mod guard;
pub mod health;
pub mod initialize;
pub mod instruction;
pub mod liquidation;
pub mod math;
pub mod mint;
pub mod oracle;
pub mod pda;
pub mod processor;
pub mod state;

pub use error::EngineError;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint {
    use solana_program::{
        account_info::AccountInfo, entrypoint, entrypoint::ProgramResult, pubkey::Pubkey,
    };

    entrypoint!(process_instruction);

    fn process_instruction(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        crate::processor::process_instruction(program_id, accounts, instruction_data)
    }
}
