//! Main processor for handling all instructions
//!
//! Routes instructions to their respective handlers.

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, msg, program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    collateral, compound, initialize, instruction::EngineInstruction, liquidation, mint,
};

/// Main instruction processor
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = EngineInstruction::try_from_slice(instruction_data)
        .map_err(|_| ProgramError::InvalidInstructionData)?;

    match instruction {
        EngineInstruction::InitializeEngine {
            collateral_mints,
            price_feeds,
        } => {
            msg!("Instruction: InitializeEngine");
            initialize::process_initialize_engine(
                program_id,
                accounts,
                collateral_mints,
                price_feeds,
            )
        }

        EngineInstruction::DepositCollateral { amount } => {
            msg!("Instruction: DepositCollateral");
            collateral::process_deposit_collateral(program_id, accounts, amount)
        }

        EngineInstruction::RedeemCollateral { amount } => {
            msg!("Instruction: RedeemCollateral");
            collateral::process_redeem_collateral(program_id, accounts, amount)
        }

        EngineInstruction::MintStable { amount } => {
            msg!("Instruction: MintStable");
            mint::process_mint_stable(program_id, accounts, amount)
        }

        EngineInstruction::BurnStable { amount } => {
            msg!("Instruction: BurnStable");
            mint::process_burn_stable(program_id, accounts, amount)
        }

        EngineInstruction::DepositCollateralAndMint {
            collateral_amount,
            mint_amount,
        } => {
            msg!("Instruction: DepositCollateralAndMint");
            compound::process_deposit_and_mint(program_id, accounts, collateral_amount, mint_amount)
        }

        EngineInstruction::RedeemCollateralForStable {
            collateral_amount,
            burn_amount,
        } => {
            msg!("Instruction: RedeemCollateralForStable");
            compound::process_redeem_for_stable(
                program_id,
                accounts,
                collateral_amount,
                burn_amount,
            )
        }

        EngineInstruction::Liquidate { debt_to_cover } => {
            msg!("Instruction: Liquidate");
            liquidation::process_liquidate(program_id, accounts, debt_to_cover)
        }
    }
}
