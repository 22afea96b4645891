//! Minting and burning of the pegged unit
//!
//! Debt is recorded before the solvency check so the check sees the
//! post-mint state; the external mint call comes last. Burning pulls the
//! repayment into the engine's custody before the token burn.

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    collateral::{
        check_engine_authority, enter_guard, load_config, load_position, save_position,
    },
    cpi,
    error::EngineError,
    events::{StableBurned, StableMinted},
    health,
    oracle,
    pda,
};

/// Checks that `mint_account` is the configured pegged mint
fn check_stable_mint(
    mint_account: &AccountInfo,
    expected: &Pubkey,
) -> ProgramResult {
    if *mint_account.key != *expected {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

/// Checks that `vault_account` is the engine's stable vault
fn check_stable_vault(program_id: &Pubkey, vault_account: &AccountInfo) -> ProgramResult {
    let (expected, _) = pda::derive_stable_vault(program_id);
    if *vault_account.key != expected {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

/// Mint pegged units against deposited collateral
///
/// Accounts:
/// 0. `[signer]` minter
/// 1. `[]` engine config
/// 2. `[writable]` engine guard
/// 3. `[writable]` user position
/// 4. `[writable]` stable mint
/// 5. `[writable]` minter stable token account
/// 6. `[]` engine authority
/// 7. `[]` token program
/// 8.. `[]` price feed accounts, one per configured asset in order
pub fn process_mint_stable(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u128,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();

    let minter = next_account_info(account_iter)?;
    let config_account = next_account_info(account_iter)?;
    let guard_account = next_account_info(account_iter)?;
    let position_account = next_account_info(account_iter)?;
    let stable_mint = next_account_info(account_iter)?;
    let minter_token = next_account_info(account_iter)?;
    let authority_account = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;
    let feed_accounts = account_iter.as_slice();

    if !minter.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let config = load_config(program_id, config_account)?;
    let guard = enter_guard(program_id, guard_account)?;

    if amount == 0 {
        return Err(EngineError::ZeroAmount.into());
    }
    let amount_raw: u64 = amount
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;

    let mut position = load_position(program_id, position_account, minter.key)?;
    position.add_debt(amount)?;

    let prices = oracle::read_all_prices(&config, feed_accounts)?;
    health::assert_healthy(&config, &position, &prices)?;
    save_position(&position, position_account)?;

    check_stable_mint(stable_mint, &config.stable_mint)?;
    check_engine_authority(program_id, authority_account)?;
    cpi::spl_token::mint_to(
        stable_mint,
        minter_token,
        authority_account,
        amount_raw,
        token_program,
        &[&[pda::seeds::ENGINE_AUTHORITY, &[config.authority_bump]]],
    )
    .map_err(|_| EngineError::MintFailed)?;

    StableMinted {
        user: *minter.key,
        amount,
    }
    .log();

    guard.exit()
}

/// Burn pegged units, reducing recorded debt
///
/// Accounts:
/// 0. `[signer]` payer (burns against their own position)
/// 1. `[]` engine config
/// 2. `[writable]` engine guard
/// 3. `[writable]` user position
/// 4. `[writable]` stable mint
/// 5. `[writable]` payer stable token account
/// 6. `[writable]` stable vault
/// 7. `[]` engine authority
/// 8. `[]` token program
pub fn process_burn_stable(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u128,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();

    let payer = next_account_info(account_iter)?;
    let config_account = next_account_info(account_iter)?;
    let guard_account = next_account_info(account_iter)?;
    let position_account = next_account_info(account_iter)?;
    let stable_mint = next_account_info(account_iter)?;
    let payer_token = next_account_info(account_iter)?;
    let stable_vault = next_account_info(account_iter)?;
    let authority_account = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;

    if !payer.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let config = load_config(program_id, config_account)?;
    let guard = enter_guard(program_id, guard_account)?;

    if amount == 0 {
        return Err(EngineError::ZeroAmount.into());
    }
    let amount_raw: u64 = amount
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;

    let mut position = load_position(program_id, position_account, payer.key)?;
    position.remove_debt(amount)?;
    save_position(&position, position_account)?;

    check_stable_mint(stable_mint, &config.stable_mint)?;
    check_stable_vault(program_id, stable_vault)?;
    check_engine_authority(program_id, authority_account)?;

    // pull the repayment into engine custody, then burn it
    cpi::spl_token::transfer(payer_token, stable_vault, payer, amount_raw, token_program, &[])
        .map_err(|_| EngineError::TransferFailed)?;
    cpi::spl_token::burn(
        stable_vault,
        stable_mint,
        authority_account,
        amount_raw,
        token_program,
        &[&[pda::seeds::ENGINE_AUTHORITY, &[config.authority_bump]]],
    )?;

    StableBurned {
        on_behalf_of: *payer.key,
        payer: *payer.key,
        amount,
    }
    .log();
    msg!("Burned {} pegged units for {}", amount, payer.key);

    guard.exit()
}
