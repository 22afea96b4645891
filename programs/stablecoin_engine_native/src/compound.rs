//! Composed entry points
//!
//! Deposit-and-mint and redeem-for-stable in a single transaction, under one
//! guard acquisition. Ledger effects for both halves land before the token
//! CPIs, and the solvency check sees the combined post-state.

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    collateral::{
        check_collateral_vault, check_engine_authority, enter_guard, load_config,
        load_or_create_position, load_position, save_position,
    },
    cpi,
    error::EngineError,
    events::{CollateralDeposited, CollateralRedeemed, StableBurned, StableMinted},
    health,
    oracle,
    pda,
};

/// Deposit collateral and mint pegged units in one operation
///
/// Accounts:
/// 0. `[signer, writable]` user
/// 1. `[]` engine config
/// 2. `[writable]` engine guard
/// 3. `[writable]` user position (created on first deposit)
/// 4. `[]` collateral mint
/// 5. `[writable]` user collateral token account
/// 6. `[writable]` collateral vault
/// 7. `[writable]` stable mint
/// 8. `[writable]` user stable token account
/// 9. `[]` engine authority
/// 10. `[]` token program
/// 11. `[]` system program
/// 12.. `[]` price feed accounts, one per configured asset in order
pub fn process_deposit_and_mint(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    collateral_amount: u128,
    mint_amount: u128,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();

    let user = next_account_info(account_iter)?;
    let config_account = next_account_info(account_iter)?;
    let guard_account = next_account_info(account_iter)?;
    let position_account = next_account_info(account_iter)?;
    let collateral_mint = next_account_info(account_iter)?;
    let user_collateral_token = next_account_info(account_iter)?;
    let vault_account = next_account_info(account_iter)?;
    let stable_mint = next_account_info(account_iter)?;
    let user_stable_token = next_account_info(account_iter)?;
    let authority_account = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;
    let system_program = next_account_info(account_iter)?;
    let feed_accounts = account_iter.as_slice();

    if !user.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let config = load_config(program_id, config_account)?;
    let guard = enter_guard(program_id, guard_account)?;

    if collateral_amount == 0 || mint_amount == 0 {
        return Err(EngineError::ZeroAmount.into());
    }
    let asset_index = config.asset_index(collateral_mint.key)?;
    let collateral_raw: u64 = collateral_amount
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;
    let mint_raw: u64 = mint_amount
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;

    let mut position = load_or_create_position(
        program_id,
        position_account,
        user,
        system_program,
        config.asset_count(),
    )?;
    position.add_collateral(asset_index, collateral_amount)?;
    position.add_debt(mint_amount)?;

    let prices = oracle::read_all_prices(&config, feed_accounts)?;
    health::assert_healthy(&config, &position, &prices)?;
    save_position(&position, position_account)?;

    check_collateral_vault(program_id, vault_account, collateral_mint.key)?;
    cpi::spl_token::transfer(
        user_collateral_token,
        vault_account,
        user,
        collateral_raw,
        token_program,
        &[],
    )
    .map_err(|_| EngineError::TransferFailed)?;

    if *stable_mint.key != config.stable_mint {
        return Err(ProgramError::InvalidAccountData);
    }
    check_engine_authority(program_id, authority_account)?;
    cpi::spl_token::mint_to(
        stable_mint,
        user_stable_token,
        authority_account,
        mint_raw,
        token_program,
        &[&[pda::seeds::ENGINE_AUTHORITY, &[config.authority_bump]]],
    )
    .map_err(|_| EngineError::MintFailed)?;

    CollateralDeposited {
        user: *user.key,
        asset: *collateral_mint.key,
        amount: collateral_amount,
    }
    .log();
    StableMinted {
        user: *user.key,
        amount: mint_amount,
    }
    .log();

    guard.exit()
}

/// Burn pegged units and redeem collateral in one operation
///
/// Accounts:
/// 0. `[signer]` user
/// 1. `[]` engine config
/// 2. `[writable]` engine guard
/// 3. `[writable]` user position
/// 4. `[]` collateral mint
/// 5. `[writable]` collateral vault
/// 6. `[writable]` user collateral token account
/// 7. `[writable]` stable mint
/// 8. `[writable]` user stable token account
/// 9. `[writable]` stable vault
/// 10. `[]` engine authority
/// 11. `[]` token program
/// 12.. `[]` price feed accounts, one per configured asset in order
pub fn process_redeem_for_stable(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    collateral_amount: u128,
    burn_amount: u128,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();

    let user = next_account_info(account_iter)?;
    let config_account = next_account_info(account_iter)?;
    let guard_account = next_account_info(account_iter)?;
    let position_account = next_account_info(account_iter)?;
    let collateral_mint = next_account_info(account_iter)?;
    let vault_account = next_account_info(account_iter)?;
    let user_collateral_token = next_account_info(account_iter)?;
    let stable_mint = next_account_info(account_iter)?;
    let user_stable_token = next_account_info(account_iter)?;
    let stable_vault = next_account_info(account_iter)?;
    let authority_account = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;
    let feed_accounts = account_iter.as_slice();

    if !user.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let config = load_config(program_id, config_account)?;
    let guard = enter_guard(program_id, guard_account)?;

    if collateral_amount == 0 || burn_amount == 0 {
        return Err(EngineError::ZeroAmount.into());
    }
    let asset_index = config.asset_index(collateral_mint.key)?;
    let collateral_raw: u64 = collateral_amount
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;
    let burn_raw: u64 = burn_amount
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;

    let mut position = load_position(program_id, position_account, user.key)?;
    position.remove_debt(burn_amount)?;
    position.remove_collateral(asset_index, collateral_amount)?;
    save_position(&position, position_account)?;

    if *stable_mint.key != config.stable_mint {
        return Err(ProgramError::InvalidAccountData);
    }
    let (expected_stable_vault, _) = pda::derive_stable_vault(program_id);
    if *stable_vault.key != expected_stable_vault {
        return Err(ProgramError::InvalidAccountData);
    }
    check_collateral_vault(program_id, vault_account, collateral_mint.key)?;
    check_engine_authority(program_id, authority_account)?;

    let authority_seeds: &[&[&[u8]]] =
        &[&[pda::seeds::ENGINE_AUTHORITY, &[config.authority_bump]]];

    cpi::spl_token::transfer(
        user_stable_token,
        stable_vault,
        user,
        burn_raw,
        token_program,
        &[],
    )
    .map_err(|_| EngineError::TransferFailed)?;
    cpi::spl_token::burn(
        stable_vault,
        stable_mint,
        authority_account,
        burn_raw,
        token_program,
        authority_seeds,
    )?;

    cpi::spl_token::transfer(
        vault_account,
        user_collateral_token,
        authority_account,
        collateral_raw,
        token_program,
        authority_seeds,
    )
    .map_err(|_| EngineError::TransferFailed)?;

    let prices = oracle::read_all_prices(&config, feed_accounts)?;
    health::assert_healthy(&config, &position, &prices)?;

    StableBurned {
        on_behalf_of: *user.key,
        payer: *user.key,
        amount: burn_amount,
    }
    .log();
    CollateralRedeemed {
        from: *user.key,
        to: *user.key,
        asset: *collateral_mint.key,
        amount: collateral_amount,
    }
    .log();

    guard.exit()
}
