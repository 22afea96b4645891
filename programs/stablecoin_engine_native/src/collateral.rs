//! Collateral deposit and redemption
//!
//! Ledger bookkeeping happens on an owned copy of the position account and is
//! persisted before any token CPI, so a reentrant call observes updated state
//! and a failed transfer aborts the transaction with the increment never
//! visible.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    cpi,
    error::EngineError,
    events::{CollateralDeposited, CollateralRedeemed},
    guard::GuardContext,
    health,
    oracle,
    pda,
    state::{EngineConfig, UserPosition},
};

/// Loads and validates the engine config, checking the account address
pub(crate) fn load_config(
    program_id: &Pubkey,
    config_account: &AccountInfo,
) -> Result<EngineConfig, ProgramError> {
    let (expected, _) = pda::derive_engine_config(program_id);
    if *config_account.key != expected {
        return Err(ProgramError::InvalidAccountData);
    }
    let config = EngineConfig::try_from_slice(&config_account.data.borrow())?;
    config.validate()?;
    Ok(config)
}

/// Checks the guard account address before entering it
pub(crate) fn enter_guard<'a, 'b>(
    program_id: &Pubkey,
    guard_account: &'a AccountInfo<'b>,
) -> Result<GuardContext<'a, 'b>, ProgramError> {
    let (expected, _) = pda::derive_engine_guard(program_id);
    if *guard_account.key != expected {
        return Err(ProgramError::InvalidAccountData);
    }
    GuardContext::enter(guard_account)
}

/// Loads an existing position, validating address and owner
pub(crate) fn load_position(
    program_id: &Pubkey,
    position_account: &AccountInfo,
    owner: &Pubkey,
) -> Result<UserPosition, ProgramError> {
    let (expected, _) = pda::derive_user_position(program_id, owner);
    if *position_account.key != expected {
        return Err(ProgramError::InvalidAccountData);
    }
    if position_account.data_is_empty() {
        return Err(ProgramError::UninitializedAccount);
    }
    let position = UserPosition::try_from_slice(&position_account.data.borrow())?;
    position.validate(owner)?;
    Ok(position)
}

/// Loads a position, creating it on first use (accounts come into existence
/// on first deposit)
pub(crate) fn load_or_create_position<'a>(
    program_id: &Pubkey,
    position_account: &AccountInfo<'a>,
    owner_account: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    asset_count: usize,
) -> Result<UserPosition, ProgramError> {
    let (expected, bump) = pda::derive_user_position(program_id, owner_account.key);
    if *position_account.key != expected {
        return Err(ProgramError::InvalidAccountData);
    }

    if position_account.data_is_empty() {
        cpi::system::create_pda_account(
            owner_account,
            position_account,
            UserPosition::size_for(asset_count),
            program_id,
            system_program,
            &[&[pda::seeds::USER_POSITION, owner_account.key.as_ref(), &[bump]]],
        )?;
        return Ok(UserPosition::new(*owner_account.key, asset_count));
    }

    let position = UserPosition::try_from_slice(&position_account.data.borrow())?;
    position.validate(owner_account.key)?;
    Ok(position)
}

pub(crate) fn save_position(
    position: &UserPosition,
    position_account: &AccountInfo,
) -> ProgramResult {
    position.serialize(&mut &mut position_account.data.borrow_mut()[..])?;
    Ok(())
}

/// Checks that `vault_account` is the configured vault for `mint`
pub(crate) fn check_collateral_vault(
    program_id: &Pubkey,
    vault_account: &AccountInfo,
    mint: &Pubkey,
) -> ProgramResult {
    let (expected, _) = pda::derive_collateral_vault(program_id, mint);
    if *vault_account.key != expected {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

/// Checks that `authority_account` is the engine authority PDA
pub(crate) fn check_engine_authority(
    program_id: &Pubkey,
    authority_account: &AccountInfo,
) -> ProgramResult {
    let (expected, _) = pda::derive_engine_authority(program_id);
    if *authority_account.key != expected {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

/// Deposit collateral
///
/// Accounts:
/// 0. `[signer, writable]` depositor
/// 1. `[]` engine config
/// 2. `[writable]` engine guard
/// 3. `[writable]` user position (created on first deposit)
/// 4. `[]` collateral mint
/// 5. `[writable]` depositor collateral token account
/// 6. `[writable]` collateral vault
/// 7. `[]` token program
/// 8. `[]` system program
pub fn process_deposit_collateral(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u128,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();

    let depositor = next_account_info(account_iter)?;
    let config_account = next_account_info(account_iter)?;
    let guard_account = next_account_info(account_iter)?;
    let position_account = next_account_info(account_iter)?;
    let collateral_mint = next_account_info(account_iter)?;
    let depositor_token = next_account_info(account_iter)?;
    let vault_account = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;
    let system_program = next_account_info(account_iter)?;

    if !depositor.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let config = load_config(program_id, config_account)?;
    let guard = enter_guard(program_id, guard_account)?;

    if amount == 0 {
        return Err(EngineError::ZeroAmount.into());
    }
    let asset_index = config.asset_index(collateral_mint.key)?;
    let amount_raw: u64 = amount
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;

    let mut position = load_or_create_position(
        program_id,
        position_account,
        depositor,
        system_program,
        config.asset_count(),
    )?;
    position.add_collateral(asset_index, amount)?;
    save_position(&position, position_account)?;

    check_collateral_vault(program_id, vault_account, collateral_mint.key)?;
    cpi::spl_token::transfer(
        depositor_token,
        vault_account,
        depositor,
        amount_raw,
        token_program,
        &[],
    )
    .map_err(|_| EngineError::TransferFailed)?;

    CollateralDeposited {
        user: *depositor.key,
        asset: *collateral_mint.key,
        amount,
    }
    .log();

    guard.exit()
}

/// Redeem collateral back to the caller, health-checked afterwards
///
/// Accounts:
/// 0. `[signer]` redeemer
/// 1. `[]` engine config
/// 2. `[writable]` engine guard
/// 3. `[writable]` user position
/// 4. `[]` collateral mint
/// 5. `[writable]` collateral vault
/// 6. `[writable]` redeemer collateral token account
/// 7. `[]` engine authority
/// 8. `[]` token program
/// 9.. `[]` price feed accounts, one per configured asset in order
pub fn process_redeem_collateral(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u128,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();

    let redeemer = next_account_info(account_iter)?;
    let config_account = next_account_info(account_iter)?;
    let guard_account = next_account_info(account_iter)?;
    let position_account = next_account_info(account_iter)?;
    let collateral_mint = next_account_info(account_iter)?;
    let vault_account = next_account_info(account_iter)?;
    let redeemer_token = next_account_info(account_iter)?;
    let authority_account = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;
    let feed_accounts = account_iter.as_slice();

    if !redeemer.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let config = load_config(program_id, config_account)?;
    let guard = enter_guard(program_id, guard_account)?;

    if amount == 0 {
        return Err(EngineError::ZeroAmount.into());
    }
    let asset_index = config.asset_index(collateral_mint.key)?;
    let amount_raw: u64 = amount
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;

    let mut position = load_position(program_id, position_account, redeemer.key)?;
    position.remove_collateral(asset_index, amount)?;
    save_position(&position, position_account)?;

    check_collateral_vault(program_id, vault_account, collateral_mint.key)?;
    check_engine_authority(program_id, authority_account)?;
    cpi::spl_token::transfer(
        vault_account,
        redeemer_token,
        authority_account,
        amount_raw,
        token_program,
        &[&[pda::seeds::ENGINE_AUTHORITY, &[config.authority_bump]]],
    )
    .map_err(|_| EngineError::TransferFailed)?;

    let prices = oracle::read_all_prices(&config, feed_accounts)?;
    health::assert_healthy(&config, &position, &prices)?;

    CollateralRedeemed {
        from: *redeemer.key,
        to: *redeemer.key,
        asset: *collateral_mint.key,
        amount,
    }
    .log();
    msg!("Redeemed {} collateral for {}", amount, redeemer.key);

    guard.exit()
}
