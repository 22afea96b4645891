//! Engine initialization
//!
//! One-time construction: binds each collateral mint to its price feed in
//! declaration order, creates the config and guard accounts, and opens the
//! vault token accounts owned by the engine authority.

use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    cpi,
    guard::ReentrancyGuard,
    pda,
    state::EngineConfig,
};

/// Initialize the engine
///
/// Accounts:
/// 0. `[signer, writable]` payer
/// 1. `[writable]` engine config
/// 2. `[writable]` engine guard
/// 3. `[]` stable mint
/// 4. `[]` engine authority
/// 5. `[writable]` stable vault
/// 6. `[]` token program
/// 7. `[]` system program
/// 8.. per collateral asset, in declaration order:
///     `[]` collateral mint, `[writable]` collateral vault
pub fn process_initialize_engine(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    collateral_mints: Vec<Pubkey>,
    price_feeds: Vec<Pubkey>,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();

    let payer = next_account_info(account_iter)?;
    let config_account = next_account_info(account_iter)?;
    let guard_account = next_account_info(account_iter)?;
    let stable_mint = next_account_info(account_iter)?;
    let authority_account = next_account_info(account_iter)?;
    let stable_vault = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;
    let system_program = next_account_info(account_iter)?;
    let asset_accounts = account_iter.as_slice();

    if !payer.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (authority, authority_bump) = pda::derive_engine_authority(program_id);
    if *authority_account.key != authority {
        return Err(ProgramError::InvalidAccountData);
    }

    // validates the two lists against each other before anything is created
    let config = EngineConfig::try_new(
        *stable_mint.key,
        authority_bump,
        collateral_mints,
        price_feeds,
    )?;
    let asset_count = config.asset_count();

    if asset_accounts.len() != asset_count * 2 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }

    let (expected_config, config_bump) = pda::derive_engine_config(program_id);
    if *config_account.key != expected_config {
        return Err(ProgramError::InvalidAccountData);
    }
    if !config_account.data_is_empty() {
        return Err(ProgramError::AccountAlreadyInitialized);
    }
    cpi::system::create_pda_account(
        payer,
        config_account,
        EngineConfig::size_for(asset_count),
        program_id,
        system_program,
        &[&[pda::seeds::ENGINE_CONFIG, &[config_bump]]],
    )?;
    config.serialize(&mut &mut config_account.data.borrow_mut()[..])?;

    let (expected_guard, guard_bump) = pda::derive_engine_guard(program_id);
    if *guard_account.key != expected_guard {
        return Err(ProgramError::InvalidAccountData);
    }
    if !guard_account.data_is_empty() {
        return Err(ProgramError::AccountAlreadyInitialized);
    }
    cpi::system::create_pda_account(
        payer,
        guard_account,
        ReentrancyGuard::SIZE,
        program_id,
        system_program,
        &[&[pda::seeds::ENGINE_GUARD, &[guard_bump]]],
    )?;
    ReentrancyGuard::new().serialize(&mut &mut guard_account.data.borrow_mut()[..])?;

    let (expected_stable_vault, stable_vault_bump) = pda::derive_stable_vault(program_id);
    if *stable_vault.key != expected_stable_vault {
        return Err(ProgramError::InvalidAccountData);
    }
    cpi::spl_token::create_token_account(
        payer,
        stable_vault,
        stable_mint,
        &authority,
        token_program,
        system_program,
        &[&[pda::seeds::STABLE_VAULT, &[stable_vault_bump]]],
    )?;

    for (index, pair) in asset_accounts.chunks(2).enumerate() {
        let collateral_mint = &pair[0];
        let vault_account = &pair[1];

        if *collateral_mint.key != config.assets[index].mint {
            return Err(ProgramError::InvalidAccountData);
        }

        let (expected_vault, vault_bump) =
            pda::derive_collateral_vault(program_id, collateral_mint.key);
        if *vault_account.key != expected_vault {
            return Err(ProgramError::InvalidAccountData);
        }
        cpi::spl_token::create_token_account(
            payer,
            vault_account,
            collateral_mint,
            &authority,
            token_program,
            system_program,
            &[&[
                pda::seeds::COLLATERAL_VAULT,
                collateral_mint.key.as_ref(),
                &[vault_bump],
            ]],
        )?;
    }

    msg!(
        "Engine initialized with {} collateral assets, stable mint {}",
        asset_count,
        stable_mint.key
    );

    Ok(())
}
