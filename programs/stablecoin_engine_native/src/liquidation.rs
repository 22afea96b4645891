//! Liquidation of undercollateralized positions
//!
//! A third party repays part of a target's debt and receives the USD
//! equivalent in collateral plus a bonus. The target's health factor must
//! not come out of the operation worse than it went in, and the liquidator's
//! own position must stay healthy.

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    collateral::{
        check_collateral_vault, check_engine_authority, enter_guard, load_config, load_position,
        save_position,
    },
    cpi,
    error::EngineError,
    events::{CollateralRedeemed, PositionLiquidated, StableBurned},
    health,
    math::mul_div,
    oracle,
    pda,
    state::EngineConfig,
};

/// Collateral to seize for covering `debt_to_cover` USD of debt: the USD
/// equivalent at the asset's price plus the liquidation bonus, capped at the
/// target's available balance of that asset. The cap keeps a deeply
/// underwater position liquidatable instead of failing on a ledger
/// underflow; the non-worsening postcondition still bounds the trade.
pub fn seizure_amount(
    config: &EngineConfig,
    price: i64,
    debt_to_cover: u128,
    available: u128,
) -> Result<u128, ProgramError> {
    let equivalent = oracle::token_amount_from_usd(price, debt_to_cover)?;
    let bonus = mul_div(
        equivalent,
        config.liquidation_bonus as u128,
        config.liquidation_precision as u128,
    )?;
    let total = equivalent
        .checked_add(bonus)
        .ok_or(EngineError::ArithmeticOverflow)?;
    Ok(total.min(available))
}

/// Liquidate an undercollateralized position
///
/// Accounts:
/// 0. `[signer]` liquidator
/// 1. `[]` engine config
/// 2. `[writable]` engine guard
/// 3. `[]` target user
/// 4. `[writable]` target position
/// 5. `[]` liquidator position (may not exist)
/// 6. `[]` collateral mint
/// 7. `[writable]` collateral vault
/// 8. `[writable]` liquidator collateral token account
/// 9. `[writable]` stable mint
/// 10. `[writable]` liquidator stable token account
/// 11. `[writable]` stable vault
/// 12. `[]` engine authority
/// 13. `[]` token program
/// 14.. `[]` price feed accounts, one per configured asset in order
pub fn process_liquidate(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    debt_to_cover: u128,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();

    let liquidator = next_account_info(account_iter)?;
    let config_account = next_account_info(account_iter)?;
    let guard_account = next_account_info(account_iter)?;
    let target_user = next_account_info(account_iter)?;
    let target_position_account = next_account_info(account_iter)?;
    let liquidator_position_account = next_account_info(account_iter)?;
    let collateral_mint = next_account_info(account_iter)?;
    let vault_account = next_account_info(account_iter)?;
    let liquidator_collateral_token = next_account_info(account_iter)?;
    let stable_mint = next_account_info(account_iter)?;
    let liquidator_stable_token = next_account_info(account_iter)?;
    let stable_vault = next_account_info(account_iter)?;
    let authority_account = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;
    let feed_accounts = account_iter.as_slice();

    if !liquidator.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let config = load_config(program_id, config_account)?;
    let guard = enter_guard(program_id, guard_account)?;

    if debt_to_cover == 0 {
        return Err(EngineError::ZeroAmount.into());
    }
    let asset_index = config.asset_index(collateral_mint.key)?;
    let debt_raw: u64 = debt_to_cover
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;

    let mut target = load_position(program_id, target_position_account, target_user.key)?;
    let prices = oracle::read_all_prices(&config, feed_accounts)?;

    let starting_health_factor = health::health_factor(&config, &target, &prices)?;
    if starting_health_factor >= config.min_health_factor {
        msg!("Health factor ok: {}", starting_health_factor);
        return Err(EngineError::HealthFactorOk.into());
    }

    let seize = seizure_amount(
        &config,
        prices[asset_index],
        debt_to_cover,
        target.collateral(asset_index),
    )?;
    let seize_raw: u64 = seize
        .try_into()
        .map_err(|_| EngineError::ArithmeticOverflow)?;

    target.remove_collateral(asset_index, seize)?;
    target.remove_debt(debt_to_cover)?;
    save_position(&target, target_position_account)?;

    check_collateral_vault(program_id, vault_account, collateral_mint.key)?;
    check_engine_authority(program_id, authority_account)?;
    if *stable_mint.key != config.stable_mint {
        return Err(ProgramError::InvalidAccountData);
    }
    let (expected_stable_vault, _) = pda::derive_stable_vault(program_id);
    if *stable_vault.key != expected_stable_vault {
        return Err(ProgramError::InvalidAccountData);
    }

    let authority_seeds: &[&[&[u8]]] =
        &[&[pda::seeds::ENGINE_AUTHORITY, &[config.authority_bump]]];

    // seized collateral (incl. bonus) out to the liquidator
    cpi::spl_token::transfer(
        vault_account,
        liquidator_collateral_token,
        authority_account,
        seize_raw,
        token_program,
        authority_seeds,
    )
    .map_err(|_| EngineError::TransferFailed)?;

    // liquidator pays the covered debt, which is then burned
    cpi::spl_token::transfer(
        liquidator_stable_token,
        stable_vault,
        liquidator,
        debt_raw,
        token_program,
        &[],
    )
    .map_err(|_| EngineError::TransferFailed)?;
    cpi::spl_token::burn(
        stable_vault,
        stable_mint,
        authority_account,
        debt_raw,
        token_program,
        authority_seeds,
    )?;

    let ending_health_factor = health::health_factor(&config, &target, &prices)?;
    if ending_health_factor < starting_health_factor {
        msg!(
            "Health factor worsened: {} -> {}",
            starting_health_factor,
            ending_health_factor
        );
        return Err(EngineError::HealthFactorNotImproved.into());
    }

    // the liquidator's own position, if any, must stay healthy
    let (expected_liquidator_position, _) =
        pda::derive_user_position(program_id, liquidator.key);
    if *liquidator_position_account.key != expected_liquidator_position {
        return Err(ProgramError::InvalidAccountData);
    }
    if !liquidator_position_account.data_is_empty() {
        let liquidator_position =
            load_position(program_id, liquidator_position_account, liquidator.key)?;
        health::assert_healthy(&config, &liquidator_position, &prices)?;
    }

    CollateralRedeemed {
        from: *target_user.key,
        to: *liquidator.key,
        asset: *collateral_mint.key,
        amount: seize,
    }
    .log();
    StableBurned {
        on_behalf_of: *target_user.key,
        payer: *liquidator.key,
        amount: debt_to_cover,
    }
    .log();
    PositionLiquidated {
        target: *target_user.key,
        liquidator: *liquidator.key,
        asset: *collateral_mint.key,
        debt_covered: debt_to_cover,
        collateral_seized: seize,
    }
    .log();

    guard.exit()
}
