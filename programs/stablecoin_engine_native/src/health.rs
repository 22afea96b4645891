//! Health factor calculation
//!
//! Combines the collateral ledger (valued through the price feeds) and the
//! debt ledger into a solvency ratio. A position with zero debt is
//! unconditionally healthy: the ratio is pinned to a maximum sentinel and
//! the division never runs.

use solana_program::{msg, program_error::ProgramError};

use crate::{
    constants::{MAX_HEALTH_FACTOR, PRECISION},
    error::EngineError,
    math::mul_div,
    oracle,
    state::{EngineConfig, UserPosition},
};

/// Debt and collateral value snapshot for one position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountInformation {
    /// Pegged units minted
    pub debt: u128,

    /// Total collateral value in 18-decimal USD
    pub collateral_value_usd: u128,
}

/// Sums the USD value of every deposited asset. `prices` is parallel to the
/// config's asset list.
pub fn collateral_value_usd(
    config: &EngineConfig,
    position: &UserPosition,
    prices: &[i64],
) -> Result<u128, ProgramError> {
    if prices.len() != config.asset_count() {
        return Err(EngineError::OracleUnavailable.into());
    }

    let mut total: u128 = 0;
    for (index, price) in prices.iter().enumerate() {
        let deposited = position.collateral(index);
        if deposited == 0 {
            continue;
        }
        let value = oracle::usd_value(*price, deposited)?;
        total = total
            .checked_add(value)
            .ok_or(EngineError::ArithmeticOverflow)?;
    }
    Ok(total)
}

/// Debt plus collateral value for one position
pub fn account_information(
    config: &EngineConfig,
    position: &UserPosition,
    prices: &[i64],
) -> Result<AccountInformation, ProgramError> {
    Ok(AccountInformation {
        debt: position.debt,
        collateral_value_usd: collateral_value_usd(config, position, prices)?,
    })
}

/// Solvency ratio in 18-decimal fixed point:
/// `(collateral_usd * threshold / threshold_precision) * 1e18 / debt`
pub fn health_factor_from_parts(
    config: &EngineConfig,
    debt: u128,
    collateral_usd: u128,
) -> Result<u128, ProgramError> {
    if debt == 0 {
        return Ok(MAX_HEALTH_FACTOR);
    }

    let adjusted = mul_div(
        collateral_usd,
        config.liquidation_threshold as u128,
        config.liquidation_precision as u128,
    )?;
    Ok(mul_div(adjusted, PRECISION, debt)?)
}

/// Health factor of a position at the given prices
pub fn health_factor(
    config: &EngineConfig,
    position: &UserPosition,
    prices: &[i64],
) -> Result<u128, ProgramError> {
    let collateral_usd = collateral_value_usd(config, position, prices)?;
    health_factor_from_parts(config, position.debt, collateral_usd)
}

/// Fails with `HealthFactorBroken` when the position is below the minimum
pub fn assert_healthy(
    config: &EngineConfig,
    position: &UserPosition,
    prices: &[i64],
) -> Result<(), ProgramError> {
    let ratio = health_factor(config, position, prices)?;
    if ratio < config.min_health_factor {
        msg!("Health factor broken: {}", ratio);
        return Err(EngineError::HealthFactorBroken.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::pubkey::Pubkey;

    const ETH_PRICE: i64 = 2_000_00000000;
    const BTC_PRICE: i64 = 40_000_00000000;

    fn test_config(asset_count: usize) -> EngineConfig {
        EngineConfig::try_new(
            Pubkey::new_unique(),
            255,
            vec![Pubkey::new_unique(); asset_count],
            vec![Pubkey::new_unique(); asset_count],
        )
        .unwrap()
    }

    #[test]
    fn test_zero_debt_is_unconditionally_healthy() {
        let config = test_config(1);
        let position = UserPosition::new(Pubkey::new_unique(), 1);

        let ratio = health_factor(&config, &position, &[ETH_PRICE]).unwrap();
        assert_eq!(ratio, MAX_HEALTH_FACTOR);
        assert!(assert_healthy(&config, &position, &[ETH_PRICE]).is_ok());
    }

    #[test]
    fn test_collateral_value_sums_over_assets() {
        let config = test_config(2);
        let mut position = UserPosition::new(Pubkey::new_unique(), 2);
        position.add_collateral(0, 10 * PRECISION).unwrap(); // $20,000
        position.add_collateral(1, PRECISION / 2).unwrap(); // $20,000

        let value = collateral_value_usd(&config, &position, &[ETH_PRICE, BTC_PRICE]).unwrap();
        assert_eq!(value, 40_000 * PRECISION);

        let info = account_information(&config, &position, &[ETH_PRICE, BTC_PRICE]).unwrap();
        assert_eq!(info.debt, 0);
        assert_eq!(info.collateral_value_usd, 40_000 * PRECISION);
    }

    #[test]
    fn test_health_factor_at_exact_minimum() {
        let config = test_config(1);
        let mut position = UserPosition::new(Pubkey::new_unique(), 1);
        // $20,000 collateral, threshold-adjusted to $10,000, against
        // 10,000 units of debt: ratio is exactly 1.0
        position.add_collateral(0, 10 * PRECISION).unwrap();
        position.add_debt(10_000 * PRECISION).unwrap();

        let ratio = health_factor(&config, &position, &[ETH_PRICE]).unwrap();
        assert_eq!(ratio, PRECISION);
        assert!(assert_healthy(&config, &position, &[ETH_PRICE]).is_ok());
    }

    #[test]
    fn test_health_factor_breaks_below_minimum() {
        let config = test_config(1);
        let mut position = UserPosition::new(Pubkey::new_unique(), 1);
        position.add_collateral(0, 10 * PRECISION).unwrap();
        position.add_debt(10_001 * PRECISION).unwrap();

        let ratio = health_factor(&config, &position, &[ETH_PRICE]).unwrap();
        assert!(ratio < PRECISION);
        assert_eq!(
            assert_healthy(&config, &position, &[ETH_PRICE]).unwrap_err(),
            EngineError::HealthFactorBroken.into()
        );
    }

    #[test]
    fn test_health_factor_moves_with_price() {
        let config = test_config(1);
        let mut position = UserPosition::new(Pubkey::new_unique(), 1);
        position.add_collateral(0, 10 * PRECISION).unwrap();
        position.add_debt(5_000 * PRECISION).unwrap();

        let at_2000 = health_factor(&config, &position, &[ETH_PRICE]).unwrap();
        let at_1000 = health_factor(&config, &position, &[ETH_PRICE / 2]).unwrap();
        assert_eq!(at_2000, 2 * PRECISION);
        assert_eq!(at_1000, PRECISION);
    }

    #[test]
    fn test_price_vector_length_must_match() {
        let config = test_config(2);
        let position = UserPosition::new(Pubkey::new_unique(), 2);

        assert_eq!(
            collateral_value_usd(&config, &position, &[ETH_PRICE]).unwrap_err(),
            EngineError::OracleUnavailable.into()
        );
    }
}
