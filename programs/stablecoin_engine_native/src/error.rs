//! Error types for the stablecoin engine

use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Custom error type for the stablecoin engine
#[derive(Clone, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum EngineError {
    // Validation errors (6000-6009)
    #[error("Amount must be greater than zero")]
    ZeroAmount = 6000,

    #[error("Token is not an allowed collateral asset")]
    AssetNotAllowed = 6001,

    #[error("Collateral mint and price feed lists differ in length")]
    ConfigLengthMismatch = 6002,

    // Solvency errors (6010-6019)
    #[error("Health factor below minimum")]
    HealthFactorBroken = 6010,

    #[error("Health factor is ok, position cannot be liquidated")]
    HealthFactorOk = 6011,

    #[error("Health factor not improved by liquidation")]
    HealthFactorNotImproved = 6012,

    // External collaborator errors (6020-6029)
    #[error("Token transfer failed")]
    TransferFailed = 6020,

    #[error("Token mint failed")]
    MintFailed = 6021,

    #[error("Price feed unavailable for asset")]
    OracleUnavailable = 6022,

    #[error("Price feed returned an invalid price")]
    InvalidOraclePrice = 6023,

    #[error("Division by zero")]
    DivideByZero = 6024,

    // Contract violations (6030-6039)
    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 6030,

    #[error("Redeem amount exceeds deposited collateral")]
    InsufficientCollateral = 6031,

    #[error("Burn amount exceeds recorded debt")]
    BurnExceedsDebt = 6032,

    #[error("Reentrancy detected")]
    ReentrancyDetected = 6033,

    #[error("Invalid reentrancy guard state")]
    InvalidGuardState = 6034,
}

impl From<EngineError> for ProgramError {
    fn from(e: EngineError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for EngineError {
    fn type_of() -> &'static str {
        "EngineError"
    }
}

impl PrintProgramError for EngineError {
    fn print<E>(&self)
    where
        E: 'static + std::error::Error + DecodeError<E> + PrintProgramError + num_traits::FromPrimitive,
    {
        msg!("{}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn test_error_codes_round_trip() {
        let err: ProgramError = EngineError::AssetNotAllowed.into();
        assert_eq!(err, ProgramError::Custom(6001));

        let decoded = EngineError::from_u32(6012).unwrap();
        assert_eq!(decoded, EngineError::HealthFactorNotImproved);
    }
}
