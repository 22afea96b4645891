//! Event records
//!
//! Borsh-serializable records logged at the end of each state-mutating
//! operation. A redemption with `from != to` is a liquidation seizure.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CollateralDeposited {
    pub user: Pubkey,
    pub asset: Pubkey,
    pub amount: u128,
}

impl CollateralDeposited {
    pub fn log(&self) {
        msg!(
            "collateral_deposited user={} asset={} amount={}",
            self.user,
            self.asset,
            self.amount
        );
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CollateralRedeemed {
    pub from: Pubkey,
    pub to: Pubkey,
    pub asset: Pubkey,
    pub amount: u128,
}

impl CollateralRedeemed {
    pub fn log(&self) {
        msg!(
            "collateral_redeemed from={} to={} asset={} amount={}",
            self.from,
            self.to,
            self.asset,
            self.amount
        );
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct StableMinted {
    pub user: Pubkey,
    pub amount: u128,
}

impl StableMinted {
    pub fn log(&self) {
        msg!("stable_minted user={} amount={}", self.user, self.amount);
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct StableBurned {
    pub on_behalf_of: Pubkey,
    pub payer: Pubkey,
    pub amount: u128,
}

impl StableBurned {
    pub fn log(&self) {
        msg!(
            "stable_burned on_behalf_of={} payer={} amount={}",
            self.on_behalf_of,
            self.payer,
            self.amount
        );
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct PositionLiquidated {
    pub target: Pubkey,
    pub liquidator: Pubkey,
    pub asset: Pubkey,
    pub debt_covered: u128,
    pub collateral_seized: u128,
}

impl PositionLiquidated {
    pub fn log(&self) {
        msg!(
            "position_liquidated target={} liquidator={} asset={} debt_covered={} collateral_seized={}",
            self.target,
            self.liquidator,
            self.asset,
            self.debt_covered,
            self.collateral_seized
        );
    }
}
