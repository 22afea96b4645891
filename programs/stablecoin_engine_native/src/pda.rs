//! Program derived address derivations

use solana_program::pubkey::Pubkey;

/// PDA seed constants
pub mod seeds {
    pub const ENGINE_CONFIG: &[u8] = b"engine_config";
    pub const ENGINE_GUARD: &[u8] = b"engine_guard";
    pub const ENGINE_AUTHORITY: &[u8] = b"engine_authority";
    pub const USER_POSITION: &[u8] = b"user_position";
    pub const COLLATERAL_VAULT: &[u8] = b"collateral_vault";
    pub const STABLE_VAULT: &[u8] = b"stable_vault";
}

/// Engine config account
pub fn derive_engine_config(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::ENGINE_CONFIG], program_id)
}

/// Reentrancy guard account
pub fn derive_engine_guard(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::ENGINE_GUARD], program_id)
}

/// Authority over vaults and the pegged mint
pub fn derive_engine_authority(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::ENGINE_AUTHORITY], program_id)
}

/// Per-user position account
pub fn derive_user_position(program_id: &Pubkey, user: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::USER_POSITION, user.as_ref()], program_id)
}

/// Vault token account holding one collateral asset
pub fn derive_collateral_vault(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::COLLATERAL_VAULT, mint.as_ref()], program_id)
}

/// Vault token account holding pegged units pulled in for burning
pub fn derive_stable_vault(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::STABLE_VAULT], program_id)
}
