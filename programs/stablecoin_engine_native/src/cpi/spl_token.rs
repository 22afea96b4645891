//! SPL Token program CPI helpers

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    program::{invoke, invoke_signed},
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use spl_token::{instruction as token_instruction, state::Account as TokenAccount};

/// SPL Token program ID
pub const TOKEN_PROGRAM_ID: Pubkey = spl_token::ID;

/// Create and initialize a token account at a PDA owned by `owner`
pub fn create_token_account<'a>(
    payer: &AccountInfo<'a>,
    token_account: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    owner: &Pubkey,
    token_program: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    signer_seeds: &[&[&[u8]]],
) -> ProgramResult {
    let rent = Rent::get()?;
    let account_rent = rent.minimum_balance(TokenAccount::LEN);

    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            token_account.key,
            account_rent,
            TokenAccount::LEN as u64,
            &TOKEN_PROGRAM_ID,
        ),
        &[payer.clone(), token_account.clone(), system_program.clone()],
        signer_seeds,
    )?;

    invoke(
        &token_instruction::initialize_account3(
            &TOKEN_PROGRAM_ID,
            token_account.key,
            mint.key,
            owner,
        )?,
        &[token_account.clone(), mint.clone()],
    )?;

    Ok(())
}

/// Transfer SPL tokens
pub fn transfer<'a>(
    source: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
    token_program: &AccountInfo<'a>,
    signer_seeds: &[&[&[u8]]],
) -> ProgramResult {
    let instruction = token_instruction::transfer(
        &TOKEN_PROGRAM_ID,
        source.key,
        destination.key,
        authority.key,
        &[],
        amount,
    )?;

    if signer_seeds.is_empty() {
        invoke(
            &instruction,
            &[source.clone(), destination.clone(), authority.clone()],
        )
    } else {
        invoke_signed(
            &instruction,
            &[source.clone(), destination.clone(), authority.clone()],
            signer_seeds,
        )
    }
}

/// Mint new tokens
pub fn mint_to<'a>(
    mint: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    mint_authority: &AccountInfo<'a>,
    amount: u64,
    token_program: &AccountInfo<'a>,
    signer_seeds: &[&[&[u8]]],
) -> ProgramResult {
    let instruction = token_instruction::mint_to(
        &TOKEN_PROGRAM_ID,
        mint.key,
        destination.key,
        mint_authority.key,
        &[],
        amount,
    )?;

    if signer_seeds.is_empty() {
        invoke(
            &instruction,
            &[mint.clone(), destination.clone(), mint_authority.clone()],
        )
    } else {
        invoke_signed(
            &instruction,
            &[mint.clone(), destination.clone(), mint_authority.clone()],
            signer_seeds,
        )
    }
}

/// Burn tokens
pub fn burn<'a>(
    token_account: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
    token_program: &AccountInfo<'a>,
    signer_seeds: &[&[&[u8]]],
) -> ProgramResult {
    let instruction = token_instruction::burn(
        &TOKEN_PROGRAM_ID,
        token_account.key,
        mint.key,
        authority.key,
        &[],
        amount,
    )?;

    if signer_seeds.is_empty() {
        invoke(
            &instruction,
            &[token_account.clone(), mint.clone(), authority.clone()],
        )
    } else {
        invoke_signed(
            &instruction,
            &[token_account.clone(), mint.clone(), authority.clone()],
            signer_seeds,
        )
    }
}
