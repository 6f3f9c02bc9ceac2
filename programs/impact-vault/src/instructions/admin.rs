use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{constants::*, errors::*, events::*, state::*, transfers};

/// Owner-gated parameter change on the vault state
/// Only callable by vault authority
#[derive(Accounts)]
pub struct UpdateVault<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,
}

fn emit_config(vault_state: &Account<VaultState>) -> Result<()> {
    emit!(VaultConfigUpdated {
        vault: vault_state.key(),
        min_deposit: vault_state.min_deposit,
        withdrawal_fee_bps: vault_state.withdrawal_fee_bps,
        max_allocation_bps: vault_state.max_allocation_bps,
        fee_recipient: vault_state.fee_recipient,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn set_min_deposit_handler(ctx: Context<UpdateVault>, min_deposit: u64) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.set_min_deposit(min_deposit)?;
    emit_config(vault_state)
}

pub fn set_withdrawal_fee_handler(ctx: Context<UpdateVault>, fee_bps: u16) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.set_withdrawal_fee(fee_bps)?;
    emit_config(vault_state)
}

pub fn set_max_allocation_handler(ctx: Context<UpdateVault>, max_bps: u16) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.set_max_allocation(max_bps)?;
    emit_config(vault_state)
}

/// Fees already accumulated go to whoever is recipient at payout time
pub fn set_fee_recipient_handler(ctx: Context<UpdateVault>, fee_recipient: Pubkey) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.fee_recipient = fee_recipient;
    emit_config(vault_state)
}

/// Pause/unpause deposits, withdrawals and allocations (emergency use)
pub fn set_paused_handler(ctx: Context<UpdateVault>, paused: bool) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.paused = paused;

    emit!(PauseToggled {
        vault: vault_state.key(),
        paused,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Transfer vault authority to new address
pub fn transfer_authority_handler(ctx: Context<UpdateVault>, new_authority: Pubkey) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    let old_authority = vault_state.authority;
    vault_state.authority = new_authority;

    emit!(AuthorityTransferred {
        vault: vault_state.key(),
        old_authority,
        new_authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Pay accumulated withdrawal fees out to the fee recipient
#[derive(Accounts)]
pub struct WithdrawFees<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = vault_state.is_vault_token_account(&vault_token_account.key()) @ VaultError::InvalidVaultTokenAccount,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = fee_recipient_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = fee_recipient_account.owner == vault_state.fee_recipient @ VaultError::InvalidFeeRecipient,
        constraint = fee_recipient_account.owner != vault_authority.key() @ VaultError::InvalidFeeRecipient,
    )]
    pub fee_recipient_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn withdraw_fees_handler(ctx: Context<WithdrawFees>) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;

    // EFFECTS
    let amount = vault_state.take_fees()?;

    // INTERACTIONS
    transfers::transfer_out(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.fee_recipient_account.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        &vault_state.asset_mint,
        vault_state.authority_bump,
        amount,
    )?;

    emit!(FeesWithdrawn {
        vault: vault_state.key(),
        recipient: vault_state.fee_recipient,
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
