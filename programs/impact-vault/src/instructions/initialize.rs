use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, events::*, math::validate_bps, state::*};

/// Launch parameters for a vault
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeVaultParams {
    pub min_deposit: u64,
    pub withdrawal_fee_bps: u16,
    pub max_allocation_bps: u16,
    pub fee_recipient: Pubkey,
}

/// Initialize a new vault and its impact pool for a given asset token
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Vault owner
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Vault state PDA
    /// Security: Initialized with proper space and padding for upgrades
    #[account(
        init,
        payer = authority,
        space = VaultState::SPACE,
        seeds = [VAULT_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// Asset token mint (the underlying token users deposit)
    pub asset_mint: Account<'info, Mint>,

    /// Vault authority PDA - owns the vault and pool token accounts
    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's token account for idle assets and accumulated fees
    #[account(
        init,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,

    /// Impact pool PDA
    #[account(
        init,
        payer = authority,
        space = ImpactPool::LEN,
        seeds = [IMPACT_POOL_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub impact_pool: Box<Account<'info, ImpactPool>>,

    /// Token account holding donated assets, separate from vault assets
    #[account(
        init,
        payer = authority,
        seeds = [POOL_TOKEN_SEED, vault_state.key().as_ref()],
        bump,
        token::mint = asset_mint,
        token::authority = vault_authority,
    )]
    pub pool_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, params: InitializeVaultParams) -> Result<()> {
    // CHECKS: Validate parameters
    validate_bps(params.withdrawal_fee_bps)?;
    validate_bps(params.max_allocation_bps)?;

    let vault_key = ctx.accounts.vault_state.key();
    let pool_key = ctx.accounts.impact_pool.key();

    // EFFECTS: Initialize impact pool
    ctx.accounts.impact_pool.set_inner(ImpactPool::fresh(
        vault_key,
        ctx.bumps.impact_pool,
        ctx.bumps.pool_token_account,
    ));

    // EFFECTS: Initialize vault state
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.authority = ctx.accounts.authority.key();
    vault_state.asset_mint = ctx.accounts.asset_mint.key();
    vault_state.impact_pool = pool_key;
    vault_state.fee_recipient = params.fee_recipient;
    vault_state.vault_token_account = ctx.accounts.vault_token_account.key();
    vault_state.idle_assets = 0;
    vault_state.allocated_assets = 0;
    vault_state.total_shares = 0;
    vault_state.accumulated_fees = 0;
    vault_state.set_min_deposit(params.min_deposit)?;
    vault_state.withdrawal_fee_bps = params.withdrawal_fee_bps;
    vault_state.max_allocation_bps = params.max_allocation_bps;
    vault_state.paused = false;
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.authority_bump = ctx.bumps.vault_authority;
    vault_state._reserved = [0; 32];

    emit!(VaultInitialized {
        vault: vault_key,
        authority: vault_state.authority,
        asset_mint: vault_state.asset_mint,
        impact_pool: pool_key,
        fee_recipient: vault_state.fee_recipient,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
