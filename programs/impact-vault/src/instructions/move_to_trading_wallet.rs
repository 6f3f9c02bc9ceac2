use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{constants::*, errors::*, events::*, state::*, transfers};

/// Deploy idle vault assets to an external trading wallet
///
/// - Agent-only: the signer must be in the vault's agent registry
/// - Bounded by idle assets and by `max_allocation_bps` of total assets
/// - Tracks principal per wallet so it can be recalled later
#[derive(Accounts)]
pub struct MoveToTradingWallet<'info> {
    pub agent: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Security: allow-list checked first thing in the handler
    #[account(
        mut,
        seeds = [AGENT_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = agent_registry.bump,
    )]
    pub agent_registry: Account<'info, AgentRegistry>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's token account (source of capital)
    #[account(
        mut,
        constraint = vault_state.is_vault_token_account(&vault_token_account.key()) @ VaultError::InvalidVaultTokenAccount,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Trading wallet token account (destination)
    #[account(
        mut,
        constraint = trading_wallet.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = trading_wallet.owner != vault_authority.key() @ VaultError::InvalidTradingWallet,
    )]
    pub trading_wallet: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<MoveToTradingWallet>, amount: u64) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    let registry = &mut ctx.accounts.agent_registry;
    let wallet = ctx.accounts.trading_wallet.key();

    // CHECKS
    registry.require_agent(&ctx.accounts.agent.key())?;

    // CHECKS + EFFECTS
    vault_state.apply_allocation(amount)?;
    registry.track_allocation(&wallet, amount)?;

    // INTERACTIONS
    transfers::allocate_to_wallet(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.trading_wallet.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        &vault_state.asset_mint,
        vault_state.authority_bump,
        amount,
    )?;

    emit!(CapitalAllocated {
        vault: vault_state.key(),
        agent: ctx.accounts.agent.key(),
        wallet,
        amount,
        idle_assets: vault_state.idle_assets,
        allocated_assets: vault_state.allocated_assets,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
