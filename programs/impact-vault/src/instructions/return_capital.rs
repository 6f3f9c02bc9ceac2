use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{constants::*, errors::*, events::*, state::*, transfers};

/// Bring capital back from a trading wallet
///
/// The agent signs for the trading wallet. Returned principal reduces the
/// vault's allocated counter whichever wallet it comes from; anything
/// reported as profit is new yield for every shareholder.
#[derive(Accounts)]
pub struct ReturnCapital<'info> {
    pub agent: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

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

    #[account(
        mut,
        constraint = vault_state.is_vault_token_account(&vault_token_account.key()) @ VaultError::InvalidVaultTokenAccount,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Trading wallet token account (source)
    #[account(
        mut,
        constraint = trading_wallet.mint == vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub trading_wallet: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Split a return of `amount` with `reported_profit` into (principal, profit)
pub fn split_return(amount: u64, reported_profit: u64) -> Result<(u64, u64)> {
    require!(amount > 0, VaultError::ZeroAmount);
    require!(
        reported_profit <= amount,
        VaultError::ProfitExceedsReturn
    );
    Ok((amount - reported_profit, reported_profit))
}

/// Treat the wallet's whole balance as the return: principal up to what the
/// registry says the wallet holds, the remainder as profit
pub fn split_full_return(balance: u64, outstanding: u64) -> Result<(u64, u64)> {
    require!(balance > 0, VaultError::ZeroAmount);
    let principal = balance.min(outstanding);
    Ok((principal, balance - principal))
}

pub fn handler(ctx: Context<ReturnCapital>, amount: u64, reported_profit: u64) -> Result<()> {
    let (principal, _) = split_return(amount, reported_profit)?;
    settle(ctx, amount, principal)
}

pub fn return_all_handler(ctx: Context<ReturnCapital>) -> Result<()> {
    let wallet = ctx.accounts.trading_wallet.key();
    let balance = ctx.accounts.trading_wallet.amount;
    let outstanding = ctx
        .accounts
        .agent_registry
        .get_wallet(&wallet)
        .map_or(0, |w| w.allocated);

    let (principal, profit) = split_full_return(balance, outstanding)?;
    msg!(
        "Returning all capital from {}: principal {}, profit {}",
        wallet,
        principal,
        profit
    );
    settle(ctx, balance, principal)
}

fn settle(ctx: Context<ReturnCapital>, amount: u64, principal: u64) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    let registry = &mut ctx.accounts.agent_registry;
    let wallet = ctx.accounts.trading_wallet.key();

    // CHECKS
    registry.require_agent(&ctx.accounts.agent.key())?;

    // EFFECTS: vault-wide counter first, then the per-wallet books
    vault_state.apply_capital_return(amount, principal)?;
    registry.release_capital(&wallet, principal, amount - principal)?;

    // INTERACTIONS
    transfers::recall_from_wallet(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.trading_wallet.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.agent.to_account_info(),
        amount,
    )?;

    emit!(CapitalReturned {
        vault: vault_state.key(),
        agent: ctx.accounts.agent.key(),
        wallet,
        amount,
        principal,
        profit: amount - principal,
        idle_assets: vault_state.idle_assets,
        allocated_assets: vault_state.allocated_assets,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
