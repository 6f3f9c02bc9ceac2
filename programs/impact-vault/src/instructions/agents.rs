use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Add an agent to the allow-list
#[derive(Accounts)]
pub struct AddAgent<'info> {
    /// Vault authority - only they can manage agents
    /// Security: Must be signer and match vault_state.authority
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Security: has_one constraint validates authority from state
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Agent registry PDA
    /// Security: Initialized on first add_agent call
    #[account(
        init_if_needed,
        payer = authority,
        space = AgentRegistry::SPACE,
        seeds = [AGENT_REGISTRY_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub agent_registry: Account<'info, AgentRegistry>,

    pub system_program: Program<'info, System>,
}

/// Remove an agent from the allow-list
#[derive(Accounts)]
pub struct RemoveAgent<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        seeds = [AGENT_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = agent_registry.bump,
    )]
    pub agent_registry: Account<'info, AgentRegistry>,
}

pub fn add_agent_handler(ctx: Context<AddAgent>, agent: Pubkey) -> Result<()> {
    let registry = &mut ctx.accounts.agent_registry;

    // Initialize registry if first time
    if registry.vault == Pubkey::default() {
        registry.vault = ctx.accounts.vault_state.key();
        registry.bump = ctx.bumps.agent_registry;
        registry.agents = Vec::new();
        registry.trading_wallets = Vec::new();
    }

    registry.add_agent(agent)?;

    emit!(AgentAdded {
        vault: registry.vault,
        agent,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Capital an agent already moved stays tracked per wallet, so any
/// remaining agent can still recall it.
pub fn remove_agent_handler(ctx: Context<RemoveAgent>, agent: Pubkey) -> Result<()> {
    let registry = &mut ctx.accounts.agent_registry;

    registry.remove_agent(&agent)?;

    emit!(AgentRemoved {
        vault: registry.vault,
        agent,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
