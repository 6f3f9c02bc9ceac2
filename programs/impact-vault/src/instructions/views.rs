// Read-only entry points. Results come back as instruction return data and
// are never gated by the pause flag.

use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, state::*};

#[derive(Accounts)]
pub struct VaultView<'info> {
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Position to report on, if any
    #[account(
        constraint = position.vault == vault_state.key() @ VaultError::InvalidOwner,
    )]
    pub position: Option<Account<'info, UserPosition>>,
}

pub fn preview_deposit_handler(ctx: Context<VaultView>, amount: u64) -> Result<u64> {
    ctx.accounts.vault_state.calculate_shares(amount)
}

pub fn preview_redeem_handler(ctx: Context<VaultView>, shares: u64) -> Result<u64> {
    ctx.accounts.vault_state.calculate_assets(shares)
}

pub fn preview_withdrawal_handler(
    ctx: Context<VaultView>,
    donation_bps: u16,
) -> Result<WithdrawalQuote> {
    let position = ctx
        .accounts
        .position
        .as_ref()
        .ok_or(VaultError::NoShares)?;
    ctx.accounts
        .vault_state
        .quote_withdrawal(position, donation_bps)
}

pub fn snapshot_handler(ctx: Context<VaultView>) -> Result<VaultSnapshot> {
    ctx.accounts
        .vault_state
        .snapshot(ctx.accounts.position.as_deref())
}
