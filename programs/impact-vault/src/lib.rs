// Impact Vault - share-based yield vault with an attached donation pool
// Capital is deployed by allow-listed agents to off-chain trading wallets;
// on redemption part of the realized profit can be routed to the impact pool.
#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;
pub mod transfers;

use instructions::*;
use state::{VaultSnapshot, WithdrawalQuote};

declare_id!("9iwRU5czUGyFyDnfHHWzCUeQt7E7MWRJLJ1EXsGZgJrT");

#[program]
pub mod impact_vault {
    use super::*;

    /// Initialize a new vault and its impact pool for a given asset token
    ///
    /// Security considerations:
    /// - Validates authority is signer
    /// - Validates fee and allocation caps are within 0..=10000 bps
    /// - Creates vault and pool token accounts owned by the vault authority PDA
    pub fn initialize(ctx: Context<Initialize>, params: InitializeVaultParams) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Deposit assets into the vault and receive shares
    ///
    /// Security considerations:
    /// - Validates user token accounts (mint, owner)
    /// - Uses checked math for share calculation
    /// - Follows checks-effects-interactions pattern
    /// - Emits event for tracking
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Redeem the caller's whole position
    ///
    /// Profit above the caller's cost basis pays the withdrawal fee, then
    /// `donation_bps` of what remains goes to the impact pool.
    ///
    /// Security considerations:
    /// - Position PDA is bound to the signer
    /// - Fails when idle liquidity cannot cover the payout
    /// - Donation certificate account must be present exactly when a donation occurs
    pub fn withdraw_profits(ctx: Context<WithdrawProfits>, donation_bps: u16) -> Result<()> {
        instructions::withdraw_profits::handler(ctx, donation_bps)
    }

    /// Move idle capital to a trading wallet
    ///
    /// Security considerations:
    /// - Agent-only function (registry allow-list)
    /// - Bounded by idle assets and the allocation cap
    /// - Tracks principal per trading wallet
    pub fn move_to_trading_wallet(ctx: Context<MoveToTradingWallet>, amount: u64) -> Result<()> {
        instructions::move_to_trading_wallet::handler(ctx, amount)
    }

    /// Return capital from a trading wallet, part of it reported as profit
    pub fn return_capital(
        ctx: Context<ReturnCapital>,
        amount: u64,
        reported_profit: u64,
    ) -> Result<()> {
        instructions::return_capital::handler(ctx, amount, reported_profit)
    }

    /// Return a trading wallet's entire balance
    pub fn return_all_capital(ctx: Context<ReturnCapital>) -> Result<()> {
        instructions::return_capital::return_all_handler(ctx)
    }

    /// Add an agent to the allow-list
    ///
    /// Security considerations:
    /// - Authority-only function
    /// - Rejects duplicates and enforces registry size limits
    /// - Emits event for tracking
    pub fn add_agent(ctx: Context<AddAgent>, agent: Pubkey) -> Result<()> {
        instructions::agents::add_agent_handler(ctx, agent)
    }

    /// Remove an agent from the allow-list
    pub fn remove_agent(ctx: Context<RemoveAgent>, agent: Pubkey) -> Result<()> {
        instructions::agents::remove_agent_handler(ctx, agent)
    }

    pub fn set_min_deposit(ctx: Context<UpdateVault>, min_deposit: u64) -> Result<()> {
        instructions::admin::set_min_deposit_handler(ctx, min_deposit)
    }

    pub fn set_withdrawal_fee(ctx: Context<UpdateVault>, fee_bps: u16) -> Result<()> {
        instructions::admin::set_withdrawal_fee_handler(ctx, fee_bps)
    }

    pub fn set_max_allocation(ctx: Context<UpdateVault>, max_bps: u16) -> Result<()> {
        instructions::admin::set_max_allocation_handler(ctx, max_bps)
    }

    pub fn set_fee_recipient(ctx: Context<UpdateVault>, fee_recipient: Pubkey) -> Result<()> {
        instructions::admin::set_fee_recipient_handler(ctx, fee_recipient)
    }

    /// Halt deposits, withdrawals and allocations
    ///
    /// Security considerations:
    /// - Authority-only function
    /// - Capital returns and pool operations stay open so funds can come home
    pub fn pause(ctx: Context<UpdateVault>) -> Result<()> {
        instructions::admin::set_paused_handler(ctx, true)
    }

    pub fn unpause(ctx: Context<UpdateVault>) -> Result<()> {
        instructions::admin::set_paused_handler(ctx, false)
    }

    pub fn transfer_authority(ctx: Context<UpdateVault>, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_authority_handler(ctx, new_authority)
    }

    /// Pay accumulated withdrawal fees to the fee recipient
    pub fn withdraw_fees(ctx: Context<WithdrawFees>) -> Result<()> {
        instructions::admin::withdraw_fees_handler(ctx)
    }

    pub fn set_donation_rate(ctx: Context<SetDonationRate>, rate_bps: u16) -> Result<()> {
        instructions::donation::set_donation_rate_handler(ctx, rate_bps)
    }

    /// Donate directly to the impact pool and receive a certificate
    pub fn donate(ctx: Context<Donate>, amount: u64) -> Result<()> {
        instructions::donation::donate_handler(ctx, amount)
    }

    /// Mint a donation certificate
    ///
    /// Security considerations:
    /// - Only the certificate owner may mint
    /// - A certificate can be minted at most once
    pub fn mint_certificate(ctx: Context<MintCertificate>, certificate_id: u64) -> Result<()> {
        instructions::mint_certificate::handler(ctx, certificate_id)
    }

    /// Take back part of the caller's unspent donations
    pub fn withdraw_from_pool(ctx: Context<WithdrawFromPool>, amount: u64) -> Result<()> {
        instructions::donation::withdraw_from_pool_handler(ctx, amount)
    }

    pub fn preview_deposit(ctx: Context<VaultView>, amount: u64) -> Result<u64> {
        instructions::views::preview_deposit_handler(ctx, amount)
    }

    pub fn preview_redeem(ctx: Context<VaultView>, shares: u64) -> Result<u64> {
        instructions::views::preview_redeem_handler(ctx, shares)
    }

    pub fn preview_withdrawal(
        ctx: Context<VaultView>,
        donation_bps: u16,
    ) -> Result<WithdrawalQuote> {
        instructions::views::preview_withdrawal_handler(ctx, donation_bps)
    }

    /// Vault totals plus the given position's shares and cost basis
    pub fn get_vault_snapshot(ctx: Context<VaultView>) -> Result<VaultSnapshot> {
        instructions::views::snapshot_handler(ctx)
    }
}
