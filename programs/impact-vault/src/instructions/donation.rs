use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{constants::*, errors::*, events::*, state::*, transfers};

/// Store the caller's default donation rate
#[derive(Accounts)]
pub struct SetDonationRate<'info> {
    #[account(mut)]
    pub donor: Signer<'info>,

    #[account(
        seeds = [IMPACT_POOL_SEED, impact_pool.vault.as_ref()],
        bump = impact_pool.bump,
    )]
    pub impact_pool: Account<'info, ImpactPool>,

    #[account(
        init_if_needed,
        payer = donor,
        space = DonorRecord::LEN,
        seeds = [DONOR_SEED, impact_pool.key().as_ref(), donor.key().as_ref()],
        bump
    )]
    pub donor_record: Account<'info, DonorRecord>,

    pub system_program: Program<'info, System>,
}

pub fn set_donation_rate_handler(ctx: Context<SetDonationRate>, rate_bps: u16) -> Result<()> {
    let pool_key = ctx.accounts.impact_pool.key();
    let donor_key = ctx.accounts.donor.key();
    let record = &mut ctx.accounts.donor_record;

    if !record.is_initialized() {
        record.pool = pool_key;
        record.owner = donor_key;
        record.bump = ctx.bumps.donor_record;
    }
    record.set_donation_rate(rate_bps)?;

    emit!(DonationRateUpdated {
        pool: pool_key,
        donor: donor_key,
        rate_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Donate assets straight into the impact pool
///
/// Issues an unminted certificate the donor can mint later.
#[derive(Accounts)]
pub struct Donate<'info> {
    #[account(mut)]
    pub donor: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    #[account(
        mut,
        address = vault_state.impact_pool,
        seeds = [IMPACT_POOL_SEED, vault_state.key().as_ref()],
        bump = impact_pool.bump,
    )]
    pub impact_pool: Box<Account<'info, ImpactPool>>,

    #[account(
        mut,
        seeds = [POOL_TOKEN_SEED, vault_state.key().as_ref()],
        bump = impact_pool.token_bump,
    )]
    pub pool_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = donor_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = donor_asset_account.owner == donor.key() @ VaultError::InvalidOwner,
    )]
    pub donor_asset_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = donor,
        space = DonorRecord::LEN,
        seeds = [DONOR_SEED, impact_pool.key().as_ref(), donor.key().as_ref()],
        bump
    )]
    pub donor_record: Box<Account<'info, DonorRecord>>,

    #[account(
        init,
        payer = donor,
        space = Certificate::LEN,
        seeds = [
            CERTIFICATE_SEED,
            impact_pool.key().as_ref(),
            &impact_pool.next_certificate_id.to_le_bytes(),
        ],
        bump
    )]
    pub certificate: Box<Account<'info, Certificate>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn donate_handler(ctx: Context<Donate>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let pool_key = ctx.accounts.impact_pool.key();
    let donor_key = ctx.accounts.donor.key();

    let record = &mut ctx.accounts.donor_record;
    if !record.is_initialized() {
        record.pool = pool_key;
        record.owner = donor_key;
        record.bump = ctx.bumps.donor_record;
    }

    // EFFECTS
    let issued = ctx
        .accounts
        .impact_pool
        .record_donation(record, amount, now)?;
    let certificate_id = issued.id;
    ctx.accounts.certificate.set_inner(issued);

    // INTERACTIONS
    transfers::transfer_in(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.donor_asset_account.to_account_info(),
        ctx.accounts.pool_token_account.to_account_info(),
        ctx.accounts.donor.to_account_info(),
        amount,
    )?;

    emit!(DonationRecorded {
        pool: pool_key,
        donor: donor_key,
        certificate_id,
        amount,
        total_pool_balance: ctx.accounts.impact_pool.total_pool_balance,
        timestamp: now,
    });

    Ok(())
}

/// Pull part of the caller's unspent donation back out of the pool
#[derive(Accounts)]
pub struct WithdrawFromPool<'info> {
    pub donor: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        address = vault_state.impact_pool,
        seeds = [IMPACT_POOL_SEED, vault_state.key().as_ref()],
        bump = impact_pool.bump,
    )]
    pub impact_pool: Box<Account<'info, ImpactPool>>,

    #[account(
        mut,
        seeds = [POOL_TOKEN_SEED, vault_state.key().as_ref()],
        bump = impact_pool.token_bump,
    )]
    pub pool_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [DONOR_SEED, impact_pool.key().as_ref(), donor.key().as_ref()],
        bump = donor_record.bump,
        constraint = donor_record.owner == donor.key() @ VaultError::InvalidOwner,
    )]
    pub donor_record: Box<Account<'info, DonorRecord>>,

    #[account(
        mut,
        constraint = donor_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = donor_asset_account.owner == donor.key() @ VaultError::InvalidOwner,
    )]
    pub donor_asset_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn withdraw_from_pool_handler(ctx: Context<WithdrawFromPool>, amount: u64) -> Result<()> {
    // CHECKS + EFFECTS
    ctx.accounts
        .impact_pool
        .release_to_donor(&mut ctx.accounts.donor_record, amount)?;

    // INTERACTIONS
    transfers::transfer_out(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.pool_token_account.to_account_info(),
        ctx.accounts.donor_asset_account.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        &ctx.accounts.vault_state.asset_mint,
        ctx.accounts.vault_state.authority_bump,
        amount,
    )?;

    emit!(PoolWithdrawal {
        pool: ctx.accounts.impact_pool.key(),
        donor: ctx.accounts.donor.key(),
        amount,
        remaining_balance: ctx.accounts.donor_record.balance,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
