use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{constants::*, errors::*, events::*, state::*, transfers};

/// Redeem the caller's whole position, splitting realized profit into
/// fee, donation and payout
///
/// The donor record and certificate accounts are optional: pass both exactly
/// when the quoted donation is nonzero (see `preview_withdrawal`).
#[derive(Accounts)]
pub struct WithdrawProfits<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
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
        seeds = [POSITION_SEED, vault_state.key().as_ref(), user.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub position: Box<Account<'info, UserPosition>>,

    #[account(
        mut,
        constraint = vault_state.is_vault_token_account(&vault_token_account.key()) @ VaultError::InvalidVaultTokenAccount,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = user_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = user_asset_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_asset_account: Box<Account<'info, TokenAccount>>,

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
        init_if_needed,
        payer = user,
        space = DonorRecord::LEN,
        seeds = [DONOR_SEED, impact_pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub donor_record: Option<Account<'info, DonorRecord>>,

    #[account(
        init,
        payer = user,
        space = Certificate::LEN,
        seeds = [
            CERTIFICATE_SEED,
            impact_pool.key().as_ref(),
            &impact_pool.next_certificate_id.to_le_bytes(),
        ],
        bump
    )]
    pub certificate: Option<Account<'info, Certificate>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<WithdrawProfits>, donation_bps: u16) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let pool_key = ctx.accounts.impact_pool.key();
    let user_key = ctx.accounts.user.key();

    // CHECKS + EFFECTS: burn shares and carve out fee and donation
    let quote = ctx
        .accounts
        .vault_state
        .apply_withdrawal(&mut ctx.accounts.position, donation_bps)?;

    if let Some(donor) = ctx.accounts.donor_record.as_mut() {
        if !donor.is_initialized() {
            donor.pool = pool_key;
            donor.owner = user_key;
            donor.bump = Pubkey::find_program_address(
                &[DONOR_SEED, pool_key.as_ref(), user_key.as_ref()],
                ctx.program_id,
            )
            .1;
        }
    }

    let certificate_supplied = ctx.accounts.certificate.is_some();
    let issued = ctx.accounts.impact_pool.settle_withdrawal(
        quote.donation,
        ctx.accounts.donor_record.as_deref_mut(),
        certificate_supplied,
        now,
    )?;

    let certificate_id = issued.as_ref().map(|c| c.id);
    if let (Some(issued), Some(certificate)) = (issued, ctx.accounts.certificate.as_mut()) {
        certificate.set_inner(issued);
    }

    // INTERACTIONS
    let asset_mint = ctx.accounts.vault_state.asset_mint;
    let authority_bump = ctx.accounts.vault_state.authority_bump;

    transfers::transfer_out(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.user_asset_account.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        &asset_mint,
        authority_bump,
        quote.net_to_user,
    )?;

    transfers::transfer_out(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.pool_token_account.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        &asset_mint,
        authority_bump,
        quote.donation,
    )?;

    if let Some(id) = certificate_id {
        emit!(DonationRecorded {
            pool: pool_key,
            donor: user_key,
            certificate_id: id,
            amount: quote.donation,
            total_pool_balance: ctx.accounts.impact_pool.total_pool_balance,
            timestamp: now,
        });
    }

    emit!(ProfitsWithdrawn {
        vault: ctx.accounts.vault_state.key(),
        user: user_key,
        shares_burned: quote.shares_burned,
        gross_assets: quote.gross_assets,
        profit: quote.profit,
        fee: quote.fee,
        donation: quote.donation,
        net_to_user: quote.net_to_user,
        certificate_id,
        timestamp: now,
    });

    Ok(())
}
