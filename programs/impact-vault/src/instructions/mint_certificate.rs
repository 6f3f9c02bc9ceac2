use anchor_lang::prelude::*;

use crate::{constants::*, events::*, state::*};

/// Turn an unminted certificate into a numbered token, at most once
#[derive(Accounts)]
#[instruction(certificate_id: u64)]
pub struct MintCertificate<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [IMPACT_POOL_SEED, impact_pool.vault.as_ref()],
        bump = impact_pool.bump,
    )]
    pub impact_pool: Account<'info, ImpactPool>,

    #[account(
        mut,
        seeds = [
            CERTIFICATE_SEED,
            impact_pool.key().as_ref(),
            &certificate_id.to_le_bytes(),
        ],
        bump,
    )]
    pub certificate: Account<'info, Certificate>,
}

pub fn handler(ctx: Context<MintCertificate>, certificate_id: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    let token_id = ctx
        .accounts
        .impact_pool
        .mint_certificate(&mut ctx.accounts.certificate, &owner, now)?;

    emit!(CertificateMinted {
        pool: ctx.accounts.impact_pool.key(),
        owner,
        certificate_id,
        token_id,
        timestamp: now,
    });

    Ok(())
}
