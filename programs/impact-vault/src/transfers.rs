// Base-asset movement. Every path the program takes to move tokens goes
// through here so transfer failures surface as VaultError::TransferFailed.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::{constants::VAULT_AUTHORITY_SEED, errors::VaultError};

/// Move `amount` with a wallet-signed authority (user or agent)
pub fn transfer_in<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let transfer_ctx = CpiContext::new(token_program, Transfer { from, to, authority });
    token::transfer(transfer_ctx, amount).map_err(|err| {
        msg!("transfer in of {} failed: {:?}", amount, err);
        error!(VaultError::TransferFailed)
    })
}

/// Move `amount` out of an account owned by the vault authority PDA
pub fn transfer_out<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    vault_authority: AccountInfo<'info>,
    asset_mint: &Pubkey,
    authority_bump: u8,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[authority_seeds];

    let transfer_ctx = CpiContext::new_with_signer(
        token_program,
        Transfer {
            from,
            to,
            authority: vault_authority,
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount).map_err(|err| {
        msg!("transfer out of {} failed: {:?}", amount, err);
        error!(VaultError::TransferFailed)
    })
}

/// Send idle capital to an external trading wallet
pub fn allocate_to_wallet<'info>(
    token_program: AccountInfo<'info>,
    vault_token_account: AccountInfo<'info>,
    wallet: AccountInfo<'info>,
    vault_authority: AccountInfo<'info>,
    asset_mint: &Pubkey,
    authority_bump: u8,
    amount: u64,
) -> Result<()> {
    transfer_out(
        token_program,
        vault_token_account,
        wallet,
        vault_authority,
        asset_mint,
        authority_bump,
        amount,
    )
}

/// Pull capital back from a trading wallet; the agent signs for the wallet
pub fn recall_from_wallet<'info>(
    token_program: AccountInfo<'info>,
    wallet: AccountInfo<'info>,
    vault_token_account: AccountInfo<'info>,
    agent: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    transfer_in(token_program, wallet, vault_token_account, agent, amount)
}
