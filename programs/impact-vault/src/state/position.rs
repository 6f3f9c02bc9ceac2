use anchor_lang::prelude::*;

/// A depositor's stake in one vault
///
/// One UserPosition per depositor per vault. `total_deposited` is the cost
/// basis of the open position and is cleared when the position is redeemed;
/// `lifetime_deposited` keeps the full history.
#[account]
#[derive(Default)]
pub struct UserPosition {
    /// The vault this position belongs to
    pub vault: Pubkey,

    /// The depositor's wallet address
    pub owner: Pubkey,

    /// Shares currently held
    pub shares: u64,

    /// Assets deposited since the position was last redeemed
    pub total_deposited: u64,

    /// Assets deposited over the life of the account
    pub lifetime_deposited: u64,

    /// Realized profit across all redemptions
    pub total_profit_withdrawn: u64,

    /// Timestamp of the latest deposit
    pub last_deposit_at: i64,

    /// PDA bump seed
    pub bump: u8,
}

impl UserPosition {
    pub const LEN: usize = 8  // discriminator
        + 32  // vault
        + 32  // owner
        + 8   // shares
        + 8   // total_deposited
        + 8   // lifetime_deposited
        + 8   // total_profit_withdrawn
        + 8   // last_deposit_at
        + 1   // bump
        + 16; // padding

    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }
}
