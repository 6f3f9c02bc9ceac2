use anchor_lang::prelude::*;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub impact_pool: Pubkey,
    pub fee_recipient: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub asset_amount: u64,
    pub shares_minted: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when a position is redeemed
#[event]
pub struct ProfitsWithdrawn {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub shares_burned: u64,
    pub gross_assets: u64,
    pub profit: u64,
    pub fee: u64,
    pub donation: u64,
    pub net_to_user: u64,
    pub certificate_id: Option<u64>,
    pub timestamp: i64,
}

/// Event emitted when capital leaves for a trading wallet
#[event]
pub struct CapitalAllocated {
    pub vault: Pubkey,
    pub agent: Pubkey,
    pub wallet: Pubkey,
    pub amount: u64,
    pub idle_assets: u64,
    pub allocated_assets: u64,
    pub timestamp: i64,
}

/// Event emitted when a trading wallet sends capital back
#[event]
pub struct CapitalReturned {
    pub vault: Pubkey,
    pub agent: Pubkey,
    pub wallet: Pubkey,
    pub amount: u64,
    pub principal: u64,
    pub profit: u64,
    pub idle_assets: u64,
    pub allocated_assets: u64,
    pub timestamp: i64,
}

#[event]
pub struct AgentAdded {
    pub vault: Pubkey,
    pub agent: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct AgentRemoved {
    pub vault: Pubkey,
    pub agent: Pubkey,
    pub timestamp: i64,
}

/// Event emitted whenever a governance parameter changes
#[event]
pub struct VaultConfigUpdated {
    pub vault: Pubkey,
    pub min_deposit: u64,
    pub withdrawal_fee_bps: u16,
    pub max_allocation_bps: u16,
    pub fee_recipient: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PauseToggled {
    pub vault: Pubkey,
    pub paused: bool,
    pub timestamp: i64,
}

#[event]
pub struct FeesWithdrawn {
    pub vault: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct AuthorityTransferred {
    pub vault: Pubkey,
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a donation lands in the impact pool
#[event]
pub struct DonationRecorded {
    pub pool: Pubkey,
    pub donor: Pubkey,
    pub certificate_id: u64,
    pub amount: u64,
    pub total_pool_balance: u64,
    pub timestamp: i64,
}

#[event]
pub struct CertificateMinted {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub certificate_id: u64,
    pub token_id: u64,
    pub timestamp: i64,
}

#[event]
pub struct DonationRateUpdated {
    pub pool: Pubkey,
    pub donor: Pubkey,
    pub rate_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct PoolWithdrawal {
    pub pool: Pubkey,
    pub donor: Pubkey,
    pub amount: u64,
    pub remaining_balance: u64,
    pub timestamp: i64,
}
