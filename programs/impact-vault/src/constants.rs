// Constants for the Impact Vault program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the PDA that owns the vault and pool token accounts
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for per-user position PDA
pub const POSITION_SEED: &[u8] = b"position";

/// Seed for the agent registry PDA
pub const AGENT_REGISTRY_SEED: &[u8] = b"agent_registry";

/// Seed for the impact pool PDA
pub const IMPACT_POOL_SEED: &[u8] = b"impact_pool";

/// Seed for the impact pool token account PDA
pub const POOL_TOKEN_SEED: &[u8] = b"pool_tokens";

/// Seed for per-user donor record PDA
pub const DONOR_SEED: &[u8] = b"donor";

/// Seed for certificate PDAs (followed by the little-endian certificate id)
pub const CERTIFICATE_SEED: &[u8] = b"certificate";

/// 100% in basis points
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Fixed-point scale used when reporting share price (1.0 == 10^9)
pub const SHARE_PRICE_SCALE: u64 = 1_000_000_000;

/// Maximum number of authorized agents
pub const MAX_AGENTS: usize = 10;

/// Maximum number of trading wallets with outstanding allocations
pub const MAX_TRADING_WALLETS: usize = 10;

/// Certificate ids and token ids both start here
pub const FIRST_CERTIFICATE_ID: u64 = 1;
