use anchor_lang::prelude::*;

/// Custom error codes for the Impact Vault program
///
/// Every variant belongs to exactly one [`ErrorKind`], which is what clients
/// use to decide how to report a failed transaction.
#[error_code]
pub enum VaultError {
    // Validation
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Deposit amount is below the vault minimum")]
    BelowMinDeposit,

    #[msg("Basis points must be between 0 and 10000")]
    InvalidBps,

    #[msg("Deposit is too small to mint a single share")]
    ZeroSharesMinted,

    #[msg("Reported profit cannot exceed the returned amount")]
    ProfitExceedsReturn,

    #[msg("Certificate and donor record must be supplied exactly when a donation is made")]
    CertificateAccountMismatch,

    #[msg("Token account is not the vault's asset account")]
    InvalidVaultTokenAccount,

    #[msg("Invalid token mint - does not match vault asset")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Token account is not owned by the fee recipient")]
    InvalidFeeRecipient,

    #[msg("Trading wallet cannot be a vault-owned token account")]
    InvalidTradingWallet,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Cannot divide by zero - vault has no shares")]
    DivisionByZero,

    // State
    #[msg("Vault is paused")]
    VaultPaused,

    #[msg("Account holds no vault shares")]
    NoShares,

    #[msg("Not enough idle assets in the vault")]
    InsufficientIdleLiquidity,

    #[msg("Allocation would exceed the maximum allocation of total assets")]
    AllocationCapExceeded,

    #[msg("Unauthorized - only vault authority can perform this action")]
    Unauthorized,

    #[msg("Caller is not an authorized agent")]
    UnauthorizedAgent,

    #[msg("Agent is already authorized")]
    AgentAlreadyAuthorized,

    #[msg("Agent not found in registry")]
    AgentNotFound,

    #[msg("Agent registry is full - maximum agents reached")]
    RegistryFull,

    #[msg("Too many trading wallets hold allocated capital")]
    TradingWalletLimitReached,

    #[msg("Donor balance in the impact pool is too low")]
    InsufficientPoolBalance,

    #[msg("Certificate belongs to another account")]
    NotCertificateOwner,

    #[msg("No accumulated fees to withdraw")]
    NoFeesToWithdraw,

    // Already done
    #[msg("Certificate has already been minted")]
    CertificateAlreadyMinted,

    // Transfer
    #[msg("Underlying asset transfer failed")]
    TransferFailed,
}

/// Coarse classification of [`VaultError`] for callers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: amounts, bps ranges, mismatched accounts, arithmetic limits
    Validation,
    /// Operation not allowed in the current ledger state or for this caller
    State,
    /// One-shot transition was already performed
    AlreadyDone,
    /// Underlying token transfer failed
    Transfer,
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        use VaultError::*;

        match self {
            ZeroAmount
            | BelowMinDeposit
            | InvalidBps
            | ZeroSharesMinted
            | ProfitExceedsReturn
            | CertificateAccountMismatch
            | InvalidVaultTokenAccount
            | InvalidMint
            | InvalidOwner
            | InvalidFeeRecipient
            | InvalidTradingWallet
            | MathOverflow
            | DivisionByZero => ErrorKind::Validation,

            VaultPaused
            | NoShares
            | InsufficientIdleLiquidity
            | AllocationCapExceeded
            | Unauthorized
            | UnauthorizedAgent
            | AgentAlreadyAuthorized
            | AgentNotFound
            | RegistryFull
            | TradingWalletLimitReached
            | InsufficientPoolBalance
            | NotCertificateOwner
            | NoFeesToWithdraw => ErrorKind::State,

            CertificateAlreadyMinted => ErrorKind::AlreadyDone,

            TransferFailed => ErrorKind::Transfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(VaultError::InvalidBps.kind(), ErrorKind::Validation);
        assert_eq!(VaultError::InvalidVaultTokenAccount.kind(), ErrorKind::Validation);
        assert_eq!(VaultError::InsufficientIdleLiquidity.kind(), ErrorKind::State);
        assert_eq!(VaultError::UnauthorizedAgent.kind(), ErrorKind::State);
        assert_eq!(VaultError::CertificateAlreadyMinted.kind(), ErrorKind::AlreadyDone);
        assert_eq!(VaultError::TransferFailed.kind(), ErrorKind::Transfer);
    }
}
