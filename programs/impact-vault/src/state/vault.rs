use anchor_lang::prelude::*;

use crate::{
    constants::SHARE_PRICE_SCALE,
    errors::VaultError,
    math::{apply_bps, mul_div_floor, validate_bps},
};

use super::UserPosition;

/// Global vault state: the single aggregate every share-accounting
/// operation reads and commits.
///
/// - `idle_assets + allocated_assets` is the vault's total assets
/// - accumulated fees sit in the vault token account but are not idle assets
/// - authority stored in state (not instruction args)
/// - 32 bytes padding for future upgrades
#[account]
pub struct VaultState {
    /// Owner: governs parameters, pause flag and the agent allow-list
    pub authority: Pubkey,          // 32 bytes

    /// Mint of the underlying asset token
    pub asset_mint: Pubkey,         // 32 bytes

    /// Impact pool receiving donations from withdrawals
    pub impact_pool: Pubkey,        // 32 bytes

    /// Wallet entitled to accumulated withdrawal fees
    pub fee_recipient: Pubkey,      // 32 bytes

    /// The vault's asset ATA; the only account holding vault assets
    pub vault_token_account: Pubkey, // 32 bytes

    /// Assets held by the vault and available for withdrawal
    pub idle_assets: u64,           // 8 bytes

    /// Assets deployed to external trading wallets
    pub allocated_assets: u64,      // 8 bytes

    /// Total shares issued to depositors
    pub total_shares: u64,          // 8 bytes

    /// Withdrawal fees not yet paid out to the fee recipient
    pub accumulated_fees: u64,      // 8 bytes

    /// Smallest accepted deposit
    pub min_deposit: u64,           // 8 bytes

    /// Fee taken from realized profit on withdrawal
    pub withdrawal_fee_bps: u16,    // 2 bytes

    /// Cap on allocated assets as a share of total assets
    pub max_allocation_bps: u16,    // 2 bytes

    /// Circuit breaker for deposit, withdraw and allocation
    pub paused: bool,               // 1 byte

    /// Bump seed for vault state PDA
    pub bump: u8,                   // 1 byte

    /// Bump seed for vault authority PDA
    pub authority_bump: u8,         // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 32],        // 32 bytes
}

/// Outcome of redeeming a whole position, computed before anything is written
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawalQuote {
    pub shares_burned: u64,
    pub gross_assets: u64,
    pub profit: u64,
    pub fee: u64,
    pub donation: u64,
    pub net_to_user: u64,
}

/// Read-only view handed to clients for display
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VaultSnapshot {
    pub idle_assets: u64,
    pub allocated_assets: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    /// Scaled by `SHARE_PRICE_SCALE`
    pub share_price: u64,
    pub paused: bool,
    pub min_deposit: u64,
    pub accumulated_fees: u64,
    pub account_shares: u64,
    pub account_total_deposited: u64,
}

impl VaultState {
    pub const SPACE: usize = 8   // discriminator
        + 32                     // authority
        + 32                     // asset_mint
        + 32                     // impact_pool
        + 32                     // fee_recipient
        + 32                     // vault_token_account
        + 8                      // idle_assets
        + 8                      // allocated_assets
        + 8                      // total_shares
        + 8                      // accumulated_fees
        + 8                      // min_deposit
        + 2                      // withdrawal_fee_bps
        + 2                      // max_allocation_bps
        + 1                      // paused
        + 1                      // bump
        + 1                      // authority_bump
        + 32;                    // padding

    /// idle + allocated
    pub fn total_assets(&self) -> Result<u64> {
        self.idle_assets
            .checked_add(self.allocated_assets)
            .ok_or(error!(VaultError::MathOverflow))
    }

    /// Vault-side token accounts must be the recorded ATA. The pool token
    /// account shares mint and authority with it and is not interchangeable.
    pub fn is_vault_token_account(&self, account: &Pubkey) -> bool {
        self.vault_token_account == *account
    }

    pub fn require_not_paused(&self) -> Result<()> {
        require!(!self.paused, VaultError::VaultPaused);
        Ok(())
    }

    /// Calculate shares to mint for a given asset amount
    ///
    /// - If no shares exist: shares = assets
    /// - Otherwise: shares = floor(assets * totalShares / totalAssets)
    ///
    /// Flooring keeps rounding in the vault's favor.
    pub fn calculate_shares(&self, assets: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(assets);
        }

        mul_div_floor(assets, self.total_shares, self.total_assets()?)
    }

    /// Calculate asset value of shares: floor(shares * totalAssets / totalShares)
    pub fn calculate_assets(&self, shares: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(0);
        }

        mul_div_floor(shares, self.total_assets()?, self.total_shares)
    }

    /// Assets per share scaled by `SHARE_PRICE_SCALE`; an empty vault reports 1.0
    pub fn share_price(&self) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(SHARE_PRICE_SCALE);
        }

        mul_div_floor(self.total_assets()?, SHARE_PRICE_SCALE, self.total_shares)
    }

    /// How much more may be allocated before hitting `max_allocation_bps`
    pub fn allocation_headroom(&self) -> Result<u64> {
        let cap = apply_bps(self.total_assets()?, self.max_allocation_bps)?;
        Ok(cap.saturating_sub(self.allocated_assets))
    }

    /// Mint shares for `amount` and credit them to `position`. Returns shares minted.
    pub fn apply_deposit(&mut self, position: &mut UserPosition, amount: u64, now: i64) -> Result<u64> {
        // CHECKS
        self.require_not_paused()?;
        require!(amount > 0, VaultError::ZeroAmount);
        require!(amount >= self.min_deposit, VaultError::BelowMinDeposit);

        let shares = self.calculate_shares(amount)?;
        require!(shares > 0, VaultError::ZeroSharesMinted);

        let idle_assets = self
            .idle_assets
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        let position_shares = position
            .shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        let total_deposited = position
            .total_deposited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let lifetime_deposited = position
            .lifetime_deposited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        // EFFECTS
        self.idle_assets = idle_assets;
        self.total_shares = total_shares;
        position.shares = position_shares;
        position.total_deposited = total_deposited;
        position.lifetime_deposited = lifetime_deposited;
        position.last_deposit_at = now;

        Ok(shares)
    }

    /// Price a full redemption of `position` without touching state
    pub fn quote_withdrawal(&self, position: &UserPosition, donation_bps: u16) -> Result<WithdrawalQuote> {
        validate_bps(donation_bps)?;
        require!(position.shares > 0, VaultError::NoShares);

        let gross_assets = self.calculate_assets(position.shares)?;
        require!(
            gross_assets <= self.idle_assets,
            VaultError::InsufficientIdleLiquidity
        );

        let profit = gross_assets.saturating_sub(position.total_deposited);
        let fee = apply_bps(profit, self.withdrawal_fee_bps)?;
        let donation = apply_bps(profit - fee, donation_bps)?;
        let net_to_user = gross_assets - fee - donation;

        Ok(WithdrawalQuote {
            shares_burned: position.shares,
            gross_assets,
            profit,
            fee,
            donation,
            net_to_user,
        })
    }

    /// Redeem the whole position. The donation is left for the impact pool to record.
    pub fn apply_withdrawal(&mut self, position: &mut UserPosition, donation_bps: u16) -> Result<WithdrawalQuote> {
        // CHECKS
        self.require_not_paused()?;
        let quote = self.quote_withdrawal(position, donation_bps)?;

        let accumulated_fees = self
            .accumulated_fees
            .checked_add(quote.fee)
            .ok_or(VaultError::MathOverflow)?;
        let total_profit_withdrawn = position
            .total_profit_withdrawn
            .checked_add(quote.profit)
            .ok_or(VaultError::MathOverflow)?;

        // EFFECTS
        self.total_shares -= quote.shares_burned;
        self.idle_assets -= quote.gross_assets;
        self.accumulated_fees = accumulated_fees;
        position.shares = 0;
        position.total_deposited = 0;
        position.total_profit_withdrawn = total_profit_withdrawn;

        Ok(quote)
    }

    /// Move `amount` from idle to allocated, respecting the allocation cap
    pub fn apply_allocation(&mut self, amount: u64) -> Result<()> {
        self.require_not_paused()?;
        require!(amount > 0, VaultError::ZeroAmount);
        require!(
            amount <= self.idle_assets,
            VaultError::InsufficientIdleLiquidity
        );
        require!(
            amount <= self.allocation_headroom()?,
            VaultError::AllocationCapExceeded
        );

        self.idle_assets -= amount;
        self.allocated_assets += amount;
        Ok(())
    }

    /// Credit `amount` returned from a trading wallet. The declared
    /// `principal` comes off the allocated counter, floored at zero; the rest
    /// of `amount` is yield.
    pub fn apply_capital_return(&mut self, amount: u64, principal: u64) -> Result<()> {
        require!(amount > 0, VaultError::ZeroAmount);
        require!(principal <= amount, VaultError::ProfitExceedsReturn);

        let idle_assets = self
            .idle_assets
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        self.idle_assets = idle_assets;
        self.allocated_assets -= principal.min(self.allocated_assets);
        Ok(())
    }

    pub fn snapshot(&self, position: Option<&UserPosition>) -> Result<VaultSnapshot> {
        Ok(VaultSnapshot {
            idle_assets: self.idle_assets,
            allocated_assets: self.allocated_assets,
            total_assets: self.total_assets()?,
            total_shares: self.total_shares,
            share_price: self.share_price()?,
            paused: self.paused,
            min_deposit: self.min_deposit,
            accumulated_fees: self.accumulated_fees,
            account_shares: position.map_or(0, |p| p.shares),
            account_total_deposited: position.map_or(0, |p| p.total_deposited),
        })
    }

    pub fn set_min_deposit(&mut self, min_deposit: u64) -> Result<()> {
        require!(min_deposit > 0, VaultError::ZeroAmount);
        self.min_deposit = min_deposit;
        Ok(())
    }

    pub fn set_withdrawal_fee(&mut self, fee_bps: u16) -> Result<()> {
        validate_bps(fee_bps)?;
        self.withdrawal_fee_bps = fee_bps;
        Ok(())
    }

    /// Lowering the cap below current allocations only blocks new allocations
    pub fn set_max_allocation(&mut self, max_bps: u16) -> Result<()> {
        validate_bps(max_bps)?;
        self.max_allocation_bps = max_bps;
        Ok(())
    }

    /// Hand all accumulated fees out. Returns the amount released.
    pub fn take_fees(&mut self) -> Result<u64> {
        require!(self.accumulated_fees > 0, VaultError::NoFeesToWithdraw);
        let fees = self.accumulated_fees;
        self.accumulated_fees = 0;
        Ok(fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_vault(idle_assets: u64, allocated_assets: u64, total_shares: u64) -> VaultState {
        VaultState {
            authority: Pubkey::default(),
            asset_mint: Pubkey::default(),
            impact_pool: Pubkey::default(),
            fee_recipient: Pubkey::default(),
            vault_token_account: Pubkey::default(),
            idle_assets,
            allocated_assets,
            total_shares,
            accumulated_fees: 0,
            min_deposit: 1,
            withdrawal_fee_bps: 200,
            max_allocation_bps: 5_000,
            paused: false,
            bump: 0,
            authority_bump: 0,
            _reserved: [0; 32],
        }
    }

    fn mock_position(shares: u64, total_deposited: u64) -> UserPosition {
        UserPosition {
            vault: Pubkey::default(),
            owner: Pubkey::new_unique(),
            shares,
            total_deposited,
            lifetime_deposited: total_deposited,
            total_profit_withdrawn: 0,
            last_deposit_at: 0,
            bump: 0,
        }
    }

    #[test]
    fn test_first_deposit() {
        let vault = mock_vault(0, 0, 0);
        assert_eq!(vault.calculate_shares(1000).unwrap(), 1000);
    }

    #[test]
    fn test_deposit_counts_allocated_assets() {
        // 2000 total assets, half of it deployed
        let vault = mock_vault(1000, 1000, 1000);
        assert_eq!(vault.calculate_shares(500).unwrap(), 250);
        assert_eq!(vault.calculate_assets(500).unwrap(), 1000);
    }

    #[test]
    fn test_precision_loss() {
        let vault = mock_vault(1000, 0, 333);
        // shares = 100 * 333 / 1000 = 33 (integer division)
        assert_eq!(vault.calculate_shares(100).unwrap(), 33);
    }

    #[test]
    fn test_share_price() {
        assert_eq!(mock_vault(0, 0, 0).share_price().unwrap(), SHARE_PRICE_SCALE);
        assert_eq!(
            mock_vault(60, 50, 100).share_price().unwrap(),
            1_100_000_000
        );
    }

    #[test]
    fn test_allocation_headroom() {
        // cap = 50% of 1000
        assert_eq!(mock_vault(800, 200, 1000).allocation_headroom().unwrap(), 300);
        assert_eq!(mock_vault(400, 600, 1000).allocation_headroom().unwrap(), 0);
    }

    #[test]
    fn test_deposit_rejected_while_paused() {
        let mut vault = mock_vault(0, 0, 0);
        vault.paused = true;
        let mut position = mock_position(0, 0);

        let result = vault.apply_deposit(&mut position, 100, 0);
        assert_eq!(result.unwrap_err(), VaultError::VaultPaused.into());
        assert_eq!(vault.total_shares, 0);
        assert_eq!(position.shares, 0);
    }

    #[test]
    fn test_deposit_below_minimum() {
        let mut vault = mock_vault(0, 0, 0);
        vault.min_deposit = 1_000;
        let mut position = mock_position(0, 0);

        let result = vault.apply_deposit(&mut position, 999, 0);
        assert_eq!(result.unwrap_err(), VaultError::BelowMinDeposit.into());
    }

    #[test]
    fn test_dust_deposit_mints_nothing() {
        // price of 10 assets per share
        let mut vault = mock_vault(10_000, 0, 1_000);
        let mut position = mock_position(0, 0);

        let result = vault.apply_deposit(&mut position, 9, 0);
        assert_eq!(result.unwrap_err(), VaultError::ZeroSharesMinted.into());
        assert_eq!(vault.idle_assets, 10_000);
    }

    #[test]
    fn test_quote_without_profit() {
        let vault = mock_vault(1_000, 0, 1_000);
        let position = mock_position(400, 400);

        let quote = vault.quote_withdrawal(&position, 5_000).unwrap();
        assert_eq!(quote.gross_assets, 400);
        assert_eq!(quote.profit, 0);
        assert_eq!(quote.fee, 0);
        assert_eq!(quote.donation, 0);
        assert_eq!(quote.net_to_user, 400);
    }

    #[test]
    fn test_quote_splits_profit() {
        let vault = mock_vault(110, 0, 100);
        let position = mock_position(100, 100);

        let quote = vault.quote_withdrawal(&position, 1_000).unwrap();
        assert_eq!(quote.gross_assets, 110);
        assert_eq!(quote.profit, 10);
        // 2% of 10 floors to 0; 10% of 10 is 1
        assert_eq!(quote.fee, 0);
        assert_eq!(quote.donation, 1);
        assert_eq!(quote.net_to_user, 109);
    }

    #[test]
    fn test_quote_needs_idle_liquidity() {
        let vault = mock_vault(50, 60, 100);
        let position = mock_position(100, 100);

        let result = vault.quote_withdrawal(&position, 0);
        assert_eq!(
            result.unwrap_err(),
            VaultError::InsufficientIdleLiquidity.into()
        );
    }

    #[test]
    fn test_quote_rejects_bad_bps() {
        let vault = mock_vault(100, 0, 100);
        let position = mock_position(100, 100);

        assert_eq!(
            vault.quote_withdrawal(&position, 10_001).unwrap_err(),
            VaultError::InvalidBps.into()
        );
    }

    #[test]
    fn test_withdrawal_burns_position() {
        let mut vault = mock_vault(300, 0, 300);
        let mut position = mock_position(100, 100);

        let quote = vault.apply_withdrawal(&mut position, 0).unwrap();
        assert_eq!(quote.net_to_user, 100);
        assert_eq!(vault.total_shares, 200);
        assert_eq!(vault.idle_assets, 200);
        assert_eq!(position.shares, 0);
        assert_eq!(position.total_deposited, 0);
        assert_eq!(position.lifetime_deposited, 100);
    }

    #[test]
    fn test_withdrawal_without_shares() {
        let mut vault = mock_vault(300, 0, 300);
        let mut position = mock_position(0, 0);

        assert_eq!(
            vault.apply_withdrawal(&mut position, 0).unwrap_err(),
            VaultError::NoShares.into()
        );
    }

    #[test]
    fn test_allocation_cap() {
        let mut vault = mock_vault(1_000, 0, 1_000);

        assert_eq!(
            vault.apply_allocation(501).unwrap_err(),
            VaultError::AllocationCapExceeded.into()
        );
        vault.apply_allocation(500).unwrap();
        assert_eq!(vault.idle_assets, 500);
        assert_eq!(vault.allocated_assets, 500);
        assert_eq!(vault.total_assets().unwrap(), 1_000);
    }

    #[test]
    fn test_capital_return_with_profit() {
        let mut vault = mock_vault(60, 40, 100);

        vault.apply_capital_return(50, 40).unwrap();
        assert_eq!(vault.idle_assets, 110);
        assert_eq!(vault.allocated_assets, 0);
        assert_eq!(vault.share_price().unwrap(), 1_100_000_000);
    }

    #[test]
    fn test_capital_return_reduces_allocation_vault_wide() {
        // 40 sits at one wallet and 60 at another; 50 principal comes back
        let mut vault = mock_vault(0, 100, 100);

        vault.apply_capital_return(50, 50).unwrap();
        assert_eq!(vault.idle_assets, 50);
        assert_eq!(vault.allocated_assets, 50);
        assert_eq!(vault.share_price().unwrap(), SHARE_PRICE_SCALE);

        // Over-declared principal clears the counter instead of underflowing
        vault.apply_capital_return(80, 80).unwrap();
        assert_eq!(vault.allocated_assets, 0);
        assert_eq!(vault.idle_assets, 130);
    }

    #[test]
    fn test_snapshot() {
        let vault = mock_vault(60, 50, 100);
        let position = mock_position(40, 40);

        let snapshot = vault.snapshot(Some(&position)).unwrap();
        assert_eq!(snapshot.total_assets, 110);
        assert_eq!(snapshot.share_price, 1_100_000_000);
        assert_eq!(snapshot.account_shares, 40);
        assert_eq!(snapshot.account_total_deposited, 40);

        let anonymous = vault.snapshot(None).unwrap();
        assert_eq!(anonymous.account_shares, 0);
    }

    #[test]
    fn test_setters_validate_before_writing() {
        let mut vault = mock_vault(0, 0, 0);

        assert_eq!(
            vault.set_withdrawal_fee(10_001).unwrap_err(),
            VaultError::InvalidBps.into()
        );
        assert_eq!(vault.withdrawal_fee_bps, 200);
        assert_eq!(
            vault.set_max_allocation(20_000).unwrap_err(),
            VaultError::InvalidBps.into()
        );
        assert_eq!(vault.max_allocation_bps, 5_000);
        assert_eq!(vault.set_min_deposit(0).unwrap_err(), VaultError::ZeroAmount.into());
        assert_eq!(vault.min_deposit, 1);

        vault.set_withdrawal_fee(10_000).unwrap();
        vault.set_max_allocation(0).unwrap();
        vault.set_min_deposit(500).unwrap();
        assert_eq!(vault.withdrawal_fee_bps, 10_000);
        assert_eq!(vault.max_allocation_bps, 0);
        assert_eq!(vault.min_deposit, 500);
    }

    #[test]
    fn test_take_fees() {
        let mut vault = mock_vault(0, 0, 0);
        assert_eq!(vault.take_fees().unwrap_err(), VaultError::NoFeesToWithdraw.into());

        vault.accumulated_fees = 42;
        assert_eq!(vault.take_fees().unwrap(), 42);
        assert_eq!(vault.accumulated_fees, 0);
    }
}
