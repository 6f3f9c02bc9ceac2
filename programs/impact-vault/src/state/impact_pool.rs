use anchor_lang::prelude::*;

use crate::{
    constants::FIRST_CERTIFICATE_ID,
    errors::VaultError,
    math::validate_bps,
};

/// Donation pool fed by vault withdrawals and direct donations
///
/// Certificate ids and token ids are separate counters: ids are handed out
/// when a donation is recorded, token ids only when a certificate is minted.
#[account]
pub struct ImpactPool {
    /// Vault routing donations into this pool
    pub vault: Pubkey,

    /// Assets currently held for donors
    pub total_pool_balance: u64,

    /// All donations ever received
    pub total_donated: u64,

    /// Id the next certificate will receive
    pub next_certificate_id: u64,

    /// Token id the next minted certificate will receive
    pub next_token_id: u64,

    pub bump: u8,

    /// Bump of the pool token account PDA
    pub token_bump: u8,
}

/// A donor's standing in the impact pool
#[account]
#[derive(Default)]
pub struct DonorRecord {
    pub pool: Pubkey,
    pub owner: Pubkey,

    /// Advisory default for withdrawals; the per-call rate is what applies
    pub donation_rate_bps: u16,

    /// Donated assets the donor may still pull back
    pub balance: u64,

    pub total_donated: u64,
    pub certificate_count: u64,
    pub bump: u8,
}

/// Proof that a donation happened
#[account]
#[derive(Debug)]
pub struct Certificate {
    pub pool: Pubkey,
    pub id: u64,
    pub owner: Pubkey,

    /// Donated value, fixed at creation
    pub amount: u64,

    pub timestamp: i64,
    pub status: CertificateStatus,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CertificateStatus {
    Unminted,
    Minted { token_id: u64, minted_at: i64 },
}

impl ImpactPool {
    pub const LEN: usize = 8  // discriminator
        + 32  // vault
        + 8   // total_pool_balance
        + 8   // total_donated
        + 8   // next_certificate_id
        + 8   // next_token_id
        + 1   // bump
        + 1   // token_bump
        + 32; // padding

    /// Credit `amount` to the pool on behalf of `donor` and draft the
    /// certificate that proves it. The caller persists the certificate.
    pub fn record_donation(
        &mut self,
        donor: &mut DonorRecord,
        amount: u64,
        now: i64,
    ) -> Result<Certificate> {
        require!(amount > 0, VaultError::ZeroAmount);

        let id = self.next_certificate_id;
        let next_certificate_id = id.checked_add(1).ok_or(VaultError::MathOverflow)?;
        let total_pool_balance = self
            .total_pool_balance
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let pool_total_donated = self
            .total_donated
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let balance = donor
            .balance
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let donor_total_donated = donor
            .total_donated
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let certificate_count = donor
            .certificate_count
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;

        self.next_certificate_id = next_certificate_id;
        self.total_pool_balance = total_pool_balance;
        self.total_donated = pool_total_donated;
        donor.balance = balance;
        donor.total_donated = donor_total_donated;
        donor.certificate_count = certificate_count;

        Ok(Certificate {
            pool: donor.pool,
            id,
            owner: donor.owner,
            amount,
            timestamp: now,
            status: CertificateStatus::Unminted,
        })
    }

    /// Route the donation carved out of a withdrawal. The donor record and
    /// certificate accounts come together, and only when `donation` is
    /// nonzero; a zero donation issues nothing.
    pub fn settle_withdrawal(
        &mut self,
        donation: u64,
        donor: Option<&mut DonorRecord>,
        certificate_supplied: bool,
        now: i64,
    ) -> Result<Option<Certificate>> {
        let donating = donation > 0;
        require!(
            donating == certificate_supplied && donating == donor.is_some(),
            VaultError::CertificateAccountMismatch
        );

        match donor {
            Some(donor) => self.record_donation(donor, donation, now).map(Some),
            None => Ok(None),
        }
    }

    /// Give `certificate` the next token id. Fails without side effects if it
    /// belongs to someone else or was minted already.
    pub fn mint_certificate(
        &mut self,
        certificate: &mut Certificate,
        caller: &Pubkey,
        now: i64,
    ) -> Result<u64> {
        require_keys_eq!(certificate.owner, *caller, VaultError::NotCertificateOwner);
        if let CertificateStatus::Minted { .. } = certificate.status {
            return err!(VaultError::CertificateAlreadyMinted);
        }

        let token_id = self.next_token_id;
        let next_token_id = token_id.checked_add(1).ok_or(VaultError::MathOverflow)?;

        self.next_token_id = next_token_id;
        certificate.status = CertificateStatus::Minted {
            token_id,
            minted_at: now,
        };

        Ok(token_id)
    }

    /// Pull `amount` of a donor's unspent contribution back out of the pool
    pub fn release_to_donor(&mut self, donor: &mut DonorRecord, amount: u64) -> Result<()> {
        require!(amount > 0, VaultError::ZeroAmount);
        require!(amount <= donor.balance, VaultError::InsufficientPoolBalance);
        require!(
            amount <= self.total_pool_balance,
            VaultError::InsufficientPoolBalance
        );

        donor.balance -= amount;
        self.total_pool_balance -= amount;
        Ok(())
    }

    pub fn fresh(vault: Pubkey, bump: u8, token_bump: u8) -> Self {
        Self {
            vault,
            total_pool_balance: 0,
            total_donated: 0,
            next_certificate_id: FIRST_CERTIFICATE_ID,
            next_token_id: FIRST_CERTIFICATE_ID,
            bump,
            token_bump,
        }
    }
}

impl DonorRecord {
    pub const LEN: usize = 8  // discriminator
        + 32  // pool
        + 32  // owner
        + 2   // donation_rate_bps
        + 8   // balance
        + 8   // total_donated
        + 8   // certificate_count
        + 1   // bump
        + 16; // padding

    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn set_donation_rate(&mut self, bps: u16) -> Result<()> {
        validate_bps(bps)?;
        self.donation_rate_bps = bps;
        Ok(())
    }
}

impl Certificate {
    pub const LEN: usize = 8  // discriminator
        + 32  // pool
        + 8   // id
        + 32  // owner
        + 8   // amount
        + 8   // timestamp
        + 1 + 8 + 8 // status (tag + token_id + minted_at)
        + 16; // padding

    pub fn is_minted(&self) -> bool {
        matches!(self.status, CertificateStatus::Minted { .. })
    }

    pub fn token_id(&self) -> Option<u64> {
        match self.status {
            CertificateStatus::Minted { token_id, .. } => Some(token_id),
            CertificateStatus::Unminted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ImpactPool {
        ImpactPool::fresh(Pubkey::new_unique(), 0, 0)
    }

    fn donor(pool: &ImpactPool) -> DonorRecord {
        DonorRecord {
            pool: pool.vault,
            owner: Pubkey::new_unique(),
            ..Default::default()
        }
    }

    #[test]
    fn test_certificate_ids_are_monotonic() {
        let mut pool = pool();
        let mut donor = donor(&pool);

        let first = pool.record_donation(&mut donor, 10, 1).unwrap();
        let second = pool.record_donation(&mut donor, 20, 2).unwrap();

        assert_eq!(first.id, FIRST_CERTIFICATE_ID);
        assert_eq!(second.id, FIRST_CERTIFICATE_ID + 1);
        assert_eq!(second.status, CertificateStatus::Unminted);
        assert_eq!(pool.total_pool_balance, 30);
        assert_eq!(donor.balance, 30);
        assert_eq!(donor.total_donated, 30);
        assert_eq!(donor.certificate_count, 2);
    }

    #[test]
    fn test_zero_donation_rejected() {
        let mut pool = pool();
        let mut donor = donor(&pool);

        assert_eq!(
            pool.record_donation(&mut donor, 0, 0).unwrap_err(),
            VaultError::ZeroAmount.into()
        );
        assert_eq!(pool.next_certificate_id, FIRST_CERTIFICATE_ID);
    }

    #[test]
    fn test_withdrawal_with_donation_issues_certificate() {
        let mut pool = pool();
        let mut donor = donor(&pool);

        let issued = pool
            .settle_withdrawal(98, Some(&mut donor), true, 7)
            .unwrap()
            .unwrap();
        assert_eq!(issued.id, FIRST_CERTIFICATE_ID);
        assert_eq!(issued.amount, 98);
        assert_eq!(issued.owner, donor.owner);
        assert_eq!(pool.total_pool_balance, 98);
        assert_eq!(donor.certificate_count, 1);
    }

    #[test]
    fn test_withdrawal_without_donation_issues_nothing() {
        let mut pool = pool();

        // Zero donation rate or zero profit both quote a zero donation
        assert!(pool.settle_withdrawal(0, None, false, 7).unwrap().is_none());
        assert_eq!(pool.next_certificate_id, FIRST_CERTIFICATE_ID);
        assert_eq!(pool.total_donated, 0);
    }

    #[test]
    fn test_certificate_account_must_match_donation() {
        let mut pool = pool();
        let mut donor = donor(&pool);

        // Certificate supplied but nothing to donate
        assert_eq!(
            pool.settle_withdrawal(0, Some(&mut donor), true, 7).unwrap_err(),
            VaultError::CertificateAccountMismatch.into()
        );
        // Donation quoted but no certificate account
        assert_eq!(
            pool.settle_withdrawal(98, Some(&mut donor), false, 7).unwrap_err(),
            VaultError::CertificateAccountMismatch.into()
        );
        // Donation and certificate but no donor record
        assert_eq!(
            pool.settle_withdrawal(98, None, true, 7).unwrap_err(),
            VaultError::CertificateAccountMismatch.into()
        );

        assert_eq!(pool.next_certificate_id, FIRST_CERTIFICATE_ID);
        assert_eq!(pool.total_pool_balance, 0);
        assert_eq!(donor.balance, 0);
        assert_eq!(donor.certificate_count, 0);
    }

    #[test]
    fn test_mint_exactly_once() {
        let mut pool = pool();
        let mut donor = donor(&pool);
        let mut certificate = pool.record_donation(&mut donor, 98, 1).unwrap();

        let token_id = pool.mint_certificate(&mut certificate, &donor.owner, 5).unwrap();
        assert_eq!(certificate.token_id(), Some(token_id));

        let again = pool.mint_certificate(&mut certificate, &donor.owner, 6);
        assert_eq!(again.unwrap_err(), VaultError::CertificateAlreadyMinted.into());
        assert_eq!(
            certificate.status,
            CertificateStatus::Minted {
                token_id,
                minted_at: 5
            }
        );
        assert_eq!(pool.next_token_id, token_id + 1);
    }

    #[test]
    fn test_mint_requires_owner() {
        let mut pool = pool();
        let mut donor = donor(&pool);
        let mut certificate = pool.record_donation(&mut donor, 98, 1).unwrap();

        let result = pool.mint_certificate(&mut certificate, &Pubkey::new_unique(), 5);
        assert_eq!(result.unwrap_err(), VaultError::NotCertificateOwner.into());
        assert!(!certificate.is_minted());
    }

    #[test]
    fn test_release_bounded_by_donor_balance() {
        let mut pool = pool();
        let mut alice = donor(&pool);
        let mut bob = donor(&pool);
        pool.record_donation(&mut alice, 100, 1).unwrap();
        pool.record_donation(&mut bob, 50, 1).unwrap();

        assert_eq!(
            pool.release_to_donor(&mut bob, 60).unwrap_err(),
            VaultError::InsufficientPoolBalance.into()
        );
        pool.release_to_donor(&mut bob, 50).unwrap();
        assert_eq!(bob.balance, 0);
        assert_eq!(bob.total_donated, 50);
        assert_eq!(pool.total_pool_balance, 100);
    }

    #[test]
    fn test_donation_rate_range() {
        let mut record = DonorRecord::default();
        record.set_donation_rate(2_500).unwrap();
        assert_eq!(record.donation_rate_bps, 2_500);
        assert_eq!(
            record.set_donation_rate(10_001).unwrap_err(),
            VaultError::InvalidBps.into()
        );
        assert_eq!(record.donation_rate_bps, 2_500);
    }
}
