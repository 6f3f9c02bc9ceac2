use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_AGENTS, MAX_TRADING_WALLETS},
    errors::VaultError,
};

/// Agent allow-list and trading-wallet ledger for a vault
///
/// - Authority adds/removes agents via instructions
/// - Only listed agents may move capital between idle and allocated
/// - Tracks principal outstanding per trading wallet so capital can be
///   recalled wallet by wallet
#[account]
pub struct AgentRegistry {
    /// Vault this registry belongs to
    pub vault: Pubkey,              // 32 bytes

    /// Addresses allowed to allocate and return capital
    pub agents: Vec<Pubkey>,        // 4 + (n * 32) bytes

    /// Wallets currently holding vault capital
    pub trading_wallets: Vec<TradingWallet>, // 4 + (n * 48) bytes

    /// Bump seed for PDA
    pub bump: u8,                   // 1 byte
}

/// Capital outstanding at one trading wallet
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct TradingWallet {
    /// Token account holding the allocated assets
    pub wallet: Pubkey,             // 32 bytes

    /// Principal currently allocated to this wallet
    pub allocated: u64,             // 8 bytes

    /// Profit reported on returns from this wallet
    pub profit_reported: u64,       // 8 bytes
}

impl AgentRegistry {
    /// 8 (discriminator) + 32 (vault) + 4 + (10 * 32) + 4 + (10 * 48) + 1 (bump) + 64 (padding)
    pub const SPACE: usize = 8 + 32 + 4 + (MAX_AGENTS * 32) + 4 + (MAX_TRADING_WALLETS * 48) + 1 + 64;

    pub fn is_authorized(&self, agent: &Pubkey) -> bool {
        self.agents.iter().any(|a| a == agent)
    }

    pub fn require_agent(&self, agent: &Pubkey) -> Result<()> {
        require!(self.is_authorized(agent), VaultError::UnauthorizedAgent);
        Ok(())
    }

    pub fn add_agent(&mut self, agent: Pubkey) -> Result<()> {
        require!(!self.is_authorized(&agent), VaultError::AgentAlreadyAuthorized);
        require!(self.agents.len() < MAX_AGENTS, VaultError::RegistryFull);

        self.agents.push(agent);
        Ok(())
    }

    pub fn remove_agent(&mut self, agent: &Pubkey) -> Result<()> {
        let index = self
            .agents
            .iter()
            .position(|a| a == agent)
            .ok_or(VaultError::AgentNotFound)?;

        self.agents.swap_remove(index);
        Ok(())
    }

    pub fn get_wallet(&self, wallet: &Pubkey) -> Option<&TradingWallet> {
        self.trading_wallets.iter().find(|w| w.wallet == *wallet)
    }

    pub fn get_wallet_mut(&mut self, wallet: &Pubkey) -> Option<&mut TradingWallet> {
        self.trading_wallets.iter_mut().find(|w| w.wallet == *wallet)
    }

    /// Record `amount` of new principal at `wallet`, opening a slot if needed
    pub fn track_allocation(&mut self, wallet: &Pubkey, amount: u64) -> Result<()> {
        if let Some(entry) = self.get_wallet_mut(wallet) {
            entry.allocated = entry
                .allocated
                .checked_add(amount)
                .ok_or(error!(VaultError::MathOverflow))?;
            return Ok(());
        }

        require!(
            self.trading_wallets.len() < MAX_TRADING_WALLETS,
            VaultError::TradingWalletLimitReached
        );
        self.trading_wallets.push(TradingWallet {
            wallet: *wallet,
            allocated: amount,
            profit_reported: 0,
        });
        Ok(())
    }

    /// Record a return from `wallet` in the per-wallet books. Returns how much
    /// of `principal` matched the wallet's tracked allocation.
    ///
    /// This is bookkeeping only: the vault's allocated counter is reduced by
    /// the declared principal regardless of which wallet it came from. A
    /// wallet whose tracked principal reaches zero gives up its slot.
    pub fn release_capital(&mut self, wallet: &Pubkey, principal: u64, profit: u64) -> Result<u64> {
        let Some(entry) = self.get_wallet_mut(wallet) else {
            msg!("Return from untracked trading wallet {}", wallet);
            return Ok(0);
        };

        let released = principal.min(entry.allocated);
        let profit_reported = entry
            .profit_reported
            .checked_add(profit)
            .ok_or(VaultError::MathOverflow)?;

        entry.allocated -= released;
        entry.profit_reported = profit_reported;

        if entry.allocated == 0 {
            msg!("Trading wallet {} fully recalled, releasing slot", wallet);
            self.trading_wallets.retain(|w| w.wallet != *wallet);
        }

        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_registry() -> AgentRegistry {
        AgentRegistry {
            vault: Pubkey::new_unique(),
            agents: Vec::new(),
            trading_wallets: Vec::new(),
            bump: 0,
        }
    }

    #[test]
    fn test_agent_membership() {
        let mut registry = empty_registry();
        let agent = Pubkey::new_unique();

        assert!(!registry.is_authorized(&agent));
        registry.add_agent(agent).unwrap();
        assert!(registry.is_authorized(&agent));
        assert_eq!(
            registry.add_agent(agent).unwrap_err(),
            VaultError::AgentAlreadyAuthorized.into()
        );

        registry.remove_agent(&agent).unwrap();
        assert_eq!(
            registry.require_agent(&agent).unwrap_err(),
            VaultError::UnauthorizedAgent.into()
        );
        assert_eq!(
            registry.remove_agent(&agent).unwrap_err(),
            VaultError::AgentNotFound.into()
        );
    }

    #[test]
    fn test_registry_full() {
        let mut registry = empty_registry();
        for _ in 0..MAX_AGENTS {
            registry.add_agent(Pubkey::new_unique()).unwrap();
        }

        assert_eq!(
            registry.add_agent(Pubkey::new_unique()).unwrap_err(),
            VaultError::RegistryFull.into()
        );
    }

    #[test]
    fn test_track_allocation_accumulates() {
        let mut registry = empty_registry();
        let wallet = Pubkey::new_unique();

        registry.track_allocation(&wallet, 1000).unwrap();
        registry.track_allocation(&wallet, 500).unwrap();

        assert_eq!(registry.trading_wallets.len(), 1);
        assert_eq!(registry.get_wallet(&wallet).unwrap().allocated, 1500);
    }

    #[test]
    fn test_track_allocation_overflow() {
        let mut registry = empty_registry();
        let wallet = Pubkey::new_unique();

        registry.track_allocation(&wallet, u64::MAX - 100).unwrap();
        assert!(registry.track_allocation(&wallet, 200).is_err());
    }

    #[test]
    fn test_wallet_limit() {
        let mut registry = empty_registry();
        for _ in 0..MAX_TRADING_WALLETS {
            registry.track_allocation(&Pubkey::new_unique(), 1).unwrap();
        }

        assert_eq!(
            registry
                .track_allocation(&Pubkey::new_unique(), 1)
                .unwrap_err(),
            VaultError::TradingWalletLimitReached.into()
        );
    }

    #[test]
    fn test_release_is_capped_per_wallet() {
        let mut registry = empty_registry();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        registry.track_allocation(&a, 100).unwrap();
        registry.track_allocation(&b, 300).unwrap();

        // Wallet a claims to return more principal than it was given
        let released = registry.release_capital(&a, 150, 0).unwrap();
        assert_eq!(released, 100);
        assert!(registry.get_wallet(&a).is_none());
        assert_eq!(registry.get_wallet(&b).unwrap().allocated, 300);
    }

    #[test]
    fn test_partial_release_keeps_slot() {
        let mut registry = empty_registry();
        let wallet = Pubkey::new_unique();
        registry.track_allocation(&wallet, 100).unwrap();

        assert_eq!(registry.release_capital(&wallet, 40, 5).unwrap(), 40);
        let entry = registry.get_wallet(&wallet).unwrap();
        assert_eq!(entry.allocated, 60);
        assert_eq!(entry.profit_reported, 5);
    }

    #[test]
    fn test_profit_only_return_from_closed_wallet() {
        let mut registry = empty_registry();
        assert_eq!(registry.release_capital(&Pubkey::new_unique(), 0, 25).unwrap(), 0);
    }

    #[test]
    fn test_release_from_untracked_wallet() {
        let mut registry = empty_registry();
        let tracked = Pubkey::new_unique();
        registry.track_allocation(&tracked, 100).unwrap();

        assert_eq!(registry.release_capital(&Pubkey::new_unique(), 10, 0).unwrap(), 0);
        assert_eq!(registry.trading_wallets.len(), 1);
        assert_eq!(registry.get_wallet(&tracked).unwrap().allocated, 100);
    }
}
