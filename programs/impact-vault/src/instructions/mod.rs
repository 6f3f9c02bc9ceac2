pub mod admin;
pub mod agents;
pub mod deposit;
pub mod donation;
pub mod initialize;
pub mod mint_certificate;
pub mod move_to_trading_wallet;
pub mod return_capital;
pub mod views;
pub mod withdraw_profits;

pub use admin::*;
pub use agents::*;
pub use deposit::*;
pub use donation::*;
pub use initialize::*;
pub use mint_certificate::*;
pub use move_to_trading_wallet::*;
pub use return_capital::*;
pub use views::*;
pub use withdraw_profits::*;
