use anchor_lang::prelude::*;

use crate::{constants::BPS_DENOMINATOR, errors::VaultError};

/// floor(a * b / denominator) with a u128 intermediate
pub fn mul_div_floor(a: u64, b: u64, denominator: u64) -> Result<u64> {
    let value = (a as u128)
        .checked_mul(b as u128)
        .ok_or(error!(VaultError::MathOverflow))?
        .checked_div(denominator as u128)
        .ok_or(error!(VaultError::DivisionByZero))?;

    u64::try_from(value).map_err(|_| error!(VaultError::MathOverflow))
}

/// floor(amount * bps / 10000)
pub fn apply_bps(amount: u64, bps: u16) -> Result<u64> {
    validate_bps(bps)?;
    mul_div_floor(amount, bps as u64, BPS_DENOMINATOR)
}

pub fn validate_bps(bps: u16) -> Result<()> {
    require!((bps as u64) <= BPS_DENOMINATOR, VaultError::InvalidBps);
    Ok(())
}
