#![no_std]

//! # Presale Types
//!
//! Shared definitions for the voucher authority and the presale ledger:
//! the signed `Voucher` credential, its canonical digest, signer recovery
//! and the authorization error codes both contracts agree on.

pub mod errors;
pub mod voucher;

pub use errors::VoucherError;
pub use voucher::*;

/// USD amounts carry 8 fractional digits.
pub const USD_DECIMALS: u32 = 8;
pub const USD_SCALE: i128 = 100_000_000;

/// Asset quotes may not describe more than 18 decimals.
pub const MAX_ASSET_DECIMALS: u32 = 18;

/// Validity window the issuing backend stamps onto each voucher (24 hours).
pub const VOUCHER_VALIDITY: u64 = 24 * 60 * 60;
