#![no_std]

//! # Presale
//!
//! Custody and accounting engine for a voucher-gated token presale.
//!
//! Two independently schedulable sale instances (Standard and Escrow) share
//! one token supply ceiling and one set of USD price quotes. Every purchase
//! carries a signed voucher that the configured voucher authority consumes
//! before any accounting happens. Tokens are released through `claim` once a
//! sale has ended.

mod authority;
mod constants;
mod contract;
mod custody;
mod errors;
mod events;
mod sale;
mod storage;
mod types;


pub use constants::*;
pub use contract::{PresaleContract, PresaleContractClient};
pub use errors::Error;
pub use sale::{EndReason, SaleInstance, SaleKind};
pub use types::{BuyerAccount, PresaleConfig, PriceQuote};
