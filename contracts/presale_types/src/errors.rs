use soroban_sdk::contracterror;

/// Rejection reasons produced by the voucher authority.
///
/// Codes 1-6 are the authorization failures, in the order `authorize`
/// evaluates them. The presale ledger reuses those six codes so that a
/// rejection reaches the purchaser unchanged.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VoucherError {
    Expired = 1,
    AssetMismatch = 2,
    LimitExceeded = 3,
    NonceInvalid = 4,
    AlreadyConsumed = 5,
    BadSignature = 6,
    Unauthorized = 7,
    InvalidParameter = 8,
    AlreadyInitialized = 9,
    NotInitialized = 10,
    UnknownCaller = 11,
    TargetMismatch = 12,
}
