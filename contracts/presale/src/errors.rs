use presale_types::VoucherError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Authorization, identical to the voucher authority's codes
    Expired = 1,
    AssetMismatch = 2,
    LimitExceeded = 3,
    NonceInvalid = 4,
    AlreadyConsumed = 5,
    BadSignature = 6,

    // Accounting
    SupplyExceeded = 20,
    DustAmount = 21,
    DeflationaryAssetRejected = 22,
    InsufficientGasBuffer = 23,
    Overflow = 24,

    // Sale state
    SaleNotActive = 40,
    BothSalesActive = 41,
    AlreadyStarted = 42,
    AlreadyEnded = 43,
    NotStarted = 44,
    WrongRound = 45,
    SaleStillRunning = 46,
    LaunchNotReached = 47,
    PricesLocked = 48,
    ClaimsLocked = 49,
    AlreadyClaimed = 50,
    NothingToClaim = 51,
    Paused = 52,
    Reentrant = 53,
    InsufficientSupply = 54,
    OtherSaleActive = 55,
    UnsoldBurned = 56,

    // Administration and input validation
    Unauthorized = 60,
    InvalidParameter = 61,
    AlreadyInitialized = 62,
    NotInitialized = 63,
    VoucherGatingDisabled = 64,
    AuthorityUnset = 65,
    InvalidBeneficiary = 66,
    InvalidAmount = 67,
    AssetNotAccepted = 68,
    VoucherMismatch = 69,
    ReplayDetected = 70,
    PriceUnchanged = 71,
    ExtensionTooLong = 72,
    NoPendingTreasury = 73,
    AuthorityRejected = 74,
}

impl From<VoucherError> for Error {
    fn from(err: VoucherError) -> Self {
        match err {
            VoucherError::Expired => Error::Expired,
            VoucherError::AssetMismatch => Error::AssetMismatch,
            VoucherError::LimitExceeded => Error::LimitExceeded,
            VoucherError::NonceInvalid => Error::NonceInvalid,
            VoucherError::AlreadyConsumed => Error::AlreadyConsumed,
            VoucherError::BadSignature => Error::BadSignature,
            _ => Error::AuthorityRejected,
        }
    }
}
