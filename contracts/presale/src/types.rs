use crate::sale::SaleKind;
use soroban_sdk::{contracttype, Address, BytesN};

/// Immutable deployment parameters, fixed by `initialize`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct PresaleConfig {
    pub owner: Address,
    pub sale_token: Address,   // token being sold, held in custody
    pub native_asset: Address, // native currency SAC
    pub fee_recipient: Address,
    pub presale_rate: i128,       // tokens per USD, 18 decimals
    pub max_tokens_to_mint: i128, // global supply ceiling
    pub escrow_launch_time: u64,  // earliest permissionless escrow start
    pub gas_buffer: i128,         // deducted from native payments before valuation
}

/// USD quote for one payment asset. `usd_price` has 8 fractional digits.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct PriceQuote {
    pub asset: Address,
    pub usd_price: i128,
    pub decimals: u32,
    pub active: bool,
}

/// Per-beneficiary accounting.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[contracttype]
pub struct BuyerAccount {
    pub total_purchased: i128,
    pub total_usd_purchased: i128,
    pub has_claimed: bool,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    Treasury,
    PendingTreasury,
    VoucherAuthority,
    VoucherGating,
    Paused,
    TotalMinted,
    TotalClaimed,
    UnsoldBurned,
    Sale(SaleKind),
    Quote(Address),
    QuotedAssets,
    Buyer(Address),
    Purchased(Address, Address),
    ReplayUsed(BytesN<32>),
    Lock,
}
