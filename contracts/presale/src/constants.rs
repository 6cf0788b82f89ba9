const DAY: u64 = 24 * 60 * 60;

/// Only schedule accepted by `start_standard_sale`.
pub const SALE_DURATION: u64 = 34 * DAY;
/// Round 1 end stamped at start. Informational; round 2 only begins through
/// `advance_to_round_2`.
pub const ROUND_ONE_DURATION: u64 = 17 * DAY;
/// Hard cap on a sale's lifetime, extensions included.
pub const MAX_SALE_DURATION: u64 = 48 * DAY;
pub const MAX_EXTENSION: u64 = 7 * DAY;

pub const FEE_BPS: i128 = 400; // 4%
pub const BPS_DENOMINATOR: i128 = 10_000;
