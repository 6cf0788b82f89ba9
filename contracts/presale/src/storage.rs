use crate::errors::Error;
use crate::sale::{SaleInstance, SaleKind};
use crate::types::*;
use soroban_sdk::{Address, BytesN, Env, Vec};

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<PresaleConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &PresaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_treasury(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Treasury)
        .ok_or(Error::NotInitialized)
}

pub fn set_treasury(env: &Env, treasury: &Address) {
    env.storage().instance().set(&DataKey::Treasury, treasury);
}

pub fn get_pending_treasury(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::PendingTreasury)
}

pub fn set_pending_treasury(env: &Env, pending: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::PendingTreasury, pending);
}

pub fn clear_pending_treasury(env: &Env) {
    env.storage().instance().remove(&DataKey::PendingTreasury);
}

pub fn get_voucher_authority(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::VoucherAuthority)
}

pub fn set_voucher_authority(env: &Env, authority: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::VoucherAuthority, authority);
}

pub fn is_gating_enabled(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::VoucherGating)
        .unwrap_or(false)
}

pub fn set_gating_enabled(env: &Env, enabled: bool) {
    env.storage()
        .instance()
        .set(&DataKey::VoucherGating, &enabled);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

pub fn get_total_minted(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalMinted)
        .unwrap_or(0)
}

pub fn set_total_minted(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalMinted, &amount);
}

pub fn get_total_claimed(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalClaimed)
        .unwrap_or(0)
}

pub fn set_total_claimed(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalClaimed, &amount);
}

pub fn is_unsold_burned(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::UnsoldBurned)
        .unwrap_or(false)
}

pub fn set_unsold_burned(env: &Env) {
    env.storage().instance().set(&DataKey::UnsoldBurned, &true);
}

pub fn get_sale(env: &Env, kind: SaleKind) -> SaleInstance {
    env.storage()
        .instance()
        .get(&DataKey::Sale(kind))
        .unwrap_or_default()
}

pub fn set_sale(env: &Env, kind: SaleKind, sale: &SaleInstance) {
    env.storage().instance().set(&DataKey::Sale(kind), sale);
}

pub fn get_quote(env: &Env, asset: &Address) -> Option<PriceQuote> {
    env.storage()
        .persistent()
        .get(&DataKey::Quote(asset.clone()))
}

/// Store a quote and remember its asset in the quoted list.
pub fn set_quote(env: &Env, quote: &PriceQuote) {
    let mut assets = get_quoted_assets(env);
    if !assets.contains(&quote.asset) {
        assets.push_back(quote.asset.clone());
        env.storage().instance().set(&DataKey::QuotedAssets, &assets);
    }

    env.storage()
        .persistent()
        .set(&DataKey::Quote(quote.asset.clone()), quote);
}

pub fn get_quoted_assets(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::QuotedAssets)
        .unwrap_or(Vec::new(env))
}

pub fn get_buyer(env: &Env, buyer: &Address) -> BuyerAccount {
    env.storage()
        .persistent()
        .get(&DataKey::Buyer(buyer.clone()))
        .unwrap_or_default()
}

pub fn set_buyer(env: &Env, buyer: &Address, account: &BuyerAccount) {
    env.storage()
        .persistent()
        .set(&DataKey::Buyer(buyer.clone()), account);
}

pub fn get_purchased(env: &Env, buyer: &Address, asset: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Purchased(buyer.clone(), asset.clone()))
        .unwrap_or(0)
}

pub fn set_purchased(env: &Env, buyer: &Address, asset: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Purchased(buyer.clone(), asset.clone()), &amount);
}

pub fn is_replay_used(env: &Env, hash: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::ReplayUsed(hash.clone()))
}

pub fn mark_replay_used(env: &Env, hash: &BytesN<32>) {
    env.storage()
        .persistent()
        .set(&DataKey::ReplayUsed(hash.clone()), &true);
}

/// Run `f` under the reentrancy lock held in temporary storage.
pub fn with_lock<T>(env: &Env, f: impl FnOnce() -> Result<T, Error>) -> Result<T, Error> {
    let locked: bool = env
        .storage()
        .temporary()
        .get(&DataKey::Lock)
        .unwrap_or(false);
    if locked {
        return Err(Error::Reentrant);
    }

    env.storage().temporary().set(&DataKey::Lock, &true);
    let result = f();
    env.storage().temporary().remove(&DataKey::Lock);
    result
}
