use presale_types::VoucherError;
use soroban_sdk::{contracttype, Address, BytesN, Env};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Signer,
    Nonce(Address),
    Consumed(BytesN<32>),
    Consumer(Address),
}

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Result<Address, VoucherError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(VoucherError::NotInitialized)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_signer(env: &Env) -> Result<BytesN<65>, VoucherError> {
    env.storage()
        .instance()
        .get(&DataKey::Signer)
        .ok_or(VoucherError::NotInitialized)
}

pub fn set_signer(env: &Env, signer: &BytesN<65>) {
    env.storage().instance().set(&DataKey::Signer, signer);
}

pub fn get_nonce(env: &Env, buyer: &Address) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::Nonce(buyer.clone()))
        .unwrap_or(0)
}

pub fn set_nonce(env: &Env, buyer: &Address, nonce: u64) {
    env.storage()
        .persistent()
        .set(&DataKey::Nonce(buyer.clone()), &nonce);
}

pub fn is_consumed(env: &Env, hash: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Consumed(hash.clone()))
}

pub fn mark_consumed(env: &Env, hash: &BytesN<32>) {
    env.storage()
        .persistent()
        .set(&DataKey::Consumed(hash.clone()), &true);
}

pub fn is_consumer(env: &Env, consumer: &Address) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Consumer(consumer.clone()))
        .unwrap_or(false)
}

pub fn set_consumer(env: &Env, consumer: &Address, allowed: bool) {
    let key = DataKey::Consumer(consumer.clone());
    if allowed {
        env.storage().instance().set(&key, &true);
    } else {
        env.storage().instance().remove(&key);
    }
}
