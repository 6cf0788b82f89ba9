use crate::sale::{EndReason, SaleKind};
use soroban_sdk::{symbol_short, Address, Env};

pub fn purchase(
    env: &Env,
    buyer: &Address,
    beneficiary: &Address,
    asset: &Address,
    amount: i128,
    tokens: i128,
    usd: i128,
) {
    env.events().publish(
        (symbol_short!("purchase"), buyer.clone()),
        (beneficiary.clone(), asset.clone(), amount, tokens, usd),
    );
}

pub fn fee(env: &Env, asset: &Address, recipient: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("fee"), asset.clone()),
        (recipient.clone(), amount),
    );
}

pub fn price(env: &Env, asset: &Address, old: i128, new: i128, decimals: u32, active: bool) {
    env.events().publish(
        (symbol_short!("price"), asset.clone()),
        (old, new, decimals, active),
    );
}

pub fn started(env: &Env, kind: SaleKind, start: u64, end: u64, round1_end: u64) {
    env.events()
        .publish((symbol_short!("started"), kind), (start, end, round1_end));
}

pub fn round(env: &Env, kind: SaleKind, round: u32, timestamp: u64) {
    env.events()
        .publish((symbol_short!("round"), kind), (round, timestamp));
}

pub fn ended(env: &Env, kind: SaleKind, end: u64, reason: EndReason) {
    env.events()
        .publish((symbol_short!("ended"), kind), (end, reason));
}

pub fn emergency_end(env: &Env, kind: SaleKind, end: u64) {
    env.events().publish((symbol_short!("emerg"), kind), end);
}

pub fn extended(env: &Env, kind: SaleKind, new_end: u64) {
    env.events().publish((symbol_short!("extended"), kind), new_end);
}

pub fn claimed(env: &Env, claimant: &Address, amount: i128) {
    env.events()
        .publish((symbol_short!("claimed"), claimant.clone()), amount);
}

pub fn paused(env: &Env, paused: bool) {
    if paused {
        env.events().publish((symbol_short!("paused"),), ());
    } else {
        env.events().publish((symbol_short!("unpaused"),), ());
    }
}

pub fn treasury_proposed(env: &Env, current: &Address, proposed: &Address) {
    env.events().publish(
        (symbol_short!("trs_prop"),),
        (current.clone(), proposed.clone()),
    );
}

pub fn treasury_accepted(env: &Env, old: &Address, new: &Address) {
    env.events()
        .publish((symbol_short!("trs_acc"),), (old.clone(), new.clone()));
}

pub fn withdraw(env: &Env, asset: &Address, treasury: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("withdraw"), asset.clone()),
        (treasury.clone(), amount),
    );
}

pub fn burn(env: &Env, amount: i128) {
    env.events().publish((symbol_short!("burn"),), amount);
}

pub fn initialized(env: &Env, owner: &Address, sale_token: &Address, max_tokens: i128) {
    env.events().publish(
        (symbol_short!("init"),),
        (owner.clone(), sale_token.clone(), max_tokens),
    );
}

pub fn gating(env: &Env, authority: &Address, enabled: bool) {
    env.events()
        .publish((symbol_short!("gating"),), (authority.clone(), enabled));
}
