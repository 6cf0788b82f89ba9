#![no_std]

//! # Voucher Authority
//!
//! Gatekeeper for presale purchases. An off-chain KYC backend signs a
//! `Voucher` for every approved purchase; this contract checks that
//! signature against a single trusted secp256k1 key and consumes the voucher
//! so it can never be spent twice.
//!
//! ## Replay protection
//! - Per-buyer sequential nonces: a voucher is only valid for the buyer's
//!   current counter value, which advances by one on every success.
//! - A consumed set keyed by the voucher digest. The admin may also insert
//!   digests into it directly to revoke an issued voucher.
//!
//! Only registered consumer contracts (presale ledgers) may call
//! `authorize`, and only for vouchers that name them as the target sale.

mod storage;


use presale_types::{recover_signer, voucher_digest, Voucher, VoucherError};
use soroban_sdk::{contract, contractimpl, contractmeta, symbol_short, Address, BytesN, Env};
use storage::*;

contractmeta!(
    key = "Description",
    val = "Single-use signed purchase voucher authority"
);

#[contract]
pub struct VoucherAuthority;

#[contractimpl]
impl VoucherAuthority {
    // ========================================================================
    // Initialization
    // ========================================================================

    /// Initialize the authority.
    ///
    /// # Arguments
    /// * `admin` - Address allowed to rotate the signer, revoke vouchers and
    ///   manage consumers
    /// * `signer` - SEC1 uncompressed secp256k1 public key of the issuer
    pub fn initialize(env: Env, admin: Address, signer: BytesN<65>) -> Result<(), VoucherError> {
        admin.require_auth();

        if has_admin(&env) {
            return Err(VoucherError::AlreadyInitialized);
        }
        Self::require_uncompressed_key(&signer)?;

        set_admin(&env, &admin);
        set_signer(&env, &signer);

        env.events()
            .publish((symbol_short!("init"),), (admin, signer));

        Ok(())
    }

    // ========================================================================
    // Authorization
    // ========================================================================

    /// Validate and irreversibly consume a voucher.
    ///
    /// `caller` is the consuming presale contract. It must be registered and
    /// must be the voucher's target sale.
    pub fn authorize(
        env: Env,
        caller: Address,
        voucher: Voucher,
        signature: BytesN<65>,
        expected_asset: Address,
        usd_amount: i128,
    ) -> Result<bool, VoucherError> {
        caller.require_auth();

        if !is_consumer(&env, &caller) {
            return Err(VoucherError::UnknownCaller);
        }
        if voucher.target_sale != caller {
            return Err(VoucherError::TargetMismatch);
        }

        let hash = Self::check(&env, &voucher, &signature, &expected_asset, usd_amount)?;

        mark_consumed(&env, &hash);
        let next = voucher
            .nonce
            .checked_add(1)
            .ok_or(VoucherError::NonceInvalid)?;
        set_nonce(&env, &voucher.buyer, next);

        env.events().publish(
            (symbol_short!("consumed"), voucher.buyer),
            (hash, voucher.nonce),
        );

        Ok(true)
    }

    /// Dry run of the six authorization checks.
    ///
    /// Returns `(true, 0)` when the voucher would currently pass, otherwise
    /// `(false, code)` with the `VoucherError` code of the first failing check.
    pub fn validate(
        env: Env,
        voucher: Voucher,
        signature: BytesN<65>,
        expected_asset: Address,
        usd_amount: i128,
    ) -> (bool, u32) {
        match Self::check(&env, &voucher, &signature, &expected_asset, usd_amount) {
            Ok(_) => (true, 0),
            Err(err) => (false, err as u32),
        }
    }

    // ========================================================================
    // Administration
    // ========================================================================

    /// Replace the trusted signer.
    pub fn set_signer(env: Env, admin: Address, signer: BytesN<65>) -> Result<(), VoucherError> {
        Self::require_admin(&env, &admin)?;
        Self::require_uncompressed_key(&signer)?;

        let old = get_signer(&env)?;
        set_signer(&env, &signer);

        env.events()
            .publish((symbol_short!("signer"),), (old, signer));

        Ok(())
    }

    /// Emergency revocation of an issued but unspent voucher.
    pub fn revoke(env: Env, admin: Address, hash: BytesN<32>) -> Result<(), VoucherError> {
        Self::require_admin(&env, &admin)?;

        mark_consumed(&env, &hash);
        env.events().publish((symbol_short!("revoked"),), hash);

        Ok(())
    }

    /// Register a presale contract allowed to call `authorize`.
    pub fn add_consumer(env: Env, admin: Address, consumer: Address) -> Result<(), VoucherError> {
        Self::require_admin(&env, &admin)?;

        set_consumer(&env, &consumer, true);
        env.events()
            .publish((symbol_short!("cons_add"),), consumer);

        Ok(())
    }

    pub fn remove_consumer(
        env: Env,
        admin: Address,
        consumer: Address,
    ) -> Result<(), VoucherError> {
        Self::require_admin(&env, &admin)?;

        set_consumer(&env, &consumer, false);
        env.events()
            .publish((symbol_short!("cons_rem"),), consumer);

        Ok(())
    }

    // ========================================================================
    // View Functions
    // ========================================================================

    pub fn get_nonce(env: Env, buyer: Address) -> u64 {
        get_nonce(&env, &buyer)
    }

    pub fn is_consumed(env: Env, hash: BytesN<32>) -> bool {
        is_consumed(&env, &hash)
    }

    pub fn is_consumer(env: Env, consumer: Address) -> bool {
        is_consumer(&env, &consumer)
    }

    pub fn signer(env: Env) -> Result<BytesN<65>, VoucherError> {
        get_signer(&env)
    }

    pub fn admin(env: Env) -> Result<Address, VoucherError> {
        get_admin(&env)
    }

    /// Domain separator of this deployment.
    pub fn domain_separator(env: Env) -> BytesN<32> {
        presale_types::domain_separator(&env, &env.current_contract_address())
    }

    /// Digest an issuer must sign for `voucher`; also its consumed-set key.
    pub fn voucher_digest(env: Env, voucher: Voucher) -> BytesN<32> {
        voucher_digest(&env, &env.current_contract_address(), &voucher).to_bytes()
    }

    // ========================================================================
    // Internal Helper Functions
    // ========================================================================

    /// Ordered checks (a)-(f). Returns the voucher digest on success.
    fn check(
        env: &Env,
        voucher: &Voucher,
        signature: &BytesN<65>,
        expected_asset: &Address,
        usd_amount: i128,
    ) -> Result<BytesN<32>, VoucherError> {
        let signer = get_signer(env)?;

        if env.ledger().timestamp() > voucher.deadline {
            return Err(VoucherError::Expired);
        }
        if voucher.payment_asset != *expected_asset {
            return Err(VoucherError::AssetMismatch);
        }
        if usd_amount > voucher.usd_limit {
            return Err(VoucherError::LimitExceeded);
        }

        let digest = voucher_digest(env, &env.current_contract_address(), voucher);
        let hash = digest.to_bytes();
        let consumed = is_consumed(env, &hash);

        if voucher.nonce != get_nonce(env, &voucher.buyer) {
            // an exact replay reports the more specific reason
            return Err(if consumed {
                VoucherError::AlreadyConsumed
            } else {
                VoucherError::NonceInvalid
            });
        }
        if consumed {
            return Err(VoucherError::AlreadyConsumed);
        }

        match recover_signer(env, &digest, signature) {
            Some(recovered) if recovered == signer => Ok(hash),
            _ => Err(VoucherError::BadSignature),
        }
    }

    fn require_admin(env: &Env, admin: &Address) -> Result<(), VoucherError> {
        admin.require_auth();

        if *admin != get_admin(env)? {
            return Err(VoucherError::Unauthorized);
        }
        Ok(())
    }

    fn require_uncompressed_key(key: &BytesN<65>) -> Result<(), VoucherError> {
        if key.get(0) != Some(0x04) {
            return Err(VoucherError::InvalidParameter);
        }
        Ok(())
    }
}
