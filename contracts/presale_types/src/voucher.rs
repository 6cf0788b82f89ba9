use soroban_sdk::{contracttype, crypto::Hash, xdr::ToXdr, Address, Bytes, BytesN, Env};

/// Type string bound into every voucher digest. Changing it (or the field
/// order below) invalidates every voucher issued against the old layout.
pub const VOUCHER_TYPE: &[u8] = b"Voucher(address buyer,address beneficiary,address paymentAsset,int128 usdLimit,uint64 nonce,uint64 deadline,address targetSale)";
pub const DOMAIN_NAME: &[u8] = b"PresaleVoucherAuthority";
pub const DOMAIN_VERSION: &[u8] = b"1";

/// Signed purchase credential issued by the KYC backend.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Voucher {
    pub buyer: Address,
    pub beneficiary: Address,
    pub payment_asset: Address,
    pub usd_limit: i128, // 8 fractional digits
    pub nonce: u64,
    pub deadline: u64,
    pub target_sale: Address,
}

fn keccak(env: &Env, data: &[u8]) -> [u8; 32] {
    env.crypto()
        .keccak256(&Bytes::from_slice(env, data))
        .to_array()
}

/// Domain separator binding a digest to one authority contract on one network.
pub fn domain_separator(env: &Env, authority: &Address) -> BytesN<32> {
    let mut data = Bytes::new(env);
    data.extend_from_array(&keccak(env, DOMAIN_NAME));
    data.extend_from_array(&keccak(env, DOMAIN_VERSION));
    data.extend_from_array(&env.ledger().network_id().to_array());
    data.append(&authority.clone().to_xdr(env));
    env.crypto().keccak256(&data).to_bytes()
}

/// Hash over the voucher fields in canonical order.
pub fn voucher_struct_hash(env: &Env, voucher: &Voucher) -> BytesN<32> {
    let mut data = Bytes::new(env);
    data.extend_from_array(&keccak(env, VOUCHER_TYPE));
    data.append(&voucher.buyer.clone().to_xdr(env));
    data.append(&voucher.beneficiary.clone().to_xdr(env));
    data.append(&voucher.payment_asset.clone().to_xdr(env));
    data.extend_from_array(&voucher.usd_limit.to_be_bytes());
    data.extend_from_array(&voucher.nonce.to_be_bytes());
    data.extend_from_array(&voucher.deadline.to_be_bytes());
    data.append(&voucher.target_sale.clone().to_xdr(env));
    env.crypto().keccak256(&data).to_bytes()
}

/// Typed-data digest `keccak256(0x19 0x01 || domain || struct)`.
///
/// This is both the message the issuer signs and the key under which a
/// consumed voucher is remembered.
pub fn voucher_digest(env: &Env, authority: &Address, voucher: &Voucher) -> Hash<32> {
    let mut data = Bytes::new(env);
    data.extend_from_array(&[0x19, 0x01]);
    data.extend_from_array(&domain_separator(env, authority).to_array());
    data.extend_from_array(&voucher_struct_hash(env, voucher).to_array());
    env.crypto().keccak256(&data)
}

/// Recover the secp256k1 key that produced a 65-byte `r || s || v` signature.
///
/// Accepts both raw (0/1) and offset (27/28) recovery ids. Returns `None`
/// for any other `v`.
pub fn recover_signer(env: &Env, digest: &Hash<32>, signature: &BytesN<65>) -> Option<BytesN<65>> {
    let raw = signature.to_array();
    let recovery_id = match raw[64] {
        0 | 1 => raw[64],
        27 | 28 => raw[64] - 27,
        _ => return None,
    };

    let mut rs = [0u8; 64];
    rs.copy_from_slice(&raw[..64]);
    let rs = BytesN::from_array(env, &rs);

    Some(
        env.crypto()
            .secp256k1_recover(digest, &rs, u32::from(recovery_id)),
    )
}
