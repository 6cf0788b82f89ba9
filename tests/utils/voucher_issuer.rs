/// In-process model of the KYC-backed voucher issuing service.
///
/// The issuer only signs for identities whose verification succeeded. It
/// always reads the buyer's live nonce from the authority before signing.
use std::collections::BTreeMap;

use k256::ecdsa::SigningKey;
use presale_types::{Voucher, USD_DECIMALS, VOUCHER_VALIDITY};
use soroban_sdk::{Address, BytesN, Env};
use voucher_authority::VoucherAuthorityClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KycStatus {
    Pending,
    Verified,
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueError {
    UnknownIdentity,
    NotVerified,
    Rejected,
    InvalidAmount,
}

pub struct VoucherIssuer<'a> {
    env: Env,
    authority: VoucherAuthorityClient<'a>,
    key: SigningKey,
    kyc: BTreeMap<Address, KycStatus>,
}

impl<'a> VoucherIssuer<'a> {
    pub fn new(env: &Env, authority: &Address, seed: [u8; 32]) -> Self {
        Self {
            env: env.clone(),
            authority: VoucherAuthorityClient::new(env, authority),
            key: SigningKey::from_slice(&seed).expect("valid secp256k1 scalar"),
            kyc: BTreeMap::new(),
        }
    }

    /// SEC1 uncompressed key the authority must trust.
    pub fn public_key(&self) -> BytesN<65> {
        let point = self.key.verifying_key().to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        BytesN::from_array(&self.env, &out)
    }

    /// Open a verification session for `identity`.
    pub fn start_session(&mut self, identity: &Address) {
        self.kyc.insert(identity.clone(), KycStatus::Pending);
    }

    /// Ingest the provider's verdict for `identity`.
    pub fn record_outcome(&mut self, identity: &Address, approved: bool) {
        let status = if approved {
            KycStatus::Verified
        } else {
            KycStatus::Rejected
        };
        self.kyc.insert(identity.clone(), status);
    }

    pub fn status(&self, identity: &Address) -> Option<KycStatus> {
        self.kyc.get(identity).copied()
    }

    /// Sign a voucher valid for 24 hours.
    ///
    /// `usd_amount` is expressed with `decimals` fractional digits and is
    /// rescaled to the 8-digit on-chain representation.
    pub fn mint_voucher(
        &self,
        buyer: &Address,
        beneficiary: &Address,
        asset: &Address,
        usd_amount: i128,
        decimals: u32,
        target_sale: &Address,
    ) -> Result<(Voucher, BytesN<65>), IssueError> {
        match self.status(buyer) {
            None => return Err(IssueError::UnknownIdentity),
            Some(KycStatus::Pending) => return Err(IssueError::NotVerified),
            Some(KycStatus::Rejected) => return Err(IssueError::Rejected),
            Some(KycStatus::Verified) => {}
        }

        let usd_limit = to_usd8(usd_amount, decimals).ok_or(IssueError::InvalidAmount)?;
        if usd_limit <= 0 {
            return Err(IssueError::InvalidAmount);
        }

        let voucher = Voucher {
            buyer: buyer.clone(),
            beneficiary: beneficiary.clone(),
            payment_asset: asset.clone(),
            usd_limit,
            nonce: self.authority.get_nonce(buyer),
            deadline: self.env.ledger().timestamp() + VOUCHER_VALIDITY,
            target_sale: target_sale.clone(),
        };
        let signature = self.sign(&voucher);

        Ok((voucher, signature))
    }

    /// Sign arbitrary voucher content, bypassing the KYC gate.
    pub fn sign(&self, voucher: &Voucher) -> BytesN<65> {
        let digest = self.authority.voucher_digest(voucher);
        let (sig, recid) = self
            .key
            .sign_prehash_recoverable(&digest.to_array())
            .expect("prehash signing");

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = recid.to_byte() + 27;
        BytesN::from_array(&self.env, &out)
    }
}

/// Rescale an amount with `decimals` fractional digits to 8 digits,
/// truncating extra precision.
pub fn to_usd8(amount: i128, decimals: u32) -> Option<i128> {
    if decimals >= USD_DECIMALS {
        let divisor = 10i128.checked_pow(decimals - USD_DECIMALS)?;
        Some(amount / divisor)
    } else {
        let factor = 10i128.checked_pow(USD_DECIMALS - decimals)?;
        amount.checked_mul(factor)
    }
}
