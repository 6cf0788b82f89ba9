use crate::errors::Error;
use presale_types::{Voucher, VoucherError};
use soroban_sdk::{contractclient, Address, BytesN, Env};

// Surface of the voucher authority this ledger depends on.
#[contractclient(name = "VoucherAuthorityClient")]
pub trait VoucherAuthorityInterface {
    fn authorize(
        env: Env,
        caller: Address,
        voucher: Voucher,
        signature: BytesN<65>,
        expected_asset: Address,
        usd_amount: i128,
    ) -> Result<bool, VoucherError>;
}

/// Ask `authority` to consume `voucher` on behalf of this contract.
///
/// Authorization failures keep their codes; anything else the authority
/// reports collapses to `AuthorityRejected`.
pub fn authorize(
    env: &Env,
    authority: &Address,
    voucher: &Voucher,
    signature: &BytesN<65>,
    expected_asset: &Address,
    usd_amount: i128,
) -> Result<(), Error> {
    let client = VoucherAuthorityClient::new(env, authority);

    match client.try_authorize(
        &env.current_contract_address(),
        voucher,
        signature,
        expected_asset,
        &usd_amount,
    ) {
        Ok(Ok(true)) => Ok(()),
        Ok(_) => Err(Error::AuthorityRejected),
        Err(Ok(err)) => Err(Error::from(err)),
        Err(Err(_)) => Err(Error::AuthorityRejected),
    }
}
