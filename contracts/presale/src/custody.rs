use crate::errors::Error;
use soroban_sdk::{token, Address, Env};

/// Movement of assets in and out of the presale's own balances.
pub trait AssetCustody {
    fn balance_of(&self, asset: &Address) -> i128;

    /// Pull `amount` from `from` and return what actually arrived.
    fn transfer_in(&self, asset: &Address, from: &Address, amount: i128) -> Result<i128, Error>;

    fn transfer_out(&self, asset: &Address, to: &Address, amount: i128) -> Result<(), Error>;

    fn burn(&self, asset: &Address, amount: i128) -> Result<(), Error>;
}

/// Custody over token contracts held by `vault`.
pub struct TokenCustody<'a> {
    env: &'a Env,
    vault: Address,
}

impl<'a> TokenCustody<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self {
            env,
            vault: env.current_contract_address(),
        }
    }
}

impl AssetCustody for TokenCustody<'_> {
    fn balance_of(&self, asset: &Address) -> i128 {
        token::Client::new(self.env, asset).balance(&self.vault)
    }

    /// Balance is measured before and after the transfer. Any asset that
    /// delivers a different amount than requested is rejected.
    fn transfer_in(&self, asset: &Address, from: &Address, amount: i128) -> Result<i128, Error> {
        let client = token::Client::new(self.env, asset);

        let before = client.balance(&self.vault);
        client.transfer(from, &self.vault, &amount);
        let after = client.balance(&self.vault);

        let received = after.checked_sub(before).ok_or(Error::Overflow)?;
        if received != amount {
            return Err(Error::DeflationaryAssetRejected);
        }
        Ok(received)
    }

    fn transfer_out(&self, asset: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        token::Client::new(self.env, asset).transfer(&self.vault, to, &amount);
        Ok(())
    }

    fn burn(&self, asset: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        token::Client::new(self.env, asset).burn(&self.vault, &amount);
        Ok(())
    }
}
