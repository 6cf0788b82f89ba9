use crate::authority;
use crate::constants::{BPS_DENOMINATOR, FEE_BPS, SALE_DURATION};
use crate::custody::{AssetCustody, TokenCustody};
use crate::errors::Error;
use crate::events;
use crate::sale::{EndReason, SaleInstance, SaleKind};
use crate::storage::*;
use crate::types::*;
use presale_types::{voucher_digest, Voucher, MAX_ASSET_DECIMALS, USD_SCALE};
use soroban_sdk::{contract, contractimpl, contractmeta, log, Address, BytesN, Env, Vec};

// Metadata that is added on to every WASM custom section
contractmeta!(
    key = "Description",
    val = "Voucher-gated dual-instance token presale"
);

#[contract]
pub struct PresaleContract;

#[contractimpl]
impl PresaleContract {
    /// Initialize the presale.
    ///
    /// Both sale instances start out not started, voucher gating is on and
    /// no asset is quoted yet.
    pub fn initialize(
        env: Env,
        config: PresaleConfig,
        treasury: Address,
        voucher_authority: Address,
    ) -> Result<(), Error> {
        config.owner.require_auth();

        if has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if config.presale_rate <= 0 || config.max_tokens_to_mint <= 0 || config.gas_buffer < 0 {
            return Err(Error::InvalidParameter);
        }
        if config.fee_recipient == treasury {
            return Err(Error::InvalidParameter);
        }

        set_config(&env, &config);
        set_treasury(&env, &treasury);
        set_voucher_authority(&env, &voucher_authority);
        set_gating_enabled(&env, true);
        set_paused(&env, false);
        set_total_minted(&env, 0);
        set_total_claimed(&env, 0);
        set_sale(&env, SaleKind::Standard, &SaleInstance::default());
        set_sale(&env, SaleKind::Escrow, &SaleInstance::default());

        events::initialized(
            &env,
            &config.owner,
            &config.sale_token,
            config.max_tokens_to_mint,
        );

        Ok(())
    }

    // ========================================================================
    // Purchases
    // ========================================================================

    /// Buy with the native currency. The configured gas buffer is deducted
    /// from `amount` before valuation. Returns the tokens credited to
    /// `beneficiary`.
    pub fn buy_with_native(
        env: Env,
        buyer: Address,
        beneficiary: Address,
        amount: i128,
        voucher: Voucher,
        signature: BytesN<65>,
    ) -> Result<i128, Error> {
        buyer.require_auth();

        let config = get_config(&env)?;
        let asset = config.native_asset.clone();
        with_lock(&env, || {
            Self::purchase(
                &env,
                &config,
                &buyer,
                &beneficiary,
                &asset,
                amount,
                &voucher,
                &signature,
            )
        })
    }

    /// Buy with a quoted token. Returns the tokens credited to `beneficiary`.
    pub fn buy_with_token(
        env: Env,
        buyer: Address,
        beneficiary: Address,
        asset: Address,
        amount: i128,
        voucher: Voucher,
        signature: BytesN<65>,
    ) -> Result<i128, Error> {
        buyer.require_auth();

        let config = get_config(&env)?;
        if asset == config.native_asset {
            return Err(Error::AssetNotAccepted);
        }
        with_lock(&env, || {
            Self::purchase(
                &env,
                &config,
                &buyer,
                &beneficiary,
                &asset,
                amount,
                &voucher,
                &signature,
            )
        })
    }

    /// Release the caller's full entitlement. Possible once either sale has
    /// ended, and only once.
    pub fn claim(env: Env, claimant: Address) -> Result<i128, Error> {
        claimant.require_auth();

        let config = get_config(&env)?;
        with_lock(&env, || {
            if is_paused(&env) {
                return Err(Error::Paused);
            }
            if !get_sale(&env, SaleKind::Standard).ended && !get_sale(&env, SaleKind::Escrow).ended
            {
                return Err(Error::ClaimsLocked);
            }

            let mut account = get_buyer(&env, &claimant);
            if account.has_claimed {
                return Err(Error::AlreadyClaimed);
            }
            if account.total_purchased == 0 {
                return Err(Error::NothingToClaim);
            }

            let amount = account.total_purchased;
            account.has_claimed = true;
            set_buyer(&env, &claimant, &account);

            let claimed = get_total_claimed(&env)
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            set_total_claimed(&env, claimed);

            TokenCustody::new(&env).transfer_out(&config.sale_token, &claimant, amount)?;
            events::claimed(&env, &claimant, amount);

            Ok(amount)
        })
    }

    /// End any running instance that has sold out or outlived the maximum
    /// duration. Anyone may call this.
    pub fn check_auto_end(env: Env) -> Result<bool, Error> {
        let config = get_config(&env)?;
        Ok(Self::run_auto_end(&env, &config, env.ledger().timestamp()))
    }

    // ========================================================================
    // Sale Lifecycle
    // ========================================================================

    pub fn start_standard_sale(env: Env, owner: Address, duration: u64) -> Result<(), Error> {
        let config = Self::require_owner(&env, &owner)?;

        if duration != SALE_DURATION {
            return Err(Error::InvalidParameter);
        }
        Self::start_sale(&env, &config, SaleKind::Standard)
    }

    /// Permissionless once the configured launch time has been reached.
    pub fn start_escrow_sale(env: Env) -> Result<(), Error> {
        let config = get_config(&env)?;

        if env.ledger().timestamp() < config.escrow_launch_time {
            return Err(Error::LaunchNotReached);
        }
        Self::start_sale(&env, &config, SaleKind::Escrow)
    }

    /// Move `kind` from round 1 to round 2, repricing every supplied asset.
    /// Each price must differ from the asset's current one.
    pub fn advance_to_round_2(
        env: Env,
        owner: Address,
        kind: SaleKind,
        quotes: Vec<PriceQuote>,
    ) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;
        let now = env.ledger().timestamp();

        let mut sale = get_sale(&env, kind);
        sale.advance_round(now)?;

        Self::validate_quotes(&env, &quotes)?;
        for quote in quotes.iter() {
            if let Some(previous) = get_quote(&env, &quote.asset) {
                if previous.usd_price == quote.usd_price {
                    return Err(Error::PriceUnchanged);
                }
            }
        }
        Self::apply_quotes(&env, &quotes);

        set_sale(&env, kind, &sale);
        events::round(&env, kind, sale.current_round, now);

        Ok(())
    }

    /// Scheduled end, once the sale window has elapsed.
    pub fn end_sale(env: Env, owner: Address, kind: SaleKind) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;

        let mut sale = get_sale(&env, kind);
        sale.finish(env.ledger().timestamp())?;
        set_sale(&env, kind, &sale);

        events::ended(&env, kind, sale.end_time, EndReason::Scheduled);
        Ok(())
    }

    pub fn emergency_end(env: Env, owner: Address, kind: SaleKind) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;
        let now = env.ledger().timestamp();

        let mut sale = get_sale(&env, kind);
        sale.emergency_end(now)?;
        set_sale(&env, kind, &sale);

        events::emergency_end(&env, kind, now);
        Ok(())
    }

    pub fn extend_sale(env: Env, owner: Address, kind: SaleKind, extra: u64) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;

        if is_unsold_burned(&env) {
            return Err(Error::UnsoldBurned);
        }
        if get_sale(&env, kind.other()).is_active(env.ledger().timestamp()) {
            return Err(Error::OtherSaleActive);
        }

        let mut sale = get_sale(&env, kind);
        sale.extend(extra)?;
        set_sale(&env, kind, &sale);

        events::extended(&env, kind, sale.end_time);
        Ok(())
    }

    // ========================================================================
    // Pricing
    // ========================================================================

    /// Replace quotes while no sale instance is live.
    pub fn set_price_quotes(env: Env, owner: Address, quotes: Vec<PriceQuote>) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;

        if Self::any_sale_active(&env, env.ledger().timestamp()) {
            return Err(Error::PricesLocked);
        }
        Self::validate_quotes(&env, &quotes)?;
        Self::apply_quotes(&env, &quotes);

        Ok(())
    }

    // ========================================================================
    // Administration
    // ========================================================================

    pub fn pause(env: Env, owner: Address) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;

        set_paused(&env, true);
        events::paused(&env, true);
        Ok(())
    }

    pub fn unpause(env: Env, owner: Address) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;

        set_paused(&env, false);
        events::paused(&env, false);
        Ok(())
    }

    pub fn set_voucher_authority(env: Env, owner: Address, authority: Address) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;

        set_voucher_authority(&env, &authority);
        events::gating(&env, &authority, is_gating_enabled(&env));
        Ok(())
    }

    pub fn set_voucher_gating(env: Env, owner: Address, enabled: bool) -> Result<(), Error> {
        Self::require_owner(&env, &owner)?;

        let authority = get_voucher_authority(&env).ok_or(Error::AuthorityUnset)?;
        set_gating_enabled(&env, enabled);
        events::gating(&env, &authority, enabled);
        Ok(())
    }

    /// First half of the treasury handshake.
    pub fn propose_treasury(env: Env, owner: Address, proposed: Address) -> Result<(), Error> {
        let config = Self::require_owner(&env, &owner)?;

        let current = get_treasury(&env)?;
        if proposed == current || proposed == config.fee_recipient {
            return Err(Error::InvalidParameter);
        }

        set_pending_treasury(&env, &proposed);
        events::treasury_proposed(&env, &current, &proposed);
        Ok(())
    }

    /// Second half of the treasury handshake, signed by the proposed treasury.
    pub fn accept_treasury(env: Env, proposed: Address) -> Result<(), Error> {
        proposed.require_auth();

        let pending = get_pending_treasury(&env).ok_or(Error::NoPendingTreasury)?;
        if proposed != pending {
            return Err(Error::Unauthorized);
        }

        let old = get_treasury(&env)?;
        set_treasury(&env, &proposed);
        clear_pending_treasury(&env);

        events::treasury_accepted(&env, &old, &proposed);
        Ok(())
    }

    /// Move custody funds to the treasury.
    ///
    /// Sale tokens are only withdrawable above what buyers are owed and what
    /// is still reserved for sale, and never while a sale is live.
    pub fn withdraw_to_treasury(
        env: Env,
        owner: Address,
        asset: Address,
        amount: i128,
    ) -> Result<(), Error> {
        let config = Self::require_owner(&env, &owner)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let custody = TokenCustody::new(&env);
        let balance = custody.balance_of(&asset);

        let available = if asset == config.sale_token {
            if Self::any_sale_active(&env, env.ledger().timestamp()) {
                return Err(Error::SaleStillRunning);
            }
            balance
                .checked_sub(Self::reserved_sale_tokens(&env, &config)?)
                .ok_or(Error::Overflow)?
        } else {
            balance
        };
        if amount > available {
            return Err(Error::InvalidAmount);
        }

        let treasury = get_treasury(&env)?;
        custody.transfer_out(&asset, &treasury, amount)?;

        events::withdraw(&env, &asset, &treasury, amount);
        Ok(())
    }

    /// Burn whatever part of the ceiling was never sold. One-time; afterwards
    /// no sale can be started or extended.
    pub fn burn_unsold(env: Env, owner: Address) -> Result<i128, Error> {
        let config = Self::require_owner(&env, &owner)?;

        with_lock(&env, || {
            if is_unsold_burned(&env) {
                return Err(Error::UnsoldBurned);
            }

            let now = env.ledger().timestamp();
            let standard = get_sale(&env, SaleKind::Standard);
            let escrow = get_sale(&env, SaleKind::Escrow);
            if standard.is_active(now) || escrow.is_active(now) {
                return Err(Error::SaleStillRunning);
            }
            if !standard.ended && !escrow.ended {
                return Err(Error::SaleStillRunning);
            }

            let unsold = config
                .max_tokens_to_mint
                .checked_sub(get_total_minted(&env))
                .ok_or(Error::Overflow)?;
            set_unsold_burned(&env);
            if unsold > 0 {
                TokenCustody::new(&env).burn(&config.sale_token, unsold)?;
            }

            events::burn(&env, unsold);
            Ok(unsold)
        })
    }

    // ========================================================================
    // View Functions
    // ========================================================================

    pub fn get_config(env: Env) -> Result<PresaleConfig, Error> {
        get_config(&env)
    }

    pub fn get_sale(env: Env, kind: SaleKind) -> SaleInstance {
        get_sale(&env, kind)
    }

    pub fn get_quote(env: Env, asset: Address) -> Option<PriceQuote> {
        get_quote(&env, &asset)
    }

    pub fn get_quoted_assets(env: Env) -> Vec<Address> {
        get_quoted_assets(&env)
    }

    pub fn get_buyer(env: Env, buyer: Address) -> BuyerAccount {
        get_buyer(&env, &buyer)
    }

    pub fn get_purchased_amount(env: Env, buyer: Address, asset: Address) -> i128 {
        get_purchased(&env, &buyer, &asset)
    }

    pub fn total_tokens_minted(env: Env) -> i128 {
        get_total_minted(&env)
    }

    pub fn total_tokens_claimed(env: Env) -> i128 {
        get_total_claimed(&env)
    }

    /// The single instance currently accepting purchases.
    pub fn active_sale(env: Env) -> Result<SaleKind, Error> {
        Self::resolve_active_sale(&env, env.ledger().timestamp())
    }

    pub fn is_paused(env: Env) -> bool {
        is_paused(&env)
    }

    pub fn treasury(env: Env) -> Result<Address, Error> {
        get_treasury(&env)
    }

    pub fn pending_treasury(env: Env) -> Option<Address> {
        get_pending_treasury(&env)
    }

    pub fn voucher_authority(env: Env) -> Option<Address> {
        get_voucher_authority(&env)
    }

    pub fn is_voucher_gating_enabled(env: Env) -> bool {
        is_gating_enabled(&env)
    }

    pub fn is_replay_used(env: Env, hash: BytesN<32>) -> bool {
        is_replay_used(&env, &hash)
    }

    pub fn is_unsold_burned(env: Env) -> bool {
        is_unsold_burned(&env)
    }

    /// Tokens `amount` of `asset` would buy right now, without any transfer.
    pub fn preview_tokens(env: Env, asset: Address, amount: i128) -> Result<i128, Error> {
        let config = get_config(&env)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let quote = Self::active_quote(&env, &asset)?;
        let valued = Self::valued_amount(&config, &asset, amount)?;
        let usd = Self::usd_value(valued, &quote)?;
        Self::tokens_for_usd(usd, config.presale_rate)
    }

    // ========================================================================
    // Internal Helper Functions
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    fn purchase(
        env: &Env,
        config: &PresaleConfig,
        buyer: &Address,
        beneficiary: &Address,
        asset: &Address,
        amount: i128,
        voucher: &Voucher,
        signature: &BytesN<65>,
    ) -> Result<i128, Error> {
        if is_paused(env) {
            return Err(Error::Paused);
        }
        if !is_gating_enabled(env) {
            return Err(Error::VoucherGatingDisabled);
        }
        let authority = get_voucher_authority(env).ok_or(Error::AuthorityUnset)?;
        let this = env.current_contract_address();
        if *beneficiary == this {
            return Err(Error::InvalidBeneficiary);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let quote = Self::active_quote(env, asset)?;

        let now = env.ledger().timestamp();
        let kind = Self::resolve_active_sale(env, now)?;

        if voucher.buyer != *buyer
            || voucher.beneficiary != *beneficiary
            || voucher.payment_asset != *asset
            || voucher.target_sale != this
        {
            return Err(Error::VoucherMismatch);
        }

        let custody = TokenCustody::new(env);
        let received = custody.transfer_in(asset, buyer, amount)?;

        let valued = Self::valued_amount(config, asset, received)?;
        let usd = Self::usd_value(valued, &quote)?;
        if usd == 0 {
            return Err(Error::DustAmount);
        }

        let hash = voucher_digest(env, &authority, voucher).to_bytes();
        if is_replay_used(env, &hash) {
            return Err(Error::ReplayDetected);
        }
        authority::authorize(env, &authority, voucher, signature, asset, usd)?;
        mark_replay_used(env, &hash);

        let tokens = Self::tokens_for_usd(usd, config.presale_rate)?;
        if tokens == 0 {
            return Err(Error::DustAmount);
        }

        let fee = received.checked_mul(FEE_BPS).ok_or(Error::Overflow)? / BPS_DENOMINATOR;
        if fee > 0 {
            custody.transfer_out(asset, &config.fee_recipient, fee)?;
            events::fee(env, asset, &config.fee_recipient, fee);
        }

        let minted = get_total_minted(env)
            .checked_add(tokens)
            .ok_or(Error::Overflow)?;
        if minted > config.max_tokens_to_mint {
            return Err(Error::SupplyExceeded);
        }
        set_total_minted(env, minted);

        let paid = get_purchased(env, beneficiary, asset)
            .checked_add(received)
            .ok_or(Error::Overflow)?;
        set_purchased(env, beneficiary, asset, paid);

        let mut account = get_buyer(env, beneficiary);
        account.total_purchased = account
            .total_purchased
            .checked_add(tokens)
            .ok_or(Error::Overflow)?;
        account.total_usd_purchased = account
            .total_usd_purchased
            .checked_add(usd)
            .ok_or(Error::Overflow)?;
        set_buyer(env, beneficiary, &account);

        let mut sale = get_sale(env, kind);
        sale.record_sold(tokens)?;
        set_sale(env, kind, &sale);

        events::purchase(env, buyer, beneficiary, asset, received, tokens, usd);
        Self::run_auto_end(env, config, now);

        Ok(tokens)
    }

    fn start_sale(env: &Env, config: &PresaleConfig, kind: SaleKind) -> Result<(), Error> {
        let now = env.ledger().timestamp();

        let mut sale = get_sale(env, kind);
        if sale.is_started() {
            return Err(Error::AlreadyStarted);
        }
        if is_unsold_burned(env) {
            return Err(Error::UnsoldBurned);
        }
        if get_sale(env, kind.other()).is_active(now) {
            return Err(Error::OtherSaleActive);
        }

        // custody must cover everything still sellable or owed
        let required = config
            .max_tokens_to_mint
            .checked_sub(get_total_claimed(env))
            .ok_or(Error::Overflow)?;
        if TokenCustody::new(env).balance_of(&config.sale_token) < required {
            return Err(Error::InsufficientSupply);
        }

        sale.start(now)?;
        set_sale(env, kind, &sale);

        events::started(env, kind, sale.start_time, sale.end_time, sale.round1_end_time);
        Ok(())
    }

    fn resolve_active_sale(env: &Env, now: u64) -> Result<SaleKind, Error> {
        let standard = get_sale(env, SaleKind::Standard).is_active(now);
        let escrow = get_sale(env, SaleKind::Escrow).is_active(now);

        match (standard, escrow) {
            (true, true) => {
                log!(env, "both sale instances active", now);
                Err(Error::BothSalesActive)
            }
            (true, false) => Ok(SaleKind::Standard),
            (false, true) => Ok(SaleKind::Escrow),
            (false, false) => Err(Error::SaleNotActive),
        }
    }

    fn any_sale_active(env: &Env, now: u64) -> bool {
        get_sale(env, SaleKind::Standard).is_active(now) || get_sale(env, SaleKind::Escrow).is_active(now)
    }

    fn run_auto_end(env: &Env, config: &PresaleConfig, now: u64) -> bool {
        let minted = get_total_minted(env);
        let mut any_ended = false;

        for kind in [SaleKind::Standard, SaleKind::Escrow] {
            let mut sale = get_sale(env, kind);
            if let Some(reason) = sale.auto_end_reason(now, minted, config.max_tokens_to_mint) {
                sale.force_end(now);
                set_sale(env, kind, &sale);
                events::ended(env, kind, sale.end_time, reason);
                any_ended = true;
            }
        }

        any_ended
    }

    fn require_owner(env: &Env, owner: &Address) -> Result<PresaleConfig, Error> {
        owner.require_auth();

        let config = get_config(env)?;
        if *owner != config.owner {
            return Err(Error::Unauthorized);
        }
        Ok(config)
    }

    fn active_quote(env: &Env, asset: &Address) -> Result<PriceQuote, Error> {
        get_quote(env, asset)
            .filter(|quote| quote.active)
            .ok_or(Error::AssetNotAccepted)
    }

    fn validate_quotes(env: &Env, quotes: &Vec<PriceQuote>) -> Result<(), Error> {
        if quotes.is_empty() {
            return Err(Error::InvalidParameter);
        }

        let mut seen: Vec<Address> = Vec::new(env);
        for quote in quotes.iter() {
            if quote.decimals > MAX_ASSET_DECIMALS || quote.usd_price < 0 {
                return Err(Error::InvalidParameter);
            }
            if quote.active && quote.usd_price == 0 {
                return Err(Error::InvalidParameter);
            }
            if seen.contains(&quote.asset) {
                return Err(Error::InvalidParameter);
            }
            seen.push_back(quote.asset.clone());
        }
        Ok(())
    }

    fn apply_quotes(env: &Env, quotes: &Vec<PriceQuote>) {
        for quote in quotes.iter() {
            let old = get_quote(env, &quote.asset).map_or(0, |q| q.usd_price);
            set_quote(env, &quote);
            events::price(
                env,
                &quote.asset,
                old,
                quote.usd_price,
                quote.decimals,
                quote.active,
            );
        }
    }

    /// Amount that counts towards valuation; native payments lose the gas
    /// buffer first.
    fn valued_amount(config: &PresaleConfig, asset: &Address, amount: i128) -> Result<i128, Error> {
        if *asset != config.native_asset {
            return Ok(amount);
        }
        if amount <= config.gas_buffer {
            return Err(Error::InsufficientGasBuffer);
        }
        Ok(amount - config.gas_buffer)
    }

    /// `amount * usd_price / 10^decimals`, truncating.
    fn usd_value(amount: i128, quote: &PriceQuote) -> Result<i128, Error> {
        let scale = 10i128
            .checked_pow(quote.decimals)
            .ok_or(Error::Overflow)?;
        amount
            .checked_mul(quote.usd_price)
            .map(|value| value / scale)
            .ok_or(Error::Overflow)
    }

    /// `usd * presale_rate / 10^8`, truncating.
    fn tokens_for_usd(usd: i128, presale_rate: i128) -> Result<i128, Error> {
        usd.checked_mul(presale_rate)
            .map(|value| value / USD_SCALE)
            .ok_or(Error::Overflow)
    }

    fn reserved_sale_tokens(env: &Env, config: &PresaleConfig) -> Result<i128, Error> {
        let minted = get_total_minted(env);
        let owed = minted
            .checked_sub(get_total_claimed(env))
            .ok_or(Error::Overflow)?;
        let unsold = if is_unsold_burned(env) {
            0
        } else {
            config
                .max_tokens_to_mint
                .checked_sub(minted)
                .ok_or(Error::Overflow)?
        };
        owed.checked_add(unsold).ok_or(Error::Overflow)
    }
}
