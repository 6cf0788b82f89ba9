use crate::utils::constants::*;
use crate::utils::*;
use presale::{Error, PresaleConfig, PresaleContract, PresaleContractClient};
use presale_types::VoucherError;
use soroban_sdk::{testutils::Address as _, vec, Address};

#[test]
fn test_fee_on_transfer_token_rejected() {
    let mut f = PresaleFixture::new();
    let skimming = f.env.register_contract(None, FeeOnTransferToken);
    let skimming_client = FeeOnTransferTokenClient::new(&f.env, &skimming);

    f.presale
        .set_price_quotes(&f.owner, &vec![&f.env, quote(&skimming, USD, 6)]);
    f.start_standard();

    let buyer = f.verified_buyer();
    skimming_client.mint(&buyer, &(1_000 * USDC_UNIT));

    let (voucher, signature) = f.voucher(&buyer, &skimming, 10_000);
    let result = flatten(f.presale.try_buy_with_token(
        &buyer,
        &buyer,
        &skimming,
        &(100 * USDC_UNIT),
        &voucher,
        &signature,
    ));
    assert_eq!(result, Err(Error::DeflationaryAssetRejected));

    // nothing was consumed or credited
    assert_eq!(f.authority.get_nonce(&buyer), 0);
    assert_eq!(f.presale.total_tokens_minted(), 0);
    assert_eq!(skimming_client.balance(&buyer), 1_000 * USDC_UNIT);
}

#[test]
fn test_reentrant_token_cannot_reenter() {
    let mut f = PresaleFixture::new();
    let hostile = f.env.register_contract(None, ReentrantToken);
    let hostile_client = ReentrantTokenClient::new(&f.env, &hostile);
    hostile_client.set_target(&f.presale.address);

    f.presale
        .set_price_quotes(&f.owner, &vec![&f.env, quote(&hostile, USD, 6)]);
    f.start_standard();

    let buyer = f.verified_buyer();
    hostile_client.mint(&buyer, &(1_000 * USDC_UNIT));

    let (voucher, signature) = f.voucher(&buyer, &hostile, 10_000);
    let result = f.presale.try_buy_with_token(
        &buyer,
        &buyer,
        &hostile,
        &(100 * USDC_UNIT),
        &voucher,
        &signature,
    );
    assert!(result.is_err());

    assert_eq!(f.presale.total_tokens_minted(), 0);
    assert_eq!(f.authority.get_nonce(&buyer), 0);
    assert_eq!(hostile_client.balance(&buyer), 1_000 * USDC_UNIT);
}

#[test]
fn test_front_runner_cannot_burn_voucher() {
    let mut f = PresaleFixture::new();
    f.start_standard();
    let buyer = f.verified_buyer();
    let (voucher, signature) = f.voucher(&buyer, &f.usdc, 1_000);

    // calling the authority directly, impersonating nothing
    let attacker = Address::generate(&f.env);
    assert_eq!(
        f.authority
            .try_authorize(&attacker, &voucher, &signature, &f.usdc, &USD),
        Err(Ok(VoucherError::UnknownCaller))
    );

    // even a registered ledger cannot spend a voucher aimed at another sale
    let other = f.env.register_contract(None, PresaleContract);
    f.authority.add_consumer(&f.admin, &other);
    assert_eq!(
        f.authority
            .try_authorize(&other, &voucher, &signature, &f.usdc, &USD),
        Err(Ok(VoucherError::TargetMismatch))
    );

    // the legitimate purchase still goes through
    let tokens = flatten(f.presale.try_buy_with_token(
        &buyer,
        &buyer,
        &f.usdc,
        &(10 * USDC_UNIT),
        &voucher,
        &signature,
    ))
    .unwrap();
    assert_eq!(tokens, 10 * PRESALE_RATE);
}

#[test]
fn test_voucher_for_one_deployment_rejected_by_another() {
    let mut f = PresaleFixture::new();
    f.start_standard();
    let buyer = f.verified_buyer();

    // second presale sharing the same authority and assets
    let second_id = f.env.register_contract(None, PresaleContract);
    let second = PresaleContractClient::new(&f.env, &second_id);
    let config: PresaleConfig = f.presale.get_config();
    second.initialize(&config, &f.treasury, &f.authority.address);
    f.authority.add_consumer(&f.admin, &second_id);
    second.set_price_quotes(&f.owner, &vec![&f.env, quote(&f.usdc, USD, 6)]);
    mint(&f.env, &f.sale_token, &second_id, MAX_TOKENS);
    second.start_standard_sale(&f.owner, &presale::SALE_DURATION);

    let (voucher, signature) = f.voucher(&buyer, &f.usdc, 1_000);
    let result = flatten(second.try_buy_with_token(
        &buyer,
        &buyer,
        &f.usdc,
        &(10 * USDC_UNIT),
        &voucher,
        &signature,
    ));
    assert_eq!(result, Err(Error::VoucherMismatch));
}

#[test]
fn test_racing_purchases_on_one_nonce() {
    let mut f = PresaleFixture::new();
    f.start_standard();
    let buyer = f.verified_buyer();

    // two vouchers issued before either is spent share nonce 0
    let (first, first_sig) = f.voucher(&buyer, &f.usdc, 1_000);
    let (second, second_sig) = f.voucher(&buyer, &f.usdc, 2_000);
    assert_eq!(first.nonce, second.nonce);

    flatten(f.presale.try_buy_with_token(
        &buyer,
        &buyer,
        &f.usdc,
        &(10 * USDC_UNIT),
        &first,
        &first_sig,
    ))
    .unwrap();

    let result = flatten(f.presale.try_buy_with_token(
        &buyer,
        &buyer,
        &f.usdc,
        &(10 * USDC_UNIT),
        &second,
        &second_sig,
    ));
    assert_eq!(result, Err(Error::NonceInvalid));
}

#[test]
fn test_racing_purchases_against_ceiling() {
    let mut f = PresaleFixture::with_params(FixtureParams {
        max_tokens: 100 * E18,
        presale_rate: E18,
        ..FixtureParams::default()
    });
    f.start_standard();
    let alice = f.verified_buyer();
    let bob = f.verified_buyer();

    f.buy_usdc(&alice, 60 * USDC_UNIT).unwrap();
    assert_eq!(f.buy_usdc(&bob, 60 * USDC_UNIT), Err(Error::SupplyExceeded));
    assert_eq!(f.buy_usdc(&bob, 40 * USDC_UNIT), Ok(40 * E18));

    assert_eq!(f.presale.total_tokens_minted(), 100 * E18);
    assert!(f.presale.get_sale(&presale::SaleKind::Standard).ended);
}

#[test]
fn test_tampered_voucher_rejected() {
    let mut f = PresaleFixture::new();
    f.start_standard();
    let buyer = f.verified_buyer();

    let (mut voucher, signature) = f.voucher(&buyer, &f.usdc, 10);
    voucher.usd_limit = 1_000_000 * USD;

    let result = flatten(f.presale.try_buy_with_token(
        &buyer,
        &buyer,
        &f.usdc,
        &(1_000 * USDC_UNIT),
        &voucher,
        &signature,
    ));
    assert_eq!(result, Err(Error::BadSignature));
}

#[test]
fn test_rounding_dust_cannot_mint() {
    let mut f = PresaleFixture::new();
    f.start_standard();
    let buyer = f.verified_buyer();

    // 1 wei above the gas buffer is worth zero USD
    assert_eq!(f.buy_native(&buyer, GAS_BUFFER + 1), Err(Error::DustAmount));
    assert_eq!(f.presale.total_tokens_minted(), 0);
}
