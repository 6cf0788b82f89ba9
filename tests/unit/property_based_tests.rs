/// Property-based checks of the accounting invariants over generated
/// purchase sequences.
use crate::utils::constants::*;
use crate::utils::*;
use presale::{Error, SaleKind};
use proptest::prelude::*;
use soroban_sdk::Address;

const BUYERS: usize = 4;

#[derive(Clone, Debug)]
enum Step {
    BuyUsdc { buyer: usize, dollars: i128 },
    BuyNative { buyer: usize, milli: i128 },
    AdvanceRound,
    Wait { hours: u64 },
    AutoEnd,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0..BUYERS, 1i128..=500).prop_map(|(buyer, dollars)| Step::BuyUsdc { buyer, dollars }),
        2 => (0..BUYERS, 1i128..=200).prop_map(|(buyer, milli)| Step::BuyNative { buyer, milli }),
        1 => Just(Step::AdvanceRound),
        2 => (0u64..48).prop_map(|hours| Step::Wait { hours }),
        1 => Just(Step::AutoEnd),
    ]
}

/// Tokens for a native payment: gas buffer off, then `usd * rate / 10^8`.
fn native_tokens(amount: i128) -> i128 {
    let usd = (amount - GAS_BUFFER) * NATIVE_PRICE / E18;
    usd * E18 / USD
}

fn run_sequence(steps: Vec<Step>) -> Result<(), TestCaseError> {
    let max_tokens = 5_000 * E18;
    let mut f = PresaleFixture::with_params(FixtureParams {
        max_tokens,
        presale_rate: E18,
        ..FixtureParams::default()
    });
    f.start_standard();
    let buyers: Vec<Address> = (0..BUYERS).map(|_| f.verified_buyer()).collect();

    let mut successes = [0u64; BUYERS];
    let mut usdc_price = USD;
    let mut paid_usdc = 0i128;
    let mut paid_native = 0i128;
    let mut round2_sold = 0i128;

    for step in steps {
        let round = f.presale.get_sale(&SaleKind::Standard).current_round;
        let outcome = match step {
            Step::BuyUsdc { buyer, dollars } => {
                let amount = dollars * USDC_UNIT;
                let result = f.buy_usdc(&buyers[buyer], amount);
                if let Ok(tokens) = result {
                    prop_assert_eq!(tokens, amount * usdc_price / USDC_UNIT * E18 / USD);
                    paid_usdc += amount;
                }
                Some((buyer, result))
            }
            Step::BuyNative { buyer, milli } => {
                let amount = milli * E18 / 1_000;
                let result = f.buy_native(&buyers[buyer], amount);
                if let Ok(tokens) = result {
                    prop_assert_eq!(tokens, native_tokens(amount));
                    paid_native += amount;
                }
                Some((buyer, result))
            }
            Step::AdvanceRound => {
                let repriced = soroban_sdk::vec![&f.env, quote(&f.usdc, 2 * USD, 6)];
                match flatten(f.presale.try_advance_to_round_2(
                    &f.owner,
                    &SaleKind::Standard,
                    &repriced,
                )) {
                    Ok(()) => usdc_price = 2 * USD,
                    Err(err) => prop_assert!(
                        matches!(
                            err,
                            Error::WrongRound | Error::SaleNotActive | Error::AlreadyEnded
                        ),
                        "unexpected {:?}",
                        err
                    ),
                }
                None
            }
            Step::Wait { hours } => {
                f.advance_time(hours * 60 * 60);
                None
            }
            Step::AutoEnd => {
                f.presale.check_auto_end();
                None
            }
        };

        if let Some((buyer, result)) = outcome {
            match result {
                Ok(tokens) => {
                    successes[buyer] += 1;
                    if round == 2 {
                        round2_sold += tokens;
                    }
                }
                Err(err) => prop_assert!(
                    matches!(err, Error::SupplyExceeded | Error::SaleNotActive),
                    "unexpected {:?}",
                    err
                ),
            }
        }

        let minted = f.presale.total_tokens_minted();
        let entitled: i128 = buyers
            .iter()
            .map(|b| f.presale.get_buyer(b).total_purchased)
            .sum();
        let sale = f.presale.get_sale(&SaleKind::Standard);

        prop_assert!(minted <= max_tokens, "ceiling breached");
        prop_assert_eq!(minted, entitled);
        prop_assert_eq!(minted, sale.round1_tokens_sold + sale.round2_tokens_sold);
        prop_assert_eq!(sale.round2_tokens_sold, round2_sold);
        if minted == max_tokens {
            prop_assert!(sale.ended, "sold out but still running");
        }
    }

    for (index, buyer) in buyers.iter().enumerate() {
        prop_assert_eq!(f.authority.get_nonce(buyer), successes[index]);
    }
    let this = f.presale.address.clone();
    prop_assert_eq!(balance(&f.env, &f.usdc, &f.fee_recipient), paid_usdc * 4 / 100);
    prop_assert_eq!(balance(&f.env, &f.usdc, &this), paid_usdc - paid_usdc * 4 / 100);
    prop_assert_eq!(balance(&f.env, &f.native, &f.fee_recipient), paid_native * 4 / 100);
    prop_assert_eq!(balance(&f.env, &f.native, &this), paid_native - paid_native * 4 / 100);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Minted supply never passes the ceiling and always equals both the
    /// beneficiaries' entitlements and the per-round counters.
    #[test]
    fn prop_supply_and_entitlements_stay_consistent(
        steps in prop::collection::vec(step_strategy(), 1..40),
    ) {
        run_sequence(steps)?;
    }
}
