//! Deposit / withdraw flow against four seeded tokens
//!
//! Every test starts from the same world: DAI, BAT, REP and ZRX registered,
//! and two traders each holding 1000 units of every token with the full
//! amount approved for the exchange.

use std::sync::Arc;

use dex_contracts::errors::LedgerError;
use dex_contracts::{AssetCustody, InMemoryCustody, Ledger};
use dex_types::ids::{AccountId, AssetHandle};
use dex_types::numeric::{Amount, DEFAULT_DECIMALS};
use dex_types::ticker::{Ticker, TICKER_CAPACITY};

const TICKERS: [&str; 4] = ["DAI", "BAT", "REP", "ZRX"];

struct Dex {
    ledger: Ledger<Arc<InMemoryCustody>>,
    custody: Arc<InMemoryCustody>,
    trader1: AccountId,
    trader2: AccountId,
}

fn to_wei(units: &str) -> Amount {
    Amount::parse_units(units, DEFAULT_DECIMALS).unwrap()
}

fn ticker(symbol: &str) -> Ticker {
    Ticker::new(symbol).unwrap()
}

fn token_address(symbol: &str) -> AssetHandle {
    AssetHandle::try_new(format!("0x{}", symbol.to_lowercase())).unwrap()
}

fn setup() -> Dex {
    let custody = Arc::new(InMemoryCustody::new());
    let admin = AccountId::new();
    let ledger = Ledger::new(admin, Arc::clone(&custody));
    let trader1 = AccountId::new();
    let trader2 = AccountId::new();

    for symbol in TICKERS {
        let asset = token_address(symbol);
        custody.create_asset(asset.clone());
        ledger.register_token(&admin, ticker(symbol), asset.clone()).unwrap();
        for trader in [trader1, trader2] {
            custody.faucet(&asset, trader, to_wei("1000")).unwrap();
            custody.approve(&asset, trader, to_wei("1000")).unwrap();
        }
    }

    Dex {
        ledger,
        custody,
        trader1,
        trader2,
    }
}

#[test]
fn should_deposit_tokens() {
    let dex = setup();
    let amount = to_wei("100");

    dex.ledger.deposit(dex.trader1, &ticker("DAI"), amount).unwrap();

    assert_eq!(dex.ledger.balance(&dex.trader1, &ticker("DAI")).unwrap(), amount);
    assert_eq!(
        dex.custody.custodied(&token_address("DAI")),
        Ok(amount),
        "custody grows by exactly the deposit"
    );
}

#[test]
fn should_not_deposit_tokens_if_token_does_not_exist() {
    let dex = setup();

    let err = dex
        .ledger
        .deposit(dex.trader1, &ticker("INVALID"), to_wei("100"))
        .unwrap_err();

    assert_eq!(err.to_string(), "This token does not exist");
    assert!(dex.ledger.account_balances(&dex.trader1).is_empty());
    for symbol in TICKERS {
        assert_eq!(
            dex.custody.balance_of(&token_address(symbol), &dex.trader1),
            to_wei("1000")
        );
    }
}

#[test]
fn should_withdraw_tokens() {
    let dex = setup();
    let amount = to_wei("100");

    dex.ledger.deposit(dex.trader1, &ticker("DAI"), amount).unwrap();
    dex.ledger.withdraw(dex.trader1, &ticker("DAI"), amount).unwrap();

    let balance_dex = dex.ledger.balance(&dex.trader1, &ticker("DAI")).unwrap();
    let balance_dai = dex.custody.balance_of(&token_address("DAI"), &dex.trader1);
    assert!(balance_dex.is_zero());
    assert_eq!(balance_dai, to_wei("1000"));
}

#[test]
fn should_not_withdraw_tokens_that_do_not_exist() {
    let dex = setup();

    let err = dex
        .ledger
        .withdraw(dex.trader1, &ticker("INVALID"), to_wei("100"))
        .unwrap_err();

    assert!(matches!(err, LedgerError::UnknownToken { .. }));
    assert_eq!(err.to_string(), "This token does not exist");
}

#[test]
fn should_not_withdraw_tokens_if_balance_is_too_low() {
    let dex = setup();
    dex.ledger.deposit(dex.trader1, &ticker("DAI"), to_wei("100")).unwrap();

    let err = dex
        .ledger
        .withdraw(dex.trader1, &ticker("DAI"), to_wei("1000"))
        .unwrap_err();

    assert_eq!(err.to_string(), "Balance too low");
    assert_eq!(
        dex.ledger.balance(&dex.trader1, &ticker("DAI")).unwrap(),
        to_wei("100")
    );
}

#[test]
fn partial_withdraw_leaves_remainder() {
    let dex = setup();
    dex.ledger.deposit(dex.trader1, &ticker("REP"), to_wei("100")).unwrap();

    let receipt = dex
        .ledger
        .withdraw(dex.trader1, &ticker("REP"), to_wei("40"))
        .unwrap();

    assert_eq!(receipt.balance_after, to_wei("60"));
    assert_eq!(
        dex.custody.balance_of(&token_address("REP"), &dex.trader1),
        to_wei("940")
    );
}

#[test]
fn traders_and_tokens_are_isolated() {
    let dex = setup();
    dex.ledger.deposit(dex.trader1, &ticker("DAI"), to_wei("100")).unwrap();
    dex.ledger.deposit(dex.trader2, &ticker("ZRX"), to_wei("250")).unwrap();
    dex.ledger.withdraw(dex.trader1, &ticker("DAI"), to_wei("30")).unwrap();

    assert_eq!(dex.ledger.balance(&dex.trader1, &ticker("DAI")).unwrap(), to_wei("70"));
    assert_eq!(dex.ledger.balance(&dex.trader1, &ticker("ZRX")).unwrap(), Amount::ZERO);
    assert_eq!(dex.ledger.balance(&dex.trader2, &ticker("DAI")).unwrap(), Amount::ZERO);
    assert_eq!(dex.ledger.balance(&dex.trader2, &ticker("ZRX")).unwrap(), to_wei("250"));
    assert_eq!(
        dex.custody.balance_of(&token_address("BAT"), &dex.trader2),
        to_wei("1000")
    );
}

#[test]
fn deposit_beyond_approval_is_a_custody_failure() {
    let dex = setup();
    dex.ledger.deposit(dex.trader1, &ticker("BAT"), to_wei("900")).unwrap();

    // Only 100 of the approval remains.
    let err = dex
        .ledger
        .deposit(dex.trader1, &ticker("BAT"), to_wei("200"))
        .unwrap_err();

    assert!(matches!(err, LedgerError::CustodyTransferFailed(_)));
    assert_eq!(dex.ledger.balance(&dex.trader1, &ticker("BAT")).unwrap(), to_wei("900"));
}

#[test]
fn tickers_decoded_from_bytes32_match_registered_tokens() {
    let dex = setup();
    let mut raw = [0u8; TICKER_CAPACITY];
    raw[..3].copy_from_slice(b"ZRX");

    let zrx = Ticker::from_bytes32(raw).unwrap();
    dex.ledger.deposit(dex.trader2, &zrx, to_wei("1")).unwrap();

    assert_eq!(dex.ledger.balance(&dex.trader2, &ticker("ZRX")).unwrap(), to_wei("1"));
}

#[test]
fn all_tokens_listed() {
    let dex = setup();
    let listed: Vec<String> = dex
        .ledger
        .tokens()
        .into_iter()
        .map(|t| t.ticker.to_string())
        .collect();
    assert_eq!(listed, TICKERS);
}
