use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;
use std::str::FromStr;

#[test]
fn test_money_zero() {
    let money = Money::zero(Currency::Xof);
    assert!(money.is_zero());
    assert!(!money.is_negative());
}

#[test]
fn test_money_is_negative() {
    assert!(Money::new(dec!(-10), Currency::Xof).is_negative());
    assert!(!Money::new(dec!(10), Currency::Xof).is_negative());
}

#[rstest]
#[case(dec!(600000), Currency::Xof, "600 000 FCFA")]
#[case(dec!(1250000), Currency::Xaf, "1 250 000 FCFA")]
#[case(dec!(999), Currency::Xof, "999 FCFA")]
#[case(dec!(-45000), Currency::Xof, "-45 000 FCFA")]
#[case(dec!(1234.5), Currency::Eur, "1 234,50 €")]
#[case(dec!(0), Currency::Usd, "0,00 $")]
fn test_format_fr(#[case] amount: Decimal, #[case] currency: Currency, #[case] expected: &str) {
    assert_eq!(Money::new(amount, currency).format_fr(), expected);
}

#[test]
fn test_currency_from_str() {
    assert_eq!(Currency::from_str("XOF").unwrap(), Currency::Xof);
    assert_eq!(Currency::from_str("xaf").unwrap(), Currency::Xaf);
    assert!(Currency::from_str("IDR").is_err());
    assert!(Currency::from_str("").is_err());
}

#[test]
fn test_currency_display_roundtrips() {
    for currency in [Currency::Xof, Currency::Xaf, Currency::Eur, Currency::Usd] {
        assert_eq!(Currency::from_str(&currency.to_string()).unwrap(), currency);
    }
}
