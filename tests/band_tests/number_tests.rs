//! Tests for band numbers
//!
//! These tests verify:
//! - Canonicalization (padding, idempotence, rejection of non-digits)
//! - Matching band directory names
//! - Comparison by integer value across widths
//! - Successor numbers past the padding width

use std::cmp::Ordering;
use std::collections::HashSet;

use dura::band::number::{canonicalize, compare, match_band_name};
use dura::{BandNumber, DuraError};

// =============================================================================
// Canonicalization Tests
// =============================================================================

#[test]
fn test_canonicalize_pads_to_four_digits() {
    assert_eq!(canonicalize("0").unwrap(), "0000");
    assert_eq!(canonicalize("42").unwrap(), "0042");
    assert_eq!(canonicalize("9999").unwrap(), "9999");
    assert_eq!(canonicalize("123456").unwrap(), "123456");
}

#[test]
fn test_canonicalize_is_idempotent() {
    for s in ["0", "7", "42", "0042", "900", "9999", "10000", "00123", "990099"] {
        let once = canonicalize(s).unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice, "canonicalize not idempotent for {:?}", s);
    }
}

#[test]
fn test_canonicalize_rejects_non_digits() {
    for s in ["", "b0042", "-1", "+1", "12a", " 12", "12 ", "1.0", "pony", "٣"] {
        let result = canonicalize(s);
        assert!(
            matches!(result, Err(DuraError::InvalidFormat(ref text)) if text == s),
            "expected InvalidFormat for {:?}, got {:?}",
            s,
            result
        );
    }
}

// =============================================================================
// Name Matching Tests
// =============================================================================

#[test]
fn test_match_band_name() {
    assert_eq!(match_band_name("b0000"), Some("0000"));
    assert_eq!(match_band_name("b0042"), Some("0042"));
    assert_eq!(match_band_name("b420000"), Some("420000"));
    assert_eq!(match_band_name("pony"), None);
}

#[test]
fn test_match_band_name_rejects_near_misses() {
    assert_eq!(match_band_name("b"), None);
    assert_eq!(match_band_name("B0001"), None);
    assert_eq!(match_band_name("b00x1"), None);
    assert_eq!(match_band_name("0001"), None);
    assert_eq!(match_band_name("DURA"), None);
    assert_eq!(match_band_name("tmp-1-0"), None);
}

// =============================================================================
// Comparison Tests
// =============================================================================

#[test]
fn test_compare_examples() {
    assert_eq!(compare("0000", "0001"), Ordering::Less);
    assert_eq!(compare("0900", "0001"), Ordering::Greater);
    assert_eq!(compare("0900", "900"), Ordering::Equal);
    assert_eq!(compare("9000", "10001"), Ordering::Less);
    assert_eq!(compare("0", "0000"), Ordering::Equal);
}

#[test]
fn test_compare_is_antisymmetric() {
    let numbers = ["0", "0000", "0001", "0900", "900", "9999", "10000", "010000", "990099"];
    for a in numbers {
        for b in numbers {
            assert_eq!(compare(a, b), compare(b, a).reverse(), "{} vs {}", a, b);
        }
    }
}

#[test]
fn test_sort_is_independent_of_input_order() {
    let numbers = vec![
        "0000", "0001", "0042", "9998", "9999", "10000", "12345", "990099",
    ];

    let mut shuffled = vec![
        "12345", "0042", "990099", "0000", "9999", "10000", "0001", "9998",
    ];
    shuffled.sort_by(|a, b| compare(a, b));
    assert_eq!(shuffled, numbers);

    let mut lexical = numbers.clone();
    lexical.sort();
    lexical.sort_by(|a, b| compare(a, b));
    assert_eq!(lexical, numbers);

    let mut reversed = numbers.clone();
    reversed.reverse();
    reversed.sort_by(|a, b| compare(a, b));
    assert_eq!(reversed, numbers);
}

// =============================================================================
// BandNumber Tests
// =============================================================================

#[test]
fn test_band_number_equality_by_value() {
    let a = BandNumber::parse("900").unwrap();
    let b = BandNumber::parse("0900").unwrap();
    let c = BandNumber::parse("00900").unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a.as_str(), "0900");

    let set: HashSet<BandNumber> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_band_number_ordering() {
    let mut numbers: Vec<BandNumber> = ["10001", "9000", "0042", "0", "100000"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    numbers.sort();
    let sorted: Vec<&str> = numbers.iter().map(|n| n.as_str()).collect();
    assert_eq!(sorted, vec!["0000", "0042", "9000", "10001", "100000"]);
}

#[test]
fn test_band_number_next() {
    assert_eq!(BandNumber::zero().next(), "0001");
    assert_eq!(BandNumber::parse("0041").unwrap().next(), "0042");
    assert_eq!(BandNumber::parse("0099").unwrap().next(), "0100");
    assert_eq!(BandNumber::parse("9999").unwrap().next().as_str(), "10000");
    assert_eq!(BandNumber::parse("99999").unwrap().next().as_str(), "100000");
}

#[test]
fn test_band_number_next_beyond_u64() {
    let huge = BandNumber::parse("99999999999999999999999").unwrap();
    assert_eq!(huge.next().as_str(), "100000000000000000000000");
    assert!(huge.next() > huge);
}

#[test]
fn test_band_number_dir_name() {
    assert_eq!(BandNumber::zero().dir_name(), "b0000");
    assert_eq!(BandNumber::parse("12345").unwrap().dir_name(), "b12345");
    assert_eq!(
        BandNumber::from_dir_name("b0042"),
        Some(BandNumber::parse("42").unwrap())
    );
    assert_eq!(BandNumber::from_dir_name("pony"), None);
}
