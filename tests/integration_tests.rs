mod common;

use common::{assert_is_sorted_rearrangement, assert_sorted_permutation};
use pssort::prelude::*;
use rand::Rng;

fn indices_of(input: &[Vec<u8>]) -> Vec<usize> {
    let mut out = vec![0usize; input.len()];
    sort_out(input, &mut out);
    out
}

#[test]
fn test_basic_sort_strings() {
    let input = vec![
        "banana".to_string(),
        "apple".to_string(),
        "cherry".to_string(),
        "date".to_string(),
    ];

    let mut out = vec![0usize; input.len()];
    sort_out(&input, &mut out);

    let sorted: Vec<&String> = out.iter().map(|&i| &input[i]).collect();
    assert_eq!(sorted, vec!["apple", "banana", "cherry", "date"]);
}

#[test]
fn test_long_common_prefix() {
    let prefix = "a".repeat(100);
    let input = vec![
        format!("{}c", prefix),
        format!("{}a", prefix),
        format!("{}b", prefix),
    ];

    let mut out = vec![0usize; input.len()];
    sort_out(&input, &mut out);
    let sorted: Vec<&String> = out.iter().map(|&i| &input[i]).collect();

    assert!(sorted[0].ends_with('a'));
    assert!(sorted[1].ends_with('b'));
    assert!(sorted[2].ends_with('c'));
}

#[test]
fn test_cache_boundary_sort() {
    // Differences at byte 7, 8, 9 to exercise the u64 cache window's
    // edges and the depth+8 recursion into the next window. Filler must
    // be non-zero: a leading zero byte would terminate every row's
    // logical length at offset 0, before the differing byte is ever
    // reached, collapsing all six rows to the same empty key.
    let base = vec![1u8; 16];

    let mut v1 = base.clone();
    v1[7] = 2;
    let mut v2 = base.clone();
    v2[7] = 1;

    let mut v3 = base.clone();
    v3[8] = 2;
    let mut v4 = base.clone();
    v4[8] = 1;

    let mut v5 = base.clone();
    v5[9] = 2;
    let mut v6 = base.clone();
    v6[9] = 1;

    let input = vec![v1, v2, v3, v4, v5, v6];

    let out = indices_of(&input);

    let mut expected = input.clone();
    expected.sort();
    let actual: Vec<Vec<u8>> = out.iter().map(|&i| input[i].clone()).collect();
    assert_eq!(actual, expected);
}

/// Fully random bytes hit embedded NULs often enough that two distinct
/// rows can tie logically without being byte-for-byte equal; the oracle
/// here is permutation + non-decreasing logical order, not exact equality
/// against a raw `Vec::sort()`.
#[test]
fn test_fuzz_random() {
    let mut rng = rand::rng();
    let mut input: Vec<Vec<u8>> = Vec::new();

    for _ in 0..10_000 {
        let len = rng.random_range(0..50);
        let mut row = vec![0u8; len];
        rng.fill(&mut row[..]);
        input.push(row);
    }

    let out = indices_of(&input);
    assert_sorted_permutation(&input, &out);
}

#[test]
fn test_fuzz_random_mut() {
    let mut rng = rand::rng();

    for _ in 0..10_000 {
        let count = rng.random_range(0..20);
        let input: Vec<Vec<u8>> = (0..count)
            .map(|_| {
                let inner_len = rng.random_range(0..50);
                let mut inner = vec![0u8; inner_len];
                rng.fill(&mut inner[..]);
                inner
            })
            .collect();

        let mut sorted = input.clone();
        sort(&mut sorted);
        assert_is_sorted_rearrangement(&input, &sorted);
    }
}

#[test]
fn test_fuzz_random_mut_large() {
    let mut rng = rand::rng();

    for _ in 0..100 {
        let count = rng.random_range(100..1000);
        let input: Vec<Vec<u8>> = (0..count)
            .map(|_| {
                let inner_len = rng.random_range(0..100);
                let mut inner = vec![0u8; inner_len];
                rng.fill(&mut inner[..]);
                inner
            })
            .collect();

        let mut sorted = input.clone();
        sort(&mut sorted);
        assert_is_sorted_rearrangement(&input, &sorted);
    }
}

#[test]
fn test_fuzz_edge_cases_mut() {
    let mut input = vec![vec![]; 50];
    let expected = input.clone();
    sort(&mut input);
    assert_eq!(input, expected);

    let mut input = vec![vec![1, 2, 3]; 50];
    let expected = input.clone();
    sort(&mut input);
    assert_eq!(input, expected);

    let mut input: Vec<Vec<u8>> = (0..50).map(|i| vec![i as u8]).rev().collect();
    let mut expected = input.clone();
    expected.sort();
    sort(&mut input);
    assert_eq!(input, expected);

    let mut input: Vec<Vec<u8>> = (0..50).map(|i| vec![i as u8]).collect();
    let expected = input.clone();
    sort(&mut input);
    assert_eq!(input, expected);
}

#[test]
fn test_vec_deque() {
    use std::collections::VecDeque;
    let input: VecDeque<String> = VecDeque::from(vec![
        "banana".to_string(),
        "apple".to_string(),
        "cherry".to_string(),
    ]);

    let mut out = vec![0usize; input.len()];
    sort_out(&input, &mut out);

    let sorted: Vec<&String> = out.iter().map(|&i| &input[i]).collect();
    assert_eq!(sorted, vec!["apple", "banana", "cherry"]);
}

#[test]
fn test_empty() {
    let input: Vec<String> = vec![];
    let mut out: Vec<usize> = vec![];
    sort_out(&input, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_mutable_sort() {
    let mut data = vec![
        "banana".to_string(),
        "apple".to_string(),
        "cherry".to_string(),
    ];
    sort(&mut data);
    assert_eq!(data, vec!["apple", "banana", "cherry"]);
}
