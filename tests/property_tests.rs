mod common;

use adfgvx::cipher::{encrypt, Grid, PolybiusSquare, SubstitutionAlphabet};
use adfgvx::optimizer::{hill_climb, SearchBudget};
use adfgvx::scorer::Fitness;
use adfgvx::solver::{de_fraction, group_columns, profile_columns, HistogramMetric};
use fastrand::Rng;
use proptest::prelude::*;

use common::model;

// --- STRATEGIES ---

prop_compose! {
    fn arb_plain(max: usize)(text in prop::collection::vec(0u8..36, 4..max)) -> Vec<u8> {
        text
    }
}

prop_compose! {
    fn arb_alphabet()(seed in any::<u64>()) -> SubstitutionAlphabet {
        SubstitutionAlphabet::random(&mut Rng::with_seed(seed))
    }
}

prop_compose! {
    fn arb_square()(seed in any::<u64>()) -> PolybiusSquare {
        PolybiusSquare::random(&mut Rng::with_seed(seed))
    }
}

prop_compose! {
    fn arb_key()(half in 1usize..6, seed in any::<u64>()) -> Vec<usize> {
        Grid::random_key(&mut Rng::with_seed(seed), half * 2)
    }
}

fn is_bijection(alphabet: &SubstitutionAlphabet) -> bool {
    let mut seen = [false; 36];
    for &t in alphabet.targets() {
        if seen[t as usize] {
            return false;
        }
        seen[t as usize] = true;
    }
    true
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_fitness_is_deterministic(text in arb_plain(200), alphabet in arb_alphabet()) {
        prop_assert_eq!(model().fitness(&text, &alphabet), model().fitness(&text, &alphabet));
    }

    #[test]
    fn prop_fitness_is_bounded(text in arb_plain(200), alphabet in arb_alphabet()) {
        let f = model().fitness(&text, &alphabet);
        prop_assert!(f <= 0.0);
        prop_assert!(f >= model().floor() as f64 - 1e-6);
    }

    #[test]
    fn prop_swaps_keep_bijection(mut alphabet in arb_alphabet(), a in 0usize..36, b in 0usize..36) {
        alphabet.swap(a, b);
        prop_assert!(is_bijection(&alphabet));
        prop_assert_eq!(alphabet.inverse().inverse(), alphabet);
    }

    #[test]
    fn prop_hill_climb_is_monotone(text in arb_plain(120), start in arb_alphabet()) {
        let before = model().fitness(&text, &start);
        let out = hill_climb(model(), &text, &start, SearchBudget::evaluations(2_000)).unwrap();
        prop_assert!(out.fitness >= before);
        prop_assert!(is_bijection(&out.alphabet));
    }

    #[test]
    fn prop_de_fraction_inverts_fraction(
        text in arb_plain(150),
        square in arb_square(),
        half in 1usize..6,
    ) {
        // A partial last row holds whole pairs, since every symbol adds two cells.
        let grid = Grid::from_symbols(&square.fraction(&text), half * 2).unwrap();
        let first: Vec<&[u8]> = (0..half).map(|p| grid.column(2 * p)).collect();
        let second: Vec<&[u8]> = (0..half).map(|p| grid.column(2 * p + 1)).collect();
        prop_assert_eq!(de_fraction(&first, &second, &square).unwrap(), text);
    }

    #[test]
    fn prop_grouping_covers_every_column(text in arb_plain(300), square in arb_square(), key in arb_key()) {
        let k = key.len();
        let cipher = encrypt(&text, &square, &key).unwrap();
        prop_assume!(cipher.len() >= k);

        let grid = Grid::from_symbols(&cipher, k).unwrap();
        let hs = profile_columns(grid.columns()).unwrap();
        let p = group_columns(&hs[..k / 2], &hs[k / 2..], HistogramMetric::Aligned).unwrap();

        let mut all: Vec<usize> = p.first.iter().chain(&p.second).copied().collect();
        all.sort_unstable();
        prop_assert_eq!(all, (0..k).collect::<Vec<_>>());
        prop_assert_eq!(p.first.len(), k / 2);
    }
}
