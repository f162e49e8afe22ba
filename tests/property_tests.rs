use keyheat::analysis::zones::{Axis, Predicate, Span, ZoneDefinition};
use keyheat::analysis::{
    aggregate, classify, IntensityScale, Normalization, UsageRecord, ZoneScheme,
};
use keyheat::geometry::{GridPos, KeyEntry, KeyLayout};
use proptest::prelude::*;

// --- STRATEGIES ---

prop_compose! {
    fn arb_record()(key in "[a-e]", count in 0i64..10_000) -> UsageRecord {
        UsageRecord::new(key, count)
    }
}

prop_compose! {
    fn arb_pos()(x in -3i32..20, y in -3i32..10) -> GridPos {
        GridPos::new(x, y)
    }
}

prop_compose! {
    fn arb_layout()(
        parts in proptest::collection::vec(proptest::collection::vec(arb_pos(), 1..4), 0..12)
    ) -> KeyLayout {
        let entries = parts
            .into_iter()
            .enumerate()
            .map(|(i, cells)| {
                let name = format!("{}", (b'a' + (i % 5) as u8) as char) + &i.to_string();
                if cells.len() == 1 {
                    KeyEntry::single(name, cells[0].x, cells[0].y)
                } else {
                    KeyEntry::split(name, cells).unwrap()
                }
            })
            .collect();
        KeyLayout::new(entries)
    }
}

fn arb_normalization() -> impl Strategy<Value = Normalization> {
    prop_oneof![
        (0.1f64..3.0).prop_map(|gamma| Normalization::Power { gamma }),
        Just(Normalization::Log),
        Just(Normalization::Linear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_aggregation_is_lossless(records in proptest::collection::vec(arb_record(), 1..60)) {
        let expected: u64 = records.iter().map(|r| r.count as u64).sum();
        prop_assume!(expected > 0);

        let counts = aggregate(records.clone()).unwrap();
        prop_assert_eq!(counts.total_presses(), expected);
        prop_assert_eq!(counts.values().sum::<u64>(), expected);

        for key in ["a", "b", "c", "d", "e"] {
            let per_key: u64 = records.iter().filter(|r| r.key == key).map(|r| r.count as u64).sum();
            prop_assert_eq!(counts.get(key), per_key);
        }
    }

    #[test]
    fn test_intensity_endpoints_and_monotonicity(
        values in proptest::collection::vec(0u64..1_000_000, 1..40),
        norm in arb_normalization(),
    ) {
        let scale = IntensityScale::from_counts(values.iter().copied(), norm);
        let lo = *values.iter().min().unwrap();
        let hi = *values.iter().max().unwrap();

        prop_assert_eq!(scale.intensity(lo), 0.0);
        if lo < hi {
            prop_assert_eq!(scale.intensity(hi), 1.0);
        }

        let mut sorted = values.clone();
        sorted.sort_unstable();
        let mapped: Vec<f64> = sorted.iter().map(|&c| scale.intensity(c)).collect();
        for w in mapped.windows(2) {
            prop_assert!(w[0] <= w[1]);
        }
        for v in mapped {
            prop_assert!(v.is_finite() && (0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_zone_total_counts_each_matching_position(
        layout in arb_layout(),
        cut in -3i32..20,
    ) {
        let records: Vec<UsageRecord> = layout
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| UsageRecord::new(e.name.clone(), i as i64 + 1))
            .chain(std::iter::once(UsageRecord::new("off-layout", 1)))
            .collect();
        let counts = aggregate(records).unwrap();

        let rule = Predicate::X(Span::new(None, Some(cut)));
        let scheme = ZoneScheme {
            title: "Prop".to_string(),
            label_prefix: String::new(),
            anchor: Axis::X,
            zones: vec![ZoneDefinition::new("left", rule.clone())],
        };
        let zone = classify(&layout, &counts, &scheme).results.remove(0);

        let expected: u128 = layout
            .entries()
            .iter()
            .map(|e| {
                let hits = e.positions().iter().filter(|&&p| rule.matches(p)).count() as u128;
                hits * u128::from(counts.get(&e.name))
            })
            .sum();

        prop_assert_eq!(zone.total, expected);
        let pct = expected as f64 / counts.total_presses() as f64 * 100.0;
        prop_assert!((zone.percentage - pct).abs() < 1e-9);
    }

    #[test]
    fn test_positions_match_declaration(cells in proptest::collection::vec(arb_pos(), 1..5), x in -5i32..5, y in -5i32..5) {
        let single = KeyEntry::single("k", x, y);
        prop_assert_eq!(single.positions(), &[GridPos::new(x, y)][..]);

        let split = KeyEntry::split("s", cells.clone()).unwrap();
        prop_assert_eq!(split.positions(), &cells[..]);
    }
}

#[test]
fn test_flat_counts_stay_finite() {
    let scale = IntensityScale::from_counts([7u64; 5], Normalization::default());
    for _ in 0..5 {
        let v = scale.intensity(7);
        assert!(v.is_finite());
    }
}
