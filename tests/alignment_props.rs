use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;
use std::collections::BTreeSet;
use weekday_align::analyzer::alignment::{intersection, keep_all_primary};
use weekday_align::model::{Observation, WeekdaySeries};
use weekday_align::normalizer::{keep_weekdays_only, normalize_all};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

fn arb_observations() -> impl Strategy<Value = Vec<Observation>> {
    proptest::collection::vec((0u64..120, proptest::option::of(-1000.0f64..1000.0)), 0..80).prop_map(|rows| {
        rows.into_iter()
            .map(|(offset, value)| Observation {
                date: base() + chrono::Days::new(offset),
                value,
            })
            .collect()
    })
}

fn arb_series(name: &'static str) -> impl Strategy<Value = WeekdaySeries> {
    proptest::collection::btree_map(0u64..120, 1.0f64..500.0, 1..60).prop_map(move |points| {
        let series = WeekdaySeries::from_sorted(
            name,
            points.into_iter().map(|(offset, v)| (base() + chrono::Days::new(offset), v)),
        );
        keep_weekdays_only(series)
    })
}

proptest! {
    #[test]
    fn normalized_series_are_weekday_only_and_strictly_increasing(obs in arb_observations()) {
        let series = keep_weekdays_only(normalize_all("x", obs).into_dense());
        for date in series.dates() {
            prop_assert!(!matches!(date.weekday(), Weekday::Sat | Weekday::Sun));
        }
        prop_assert!(series.dates().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn keep_all_primary_is_total(primary in arb_series("p"), secondary in arb_series("s")) {
        prop_assume!(!secondary.is_empty());
        let pair = keep_all_primary(&primary, &secondary).unwrap();
        prop_assert_eq!(pair.primary.dates(), primary.dates());
        prop_assert_eq!(pair.secondary.dates(), primary.dates());
        prop_assert!(pair.secondary.values().iter().all(|v| v.is_finite()));
        // observed values pass through untouched
        for (date, value) in pair.secondary.iter() {
            if let Some(orig) = secondary.get(date) {
                prop_assert_eq!(value, orig);
            }
        }
    }

    #[test]
    fn intersection_is_the_set_intersection(primary in arb_series("p"), secondary in arb_series("s")) {
        let pair = intersection(&primary, &secondary);
        let p: BTreeSet<_> = primary.dates().iter().copied().collect();
        let s: BTreeSet<_> = secondary.dates().iter().copied().collect();
        let expected: Vec<_> = p.intersection(&s).copied().collect();
        prop_assert_eq!(pair.primary.dates(), expected.as_slice());
        prop_assert_eq!(pair.secondary.dates(), expected.as_slice());
    }
}
