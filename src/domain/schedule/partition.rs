//! Partition calculator and relevant-month projection.
//!
//! Both functions are pure: the result depends on the period alone. Every
//! consumer that needs bucket boundaries (tables, charts, exports) goes
//! through [`partition`] rather than keeping its own month table.

use super::{Bucket, Period, SubPeriod};

/// Ordered, gap-free buckets covering months 1..=12 for `period`.
pub fn partition(period: Period) -> Vec<Bucket> {
    match period {
        Period::HalfMonth => (1..=12)
            .flat_map(|month| {
                [
                    Bucket::half_unchecked(month, SubPeriod::First),
                    Bucket::half_unchecked(month, SubPeriod::Second),
                ]
            })
            .collect(),
        Period::Months(span) => (1..=12)
            .filter(|month| month % span.get() == 0)
            .map(Bucket::month_unchecked)
            .collect(),
    }
}

/// Months that carry an independent record under `period`, ascending.
///
/// Defined as the distinct end months of [`partition`], so aggregation
/// code never averages over months that have no bucket of their own.
pub fn relevant_months(period: Period) -> Vec<u8> {
    let mut months: Vec<u8> = partition(period).iter().map(Bucket::end_month).collect();
    months.dedup();
    months
}

/// True when `bucket` is one of the buckets of `partition(period)`.
pub fn is_member(period: Period, bucket: &Bucket) -> bool {
    bucket.matches_period(period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ends(period: Period) -> Vec<u8> {
        partition(period).iter().map(Bucket::end_month).collect()
    }

    #[test]
    fn quarterly_ends_every_three_months() {
        assert_eq!(ends(Period::QUARTERLY), vec![3, 6, 9, 12]);
    }

    #[test]
    fn annual_has_single_bucket() {
        assert_eq!(ends(Period::ANNUAL), vec![12]);
    }

    #[test]
    fn four_monthly_ends_at_four_eight_twelve() {
        assert_eq!(ends(Period::FOUR_MONTHLY), vec![4, 8, 12]);
    }

    #[test]
    fn half_month_emits_two_buckets_per_month() {
        let buckets = partition(Period::HalfMonth);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[0], Bucket::half(1, SubPeriod::First).unwrap());
        assert_eq!(buckets[1], Bucket::half(1, SubPeriod::Second).unwrap());
        assert_eq!(buckets[23], Bucket::half(12, SubPeriod::Second).unwrap());
    }

    #[test]
    fn relevant_months_follow_partition_end_months() {
        assert_eq!(relevant_months(Period::SEMIANNUAL), vec![6, 12]);
        assert_eq!(relevant_months(Period::BIMONTHLY), vec![2, 4, 6, 8, 10, 12]);
        assert_eq!(relevant_months(Period::HalfMonth), (1..=12).collect::<Vec<_>>());
        assert_eq!(relevant_months(Period::MONTHLY), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn membership_matches_partition() {
        for period in Period::ALL {
            for bucket in partition(period) {
                assert!(is_member(period, &bucket));
            }
        }
        assert!(!is_member(Period::QUARTERLY, &Bucket::month(4).unwrap()));
    }

    fn any_period() -> impl Strategy<Value = Period> {
        prop::sample::select(Period::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn partition_covers_every_slot_exactly_once(period in any_period()) {
            let mut covered = [0u8; 24];
            for bucket in partition(period) {
                let span = bucket.span(period);
                for slot in span.first..=span.last {
                    covered[usize::from(slot - 1)] += 1;
                }
            }
            prop_assert!(covered.iter().all(|&c| c == 1));
        }

        #[test]
        fn partition_is_deterministic_and_sorted(period in any_period()) {
            let first = partition(period);
            let second = partition(period);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
