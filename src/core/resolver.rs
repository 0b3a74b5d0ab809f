//! Effective-rate resolution.
//!
//! Pure functions over a room type's base rate and a snapshot of its adjustment ledger.
//! Nothing here touches the database: callers load the snapshot (see
//! [`crate::core::ledger::snapshot`]) and hand it in. Results depend only on the set of
//! adjustments and the reference date, never on the order the slice happens to be in.

use crate::{
    core::money::Money,
    entities::rate_adjustment,
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// The rate in force from a given date until the next point in a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatePoint {
    /// First calendar date on which `rate` applies
    pub effective_from: NaiveDate,
    /// Effective rate from that date on
    pub rate: Money,
    /// Net change contributed by the adjustments taking effect on this date
    pub delta: Money,
    /// IDs of the adjustments taking effect on this date, in ledger order
    pub applied: Vec<i64>,
}

/// Today's calendar date in UTC.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Computes the rate in force on `reference_date`.
///
/// Every adjustment with `effective_date <= reference_date` is summed onto the base rate.
/// Later-dated adjustments are ignored. The result is not clamped and may be negative.
///
/// # Errors
/// [`Error::ArithmeticOverflow`] if the final rate leaves the range of [`Money`]. Only the
/// total counts, so intermediate sums may exceed the range in any slice order. The whole
/// call fails; no adjustment is ever skipped.
pub fn resolve(
    base_rate: Money,
    adjustments: &[rate_adjustment::Model],
    reference_date: NaiveDate,
) -> Result<Money> {
    let total = adjustments
        .iter()
        .filter(|adjustment| adjustment.effective_date <= reference_date)
        .try_fold(i128::from(base_rate.cents()), |total, adjustment| {
            total.checked_add(i128::from(adjustment.amount_cents))
        })
        .ok_or(Error::ArithmeticOverflow)?;

    to_money(total)
}

fn to_money(cents: i128) -> Result<Money> {
    i64::try_from(cents)
        .map(Money::from_cents)
        .map_err(|_| Error::ArithmeticOverflow)
}

/// [`resolve`] with today as the reference date.
pub fn resolve_today(base_rate: Money, adjustments: &[rate_adjustment::Model]) -> Result<Money> {
    resolve(base_rate, adjustments, today())
}

/// Adjustments recorded but not yet in force on `reference_date`, in ledger order.
#[must_use]
pub fn pending(
    adjustments: &[rate_adjustment::Model],
    reference_date: NaiveDate,
) -> Vec<&rate_adjustment::Model> {
    let mut future: Vec<_> = adjustments
        .iter()
        .filter(|adjustment| adjustment.effective_date > reference_date)
        .collect();
    future.sort_by(|a, b| effective_order(a, b));
    future
}

/// Ledger order: effective date, then recording time, then insertion sequence.
#[must_use]
pub fn effective_order(a: &rate_adjustment::Model, b: &rate_adjustment::Model) -> Ordering {
    a.effective_date
        .cmp(&b.effective_date)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Reconstructs the full price history of a room type.
///
/// Produces one [`RatePoint`] per distinct effective date, in date order. Each point's
/// `rate` equals `resolve(base_rate, adjustments, point.effective_from)`. An empty ledger
/// gives an empty timeline; the base rate alone applies at every date.
pub fn rate_timeline(
    base_rate: Money,
    adjustments: &[rate_adjustment::Model],
) -> Result<Vec<RatePoint>> {
    let mut ordered: Vec<_> = adjustments.iter().collect();
    ordered.sort_by(|a, b| effective_order(a, b));

    // (effective date, running total, delta, applied ids), totals kept wide until the end
    let mut groups: Vec<(NaiveDate, i128, i128, Vec<i64>)> = Vec::new();
    let mut running = i128::from(base_rate.cents());

    for adjustment in ordered {
        let amount = i128::from(adjustment.amount_cents);
        running = running
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;

        match groups.last_mut() {
            Some((date, total, delta, applied)) if *date == adjustment.effective_date => {
                *total = running;
                *delta = delta.checked_add(amount).ok_or(Error::ArithmeticOverflow)?;
                applied.push(adjustment.id);
            }
            _ => groups.push((adjustment.effective_date, running, amount, vec![adjustment.id])),
        }
    }

    groups
        .into_iter()
        .map(|(effective_from, total, delta, applied)| {
            Ok(RatePoint {
                effective_from,
                rate: to_money(total)?,
                delta: to_money(delta)?,
                applied,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{DateTime, Duration, TimeZone};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recorded_at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn adjustment(id: i64, cents: i64, effective_date: NaiveDate) -> rate_adjustment::Model {
        rate_adjustment::Model {
            id,
            room_type_id: 1,
            amount_cents: cents,
            effective_date,
            reason: format!("adjustment {id}"),
            created_at: recorded_at(id),
        }
    }

    #[test]
    fn test_same_day_adjustments_both_apply() {
        let ledger = vec![
            adjustment(1, 2000, date(2024, 6, 1)),
            adjustment(2, -500, date(2024, 6, 1)),
        ];

        let rate = resolve(Money::from_cents(10000), &ledger, date(2024, 7, 1)).unwrap();
        assert_eq!(rate, Money::from_cents(11500));
        assert_eq!(rate.to_string(), "115.00");
    }

    #[test]
    fn test_future_adjustment_excluded_until_effective() {
        let ledger = vec![adjustment(1, 5000, date(2099, 1, 1))];
        let base = Money::from_cents(10000);

        assert_eq!(
            resolve(base, &ledger, date(2024, 7, 1)).unwrap(),
            Money::from_cents(10000)
        );
        assert_eq!(
            resolve(base, &ledger, date(2099, 6, 1)).unwrap(),
            Money::from_cents(15000)
        );
    }

    #[test]
    fn test_adjustment_applies_on_its_effective_date() {
        let ledger = vec![adjustment(1, 1000, date(2024, 6, 1))];
        let base = Money::from_cents(10000);

        assert_eq!(resolve(base, &ledger, date(2024, 5, 31)).unwrap(), base);
        assert_eq!(
            resolve(base, &ledger, date(2024, 6, 1)).unwrap(),
            Money::from_cents(11000)
        );
    }

    #[test]
    fn test_empty_ledger_resolves_to_base_rate() {
        let base = Money::from_cents(15000);
        assert_eq!(resolve(base, &[], date(2024, 1, 1)).unwrap(), base);
        assert_eq!(resolve_today(base, &[]).unwrap(), base);
    }

    #[test]
    fn test_discounts_are_not_clamped() {
        let ledger = vec![adjustment(1, -15000, date(2024, 1, 1))];
        let rate = resolve(Money::from_cents(10000), &ledger, date(2024, 1, 2)).unwrap();
        assert_eq!(rate, Money::from_cents(-5000));
        assert!(rate.is_negative());
    }

    #[test]
    fn test_overflow_aborts_resolution() {
        let ledger = vec![
            adjustment(1, i64::MAX, date(2024, 1, 1)),
            adjustment(2, 1, date(2024, 1, 1)),
        ];
        let err = resolve(Money::ZERO, &ledger, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::ArithmeticOverflow));

        // The overflowing entry is still in the future here, so the call succeeds
        let ledger = vec![
            adjustment(1, i64::MAX, date(2024, 1, 1)),
            adjustment(2, 1, date(2025, 1, 1)),
        ];
        assert_eq!(
            resolve(Money::ZERO, &ledger, date(2024, 6, 1)).unwrap(),
            Money::from_cents(i64::MAX)
        );
    }

    #[test]
    fn test_overflow_depends_on_total_not_slice_order() {
        let base = Money::ZERO;
        let reference = date(2024, 6, 1);
        let orders = [
            [i64::MAX, -1, 1],
            [i64::MAX, 1, -1],
            [1, i64::MAX, -1],
        ];

        for amounts in orders {
            let ledger: Vec<_> = amounts
                .iter()
                .enumerate()
                .map(|(i, &cents)| {
                    adjustment(i64::try_from(i).unwrap() + 1, cents, date(2024, 1, 1))
                })
                .collect();
            assert_eq!(
                resolve(base, &ledger, reference).unwrap(),
                Money::from_cents(i64::MAX)
            );
            assert_eq!(
                rate_timeline(base, &ledger).unwrap()[0].rate,
                Money::from_cents(i64::MAX)
            );
        }

        // An earlier overflowing entry is rescued by a later-dated discount
        let ledger = vec![
            adjustment(1, i64::MAX, date(2024, 1, 1)),
            adjustment(2, 1, date(2024, 1, 1)),
            adjustment(3, -1, date(2024, 2, 1)),
        ];
        assert!(matches!(
            resolve(base, &ledger, date(2024, 1, 15)),
            Err(Error::ArithmeticOverflow)
        ));
        assert_eq!(
            resolve(base, &ledger, reference).unwrap(),
            Money::from_cents(i64::MAX)
        );
        assert!(matches!(
            rate_timeline(base, &ledger),
            Err(Error::ArithmeticOverflow)
        ));
    }

    #[test]
    fn test_pending_lists_future_adjustments_in_order() {
        let ledger = vec![
            adjustment(3, 300, date(2030, 1, 1)),
            adjustment(1, 100, date(2024, 1, 1)),
            adjustment(2, 200, date(2026, 1, 1)),
        ];
        let ids: Vec<i64> = pending(&ledger, date(2025, 1, 1))
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_effective_order_tiebreaks() {
        let mut first = adjustment(5, 100, date(2024, 1, 1));
        let mut second = adjustment(4, 100, date(2024, 1, 1));
        // Same date, earlier recording wins
        first.created_at = recorded_at(0);
        second.created_at = recorded_at(10);
        assert_eq!(effective_order(&first, &second), Ordering::Less);

        // Same date and timestamp, insertion sequence decides
        second.created_at = first.created_at;
        assert_eq!(effective_order(&first, &second), Ordering::Greater);
    }

    #[test]
    fn test_rate_timeline_out_of_order_appends() {
        // Recorded: a June surcharge, then a backdated March discount, then a second June entry
        let ledger = vec![
            adjustment(1, 2000, date(2024, 6, 1)),
            adjustment(2, -1000, date(2024, 3, 1)),
            adjustment(3, -500, date(2024, 6, 1)),
        ];
        let base = Money::from_cents(10000);

        let timeline = rate_timeline(base, &ledger).unwrap();
        assert_eq!(
            timeline,
            vec![
                RatePoint {
                    effective_from: date(2024, 3, 1),
                    rate: Money::from_cents(9000),
                    delta: Money::from_cents(-1000),
                    applied: vec![2],
                },
                RatePoint {
                    effective_from: date(2024, 6, 1),
                    rate: Money::from_cents(10500),
                    delta: Money::from_cents(1500),
                    applied: vec![1, 3],
                },
            ]
        );

        for point in &timeline {
            assert_eq!(
                resolve(base, &ledger, point.effective_from).unwrap(),
                point.rate
            );
        }
    }

    #[test]
    fn test_rate_timeline_empty() {
        assert!(rate_timeline(Money::from_cents(100), &[]).unwrap().is_empty());
    }

    fn ledger_strategy() -> impl Strategy<Value = Vec<rate_adjustment::Model>> {
        prop::collection::vec((-1_000_000i64..1_000_000, 0i64..3650), 0..40).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, (cents, offset))| {
                        let id = i64::try_from(i).unwrap() + 1;
                        adjustment(id, cents, date(2020, 1, 1) + Duration::days(offset))
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_resolve_is_permutation_invariant(
            (ledger, shuffled) in ledger_strategy()
                .prop_flat_map(|ledger| (Just(ledger.clone()), Just(ledger).prop_shuffle())),
            base in 0i64..10_000_000,
            offset in 0i64..4000,
        ) {
            let base = Money::from_cents(base);
            let reference = date(2020, 1, 1) + Duration::days(offset);
            prop_assert_eq!(
                resolve(base, &ledger, reference).unwrap(),
                resolve(base, &shuffled, reference).unwrap()
            );
            prop_assert_eq!(
                rate_timeline(base, &ledger).unwrap(),
                rate_timeline(base, &shuffled).unwrap()
            );
        }

        #[test]
        fn prop_future_adjustments_never_leak(
            ledger in ledger_strategy(),
            base in 0i64..10_000_000,
            offset in 0i64..4000,
        ) {
            let base = Money::from_cents(base);
            let reference = date(2020, 1, 1) + Duration::days(offset);
            let filtered: Vec<_> = ledger
                .iter()
                .filter(|a| a.effective_date <= reference)
                .cloned()
                .collect();
            prop_assert_eq!(
                resolve(base, &ledger, reference).unwrap(),
                resolve(base, &filtered, reference).unwrap()
            );
        }

        #[test]
        fn prop_resolve_is_idempotent(
            ledger in ledger_strategy(),
            base in 0i64..10_000_000,
            offset in 0i64..4000,
        ) {
            let base = Money::from_cents(base);
            let reference = date(2020, 1, 1) + Duration::days(offset);
            let first = resolve(base, &ledger, reference).unwrap();
            for _ in 0..3 {
                prop_assert_eq!(resolve(base, &ledger, reference).unwrap(), first);
            }
        }

        #[test]
        fn prop_timeline_agrees_with_resolve(
            ledger in ledger_strategy(),
            base in 0i64..10_000_000,
        ) {
            let base = Money::from_cents(base);
            for point in rate_timeline(base, &ledger).unwrap() {
                prop_assert_eq!(resolve(base, &ledger, point.effective_from).unwrap(), point.rate);
            }
        }
    }
}
