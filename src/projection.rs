use chrono::{DateTime, Datelike, Utc};

use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use crate::domain::{round_cents, saturating_total, Frequency};
use crate::model::Subscription;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_PER_YEAR: i64 = 12;
const FORWARD_MONTHS: i32 = 6;
const TRAILING_MONTHS: i32 = 12;

/// One bucket of a spending chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPoint {
    /// Three letter month abbreviation
    #[serde(rename = "name")]
    pub label: String,
    #[serde(rename = "spending", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingOverview {
    pub total_active: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_spending: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub yearly_spending: Decimal,
    pub total_subscriptions: usize,
}

/// A calendar month as a running count of months since year 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MonthIndex(i32);

impl MonthIndex {
    fn of<T: Datelike>(date: &T) -> Self {
        Self(date.year() * 12 + date.month0() as i32)
    }

    fn offset(self, months: i32) -> Self {
        Self(self.0 + months)
    }

    fn label(self) -> &'static str {
        MONTH_ABBREVIATIONS[self.0.rem_euclid(12) as usize]
    }
}

fn months_per_year() -> Decimal {
    Decimal::from(MONTHS_PER_YEAR)
}

/// Whether the subscription had been recorded by the end of `month`
fn existed_in(subscription: &Subscription, month: MonthIndex) -> bool {
    MonthIndex::of(&subscription.created_at) <= month
}

fn point(month: MonthIndex, amount: Decimal) -> SpendingPoint {
    SpendingPoint {
        label: month.label().to_string(),
        amount: round_cents(amount),
    }
}

/// Nominal monthly spending for the month containing `now` and the five after it.
///
/// Active monthly subscriptions count in every month. Active yearly
/// subscriptions count as a twelfth of their price from the month they were
/// created onwards.
pub fn project_forward_months(
    subscriptions: &[Subscription],
    now: DateTime<Utc>,
) -> Vec<SpendingPoint> {
    let current = MonthIndex::of(&now);

    (0..FORWARD_MONTHS)
        .map(|i| {
            let month = current.offset(i);
            let amounts = subscriptions
                .iter()
                .filter(|subscription| subscription.is_active())
                .map(|subscription| match subscription.frequency {
                    Frequency::Monthly => subscription.price,
                    Frequency::Yearly if existed_in(subscription, month) => {
                        subscription.price / months_per_year()
                    }
                    Frequency::Yearly => Decimal::ZERO,
                });

            point(month, saturating_total(amounts))
        })
        .collect()
}

/// Annualized spending for the twelve months ending with the month containing `now`,
/// oldest first.
///
/// Only subscriptions created on or before a month count towards it. Yearly
/// subscriptions contribute their price, monthly ones twelve times theirs.
pub fn project_trailing_months(
    subscriptions: &[Subscription],
    now: DateTime<Utc>,
) -> Vec<SpendingPoint> {
    let current = MonthIndex::of(&now);

    (0..TRAILING_MONTHS)
        .rev()
        .map(|i| {
            let month = current.offset(-i);
            let amounts = subscriptions
                .iter()
                .filter(|subscription| subscription.is_active())
                .filter(|subscription| existed_in(subscription, month))
                .map(|subscription| match subscription.frequency {
                    Frequency::Yearly => subscription.price,
                    Frequency::Monthly => subscription.price.saturating_mul(months_per_year()),
                });

            point(month, saturating_total(amounts))
        })
        .collect()
}

/// Counts and current run-rate of a user's subscriptions.
///
/// `yearly_spending` covers yearly subscriptions only, unlike the trailing chart.
pub fn overview(subscriptions: &[Subscription]) -> SpendingOverview {
    let active = || subscriptions.iter().filter(|s| s.is_active());

    let monthly_spending = saturating_total(active().map(|subscription| {
        match subscription.frequency {
            Frequency::Monthly => subscription.price,
            Frequency::Yearly => subscription.price / months_per_year(),
        }
    }));

    let yearly_spending = saturating_total(
        active()
            .filter(|subscription| subscription.frequency == Frequency::Yearly)
            .map(|subscription| subscription.price),
    );

    SpendingOverview {
        total_active: active().count(),
        monthly_spending: round_cents(monthly_spending),
        yearly_spending: round_cents(yearly_spending),
        total_subscriptions: subscriptions.len(),
    }
}
