use chrono::{Months, NaiveDate};

use rust_decimal::Decimal;

use serde::Serialize;

use uuid::Uuid;

use crate::domain::Frequency;
use crate::model::Subscription;

/// The date of the first charge after `start_date`.
///
/// Calendar arithmetic: the day of month is kept where the target month has
/// it, otherwise the date is clamped to the last day of that month
/// (2025-01-31 -> 2025-02-28). Saturates at `NaiveDate::MAX`.
pub fn next_billing_date(start_date: NaiveDate, frequency: Frequency) -> NaiveDate {
    let period = match frequency {
        Frequency::Monthly => Months::new(1),
        Frequency::Yearly => Months::new(12),
    };

    start_date
        .checked_add_months(period)
        .unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    DueTomorrow,
    Overdue,
}

/// A reminder about an upcoming or missed charge
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAlert {
    pub subscription_id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub next_billing_date: NaiveDate,
    /// Whole days from `today` to the billing date, negative when overdue
    pub days_until: i64,
    pub kind: AlertKind,
}

/// Alerts for active subscriptions billed tomorrow or already overdue
pub fn billing_alerts(subscriptions: &[Subscription], today: NaiveDate) -> Vec<BillingAlert> {
    subscriptions
        .iter()
        .filter(|subscription| subscription.is_active())
        .filter_map(|subscription| {
            let days_until = subscription
                .next_billing_date
                .signed_duration_since(today)
                .num_days();

            let kind = match days_until {
                1 => AlertKind::DueTomorrow,
                days if days < 0 => AlertKind::Overdue,
                _ => return None,
            };

            Some(BillingAlert {
                subscription_id: subscription.id,
                name: subscription.name.clone(),
                price: subscription.price,
                next_billing_date: subscription.next_billing_date,
                days_until,
                kind,
            })
        })
        .collect()
}
