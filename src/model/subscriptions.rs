use chrono::{DateTime, NaiveDate, Utc};

use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::billing;
use crate::domain::{Category, Frequency, SubscriptionName, SubscriptionStatus};

/// New Subscription request, validated and ready to store
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub owner_id: Uuid,
    pub name: SubscriptionName,
    pub category: Category,
    pub price: Decimal,
    pub frequency: Frequency,
    pub status: SubscriptionStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Always present. Filled from the start date when the client leaves it out.
    pub next_billing_date: NaiveDate,
    pub description: Option<String>,
}

/// Stored Subscription record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// ID of the subscription
    pub id: Uuid,
    /// ID of the user that owns this subscription
    pub owner_id: Uuid,
    pub name: String,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub frequency: Frequency,
    pub status: SubscriptionStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_billing_date: NaiveDate,
    pub description: Option<String>,
    /// Creation timestamp, the "active since" reference for spending projections
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Apply a change set in place.
    /// `updated_at` is left to the store.
    pub fn apply(&mut self, changes: SubscriptionChanges) {
        if let Some(name) = changes.name {
            self.name = name.into();
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(frequency) = changes.frequency {
            self.frequency = frequency;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(start_date) = changes.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            self.end_date = end_date;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }

        match changes.next_billing_date {
            Some(next_billing_date) => self.next_billing_date = next_billing_date,
            None if changes.recompute_next_billing_date => {
                self.next_billing_date =
                    billing::next_billing_date(self.start_date, self.frequency);
            }
            None => {}
        }
    }
}

/// Partial update for a stored subscription.
/// `None` leaves a field untouched; for nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionChanges {
    pub name: Option<SubscriptionName>,
    pub category: Option<Category>,
    pub price: Option<Decimal>,
    pub frequency: Option<Frequency>,
    pub status: Option<SubscriptionStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub next_billing_date: Option<NaiveDate>,
    pub description: Option<Option<String>>,
    /// Recompute the next billing date from the (updated) start date and frequency.
    /// Ignored when `next_billing_date` is supplied.
    pub recompute_next_billing_date: bool,
}
