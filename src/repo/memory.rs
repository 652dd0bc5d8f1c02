use chrono::Utc;

use tokio::sync::RwLock;

use uuid::Uuid;

use crate::error::Result;
use crate::model::{NewSubscription, Subscription, SubscriptionChanges};

use super::{SubscriptionFilter, SubscriptionStore};

/// Subscription store held in process memory, for tests and local runs
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    records: RwLock<Vec<Subscription>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a fully formed record in the store, replacing any with the same ID
    pub async fn seed(&self, subscription: Subscription) {
        let mut records = self.records.write().await;
        records.retain(|record| record.id != subscription.id);
        records.push(subscription);
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn list(
        &self,
        owner_id: Uuid,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<Subscription>> {
        let records = self.records.read().await;

        // Latest insert first among equal timestamps
        let mut subscriptions: Vec<Subscription> = records
            .iter()
            .rev()
            .filter(|record| record.owner_id == owner_id && filter.matches(record))
            .cloned()
            .collect();
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(subscriptions)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Subscription>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    async fn insert(&self, new_subscription: &NewSubscription) -> Result<Subscription> {
        let now = Utc::now();
        let new_subscription = new_subscription.clone();

        let subscription = Subscription {
            id: Uuid::new_v4(),
            owner_id: new_subscription.owner_id,
            name: new_subscription.name.into(),
            category: new_subscription.category,
            price: new_subscription.price,
            frequency: new_subscription.frequency,
            status: new_subscription.status,
            start_date: new_subscription.start_date,
            end_date: new_subscription.end_date,
            next_billing_date: new_subscription.next_billing_date,
            description: new_subscription.description,
            created_at: now,
            updated_at: now,
        };

        self.records.write().await.push(subscription.clone());

        Ok(subscription)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> Result<Option<Subscription>> {
        let mut records = self.records.write().await;

        let updated = records.iter_mut().find(|record| record.id == id).map(|record| {
            record.apply(changes);
            record.updated_at = Utc::now();
            record.clone()
        });

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.id != id);
        Ok(records.len() < before)
    }
}
