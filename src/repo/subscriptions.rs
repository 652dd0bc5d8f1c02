use chrono::{DateTime, NaiveDate, Utc};

use rust_decimal::Decimal;

use serde::Deserialize;

use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::SubscriptionStatus;
use crate::error::{Error, Result};
use crate::model::{NewSubscription, Subscription, SubscriptionChanges};

/// Subscription store trait, implemented for each backing store.
/// NOTE: Handlers only see the trait object, so tests can run against the in-memory store
#[async_trait::async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// All subscriptions of an owner matching the filter, newest first
    async fn list(&self, owner_id: Uuid, filter: &SubscriptionFilter)
        -> Result<Vec<Subscription>>;

    /// Fetch a subscription by ID, regardless of owner
    async fn get(&self, id: Uuid) -> Result<Option<Subscription>>;

    /// Store a new subscription, assigning its ID and timestamps
    async fn insert(&self, new_subscription: &NewSubscription) -> Result<Subscription>;

    /// Apply a change set, `None` if no subscription has the ID
    async fn update(&self, id: Uuid, changes: SubscriptionChanges)
        -> Result<Option<Subscription>>;

    /// Hard delete, `false` if no subscription has the ID
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Optional narrowing of a subscription listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionFilter {
    pub status: Option<SubscriptionStatus>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

impl SubscriptionFilter {
    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        let status_matches = self
            .status
            .map_or(true, |status| subscription.status == status);
        let search_matches = self.search_term().map_or(true, |term| {
            subscription
                .name
                .to_lowercase()
                .contains(&term.to_lowercase())
        });

        status_matches && search_matches
    }
}

/// Escape `ilike` wildcards so a search term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Row shape of the `subscriptions` table
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    category: String,
    price: Decimal,
    frequency: String,
    status: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    next_billing_date: NaiveDate,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = Error;

    fn try_from(row: SubscriptionRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            category: row.category.parse()?,
            price: row.price,
            frequency: row.frequency.into(),
            status: row.status.parse()?,
            start_date: row.start_date,
            end_date: row.end_date,
            next_billing_date: row.next_billing_date,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Postgres Subscription store
#[derive(Debug, Clone)]
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    #[tracing::instrument(name = "Fetch subscriptions for owner", skip(self))]
    async fn list(
        &self,
        owner_id: Uuid,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            select * from subscriptions
            where owner_id = $1
              and ($2::text is null or status = $2)
              and ($3::text is null or name ilike $3)
            order by created_at desc
            "#,
        )
        .bind(owner_id)
        .bind(filter.status.map(|status| status.as_str()))
        .bind(filter.search_term().map(like_pattern))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    #[tracing::instrument(name = "Fetch a subscription by id", skip(self))]
    async fn get(&self, id: Uuid) -> Result<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>("select * from subscriptions where id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Subscription::try_from).transpose()
    }

    #[tracing::instrument(name = "Insert subscription", skip(self))]
    async fn insert(&self, new_subscription: &NewSubscription) -> Result<Subscription> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            insert into subscriptions (
                id, owner_id, name, category, price, frequency, status,
                start_date, end_date, next_billing_date, description
            )
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            returning *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_subscription.owner_id)
        .bind(new_subscription.name.as_ref())
        .bind(new_subscription.category.as_str())
        .bind(new_subscription.price)
        .bind(new_subscription.frequency.as_str())
        .bind(new_subscription.status.as_str())
        .bind(new_subscription.start_date)
        .bind(new_subscription.end_date)
        .bind(new_subscription.next_billing_date)
        .bind(new_subscription.description.as_deref())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[tracing::instrument(name = "Update subscription", skip(self))]
    async fn update(
        &self,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> Result<Option<Subscription>> {
        // Lock the row so concurrent updates apply one after the other
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, SubscriptionRow>(
            "select * from subscriptions where id = $1 for update",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut subscription = match row {
            Some(row) => Subscription::try_from(row)?,
            None => return Ok(None),
        };
        subscription.apply(changes);

        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            update subscriptions
            set name = $2, category = $3, price = $4, frequency = $5, status = $6,
                start_date = $7, end_date = $8, next_billing_date = $9, description = $10,
                updated_at = now()
            where id = $1
            returning *
            "#,
        )
        .bind(id)
        .bind(&subscription.name)
        .bind(subscription.category.as_str())
        .bind(subscription.price)
        .bind(subscription.frequency.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.next_billing_date)
        .bind(subscription.description.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Subscription::try_from(row).map(Some)
    }

    #[tracing::instrument(name = "Delete subscription", skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("delete from subscriptions where id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
