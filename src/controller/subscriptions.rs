use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpResponse};

use chrono::{NaiveDate, Utc};

use rust_decimal::Decimal;

use serde::{Deserialize, Deserializer};

use uuid::Uuid;

use crate::auth::Owner;
use crate::billing;
use crate::controller::{stats, Envelope};
use crate::domain::{
    max_price, round_cents, Category, Frequency, SubscriptionName, SubscriptionStatus,
};
use crate::error::{RestError, RestResult};
use crate::model::{NewSubscription, Subscription, SubscriptionChanges};
use crate::repo::{SubscriptionFilter, SubscriptionStore};

const MISSING_NAME_OR_PRICE: &str = "Please provide name and price";

/// Body deserialization wrapper for new subscriptions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscriptionBody {
    name: Option<String>,
    category: Option<Category>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    price: Option<Decimal>,
    frequency: Option<Frequency>,
    status: Option<SubscriptionStatus>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    next_billing_date: Option<NaiveDate>,
    description: Option<String>,
}

impl NewSubscriptionBody {
    /// Validate the body into a new subscription for `owner_id`.
    /// The start date defaults to `today`, the next billing date to one period after it.
    pub fn parse(self, owner_id: Uuid, today: NaiveDate) -> RestResult<NewSubscription> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| RestError::ParseError(MISSING_NAME_OR_PRICE.into()))?;
        let price = self
            .price
            .map(round_cents)
            .filter(|price| !price.is_zero())
            .ok_or_else(|| RestError::ParseError(MISSING_NAME_OR_PRICE.into()))?;

        let name: SubscriptionName = name.parse()?;
        let price = validate_price(price)?;
        let frequency = self.frequency.unwrap_or_default();
        let start_date = self.start_date.unwrap_or(today);
        let next_billing_date = self
            .next_billing_date
            .unwrap_or_else(|| billing::next_billing_date(start_date, frequency));

        Ok(NewSubscription {
            owner_id,
            name,
            category: self.category.unwrap_or_default(),
            price,
            frequency,
            status: self.status.unwrap_or_default(),
            start_date,
            end_date: self.end_date,
            next_billing_date,
            description: normalize_description(self.description),
        })
    }
}

/// Body deserialization wrapper for subscription updates.
/// Fields that are left out are not changed, `null` clears `endDate` and `description`.
/// `id`, `ownerId` and `createdAt` are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionBody {
    name: Option<String>,
    category: Option<Category>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    price: Option<Decimal>,
    frequency: Option<Frequency>,
    status: Option<SubscriptionStatus>,
    start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    end_date: Option<Option<NaiveDate>>,
    next_billing_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<Option<String>>,
    #[serde(default)]
    recompute_next_billing_date: bool,
}

impl TryFrom<UpdateSubscriptionBody> for SubscriptionChanges {
    type Error = RestError;

    fn try_from(body: UpdateSubscriptionBody) -> RestResult<Self> {
        let name = body
            .name
            .map(|name| name.parse::<SubscriptionName>())
            .transpose()?;
        let price = body
            .price
            .map(|price| validate_price(round_cents(price)))
            .transpose()?;

        Ok(Self {
            name,
            category: body.category,
            price,
            frequency: body.frequency,
            status: body.status,
            start_date: body.start_date,
            end_date: body.end_date,
            next_billing_date: body.next_billing_date,
            description: body.description.map(normalize_description),
            recompute_next_billing_date: body.recompute_next_billing_date,
        })
    }
}

/// Tell an explicit `null` (`Some(None)`) apart from a missing field (`None`)
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Prices must fit the `numeric(12, 2)` column
fn validate_price(price: Decimal) -> RestResult<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(RestError::ParseError("Price cannot be negative".into()));
    }
    if price > max_price() {
        return Err(RestError::ParseError(format!(
            "Price cannot exceed {}",
            max_price()
        )));
    }
    Ok(price)
}

/// Trim free text, blank becomes absent
fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|description| description.trim().to_string())
        .filter(|description| !description.is_empty())
}

/// Fetch a subscription and check that the caller owns it
async fn fetch_owned(
    store: &dyn SubscriptionStore,
    owner: &Owner,
    id: Uuid,
    action: &str,
) -> RestResult<Subscription> {
    let subscription = store
        .get(id)
        .await?
        .ok_or_else(|| RestError::NotFound("Subscription not found".into()))?;

    if subscription.owner_id != owner.id() {
        tracing::warn!("Owner {} attempted to {} subscription {}", owner.id(), action, id);
        return Err(RestError::Forbidden(format!(
            "Not authorized to {} this subscription",
            action
        )));
    }

    Ok(subscription)
}

/// List endpoint for the caller's subscriptions
#[tracing::instrument(name = "List subscriptions", skip(store))]
#[get("")]
async fn list(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
    filter: web::Query<SubscriptionFilter>,
) -> RestResult<HttpResponse> {
    let subscriptions = store.list(owner.id(), &filter).await?;

    Ok(HttpResponse::Ok().json(Envelope::list(subscriptions)))
}

#[tracing::instrument(name = "Get a subscription", skip(store))]
#[get("/{id}")]
async fn show(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
    path: web::Path<Uuid>,
) -> RestResult<HttpResponse> {
    let subscription = fetch_owned(store.get_ref(), &owner, path.into_inner(), "access").await?;

    Ok(HttpResponse::Ok().json(Envelope::data(subscription)))
}

/// Create endpoint for new subscriptions
#[tracing::instrument(name = "Create a new subscription", skip(store))]
#[post("")]
async fn create(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
    body: web::Json<NewSubscriptionBody>,
) -> RestResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let new_subscription = body.into_inner().parse(owner.id(), today)?;

    let subscription = store.insert(&new_subscription).await?;

    Ok(HttpResponse::Created()
        .json(Envelope::data(subscription).with_message("Subscription added successfully")))
}

#[tracing::instrument(name = "Update a subscription", skip(store))]
#[put("/{id}")]
async fn update(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSubscriptionBody>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();
    let changes: SubscriptionChanges = body.into_inner().try_into()?;

    fetch_owned(store.get_ref(), &owner, id, "update").await?;
    let subscription = store
        .update(id, changes)
        .await?
        .ok_or_else(|| RestError::NotFound("Subscription not found".into()))?;

    Ok(HttpResponse::Ok()
        .json(Envelope::data(subscription).with_message("Subscription updated successfully")))
}

#[tracing::instrument(name = "Delete a subscription", skip(store))]
#[delete("/{id}")]
async fn remove(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
    path: web::Path<Uuid>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();

    fetch_owned(store.get_ref(), &owner, id, "delete").await?;
    if !store.delete(id).await? {
        return Err(RestError::NotFound("Subscription not found".into()));
    }

    Ok(HttpResponse::Ok().json(Envelope::message("Subscription deleted successfully")))
}

/// Subscriptions API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/subscriptions")
        .service(stats::scope())
        .service(list)
        .service(create)
        .service(show)
        .service(update)
        .service(remove)
}
