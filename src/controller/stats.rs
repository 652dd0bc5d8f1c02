use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpResponse};

use chrono::Utc;

use crate::auth::Owner;
use crate::billing;
use crate::controller::Envelope;
use crate::error::RestResult;
use crate::model::Subscription;
use crate::projection;
use crate::repo::{SubscriptionFilter, SubscriptionStore};

async fn all_subscriptions(
    store: &dyn SubscriptionStore,
    owner: &Owner,
) -> RestResult<Vec<Subscription>> {
    let subscriptions = store
        .list(owner.id(), &SubscriptionFilter::default())
        .await?;
    Ok(subscriptions)
}

#[tracing::instrument(name = "Spending overview", skip(store))]
#[get("/overview")]
async fn overview(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
) -> RestResult<HttpResponse> {
    let subscriptions = all_subscriptions(store.get_ref(), &owner).await?;

    Ok(HttpResponse::Ok().json(Envelope::data(projection::overview(&subscriptions))))
}

#[tracing::instrument(name = "Forward monthly spending chart", skip(store))]
#[get("/monthly-chart")]
async fn monthly_chart(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
) -> RestResult<HttpResponse> {
    let subscriptions = all_subscriptions(store.get_ref(), &owner).await?;
    let points = projection::project_forward_months(&subscriptions, Utc::now());

    Ok(HttpResponse::Ok().json(Envelope::data(points)))
}

#[tracing::instrument(name = "Trailing yearly spending chart", skip(store))]
#[get("/yearly-chart")]
async fn yearly_chart(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
) -> RestResult<HttpResponse> {
    let subscriptions = all_subscriptions(store.get_ref(), &owner).await?;
    let points = projection::project_trailing_months(&subscriptions, Utc::now());

    Ok(HttpResponse::Ok().json(Envelope::data(points)))
}

#[tracing::instrument(name = "Billing alerts", skip(store))]
#[get("/billing-alerts")]
async fn billing_alerts(
    owner: Owner,
    store: web::Data<dyn SubscriptionStore>,
) -> RestResult<HttpResponse> {
    let subscriptions = all_subscriptions(store.get_ref(), &owner).await?;
    let alerts = billing::billing_alerts(&subscriptions, Utc::now().date_naive());

    Ok(HttpResponse::Ok().json(Envelope::list(alerts)))
}

/// Dashboard statistics endpoints, nested under `/subscriptions`
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/stats")
        .service(overview)
        .service(monthly_chart)
        .service(yearly_chart)
        .service(billing_alerts)
}
