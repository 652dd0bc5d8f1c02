use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::controller::subscriptions;
use crate::crypto::SigningKey;
use crate::error::RestError;
use crate::repo::SubscriptionStore;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Report malformed bodies, paths and queries with the failure envelope
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| RestError::ParseError(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| RestError::ParseError(err.to_string()).into())
}

/// An ID that does not parse cannot name a stored subscription
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| RestError::NotFound("Subscription not found".into()).into())
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    store: Arc<dyn SubscriptionStore>,
    signing_key: SigningKey,
) -> anyhow::Result<Server> {
    // Wrap application data
    let store: web::Data<dyn SubscriptionStore> = web::Data::from(store);
    let signing_key = web::Data::new(signing_key);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(signing_key.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(health_check)
            .service(subscriptions::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
