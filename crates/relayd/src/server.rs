//! The update endpoint
//!
//! One route, any method: decode credentials, build the target record from
//! the query and the connecting IP, run the pipeline, and map the outcome
//! to a terminal plain-text response. Every error path logs before
//! responding.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use relay_core::credentials::ClientCredentials;
use relay_core::pipeline::{UpdateOutcome, run_update};
use relay_core::provider::ProviderFactory;
use relay_core::record::RecordTarget;
use serde::Deserialize;
use tracing::{debug, error, info};

/// Shared application state
pub struct AppState {
    /// Builds a provider per request from the forwarded credentials
    pub factory: Arc<dyn ProviderFactory>,
}

/// Query parameters of the update route.
///
/// Both fields are optional at the extraction layer so the handler can
/// fail with the contract's statuses instead of the framework's defaults.
#[derive(Debug, Deserialize)]
struct UpdateQuery {
    hostname: Option<String>,
    /// Client-claimed IP; accepted but never used for the update
    ip: Option<String>,
}

/// Register the update route.
///
/// `web::route()` matches every method: router firmwares disagree on
/// whether a DDNS ping is a GET or a POST.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/update", web::route().to(handle_update));
}

/// Serve the endpoint until the process is told to stop
pub async fn run(bind_addr: &str, factory: Arc<dyn ProviderFactory>) -> std::io::Result<()> {
    let state = web::Data::new(AppState { factory });
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind_addr)?
        .run()
        .await
}

async fn handle_update(
    req: HttpRequest,
    query: web::Query<UpdateQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    match process_update(&req, &query, &state).await {
        Ok(outcome) => {
            info!(
                record_id = %outcome.record_id,
                previous = %outcome.previous_content,
                current = %outcome.new_content,
                "update applied"
            );
            HttpResponse::Ok().content_type("text/plain").body("OK")
        }
        Err(err) => {
            error!(status = err.http_status(), "update failed: {err}");
            let status = StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status)
                .content_type("text/plain")
                .body(err.response_body())
        }
    }
}

async fn process_update(
    req: &HttpRequest,
    query: &UpdateQuery,
    state: &AppState,
) -> relay_core::Result<UpdateOutcome> {
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let credentials = ClientCredentials::from_authorization(header)?;

    if let Some(claimed) = query.ip.as_deref() {
        debug!(claimed, "ignoring client-claimed IP parameter");
    }

    let connecting_ip = connecting_ip(req);
    let target = RecordTarget::from_request(query.hostname.as_deref(), connecting_ip.as_deref())?;
    info!(
        hostname = %target.name,
        content = %target.content,
        kind = %target.kind,
        email = %credentials.email,
        "update requested"
    );

    let provider = state.factory.create(&credentials);
    run_update(provider.as_ref(), &target).await
}

/// The caller's network-observed address.
///
/// The transport peer address is authoritative; the first entry of
/// `X-Forwarded-For` is consulted only when the transport offers none.
/// A client-claimed `ip` query parameter is never a source.
fn connecting_ip(req: &HttpRequest) -> Option<String> {
    if let Some(peer) = req.peer_addr() {
        return Some(peer.ip().to_string());
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
