//! HTTP server for the notification and payment gateway.

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::ApiError;
use crate::handlers::{discord, oauth, payments};
use crate::stripe::StripeClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Config,
    /// Connection pool shared by every outbound call.
    pub http: reqwest::Client,
    /// Stripe API client, if a secret key is configured.
    pub stripe: Option<StripeClient>,
}

impl AppState {
    /// Build state with an HTTP client honouring the configured timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;

        let stripe = config
            .stripe_secret_key
            .as_deref()
            .map(|key| StripeClient::new(http.clone(), key, config.stripe_api_url.clone()));

        if stripe.is_none() {
            info!("STRIPE_SECRET_KEY not set, payment endpoints will return 500");
        }
        if config.discord_oauth_credentials().is_none() {
            info!("Discord OAuth credentials not set, token exchange will return 500");
        }

        Ok(Self {
            config,
            http,
            stripe,
        })
    }
}

/// Build the HTTP router for the gateway.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/discord/send-notification",
            post(discord::send_notification).fallback(method_not_allowed),
        )
        .route(
            "/discord/token",
            post(oauth::exchange_token).fallback(method_not_allowed),
        )
        .route(
            "/stripe/check-account-status",
            post(payments::check_account_status).fallback(method_not_allowed),
        )
        .route(
            "/stripe/verify-payment-session",
            get(payments::verify_session_query)
                .post(payments::verify_session_body)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health_check))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Answer preflight requests and attach CORS headers to every response.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );

    response
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "tourney-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
