//! HTTP gateway for the tournament platform.
//!
//! This crate provides:
//! - A Discord notification relay (`POST /discord/send-notification`)
//! - Discord OAuth code exchange (`POST /discord/token`)
//! - Stripe Connect onboarding status and Checkout session verification
//! - A health endpoint, CORS on every route, and request tracing

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Handlers return ApiError throughout

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod stripe;

pub use config::Config;
pub use error::ApiError;
pub use server::{build_router, AppState};
pub use stripe::{StripeClient, StripeError};
