//! Lazy, environment-configured PostHog facade.
//!
//! Resolves a PostHog key and host from layered environment sources, owns a
//! single memoized client handle with idempotent initialization, and exposes
//! a no-throw surface for event capture, user identification, and exception
//! reporting. The underlying client is wired in through a factory; batching
//! and transport stay its concern.
//!
//! # Example
//!
//! ```rust,ignore
//! use posthog_lite::{ErrorMonitor, Posthog};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     // `factory` asynchronously constructs whatever PostHog client the
//!     // application links against.
//!     let posthog = Arc::new(Posthog::builder(factory).build());
//!
//!     // Capture panics for the lifetime of the guard.
//!     let _monitor = ErrorMonitor::install(posthog.clone(), "my-app").await;
//!
//!     // Lazily initializes from POSTHOG_KEY / POSTHOG_HOST on first use.
//!     posthog.capture("page_view", None).await;
//!     posthog.identify("user_42", None).await;
//! }
//! ```
//!
//! Missing configuration is never fatal: operations log a warning and become
//! inert, and the host application is unaffected.

pub mod client;
mod config;
pub mod env;
mod error;
mod manager;
mod monitor;
mod types;

pub use client::{BoxClient, ClientFactory, PosthogClient};
pub use config::{ClientOptions, Config, DEFAULT_APP_NAME, HOST_VARS, KEY_VARS};
pub use error::{BoxError, Error};
pub use manager::{Posthog, PosthogBuilder};
pub use monitor::{spawn_monitored, ErrorMonitor};
pub use types::{ErrorInfo, Properties, SourceLocation};
