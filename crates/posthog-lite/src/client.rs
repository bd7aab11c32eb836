//! The underlying analytics client capability.
//!
//! The facade never talks to PostHog directly; it drives whatever client the
//! host wires in through [`PosthogClient`]. Batching, transport, and retry
//! all live behind this boundary.

use crate::config::ClientOptions;
use crate::error::BoxError;
use crate::types::{ErrorInfo, Properties};
use std::future::Future;
use std::pin::Pin;

/// Operations the facade delegates to an underlying PostHog client.
///
/// Implementations are treated as opaque: the facade never inspects state
/// beyond the declared return values, and every method may fail with an
/// implementation-defined error.
pub trait PosthogClient: Send {
    /// Configure the client with a project key and options.
    fn init(&mut self, key: &str, options: &ClientOptions) -> Result<(), BoxError>;

    /// Register tags attached to all subsequently captured events.
    fn register(&mut self, tags: &Properties) -> Result<(), BoxError>;

    /// Record a named event.
    fn capture(&mut self, event: &str, properties: Option<&Properties>) -> Result<(), BoxError>;

    /// Associate the current distinct ID with a set of user traits.
    fn identify(
        &mut self,
        distinct_id: &str,
        properties: Option<&Properties>,
    ) -> Result<(), BoxError>;

    /// Record an exception.
    fn capture_exception(
        &mut self,
        error: &ErrorInfo,
        properties: Option<&Properties>,
    ) -> Result<(), BoxError>;

    /// Clear local identity and session state.
    fn reset(&mut self) -> Result<(), BoxError>;

    /// The client's stable identifier for the current user or session.
    fn distinct_id(&self) -> Result<Option<String>, BoxError>;
}

/// Boxed client handle owned by the lifecycle manager.
pub type BoxClient = Box<dyn PosthogClient>;

/// Future returned by a [`ClientFactory`].
pub type ClientFuture<'a> = Pin<Box<dyn Future<Output = Result<BoxClient, BoxError>> + Send + 'a>>;

/// Asynchronous, fallible construction of an underlying client.
///
/// Construction may involve loading or network steps; the factory is invoked
/// at most once per live handle, under the manager's lock.
pub trait ClientFactory: Send + Sync {
    /// Build a fresh client.
    fn build(&self) -> ClientFuture<'_>;
}

/// Adapt an async closure into a [`ClientFactory`].
///
/// # Example
///
/// ```rust,ignore
/// let factory = posthog_lite::client::from_fn(|| async {
///     Ok(Box::new(MyClient::connect().await?) as BoxClient)
/// });
/// ```
pub fn from_fn<F, Fut>(f: F) -> impl ClientFactory
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<BoxClient, BoxError>> + Send + 'static,
{
    FnFactory(f)
}

struct FnFactory<F>(F);

impl<F, Fut> ClientFactory for FnFactory<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<BoxClient, BoxError>> + Send + 'static,
{
    fn build(&self) -> ClientFuture<'_> {
        Box::pin((self.0)())
    }
}
