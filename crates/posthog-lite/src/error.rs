//! Error types for the PostHog facade.

/// Opaque error produced by an underlying client or its factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur inside the facade.
///
/// None of these escape the unprefixed public methods; they are returned by
/// the `try_` variants and otherwise logged and absorbed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required environment variables are absent.
    #[error("PostHog is not configured: no value for {missing}")]
    NotConfigured {
        /// Generic name of the first field that could not be resolved.
        missing: &'static str,
    },

    /// The underlying client could not be constructed.
    #[error("failed to construct PostHog client: {0}")]
    ClientConstruction(#[source] BoxError),

    /// A delegated client call failed.
    #[error("PostHog client call `{call}` failed: {source}")]
    ClientCall {
        /// Name of the client method that failed.
        call: &'static str,
        /// Error reported by the client.
        source: BoxError,
    },
}
