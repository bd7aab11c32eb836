//! Lifecycle management for the shared PostHog client.

use crate::client::{BoxClient, ClientFactory};
use crate::config::{self, ClientOptions, Config, DEFAULT_APP_NAME};
use crate::env::Environment;
use crate::types::{ErrorInfo, Properties};
use crate::Error;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// Lazily initialized PostHog facade.
///
/// Owns at most one underlying client, constructed through the injected
/// factory the first time any operation needs it and memoized afterwards.
/// Initialization is idempotent per application name; every operation
/// degrades to a logged no-op when configuration or construction fails, so
/// the host application's behavior is never affected.
///
/// All state sits behind one async mutex that is held across the factory's
/// construction future, so concurrent first callers settle on a single
/// client instance and a single `init`/`register` sequence.
///
/// # Example
///
/// ```rust,ignore
/// use posthog_lite::Posthog;
/// use std::sync::Arc;
///
/// let posthog = Arc::new(Posthog::builder(factory).build());
///
/// // No explicit initialize needed; the first capture configures the client
/// // from the environment under the "default" app name.
/// posthog.capture("page_view", None).await;
/// ```
pub struct Posthog {
    factory: Box<dyn ClientFactory>,
    env: Environment,
    options: ClientOptions,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    client: Option<BoxClient>,
    config: Option<Config>,
}

impl Posthog {
    /// Create a new builder with the given client factory.
    pub fn builder(factory: impl ClientFactory + 'static) -> PosthogBuilder {
        PosthogBuilder::new(factory)
    }

    // ============================================
    // LIFECYCLE
    // ============================================

    /// Initialize the client under the given application name.
    ///
    /// A no-op when already initialized with the same name; a different name
    /// reconfigures the client wholesale. Failures are logged and absorbed.
    pub async fn initialize(&self, app_name: &str) {
        if let Err(e) = self.try_initialize(app_name).await {
            report("initialize", &e);
        }
    }

    /// Fallible variant of [`initialize`](Self::initialize).
    pub async fn try_initialize(&self, app_name: &str) -> Result<(), Error> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if let Some(config) = &inner.config {
            if config.app_name == app_name {
                return Ok(());
            }
            debug!(
                from = %config.app_name,
                to = %app_name,
                "reinitializing under new app name"
            );
        }

        self.ensure_client(inner).await?;
        self.configure(inner, app_name)
    }

    /// Drop the cached client and stored configuration.
    ///
    /// Asks the client to clear its local identity state first, best-effort;
    /// the handle and configuration are cleared regardless of the outcome.
    pub async fn reset(&self) {
        if let Err(e) = self.try_reset().await {
            report("reset", &e);
        }
    }

    /// Fallible variant of [`reset`](Self::reset).
    pub async fn try_reset(&self) -> Result<(), Error> {
        let mut guard = self.inner.lock().await;

        let result = match guard.client.as_mut() {
            Some(client) => client.reset().map_err(|e| Error::ClientCall {
                call: "reset",
                source: e,
            }),
            None => Ok(()),
        };

        guard.client = None;
        guard.config = None;
        result
    }

    /// Get the stored configuration, if initialized.
    pub async fn config(&self) -> Option<Config> {
        self.inner.lock().await.config.clone()
    }

    /// Whether the client has been successfully initialized.
    pub async fn is_initialized(&self) -> bool {
        self.inner.lock().await.config.is_some()
    }

    // ============================================
    // CAPTURE
    // ============================================

    /// Record a named event with optional structured properties.
    pub async fn capture(&self, event: &str, properties: Option<Properties>) {
        if let Err(e) = self.try_capture(event, properties).await {
            report("capture", &e);
        }
    }

    /// Fallible variant of [`capture`](Self::capture).
    pub async fn try_capture(
        &self,
        event: &str,
        properties: Option<Properties>,
    ) -> Result<(), Error> {
        let mut guard = self.inner.lock().await;
        let client = self.ensure_ready(&mut guard).await?;
        client
            .capture(event, properties.as_ref())
            .map_err(|e| Error::ClientCall {
                call: "capture",
                source: e,
            })
    }

    /// Associate the current distinct ID with a set of user traits.
    pub async fn identify(&self, distinct_id: &str, properties: Option<Properties>) {
        if let Err(e) = self.try_identify(distinct_id, properties).await {
            report("identify", &e);
        }
    }

    /// Fallible variant of [`identify`](Self::identify).
    pub async fn try_identify(
        &self,
        distinct_id: &str,
        properties: Option<Properties>,
    ) -> Result<(), Error> {
        let mut guard = self.inner.lock().await;
        let client = self.ensure_ready(&mut guard).await?;
        client
            .identify(distinct_id, properties.as_ref())
            .map_err(|e| Error::ClientCall {
                call: "identify",
                source: e,
            })
    }

    /// Record an exception.
    pub async fn capture_exception(
        &self,
        error: impl Into<ErrorInfo>,
        properties: Option<Properties>,
    ) {
        if let Err(e) = self.try_capture_exception(error, properties).await {
            report("capture_exception", &e);
        }
    }

    /// Fallible variant of [`capture_exception`](Self::capture_exception).
    pub async fn try_capture_exception(
        &self,
        error: impl Into<ErrorInfo>,
        properties: Option<Properties>,
    ) -> Result<(), Error> {
        let error = error.into();
        let mut guard = self.inner.lock().await;
        let client = self.ensure_ready(&mut guard).await?;
        client
            .capture_exception(&error, properties.as_ref())
            .map_err(|e| Error::ClientCall {
                call: "capture_exception",
                source: e,
            })
    }

    /// Get the client's stable identifier for the current user or session.
    ///
    /// `None` when the client could not be constructed or configured.
    pub async fn distinct_id(&self) -> Option<String> {
        match self.try_distinct_id().await {
            Ok(id) => id,
            Err(e) => {
                report("distinct_id", &e);
                None
            }
        }
    }

    /// Fallible variant of [`distinct_id`](Self::distinct_id).
    pub async fn try_distinct_id(&self) -> Result<Option<String>, Error> {
        let mut guard = self.inner.lock().await;
        let client = self.ensure_ready(&mut guard).await?;
        client.distinct_id().map_err(|e| Error::ClientCall {
            call: "distinct_id",
            source: e,
        })
    }

    // ============================================
    // INTERNAL
    // ============================================

    /// Construct the client if no handle is cached.
    ///
    /// A failed construction leaves the handle empty; the next operation
    /// retries.
    async fn ensure_client(&self, inner: &mut Inner) -> Result<(), Error> {
        if inner.client.is_some() {
            return Ok(());
        }
        let client = self
            .factory
            .build()
            .await
            .map_err(Error::ClientConstruction)?;
        inner.client = Some(client);
        Ok(())
    }

    /// Construct and configure on first use, then hand out the client.
    async fn ensure_ready<'a>(&self, inner: &'a mut Inner) -> Result<&'a mut BoxClient, Error> {
        self.ensure_client(inner).await?;
        if inner.config.is_none() {
            self.configure(inner, DEFAULT_APP_NAME)?;
        }
        inner
            .client
            .as_mut()
            .ok_or_else(|| Error::ClientConstruction("client handle missing".into()))
    }

    /// Resolve credentials and run the `init`/`register` sequence.
    ///
    /// Configuration is stored last: any failure leaves the facade
    /// uninitialized rather than exposing a partially configured client.
    fn configure(&self, inner: &mut Inner, app_name: &str) -> Result<(), Error> {
        let creds = config::resolve(&self.env)?;

        let client = inner
            .client
            .as_mut()
            .ok_or_else(|| Error::ClientConstruction("client handle missing".into()))?;

        let mut options = self.options.clone();
        options.api_host = creds.host.clone();
        client
            .init(&creds.key, &options)
            .map_err(|e| Error::ClientCall {
                call: "init",
                source: e,
            })?;

        let tags = Properties::from([("app_name".to_string(), json!(app_name))]);
        client.register(&tags).map_err(|e| Error::ClientCall {
            call: "register",
            source: e,
        })?;

        inner.config = Some(Config {
            key: creds.key,
            host: creds.host,
            app_name: app_name.to_string(),
        });
        debug!(app_name, "posthog initialized");
        Ok(())
    }
}

fn report(op: &'static str, err: &Error) {
    match err {
        Error::NotConfigured { .. } => warn!(op, error = %err, "posthog disabled, skipping"),
        _ => error!(op, error = %err, "posthog operation failed"),
    }
}

/// Builder for [`Posthog`].
pub struct PosthogBuilder {
    factory: Box<dyn ClientFactory>,
    env: Environment,
    options: ClientOptions,
}

impl PosthogBuilder {
    /// Create a new builder with the given client factory.
    pub fn new(factory: impl ClientFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            env: Environment::default(),
            options: ClientOptions::default(),
        }
    }

    /// Replace the environment source stack.
    pub fn environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Set the options handed to the client's `init` call.
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the facade.
    pub fn build(self) -> Posthog {
        Posthog {
            factory: self.factory,
            env: self.env,
            options: self.options,
            inner: Mutex::new(Inner::default()),
        }
    }
}
