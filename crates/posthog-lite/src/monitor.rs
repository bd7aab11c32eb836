//! Global error capture.
//!
//! [`ErrorMonitor`] plays the role a mounted analytics provider plays in a UI
//! application: installing it initializes the facade and starts forwarding
//! runtime panics to `capture_exception`; dropping it restores the panic hook
//! that was active at install time. [`spawn_monitored`] covers the other leg,
//! reporting a background task's terminal error instead of losing it.

use crate::manager::Posthog;
use crate::types::{ErrorInfo, Properties};
use serde_json::json;
use std::future::Future;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Guard that forwards panics to the facade while alive.
///
/// The previously installed panic hook is chained after capture and restored
/// when the guard is dropped. Only one monitor should be live at a time; with
/// nested installs the last one wins and each drop restores what it saw.
pub struct ErrorMonitor {
    previous: Arc<dyn Fn(&PanicHookInfo<'_>) + Send + Sync>,
}

impl ErrorMonitor {
    /// Initialize the facade under `app_name` and install the panic hook.
    ///
    /// Must be called from within a tokio runtime; the hook captures the
    /// runtime handle so panics on non-runtime threads are still reported.
    pub async fn install(posthog: Arc<Posthog>, app_name: &str) -> Self {
        posthog.initialize(app_name).await;

        let handle = Handle::current();
        let previous: Arc<dyn Fn(&PanicHookInfo<'_>) + Send + Sync> =
            Arc::from(panic::take_hook());
        let chained = previous.clone();

        panic::set_hook(Box::new(move |info| {
            forward_panic(&posthog, &handle, info);
            chained(info);
        }));

        Self { previous }
    }
}

impl Drop for ErrorMonitor {
    fn drop(&mut self) {
        let previous = self.previous.clone();
        drop(panic::take_hook());
        panic::set_hook(Box::new(move |info| previous(info)));
    }
}

fn forward_panic(posthog: &Arc<Posthog>, handle: &Handle, info: &PanicHookInfo<'_>) {
    let mut error = ErrorInfo::new(panic_message(info)).with_kind("panic");
    let mut properties = Properties::from([("context".to_string(), json!("panic"))]);

    if let Some(location) = info.location() {
        error = error.with_source(location.file(), location.line(), location.column());
        properties.insert("source".to_string(), json!(location.file()));
        properties.insert("lineno".to_string(), json!(location.line()));
        properties.insert("colno".to_string(), json!(location.column()));
    }

    // The hook runs in a synchronous context, possibly on a thread the
    // runtime does not own; hand the capture off to the runtime.
    let posthog = posthog.clone();
    handle.spawn(async move {
        posthog.capture_exception(error, Some(properties)).await;
    });
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Spawn a task whose terminal error is reported to the facade.
///
/// An `Err` outcome is normalized, captured with a `task_failure` context
/// tag, and swallowed; the join handle yields `None` in that case.
pub fn spawn_monitored<F, T, E>(posthog: Arc<Posthog>, future: F) -> JoinHandle<Option<T>>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    tokio::spawn(async move {
        match future.await {
            Ok(value) => Some(value),
            Err(e) => {
                let properties =
                    Properties::from([("context".to_string(), json!("task_failure"))]);
                posthog
                    .capture_exception(
                        ErrorInfo::new(e.to_string()).with_kind("task_failure"),
                        Some(properties),
                    )
                    .await;
                None
            }
        }
    })
}
