//! Configuration resolution.

use crate::env::Environment;
use crate::Error;
use serde::Serialize;

/// App name used when operations run before an explicit initialization.
pub const DEFAULT_APP_NAME: &str = "default";

/// Accepted variable names for the project API key, in fallback order.
pub const KEY_VARS: [&str; 3] = [
    "POSTHOG_KEY",
    "NEXT_PUBLIC_POSTHOG_KEY",
    "VITE_POSTHOG_KEY",
];

/// Accepted variable names for the API host, in fallback order.
pub const HOST_VARS: [&str; 3] = [
    "POSTHOG_HOST",
    "NEXT_PUBLIC_POSTHOG_HOST",
    "VITE_POSTHOG_HOST",
];

/// Key/host pair resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub(crate) key: String,
    pub(crate) host: String,
}

/// Resolve credentials from the environment.
///
/// Aliases are tried in fallback order; each alias is probed across the full
/// source stack before the next alias is considered. Side-effect-free and
/// stable for a fixed environment snapshot.
pub(crate) fn resolve(env: &Environment) -> Result<Credentials, Error> {
    let key = first_match(env, &KEY_VARS).ok_or(Error::NotConfigured {
        missing: "POSTHOG_KEY",
    })?;
    let host = first_match(env, &HOST_VARS).ok_or(Error::NotConfigured {
        missing: "POSTHOG_HOST",
    })?;

    Ok(Credentials { key, host })
}

fn first_match(env: &Environment, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|var| env.get(var))
}

/// Configuration stored by a successfully initialized facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub(crate) key: String,
    pub(crate) host: String,
    pub(crate) app_name: String,
}

impl Config {
    /// Get the project API key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the API host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the application name tag registered on captured events.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

/// Options handed to the underlying client's `init` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientOptions {
    /// API host; filled from the resolved configuration at init time.
    pub api_host: String,
    pub autocapture: bool,
    pub capture_pageview: bool,
    pub capture_pageleave: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_host: String::new(),
            autocapture: true,
            capture_pageview: true,
            capture_pageleave: true,
        }
    }
}
