//! Layered environment sources.
//!
//! Configuration values can arrive through the process environment, through
//! values injected at compile time, or through a map the host application
//! supplies at runtime (the deployed-bundle case, where variables only exist
//! after the build). Sources are probed in a fixed order and the first
//! non-empty value wins; sources are never merged beyond that.

use std::collections::HashMap;

/// A single named source of environment variables.
pub trait EnvSource: Send + Sync {
    /// Source name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Look up a variable. Empty values are treated as absent.
    fn get(&self, var: &str) -> Option<String>;
}

/// The process environment (`std::env`).
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn name(&self) -> &'static str {
        "process"
    }

    fn get(&self, var: &str) -> Option<String> {
        std::env::var(var).ok().filter(|v| !v.is_empty())
    }
}

/// Values captured from the build environment at compile time.
///
/// Only the variables this crate cares about are captured; `option_env!`
/// records whatever was exported when the crate was compiled.
#[derive(Debug, Default)]
pub struct BuildEnv;

static BUILD_VARS: &[(&str, Option<&str>)] = &[
    ("POSTHOG_KEY", option_env!("POSTHOG_KEY")),
    ("POSTHOG_HOST", option_env!("POSTHOG_HOST")),
    ("NEXT_PUBLIC_POSTHOG_KEY", option_env!("NEXT_PUBLIC_POSTHOG_KEY")),
    ("NEXT_PUBLIC_POSTHOG_HOST", option_env!("NEXT_PUBLIC_POSTHOG_HOST")),
    ("VITE_POSTHOG_KEY", option_env!("VITE_POSTHOG_KEY")),
    ("VITE_POSTHOG_HOST", option_env!("VITE_POSTHOG_HOST")),
];

impl EnvSource for BuildEnv {
    fn name(&self) -> &'static str {
        "build"
    }

    fn get(&self, var: &str) -> Option<String> {
        BUILD_VARS
            .iter()
            .find(|(name, _)| *name == var)
            .and_then(|(_, value)| *value)
            .filter(|v| !v.is_empty())
            .map(String::from)
    }
}

/// A key-value map supplied by the host at runtime.
#[derive(Debug, Default)]
pub struct RuntimeEnv {
    values: HashMap<String, String>,
}

impl RuntimeEnv {
    /// Create a runtime source from any set of key-value pairs.
    pub fn new(values: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RuntimeEnv {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::new(pairs.map(|(k, v)| (k.to_string(), v.to_string())))
    }
}

impl EnvSource for RuntimeEnv {
    fn name(&self) -> &'static str {
        "runtime"
    }

    fn get(&self, var: &str) -> Option<String> {
        self.values.get(var).filter(|v| !v.is_empty()).cloned()
    }
}

/// An ordered stack of environment sources.
pub struct Environment {
    sources: Vec<Box<dyn EnvSource>>,
}

impl Environment {
    /// Create an environment from an explicit source list.
    pub fn new(sources: Vec<Box<dyn EnvSource>>) -> Self {
        Self { sources }
    }

    /// Append a source with the lowest precedence so far.
    pub fn push(mut self, source: impl EnvSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Look up a variable, first source wins.
    pub fn get(&self, var: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get(var))
    }
}

impl Default for Environment {
    /// Process environment first, compile-time values second.
    fn default() -> Self {
        Self::new(vec![Box::new(ProcessEnv), Box::new(BuildEnv)])
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("Environment").field("sources", &names).finish()
    }
}
