//! Deployment environment resolution.
//!
//! The function runs in one of a small, closed set of environments selected by the
//! `IAC_ENVIRONMENT` variable. The value is read on every access so that a resolver can be
//! constructed once and threaded through the handler without freezing the environment at
//! construction time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Variable that selects the environment tag.
pub const ENVIRONMENT_VAR: &str = "IAC_ENVIRONMENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnvironmentTag {
    #[default]
    Unknown,
    Local,
    Stage,
    Production,
}

impl EnvironmentTag {
    /// Map a raw variable value to a tag.
    ///
    /// Matching is case-insensitive and otherwise exact. Anything unmapped, including an
    /// absent, empty or whitespace-padded value, is [`EnvironmentTag::Unknown`].
    #[must_use]
    pub fn from_value(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default().to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "stage" => Self::Stage,
            "production" => Self::Production,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Local => "Local",
            Self::Stage => "Stage",
            Self::Production => "Production",
        }
    }

    /// Local runs are the only ones that wait for a debugger and serve over HTTP.
    #[must_use]
    pub fn is_debugging(self) -> bool {
        self == Self::Local
    }

    #[must_use]
    pub fn is_development(self) -> bool {
        matches!(self, Self::Local | Self::Stage)
    }

    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl fmt::Display for EnvironmentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of named string variables.
pub trait VarSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables, for tests and explicit configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticVars(HashMap<String, String>);

impl StaticVars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl VarSource for StaticVars {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Resolves the current [`EnvironmentTag`] from a [`VarSource`].
///
/// Cloning is cheap; clones share the same source.
#[derive(Clone)]
pub struct EnvironmentResolver {
    source: Arc<dyn VarSource>,
}

impl EnvironmentResolver {
    #[must_use]
    pub fn new(source: Arc<dyn VarSource>) -> Self {
        Self { source }
    }

    /// Resolver backed by the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self::new(Arc::new(ProcessEnv))
    }

    /// Resolver that always sees `value` as the environment variable.
    #[must_use]
    pub fn fixed(value: impl Into<String>) -> Self {
        Self::new(Arc::new(StaticVars::new().with(ENVIRONMENT_VAR, value)))
    }

    /// Resolver that never sees the environment variable.
    #[must_use]
    pub fn unset() -> Self {
        Self::new(Arc::new(StaticVars::new()))
    }

    #[must_use]
    pub fn current(&self) -> EnvironmentTag {
        EnvironmentTag::from_value(self.source.var(ENVIRONMENT_VAR).as_deref())
    }

    #[must_use]
    pub fn is_debugging(&self) -> bool {
        self.current().is_debugging()
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        self.current().is_development()
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.current().is_production()
    }
}

impl fmt::Debug for EnvironmentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentResolver")
            .field("current", &self.current())
            .finish()
    }
}
