//! Build variant selection.
//!
//! The variant decides which stages are composed into a build. It is read
//! from the environment once, at startup:
//!
//! | condition                                   | variant      |
//! |---------------------------------------------|--------------|
//! | `LITPACK_WATCH` set, non-empty, not `false` | `Serve`      |
//! | `NODE_ENV` is `prod` or `production`        | `Production` |
//! | `NODE_ENV` is `lib` or `library`            | `Library`    |
//! | anything else                               | `Default`    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable that switches a build into watch/serve mode.
pub const WATCH_ENV: &str = "LITPACK_WATCH";

/// Environment variable naming the target environment.
pub const NODE_ENV: &str = "NODE_ENV";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    Serve,
    Production,
    Library,
    #[default]
    Default,
}

impl BuildVariant {
    /// Select a variant through an arbitrary variable lookup.
    ///
    /// ```
    /// use litpack_config::BuildVariant;
    ///
    /// let variant = BuildVariant::from_env(|key| match key {
    ///     "NODE_ENV" => Some("production".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(variant, BuildVariant::Production);
    /// ```
    pub fn from_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(watch) = lookup(WATCH_ENV) {
            let watch = watch.trim();
            if !watch.is_empty() && !watch.eq_ignore_ascii_case("false") {
                return Self::Serve;
            }
        }

        match lookup(NODE_ENV).as_deref().map(str::trim) {
            Some("prod" | "production") => Self::Production,
            Some("lib" | "library") => Self::Library,
            _ => Self::Default,
        }
    }

    /// Select a variant from the process environment.
    pub fn from_process_env() -> Self {
        Self::from_env(|key| std::env::var(key).ok())
    }

    /// Profile key under `[profiles]` that applies to this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Serve => "serve",
            Self::Production => "production",
            Self::Library => "library",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serve" | "watch" => Ok(Self::Serve),
            "prod" | "production" => Ok(Self::Production),
            "lib" | "library" => Ok(Self::Library),
            "default" | "dev" | "development" => Ok(Self::Default),
            other => Err(ConfigError::InvalidValue {
                field: "variant".to_string(),
                hint: Some(format!(
                    "unknown variant '{other}', expected serve, production, library or default"
                )),
            }),
        }
    }
}
