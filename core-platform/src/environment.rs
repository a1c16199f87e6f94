//! # Environment Detection
//!
//! The running environment is derived from the document hostname:
//! a hostname containing `dev` is [`Environment::Development`], one
//! containing `qa` is [`Environment::Qa`], anything else is production.

use crate::error::{PlatformError, Result};
use bridge_traits::HostEnvironment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Qa,
    #[default]
    Production,
}

impl Environment {
    /// Hostname marker identifying the environment; empty for production.
    pub fn marker(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Qa => "qa",
            Environment::Production => "",
        }
    }

    pub fn detect(hostname: &str) -> Self {
        if hostname.contains(Environment::Development.marker()) {
            Environment::Development
        } else if hostname.contains(Environment::Qa.marker()) {
            Environment::Qa
        } else {
            Environment::Production
        }
    }

    /// Environment of the host's document; production without one.
    pub fn from_host(host: &dyn HostEnvironment) -> Self {
        host.document()
            .map(|document| Self::detect(&document.hostname))
            .unwrap_or_default()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Qa => "qa",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

impl FromStr for Environment {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "qa" => Ok(Environment::Qa),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(PlatformError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// One URL per environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentUrls {
    pub development: String,
    pub qa: String,
    pub production: String,
}

impl EnvironmentUrls {
    pub fn new(
        development: impl Into<String>,
        qa: impl Into<String>,
        production: impl Into<String>,
    ) -> Self {
        Self {
            development: development.into(),
            qa: qa.into(),
            production: production.into(),
        }
    }

    pub fn resolve(&self, environment: Environment) -> &str {
        match environment {
            Environment::Development => &self.development,
            Environment::Qa => &self.qa,
            Environment::Production => &self.production,
        }
    }
}

/// Scheme and authority of `url`.
///
/// Everything before the first `/` that follows the `//` separator, or
/// before the first `/` at all when there is no separator. A URL without
/// such a slash is returned whole.
///
/// ```
/// use core_platform::get_origin;
///
/// assert_eq!(get_origin("https://payment.haifa.ac.il/paymentService"), "https://payment.haifa.ac.il");
/// ```
pub fn get_origin(url: &str) -> &str {
    let path_start = match url.find("//") {
        Some(separator) => url[separator + 2..].find('/').map(|i| i + separator + 2),
        None => url.find('/'),
    };
    match path_start {
        Some(end) => &url[..end],
        None => url,
    }
}
