use crate::{
    config::date_locale::DateLocaleConfig,
    error::{ParseEnvNumberSnafu, RegistrarError, RegistrarResult},
};
use dotenvy::var;
use snafu::ResultExt;
use std::{sync::Arc, time::Duration};

pub mod date_locale;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeploymentEnvironment {
    Development,
    Production,
}

impl DeploymentEnvironment {
    pub const fn default_api_url(self) -> &'static str {
        match self {
            Self::Development => "http://localhost:5000/api",
            Self::Production => "https://sms-backend-wiod.onrender.com/api",
        }
    }

    fn parse(provided: &str) -> RegistrarResult<Self> {
        match provided.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(RegistrarError::UnknownEnvironment {
                provided: provided.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    date_locale: Arc<DateLocaleConfig>,
    server_ip: String,
}

impl RuntimeConfiguration {
    pub fn new() -> RegistrarResult<Self> {
        Self::from_lookup(|name| var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> RegistrarResult<Self> {
        let date_locale = DateLocaleConfig::new(
            lookup("REGISTRAR_TIMEZONE").unwrap_or_else(|| "UTC".to_string()),
            lookup("REGISTRAR_LOCALE").unwrap_or_else(|| "en-US".to_string()),
        )?;

        Ok(Self {
            api_config: Arc::new(ApiConfig::from_lookup(&lookup)?),
            date_locale: Arc::new(date_locale),
            server_ip: lookup("REGISTRAR_SERVER_IP")
                .unwrap_or_else(|| "127.0.0.1:8080".to_string()),
        })
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn date_locale(&self) -> Arc<DateLocaleConfig> {
        self.date_locale.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    pub environment: DeploymentEnvironment,
    pub base_url: String,
    pub timeout: Duration,
    pub page_size: u32,
}

impl ApiConfig {
    fn from_lookup(lookup: &impl Fn(&'static str) -> Option<String>) -> RegistrarResult<Self> {
        let parse_number = |name: &'static str, default: u32| -> RegistrarResult<u32> {
            lookup(name).map_or(Ok(default), |provided| {
                provided
                    .trim()
                    .parse()
                    .context(ParseEnvNumberSnafu { name, provided })
            })
        };

        let environment =
            DeploymentEnvironment::parse(&lookup("REGISTRAR_ENV").unwrap_or_default())?;
        let base_url = lookup("STUDENTS_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| environment.default_api_url().to_string());

        #[allow(clippy::cast_possible_truncation)]
        let default_timeout_ms = DEFAULT_TIMEOUT.as_millis() as u32;

        Ok(Self {
            environment,
            base_url,
            timeout: Duration::from_millis(
                parse_number("STUDENTS_API_TIMEOUT_MS", default_timeout_ms)?.into(),
            ),
            page_size: parse_number("STUDENTS_PAGE_SIZE", crate::data::query::DEFAULT_PAGE_SIZE)?
                .max(1),
        })
    }

    #[cfg(test)]
    pub fn for_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            environment: DeploymentEnvironment::Development,
            base_url: base_url.into(),
            timeout,
            page_size: crate::data::query::DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(
        pairs: &[(&'static str, &str)],
    ) -> impl Fn(&'static str) -> Option<String> + use<> {
        let map: HashMap<&'static str, String> = pairs
            .iter()
            .map(|(k, v)| (*k, (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_follow_the_environment() {
        let dev = RuntimeConfiguration::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(dev.api_config().base_url, "http://localhost:5000/api");
        assert_eq!(dev.api_config().timeout, DEFAULT_TIMEOUT);
        assert_eq!(dev.api_config().page_size, 10);
        assert_eq!(dev.server_ip(), "127.0.0.1:8080");

        let prod =
            RuntimeConfiguration::from_lookup(lookup_from(&[("REGISTRAR_ENV", "production")]))
                .unwrap();
        assert_eq!(prod.api_config().environment, DeploymentEnvironment::Production);
        assert_eq!(
            prod.api_config().base_url,
            DeploymentEnvironment::Production.default_api_url()
        );
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = RuntimeConfiguration::from_lookup(lookup_from(&[
            ("STUDENTS_API_URL", "http://students.internal/api"),
            ("STUDENTS_API_TIMEOUT_MS", "2500"),
            ("STUDENTS_PAGE_SIZE", "25"),
        ]))
        .unwrap();

        let api = config.api_config();
        assert_eq!(api.base_url, "http://students.internal/api");
        assert_eq!(api.timeout, Duration::from_millis(2500));
        assert_eq!(api.page_size, 25);
    }

    #[test]
    fn bad_values_are_startup_errors() {
        assert!(matches!(
            RuntimeConfiguration::from_lookup(lookup_from(&[("STUDENTS_PAGE_SIZE", "lots")])),
            Err(RegistrarError::ParseEnvNumber { name: "STUDENTS_PAGE_SIZE", .. })
        ));
        assert!(matches!(
            RuntimeConfiguration::from_lookup(lookup_from(&[("REGISTRAR_ENV", "staging")])),
            Err(RegistrarError::UnknownEnvironment { .. })
        ));
    }
}
