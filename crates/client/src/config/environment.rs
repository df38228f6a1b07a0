//! Deployment environments and the service base URLs each one targets.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use super::{ConfigError, Result};

/// A deployment of the finance backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Local,
    Docker,
    Hosted,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Docker => "docker",
            Environment::Hosted => "hosted",
            Environment::Production => "production",
        }
    }

    /// Default base URLs for this environment.
    pub fn service_urls(&self) -> ServiceUrls {
        let url = |service: Service| -> String {
            match self {
                Environment::Local => format!("http://localhost:{}", service.local_port()),
                Environment::Docker => format!("http://{}-service:8000", service.host_name()),
                Environment::Hosted => {
                    format!("https://finanzas-{}.onrender.com", service.host_name())
                }
                Environment::Production => "https://api.finanzas.app".to_string(),
            }
        };
        ServiceUrls::from_fn(url)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "docker" => Ok(Environment::Docker),
            "hosted" => Ok(Environment::Hosted),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Where the active environment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentSource {
    /// `--env` flag or `FINANZAS_ENV`.
    Explicit,
    /// Persisted with `finanzas env force`.
    Forced,
    /// Derived from the target hostname.
    Detected,
}

/// Picks the active environment: explicit, then forced, then detected.
pub fn resolve_environment(
    explicit: Option<Environment>,
    forced: Option<Environment>,
    hostname: Option<&str>,
) -> (Environment, EnvironmentSource) {
    match (explicit, forced) {
        (Some(env), _) => (env, EnvironmentSource::Explicit),
        (None, Some(env)) => (env, EnvironmentSource::Forced),
        (None, None) => (
            hostname.map_or(Environment::Local, detect_environment),
            EnvironmentSource::Detected,
        ),
    }
}

/// Maps a hostname to the environment that serves it.
pub fn detect_environment(hostname: &str) -> Environment {
    let host = hostname.trim().to_ascii_lowercase();
    if host.is_empty() || host == "localhost" || host == "127.0.0.1" || host == "::1" {
        Environment::Local
    } else if host.contains("docker") || !host.contains('.') {
        Environment::Docker
    } else if [".onrender.com", ".vercel.app", ".fly.dev"]
        .iter()
        .any(|suffix| host.ends_with(suffix))
    {
        Environment::Hosted
    } else {
        Environment::Production
    }
}

/// A backend microservice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Expenses,
    Incomes,
    Categories,
    Budgets,
    SavingsGoals,
    Recurring,
    Dashboard,
    Ai,
}

impl Service {
    pub const ALL: [Service; 8] = [
        Service::Expenses,
        Service::Incomes,
        Service::Categories,
        Service::Budgets,
        Service::SavingsGoals,
        Service::Recurring,
        Service::Dashboard,
        Service::Ai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Expenses => "expenses",
            Service::Incomes => "incomes",
            Service::Categories => "categories",
            Service::Budgets => "budgets",
            Service::SavingsGoals => "savings_goals",
            Service::Recurring => "recurring",
            Service::Dashboard => "dashboard",
            Service::Ai => "ai",
        }
    }

    /// Environment variable overriding this service's base URL.
    pub fn env_var(&self) -> String {
        format!("FINANZAS_{}_URL", self.as_str().to_ascii_uppercase())
    }

    fn host_name(&self) -> &'static str {
        match self {
            Service::SavingsGoals => "savings-goals",
            other => other.as_str(),
        }
    }

    fn local_port(&self) -> u16 {
        match self {
            Service::Expenses => 8001,
            Service::Incomes => 8002,
            Service::Categories => 8003,
            Service::Budgets => 8004,
            Service::SavingsGoals => 8005,
            Service::Recurring => 8006,
            Service::Dashboard => 8007,
            Service::Ai => 8008,
        }
    }
}

/// Base URL for every backend service, without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceUrls {
    pub expenses: String,
    pub incomes: String,
    pub categories: String,
    pub budgets: String,
    pub savings_goals: String,
    pub recurring: String,
    pub dashboard: String,
    pub ai: String,
}

impl ServiceUrls {
    fn from_fn(url: impl Fn(Service) -> String) -> Self {
        Self {
            expenses: url(Service::Expenses),
            incomes: url(Service::Incomes),
            categories: url(Service::Categories),
            budgets: url(Service::Budgets),
            savings_goals: url(Service::SavingsGoals),
            recurring: url(Service::Recurring),
            dashboard: url(Service::Dashboard),
            ai: url(Service::Ai),
        }
    }

    /// Points every service at the same base URL.
    pub fn single(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self::from_fn(|_| base.clone())
    }

    pub fn get(&self, service: Service) -> &str {
        match service {
            Service::Expenses => &self.expenses,
            Service::Incomes => &self.incomes,
            Service::Categories => &self.categories,
            Service::Budgets => &self.budgets,
            Service::SavingsGoals => &self.savings_goals,
            Service::Recurring => &self.recurring,
            Service::Dashboard => &self.dashboard,
            Service::Ai => &self.ai,
        }
    }

    fn get_mut(&mut self, service: Service) -> &mut String {
        match service {
            Service::Expenses => &mut self.expenses,
            Service::Incomes => &mut self.incomes,
            Service::Categories => &mut self.categories,
            Service::Budgets => &mut self.budgets,
            Service::SavingsGoals => &mut self.savings_goals,
            Service::Recurring => &mut self.recurring,
            Service::Dashboard => &mut self.dashboard,
            Service::Ai => &mut self.ai,
        }
    }

    /// Applies `FINANZAS_<SERVICE>_URL` overrides found through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        for service in Service::ALL {
            let Some(raw) = lookup(&service.env_var()) else {
                continue;
            };
            let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl {
                service: service.as_str(),
                url: raw.clone(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl {
                    service: service.as_str(),
                    url: raw,
                });
            }
            *self.get_mut(service) = url.as_str().trim_end_matches('/').to_string();
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_environment() {
        assert_eq!(detect_environment("localhost"), Environment::Local);
        assert_eq!(detect_environment("127.0.0.1"), Environment::Local);
        assert_eq!(detect_environment(""), Environment::Local);
        assert_eq!(detect_environment("frontend"), Environment::Docker);
        assert_eq!(detect_environment("my.docker.internal"), Environment::Docker);
        assert_eq!(detect_environment("finanzas.onrender.com"), Environment::Hosted);
        assert_eq!(detect_environment("finanzas-app.vercel.app"), Environment::Hosted);
        assert_eq!(detect_environment("finanzas.app"), Environment::Production);
        assert_eq!(detect_environment("  LOCALHOST "), Environment::Local);
    }

    #[test]
    fn test_resolution_order() {
        assert_eq!(
            resolve_environment(
                Some(Environment::Docker),
                Some(Environment::Hosted),
                Some("localhost")
            ),
            (Environment::Docker, EnvironmentSource::Explicit)
        );
        assert_eq!(
            resolve_environment(None, Some(Environment::Hosted), Some("localhost")),
            (Environment::Hosted, EnvironmentSource::Forced)
        );
        assert_eq!(
            resolve_environment(None, None, Some("finanzas.app")),
            (Environment::Production, EnvironmentSource::Detected)
        );
        assert_eq!(
            resolve_environment(None, None, None),
            (Environment::Local, EnvironmentSource::Detected)
        );
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("Docker".parse::<Environment>().unwrap(), Environment::Docker);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!(
            "staging".parse::<Environment>(),
            Err(ConfigError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn test_environment_presets() {
        let local = Environment::Local.service_urls();
        assert_eq!(local.get(Service::Expenses), "http://localhost:8001");
        assert_eq!(local.get(Service::Ai), "http://localhost:8008");

        let docker = Environment::Docker.service_urls();
        assert_eq!(docker.savings_goals, "http://savings-goals-service:8000");
    }

    #[test]
    fn test_service_url_overrides() {
        let urls = Environment::Local
            .service_urls()
            .with_overrides(|name| {
                (name == "FINANZAS_BUDGETS_URL").then(|| "https://budgets.example.com/".to_string())
            })
            .unwrap();
        assert_eq!(urls.budgets, "https://budgets.example.com");
        assert_eq!(urls.expenses, "http://localhost:8001");

        let err = Environment::Local
            .service_urls()
            .with_overrides(|name| (name == "FINANZAS_AI_URL").then(|| "not a url".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { service: "ai", .. }));

        let err = Environment::Local
            .service_urls()
            .with_overrides(|name| {
                (name == "FINANZAS_AI_URL").then(|| "ftp://files.example.com".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { service: "ai", .. }));
    }

    #[test]
    fn test_single_base_url() {
        let urls = ServiceUrls::single("http://127.0.0.1:9000/");
        assert_eq!(urls.get(Service::Recurring), "http://127.0.0.1:9000");
        assert_eq!(Service::SavingsGoals.env_var(), "FINANZAS_SAVINGS_GOALS_URL");
    }
}
