use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    /// Directive string handed to `EnvFilter`; falls back to `info`.
    pub(crate) filter: String,
    pub(crate) ansi: bool,
    /// Collected while parsing and logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_lookup(component, |key| env::var(key).ok())
    }

    fn from_lookup(component: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();
        let component = component.trim().to_string();

        let service_name = lookup("SERVICE_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = lookup("STAGE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let filter = match lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            Some(raw) => match EnvFilter::try_new(&raw) {
                Ok(_) => raw,
                Err(err) => {
                    warnings.push(format!(
                        "RUST_LOG is invalid ({err}); defaulting to {DEFAULT_FILTER}"
                    ));
                    DEFAULT_FILTER.to_string()
                }
            },
            None => DEFAULT_FILTER.to_string(),
        };

        let ansi = match lookup("LOG_ANSI") {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warnings.push(format!("LOG_ANSI is invalid (value: {raw}); keeping colors on"));
                true
            }),
            None => true,
        };

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            filter,
            ansi,
            warnings,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> ObservabilityConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ObservabilityConfig::from_lookup(" backend ", |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_component_name_and_info() {
        let config = config_with(&[]);

        assert_eq!(config.service_context.service_name, "backend");
        assert_eq!(config.service_context.environment, "unknown");
        assert_eq!(config.filter, "info");
        assert!(config.ansi);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn reads_service_context_and_filter() {
        let config = config_with(&[
            ("SERVICE_NAME", "directory-api"),
            ("STAGE", "Production"),
            ("RUST_LOG", "backend=debug,tower_http=info"),
            ("LOG_ANSI", "off"),
        ]);

        assert_eq!(config.service_context.service_name, "directory-api");
        assert_eq!(config.service_context.environment, "Production");
        assert_eq!(config.filter, "backend=debug,tower_http=info");
        assert!(!config.ansi);
    }

    #[test]
    fn invalid_values_fall_back_with_warnings() {
        let config = config_with(&[("RUST_LOG", "backend=loud"), ("LOG_ANSI", "maybe")]);

        assert_eq!(config.filter, "info");
        assert!(config.ansi);
        assert_eq!(config.warnings.len(), 2);
    }
}
