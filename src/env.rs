use crate::error::ModalError;
use dotenvy::dotenv;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Env {
    pub defer_deadline: Duration,

    pub app_debug: bool,
}

impl Env {
    pub fn parse() -> Result<Env, ModalError> {
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Env, ModalError> {
        let var = |key: &str, default: &str| {
            lookup(key)
                .unwrap_or_else(|| default.to_string())
                .trim_matches('"')
                .to_string()
        };

        let defer_deadline = var("MODAL_DEFER_DEADLINE_MS", "3000");
        let app_debug = var("APP_DEBUG", "false");

        Ok(Self {
            defer_deadline: Duration::from_millis(defer_deadline.parse().map_err(|_| {
                ModalError::InvalidConfig {
                    key: "MODAL_DEFER_DEADLINE_MS",
                    value: defer_deadline.clone(),
                }
            })?),

            app_debug: app_debug.parse().map_err(|_| ModalError::InvalidConfig {
                key: "APP_DEBUG",
                value: app_debug.clone(),
            })?,
        })
    }

    pub fn init_tracing(&self) -> Result<(), ModalError> {
        tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_target(false)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_max_level(if self.app_debug {
                    tracing::Level::DEBUG
                } else {
                    tracing::Level::INFO
                })
                .finish(),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> Result<Env, ModalError> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();

        Env::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let env = parse(&[]).unwrap();

        assert_eq!(env.defer_deadline, Duration::from_secs(3));
        assert!(!env.app_debug);
    }

    #[test]
    fn quoted_values_are_trimmed() {
        let env = parse(&[("MODAL_DEFER_DEADLINE_MS", "\"2500\""), ("APP_DEBUG", "true")]).unwrap();

        assert_eq!(env.defer_deadline, Duration::from_millis(2500));
        assert!(env.app_debug);
    }

    #[test]
    fn invalid_deadline_is_rejected() {
        let err = parse(&[("MODAL_DEFER_DEADLINE_MS", "soon")]).unwrap_err();

        assert!(matches!(
            err,
            ModalError::InvalidConfig { key: "MODAL_DEFER_DEADLINE_MS", ref value } if value == "soon"
        ));
    }
}
