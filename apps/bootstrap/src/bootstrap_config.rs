use std::env;

use gatehouse_application::AdminAccountSpec;
use gatehouse_core::AppError;
use gatehouse_domain::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, DEFAULT_HASH_COST, validate_password,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct BootstrapConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub admin: AdminAccountSpec,
    pub password_hash_cost: u32,
}

impl BootstrapConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_source(migrate_only, |name| env::var(name).ok())
    }

    fn from_source(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let database_url = required_env(&lookup, "DATABASE_URL")?;

        let database_max_connections = parse_or(
            &lookup,
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        )?;
        if database_max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_owned(),
            ));
        }

        let password_hash_cost = parse_or(&lookup, "PASSWORD_HASH_COST", DEFAULT_HASH_COST)?;
        if !(4..=31).contains(&password_hash_cost) {
            return Err(AppError::Validation(format!(
                "PASSWORD_HASH_COST must be between 4 and 31, got {password_hash_cost}"
            )));
        }

        let email = lookup("BOOTSTRAP_ADMIN_EMAIL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_owned());
        let password = lookup("BOOTSTRAP_ADMIN_PASSWORD")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_owned());
        validate_password(&password).map_err(|error| {
            AppError::Validation(format!("BOOTSTRAP_ADMIN_PASSWORD is rejected: {error}"))
        })?;

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            admin: AdminAccountSpec {
                email,
                password,
                ..AdminAccountSpec::default()
            },
            password_hash_cost,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_or(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u32,
) -> Result<u32, AppError> {
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use gatehouse_core::AppError;

    use super::BootstrapConfig;

    fn load(pairs: &[(&str, &str)]) -> Result<BootstrapConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        BootstrapConfig::from_source(false, |name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/gatehouse")])
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.password_hash_cost, 12);
        assert_eq!(config.admin.email, "admin@example.com");
        assert!(config.admin.uses_default_password());
        assert!(!config.migrate_only);
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(load(&[]), Err(AppError::Validation(_))));
        assert!(matches!(
            load(&[("DATABASE_URL", "  ")]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/gatehouse"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("PASSWORD_HASH_COST", "10"),
            ("BOOTSTRAP_ADMIN_EMAIL", "ops@corp.test"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "Sup3r#Secret"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.database_max_connections, 2);
        assert_eq!(config.password_hash_cost, 10);
        assert_eq!(config.admin.email, "ops@corp.test");
        assert!(!config.admin.uses_default_password());
    }

    #[test]
    fn invalid_numbers_and_weak_passwords_are_rejected() {
        let base = ("DATABASE_URL", "postgres://db/gatehouse");
        assert!(load(&[base, ("PASSWORD_HASH_COST", "twelve")]).is_err());
        assert!(load(&[base, ("PASSWORD_HASH_COST", "3")]).is_err());
        assert!(load(&[base, ("PASSWORD_HASH_COST", "32")]).is_err());
        assert!(load(&[base, ("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[base, ("BOOTSTRAP_ADMIN_PASSWORD", "password")]).is_err());
    }
}
