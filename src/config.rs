use crate::error::{
    AcademicaResult, BadEnvVarSnafu, EmptyEnvVarSnafu, ParseDatabaseUrlSnafu,
};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::{ResultExt, ensure};
use sqlx::postgres::PgConnectOptions;
use std::{str::FromStr, sync::Arc};

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    db_config: Arc<DbConfig>,
    server_ip: String,
}

impl RuntimeConfiguration {
    pub fn new() -> AcademicaResult<Self> {
        Self::from_lookup(|name| var(name))
    }

    /// Builds the configuration from any env-like lookup, so it can be exercised without
    /// touching the process environment.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> AcademicaResult<Self> {
        let server_ip =
            lookup("ACADEMICA_SERVER_IP").unwrap_or_else(|_| DEFAULT_SERVER_IP.to_string());

        Ok(Self {
            db_config: Arc::new(DbConfig::from_lookup(&lookup)?),
            server_ip,
        })
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }
}

#[derive(Debug)]
pub struct DbConfig {
    url: String,
    auth_token: Option<SecretString>,
}

impl DbConfig {
    fn from_lookup(
        lookup: &impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> AcademicaResult<Self> {
        let url = lookup("DATABASE_URL")
            .or_else(|_| lookup("LIBSQL_URL"))
            .context(BadEnvVarSnafu {
                name: "DATABASE_URL",
            })?;
        ensure!(
            !url.trim().is_empty(),
            EmptyEnvVarSnafu {
                name: "DATABASE_URL"
            }
        );

        let auth_token = lookup("DATABASE_AUTH_TOKEN")
            .or_else(|_| lookup("LIBSQL_AUTH_TOKEN"))
            .ok()
            .filter(|token| !token.is_empty())
            .map(SecretString::from);

        Ok(Self { url, auth_token })
    }

    pub const fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Connection options for the pool. The auth token, when present, overrides any
    /// password embedded in the URL.
    pub fn connect_options(&self) -> AcademicaResult<PgConnectOptions> {
        let options = PgConnectOptions::from_str(&self.url).context(ParseDatabaseUrlSnafu)?;

        Ok(match &self.auth_token {
            Some(token) => options.password(token.expose_secret()),
            None => options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcademicaError;
    use std::{collections::HashMap, env::VarError};

    fn lookup_from(
        pairs: &[(&'static str, &'static str)],
    ) -> impl Fn(&'static str) -> Result<String, dotenvy::Error> {
        let vars: HashMap<&'static str, &'static str> = pairs.iter().copied().collect();
        move |name| {
            vars.get(name)
                .map(ToString::to_string)
                .ok_or(dotenvy::Error::EnvVar(VarError::NotPresent))
        }
    }

    #[test]
    fn missing_database_url_is_fatal() {
        let err = RuntimeConfiguration::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(
            err,
            AcademicaError::BadEnvVar {
                name: "DATABASE_URL",
                ..
            }
        ));
    }

    #[test]
    fn empty_database_url_is_fatal() {
        let err =
            RuntimeConfiguration::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, AcademicaError::EmptyEnvVar { .. }));
    }

    #[test]
    fn libsql_aliases_are_accepted() {
        let config = RuntimeConfiguration::from_lookup(lookup_from(&[
            ("LIBSQL_URL", "postgres://school@localhost:5432/academica"),
            ("LIBSQL_AUTH_TOKEN", "hunter2"),
        ]))
        .unwrap();

        assert!(config.db_config().has_auth_token());
        assert_eq!(config.server_ip(), DEFAULT_SERVER_IP);
    }

    #[test]
    fn auth_token_is_optional() {
        let config = RuntimeConfiguration::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://school@localhost:5432/academica"),
            ("DATABASE_AUTH_TOKEN", ""),
            ("ACADEMICA_SERVER_IP", "0.0.0.0:3000"),
        ]))
        .unwrap();

        assert!(!config.db_config().has_auth_token());
        assert_eq!(config.server_ip(), "0.0.0.0:3000");
        assert!(config.db_config().connect_options().is_ok());
    }

    #[test]
    fn malformed_url_is_reported_when_connecting() {
        let config =
            RuntimeConfiguration::from_lookup(lookup_from(&[("DATABASE_URL", "not a url")]))
                .unwrap();

        assert!(matches!(
            config.db_config().connect_options(),
            Err(AcademicaError::ParseDatabaseUrl { .. })
        ));
    }
}
