use crate::Error;
use std::env;
use std::str::FromStr;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_REQUEST_BODY: usize = 2 * 1024 * 1024;
const DEFAULT_LOG_FILTER: &str = "waypost=info";

/// Settings used by the [`Server`](./struct.Server.html). The router itself has no configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Request bodies larger than this are answered with `413 Payload Too Large`.
    pub max_request_body: usize,
    /// Response bodies are truncated to this many bytes when set.
    pub max_response_body: Option<usize>,
    /// A `tracing` filter directive, used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            max_request_body: DEFAULT_MAX_REQUEST_BODY,
            max_response_body: None,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl Config {
    /// Reads the configuration from `WAYPOST_*` environment variables, falling back to the defaults.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `WAYPOST_HOST` | `host` |
    /// | `WAYPOST_PORT` | `port` |
    /// | `WAYPOST_MAX_REQUEST_BODY` | `max_request_body` |
    /// | `WAYPOST_MAX_RESPONSE_BODY` | `max_response_body` |
    /// | `WAYPOST_LOG` | `log_filter` |
    pub fn from_env() -> crate::Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> crate::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup("WAYPOST_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("WAYPOST_PORT") {
            config.port = parse("WAYPOST_PORT", &port)?;
        }
        if let Some(limit) = lookup("WAYPOST_MAX_REQUEST_BODY") {
            config.max_request_body = parse("WAYPOST_MAX_REQUEST_BODY", &limit)?;
        }
        if let Some(limit) = lookup("WAYPOST_MAX_RESPONSE_BODY") {
            config.max_response_body = Some(parse("WAYPOST_MAX_RESPONSE_BODY", &limit)?);
        }
        if let Some(filter) = lookup("WAYPOST_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// The `host:port` string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(key: &str, val: &str) -> crate::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    val.trim()
        .parse()
        .map_err(|e| Error::Config(format!("{} = {:?}: {}", key, val, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address(), "localhost:8080");
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("WAYPOST_HOST", "0.0.0.0"),
            ("WAYPOST_PORT", "3000"),
            ("WAYPOST_MAX_RESPONSE_BODY", "1024"),
            ("WAYPOST_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.max_response_body, Some(1024));
        assert_eq!(config.max_request_body, DEFAULT_MAX_REQUEST_BODY);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("WAYPOST_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("WAYPOST_PORT")));
    }
}
