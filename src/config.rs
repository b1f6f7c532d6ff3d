use std::{net::SocketAddr, time::Duration};

use anyhow::{Context, Result};

use crate::validation::{TextRules, DEFAULT_BODY_CHARSET, DEFAULT_NAME_CHARSET};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:9090";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub request_timeout: Duration,
    pub text_rules: TextRules,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_address: SocketAddr = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned())
            .parse()
            .context("BIND_ADDRESS must look like 127.0.0.1:9090")?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let name_charset =
            lookup("NAME_CHARSET").unwrap_or_else(|| DEFAULT_NAME_CHARSET.to_owned());
        let body_charset =
            lookup("BODY_CHARSET").unwrap_or_else(|| DEFAULT_BODY_CHARSET.to_owned());
        let text_rules = TextRules::new(&name_charset, &body_charset)
            .context("NAME_CHARSET and BODY_CHARSET must be valid character classes")?;

        Ok(Self {
            database_url,
            bind_address,
            request_timeout: Duration::from_secs(request_timeout),
            text_rules,
        })
    }
}
