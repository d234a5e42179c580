use std::str::FromStr;

use anyhow::{anyhow, Context};

use crate::store::DEFAULT_ROOMS;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: String,
    pub rooms: Vec<String>,
    pub session_minutes: i64,
    pub broadcast_capacity: usize,
    pub cors_any: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: "0.0.0.0:8080".to_owned(),
            rooms: DEFAULT_ROOMS.iter().map(|name| name.to_string()).collect(),
            session_minutes: 30,
            broadcast_capacity: 64,
            cors_any: false,
        }
    }
}

impl Config {
    /// Reads `CHAT_*` variables, falling back to the defaults for unset ones.
    pub fn from_env() -> anyhow::Result<Config> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let defaults = Config::default();

        let rooms = match lookup("CHAT_ROOMS") {
            Some(list) => parse_rooms(&list)?,
            None => defaults.rooms,
        };

        Ok(Config {
            addr: lookup("CHAT_ADDR").unwrap_or(defaults.addr),
            rooms,
            session_minutes: parse_or("CHAT_SESSION_MINUTES", &lookup, defaults.session_minutes)?,
            broadcast_capacity: parse_or("CHAT_BROADCAST_CAPACITY", &lookup, defaults.broadcast_capacity)?,
            cors_any: parse_or("CHAT_CORS_ANY", &lookup, defaults.cors_any)?,
        })
    }
}

fn parse_rooms(list: &str) -> anyhow::Result<Vec<String>> {
    let rooms: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();
    if rooms.is_empty() {
        return Err(anyhow!("CHAT_ROOMS names no rooms"));
    }
    Ok(rooms)
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}={raw} is not valid")),
        None => Ok(default),
    }
}
