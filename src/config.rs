use crate::ledger::NameMatching;
use crate::utils::time::JST_OFFSET_HOURS;
use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_url: Option<String>,
    pub ledger_path: PathBuf,
    pub roster_path: PathBuf,
    pub admin_role_id: Option<u64>,
    pub utc_offset_hours: i32,
    pub name_matching: NameMatching,
    pub retention_days: u32,
    pub keepalive_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let discord_token = lookup("DISCORD_TOKEN")
            .ok_or_else(|| anyhow::anyhow!("DISCORD_TOKEN environment variable is required"))?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let ledger_path = lookup("LEDGER_PATH")
            .unwrap_or_else(|| "fishingData.json".to_string())
            .into();
        let roster_path = lookup("ROSTER_PATH")
            .unwrap_or_else(|| "externalUsers.json".to_string())
            .into();

        let admin_role_id = parse_optional(&lookup, "ADMIN_ROLE_ID")?;
        let utc_offset_hours = parse_optional(&lookup, "UTC_OFFSET_HOURS")?.unwrap_or(JST_OFFSET_HOURS);

        let name_matching = match parse_optional::<bool>(&lookup, "NAME_MATCH_CASE_SENSITIVE")? {
            Some(true) => NameMatching::CaseSensitive,
            _ => NameMatching::CaseInsensitive,
        };

        let retention_days = parse_optional(&lookup, "HISTORY_RETENTION_DAYS")?.unwrap_or(7);

        let keepalive_port = match lookup("KEEPALIVE_PORT") {
            Some(port) if port.trim().eq_ignore_ascii_case("off") => None,
            Some(port) => Some(
                port.trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid KEEPALIVE_PORT '{}': {}", port, e))?,
            ),
            None => Some(3000),
        };

        Ok(Config {
            discord_token,
            database_url,
            ledger_path,
            roster_path,
            admin_role_id,
            utc_offset_hours,
            name_matching,
            retention_days,
            keepalive_port,
        })
    }
}

fn parse_optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", key, raw, e)),
        None => Ok(None),
    }
}
