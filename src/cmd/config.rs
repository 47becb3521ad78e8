use anyhow::Result;
use serde_json::json;

use dosewatch::models::config::Config;
use dosewatch::output;

pub fn run_show(human: bool) -> Result<()> {
    let config = Config::load()?;
    if human {
        let toml_str = toml::to_string_pretty(&config)?;
        println!("{}", toml_str);
    } else {
        let out = output::success("config", json!({ "config": config }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        "timezone" => {
            if value.parse::<chrono_tz::Tz>().is_err() {
                anyhow::bail!("'{value}' is not a known IANA timezone");
            }
            config.profile.timezone = value.to_string();
        }
        "owner_id" => config.profile.owner_id = value.to_string(),
        "profile_id" => config.profile.profile_id = value.to_string(),
        "reminders.enabled_by_default" => {
            config.reminders.enabled_by_default = value.parse()?;
        }
        k if k.starts_with("alias.") => {
            let alias = k.strip_prefix("alias.").unwrap_or_default();
            if alias.is_empty() {
                anyhow::bail!("alias key must be alias.<name>");
            }
            config.aliases.insert(alias.to_string(), value.to_string());
        }
        _ => anyhow::bail!("unknown config key: {}", key),
    }

    config.save()?;
    let out = output::success("config", json!({ "key": key, "value": value }));
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}
