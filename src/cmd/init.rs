use anyhow::Result;
use std::io::{self, Write};

use dosewatch::db::Database;
use dosewatch::models::config::Config;

pub fn run(skip: bool) -> Result<()> {
    let mut config = Config::load().unwrap_or_default();

    if !skip {
        println!("Dosewatch — Initial Setup\n");

        let tz = prompt_string("Timezone (IANA id, e.g. Europe/Berlin)")?;
        if !tz.is_empty() {
            if tz.parse::<chrono_tz::Tz>().is_err() {
                anyhow::bail!("'{tz}' is not a known IANA timezone");
            }
            config.profile.timezone = tz;
        }

        let owner = prompt_string("Owner id (empty for 'local')")?;
        if !owner.is_empty() {
            config.profile.owner_id = owner;
        }
    }

    config.save()?;

    // Create the database eagerly so later commands start from a
    // migrated file.
    Database::open(&Config::db_path())?;

    println!("Config initialized at {:?}", Config::path());
    println!("Data stored in {:?}", Config::data_dir());
    Ok(())
}

fn prompt_string(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}
