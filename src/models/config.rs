use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub reminders: Reminders,
    /// Short names for medications, e.g. `ibu = "ibuprofen"`.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_owner")]
    pub owner_id: String,
    #[serde(default = "default_profile")]
    pub profile_id: String,
    /// IANA zone id applied to new schedules unless overridden.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_owner() -> String {
    "local".to_string()
}
fn default_profile() -> String {
    "self".to_string()
}
fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            owner_id: "local".to_string(),
            profile_id: "self".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Reminders {
    /// Default for `reminder_enabled` on newly created schedules.
    #[serde(default = "default_enabled")]
    pub enabled_by_default: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for Reminders {
    fn default() -> Self {
        Self {
            enabled_by_default: true,
        }
    }
}

impl Config {
    /// Load config from the standard path, or return defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the standard path.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }
        let contents = toml::to_string_pretty(self)?;

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true).mode(0o600);
            let mut file = options.open(&path)?;

            file.write_all(contents.as_bytes())?;

            // Ensure permissions are 0o600 even if file already existed
            // Setting this after write to avoid data loss on empty file if this fails
            let mut perms = file.metadata()?.permissions();
            if perms.mode() & 0o777 != 0o600 {
                perms.set_mode(0o600);
                fs::set_permissions(&path, perms)?;
            }
        }
        #[cfg(not(unix))]
        {
            std::fs::write(&path, contents)?;
        }

        Ok(())
    }

    /// Resolve an alias to a medication name, or return the input unchanged.
    pub fn resolve_alias(&self, input: &str) -> String {
        self.aliases
            .get(input)
            .cloned()
            .unwrap_or_else(|| input.to_string())
    }

    pub fn data_dir() -> PathBuf {
        if let Ok(home) = std::env::var("DOSEWATCH_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .expect("cannot resolve home directory")
            .join(".dosewatch")
    }

    pub fn path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    pub fn db_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }
}
