//! Process configuration: built-in defaults, then an optional TOML file named
//! by `MADRASHA_CONFIG`, then `MADRASHA_*` environment variables. Nested keys
//! use `__`, e.g. `MADRASHA_ALLOCATION__ENFORCE_CAPACITY=false`.

use anyhow::{bail, Context};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::hostel::AllocationPolicy;

pub const CONFIG_PATH_ENV: &str = "MADRASHA_CONFIG";
const ENV_PREFIX: &str = "MADRASHA_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedSource {
    #[default]
    Sample,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seed: SeedSource,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Destructive requests must carry `"confirm": true`.
    pub confirm_deletes: bool,
    pub allocation: AllocationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: SeedSource::Sample,
            log_filter: "madrashad=info".to_string(),
            confirm_deletes: true,
            allocation: AllocationPolicy::default(),
        }
    }
}

impl Config {
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let file = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        if let Some(path) = &file {
            if !path.is_file() {
                bail!("config file not found: {}", path.to_string_lossy());
            }
        }
        Self::figment(file.as_deref())
            .extract()
            .context("failed to load configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hostel::RosterConflicts;
    use figment::Jail;

    #[test]
    fn defaults_enforce_capacity_and_reject_conflicts() {
        Jail::expect_with(|_jail| {
            let config: Config = Config::figment(None).extract()?;
            assert_eq!(config, Config::default());
            assert!(config.allocation.enforce_capacity);
            assert_eq!(config.allocation.roster_conflicts, RosterConflicts::Reject);
            assert!(config.confirm_deletes);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "madrasha.toml",
                r#"
                    seed = "empty"
                    confirm_deletes = false

                    [allocation]
                    roster_conflicts = "move"
                "#,
            )?;
            jail.set_env("MADRASHA_ALLOCATION__ENFORCE_CAPACITY", "false");
            jail.set_env("MADRASHA_LOG_FILTER", "madrashad=debug");

            let config: Config = Config::figment(Some(Path::new("madrasha.toml"))).extract()?;
            assert_eq!(config.seed, SeedSource::Empty);
            assert!(!config.confirm_deletes);
            assert_eq!(config.allocation.roster_conflicts, RosterConflicts::Move);
            assert!(!config.allocation.enforce_capacity);
            assert_eq!(config.log_filter, "madrashad=debug");
            Ok(())
        });
    }

    #[test]
    fn unknown_conflict_policy_is_an_error() {
        Jail::expect_with(|jail| {
            jail.set_env("MADRASHA_ALLOCATION__ROSTER_CONFLICTS", "steal");
            assert!(Config::figment(None).extract::<Config>().is_err());
            Ok(())
        });
    }
}
