// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use config::{Config, ConfigError, File};
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, metadata, File as FsFile};
use std::io::Write;
use std::path::{Path, PathBuf};
use struct_field_names_as_array::FieldNamesAsArray;

/// Prefix of environment overrides: `btcu_<section>_<field>`
pub const ENV_PREFIX: &str = "btcu";

#[derive(Debug)]
pub enum SettingsErr {
    /// No configuration directory could be determined
    NoConfigDir,

    /// Path is not valid unicode
    InvalidPath,

    /// Loading or merging sources failed
    Config(ConfigError),

    /// Default settings could not be serialized
    Serialize(String),

    /// A setting holds an invalid value
    Invalid(&'static str),
}

impl From<ConfigError> for SettingsErr {
    fn from(other: ConfigError) -> Self {
        Self::Config(other)
    }
}

impl std::fmt::Display for SettingsErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "no configuration directory"),
            Self::InvalidPath => write!(f, "configuration path is not valid unicode"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "could not serialize defaults: {err}"),
            Self::Invalid(err) => write!(f, "invalid setting: {err}"),
        }
    }
}

impl std::error::Error for SettingsErr {}

#[derive(Debug, Serialize, Deserialize, Default, FieldNamesAsArray)]
pub struct Settings {
    /// Network settings.
    pub network: Network,

    /// Node settings.
    pub node: Node,

    /// Staking settings.
    pub staking: Staking,
}

impl Settings {
    /// Loads settings from `<config dir>/BTCU/config.toml`, writing the
    /// defaults there first if the file does not exist.
    pub fn new() -> Result<Self, SettingsErr> {
        let mut config_path = dirs::config_dir().ok_or(SettingsErr::NoConfigDir)?;
        config_path.push("BTCU");
        config_path.push("config.toml");

        if metadata(&config_path).is_err() {
            write_defaults(&config_path)?;
        }

        Self::load(&config_path, std::env::vars())
    }

    /// Loads settings from `path`, applying overrides found in `env`.
    pub fn load<I>(path: &Path, env: I) -> Result<Self, SettingsErr>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let path = path.to_str().ok_or(SettingsErr::InvalidPath)?;
        let mut s = Config::builder().add_source(File::with_name(path).required(false));

        // Set defaults
        let defaults = serde_yaml::to_value(Settings::default())
            .map_err(|err| SettingsErr::Serialize(err.to_string()))?;
        let defaults: HashMap<String, HashMap<String, DynamicConfVal>> =
            serde_yaml::from_value(defaults)
                .map_err(|err| SettingsErr::Serialize(err.to_string()))?;

        for (k1, inner) in &defaults {
            for (k2, v) in inner {
                let key = format!("{k1}.{k2}");

                match v {
                    DynamicConfVal::String(v) => {
                        s = s.set_default(key, v.as_str())?;
                    }

                    DynamicConfVal::Sequence(v) => {
                        s = s.set_default(key, v.clone())?;
                    }

                    DynamicConfVal::Bool(v) => {
                        s = s.set_default(key, v.to_string())?;
                    }

                    DynamicConfVal::U16(v) => {
                        s = s.set_default(key, v.to_string())?;
                    }

                    DynamicConfVal::Option(v) => {
                        if let Some(v) = v {
                            s = s.set_default(key, v.as_str())?;
                        }
                    }
                }
            }
        }

        // Make sure to list these in order
        let settings_modules: Vec<_> = vec![
            Network::FIELD_NAMES_AS_ARRAY,
            Node::FIELD_NAMES_AS_ARRAY,
            Staking::FIELD_NAMES_AS_ARRAY,
        ];

        // Gather all possible settings keys
        let possible_keys: HashMap<String, String> = Settings::FIELD_NAMES_AS_ARRAY
            .iter()
            .enumerate()
            .flat_map(|(i, field)| {
                settings_modules[i].iter().map(move |nested| {
                    (
                        format!("{}_{}_{}", ENV_PREFIX, field, nested.replace('_', "")),
                        format!("{field}.{nested}"),
                    )
                })
            })
            .collect();

        // Parse env vars manually and set overrides if they exist as the
        // config package `Environment` module seems to behave poorly.
        for (k, v) in env {
            let Some(key) = possible_keys.get(&k.to_lowercase()) else {
                continue;
            };

            // Filter empty values
            if v.is_empty() {
                continue;
            }

            s = s.set_override(key.as_str(), v)?;
        }

        let settings: Self = s.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values the deserializer cannot.
    pub fn validate(&self) -> Result<(), SettingsErr> {
        self.network
            .network_name
            .parse::<crate::chain::Network>()
            .map_err(SettingsErr::Invalid)?;

        if self.node.data_dir.is_empty() {
            return Err(SettingsErr::Invalid("empty data directory"));
        }

        Ok(())
    }

    /// The selected network.
    pub fn chain_network(&self) -> Result<crate::chain::Network, SettingsErr> {
        self.network
            .network_name
            .parse()
            .map_err(SettingsErr::Invalid)
    }
}

fn write_defaults(path: &Path) -> Result<(), SettingsErr> {
    let settings_str = toml::ser::to_string_pretty(&Settings::default())
        .map_err(|err| SettingsErr::Serialize(err.to_string()))?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).unwrap_or(());
    }

    // If this fails, fall back to defaults and environment variables
    match FsFile::create(path) {
        Ok(mut file) => {
            file.write_all(settings_str.as_bytes()).unwrap_or(());
        }
        Err(err) => {
            error!("Failed to create configuration! Reason: {:#?}", err);
        }
    }

    Ok(())
}

#[derive(Debug, Serialize, Deserialize, FieldNamesAsArray)]
pub struct Network {
    /// The network the node runs on: `main`, `test` or `regtest`.
    #[serde(alias = "networkname")]
    pub network_name: String,

    /// Node listen address.
    #[serde(alias = "listenaddr")]
    pub listen_addr: String,

    /// Listen port. 0 selects the default port of the network.
    #[serde(alias = "listenport")]
    pub listen_port: u16,

    /// DNS seeds.
    pub seeds: Vec<String>,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            network_name: "main".to_owned(),
            listen_addr: "*".to_owned(),
            listen_port: 0,
            seeds: vec![],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FieldNamesAsArray)]
pub struct Node {
    /// Node data directory
    #[serde(alias = "datadir")]
    pub data_dir: String,

    /// Number of block verification threads.
    ///
    /// Default is 0 which means the number of cores of the system
    #[serde(alias = "verifierthreads")]
    pub verifier_threads: u16,
}

impl Default for Node {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|mut path| {
                path.push("BTCU");
                path.to_string_lossy().into_owned()
            })
            .unwrap_or_else(|| ".btcu".to_owned());

        Self {
            data_dir,
            verifier_threads: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FieldNamesAsArray)]
pub struct Staking {
    /// Enable staking.
    #[serde(alias = "stakingenabled")]
    pub staking_enabled: bool,

    /// Coinstake outputs are split in chunks of this many coins. 0 disables
    /// splitting.
    #[serde(alias = "stakesplitthreshold")]
    pub stake_split_threshold: u16,

    /// Size of the elected validator list. 0 selects the default.
    #[serde(alias = "maxvalidators")]
    pub max_validators: u16,
}

impl Default for Staking {
    fn default() -> Self {
        Self {
            staking_enabled: false,
            stake_split_threshold: 2000,
            max_validators: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DynamicConfVal {
    String(String),
    Sequence(Vec<String>),
    Option(Option<String>),
    Bool(bool),
    U16(u16),
}
