// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use leadboard_console::{FaultRates, Latency};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOAD_LATENCY: &str = "800ms";
const DEFAULT_UPDATE_LATENCY: &str = "500ms";
const DEFAULT_CREATE_LATENCY: &str = "600ms";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub simulation: Simulation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            data: Data::default(),
            simulation: Simulation::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub prefs_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub leads_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Simulation {
    pub load_latency: Option<String>,
    pub update_latency: Option<String>,
    pub create_latency: Option<String>,
    pub load_failure_rate: Option<f64>,
    pub update_failure_rate: Option<f64>,
    pub create_failure_rate: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for Simulation {
    fn default() -> Self {
        let rates = FaultRates::default();
        Self {
            load_latency: Some(DEFAULT_LOAD_LATENCY.to_owned()),
            update_latency: Some(DEFAULT_UPDATE_LATENCY.to_owned()),
            create_latency: Some(DEFAULT_CREATE_LATENCY.to_owned()),
            load_failure_rate: Some(rates.load),
            update_failure_rate: Some(rates.update),
            create_failure_rate: Some(rates.create),
            seed: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("LEADBOARD_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set LEADBOARD_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(leadboard_prefs::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [storage], [data], and [simulation]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(prefs_path) = &self.storage.prefs_path {
            leadboard_prefs::validate_prefs_path(prefs_path)?;
        }

        if let Some(leads_path) = &self.data.leads_path
            && leads_path.trim().is_empty()
        {
            bail!("data.leads_path in {} must not be empty", path.display());
        }

        for (key, raw) in [
            ("load_latency", &self.simulation.load_latency),
            ("update_latency", &self.simulation.update_latency),
            ("create_latency", &self.simulation.create_latency),
        ] {
            if let Some(raw) = raw {
                parse_duration(raw)
                    .with_context(|| format!("simulation.{key} in {}", path.display()))?;
            }
        }

        for (key, rate) in [
            ("load_failure_rate", self.simulation.load_failure_rate),
            ("update_failure_rate", self.simulation.update_failure_rate),
            ("create_failure_rate", self.simulation.create_failure_rate),
        ] {
            if let Some(rate) = rate
                && !(0.0..=1.0).contains(&rate)
            {
                bail!(
                    "simulation.{key} in {} must be between 0 and 1, got {rate}",
                    path.display()
                );
            }
        }

        Ok(())
    }

    pub fn prefs_path(&self) -> Result<PathBuf> {
        match &self.storage.prefs_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => leadboard_prefs::default_prefs_path(),
        }
    }

    pub fn leads_path(&self) -> Option<PathBuf> {
        self.data.leads_path.as_ref().map(PathBuf::from)
    }

    pub fn latency(&self) -> Result<Latency> {
        let simulation = &self.simulation;
        Ok(Latency {
            load: parse_duration(
                simulation
                    .load_latency
                    .as_deref()
                    .unwrap_or(DEFAULT_LOAD_LATENCY),
            )?,
            update: parse_duration(
                simulation
                    .update_latency
                    .as_deref()
                    .unwrap_or(DEFAULT_UPDATE_LATENCY),
            )?,
            create: parse_duration(
                simulation
                    .create_latency
                    .as_deref()
                    .unwrap_or(DEFAULT_CREATE_LATENCY),
            )?,
        })
    }

    pub fn fault_rates(&self) -> FaultRates {
        let defaults = FaultRates::default();
        let simulation = &self.simulation;
        FaultRates {
            load: simulation.load_failure_rate.unwrap_or(defaults.load),
            update: simulation.update_failure_rate.unwrap_or(defaults.update),
            create: simulation.create_failure_rate.unwrap_or(defaults.create),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.simulation.seed
    }

    pub fn example_config(path: &Path) -> String {
        let rates = FaultRates::default();
        format!(
            "# leadboard config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/leadboard/prefs.db)\n# prefs_path = \"/absolute/path/to/prefs.db\"\n\n[data]\n# Optional. JSON array of leads replacing the bundled sample set\n# leads_path = \"/absolute/path/to/leads.json\"\n\n[simulation]\nload_latency = \"{}\"\nupdate_latency = \"{}\"\ncreate_latency = \"{}\"\nload_failure_rate = {:?}\nupdate_failure_rate = {:?}\ncreate_failure_rate = {:?}\n# seed = 42\n",
            path.display(),
            DEFAULT_LOAD_LATENCY,
            DEFAULT_UPDATE_LATENCY,
            DEFAULT_CREATE_LATENCY,
            rates.load,
            rates.update,
            rates.create,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid latency duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid latency duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid latency duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("latency duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 1s)")
}
