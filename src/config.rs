use crate::domains::agent::AgentKind;
use crate::domains::motion::MotionSettings;
use crate::domains::waypoint::{Position3D, ZeroSpeedPolicy};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub agents: Vec<AgentSpawnConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    /// Upper bound on the dt fed to a single tick, in seconds.
    pub max_dt: f64,
    pub arrival_epsilon: f64,
    pub zero_speed_policy: ZeroSpeedPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: String,
    pub buffer_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpawnConfig {
    pub uid: String,
    pub kind: AgentKind,
    pub position: Position3D,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.tick_interval_ms == 0 {
            bail!("simulation.tick_interval_ms must be greater than 0");
        }
        if !sim.max_dt.is_finite() || sim.max_dt <= 0.0 {
            bail!("simulation.max_dt must be a positive number of seconds");
        }
        if !sim.arrival_epsilon.is_finite() || sim.arrival_epsilon < 0.0 {
            bail!("simulation.arrival_epsilon must be >= 0");
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            bail!("logging.level '{}' is not a valid log level", self.logging.level);
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !seen.insert(agent.uid.as_str()) {
                bail!("duplicate agent uid '{}'", agent.uid);
            }
        }
        Ok(())
    }

    pub fn motion_settings(&self) -> MotionSettings {
        MotionSettings {
            epsilon: self.simulation.arrival_epsilon,
            zero_speed: self.simulation.zero_speed_policy,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            max_dt: 0.25,
            arrival_epsilon: 1e-4,
            zero_speed_policy: ZeroSpeedPolicy::Stall,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
            buffer_capacity: 256,
        }
    }
}
