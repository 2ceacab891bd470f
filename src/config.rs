use crate::degree::DegreeDist;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Population parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents.
    pub n_agents: usize,
}

/// Contact network parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Requested degree distribution.
    pub degree: DegreeDist,
    /// Base seed of the random number generators (drawn from the OS if absent).
    pub seed: Option<u64>,
}

/// Output parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of bins of the degree histogram.
    pub hist_bins: usize,
}

/// Simulation configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub population: PopulationConfig,
    pub network: NetworkConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_num(self.population.n_agents, 1..10_000_000)
            .context("invalid number of agents")?;

        self.network
            .degree
            .validate()
            .context("invalid degree distribution")?;
        match self.network.degree {
            DegreeDist::Constant { k } => {
                check_num(k, 0..self.population.n_agents).context("invalid constant degree")?
            }
            DegreeDist::Poisson { mean } => {
                check_num(mean, 0.0..self.population.n_agents as f64)
                    .context("invalid mean degree")?
            }
            DegreeDist::Geometric { .. } => {}
            DegreeDist::Uniform { max, .. } => {
                check_num(max, 0..self.population.n_agents).context("invalid maximum degree")?
            }
        }

        check_num(self.output.hist_bins, 1..1_000).context("invalid number of histogram bins")?;

        Ok(())
    }
}

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
