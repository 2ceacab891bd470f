//! Degree sequences for the configuration model.

use crate::error::Error;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Geometric, Poisson, Uniform};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Source of requested degrees, one independent draw per agent.
pub trait DegreeSequence {
    /// Generate `n_agt` non-negative degrees.
    fn degrees(&mut self, n_agt: usize) -> Result<Vec<usize>, Error>;
}

impl<F> DegreeSequence for F
where
    F: FnMut(usize) -> Vec<usize>,
{
    fn degrees(&mut self, n_agt: usize) -> Result<Vec<usize>, Error> {
        Ok(self(n_agt))
    }
}

/// Degree distribution.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "dist", rename_all = "lowercase")]
pub enum DegreeDist {
    /// Every agent requests `k` contacts.
    Constant { k: usize },
    /// Poisson-distributed degrees, as in an Erdős–Rényi graph.
    Poisson { mean: f64 },
    /// Number of failures before the first success, with success probability `p`.
    Geometric { p: f64 },
    /// Uniform degrees in `min..=max`.
    Uniform { min: usize, max: usize },
}

impl DegreeDist {
    /// Check that the distribution parameters are valid.
    pub fn validate(&self) -> Result<(), Error> {
        match *self {
            DegreeDist::Constant { .. } => Ok(()),
            DegreeDist::Poisson { mean } if !(mean > 0.0 && mean.is_finite()) => Err(
                Error::InvalidDistribution(format!("mean must be positive, but is {mean}")),
            ),
            DegreeDist::Geometric { p } if !(p > 0.0 && p <= 1.0) => Err(
                Error::InvalidDistribution(format!("p must be in (0, 1], but is {p}")),
            ),
            DegreeDist::Uniform { min, max } if min > max => Err(Error::InvalidDistribution(
                format!("min must not exceed max, but {min} > {max}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Degrees sampled from a [`DegreeDist`] with a private random number generator.
///
/// Two instances with the same distribution and seed produce the same sequences.
pub struct SampledDegrees {
    dist: DegreeDist,
    rng: ChaCha12Rng,
}

impl SampledDegrees {
    pub fn new(dist: DegreeDist, rng: ChaCha12Rng) -> Result<Self, Error> {
        dist.validate()?;
        Ok(Self { dist, rng })
    }

    pub fn seeded(dist: DegreeDist, seed: u64) -> Result<Self, Error> {
        Self::new(dist, ChaCha12Rng::seed_from_u64(seed))
    }
}

impl DegreeSequence for SampledDegrees {
    fn degrees(&mut self, n_agt: usize) -> Result<Vec<usize>, Error> {
        let degrees = match self.dist {
            DegreeDist::Constant { k } => vec![k; n_agt],
            DegreeDist::Poisson { mean } => {
                let dist = Poisson::new(mean).map_err(invalid)?;
                (0..n_agt)
                    .map(|_| {
                        let k: f64 = dist.sample(&mut self.rng);
                        k as usize
                    })
                    .collect()
            }
            DegreeDist::Geometric { p } => {
                let dist = Geometric::new(p).map_err(invalid)?;
                (0..n_agt)
                    .map(|_| {
                        let k: u64 = dist.sample(&mut self.rng);
                        k as usize
                    })
                    .collect()
            }
            DegreeDist::Uniform { min, max } => {
                let dist = Uniform::new_inclusive(min, max).map_err(invalid)?;
                (0..n_agt).map(|_| dist.sample(&mut self.rng)).collect()
            }
        };

        Ok(degrees)
    }
}

fn invalid<E: Display>(error: E) -> Error {
    Error::InvalidDistribution(error.to_string())
}
