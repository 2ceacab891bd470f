//! Error type shared by the population and network layers.

/// Failures surfaced by [`Population`](crate::population::Population) and
/// [`Network`](crate::network::Network) operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("agent index {index} is out of range for a population of size {size}")]
    AgentOutOfRange { index: usize, size: usize },

    #[error("agent {id} already belongs to a population")]
    AgentAlreadyAdded { id: usize },

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("degree sequence must have {expected} entries, but has {actual}")]
    DegreeCount { expected: usize, actual: usize },

    #[error("invalid degree distribution: {0}")]
    InvalidDistribution(String),
}
