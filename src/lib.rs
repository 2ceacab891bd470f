//! Contact networks for stochastic agent-based epidemic simulations.
//!
//! A [`Population`] owns its agents and the [`Contact`] patterns defined on
//! them. A [`Network`] is a contact pattern backed by an adjacency table that
//! is built once, on finalize, by a [`Topology`]; [`ConfigurationModel`]
//! builds a random graph with a requested degree sequence by stub matching.

pub mod agent;
pub mod analysis;
pub mod config;
pub mod configuration;
pub mod contact;
pub mod degree;
pub mod engine;
pub mod error;
pub mod manager;
pub mod network;
pub mod population;
pub mod stats;

pub use agent::{Agent, AgentReport, PAgent, State};
pub use configuration::ConfigurationModel;
pub use contact::{Contact, PContact};
pub use degree::{DegreeDist, DegreeSequence, SampledDegrees};
pub use error::Error;
pub use network::{Adjacency, Network, Topology};
pub use population::Population;
