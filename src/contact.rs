use crate::agent::{Agent, PAgent};
use crate::error::Error;
use crate::population::Population;
use rand::RngCore;
use std::{cell::RefCell, rc::Rc};

/// Contact pattern of a population.
///
/// Produces the potential transmission partners of an agent at a given
/// simulation time. A population may hold several contact patterns at once,
/// each queried independently.
pub trait Contact {
    /// Get the neighbors of `agent` at `time`.
    ///
    /// Returns an empty slice for agents the pattern knows nothing about yet.
    fn contact(&self, time: f64, agent: &Agent) -> &[PAgent];

    /// Notify the pattern that `agent` joined the population.
    fn add(&mut self, _agent: &PAgent) -> Result<(), Error> {
        Ok(())
    }

    /// Prepare the pattern for queries on the current population.
    fn finalize(
        &mut self,
        _population: &Population,
        _rng: &mut dyn RngCore,
    ) -> Result<(), Error> {
        Ok(())
    }
}

/// Shared handle to a contact pattern.
pub type PContact = Rc<RefCell<dyn Contact>>;
