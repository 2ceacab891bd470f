//! Agent data types.

use serde::{Deserialize, Serialize};
use serde_value::Value;
use std::{
    cell::{Cell, Ref, RefCell},
    rc::Rc,
};

/// Opaque state record of an agent.
pub type State = Value;

/// Shared handle to an agent.
///
/// Held by the population and by every adjacency table the agent appears in.
pub type PAgent = Rc<Agent>;

/// Agent of the population.
///
/// Each agent has a 1-based index (`id`), assigned once when it joins a
/// population, and a state record mutated by the simulation driver.
#[derive(Debug)]
pub struct Agent {
    id: Cell<usize>,
    state: RefCell<State>,
}

impl Agent {
    /// Create a detached agent with an empty state.
    pub fn new() -> Self {
        Self::with_state(Value::Unit)
    }

    /// Create a detached agent with a given initial state.
    pub fn with_state(state: State) -> Self {
        Self {
            id: Cell::new(0),
            state: RefCell::new(state),
        }
    }

    /// Get the 1-based index of the agent, or 0 if it has not joined a population.
    pub fn id(&self) -> usize {
        self.id.get()
    }

    /// Get the current state of the agent.
    pub fn state(&self) -> Ref<'_, State> {
        self.state.borrow()
    }

    /// Replace the state of the agent.
    pub fn set_state(&self, state: State) {
        *self.state.borrow_mut() = state;
    }

    pub(crate) fn attach(&self, id: usize) {
        self.id.set(id);
    }

    /// Snapshot the agent for reporting.
    pub fn report(&self) -> AgentReport {
        AgentReport {
            id: self.id(),
            state: self.state().clone(),
        }
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of an agent at a given moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub id: usize,
    pub state: State,
}
