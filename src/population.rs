use crate::agent::{Agent, AgentReport, PAgent, State};
use crate::contact::PContact;
use crate::error::Error;
use rand::RngCore;
use std::rc::Rc;

/// Ordered registry of agents and the contact patterns defined on them.
///
/// Agents are indexed densely from 1 in insertion order and are never removed,
/// so the population only grows.
#[derive(Default)]
pub struct Population {
    agents: Vec<PAgent>,
    contacts: Vec<PContact>,
}

impl Population {
    /// Create a population with `n_agt` agents in an empty state.
    pub fn new(n_agt: usize) -> Self {
        let agents = (1..=n_agt)
            .map(|id| {
                let agent = Agent::new();
                agent.attach(id);
                Rc::new(agent)
            })
            .collect();
        Self {
            agents,
            contacts: Vec::new(),
        }
    }

    /// Add an agent to the population, assigning it the next index.
    ///
    /// Every registered contact pattern is notified. If one of them rejects
    /// the agent, the agent is left detached and the population is unchanged.
    ///
    /// # Errors
    /// Returns [`Error::AgentAlreadyAdded`] if the agent already has an index,
    /// or the error of the first contact pattern that rejects it.
    pub fn add_agent(&mut self, agent: PAgent) -> Result<(), Error> {
        if agent.id() != 0 {
            return Err(Error::AgentAlreadyAdded { id: agent.id() });
        }

        agent.attach(self.agents.len() + 1);
        for contact in &self.contacts {
            if let Err(error) = contact.borrow_mut().add(&agent) {
                agent.attach(0);
                return Err(error);
            }
        }

        self.agents.push(agent);
        Ok(())
    }

    /// Register a contact pattern.
    ///
    /// Returns `false` if the same pattern was already registered.
    pub fn add_contact(&mut self, contact: PContact) -> bool {
        if self.contacts.iter().any(|c| Rc::ptr_eq(c, &contact)) {
            return false;
        }
        self.contacts.push(contact);
        true
    }

    pub fn size(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Get the agent at 0-based index `i_agt`.
    pub fn agent(&self, i_agt: usize) -> Result<&PAgent, Error> {
        self.agents.get(i_agt).ok_or(Error::AgentOutOfRange {
            index: i_agt,
            size: self.agents.len(),
        })
    }

    pub fn agents(&self) -> &[PAgent] {
        &self.agents
    }

    pub fn contacts(&self) -> &[PContact] {
        &self.contacts
    }

    /// Set the state of every agent with `init`, called with the agent's 1-based index.
    pub fn initialize<F>(&self, mut init: F)
    where
        F: FnMut(usize) -> State,
    {
        for agent in &self.agents {
            agent.set_state(init(agent.id()));
        }
    }

    /// Finalize every registered contact pattern, in registration order.
    pub fn finalize(&self, rng: &mut dyn RngCore) -> Result<(), Error> {
        for contact in &self.contacts {
            contact.borrow_mut().finalize(self, rng)?;
        }
        log::debug!(
            "finalized {} contact patterns over {} agents",
            self.contacts.len(),
            self.agents.len()
        );
        Ok(())
    }

    /// Snapshot every agent.
    pub fn report(&self) -> Vec<AgentReport> {
        self.agents.iter().map(|agent| agent.report()).collect()
    }
}
