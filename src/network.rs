use crate::agent::{Agent, PAgent};
use crate::contact::Contact;
use crate::error::Error;
use crate::population::Population;
use rand::RngCore;
use std::rc::Rc;

/// Adjacency table of a network.
///
/// Maps the 0-based index of each agent to its ordered list of neighbors.
/// Edges inserted through [`Adjacency::connect`] are symmetric, and free of
/// self-loops and duplicates.
#[derive(Debug, Default)]
pub struct Adjacency {
    neighbors: Vec<Vec<PAgent>>,
}

impl Adjacency {
    /// Create a table of `n_agt` empty neighbor lists.
    pub fn new(n_agt: usize) -> Self {
        Self {
            neighbors: vec![Vec::new(); n_agt],
        }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Get the neighbors of the agent at 0-based index `i_agt`.
    pub fn neighbors(&self, i_agt: usize) -> &[PAgent] {
        self.neighbors.get(i_agt).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get the realized degree of every agent.
    pub fn degrees(&self) -> Vec<usize> {
        self.neighbors.iter().map(Vec::len).collect()
    }

    pub fn n_edges(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// List every edge once, as a pair of 0-based indices `(lo, hi)` with `lo < hi`.
    ///
    /// Neighbors without an index, left behind by a rejected agent, are skipped.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(self.n_edges());
        for (i_agt, nbrs) in self.neighbors.iter().enumerate() {
            for j_agt in nbrs.iter().filter_map(|nbr| nbr.id().checked_sub(1)) {
                if i_agt < j_agt {
                    edges.push((i_agt, j_agt));
                }
            }
        }
        edges
    }

    /// Connect the agents at 0-based indices `from` and `to`.
    ///
    /// Self-loops and edges that already exist are silently ignored.
    /// The duplicate check scans the neighbors of `from`, so insertion is
    /// linear in its degree.
    ///
    /// # Errors
    /// Returns [`Error::AgentOutOfRange`] if either index has no entry in the
    /// table or no agent in `population`.
    pub fn connect(
        &mut self,
        population: &Population,
        from: usize,
        to: usize,
    ) -> Result<(), Error> {
        let size = self.neighbors.len();
        for index in [from, to] {
            if index >= size {
                return Err(Error::AgentOutOfRange { index, size });
            }
        }

        if from == to {
            return Ok(());
        }

        let agt_to = population.agent(to)?;
        if self.neighbors[from].iter().any(|nbr| Rc::ptr_eq(nbr, agt_to)) {
            return Ok(());
        }
        let agt_from = population.agent(from)?;

        self.neighbors[from].push(agt_to.clone());
        self.neighbors[to].push(agt_from.clone());

        Ok(())
    }
}

/// Edge-generation algorithm of a [`Network`].
pub trait Topology {
    /// Populate `adjacency`, which holds one empty entry per agent of `population`.
    fn build(
        &mut self,
        adjacency: &mut Adjacency,
        population: &Population,
        rng: &mut dyn RngCore,
    ) -> Result<(), Error>;

    /// Incorporate one new agent into an already built network.
    ///
    /// Fails with [`Error::Unsupported`] unless the topology overrides it.
    fn grow(&mut self, _adjacency: &mut Adjacency, _agent: &PAgent) -> Result<(), Error> {
        Err(Error::Unsupported("growing a finalized network"))
    }
}

/// Contact pattern backed by an explicit adjacency table.
///
/// The table is built once, on [`Network::finalize`], and cached for every
/// later query. Queries never finalize implicitly.
#[derive(Debug)]
pub struct Network<T> {
    topology: T,
    adjacency: Adjacency,
    finalized: bool,
}

impl<T: Topology> Network<T> {
    pub fn new(topology: T) -> Self {
        Self {
            topology,
            adjacency: Adjacency::default(),
            finalized: false,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn topology(&self) -> &T {
        &self.topology
    }

    /// Build the adjacency table for the current population.
    ///
    /// Does nothing if the network is already finalized. On failure the
    /// network stays unfinalized and its table is left untouched.
    pub fn finalize(
        &mut self,
        population: &Population,
        rng: &mut dyn RngCore,
    ) -> Result<(), Error> {
        if self.finalized {
            return Ok(());
        }

        let mut adjacency = Adjacency::new(population.size());
        self.topology.build(&mut adjacency, population, rng)?;
        log::debug!(
            "built network with {} agents and {} edges",
            adjacency.len(),
            adjacency.n_edges()
        );

        self.adjacency = adjacency;
        self.finalized = true;
        Ok(())
    }
}

impl<T: Topology> Contact for Network<T> {
    fn contact(&self, _time: f64, agent: &Agent) -> &[PAgent] {
        match agent.id().checked_sub(1) {
            Some(i_agt) => self.adjacency.neighbors(i_agt),
            None => &[],
        }
    }

    fn add(&mut self, agent: &PAgent) -> Result<(), Error> {
        if !self.finalized {
            return Ok(());
        }
        self.topology.grow(&mut self.adjacency, agent)
    }

    fn finalize(
        &mut self,
        population: &Population,
        rng: &mut dyn RngCore,
    ) -> Result<(), Error> {
        Network::finalize(self, population, rng)
    }
}
