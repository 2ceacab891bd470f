use crate::agent::PAgent;
use crate::degree::DegreeSequence;
use crate::error::Error;
use crate::network::{Adjacency, Topology};
use crate::population::Population;
use rand::{Rng, RngCore};

/// Configuration-model random graph, realized by stub matching.
///
/// Each agent receives as many stubs (half-edges) as its requested degree and
/// stubs are paired uniformly at random. Self-loops and duplicate edges are
/// dropped rather than redrawn, and an odd stub total leaves one stub
/// unmatched, so realized degrees can fall below the requested ones.
///
/// Growing a finalized configuration-model network is not supported.
pub struct ConfigurationModel<D> {
    degrees: D,
    requested: Vec<usize>,
}

impl<D: DegreeSequence> ConfigurationModel<D> {
    pub fn new(degrees: D) -> Self {
        Self {
            degrees,
            requested: Vec::new(),
        }
    }

    /// Get the degrees requested by the last successful build.
    pub fn requested(&self) -> &[usize] {
        &self.requested
    }
}

impl<D: DegreeSequence> Topology for ConfigurationModel<D> {
    fn build(
        &mut self,
        adjacency: &mut Adjacency,
        population: &Population,
        rng: &mut dyn RngCore,
    ) -> Result<(), Error> {
        let n_agt = adjacency.len();
        let degrees = self.degrees.degrees(n_agt)?;
        if degrees.len() != n_agt {
            return Err(Error::DegreeCount {
                expected: n_agt,
                actual: degrees.len(),
            });
        }

        let mut stubs = Vec::with_capacity(degrees.iter().sum());
        for (i_agt, &degree) in degrees.iter().enumerate() {
            stubs.extend(std::iter::repeat_n(i_agt, degree));
        }

        let mut n_stubs = stubs.len();
        while n_stubs >= 2 {
            let from = draw_index(rng, n_stubs);
            let to = draw_index(rng, n_stubs);
            adjacency.connect(population, stubs[from], stubs[to])?;

            // Overwrite the consumed positions with the last two active stubs, in order.
            stubs[from] = stubs[n_stubs - 1];
            stubs[to] = stubs[n_stubs - 2];
            n_stubs -= 2;
        }

        log::debug!(
            "matched {} stubs into {} edges ({} unmatched)",
            stubs.len() - n_stubs,
            adjacency.n_edges(),
            n_stubs
        );

        self.requested = degrees;
        Ok(())
    }

    fn grow(&mut self, _adjacency: &mut Adjacency, _agent: &PAgent) -> Result<(), Error> {
        Err(Error::Unsupported(
            "adding agents to a finalized configuration model",
        ))
    }
}

fn draw_index(rng: &mut dyn RngCore, len: usize) -> usize {
    let u: f64 = rng.random();
    ((u * len as f64) as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::contact::{Contact, PContact};
    use crate::network::Network;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::{cell::RefCell, rc::Rc};

    /// Replays a fixed list of uniform draws.
    struct ScriptedRng {
        draws: std::vec::IntoIter<f64>,
    }

    impl ScriptedRng {
        fn new(draws: &[f64]) -> Self {
            Self {
                draws: draws.to_vec().into_iter(),
            }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            let u = self.draws.next().expect("ran out of scripted draws");
            ((u * (1u64 << 53) as f64) as u64) << 11
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    fn build(
        degrees: Vec<usize>,
        rng: &mut dyn RngCore,
    ) -> Network<ConfigurationModel<impl DegreeSequence>> {
        let pop = Population::new(degrees.len());
        let mut net = Network::new(ConfigurationModel::new(move |_: usize| degrees.clone()));
        net.finalize(&pop, rng).unwrap();
        net
    }

    fn assert_simple(adj: &Adjacency) {
        for i_agt in 0..adj.len() {
            let ids: Vec<_> = adj.neighbors(i_agt).iter().map(|nbr| nbr.id() - 1).collect();
            assert!(!ids.contains(&i_agt), "self-loop at {i_agt}");
            for (k, &j_agt) in ids.iter().enumerate() {
                assert!(!ids[k + 1..].contains(&j_agt), "duplicate edge {i_agt}-{j_agt}");
                assert!(
                    adj.neighbors(j_agt).iter().any(|nbr| nbr.id() - 1 == i_agt),
                    "asymmetric edge {i_agt}-{j_agt}"
                );
            }
        }
    }

    #[test]
    fn small_sequence_yields_simple_graph() {
        for seed in 0..64 {
            let mut rng = ChaCha12Rng::seed_from_u64(seed);
            let net = build(vec![2, 2, 1, 1], &mut rng);
            let adj = net.adjacency();

            assert_eq!(adj.len(), 4);
            assert!(adj.n_edges() <= 3);
            assert_simple(adj);
        }
    }

    #[test]
    fn pair_never_gets_a_self_loop() {
        for seed in 0..64 {
            let mut rng = ChaCha12Rng::seed_from_u64(seed);
            let net = build(vec![1, 1], &mut rng);
            assert!(net.adjacency().n_edges() <= 1);
            assert_simple(net.adjacency());
        }

        // Both draws land on the same stub.
        let mut rng = ScriptedRng::new(&[0.0, 0.0]);
        let net = build(vec![1, 1], &mut rng);
        assert_eq!(net.adjacency().degrees(), vec![0, 0]);
    }

    #[test]
    fn zero_degrees_yield_empty_table() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let net = build(vec![0; 5], &mut rng);
        assert_eq!(net.adjacency().degrees(), vec![0; 5]);
    }

    #[test]
    fn odd_stub_total_discards_one_stub() {
        let mut rng = ScriptedRng::new(&[0.0, 0.5]);
        let net = build(vec![1, 1, 1], &mut rng);
        // stubs [0, 1, 2]: draws pick positions 0 and 1, the last stub is left over.
        assert_eq!(net.adjacency().edges(), vec![(0, 1)]);
    }

    #[test]
    fn stubs_are_overwritten_in_sequence() {
        // stubs [0, 1, 2, 3]: the first pair is positions 0 and 3. Overwriting
        // position 0 with stub 3 and then position 3 with stub 2 leaves the
        // active range as [3, 1], so agent 2 is never matched.
        let mut rng = ScriptedRng::new(&[0.0, 0.9, 0.0, 0.6]);
        let net = build(vec![1, 1, 1, 1], &mut rng);
        assert_eq!(net.adjacency().edges(), vec![(0, 3), (1, 3)]);
        assert_eq!(net.adjacency().degrees(), vec![1, 1, 0, 2]);
        assert_eq!(net.topology().requested(), &[1, 1, 1, 1]);
    }

    #[test]
    fn overwriting_a_slot_with_itself_keeps_every_stub() {
        // from == n - 1: position 3 takes its own stub, position 0 takes stub 2.
        // The active range becomes [2, 1].
        let mut rng = ScriptedRng::new(&[0.9, 0.0, 0.0, 0.5]);
        let net = build(vec![1, 1, 1, 1], &mut rng);
        assert_eq!(net.adjacency().edges(), vec![(0, 3), (1, 2)]);
        assert_eq!(net.adjacency().degrees(), vec![1, 1, 1, 1]);

        // to == n - 2: position 0 takes stub 3, position 2 takes its own stub.
        // The active range becomes [3, 1].
        let mut rng = ScriptedRng::new(&[0.0, 0.5, 0.0, 0.5]);
        let net = build(vec![1, 1, 1, 1], &mut rng);
        assert_eq!(net.adjacency().edges(), vec![(0, 2), (1, 3)]);
        assert_eq!(net.adjacency().degrees(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn empty_population_builds() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let net = build(Vec::new(), &mut rng);
        assert!(net.is_finalized());
        assert!(net.adjacency().is_empty());
    }

    #[test]
    fn wrong_degree_count_leaves_network_unfinalized() {
        let pop = Population::new(3);
        let mut net = Network::new(ConfigurationModel::new(|_: usize| vec![1usize, 1]));
        let mut rng = ChaCha12Rng::seed_from_u64(0);

        assert_eq!(
            net.finalize(&pop, &mut rng),
            Err(Error::DegreeCount {
                expected: 3,
                actual: 2
            })
        );
        assert!(!net.is_finalized());
    }

    #[test]
    fn refinalizing_keeps_the_first_realization() {
        let pop = Population::new(50);
        let mut net = Network::new(ConfigurationModel::new(|n_agt: usize| vec![4usize; n_agt]));
        let mut rng = ChaCha12Rng::seed_from_u64(3);

        net.finalize(&pop, &mut rng).unwrap();
        let edges = net.adjacency().edges();
        net.finalize(&pop, &mut rng).unwrap();

        assert_eq!(net.adjacency().edges(), edges);
    }

    #[test]
    fn adding_agents_after_finalize_fails() {
        let mut pop = Population::new(10);
        let net = Rc::new(RefCell::new(Network::new(ConfigurationModel::new(
            |n_agt: usize| vec![2usize; n_agt],
        ))));
        pop.add_contact(net.clone());

        // Agents added before finalize are simply included in the build.
        pop.add_agent(Rc::new(Agent::new())).unwrap();

        let mut rng = ChaCha12Rng::seed_from_u64(5);
        pop.finalize(&mut rng).unwrap();
        let edges = net.borrow().adjacency().edges();

        let agent = Rc::new(Agent::new());
        assert!(matches!(
            pop.add_agent(agent.clone()),
            Err(Error::Unsupported(_))
        ));
        assert_eq!(pop.size(), 11);
        assert_eq!(net.borrow().adjacency().len(), 11);
        assert_eq!(net.borrow().adjacency().edges(), edges);
        assert!(net.borrow().contact(0.0, &agent).is_empty());
    }

    #[test]
    fn contact_returns_cached_neighbors() {
        let mut pop = Population::new(20);
        let net = Rc::new(RefCell::new(Network::new(ConfigurationModel::new(
            |n_agt: usize| vec![3usize; n_agt],
        ))));
        let contact: PContact = net.clone();
        pop.add_contact(contact);

        let mut rng = ChaCha12Rng::seed_from_u64(11);
        pop.finalize(&mut rng).unwrap();

        let net = net.borrow();
        // Single agents may end up above 3 when a consumed stub is copied back.
        assert!(net.adjacency().n_edges() <= 20 * 3 / 2);
        assert_simple(net.adjacency());
        for agent in pop.agents() {
            let first: Vec<_> = net.contact(0.0, agent).iter().map(|nbr| nbr.id()).collect();
            let later: Vec<_> = net.contact(9.0, agent).iter().map(|nbr| nbr.id()).collect();
            assert_eq!(first, later);
            assert_eq!(first.len(), net.adjacency().neighbors(agent.id() - 1).len());
        }
    }
}
