use crate::config::Config;
use crate::engine::NetworkRecord;
use crate::stats::{Accumulator, AccumulatorReport, Histogram, HistogramReport};
use anyhow::{Context, Result};
use rmp_serde::encode;
use serde::{Deserialize, Serialize};
use serde_value::{Value, to_value};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Observable computed over realized networks.
pub trait Obs {
    fn name(&self) -> &'static str;
    fn update(&mut self, record: &NetworkRecord) -> Result<()>;
    fn report(&self) -> Result<Value>;
}

/// Realized degree statistics and histogram.
pub struct Degree {
    hist_bins: usize,
    acc: Accumulator,
    hist: Option<Histogram>,
}

impl Degree {
    pub fn new(cfg: &Config) -> Self {
        Self {
            hist_bins: cfg.output.hist_bins,
            acc: Accumulator::new(),
            hist: None,
        }
    }
}

impl Obs for Degree {
    fn name(&self) -> &'static str {
        "degree"
    }

    fn update(&mut self, record: &NetworkRecord) -> Result<()> {
        let degrees = record.degrees();
        let max_degree = degrees.iter().copied().max().unwrap_or(0);
        let hist = self
            .hist
            .get_or_insert_with(|| Histogram::new(self.hist_bins, max_degree));
        for &degree in &degrees {
            self.acc.add(degree as f64);
            hist.add(degree);
        }
        Ok(())
    }

    fn report(&self) -> Result<Value> {
        let report = DegreeReport {
            stats: self.acc.report(),
            hist: self.hist.as_ref().map(Histogram::report),
        };
        to_value(report).context("failed to convert degree report")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DegreeReport {
    pub stats: AccumulatorReport,
    pub hist: Option<HistogramReport>,
}

/// Stubs requested but not realized as edges, per agent.
///
/// Counts unmatched stubs as well as dropped self-loops and duplicate edges.
pub struct Deficit {
    acc: Accumulator,
}

impl Deficit {
    pub fn new() -> Self {
        Self {
            acc: Accumulator::new(),
        }
    }
}

impl Obs for Deficit {
    fn name(&self) -> &'static str {
        "deficit"
    }

    fn update(&mut self, record: &NetworkRecord) -> Result<()> {
        for (&realized, &requested) in record.degrees().iter().zip(&record.requested) {
            self.acc.add(requested as f64 - realized as f64);
        }
        Ok(())
    }

    fn report(&self) -> Result<Value> {
        to_value(self.acc.report()).context("failed to convert deficit report")
    }
}

/// Network size summary.
pub struct Size {
    n_agents: usize,
    n_edges: usize,
    n_isolated: usize,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeReport {
    pub n_agents: usize,
    pub n_edges: usize,
    pub n_isolated: usize,
}

impl Size {
    pub fn new() -> Self {
        Self {
            n_agents: 0,
            n_edges: 0,
            n_isolated: 0,
        }
    }
}

impl Obs for Size {
    fn name(&self) -> &'static str {
        "size"
    }

    fn update(&mut self, record: &NetworkRecord) -> Result<()> {
        self.n_agents += record.n_agents;
        self.n_edges += record.edges.len();
        self.n_isolated += record.degrees().iter().filter(|&&k| k == 0).count();
        Ok(())
    }

    fn report(&self) -> Result<Value> {
        let report = SizeReport {
            n_agents: self.n_agents,
            n_edges: self.n_edges,
            n_isolated: self.n_isolated,
        };
        to_value(report).context("failed to convert size report")
    }
}

/// Runs every observable over the networks of a run and saves the results.
pub struct Analyzer {
    obs_vec: Vec<Box<dyn Obs>>,
}

impl Analyzer {
    pub fn new(cfg: &Config) -> Self {
        let obs_vec: Vec<Box<dyn Obs>> = vec![
            Box::new(Size::new()),
            Box::new(Degree::new(cfg)),
            Box::new(Deficit::new()),
        ];
        Self { obs_vec }
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let record = NetworkRecord::load(file).context("failed to load network")?;
        self.add_record(&record)
    }

    pub fn add_record(&mut self, record: &NetworkRecord) -> Result<()> {
        for obs in &mut self.obs_vec {
            obs.update(record)
                .with_context(|| format!("failed to update {}", obs.name()))?;
        }
        Ok(())
    }

    pub fn results(&self) -> Result<BTreeMap<&'static str, Value>> {
        let mut results = BTreeMap::new();
        for obs in &self.obs_vec {
            let report = obs
                .report()
                .with_context(|| format!("failed to report {}", obs.name()))?;
            results.insert(obs.name(), report);
        }
        Ok(results)
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let results = self.results()?;

        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);
        encode::write_named(&mut writer, &results).context("failed to serialize results")?;
        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }
}
