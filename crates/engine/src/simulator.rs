//! Coalescent simulation with recombination, migration and population size changes.
//!
//! The simulator follows lineages backwards in time. Each lineage carries the
//! segments of the sequence on which it is ancestral to at least one sample.
//! Waiting times to the next recombination, migration and per-population
//! coalescence are drawn from their current rates; demographic events and
//! ancient samples interrupt this process at fixed times.

use crate::demography::{
    validate_migration_matrix, DemographicEvent, DemographyState, PopulationConfiguration,
    PopulationState, Sample,
};
use crate::errors::{EngineError, Result};
use crate::overlap::OverlapCounter;
use crate::provenance::{environment, ProvenanceRecord, ENGINE_NAME, ENGINE_VERSION};
use crate::recombination_map::RecombinationMap;
use crate::tree_sequence::{Edge, Mutation, Node, PopulationRecord, Site, TreeSequence};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, Poisson};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde_json::json;

/// Growth rates smaller than this are treated as zero.
const GROWTH_RATE_EPSILON: f64 = 1e-12;

/// Builder and entry point for a coalescent simulation.
///
/// # Examples
///
/// ```
/// use popcat_engine::prelude::*;
///
/// let ts = Simulator::new()
///     .population_configurations(vec![PopulationConfiguration::new(1000.0)])
///     .samples(vec![Sample::new(0, 0.0); 4])
///     .recombination_map(RecombinationMap::uniform(1000.0, 1e-8).unwrap())
///     .mutation_rate(1e-8)
///     .seed(7)
///     .run()
///     .unwrap();
/// assert_eq!(ts.num_samples(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    population_configurations: Vec<PopulationConfiguration>,
    migration_matrix: Option<Vec<Vec<f64>>>,
    demographic_events: Vec<DemographicEvent>,
    samples: Vec<Sample>,
    recombination_map: Option<RecombinationMap>,
    mutation_rate: f64,
    seed: Option<u64>,
}

impl Simulator {
    /// Create a simulator with no populations, no samples and no mutation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the populations present at time zero (required).
    pub fn population_configurations(mut self, configurations: Vec<PopulationConfiguration>) -> Self {
        self.population_configurations = configurations;
        self
    }

    /// Set the migration matrix. Defaults to no migration.
    pub fn migration_matrix(mut self, matrix: Vec<Vec<f64>>) -> Self {
        self.migration_matrix = Some(matrix);
        self
    }

    /// Set the demographic events, sorted by time.
    pub fn demographic_events(mut self, events: Vec<DemographicEvent>) -> Self {
        self.demographic_events = events;
        self
    }

    /// Set the samples. When empty, the `sample_size` of each population
    /// configuration is used instead.
    pub fn samples(mut self, samples: Vec<Sample>) -> Self {
        self.samples = samples;
        self
    }

    /// Set the recombination map, which also fixes the sequence length (required).
    pub fn recombination_map(mut self, map: RecombinationMap) -> Self {
        self.recombination_map = Some(map);
        self
    }

    /// Set the per-base, per-generation mutation rate.
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Set the random seed. A random seed is drawn when unset.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set or clear the random seed.
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Samples requested either explicitly or through the configurations.
    fn resolve_samples(&self) -> Result<Vec<Sample>> {
        let legacy = self
            .population_configurations
            .iter()
            .any(|c| c.sample_size.is_some());
        if !self.samples.is_empty() {
            if legacy {
                return Err(EngineError::InvalidParameter(
                    "cannot combine explicit samples with population sample sizes".into(),
                ));
            }
            return Ok(self.samples.clone());
        }
        Ok(self
            .population_configurations
            .iter()
            .enumerate()
            .flat_map(|(population, config)| {
                std::iter::repeat_n(Sample::new(population, 0.0), config.sample_size.unwrap_or(0))
            })
            .collect())
    }

    fn validate(&self, samples: &[Sample], num_populations: usize) -> Result<()> {
        if samples.len() < 2 {
            return Err(EngineError::InvalidParameter(format!(
                "at least two samples are required, got {}",
                samples.len()
            )));
        }
        for sample in samples {
            if sample.population >= num_populations {
                return Err(EngineError::InvalidParameter(format!(
                    "sample population {} out of bounds for {num_populations} populations",
                    sample.population
                )));
            }
            if !sample.time.is_finite() || sample.time < 0.0 {
                return Err(EngineError::InvalidParameter(format!(
                    "sample time must be finite and non-negative, got {}",
                    sample.time
                )));
            }
        }
        for event in &self.demographic_events {
            event.validate(num_populations)?;
        }
        if self
            .demographic_events
            .windows(2)
            .any(|w| w[1].time() < w[0].time())
        {
            return Err(EngineError::InvalidParameter(
                "demographic events must be sorted by time".into(),
            ));
        }
        if !self.mutation_rate.is_finite() || self.mutation_rate < 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "mutation rate must be non-negative, got {}",
                self.mutation_rate
            )));
        }
        Ok(())
    }

    /// Run the simulation.
    ///
    /// # Errors
    /// Returns an error for invalid inputs, or [`EngineError::InfiniteWaitingTime`]
    /// when the remaining lineages can never find a common ancestor (for example,
    /// isolated populations without migration or merging events).
    pub fn run(&self) -> Result<TreeSequence> {
        let map = self.recombination_map.as_ref().ok_or_else(|| {
            EngineError::InvalidParameter("a recombination map is required".into())
        })?;
        let num_populations = self.population_configurations.len();
        let matrix = self
            .migration_matrix
            .clone()
            .unwrap_or_else(|| vec![vec![0.0; num_populations]; num_populations]);
        validate_migration_matrix(&matrix, num_populations)?;
        let state = DemographyState::new(&self.population_configurations, &matrix)?;
        let samples = self.resolve_samples()?;
        self.validate(&samples, num_populations)?;

        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        info!(
            "Simulating {} samples over {} bp in {} populations (seed {})",
            samples.len(),
            map.sequence_length(),
            num_populations,
            seed
        );

        let mut coalescent = Coalescent::new(state, &self.demographic_events, &samples, map);
        coalescent.run(&mut rng)?;
        let (nodes, edges) = coalescent.finish();
        let (sites, mutations) =
            throw_mutations(&nodes, &edges, self.mutation_rate, &mut rng)?;
        info!(
            "Simulation finished: {} nodes, {} edges, {} mutations",
            nodes.len(),
            edges.len(),
            mutations.len()
        );

        let populations = self
            .population_configurations
            .iter()
            .map(|c| PopulationRecord {
                metadata: c.metadata.clone(),
            })
            .collect();
        let mut ts = TreeSequence {
            sequence_length: map.sequence_length(),
            nodes,
            edges,
            sites,
            mutations,
            populations,
            provenances: Vec::new(),
        };
        ts.add_provenance(self.provenance(seed, samples.len(), map)?)?;
        Ok(ts)
    }

    fn provenance(
        &self,
        seed: u64,
        num_samples: usize,
        map: &RecombinationMap,
    ) -> Result<serde_json::Value> {
        ProvenanceRecord::new(ENGINE_NAME, ENGINE_VERSION)
            .parameters(json!({
                "command": "simulate",
                "random_seed": seed,
                "num_samples": num_samples,
                "sequence_length": map.sequence_length(),
                "mean_recombination_rate": map.mean_recombination_rate(),
                "mutation_rate": self.mutation_rate,
                "population_configurations": self.population_configurations,
                "migration_matrix": self.migration_matrix,
                "demographic_events": self.demographic_events,
            }))
            .environment(environment(json!({})))
            .to_value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    left: f64,
    right: f64,
    node: usize,
}

/// Ancestral material of one lineage, as disjoint segments sorted by position.
#[derive(Debug, Clone)]
struct Lineage {
    population: usize,
    segments: Vec<Segment>,
}

impl Lineage {
    fn left(&self) -> f64 {
        self.segments[0].left
    }

    fn right(&self) -> f64 {
        self.segments[self.segments.len() - 1].right
    }

    /// Ancestor of `self` at `x`, if any.
    fn node_at(&self, x: f64) -> Option<usize> {
        self.segments
            .iter()
            .find(|s| s.left <= x && x < s.right)
            .map(|s| s.node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transition {
    Recombination,
    Migration,
    Coalescence(usize),
}

struct Coalescent<'a> {
    state: DemographyState,
    events: &'a [DemographicEvent],
    next_event: usize,
    /// Ancient samples by time, with their node ids
    pending: Vec<(usize, Sample)>,
    next_pending: usize,
    map: &'a RecombinationMap,
    lineages: Vec<Lineage>,
    overlap: OverlapCounter,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    time: f64,
}

impl<'a> Coalescent<'a> {
    fn new(
        state: DemographyState,
        events: &'a [DemographicEvent],
        samples: &[Sample],
        map: &'a RecombinationMap,
    ) -> Self {
        let length = map.sequence_length();
        let nodes = samples
            .iter()
            .map(|s| Node {
                time: s.time,
                population: s.population,
                is_sample: true,
            })
            .collect();
        let mut pending: Vec<(usize, Sample)> = samples.iter().copied().enumerate().collect();
        pending.sort_by(|a, b| a.1.time.total_cmp(&b.1.time));

        let mut coalescent = Self {
            state,
            events,
            next_event: 0,
            pending,
            next_pending: 0,
            map,
            lineages: Vec::new(),
            overlap: OverlapCounter::new(length, samples.len()),
            nodes,
            edges: Vec::new(),
            time: 0.0,
        };
        coalescent.introduce_samples();
        coalescent
    }

    /// Add a lineage for every pending sample taken at or before the current time.
    fn introduce_samples(&mut self) {
        let length = self.map.sequence_length();
        while let Some(&(node, sample)) = self.pending.get(self.next_pending) {
            if sample.time > self.time {
                break;
            }
            self.lineages.push(Lineage {
                population: sample.population,
                segments: vec![Segment {
                    left: 0.0,
                    right: length,
                    node,
                }],
            });
            self.next_pending += 1;
        }
    }

    /// Time of the next demographic event or ancient sample.
    fn next_fixed_time(&self) -> Option<f64> {
        let event = self.events.get(self.next_event).map(DemographicEvent::time);
        let sample = self.pending.get(self.next_pending).map(|(_, s)| s.time);
        match (event, sample) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        while !self.lineages.is_empty() || self.next_pending < self.pending.len() {
            let (wait, transition) = self.next_transition(rng);
            if let Some(fixed) = self.next_fixed_time() {
                if self.time + wait >= fixed {
                    self.time = fixed;
                    self.introduce_samples();
                    self.apply_events(rng);
                    continue;
                }
            }
            let Some(transition) = transition.filter(|_| wait.is_finite()) else {
                return Err(EngineError::InfiniteWaitingTime {
                    time: self.time,
                    lineages: self.lineages.len(),
                });
            };
            self.time += wait;
            match transition {
                Transition::Recombination => self.recombine(rng),
                Transition::Migration => self.migrate(rng),
                Transition::Coalescence(population) => self.coalesce(population, rng),
            }
        }
        debug!("All lineages coalesced at generation {:.3}", self.time);
        Ok(())
    }

    /// Apply every demographic event scheduled at or before the current time.
    fn apply_events<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while let Some(event) = self.events.get(self.next_event) {
            if event.time() > self.time {
                break;
            }
            debug!("Generation {:.3}: {}", self.time, event.describe());
            if let DemographicEvent::MassMigration {
                source,
                dest,
                proportion,
                ..
            } = event
            {
                for lineage in self.lineages.iter_mut() {
                    if lineage.population == *source && rng.random::<f64>() < *proportion {
                        lineage.population = *dest;
                    }
                }
            }
            self.state.apply(event, self.time);
            self.next_event += 1;
        }
    }

    fn recombination_mass(&self, lineage: &Lineage) -> f64 {
        self.map.genetic_position(lineage.right()) - self.map.genetic_position(lineage.left())
    }

    fn lineages_in(&self, population: usize) -> usize {
        self.lineages
            .iter()
            .filter(|l| l.population == population)
            .count()
    }

    /// Draw the waiting time to the next random transition.
    fn next_transition<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, Option<Transition>) {
        let mut best = (f64::INFINITY, None);
        let mut consider = |wait: f64, transition: Transition| {
            if wait < best.0 {
                best = (wait, Some(transition));
            }
        };

        let recombination: f64 = self
            .lineages
            .iter()
            .map(|l| self.recombination_mass(l))
            .sum();
        if recombination > 0.0 {
            let e: f64 = Exp1.sample(rng);
            consider(e / recombination, Transition::Recombination);
        }

        let migration: f64 = (0..self.state.num_populations())
            .map(|j| self.lineages_in(j) as f64 * self.state.emigration_rate(j))
            .sum();
        if migration > 0.0 {
            let e: f64 = Exp1.sample(rng);
            consider(e / migration, Transition::Migration);
        }

        for (j, population) in self.state.populations.iter().enumerate() {
            let k = self.lineages_in(j) as f64;
            if k >= 2.0 {
                let pairs = k * (k - 1.0) / 2.0;
                let e: f64 = Exp1.sample(rng);
                consider(
                    coalescence_wait(population, pairs, self.time, e),
                    Transition::Coalescence(j),
                );
            }
        }
        best
    }

    fn recombine<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let masses: Vec<f64> = self
            .lineages
            .iter()
            .map(|l| self.recombination_mass(l))
            .collect();
        let index = choose_weighted(&masses, rng);
        let lineage = &self.lineages[index];
        let low = self.map.genetic_position(lineage.left());
        let high = self.map.genetic_position(lineage.right());
        let x = self
            .map
            .physical_position(low + rng.random::<f64>() * (high - low));
        if x <= lineage.left() || x >= lineage.right() {
            return;
        }

        let mut left = Vec::new();
        let mut right = Vec::new();
        for segment in &lineage.segments {
            if segment.right <= x {
                left.push(*segment);
            } else if segment.left >= x {
                right.push(*segment);
            } else {
                left.push(Segment {
                    right: x,
                    ..*segment
                });
                right.push(Segment {
                    left: x,
                    ..*segment
                });
            }
        }
        let population = lineage.population;
        self.lineages[index].segments = left;
        self.lineages.push(Lineage {
            population,
            segments: right,
        });
    }

    fn migrate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.state.num_populations();
        let weights: Vec<f64> = (0..n)
            .map(|j| self.lineages_in(j) as f64 * self.state.emigration_rate(j))
            .collect();
        let source = choose_weighted(&weights, rng);
        let dest_weights: Vec<f64> = (0..n)
            .map(|k| {
                if k == source {
                    0.0
                } else {
                    self.state.migration_matrix[source][k]
                }
            })
            .collect();
        let dest = choose_weighted(&dest_weights, rng);
        let candidates: Vec<usize> = self.lineage_indexes(source);
        let chosen = candidates[rng.random_range(0..candidates.len())];
        self.lineages[chosen].population = dest;
    }

    fn lineage_indexes(&self, population: usize) -> Vec<usize> {
        self.lineages
            .iter()
            .enumerate()
            .filter(|(_, l)| l.population == population)
            .map(|(i, _)| i)
            .collect()
    }

    /// Merge two random lineages of `population`.
    fn coalesce<R: Rng + ?Sized>(&mut self, population: usize, rng: &mut R) {
        let candidates = self.lineage_indexes(population);
        let first = rng.random_range(0..candidates.len());
        let mut second = rng.random_range(0..candidates.len() - 1);
        if second >= first {
            second += 1;
        }
        let (i, j) = (
            candidates[first].max(candidates[second]),
            candidates[first].min(candidates[second]),
        );
        // Remove the higher index first so the lower one stays valid
        let a = self.lineages.swap_remove(i);
        let b = self.lineages.swap_remove(j);

        let mut points: Vec<f64> = a
            .segments
            .iter()
            .chain(&b.segments)
            .flat_map(|s| [s.left, s.right])
            .collect();
        points.sort_by(f64::total_cmp);
        points.dedup();

        let mut parent: Option<usize> = None;
        let mut merged: Vec<Segment> = Vec::new();
        for w in points.windows(2) {
            let (left, right) = (w[0], w[1]);
            match (a.node_at(left), b.node_at(left)) {
                (Some(node), None) | (None, Some(node)) => {
                    push_segment(&mut merged, Segment { left, right, node });
                }
                (Some(x), Some(y)) => {
                    let u = *parent.get_or_insert_with(|| {
                        self.nodes.push(Node {
                            time: self.time,
                            population,
                            is_sample: false,
                        });
                        self.nodes.len() - 1
                    });
                    for child in [x, y] {
                        self.edges.push(Edge {
                            left,
                            right,
                            parent: u,
                            child,
                        });
                    }
                    for (l, r, count) in self.overlap.decrement(left, right) {
                        if count > 1 {
                            push_segment(
                                &mut merged,
                                Segment {
                                    left: l,
                                    right: r,
                                    node: u,
                                },
                            );
                        }
                    }
                }
                (None, None) => {}
            }
        }

        if !merged.is_empty() {
            self.lineages.push(Lineage {
                population,
                segments: merged,
            });
        }
    }

    /// Node and edge tables, with edges sorted and adjacent intervals merged.
    fn finish(self) -> (Vec<Node>, Vec<Edge>) {
        let nodes = self.nodes;
        let mut edges = self.edges;
        edges.sort_by(|a, b| {
            nodes[a.parent]
                .time
                .total_cmp(&nodes[b.parent].time)
                .then(a.parent.cmp(&b.parent))
                .then(a.child.cmp(&b.child))
                .then(a.left.total_cmp(&b.left))
        });
        let mut squashed: Vec<Edge> = Vec::with_capacity(edges.len());
        for edge in edges {
            match squashed.last_mut() {
                Some(last)
                    if last.parent == edge.parent
                        && last.child == edge.child
                        && last.right == edge.left =>
                {
                    last.right = edge.right;
                }
                _ => squashed.push(edge),
            }
        }
        debug_assert!(self.overlap.is_complete() || squashed.is_empty());
        (nodes, squashed)
    }
}

/// Append `segment`, extending the previous one when they abut with the same node.
fn push_segment(segments: &mut Vec<Segment>, segment: Segment) {
    if let Some(last) = segments.last_mut() {
        if last.node == segment.node && last.right == segment.left {
            last.right = segment.right;
            return;
        }
    }
    segments.push(segment);
}

/// Waiting time until the next coalescence among `pairs` pairs of lineages,
/// given a unit exponential draw `e`.
///
/// The pairwise rate is `1 / (2 N(t))` with `N(t) = N0 exp(-alpha (t - t0))`.
/// A shrinking population (negative growth, backwards in time) may never reach
/// the required cumulative rate, in which case the wait is infinite.
fn coalescence_wait(population: &PopulationState, pairs: f64, now: f64, e: f64) -> f64 {
    let size = population.size_at(now);
    let alpha = population.growth_rate;
    if alpha.abs() < GROWTH_RATE_EPSILON {
        return e * 2.0 * size / pairs;
    }
    let arg = 1.0 + e * 2.0 * size * alpha / pairs;
    if arg <= 0.0 {
        f64::INFINITY
    } else {
        arg.ln() / alpha
    }
}

/// Index drawn with probability proportional to `weights`.
fn choose_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    let r = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if r < cumulative {
            return i;
        }
    }
    // Rounding: fall back to the last positive weight
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}

/// Place infinite-sites mutations on every edge.
fn throw_mutations<R: Rng + ?Sized>(
    nodes: &[Node],
    edges: &[Edge],
    rate: f64,
    rng: &mut R,
) -> Result<(Vec<Site>, Vec<Mutation>)> {
    let mut placed: Vec<(f64, usize)> = Vec::new();
    if rate > 0.0 {
        for edge in edges {
            let branch = nodes[edge.parent].time - nodes[edge.child].time;
            let expected = rate * (edge.right - edge.left) * branch;
            if expected <= 0.0 {
                continue;
            }
            let count = Poisson::new(expected)
                .map_err(|e| EngineError::Distribution(e.to_string()))?
                .sample(rng) as usize;
            for _ in 0..count {
                let position = edge.left + rng.random::<f64>() * (edge.right - edge.left);
                placed.push((position, edge.child));
            }
        }
    }
    placed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let sites = placed
        .iter()
        .map(|(position, _)| Site {
            position: *position,
            ancestral_state: "0".to_string(),
        })
        .collect();
    let mutations = placed
        .iter()
        .enumerate()
        .map(|(site, (_, node))| Mutation {
            site,
            node: *node,
            derived_state: "1".to_string(),
        })
        .collect();
    Ok((sites, mutations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn single_population(n: usize, length: f64, recombination_rate: f64) -> Simulator {
        Simulator::new()
            .population_configurations(vec![PopulationConfiguration::new(1000.0)])
            .samples(vec![Sample::new(0, 0.0); n])
            .recombination_map(RecombinationMap::uniform(length, recombination_rate).unwrap())
    }

    #[test]
    fn test_basic_simulation() {
        let ts = single_population(5, 1000.0, 0.0).seed(1).run().unwrap();
        assert_eq!(ts.num_samples(), 5);
        assert_eq!(ts.sequence_length(), 1000.0);
        // Without recombination there is one tree with n - 1 internal nodes
        assert_eq!(ts.num_trees(), 1);
        assert_eq!(ts.num_nodes(), 9);
        assert_eq!(ts.num_edges(), 8);
        assert_eq!(ts.provenances().len(), 1);
        assert_eq!(ts.provenances()[0].record["parameters"]["random_seed"], 1);
    }

    #[test]
    fn test_seed_reproducibility() {
        let sim = single_population(6, 1e5, 1e-7).mutation_rate(1e-7).seed(42);
        let a = sim.run().unwrap();
        let b = sim.run().unwrap();
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.edges, b.edges);
        assert_eq!(a.sites, b.sites);
    }

    #[test]
    fn test_recombination_creates_trees() {
        let ts = single_population(10, 1e6, 1e-7).seed(3).run().unwrap();
        assert!(ts.num_trees() > 1);
        for edge in &ts.edges {
            assert!(edge.left < edge.right);
            assert!(ts.nodes[edge.parent].time > ts.nodes[edge.child].time);
        }
    }

    #[test]
    fn test_mutations_sorted_on_sites() {
        let ts = single_population(8, 1e4, 0.0)
            .mutation_rate(1e-8)
            .seed(11)
            .run()
            .unwrap();
        assert!(ts.num_sites() > 0);
        assert_eq!(ts.num_sites(), ts.num_mutations());
        assert!(ts.sites.windows(2).all(|w| w[0].position <= w[1].position));
        assert!(ts.sites.iter().all(|s| s.position >= 0.0 && s.position < 1e4));
    }

    #[test]
    fn test_requires_two_samples() {
        let err = single_population(1, 100.0, 0.0).run().unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
    }

    #[test]
    fn test_legacy_sample_sizes() {
        let mut config = PopulationConfiguration::new(100.0);
        config.sample_size = Some(3);
        let ts = Simulator::new()
            .population_configurations(vec![config])
            .recombination_map(RecombinationMap::uniform(10.0, 0.0).unwrap())
            .seed(5)
            .run()
            .unwrap();
        assert_eq!(ts.num_samples(), 3);
    }

    #[test]
    fn test_isolated_populations_never_coalesce() {
        let sim = Simulator::new()
            .population_configurations(vec![
                PopulationConfiguration::new(100.0),
                PopulationConfiguration::new(100.0),
            ])
            .samples(vec![Sample::new(0, 0.0), Sample::new(1, 0.0)])
            .recombination_map(RecombinationMap::uniform(10.0, 0.0).unwrap())
            .seed(2);
        let err = sim.clone().run().unwrap_err();
        assert!(matches!(err, EngineError::InfiniteWaitingTime { .. }));

        let ts = sim
            .demographic_events(vec![DemographicEvent::split(500.0, 1, 0)])
            .run()
            .unwrap();
        assert!(ts.max_root_time() >= 500.0);
    }

    #[test]
    fn test_unsorted_events_rejected() {
        let err = single_population(2, 10.0, 0.0)
            .demographic_events(vec![
                DemographicEvent::size_change(10.0, 0, 50.0),
                DemographicEvent::size_change(5.0, 0, 50.0),
            ])
            .run()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
    }

    #[test]
    fn test_ancient_samples() {
        let ts = Simulator::new()
            .population_configurations(vec![PopulationConfiguration::new(100.0)])
            .samples(vec![
                Sample::new(0, 0.0),
                Sample::new(0, 0.0),
                Sample::new(0, 250.0),
            ])
            .recombination_map(RecombinationMap::uniform(10.0, 0.0).unwrap())
            .seed(9)
            .run()
            .unwrap();
        assert_eq!(ts.num_samples(), 3);
        assert_eq!(ts.nodes[2].time, 250.0);
        assert!(ts.max_root_time() > 250.0);
    }

    #[test]
    fn test_migration_joins_populations() {
        let ts = Simulator::new()
            .population_configurations(vec![
                PopulationConfiguration::new(100.0),
                PopulationConfiguration::new(100.0),
            ])
            .migration_matrix(vec![vec![0.0, 0.01], vec![0.01, 0.0]])
            .samples(vec![Sample::new(0, 0.0), Sample::new(1, 0.0)])
            .recombination_map(RecombinationMap::uniform(10.0, 0.0).unwrap())
            .seed(4)
            .run()
            .unwrap();
        assert_eq!(ts.num_nodes(), 3);
    }

    #[test]
    fn test_coalescence_wait_with_growth() {
        let constant = PopulationState {
            start_size: 100.0,
            growth_rate: 0.0,
            start_time: 0.0,
        };
        assert_eq!(coalescence_wait(&constant, 1.0, 0.0, 1.0), 200.0);
        let shrinking = PopulationState {
            growth_rate: -0.1,
            ..constant
        };
        assert!(coalescence_wait(&shrinking, 1.0, 0.0, 1.0).is_infinite());
        let growing = PopulationState {
            growth_rate: 0.01,
            ..constant
        };
        assert!(coalescence_wait(&growing, 1.0, 0.0, 1.0) < 200.0);
    }

    #[test]
    fn test_choose_weighted_skips_zero_weights() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        for _ in 0..100 {
            let i = choose_weighted(&[0.0, 1.0, 0.0, 2.0], &mut rng);
            assert!(i == 1 || i == 3);
        }
    }
}
