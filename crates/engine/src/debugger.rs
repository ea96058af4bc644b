//! Epoch-by-epoch view of a demographic history, for checking models by eye.

use crate::demography::{DemographicEvent, DemographyState, PopulationConfiguration};
use crate::errors::{EngineError, Result};
use std::io::{self, Write};

/// Size and growth of one population over an epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationEpoch {
    pub start_size: f64,
    pub end_size: f64,
    pub growth_rate: f64,
}

/// A time interval in which no demographic event happens.
#[derive(Debug, Clone, PartialEq)]
pub struct Epoch {
    pub start_time: f64,
    /// Infinite for the last epoch
    pub end_time: f64,
    pub populations: Vec<PopulationEpoch>,
    pub migration_matrix: Vec<Vec<f64>>,
    /// Events that happened at `start_time`, opening this epoch
    pub events: Vec<DemographicEvent>,
}

/// Splits a demography into epochs between event times.
#[derive(Debug, Clone)]
pub struct DemographyDebugger {
    epochs: Vec<Epoch>,
}

impl DemographyDebugger {
    /// Compute the epochs of a demography.
    ///
    /// # Errors
    /// Returns an error if the configurations, matrix or events are invalid, or
    /// if the events are not sorted by time.
    pub fn new(
        configurations: &[PopulationConfiguration],
        migration_matrix: &[Vec<f64>],
        events: &[DemographicEvent],
    ) -> Result<Self> {
        let mut state = DemographyState::new(configurations, migration_matrix)?;
        for event in events {
            event.validate(state.num_populations())?;
        }
        if events.windows(2).any(|w| w[1].time() < w[0].time()) {
            return Err(EngineError::InvalidParameter(
                "demographic events must be sorted by time".into(),
            ));
        }

        let mut epochs = Vec::new();
        let mut start_time = 0.0;
        let mut next = 0;
        loop {
            let mut opening = Vec::new();
            while let Some(event) = events.get(next) {
                if event.time() > start_time {
                    break;
                }
                state.apply(event, start_time);
                opening.push(event.clone());
                next += 1;
            }
            let end_time = events.get(next).map_or(f64::INFINITY, DemographicEvent::time);
            let populations = state
                .populations
                .iter()
                .map(|p| PopulationEpoch {
                    start_size: p.size_at(start_time),
                    end_size: if p.growth_rate == 0.0 {
                        p.size_at(start_time)
                    } else {
                        p.size_at(end_time)
                    },
                    growth_rate: p.growth_rate,
                })
                .collect();
            epochs.push(Epoch {
                start_time,
                end_time,
                populations,
                migration_matrix: state.migration_matrix.clone(),
                events: opening,
            });
            if end_time.is_infinite() {
                break;
            }
            start_time = end_time;
        }
        Ok(Self { epochs })
    }

    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    pub fn num_epochs(&self) -> usize {
        self.epochs.len()
    }

    /// Size of `population` at time `t`.
    pub fn population_size_at(&self, population: usize, t: f64) -> Option<f64> {
        let epoch = self
            .epochs
            .iter()
            .find(|e| e.start_time <= t && t < e.end_time)?;
        let state = epoch.populations.get(population)?;
        if state.growth_rate == 0.0 {
            Some(state.start_size)
        } else {
            Some(state.start_size * (-state.growth_rate * (t - epoch.start_time)).exp())
        }
    }

    /// Write a table per epoch, each after the events that open it.
    pub fn print_history(&self, out: &mut impl Write) -> io::Result<()> {
        for (index, epoch) in self.epochs.iter().enumerate() {
            if index > 0 && !epoch.events.is_empty() {
                writeln!(out, "Events @ generation {}", epoch.start_time)?;
                for event in &epoch.events {
                    writeln!(out, "   - {}", event.describe())?;
                }
            }
            let rule = "=".repeat(40);
            writeln!(out, "{rule}")?;
            writeln!(
                out,
                "Epoch: {} -- {} generations",
                epoch.start_time, epoch.end_time
            )?;
            writeln!(out, "{rule}")?;

            let n = epoch.populations.len();
            write!(out, "     {:>10} {:>10} {:>12} |", "start", "end", "growth_rate")?;
            for k in 0..n {
                write!(out, " {k:>9}")?;
            }
            writeln!(out)?;
            write!(out, "   {}", "-".repeat(36))?;
            writeln!(out, " |{}", " ---------".repeat(n))?;
            for (j, population) in epoch.populations.iter().enumerate() {
                write!(
                    out,
                    "{j:>3} |{:>10.3e} {:>10.3e} {:>12.3e} |",
                    population.start_size, population.end_size, population.growth_rate
                )?;
                for rate in &epoch.migration_matrix[j] {
                    write!(out, " {rate:>9.3e}")?;
                }
                writeln!(out)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_epoch() -> DemographyDebugger {
        DemographyDebugger::new(
            &[PopulationConfiguration::new(544_200.0)],
            &[vec![0.0]],
            &[
                DemographicEvent::size_change(200_000.0, 0, 145_300.0),
                DemographicEvent::size_change(2_200_000.0, 0, 652_700.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_epochs() {
        let debugger = three_epoch();
        assert_eq!(debugger.num_epochs(), 3);
        let epochs = debugger.epochs();
        assert_eq!(epochs[0].start_time, 0.0);
        assert_eq!(epochs[0].end_time, 200_000.0);
        assert_eq!(epochs[1].populations[0].start_size, 145_300.0);
        assert!(epochs[2].end_time.is_infinite());
        assert_eq!(epochs[2].events.len(), 1);
        assert_eq!(debugger.population_size_at(0, 1e7), Some(652_700.0));
        assert_eq!(debugger.population_size_at(0, 100.0), Some(544_200.0));
    }

    #[test]
    fn test_growth_end_size() {
        let config = PopulationConfiguration::new(1000.0).with_growth_rate(0.01);
        let debugger = DemographyDebugger::new(
            &[config],
            &[vec![0.0]],
            &[DemographicEvent::PopulationParametersChange {
                time: 100.0,
                population: None,
                initial_size: None,
                growth_rate: Some(0.0),
            }],
        )
        .unwrap();
        let first = &debugger.epochs()[0].populations[0];
        assert!((first.end_size - 1000.0 * (-1.0f64).exp()).abs() < 1e-9);
        let second = &debugger.epochs()[1].populations[0];
        assert!((second.start_size - first.end_size).abs() < 1e-9);
        assert_eq!(second.end_size, second.start_size);
    }

    #[test]
    fn test_print_history() {
        let mut out = Vec::new();
        three_epoch().print_history(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Epoch: 0 -- 200000 generations"));
        assert!(text.contains("Events @ generation 200000"));
        assert!(text.contains("Population parameter change for population 0"));
        assert_eq!(text.matches("Epoch:").count(), 3);
        // Events are listed ahead of the epoch they start
        let events = text.find("Events @ generation 200000").unwrap();
        let epoch = text.find("Epoch: 200000 -- 2200000 generations").unwrap();
        assert!(events < epoch);
        assert!(text.find("Epoch: 0 -- 200000 generations").unwrap() < events);
    }

    #[test]
    fn test_rejects_unsorted_events() {
        let result = DemographyDebugger::new(
            &[PopulationConfiguration::new(10.0)],
            &[vec![0.0]],
            &[
                DemographicEvent::size_change(20.0, 0, 5.0),
                DemographicEvent::size_change(10.0, 0, 5.0),
            ],
        );
        assert!(result.is_err());
    }
}
