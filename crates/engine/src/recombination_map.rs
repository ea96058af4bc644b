//! Piecewise-constant recombination maps.
//!
//! A map covers `[0, sequence_length)` and assigns a per-base, per-generation
//! recombination rate to each interval between consecutive positions. Besides the
//! physical description it keeps the cumulative genetic position at every
//! breakpoint, which the simulator uses to place recombination breakpoints.

use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Conversion factor from cM/Mb (HapMap files) to events per bp per generation.
const CM_PER_MB_TO_PER_BP: f64 = 1e-8;

/// A recombination map with a constant rate on each interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MapIntervals")]
pub struct RecombinationMap {
    /// Interval boundaries, starting at 0 and ending at the sequence length
    positions: Vec<f64>,
    /// Rate on `[positions[i], positions[i + 1])`
    rates: Vec<f64>,
    /// Genetic position (Morgans) at each boundary
    #[serde(skip)]
    cumulative: Vec<f64>,
}

/// Serialized form of a map; derived state is rebuilt on load.
#[derive(Deserialize)]
struct MapIntervals {
    positions: Vec<f64>,
    rates: Vec<f64>,
}

impl TryFrom<MapIntervals> for RecombinationMap {
    type Error = EngineError;

    fn try_from(value: MapIntervals) -> Result<Self> {
        Self::new(value.positions, value.rates)
    }
}

impl RecombinationMap {
    /// Create a map from interval boundaries and per-interval rates.
    ///
    /// # Errors
    /// Returns an error if `positions` does not start at 0, is not strictly
    /// increasing, or if `rates.len() != positions.len() - 1`, or if any rate is
    /// negative or not finite.
    pub fn new(positions: Vec<f64>, rates: Vec<f64>) -> Result<Self> {
        if positions.len() < 2 {
            return Err(EngineError::InvalidParameter(
                "a recombination map needs at least two positions".into(),
            ));
        }
        if positions[0] != 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "recombination map must start at position 0, not {}",
                positions[0]
            )));
        }
        if positions.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(EngineError::InvalidParameter(
                "recombination map positions must be strictly increasing".into(),
            ));
        }
        if rates.len() != positions.len() - 1 {
            return Err(EngineError::InvalidParameter(format!(
                "expected {} interval rates for {} positions, got {}",
                positions.len() - 1,
                positions.len(),
                rates.len()
            )));
        }
        if let Some(rate) = rates.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(EngineError::InvalidParameter(format!(
                "recombination rates must be finite and non-negative, got {rate}"
            )));
        }

        let cumulative = Self::cumulative_positions(&positions, &rates);
        Ok(Self {
            positions,
            rates,
            cumulative,
        })
    }

    /// Create a map with a single rate over `[0, length)`.
    pub fn uniform(length: f64, rate: f64) -> Result<Self> {
        if !(length > 0.0) || !length.is_finite() {
            return Err(EngineError::InvalidParameter(format!(
                "sequence length must be positive, got {length}"
            )));
        }
        Self::new(vec![0.0, length], vec![rate])
    }

    /// Read a map in HapMap format.
    ///
    /// The first line is a header. Each following line holds whitespace-separated
    /// `chromosome position(bp) rate(cM/Mb) map(cM)` columns; only the position and
    /// rate columns are used. The rate on the last line is ignored because that line
    /// marks the end of the map. A first position other than 0 gets an implicit
    /// zero-rate interval in front of it.
    pub fn read_hapmap(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut positions = Vec::new();
        let mut rates = Vec::new();
        for (index, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parse_error = |message: String| EngineError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                message,
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(parse_error(format!(
                    "expected at least 3 columns, found {}",
                    fields.len()
                )));
            }
            let position: f64 = fields[1]
                .parse()
                .map_err(|e| parse_error(format!("bad position '{}': {e}", fields[1])))?;
            let rate: f64 = fields[2]
                .parse()
                .map_err(|e| parse_error(format!("bad rate '{}': {e}", fields[2])))?;
            positions.push(position);
            rates.push(rate * CM_PER_MB_TO_PER_BP);
        }

        if positions.is_empty() {
            return Err(EngineError::Parse {
                path: path.to_path_buf(),
                line: 1,
                message: "no map entries found".into(),
            });
        }
        if positions[0] != 0.0 {
            positions.insert(0, 0.0);
            rates.insert(0, 0.0);
        }
        // The last row only marks the end of the map.
        rates.pop();
        if positions.len() < 2 {
            return Err(EngineError::Parse {
                path: path.to_path_buf(),
                line: 2,
                message: "a map needs at least two positions".into(),
            });
        }

        Self::new(positions, rates)
    }

    fn cumulative_positions(positions: &[f64], rates: &[f64]) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(positions.len());
        let mut total = 0.0;
        cumulative.push(total);
        for (w, rate) in positions.windows(2).zip(rates) {
            total += (w[1] - w[0]) * rate;
            cumulative.push(total);
        }
        cumulative
    }

    /// Interval boundaries.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Per-interval rates.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Physical length covered by the map.
    pub fn sequence_length(&self) -> f64 {
        *self.positions.last().unwrap_or(&0.0)
    }

    /// Total genetic length of the map in Morgans.
    pub fn total_recombination_rate(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Length-weighted mean rate over the whole map.
    pub fn mean_recombination_rate(&self) -> f64 {
        let length = self.sequence_length();
        if length > 0.0 {
            self.total_recombination_rate() / length
        } else {
            0.0
        }
    }

    /// Genetic position (Morgans) of physical position `x`.
    pub fn genetic_position(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, self.sequence_length());
        let i = self.positions.partition_point(|&p| p <= x).saturating_sub(1);
        if i >= self.rates.len() {
            return self.cumulative[self.cumulative.len() - 1];
        }
        self.cumulative[i] + (x - self.positions[i]) * self.rates[i]
    }

    /// Physical position at genetic position `g`.
    ///
    /// Zero-rate intervals have no genetic extent, so the result always lies in an
    /// interval with a positive rate when `g` is strictly inside the map.
    pub fn physical_position(&self, g: f64) -> f64 {
        let total = self.total_recombination_rate();
        if g <= 0.0 {
            return 0.0;
        }
        if g >= total {
            return self.sequence_length();
        }
        let i = self.cumulative.partition_point(|&c| c <= g).saturating_sub(1);
        let i = i.min(self.rates.len() - 1);
        if self.rates[i] > 0.0 {
            let x = self.positions[i] + (g - self.cumulative[i]) / self.rates[i];
            x.min(self.positions[i + 1])
        } else {
            self.positions[i + 1]
        }
    }
}
