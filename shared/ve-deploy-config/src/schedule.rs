//! Escrow weight lens step table.
//!
//! The lens maps a lock duration (in days) to a weight multiplier: a lock of at least
//! `duration_days` earns `multiplier`. Steps are stored as pairs so the thresholds and the
//! multipliers can never drift out of alignment.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiplierStep {
    pub duration_days: u32,
    pub multiplier: u32,
}

/// Non-empty step table, thresholds strictly descending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ParallelArrays", into = "ParallelArrays")]
pub struct MultiplierSchedule {
    steps: Vec<MultiplierStep>,
}

/// (duration days, multiplier) pairs, longest lock first.
const ESCROW_DEFAULT_STEPS: [(u32, u32); 4] = [(365, 2000), (180, 1500), (90, 1250), (45, 1000)];

/// Layout read by the deploy scripts.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParallelArrays {
    duration_days_thresholds: Vec<u32>,
    multipliers: Vec<u32>,
}

impl MultiplierSchedule {
    pub fn new(steps: Vec<MultiplierStep>) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::InvalidSchedule("no steps".into()));
        }
        for step in &steps {
            if step.duration_days == 0 {
                return Err(ConfigError::InvalidSchedule("zero duration threshold".into()));
            }
            if step.multiplier == 0 {
                return Err(ConfigError::InvalidSchedule(format!(
                    "zero multiplier at {} days",
                    step.duration_days
                )));
            }
        }
        if let Some(pair) = steps
            .windows(2)
            .find(|w| w[0].duration_days <= w[1].duration_days)
        {
            return Err(ConfigError::InvalidSchedule(format!(
                "thresholds must be strictly descending ({} then {})",
                pair[0].duration_days, pair[1].duration_days
            )));
        }
        Ok(Self { steps })
    }

    /// Table shipped with every network's defaults.
    pub fn escrow_default() -> Self {
        let steps = ESCROW_DEFAULT_STEPS
            .iter()
            .map(|&(duration_days, multiplier)| MultiplierStep {
                duration_days,
                multiplier,
            })
            .collect();
        Self { steps }
    }

    /// Build from the two parallel arrays used by the deploy scripts.
    pub fn from_parallel(thresholds: &[u32], multipliers: &[u32]) -> Result<Self, ConfigError> {
        if thresholds.len() != multipliers.len() {
            return Err(ConfigError::InvalidSchedule(format!(
                "{} thresholds but {} multipliers",
                thresholds.len(),
                multipliers.len()
            )));
        }
        let steps = thresholds
            .iter()
            .zip(multipliers)
            .map(|(&duration_days, &multiplier)| MultiplierStep {
                duration_days,
                multiplier,
            })
            .collect();
        Self::new(steps)
    }

    pub fn steps(&self) -> &[MultiplierStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Never true for a constructed schedule.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn duration_days_thresholds(&self) -> Vec<u32> {
        self.steps.iter().map(|s| s.duration_days).collect()
    }

    pub fn multipliers(&self) -> Vec<u32> {
        self.steps.iter().map(|s| s.multiplier).collect()
    }

    /// Multiplier for a lock of `days`, or `None` if it is shorter than the smallest threshold.
    pub fn multiplier_for(&self, days: u32) -> Option<u32> {
        self.steps
            .iter()
            .find(|s| s.duration_days <= days)
            .map(|s| s.multiplier)
    }
}

impl TryFrom<ParallelArrays> for MultiplierSchedule {
    type Error = ConfigError;

    fn try_from(raw: ParallelArrays) -> Result<Self, Self::Error> {
        Self::from_parallel(&raw.duration_days_thresholds, &raw.multipliers)
    }
}

impl From<MultiplierSchedule> for ParallelArrays {
    fn from(schedule: MultiplierSchedule) -> Self {
        Self {
            duration_days_thresholds: schedule.duration_days_thresholds(),
            multipliers: schedule.multipliers(),
        }
    }
}
