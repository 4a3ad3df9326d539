use serde::{Deserialize, Serialize};

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of `reached` calls that were `dropped`, as a one-decimal percentage.
/// Zero when nothing reached the step.
pub fn drop_rate_percent(dropped: u32, reached: u32) -> f64 {
    if reached == 0 {
        0.0
    } else {
        round1(f64::from(dropped) / f64::from(reached) * 100.0)
    }
}

/// Simulated attrition at one visited step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step_key: String,
    pub step_description: String,
    pub calls_reached: u32,
    pub calls_dropped: u32,
    pub drop_rate_percent: f64,
}

impl StepResult {
    /// Builds a result, deriving the drop rate. `dropped` is clamped to `reached`.
    pub fn new(
        step_key: impl Into<String>,
        step_description: impl Into<String>,
        calls_reached: u32,
        calls_dropped: u32,
    ) -> Self {
        let calls_dropped = calls_dropped.min(calls_reached);
        Self {
            step_key: step_key.into(),
            step_description: step_description.into(),
            calls_reached,
            calls_dropped,
            drop_rate_percent: drop_rate_percent(calls_dropped, calls_reached),
        }
    }

    pub fn calls_continued(&self) -> u32 {
        self.calls_reached - self.calls_dropped
    }
}

/// The funnel produced by one simulation run, in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropoffReport {
    pub campaign_label: String,
    pub initial_volume: u32,
    pub step_results: Vec<StepResult>,
}

impl DropoffReport {
    pub fn total_dropped(&self) -> u64 {
        self.step_results
            .iter()
            .map(|r| u64::from(r.calls_dropped))
            .sum()
    }

    /// Calls not yet accounted for. Zero for every completed simulation.
    pub fn remaining_volume(&self) -> u64 {
        u64::from(self.initial_volume).saturating_sub(self.total_dropped())
    }

    pub fn step(&self, key: &str) -> Option<&StepResult> {
        self.step_results.iter().find(|r| r.step_key == key)
    }

    pub fn len(&self) -> usize {
        self.step_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step_results.is_empty()
    }
}
