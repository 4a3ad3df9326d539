use crate::error::SimulationError;
use crate::flow::{CallFlowGraph, CallFlowStep, Traversal};
use crate::policy::{TerminalPolicy, TerminalRule};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::{debug, info};

mod report;

pub use report::{DropoffReport, StepResult, drop_rate_percent, round1};

/// Synthetic call volume every run starts with.
pub const DEFAULT_INITIAL_VOLUME: u32 = 1000;

/// A half-open range `[min, max)` of drop fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropRange {
    pub min: f64,
    pub max: f64,
}

impl DropRange {
    pub const PASSIVE: DropRange = DropRange {
        min: 0.02,
        max: 0.07,
    };
    pub const INTERACTIVE: DropRange = DropRange {
        min: 0.05,
        max: 0.25,
    };

    /// Draws a fraction from the range, kept within `[0, 1]`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let fraction = if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        };
        fraction.clamp(0.0, 1.0)
    }

    /// Draws a whole number of dropped calls out of `reached` whose rate
    /// stays within `[min, max]`. When no whole count fits, the count
    /// nearest to a sampled fraction is used.
    pub fn sample_count<R: Rng>(&self, reached: u32, rng: &mut R) -> u32 {
        let reached_f = f64::from(reached);
        let lowest = (reached_f * self.min.clamp(0.0, 1.0)).ceil() as u32;
        let highest = ((reached_f * self.max.clamp(0.0, 1.0)).floor() as u32).min(reached);
        if lowest <= highest {
            rng.random_range(lowest..=highest)
        } else {
            ((reached_f * self.sample(rng)).round() as u32).min(reached)
        }
    }
}

/// Settings for a [`DropoffSimulator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatorConfig {
    pub initial_volume: NonZeroU32,
    /// Drop range for steps that neither wait nor branch.
    pub passive_drop: DropRange,
    /// Drop range for steps that wait for a response or branch.
    pub interactive_drop: DropRange,
    pub terminal_rule: TerminalRule,
    /// Fixes the random stream for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_volume: NonZeroU32::new(DEFAULT_INITIAL_VOLUME).unwrap_or(NonZeroU32::MIN),
            passive_drop: DropRange::PASSIVE,
            interactive_drop: DropRange::INTERACTIVE,
            terminal_rule: TerminalRule::default(),
            seed: None,
        }
    }
}

/// Walks a call flow and synthesizes per-step funnel attrition.
///
/// The shape of a report is deterministic for a given graph; the volumes
/// are drawn from a random stream. Whatever the draws, every call is
/// accounted for: the last visited step absorbs all remaining volume.
pub struct DropoffSimulator {
    config: SimulatorConfig,
    policy: Box<dyn TerminalPolicy>,
}

impl Default for DropoffSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl DropoffSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let policy = config.terminal_rule.policy();
        Self { config, policy }
    }

    /// Replaces the configured terminal rule with a custom policy.
    pub fn with_policy(mut self, policy: Box<dyn TerminalPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulates with the configured seed, or with thread-local entropy.
    pub fn simulate(
        &self,
        graph: &CallFlowGraph,
        campaign_label: &str,
    ) -> Result<DropoffReport, SimulationError> {
        match self.config.seed {
            Some(seed) => {
                self.simulate_with_rng(graph, campaign_label, &mut StdRng::seed_from_u64(seed))
            }
            None => self.simulate_with_rng(graph, campaign_label, &mut rand::rng()),
        }
    }

    /// Simulates using the given random stream.
    ///
    /// # Errors
    ///
    /// * [`SimulationError::EmptyGraph`] if the graph has no steps.
    /// * [`SimulationError::DataIntegrity`] if the walk reaches a reference to
    ///   a missing step. No partial report is returned.
    pub fn simulate_with_rng<R: Rng>(
        &self,
        graph: &CallFlowGraph,
        campaign_label: &str,
        rng: &mut R,
    ) -> Result<DropoffReport, SimulationError> {
        if graph.is_empty() {
            return Err(SimulationError::EmptyGraph(graph.name().to_string()));
        }

        let initial_volume = self.config.initial_volume.get();
        let mut remaining = initial_volume;
        let mut step_results = Vec::new();

        let traversal = Traversal::with_policy(graph, graph.entry_key(), self.policy.as_ref());
        for visit in traversal {
            let visit = visit?;
            let reached = remaining;
            let dropped = if visit.is_final() {
                reached
            } else {
                self.draw_drop(visit.step, reached, rng)
            };
            remaining -= dropped;

            debug!(
                step = visit.key,
                reached,
                dropped,
                end = ?visit.end,
                "Simulated step"
            );
            step_results.push(StepResult::new(
                visit.key,
                visit.step.description.as_str(),
                reached,
                dropped,
            ));

            if remaining == 0 {
                break;
            }
        }

        info!(
            flow = graph.name(),
            campaign = campaign_label,
            steps = step_results.len(),
            "Drop-off simulation finished"
        );

        Ok(DropoffReport {
            campaign_label: campaign_label.to_string(),
            initial_volume,
            step_results,
        })
    }

    fn draw_drop<R: Rng>(&self, step: &CallFlowStep, reached: u32, rng: &mut R) -> u32 {
        let range = if step.is_interactive() {
            self.config.interactive_drop
        } else {
            self.config.passive_drop
        };
        range.sample_count(reached, rng)
    }
}

/// Simulates a graph with the default settings and thread-local entropy.
pub fn simulate(
    graph: &CallFlowGraph,
    campaign_label: &str,
) -> Result<DropoffReport, SimulationError> {
    DropoffSimulator::default().simulate(graph, campaign_label)
}
