use super::definition::CallFlowStep;
use super::graph::CallFlowGraph;
use crate::error::SimulationError;
use crate::policy::{ExitKeyHeuristic, TerminalPolicy};
use ahash::AHashSet;

static DEFAULT_POLICY: ExitKeyHeuristic = ExitKeyHeuristic;

/// Referrer reported when the requested start step itself is missing.
pub const START_REFERRER: &str = "<start>";

/// Why a walk ended at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEnd {
    /// The step is the graph's default exit.
    DefaultExit,
    /// The terminal policy marked the step, or it has nowhere to go.
    Terminal,
    /// The step's continuation leads back to an already visited step.
    Cycle,
}

/// One step reached by a [`Traversal`].
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub key: &'a str,
    pub step: &'a CallFlowStep,
    pub end: Option<FlowEnd>,
}

impl Visit<'_> {
    pub fn is_final(&self) -> bool {
        self.end.is_some()
    }
}

/// A lazy walk along the synthetic "continue" path of a graph.
///
/// Every step is visited at most once, so the walk is always finite. A
/// continuation that names a missing step yields a single
/// [`SimulationError::DataIntegrity`] and then ends. Clone the traversal,
/// or ask the graph for a new one, to start over.
#[derive(Clone)]
pub struct Traversal<'a> {
    graph: &'a CallFlowGraph,
    policy: &'a dyn TerminalPolicy,
    cursor: Option<&'a str>,
    referrer: &'a str,
    visited: AHashSet<&'a str>,
}

impl<'a> Traversal<'a> {
    pub fn new(graph: &'a CallFlowGraph) -> Self {
        Self::with_policy(graph, graph.entry_key(), &DEFAULT_POLICY)
    }

    /// Walks from `start` using a custom terminal policy.
    pub fn with_policy(
        graph: &'a CallFlowGraph,
        start: Option<&'a str>,
        policy: &'a dyn TerminalPolicy,
    ) -> Self {
        Self {
            graph,
            policy,
            cursor: start,
            referrer: START_REFERRER,
            visited: AHashSet::new(),
        }
    }

    fn end_reason(&self, key: &str, step: &CallFlowStep) -> Option<FlowEnd> {
        if key == self.graph.default_exit_step_key() {
            return Some(FlowEnd::DefaultExit);
        }
        if self.policy.is_terminal(key, step, self.graph) {
            return Some(FlowEnd::Terminal);
        }
        match step.continuation() {
            None => Some(FlowEnd::Terminal),
            Some(next) if self.visited.contains(next) => Some(FlowEnd::Cycle),
            Some(_) => None,
        }
    }
}

impl<'a> Iterator for Traversal<'a> {
    type Item = Result<Visit<'a>, SimulationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor.take()?;
        let Some(step) = self.graph.step(key) else {
            return Some(Err(SimulationError::DataIntegrity {
                from_step: self.referrer.to_string(),
                missing_step: key.to_string(),
            }));
        };

        self.visited.insert(key);
        let end = self.end_reason(key, step);
        if end.is_none() {
            self.cursor = step.continuation();
            self.referrer = key;
        }
        Some(Ok(Visit { key, step, end }))
    }
}
