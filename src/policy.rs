//! Rules deciding which steps end a simulated call.
//!
//! A terminal step absorbs every call that reaches it. The default rule is
//! [`is_terminal_step`]; alternatives implement [`TerminalPolicy`] and are
//! handed to the simulator without touching its walk.

use crate::flow::{CallFlowGraph, CallFlowStep};
use serde::{Deserialize, Serialize};

/// Decides whether a visited step ends the flow.
pub trait TerminalPolicy: Send + Sync {
    fn is_terminal(&self, key: &str, step: &CallFlowStep, graph: &CallFlowGraph) -> bool;
}

/// The default terminal rule.
///
/// A step is terminal when its key contains `"exit"` (ignoring ASCII case),
/// when it has no outgoing edge, or when it is the graph's default exit.
///
/// The substring test also fires for keys such as `"exit_survey_intro"`
/// that still lead somewhere; use [`StructuralTerminal`] to opt out of it.
pub fn is_terminal_step(key: &str, step: &CallFlowStep, graph: &CallFlowGraph) -> bool {
    key.to_ascii_lowercase().contains("exit") || StructuralTerminal.is_terminal(key, step, graph)
}

/// [`is_terminal_step`] as a policy object.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitKeyHeuristic;

impl TerminalPolicy for ExitKeyHeuristic {
    fn is_terminal(&self, key: &str, step: &CallFlowStep, graph: &CallFlowGraph) -> bool {
        is_terminal_step(key, step, graph)
    }
}

/// Only the graph's shape counts: no outgoing edge, or the default exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralTerminal;

impl TerminalPolicy for StructuralTerminal {
    fn is_terminal(&self, key: &str, step: &CallFlowStep, graph: &CallFlowGraph) -> bool {
        !step.has_outgoing_edges() || key == graph.default_exit_step_key()
    }
}

/// Configurable choice between the built-in policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalRule {
    #[default]
    ExitKeyHeuristic,
    Structural,
}

impl TerminalRule {
    pub fn policy(self) -> Box<dyn TerminalPolicy> {
        match self {
            TerminalRule::ExitKeyHeuristic => Box::new(ExitKeyHeuristic),
            TerminalRule::Structural => Box::new(StructuralTerminal),
        }
    }
}
