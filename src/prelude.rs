//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the ridatsu crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use ridatsu::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow_json = std::fs::read_to_string("data/sample_flow.json")?;
//! let graph = CallFlowGraph::from_json(&flow_json)?;
//!
//! let report = simulate(&graph, "Spring renewals")?;
//! println!("{}", ReportFormatter::format_report(&report));
//! # Ok(())
//! # }
//! ```

// Call flow model
pub use crate::flow::{
    CallFlowGraph, CallFlowGraphBuilder, CallFlowStep, Condition, FlowEnd, IntoCallFlow,
    MatchType, RawCallFlow, Traversal, Visit,
};

// Simulation and selection
pub use crate::policy::{
    ExitKeyHeuristic, StructuralTerminal, TerminalPolicy, TerminalRule, is_terminal_step,
};
pub use crate::selector::pick_worst_step;
pub use crate::simulator::{
    DropRange, DropoffReport, DropoffSimulator, SimulatorConfig, StepResult, simulate,
};

// Analysis
pub use crate::analysis::{
    AnalysisOutcome, AnalysisProvider, DropAnalysis, DropAnalysisRequest, DropAnalysisRequester,
    DropAnalysisResponse, HttpAnalysisProvider, analyze_worst_step,
};

// Configuration
pub use crate::config::AppConfig;

// Error types
pub use crate::error::{AnalysisError, FlowConversionError, GraphError, SimulationError};

// Report formatting
pub use crate::report::ReportFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
