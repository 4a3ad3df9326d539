//! # Ridatsu - Call-Flow Drop-off Simulation and Analysis Engine
//!
//! **Ridatsu** walks the branching dialogue graph of a call campaign,
//! simulates how much caller volume each step loses, and hands the worst
//! offender to an external text generator for a short written analysis.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Call Flow**: Parse the stored JSON document with
//!     [`CallFlowGraph::from_json`](flow::CallFlowGraph::from_json), implement
//!     [`IntoCallFlow`](flow::IntoCallFlow) for your own format, or assemble
//!     one with [`CallFlowGraph::builder`](flow::CallFlowGraph::builder). Every
//!     route is validated up front.
//! 2.  **Simulate**: A [`DropoffSimulator`](simulator::DropoffSimulator) walks
//!     the graph from its first step and produces a
//!     [`DropoffReport`](simulator::DropoffReport). Attrition is random, but
//!     every one of the initial calls is accounted for.
//! 3.  **Select**: [`pick_worst_step`](selector::pick_worst_step) finds the
//!     step that lost the most calls without being an exit.
//! 4.  **Analyze**: [`analyze_worst_step`](analysis::analyze_worst_step) sends
//!     that step to an [`AnalysisProvider`](analysis::AnalysisProvider).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ridatsu::prelude::*;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! fn main() -> Result<()> {
//!     let graph = CallFlowGraph::builder("Renewal reminder", "goodbye")
//!         .step("greeting", CallFlowStep::new("Hi, this is Acme Insurance.").then("offer"))
//!         .step(
//!             "offer",
//!             CallFlowStep::new("Would you like to renew today?")
//!                 .waiting(Some(10))
//!                 .with_condition(Condition::contains(["yes", "sure"], "goodbye"))
//!                 .with_condition(Condition::default_to("goodbye")),
//!         )
//!         .step("goodbye", CallFlowStep::new("Thanks for your time."))
//!         .build()?;
//!
//!     let simulator = DropoffSimulator::default();
//!     let mut rng = StdRng::seed_from_u64(42);
//!     let report = simulator.simulate_with_rng(&graph, "Spring renewals", &mut rng)?;
//!     println!("{}", ReportFormatter::format_report(&report));
//!
//!     match pick_worst_step(&report) {
//!         Some(step) => println!("-> Worst step: {} ({} calls lost)", step.step_key, step.calls_dropped),
//!         None => println!("-> No significant drop points."),
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod flow;
pub mod logging;
pub mod policy;
pub mod prelude;
pub mod report;
pub mod selector;
pub mod simulator;
