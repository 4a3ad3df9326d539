//! Common test utilities for building call flows and fake providers.
use async_trait::async_trait;
use ridatsu::prelude::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A single step that is both the entry point and the default exit.
#[allow(dead_code)]
pub fn create_single_step_flow() -> CallFlowGraph {
    CallFlowGraph::builder("One liner", "announce")
        .step(
            "announce",
            CallFlowStep::new("Your appointment is tomorrow at 10am.").with_description("Announcement"),
        )
        .build()
        .unwrap()
}

/// `greeting -> ask (waits) -> exit`, with `exit` as the default exit.
#[allow(dead_code)]
pub fn create_three_step_flow() -> CallFlowGraph {
    CallFlowGraph::builder("Satisfaction survey", "exit")
        .step(
            "greeting",
            CallFlowStep::new("Hi, this is Acme calling about your recent order.")
                .with_description("Greeting")
                .then("ask"),
        )
        .step(
            "ask",
            CallFlowStep::new("On a scale from one to five, how happy were you?")
                .with_description("Rating question")
                .waiting(Some(10))
                .then("exit"),
        )
        .step(
            "exit",
            CallFlowStep::new("Thanks for your feedback, goodbye.").with_description("Close"),
        )
        .build()
        .unwrap()
}

/// A flow with keyword branches, a live-agent dead end and an exit-named step.
#[allow(dead_code)]
pub fn create_branching_flow() -> CallFlowGraph {
    CallFlowGraph::builder("Renewal reminder", "goodbye")
        .description("Outbound renewal reminder")
        .step(
            "greeting",
            CallFlowStep::new("Hello from Northwind Insurance.").then("identity"),
        )
        .step(
            "identity",
            CallFlowStep::new("Am I speaking with the policy holder?")
                .waiting(Some(8))
                .with_condition(Condition::contains(["yes", "speaking"], "offer"))
                .with_condition(Condition::contains(["no", "wrong"], "wrong_person_exit"))
                .with_condition(Condition::default_to("offer")),
        )
        .step(
            "offer",
            CallFlowStep::new("Would you like to renew today?")
                .waiting(Some(10))
                .with_condition(Condition::contains(["yes", "renew"], "confirm"))
                .with_condition(Condition::contains(["agent"], "transfer"))
                .with_condition(Condition::default_to("goodbye")),
        )
        .step(
            "confirm",
            CallFlowStep::new("Your renewal is confirmed.").then("goodbye"),
        )
        .step("transfer", CallFlowStep::new("Connecting you to an agent."))
        .step("wrong_person_exit", CallFlowStep::new("Sorry for the trouble."))
        .step("goodbye", CallFlowStep::new("Goodbye!"))
        .build()
        .unwrap()
}

/// A report assembled by hand, continuing volume from step to step.
#[allow(dead_code)]
pub fn create_report(label: &str, drops: &[(&str, u32)]) -> DropoffReport {
    let mut reached = 1000;
    let step_results = drops
        .iter()
        .map(|(key, dropped)| {
            let result = StepResult::new(*key, "", reached, *dropped);
            reached -= result.calls_dropped;
            result
        })
        .collect();
    DropoffReport {
        campaign_label: label.to_string(),
        initial_volume: 1000,
        step_results,
    }
}

/// A provider that replays a canned reply and records what it was asked.
#[allow(dead_code)]
pub struct FakeProvider {
    reply: std::result::Result<DropAnalysisResponse, AnalysisError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<DropAnalysisRequest>>,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn answering(analysis: &str) -> Self {
        Self::with_reply(Ok(DropAnalysisResponse {
            analysis: Some(analysis.to_string()),
        }))
    }

    pub fn failing(error: AnalysisError) -> Self {
        Self::with_reply(Err(error))
    }

    pub fn with_reply(reply: std::result::Result<DropAnalysisResponse, AnalysisError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<DropAnalysisRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisProvider for FakeProvider {
    async fn analyze(
        &self,
        request: &DropAnalysisRequest,
    ) -> std::result::Result<DropAnalysisResponse, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.reply.clone()
    }
}
