//! Hands the worst simulated step to an external text generator.
//!
//! The generator is opaque: given a campaign, a step, its script line and
//! the step's drop percentage it returns a short prose analysis. Each
//! request is a single shot, with no retries, caching or rate limiting.

use crate::error::AnalysisError;
use crate::flow::CallFlowGraph;
use crate::selector::pick_worst_step;
use crate::simulator::{DropoffReport, StepResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

mod http;

pub use http::HttpAnalysisProvider;

/// The request sent to an [`AnalysisProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropAnalysisRequest {
    pub campaign_name: String,
    pub step_name: String,
    pub step_text: String,
    pub drop_off_percentage: f64,
}

impl DropAnalysisRequest {
    pub fn new(
        campaign_name: impl Into<String>,
        step_name: impl Into<String>,
        step_text: impl Into<String>,
        drop_off_percentage: f64,
    ) -> Self {
        Self {
            campaign_name: campaign_name.into(),
            step_name: step_name.into(),
            step_text: step_text.into(),
            drop_off_percentage,
        }
    }

    /// Every text field must be non-blank and the percentage within `(0, 100]`.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fields = [
            ("campaign name", &self.campaign_name),
            ("step name", &self.step_name),
            ("step text", &self.step_text),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AnalysisError::InvalidRequest(format!("{field} is empty")));
        }
        let pct = self.drop_off_percentage;
        if !pct.is_finite() || pct <= 0.0 || pct > 100.0 {
            return Err(AnalysisError::InvalidRequest(format!(
                "drop-off percentage {pct} is outside (0, 100]"
            )));
        }
        Ok(())
    }
}

/// What a provider sends back. A missing `analysis` is a failure, not an
/// empty answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropAnalysisResponse {
    #[serde(default)]
    pub analysis: Option<String>,
}

/// A successful analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropAnalysis {
    pub analysis: String,
}

/// The external text-generation collaborator.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(
        &self,
        request: &DropAnalysisRequest,
    ) -> Result<DropAnalysisResponse, AnalysisError>;
}

/// Validates requests and turns provider output into a [`DropAnalysis`].
pub struct DropAnalysisRequester<P> {
    provider: P,
}

impl<P: AnalysisProvider> DropAnalysisRequester<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sends one request. Invalid requests never reach the provider, and a
    /// blank or missing analysis is reported as [`AnalysisError::EmptyResponse`].
    #[instrument(skip(self, request), fields(campaign = %request.campaign_name, step = %request.step_name))]
    pub async fn request(&self, request: &DropAnalysisRequest) -> Result<DropAnalysis, AnalysisError> {
        request.validate()?;

        let response = self
            .provider
            .analyze(request)
            .await
            .inspect_err(|e| warn!(error = %e, "Drop analysis request failed"))?;

        let analysis = response
            .analysis
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;

        info!(chars = analysis.len(), "Drop analysis received");
        Ok(DropAnalysis { analysis })
    }
}

/// The result of asking for an analysis of a simulation report.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Every step lost either nothing or everything; nothing was requested.
    NoSignificantDrop,
    Analyzed { step: StepResult, analysis: String },
}

impl AnalysisOutcome {
    pub fn user_message(&self) -> String {
        match self {
            AnalysisOutcome::NoSignificantDrop => {
                "No significant drop points found in this call flow.".to_string()
            }
            AnalysisOutcome::Analyzed { step, analysis } => format!(
                "Step '{}' loses {} calls ({}%): {}",
                step.step_key, step.calls_dropped, step.drop_rate_percent, analysis
            ),
        }
    }
}

impl AnalysisError {
    pub fn user_message(&self) -> String {
        format!("Could not analyze the drop-off: {self}")
    }
}

/// Picks the worst step of a report and asks the provider about it.
///
/// The step's script line is looked up in `graph`, which must be the graph
/// the report was simulated from.
pub async fn analyze_worst_step<P: AnalysisProvider>(
    report: &DropoffReport,
    graph: &CallFlowGraph,
    requester: &DropAnalysisRequester<P>,
) -> Result<AnalysisOutcome, AnalysisError> {
    let Some(worst) = pick_worst_step(report) else {
        info!(campaign = %report.campaign_label, "No significant drop point, skipping analysis");
        return Ok(AnalysisOutcome::NoSignificantDrop);
    };

    let step = graph.step(&worst.step_key).ok_or_else(|| {
        AnalysisError::InvalidRequest(format!(
            "step '{}' is not part of call flow '{}'",
            worst.step_key,
            graph.name()
        ))
    })?;

    let request = DropAnalysisRequest::new(
        report.campaign_label.as_str(),
        worst.step_key.as_str(),
        step.text.as_str(),
        worst.drop_rate_percent,
    );
    let DropAnalysis { analysis } = requester.request(&request).await?;

    Ok(AnalysisOutcome::Analyzed {
        step: worst.clone(),
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_fields() {
        let request = DropAnalysisRequest::new("Spring", "ask", "   ", 12.5);
        let err = request.validate().unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidRequest("step text is empty".to_string())
        );
    }

    #[test]
    fn test_validate_percentage_bounds() {
        assert!(DropAnalysisRequest::new("c", "s", "t", 100.0).validate().is_ok());
        assert!(DropAnalysisRequest::new("c", "s", "t", 0.1).validate().is_ok());
        assert!(DropAnalysisRequest::new("c", "s", "t", 0.0).validate().is_err());
        assert!(DropAnalysisRequest::new("c", "s", "t", 100.1).validate().is_err());
        assert!(DropAnalysisRequest::new("c", "s", "t", f64::NAN).validate().is_err());
    }

    #[test]
    fn test_request_uses_wire_field_names() {
        let request = DropAnalysisRequest::new("Spring", "ask", "How can I help?", 18.4);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["campaignName"], "Spring");
        assert_eq!(json["stepName"], "ask");
        assert_eq!(json["stepText"], "How can I help?");
        assert_eq!(json["dropOffPercentage"], 18.4);
    }

    #[test]
    fn test_error_message_keeps_cause() {
        let err = AnalysisError::Provider("quota exceeded".to_string());
        assert!(err.user_message().contains("quota exceeded"));
    }
}
