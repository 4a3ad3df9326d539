use super::definition::{CallFlowStep, Condition, MatchType};
use super::graph::CallFlowGraph;
use crate::error::FlowConversionError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A trait for custom data models that can be converted into a `CallFlowGraph`.
///
/// Campaign tools store call flows in their own shapes. Implementing this
/// trait on those structs provides the translation layer the simulator
/// needs; [`RawCallFlow`] is the implementation for the JSON document used
/// by the campaign dashboard.
///
/// # Example
///
/// ```rust,no_run
/// use ridatsu::prelude::*;
/// use ridatsu::error::FlowConversionError;
///
/// struct Script { lines: Vec<(String, String)> }
///
/// impl IntoCallFlow for Script {
///     fn into_call_flow(self) -> std::result::Result<CallFlowGraph, FlowConversionError> {
///         let keys: Vec<String> = self.lines.iter().map(|(k, _)| k.clone()).collect();
///         let exit = keys.last().cloned().ok_or_else(|| {
///             FlowConversionError::ValidationError("script has no lines".to_string())
///         })?;
///         let mut builder = CallFlowGraph::builder("Script", exit);
///         for (i, (key, text)) in self.lines.into_iter().enumerate() {
///             let mut step = CallFlowStep::new(text);
///             if let Some(next) = keys.get(i + 1) {
///                 step = step.then(next.clone());
///             }
///             builder = builder.step(key, step);
///         }
///         Ok(builder.build()?)
///     }
/// }
/// ```
pub trait IntoCallFlow {
    /// Consumes the object and converts it into a validated call flow.
    fn into_call_flow(self) -> Result<CallFlowGraph, FlowConversionError>;
}

/// The stored JSON shape of a call flow. Object key order is kept, so the
/// first key under `steps` is the entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCallFlow {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub default_exit_step_key: String,
    pub steps: IndexMap<String, RawStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStep {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub waits_for_response: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<RawCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCondition {
    pub match_type: MatchType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub next_step_key: String,
}

impl IntoCallFlow for RawCallFlow {
    fn into_call_flow(self) -> Result<CallFlowGraph, FlowConversionError> {
        let mut builder =
            CallFlowGraph::builder(self.name, self.default_exit_step_key).description(self.description);

        for (key, raw) in self.steps {
            if key.trim().is_empty() {
                return Err(FlowConversionError::ValidationError(
                    "step keys must not be empty".to_string(),
                ));
            }
            let conditions = raw
                .conditions
                .into_iter()
                .map(|c| Condition {
                    match_type: c.match_type,
                    keywords: c.keywords,
                    next_step_key: c.next_step_key,
                })
                .collect();
            let step = CallFlowStep {
                description: raw.description,
                text: raw.text,
                waits_for_response: raw.waits_for_response,
                // A timeout without a response wait carries no meaning.
                timeout_seconds: raw.timeout_seconds.filter(|_| raw.waits_for_response),
                // The dashboard stores "no successor" as an empty string.
                next: raw.next.filter(|n| !n.is_empty()),
                conditions,
            };
            builder = builder.step(key, step);
        }

        Ok(builder.build()?)
    }
}

impl From<&CallFlowGraph> for RawCallFlow {
    fn from(graph: &CallFlowGraph) -> Self {
        let steps = graph
            .steps()
            .map(|(key, step)| {
                let raw = RawStep {
                    description: step.description.clone(),
                    text: step.text.clone(),
                    waits_for_response: step.waits_for_response,
                    timeout_seconds: step.timeout_seconds,
                    next: step.next.clone(),
                    conditions: step
                        .conditions
                        .iter()
                        .map(|c| RawCondition {
                            match_type: c.match_type,
                            keywords: c.keywords.clone(),
                            next_step_key: c.next_step_key.clone(),
                        })
                        .collect(),
                };
                (key.to_string(), raw)
            })
            .collect();

        Self {
            name: graph.name().to_string(),
            description: graph.description().to_string(),
            default_exit_step_key: graph.default_exit_step_key().to_string(),
            steps,
        }
    }
}

impl CallFlowGraph {
    /// Parses and validates a call flow from its stored JSON document.
    pub fn from_json(json: &str) -> Result<Self, FlowConversionError> {
        let raw: RawCallFlow = serde_json::from_str(json)
            .map_err(|e| FlowConversionError::JsonParseError(e.to_string()))?;
        raw.into_call_flow()
    }

    pub fn to_json_pretty(&self) -> Result<String, FlowConversionError> {
        serde_json::to_string_pretty(&RawCallFlow::from(self))
            .map_err(|e| FlowConversionError::JsonParseError(e.to_string()))
    }
}
