use super::definition::CallFlowStep;
use super::traversal::Traversal;
use crate::error::GraphError;
use ahash::RandomState;
use indexmap::IndexMap;
use tracing::debug;

pub(crate) type StepMap = IndexMap<String, CallFlowStep, RandomState>;

/// Sentinel used as the `from_step` of a dangling default exit.
pub const DEFAULT_EXIT_REFERRER: &str = "<default exit>";

/// A named, directed graph of dialogue steps.
///
/// Steps live in an insertion-ordered arena keyed by step name. The first
/// inserted step is the entry point. A graph built through
/// [`CallFlowGraphBuilder::build`] is guaranteed to have no dangling step
/// references.
#[derive(Debug, Clone)]
pub struct CallFlowGraph {
    name: String,
    description: String,
    steps: StepMap,
    default_exit_step_key: String,
}

impl CallFlowGraph {
    pub fn builder(
        name: impl Into<String>,
        default_exit_step_key: impl Into<String>,
    ) -> CallFlowGraphBuilder {
        CallFlowGraphBuilder::new(name, default_exit_step_key)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_exit_step_key(&self) -> &str {
        &self.default_exit_step_key
    }

    /// The first inserted step key, or `None` for an empty graph.
    pub fn entry_key(&self) -> Option<&str> {
        self.steps.keys().next().map(String::as_str)
    }

    pub fn step(&self, key: &str) -> Option<&CallFlowStep> {
        self.steps.get(key)
    }

    pub fn contains_step(&self, key: &str) -> bool {
        self.steps.contains_key(key)
    }

    /// All steps in insertion order.
    pub fn steps(&self) -> impl Iterator<Item = (&str, &CallFlowStep)> {
        self.steps.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Starts a fresh walk from the entry step.
    pub fn traverse(&self) -> Traversal<'_> {
        Traversal::new(self)
    }

    /// Checks every referential invariant of the graph.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.steps.is_empty() {
            return Err(GraphError::Empty(self.name.clone()));
        }
        for (key, step) in &self.steps {
            if step.waits_for_response && step.timeout_seconds == Some(0) {
                return Err(GraphError::InvalidTimeout { step: key.clone() });
            }
            if let Some(missing) = step.targets().find(|t| !self.steps.contains_key(*t)) {
                return Err(GraphError::DanglingReference {
                    from_step: key.clone(),
                    missing_step: missing.to_string(),
                });
            }
        }
        if !self.steps.contains_key(&self.default_exit_step_key) {
            return Err(GraphError::DanglingReference {
                from_step: DEFAULT_EXIT_REFERRER.to_string(),
                missing_step: self.default_exit_step_key.clone(),
            });
        }
        Ok(())
    }
}

/// Assembles a [`CallFlowGraph`] step by step.
#[derive(Debug)]
pub struct CallFlowGraphBuilder {
    name: String,
    description: String,
    steps: StepMap,
    default_exit_step_key: String,
    duplicate: Option<String>,
}

impl CallFlowGraphBuilder {
    pub fn new(name: impl Into<String>, default_exit_step_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps: StepMap::default(),
            default_exit_step_key: default_exit_step_key.into(),
            duplicate: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn step(mut self, key: impl Into<String>, step: CallFlowStep) -> Self {
        let key = key.into();
        if self.steps.contains_key(&key) {
            self.duplicate.get_or_insert(key);
        } else {
            self.steps.insert(key, step);
        }
        self
    }

    /// Builds the graph, rejecting duplicate keys and dangling references.
    pub fn build(self) -> Result<CallFlowGraph, GraphError> {
        if let Some(key) = self.duplicate {
            return Err(GraphError::DuplicateStep(key));
        }
        let graph = self.assemble();
        graph.validate()?;
        debug!(flow = %graph.name, steps = graph.len(), "Validated call flow");
        Ok(graph)
    }

    /// Builds the graph without any referential checks.
    ///
    /// The simulator still refuses to walk through a dangling reference, so
    /// this is only useful when validation happens elsewhere.
    pub fn build_unchecked(self) -> CallFlowGraph {
        self.assemble()
    }

    fn assemble(self) -> CallFlowGraph {
        CallFlowGraph {
            name: self.name,
            description: self.description,
            steps: self.steps,
            default_exit_step_key: self.default_exit_step_key,
        }
    }
}
