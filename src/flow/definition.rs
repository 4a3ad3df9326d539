use serde::{Deserialize, Serialize};

/// How a condition decides whether it applies to a caller utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchType {
    /// Matches when the utterance contains any of the condition's keywords.
    Contains,
    /// Always matches. Used as a catch-all and should come last.
    Default,
}

/// A conditional outgoing edge of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub match_type: MatchType,
    pub keywords: Vec<String>,
    pub next_step_key: String,
}

impl Condition {
    pub fn contains<I, S>(keywords: I, next_step_key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            match_type: MatchType::Contains,
            keywords: keywords.into_iter().map(Into::into).collect(),
            next_step_key: next_step_key.into(),
        }
    }

    pub fn default_to(next_step_key: impl Into<String>) -> Self {
        Self {
            match_type: MatchType::Default,
            keywords: Vec::new(),
            next_step_key: next_step_key.into(),
        }
    }

    /// Checks the condition against an utterance that is already lowercased.
    fn matches(&self, lowered_utterance: &str) -> bool {
        match self.match_type {
            MatchType::Default => true,
            MatchType::Contains => self
                .keywords
                .iter()
                .filter(|k| !k.trim().is_empty())
                .any(|k| lowered_utterance.contains(&k.to_lowercase())),
        }
    }
}

/// A single node of a call flow: one scripted line and its branching rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallFlowStep {
    pub description: String,
    pub text: String,
    pub waits_for_response: bool,
    pub timeout_seconds: Option<u32>,
    pub next: Option<String>,
    pub conditions: Vec<Condition>,
}

impl CallFlowStep {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the step as pausing for caller input, optionally with a timeout.
    pub fn waiting(mut self, timeout_seconds: Option<u32>) -> Self {
        self.waits_for_response = true;
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn then(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// A step with no `next` and no conditions ends the flow.
    pub fn has_outgoing_edges(&self) -> bool {
        self.next.is_some() || !self.conditions.is_empty()
    }

    /// Steps that need caller engagement, either by waiting or by branching.
    pub fn is_interactive(&self) -> bool {
        self.waits_for_response || !self.conditions.is_empty()
    }

    /// The single synthetic path used when there is no real caller:
    /// `next` if present, otherwise the first condition's target.
    pub fn continuation(&self) -> Option<&str> {
        self.next
            .as_deref()
            .or_else(|| self.conditions.first().map(|c| c.next_step_key.as_str()))
    }

    /// Every step key this step can lead to, `next` first.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.next
            .as_deref()
            .into_iter()
            .chain(self.conditions.iter().map(|c| c.next_step_key.as_str()))
    }

    /// Routes a caller utterance through the conditions in order; the first
    /// match wins. Falls back to `next` when no condition applies.
    pub fn route(&self, utterance: &str) -> Option<&str> {
        let lowered = utterance.to_lowercase();
        self.conditions
            .iter()
            .find(|c| c.matches(&lowered))
            .map(|c| c.next_step_key.as_str())
            .or(self.next.as_deref())
    }
}
