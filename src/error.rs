use thiserror::Error;

/// Errors raised while validating a call-flow graph at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Call flow '{0}' has no steps")]
    Empty(String),

    #[error("Step '{0}' is defined more than once")]
    DuplicateStep(String),

    #[error("Step '{missing_step}' not found, which is referenced by '{from_step}'")]
    DanglingReference {
        from_step: String,
        missing_step: String,
    },

    #[error("Step '{step}' waits for a response with a timeout of 0 seconds")]
    InvalidTimeout { step: String },
}

/// Errors that can occur when converting a stored flow document into a `CallFlowGraph`.
#[derive(Error, Debug, Clone)]
pub enum FlowConversionError {
    #[error("Failed to parse call flow JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid custom data: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors that can occur while simulating drop-off over a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Cannot simulate call flow '{0}': it has no steps")]
    EmptyGraph(String),

    #[error(
        "Data integrity error: step '{from_step}' continues to '{missing_step}', which does not exist"
    )]
    DataIntegrity {
        from_step: String,
        missing_step: String,
    },
}

/// Errors that can occur while requesting a drop-off analysis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Invalid analysis request: {0}")]
    InvalidRequest(String),

    #[error("Analysis provider failed: {0}")]
    Provider(String),

    #[error("Analysis provider returned no analysis text")]
    EmptyResponse,
}

/// Errors that can occur while loading the application configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },
}
