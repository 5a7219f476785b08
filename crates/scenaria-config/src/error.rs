use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The document is not valid JSON for the expected type.
  #[error("invalid json: {0}")]
  Json(#[from] serde_json::Error),

  /// A test case id cannot be used as an artifact name.
  #[error("invalid test case id '{id}' in suite '{component}'")]
  InvalidCaseId { component: String, id: String },

  /// Two cases in one suite share an id.
  #[error("duplicate test case id '{id}' in suite '{component}'")]
  DuplicateCaseId { component: String, id: String },

  /// Two suites in one catalog share a component name.
  #[error("duplicate suite for component '{0}'")]
  DuplicateComponent(String),

  /// A component name cannot be used as a directory name.
  #[error("invalid component name: '{0}'")]
  InvalidComponentName(String),

  #[error("suite '{0}' has no test cases")]
  EmptySuite(String),

  #[error("unknown component: {0}")]
  UnknownComponent(String),

  #[error("invalid harness config: {0}")]
  InvalidHarness(String),
}
