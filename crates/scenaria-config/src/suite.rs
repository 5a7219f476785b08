use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A single named scenario to exercise against the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
  /// Dotted hierarchical id, e.g. "1.1.2". Embedded in artifact file names.
  pub id: String,
  pub description: String,
  /// The user message sent to the service.
  pub query: String,
}

impl TestCase {
  pub fn new(
    id: impl Into<String>,
    description: impl Into<String>,
    query: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      description: description.into(),
      query: query.into(),
    }
  }
}

/// The ordered collection of test cases for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
  /// Service capability under test. Also names the output directory.
  pub component_name: String,
  #[serde(default)]
  pub description: String,
  /// Files uploaded once, before the first case runs.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub documents: Vec<PathBuf>,
  pub cases: Vec<TestCase>,
}

impl Suite {
  /// Check that the suite can be written to disk without collisions.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !is_valid_name(&self.component_name) {
      return Err(ConfigError::InvalidComponentName(
        self.component_name.clone(),
      ));
    }
    if self.cases.is_empty() {
      return Err(ConfigError::EmptySuite(self.component_name.clone()));
    }

    let mut seen = HashSet::new();
    for case in &self.cases {
      if !is_valid_case_id(&case.id) {
        return Err(ConfigError::InvalidCaseId {
          component: self.component_name.clone(),
          id: case.id.clone(),
        });
      }
      if !seen.insert(case.id.as_str()) {
        return Err(ConfigError::DuplicateCaseId {
          component: self.component_name.clone(),
          id: case.id.clone(),
        });
      }
    }

    Ok(())
  }
}

fn is_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_valid_name(name: &str) -> bool {
  !name.is_empty() && name.chars().all(is_name_char)
}

/// Dot-separated, non-empty segments of name characters.
fn is_valid_case_id(id: &str) -> bool {
  id.split('.').all(is_valid_name)
}
