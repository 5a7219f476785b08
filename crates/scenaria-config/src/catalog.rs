use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::suite::{Suite, TestCase};

/// The suites available to a run, keyed by component name.
///
/// Suite files use the same shape:
///
/// ```json
/// {
///   "suites": [
///     {
///       "component_name": "generate_without_context",
///       "description": "General finance questions, no uploaded documents",
///       "cases": [
///         { "id": "1.1.1", "description": "...", "query": "..." }
///       ]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
  pub suites: Vec<Suite>,
}

impl Catalog {
  /// Parse and validate a suite file.
  pub fn from_json(content: &str) -> Result<Self, ConfigError> {
    let catalog: Catalog = serde_json::from_str(content)?;
    catalog.validate()?;
    Ok(catalog)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for suite in &self.suites {
      suite.validate()?;
      if !seen.insert(suite.component_name.as_str()) {
        return Err(ConfigError::DuplicateComponent(
          suite.component_name.clone(),
        ));
      }
    }
    Ok(())
  }

  /// Look up the suite for a component.
  pub fn get(&self, component_name: &str) -> Result<&Suite, ConfigError> {
    self
      .suites
      .iter()
      .find(|s| s.component_name == component_name)
      .ok_or_else(|| ConfigError::UnknownComponent(component_name.to_string()))
  }

  /// Suites compiled into the binary.
  pub fn builtin() -> Self {
    Self {
      suites: vec![
        Suite {
          component_name: "generate_without_context".to_string(),
          description: "General finance questions answered without uploaded documents"
            .to_string(),
          documents: vec![],
          cases: vec![
            TestCase::new(
              "1.1.1",
              "Conceptual comparison of financing types",
              "What is the difference between debt and equity financing?",
            ),
            TestCase::new(
              "1.1.2",
              "Definition of a common valuation metric",
              "Explain what EBITDA measures and why analysts use it.",
            ),
            TestCase::new(
              "1.1.3",
              "Worked calculation without source data",
              "If a company has revenue of 10 million and a net margin of 8 percent, what is its net income?",
            ),
          ],
        },
        Suite {
          component_name: "conversation_memory".to_string(),
          description: "Follow-up questions that depend on earlier turns in the shared session"
            .to_string(),
          documents: vec![],
          cases: vec![
            TestCase::new(
              "2.1.1",
              "Introduce a fact for later turns",
              "For the rest of this conversation, assume my company is called Northwind Analytics and reports in euros.",
            ),
            TestCase::new(
              "2.1.2",
              "Recall the introduced fact",
              "What is the name of my company and which currency does it report in?",
            ),
          ],
        },
      ],
    }
  }
}
