//! Execution configuration

use serde::Deserialize;
use serde::Serialize;

/// Knobs for one [`Execution`][crate::execution::Execution]
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid configuration:
///
/// ```
/// use graphql_executor::ExecutionConfig;
///
/// let config = ExecutionConfig::from_json(r#"{ "max_depth": 10 }"#).unwrap();
/// assert!(config.validate);
/// assert_eq!(config.max_depth, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ExecutionConfig {
    /// Run the validation pass before executing anything
    pub validate: bool,

    /// Resolve sibling fields and list items of queries and subscription events concurrently.
    /// When `false` they are resolved one after the other, in document order.
    ///
    /// Root fields of a mutation are always resolved in order.
    pub parallel: bool,

    /// Reject input objects in variables that have fields not defined by their type
    pub closed_input_objects: bool,

    /// Fields nested deeper than this fail with a field error.
    /// Root fields are at depth 1.
    pub max_depth: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid execution configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            validate: true,
            parallel: true,
            closed_input_objects: true,
            max_depth: None,
        }
    }
}

impl ExecutionConfig {
    /// Load from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_unknown_keys() {
        assert_eq!(
            ExecutionConfig::from_json("{}").unwrap(),
            ExecutionConfig::default()
        );
        let config = ExecutionConfig::from_json(r#"{"parallel": false}"#).unwrap();
        assert!(!config.parallel);
        assert!(config.closed_input_objects);

        let err = ExecutionConfig::from_json(r#"{"paralel": false}"#).unwrap_err();
        assert!(err.to_string().starts_with(
            "invalid execution configuration: unknown field `paralel`"
        ));
    }
}
