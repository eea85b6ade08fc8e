//! Configuration schema for the ordering assistant.

use crate::ConfigError;
use maitre_rs_protocol::ModelParams;
use serde::{Deserialize, Serialize};

/// Root config for the assistant SDK.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaitreConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default = "default_classifier_params")]
    pub classifier: ModelParams,
    #[serde(default)]
    pub generation: ModelParams,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

impl Default for MaitreConfig {
    fn default() -> Self {
        Self {
            schema: None,
            llm: LlmConfig::default(),
            classifier: default_classifier_params(),
            generation: ModelParams::default(),
            workflow: WorkflowConfig::default(),
        }
    }
}

impl MaitreConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> MaitreConfigBuilder {
        MaitreConfigBuilder::new()
    }

    /// Check that all configured values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_model_params("classifier", &self.classifier)?;
        validate_model_params("generation", &self.generation)?;
        if self.workflow.timeout_secs == 0 {
            return Err(ConfigError::InvalidField {
                path: "workflow.timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.workflow.history_window == 0 {
            return Err(ConfigError::InvalidField {
                path: "workflow.history_window".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn validate_model_params(path: &str, params: &ModelParams) -> Result<(), ConfigError> {
    if params.model.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: format!("{path}.model"),
            message: "must not be empty".to_string(),
        });
    }
    if !(0.0..=2.0).contains(&params.temperature) {
        return Err(ConfigError::InvalidField {
            path: format!("{path}.temperature"),
            message: "must be between 0.0 and 2.0".to_string(),
        });
    }
    if params.timeout_secs == 0 {
        return Err(ConfigError::InvalidField {
            path: format!("{path}.timeout_secs"),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Builder for assembling a `MaitreConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MaitreConfigBuilder {
    config: MaitreConfig,
}

impl MaitreConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: MaitreConfig::default(),
        }
    }

    /// Replace the provider transport configuration.
    pub fn llm(mut self, llm: LlmConfig) -> Self {
        self.config.llm = llm;
        self
    }

    /// Replace the classifier model parameters.
    pub fn classifier(mut self, classifier: ModelParams) -> Self {
        self.config.classifier = classifier;
        self
    }

    /// Replace the generation model parameters.
    pub fn generation(mut self, generation: ModelParams) -> Self {
        self.config.generation = generation;
        self
    }

    /// Replace the workflow configuration.
    pub fn workflow(mut self, workflow: WorkflowConfig) -> Self {
        self.config.workflow = workflow;
        self
    }

    /// Finalize and return the built `MaitreConfig`.
    pub fn build(self) -> MaitreConfig {
        self.config
    }
}

/// Provider transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    /// Optional base URL override for OpenAI-compatible servers.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Workflow-level pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowConfig {
    /// Overall per-stage timeout in seconds.
    #[serde(default = "default_workflow_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum prior turns passed to the workflow.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_workflow_timeout_secs(),
            history_window: default_history_window(),
        }
    }
}

fn default_classifier_params() -> ModelParams {
    ModelParams {
        temperature: 0.0,
        ..ModelParams::default()
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_workflow_timeout_secs() -> u64 {
    60
}

fn default_history_window() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::{LlmConfig, MaitreConfig, WorkflowConfig};
    use crate::ConfigError;
    use maitre_rs_protocol::ModelParams;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_deployment_settings() {
        let config = MaitreConfig::default();
        assert_eq!(config.classifier.model, "gpt-4o");
        assert_eq!(config.classifier.temperature, 0.0);
        assert_eq!(config.classifier.timeout_secs, 30);
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.workflow.timeout_secs, 60);
        assert_eq!(config.workflow.history_window, 20);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_replaces_sections() {
        let config = MaitreConfig::builder()
            .llm(LlmConfig {
                base_url: Some("http://localhost:8080/v1".to_string()),
                api_key_env: "LOCAL_KEY".to_string(),
            })
            .generation(ModelParams {
                model: "gpt-4o-mini".to_string(),
                ..ModelParams::default()
            })
            .workflow(WorkflowConfig {
                timeout_secs: 90,
                history_window: 10,
            })
            .build();

        assert_eq!(
            config.llm.base_url.as_deref(),
            Some("http://localhost:8080/v1")
        );
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.workflow.timeout_secs, 90);
        assert_eq!(config.workflow.history_window, 10);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = MaitreConfig::default();
        config.classifier.temperature = -0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField { path, .. }) if path == "classifier.temperature"
        ));

        let mut config = MaitreConfig::default();
        config.generation.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField { path, .. }) if path == "generation.timeout_secs"
        ));

        let mut config = MaitreConfig::default();
        config.workflow.history_window = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField { path, .. }) if path == "workflow.history_window"
        ));
    }
}
