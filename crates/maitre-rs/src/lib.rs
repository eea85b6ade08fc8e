//! Public SDK surface for Maitre.
//!
//! This crate re-exports the core building blocks and provides small setup
//! helpers to keep consumer wiring consistent.

/// Re-export for convenience.
pub use maitre_rs_config as config;
pub use maitre_rs_core as core;
/// Re-export for convenience.
pub use maitre_rs_llm as llm;
/// Re-export for convenience.
pub use maitre_rs_protocol as protocol;

use maitre_rs_config::MaitreConfig;
use maitre_rs_core::Assistant;
use maitre_rs_llm::{LlmError, OpenAiClient};
use maitre_rs_protocol::Menu;
use std::sync::Arc;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Build the provider client a configuration describes.
///
/// The API key is read from the environment variable the configuration
/// names; a configured base URL overrides the hosted endpoint.
pub fn client_from_config(config: &MaitreConfig) -> Result<OpenAiClient, LlmError> {
    let api_key = std::env::var(&config.llm.api_key_env)
        .map_err(|_| LlmError::Config(format!("{} not set", config.llm.api_key_env)))?;
    let mut client = OpenAiClient::new(api_key);
    if let Some(base_url) = &config.llm.base_url {
        client = client.with_base_url(base_url.as_str());
    }
    Ok(client)
}

/// Build a ready-to-use assistant from a menu and configuration.
pub fn assistant_from_config(menu: Menu, config: MaitreConfig) -> Result<Assistant, LlmError> {
    let client = client_from_config(&config)?;
    Ok(Assistant::new(menu, Arc::new(client), config))
}

#[cfg(test)]
mod tests {
    use super::client_from_config;
    use maitre_rs_config::MaitreConfig;
    use maitre_rs_llm::LlmError;
    use pretty_assertions::assert_eq;

    #[test]
    fn client_from_config_requires_the_key_variable() {
        let mut config = MaitreConfig::default();
        config.llm.api_key_env = "MAITRE_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = client_from_config(&config).expect_err("missing key");
        assert!(matches!(err, LlmError::Config(_)));
        assert_eq!(
            err.to_string(),
            "configuration error: MAITRE_TEST_KEY_THAT_IS_NEVER_SET not set"
        );
    }
}
