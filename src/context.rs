use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::infra::clipboard::SystemClipboard;
use crate::infra::openai::OpenAiClient;
use crate::services::{ClipboardService, CompletionService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub completion: Arc<dyn CompletionService>,
    pub clipboard: Arc<dyn ClipboardService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        completion: Arc<dyn CompletionService>,
        clipboard: Arc<dyn ClipboardService>,
    ) -> Self {
        Self {
            config,
            completion,
            clipboard,
        }
    }

    /// Wires the production services. Fails before anything else happens when
    /// no API key is configured.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let api_key = config.api_key()?.to_string();
        let completion = Arc::new(OpenAiClient::new(
            Some(api_key),
            config.base_url.clone(),
            config.model.clone(),
            config.timeout,
        )?);
        let clipboard = Arc::new(SystemClipboard::new());
        Ok(Self::new(config, completion, clipboard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoredConfig;
    use crate::error::AppError;

    #[test]
    fn missing_api_key_stops_wiring() {
        let config = AppConfig::resolve(StoredConfig::default(), |_| None).unwrap();
        let result = AppContext::from_config(config);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn wires_services_when_key_present() {
        let stored = StoredConfig {
            openai_api_key: Some("sk-test".to_string()),
            ..StoredConfig::default()
        };
        let config = AppConfig::resolve(stored, |_| None).unwrap();
        assert!(AppContext::from_config(config).is_ok());
    }
}
