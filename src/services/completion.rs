use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one system + user prompt pair and returns the reply text.
    async fn generate_completion(&self, system_prompt: &str, user_prompt: &str)
    -> AppResult<String>;
}
