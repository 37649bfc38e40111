use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::services::{ClipboardService, CompletionService};

/// Completion double that replays canned replies in order and records prompts.
pub struct CannedCompletion {
    replies: Mutex<Vec<AppResult<String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl CannedCompletion {
    pub fn replying(replies: &[&str]) -> Self {
        Self::with_results(replies.iter().map(|reply| Ok(reply.to_string())).collect())
    }

    pub fn failing(summary: &str, detail: &str) -> Self {
        Self::with_results(vec![Err(AppError::completion(summary, detail))])
    }

    fn with_results(mut results: Vec<AppResult<String>>) -> Self {
        results.reverse();
        Self {
            replies: Mutex::new(results),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for CannedCompletion {
    async fn generate_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> AppResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(AppError::completion("no canned reply left", "")))
    }
}

#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    unavailable: bool,
}

impl MemoryClipboard {
    pub fn unavailable() -> Self {
        Self {
            contents: Mutex::new(None),
            unavailable: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipboardService for MemoryClipboard {
    async fn write_text(&self, text: &str) -> AppResult<()> {
        if self.unavailable {
            return Err(AppError::Clipboard("clipboard not available".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}
