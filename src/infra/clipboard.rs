use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::services::ClipboardService;

/// A clipboard program and its arguments; the text is written to its stdin.
#[derive(Debug, Clone)]
pub struct ClipboardCommand {
    program: String,
    args: Vec<String>,
}

impl ClipboardCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Writes to the platform clipboard by piping into the first command that works.
///
/// Only the command's exit is awaited. Tools such as `wl-copy` and `xclip`
/// leave a process behind that owns the selection, so their output streams
/// are discarded rather than read to the end.
pub struct SystemClipboard {
    candidates: Vec<ClipboardCommand>,
    timeout: Duration,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::with_commands(platform_commands())
    }

    pub fn with_commands(candidates: Vec<ClipboardCommand>) -> Self {
        Self {
            candidates,
            timeout: COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn pipe_into(&self, command: &ClipboardCommand, text: &str) -> Result<(), String> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| format!("{}: {err}", command.describe()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|err| format!("{}: {err}", command.describe()))?;
            drop(stdin);
        }

        let status = match timeout(self.timeout, child.wait()).await {
            Ok(status) => status.map_err(|err| format!("{}: {err}", command.describe()))?,
            Err(_) => {
                warn!(command = %command.describe(), "clipboard command timed out");
                let _ = child.start_kill();
                return Err(format!(
                    "{} did not exit within {}s",
                    command.describe(),
                    self.timeout.as_secs_f32()
                ));
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(format!("{} exited with {:?}", command.describe(), status.code()))
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardService for SystemClipboard {
    async fn write_text(&self, text: &str) -> AppResult<()> {
        let mut failures = Vec::new();
        for command in &self.candidates {
            match self.pipe_into(command, text).await {
                Ok(()) => {
                    debug!(command = %command.describe(), "copied text to clipboard");
                    return Ok(());
                }
                Err(reason) => failures.push(reason),
            }
        }

        if failures.is_empty() {
            return Err(AppError::Clipboard(
                "no clipboard command available on this platform".to_string(),
            ));
        }
        Err(AppError::Clipboard(failures.join("; ")))
    }
}

fn platform_commands() -> Vec<ClipboardCommand> {
    if cfg!(target_os = "macos") {
        vec![ClipboardCommand::new("pbcopy", &[])]
    } else if cfg!(windows) {
        vec![ClipboardCommand::new("clip", &[])]
    } else {
        vec![
            ClipboardCommand::new("wl-copy", &[]),
            ClipboardCommand::new("xclip", &["-selection", "clipboard"]),
            ClipboardCommand::new("xsel", &["--clipboard", "--input"]),
        ]
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn pipes_text_into_first_working_command() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clipboard.txt");
        let script = format!("cat > '{}'", target.display());

        let clipboard = SystemClipboard::with_commands(vec![
            ClipboardCommand::new("deskbot-missing-clipboard-tool", &[]),
            ClipboardCommand::new("sh", &["-c", script.as_str()]),
        ]);

        clipboard.write_text("Printer Jam").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "Printer Jam");
    }

    #[tokio::test]
    async fn reports_every_failure() {
        let clipboard = SystemClipboard::with_commands(vec![
            ClipboardCommand::new("deskbot-missing-clipboard-tool", &[]),
            ClipboardCommand::new("sh", &["-c", "cat > /dev/null; exit 3"]),
        ]);

        let error = clipboard.write_text("text").await.unwrap_err();
        let message = error.to_string();

        assert!(message.contains("deskbot-missing-clipboard-tool"));
        assert!(message.contains("Some(3)"));
    }

    #[tokio::test]
    async fn background_clipboard_owner_does_not_block() {
        let clipboard = SystemClipboard::with_commands(vec![ClipboardCommand::new(
            "sh",
            &["-c", "cat > /dev/null; (sleep 8 &); exit 0"],
        )]);

        let started = Instant::now();
        clipboard.write_text("Printer Jam").await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn hung_command_times_out_as_clipboard_error() {
        let clipboard =
            SystemClipboard::with_commands(vec![ClipboardCommand::new("sh", &["-c", "sleep 5"])])
                .with_timeout(Duration::from_millis(200));

        let started = Instant::now();
        let error = clipboard.write_text("text").await.unwrap_err();

        assert!(matches!(error, AppError::Clipboard(_)));
        assert!(error.to_string().contains("did not exit within"));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn no_candidates_is_an_error() {
        let clipboard = SystemClipboard::with_commands(Vec::new());
        assert!(matches!(
            clipboard.write_text("text").await,
            Err(AppError::Clipboard(_))
        ));
    }
}
