use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::cmd::input::{PromptAction, apply_prompt, display_value, mask_secret, prompt};
use crate::config::{StoredConfig, config_file_path};
use crate::domain::prompt::ReplyFormat;
use crate::domain::reply::DuplicatePolicy;
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    writeln!(output, "Configuring deskbot.")?;
    writeln!(output, "Press Enter to keep the current value, '-' to clear it.")?;
    writeln!(
        output,
        "Secrets are stored in the local config file; protect your filesystem accordingly.\n"
    )?;

    edit_config(&mut cfg, &mut input, &mut output)?;
    cfg.save()?;

    let path = config_file_path()?;
    writeln!(output, "\nConfiguration saved to {}", path.display())?;
    Ok(())
}

fn edit_config<R: BufRead, W: Write>(
    cfg: &mut StoredConfig,
    input: &mut R,
    output: &mut W,
) -> AppResult<()> {
    apply_prompt(input, output, "OpenAI API key", &mut cfg.openai_api_key, true)?;
    apply_prompt(input, output, "Model", &mut cfg.model, false)?;
    apply_prompt(input, output, "API base URL", &mut cfg.base_url, false)?;

    apply_prompt(input, output, "Reply format (lines/json)", &mut cfg.reply_format, false)?;
    if let Some(value) = &cfg.reply_format {
        if ReplyFormat::from_str(value).is_none() {
            return Err(AppError::Validation(format!(
                "unknown reply format '{value}' (use lines or json)"
            )));
        }
    }

    apply_prompt(
        input,
        output,
        "Repeated label policy (first/last)",
        &mut cfg.duplicate_policy,
        false,
    )?;
    if let Some(value) = &cfg.duplicate_policy {
        if DuplicatePolicy::from_str(value).is_none() {
            return Err(AppError::Validation(format!(
                "unknown duplicate policy '{value}' (use first or last)"
            )));
        }
    }

    let current_timeout = cfg.timeout_secs.map(|secs| secs.to_string());
    match prompt(
        input,
        output,
        "Request timeout in seconds",
        current_timeout.as_deref(),
        false,
    )? {
        PromptAction::Keep => {}
        PromptAction::Clear => cfg.timeout_secs = None,
        PromptAction::Set(value) => {
            let secs = value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    AppError::Validation(format!("'{value}' is not a positive number of seconds"))
                })?;
            cfg.timeout_secs = Some(secs);
        }
    }

    let current_require = cfg.require_issue.map(|flag| if flag { "yes" } else { "no" });
    match prompt(
        input,
        output,
        "Require an issue description (yes/no)",
        current_require,
        false,
    )? {
        PromptAction::Keep => {}
        PromptAction::Clear => cfg.require_issue = None,
        PromptAction::Set(value) => {
            cfg.require_issue = Some(match value.to_lowercase().as_str() {
                "yes" | "y" | "true" => true,
                "no" | "n" | "false" => false,
                _ => {
                    return Err(AppError::Validation(format!(
                        "'{value}' is not yes or no"
                    )));
                }
            });
        }
    }

    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("OpenAI API key: {}", mask_secret(&cfg.openai_api_key));
    println!("Model: {}", display_value(&cfg.model));
    println!("API base URL: {}", display_value(&cfg.base_url));
    println!("Reply format: {}", display_value(&cfg.reply_format));
    println!("Repeated label policy: {}", display_value(&cfg.duplicate_policy));
    println!(
        "Request timeout: {}",
        display_value(&cfg.timeout_secs.map(|secs| format!("{secs}s")))
    );
    println!(
        "Require issue: {}",
        display_value(&cfg.require_issue.map(|flag| flag.to_string()))
    );

    Ok(())
}
