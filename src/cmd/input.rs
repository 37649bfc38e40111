use std::io::{BufRead, Write};

use crate::error::AppResult;

pub enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

/// Prints `label` and reads one trimmed line. `None` means the input ended.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> AppResult<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Asks for a replacement value. Enter keeps the current one, '-' clears it.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    field: &str,
    current: Option<&str>,
    secret: bool,
) -> AppResult<PromptAction> {
    let label = match (current, secret) {
        (Some(_), true) => format!("{field} [****] (Enter to keep, '-' to clear): "),
        (Some(value), false) => format!("{field} [{value}] (Enter to keep, '-' to clear): "),
        (None, _) => format!("{field} (Enter to skip): "),
    };

    let answer = ask(input, output, &label)?.unwrap_or_default();
    if answer.is_empty() {
        Ok(PromptAction::Keep)
    } else if answer == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(answer))
    }
}

pub fn apply_prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    field: &str,
    target: &mut Option<String>,
    secret: bool,
) -> AppResult<()> {
    match prompt(input, output, field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

pub fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

pub fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
