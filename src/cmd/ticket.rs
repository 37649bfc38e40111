use std::io::{self, BufRead, Write};

use crate::cmd::input::{PromptAction, ask, prompt};
use crate::cmd::report_error;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::prompt::ReplyFormat;
use crate::domain::reply::DuplicatePolicy;
use crate::domain::ticket::{TicketField, TicketRequest};
use crate::error::{AppError, AppResult};
use crate::presenter::TicketView;
use crate::workflow::session::TicketSession;
use crate::workflow::ticket::{TicketOptions, generate_ticket};

#[derive(Debug, Clone, Default)]
pub struct TicketCommandArgs {
    pub name: Option<String>,
    pub username: Option<String>,
    pub identifier: Option<String>,
    pub location: Option<String>,
    pub issue: Option<String>,
    pub format: Option<String>,
    pub duplicates: Option<String>,
    pub copy: Vec<String>,
    pub review: bool,
    pub raw: bool,
    pub no_input: bool,
    pub debug: bool,
}

pub async fn run(ctx: &AppContext, args: TicketCommandArgs) -> AppResult<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_with(ctx, args, &mut input, &mut output).await
}

pub async fn run_with<R: BufRead, W: Write>(
    ctx: &AppContext,
    args: TicketCommandArgs,
    input: &mut R,
    output: &mut W,
) -> AppResult<()> {
    let options = resolve_options(
        &ctx.config,
        args.format.as_deref(),
        args.duplicates.as_deref(),
    )?;
    let copy_fields = parse_fields(&args.copy)?;

    let request = collect_request(&args, input, output)?;
    let mut session = TicketSession::new();
    let outcome = generate_ticket(ctx, &mut session, &request, options).await?;

    if args.raw {
        writeln!(output, "Raw reply:\n{}\n", outcome.raw_reply)?;
    }
    if outcome.result.is_empty() {
        eprintln!(
            "Warning: the reply contained no ticket fields; rerun with --raw to inspect it."
        );
    }

    let mut view = present(&session, &request);
    write!(output, "{}", view.render())?;

    for field in copy_fields {
        writeln!(output, "{}", view.copy(field, ctx.clipboard.as_ref()).await)?;
    }

    if args.review {
        review(
            ctx,
            &mut session,
            &request,
            options,
            &mut view,
            args.debug,
            input,
            output,
        )
        .await?;
    }

    Ok(())
}

pub fn resolve_options(
    config: &AppConfig,
    format: Option<&str>,
    duplicates: Option<&str>,
) -> AppResult<TicketOptions> {
    let reply_format = match format {
        Some(value) => ReplyFormat::from_str(value).ok_or_else(|| {
            AppError::Validation(format!("unknown reply format '{value}' (use lines or json)"))
        })?,
        None => config.reply_format,
    };
    let duplicate_policy = match duplicates {
        Some(value) => parse_policy(value)?,
        None => config.duplicate_policy,
    };
    Ok(TicketOptions {
        reply_format,
        duplicate_policy,
    })
}

pub fn parse_policy(value: &str) -> AppResult<DuplicatePolicy> {
    DuplicatePolicy::from_str(value).ok_or_else(|| {
        AppError::Validation(format!("unknown duplicate policy '{value}' (use first or last)"))
    })
}

fn parse_fields(values: &[String]) -> AppResult<Vec<TicketField>> {
    values
        .iter()
        .map(|value| {
            TicketField::from_str(value)
                .ok_or_else(|| AppError::Validation(format!("unknown field '{value}'")))
        })
        .collect()
}

fn collect_request<R: BufRead, W: Write>(
    args: &TicketCommandArgs,
    input: &mut R,
    output: &mut W,
) -> AppResult<TicketRequest> {
    let mut field = |value: &Option<String>, label: &str| -> AppResult<String> {
        match value {
            Some(value) => Ok(value.clone()),
            None if args.no_input => Ok(String::new()),
            None => Ok(ask(input, output, label)?.unwrap_or_default()),
        }
    };

    Ok(TicketRequest {
        name: field(&args.name, "Name: ")?,
        username: field(&args.username, "Username: ")?,
        identifier: field(&args.identifier, "ID Number: ")?,
        location: field(&args.location, "Location: ")?,
        issue: field(&args.issue, "Describe the issue: ")?,
    })
}

/// Builds the view from the session's latest result.
fn present(session: &TicketSession, request: &TicketRequest) -> TicketView {
    let result = session.last().cloned().unwrap_or_default();
    TicketView::new(request, &result)
}

const REVIEW_HELP: &str =
    "Commands: show | copy <field> | edit <field> | regenerate | done\n\
     Fields: ticket-name, name, username, id, location, details";

#[allow(clippy::too_many_arguments)]
async fn review<R: BufRead, W: Write>(
    ctx: &AppContext,
    session: &mut TicketSession,
    request: &TicketRequest,
    options: TicketOptions,
    view: &mut TicketView,
    debug: bool,
    input: &mut R,
    output: &mut W,
) -> AppResult<()> {
    writeln!(output, "{REVIEW_HELP}")?;

    while let Some(line) = ask(input, output, "> ")? {
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line.as_str(), ""),
        };

        match command.to_lowercase().as_str() {
            "" => {}
            "done" | "quit" | "exit" => break,
            "show" => write!(output, "{}", view.render())?,
            "copy" => match TicketField::from_str(argument) {
                Some(field) => {
                    writeln!(output, "{}", view.copy(field, ctx.clipboard.as_ref()).await)?
                }
                None => writeln!(output, "Unknown field '{argument}'.")?,
            },
            "edit" => match TicketField::from_str(argument) {
                Some(field) => {
                    let current = view.field(field).to_string();
                    match prompt(input, output, field.label(), Some(current.as_str()), false)? {
                        PromptAction::Keep => {}
                        PromptAction::Clear => view.edit(field, ""),
                        PromptAction::Set(value) => view.edit(field, value),
                    }
                }
                None => writeln!(output, "Unknown field '{argument}'.")?,
            },
            "regenerate" => match generate_ticket(ctx, session, request, options).await {
                Ok(_) => {
                    *view = present(session, request);
                    write!(output, "{}", view.render())?;
                }
                Err(error) => report_error(&error, debug),
            },
            _ => writeln!(output, "{REVIEW_HELP}")?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use super::*;
    use crate::config::StoredConfig;
    use crate::test_support::{CannedCompletion, MemoryClipboard};

    fn context(
        completion: Arc<CannedCompletion>,
        clipboard: Arc<MemoryClipboard>,
    ) -> AppContext {
        let config = AppConfig::resolve(StoredConfig::default(), |_| None).unwrap();
        AppContext::new(config, completion, clipboard)
    }

    fn flag_args() -> TicketCommandArgs {
        TicketCommandArgs {
            name: Some("Dana Smith".to_string()),
            username: Some("dsmith".to_string()),
            identifier: Some("0042".to_string()),
            location: Some("Library 201".to_string()),
            issue: Some("Printer keeps jamming".to_string()),
            ..TicketCommandArgs::default()
        }
    }

    #[tokio::test]
    async fn prompts_for_missing_fields() {
        let completion = Arc::new(CannedCompletion::replying(&[
            "Ticket Name: Printer Jam\nDetails: Paper jam.",
        ]));
        let ctx = context(completion.clone(), Arc::new(MemoryClipboard::default()));
        let args = TicketCommandArgs {
            name: Some("Dana".to_string()),
            ..TicketCommandArgs::default()
        };
        let mut input = Cursor::new("dsmith\n0042\nRoom 5\nPrinter jams\n");
        let mut output = Vec::new();

        run_with(&ctx, args, &mut input, &mut output).await.unwrap();

        let prompt = &completion.calls()[0].1;
        assert!(prompt.contains("Name: Dana\n"));
        assert!(prompt.contains("Username: dsmith\n"));
        assert!(prompt.contains("Location: Room 5\n"));
        assert!(prompt.contains("Issue: Printer jams\n"));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Ticket Name: Printer Jam"));
    }

    #[tokio::test]
    async fn empty_issue_without_input_is_rejected() {
        let completion = Arc::new(CannedCompletion::replying(&["unused"]));
        let ctx = context(completion.clone(), Arc::new(MemoryClipboard::default()));
        let args = TicketCommandArgs {
            no_input: true,
            ..TicketCommandArgs::default()
        };

        let result = run_with(&ctx, args, &mut Cursor::new(""), &mut Vec::new()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(completion.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_copy_field_fails_before_calling_the_service() {
        let completion = Arc::new(CannedCompletion::replying(&["unused"]));
        let ctx = context(completion.clone(), Arc::new(MemoryClipboard::default()));
        let args = TicketCommandArgs {
            copy: vec!["priority".to_string()],
            ..flag_args()
        };

        let result = run_with(&ctx, args, &mut Cursor::new(""), &mut Vec::new()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(completion.calls().is_empty());
    }

    #[tokio::test]
    async fn copies_requested_fields() {
        let completion = Arc::new(CannedCompletion::replying(&[
            "Ticket Name: Printer Jam\nDetails: User reports paper jam on 3rd floor.",
        ]));
        let clipboard = Arc::new(MemoryClipboard::default());
        let ctx = context(completion, clipboard.clone());
        let args = TicketCommandArgs {
            copy: vec!["ticket-name".to_string(), "details".to_string()],
            ..flag_args()
        };
        let mut output = Vec::new();

        run_with(&ctx, args, &mut Cursor::new(""), &mut output).await.unwrap();

        assert_eq!(
            clipboard.contents().as_deref(),
            Some("User reports paper jam on 3rd floor.")
        );
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Copied Ticket Name to clipboard"));
        assert!(shown.contains("Copied Details to clipboard"));
    }

    #[tokio::test]
    async fn review_edits_copies_and_regenerates() {
        let completion = Arc::new(CannedCompletion::replying(&[
            "Ticket Name: Printer Jam\nDetails: First summary.",
            "Ticket Name: Printer Jam Again\nDetails: Second summary.",
        ]));
        let clipboard = Arc::new(MemoryClipboard::default());
        let ctx = context(completion.clone(), clipboard.clone());
        let args = TicketCommandArgs {
            review: true,
            ..flag_args()
        };
        let mut input = Cursor::new(
            "edit ticket-name\nJammed printer\ncopy ticket-name\nregenerate\ncopy details\ndone\n",
        );
        let mut output = Vec::new();

        run_with(&ctx, args, &mut input, &mut output).await.unwrap();

        assert_eq!(completion.calls().len(), 2);
        assert_eq!(clipboard.contents().as_deref(), Some("Second summary."));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Ticket Name: Printer Jam Again"));
        assert!(shown.contains("Copied Ticket Name to clipboard (14 characters)."));
    }

    #[test]
    fn flags_override_configured_options() {
        let config = AppConfig::resolve(StoredConfig::default(), |_| None).unwrap();
        let options = resolve_options(&config, Some("json"), Some("last")).unwrap();
        assert_eq!(options.reply_format, ReplyFormat::Json);
        assert_eq!(options.duplicate_policy, DuplicatePolicy::LastWins);

        let defaults = resolve_options(&config, None, None).unwrap();
        assert_eq!(defaults.reply_format, config.reply_format);
        assert!(resolve_options(&config, Some("xml"), None).is_err());
    }
}
