use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::domain::prompt::{PromptBuilder, ReplyFormat};
use crate::domain::reply::{DuplicatePolicy, parse_reply};
use crate::domain::ticket::{TicketRequest, TicketResult};
use crate::error::{AppError, AppResult};
use crate::workflow::session::TicketSession;

#[derive(Debug, Clone, Copy, Default)]
pub struct TicketOptions {
    pub reply_format: ReplyFormat,
    pub duplicate_policy: DuplicatePolicy,
}

pub struct TicketWorkflowOutcome {
    pub result: TicketResult,
    pub raw_reply: String,
}

/// Runs one submission: validate, prompt, complete, parse, record.
/// The session is left untouched when any step fails.
pub async fn generate_ticket(
    ctx: &AppContext,
    session: &mut TicketSession,
    request: &TicketRequest,
    options: TicketOptions,
) -> AppResult<TicketWorkflowOutcome> {
    if ctx.config.require_issue && !request.has_issue() {
        return Err(AppError::Validation(
            "describe the issue before generating a ticket".to_string(),
        ));
    }

    let builder = PromptBuilder::new(options.reply_format);
    let prompt = builder.build(request);

    info!(
        format = options.reply_format.as_str(),
        "generating ticket summary"
    );
    let raw_reply = ctx
        .completion
        .generate_completion(builder.system_prompt(), &prompt)
        .await?;

    let result = parse_reply(&raw_reply, options.duplicate_policy);
    if result.ticket_name.is_empty() || result.details.is_empty() {
        warn!(
            policy = options.duplicate_policy.as_str(),
            "reply is missing a ticket name or details"
        );
    }

    session.record(result.clone());
    debug!(submissions = session.submissions(), "recorded ticket result");
    Ok(TicketWorkflowOutcome { result, raw_reply })
}
