use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use crate::cmd::ticket::parse_policy;
use crate::domain::reply::{DuplicatePolicy, parse_reply};
use crate::domain::ticket::TicketRequest;
use crate::error::AppResult;
use crate::presenter::TicketView;

#[derive(Debug, Clone, Default)]
pub struct ParseCommandArgs {
    pub file: Option<PathBuf>,
    pub duplicates: Option<String>,
}

/// Parses a saved model reply without contacting the completion service.
pub fn run(args: ParseCommandArgs, default_policy: DuplicatePolicy) -> AppResult<()> {
    let reply = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let view = present(&reply, args.duplicates.as_deref(), default_policy)?;
    write!(io::stdout(), "{}", view.render())?;
    Ok(())
}

fn present(
    reply: &str,
    duplicates: Option<&str>,
    default_policy: DuplicatePolicy,
) -> AppResult<TicketView> {
    let policy = match duplicates {
        Some(value) => parse_policy(value)?,
        None => default_policy,
    };
    let result = parse_reply(reply, policy);
    Ok(TicketView::new(&TicketRequest::default(), &result))
}
