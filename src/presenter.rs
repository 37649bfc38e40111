use std::fmt;

use crate::domain::ticket::{TicketField, TicketRequest, TicketResult};
use crate::services::ClipboardService;

const EMPTY_PLACEHOLDER: &str = "<empty>";

/// Editable view over one generated ticket plus the requester details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    ticket_name: String,
    name: String,
    username: String,
    identifier: String,
    location: String,
    details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { field: TicketField, chars: usize },
    Failed { field: TicketField, reason: String },
}

impl fmt::Display for CopyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyOutcome::Copied { field, chars } => {
                write!(f, "Copied {} to clipboard ({chars} characters).", field.label())
            }
            CopyOutcome::Failed { field, reason } => {
                write!(f, "Warning: could not copy {}: {reason}", field.label())
            }
        }
    }
}

impl TicketView {
    /// Username and location reported by the model win over the form values.
    pub fn new(request: &TicketRequest, result: &TicketResult) -> Self {
        let prefer = |reported: &str, entered: &str| {
            if reported.is_empty() {
                entered.trim().to_string()
            } else {
                reported.to_string()
            }
        };

        Self {
            ticket_name: result.ticket_name.clone(),
            name: request.name.trim().to_string(),
            username: prefer(&result.username, &request.username),
            identifier: request.identifier.trim().to_string(),
            location: prefer(&result.location, &request.location),
            details: result.details.clone(),
        }
    }

    pub fn field(&self, field: TicketField) -> &str {
        match field {
            TicketField::TicketName => &self.ticket_name,
            TicketField::Name => &self.name,
            TicketField::Username => &self.username,
            TicketField::Identifier => &self.identifier,
            TicketField::Location => &self.location,
            TicketField::Details => &self.details,
        }
    }

    pub fn edit(&mut self, field: TicketField, text: impl Into<String>) {
        let target = match field {
            TicketField::TicketName => &mut self.ticket_name,
            TicketField::Name => &mut self.name,
            TicketField::Username => &mut self.username,
            TicketField::Identifier => &mut self.identifier,
            TicketField::Location => &mut self.location,
            TicketField::Details => &mut self.details,
        };
        *target = text.into();
    }

    pub fn render(&self) -> String {
        let width = TicketField::ALL
            .iter()
            .map(|field| field.label().len() + 1)
            .max()
            .unwrap_or(0);

        let mut out = String::from("Ticket Generated\n");
        for field in TicketField::ALL {
            let value = self.field(field);
            let value = if value.is_empty() {
                EMPTY_PLACEHOLDER
            } else {
                value
            };
            let label = format!("{}:", field.label());
            out.push_str(&format!("  {label:<width$} {value}\n"));
        }
        out
    }

    /// Writes the field's current text to the clipboard. Failure is reported, not raised.
    pub async fn copy(&self, field: TicketField, clipboard: &dyn ClipboardService) -> CopyOutcome {
        let text = self.field(field);
        match clipboard.write_text(text).await {
            Ok(()) => CopyOutcome::Copied {
                field,
                chars: text.chars().count(),
            },
            Err(err) => CopyOutcome::Failed {
                field,
                reason: err.to_string(),
            },
        }
    }
}
