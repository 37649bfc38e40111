use crate::domain::ticket::TicketRequest;

pub const SYSTEM_PROMPT: &str = "You are a friendly and professional IT helpdesk assistant \
    helping to write support tickets.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFormat {
    #[default]
    Lines,
    Json,
}

impl ReplyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyFormat::Lines => "lines",
            ReplyFormat::Json => "json",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lines" | "text" => Some(ReplyFormat::Lines),
            "json" => Some(ReplyFormat::Json),
            _ => None,
        }
    }
}

/// Builds the user prompt sent alongside [`SYSTEM_PROMPT`].
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    format: ReplyFormat,
}

impl PromptBuilder {
    pub fn new(format: ReplyFormat) -> Self {
        Self { format }
    }

    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn build(&self, request: &TicketRequest) -> String {
        let mut prompt = String::from(
            "Using the information below, do the following:\n\n\
             1. Generate a short, descriptive ticket name. Do not include personal names.\n\
             2. Write one short paragraph summarizing the issue based on the description.\n\n",
        );

        match self.format {
            ReplyFormat::Lines => prompt.push_str(
                "Format the reply exactly like this:\n\
                 Ticket Name: <generated ticket name>\n\
                 Details: <summary paragraph>\n\n",
            ),
            ReplyFormat::Json => prompt.push_str(
                "Reply with a single JSON object and nothing else, using these keys:\n\
                 {\"ticket_name\": \"<generated ticket name>\", \"username\": \"<username>\", \
                 \"location\": \"<location>\", \"description\": \"<summary paragraph>\"}\n\n",
            ),
        }

        prompt.push_str(&format!("Name: {}\n", request.name));
        prompt.push_str(&format!("Username: {}\n", request.username));
        prompt.push_str(&format!("ID Number: {}\n", request.identifier));
        prompt.push_str(&format!("Location: {}\n", request.location));
        prompt.push_str(&format!("Issue: {}\n", request.issue));
        prompt
    }
}
