/// Requester details and issue text collected from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketRequest {
    pub name: String,
    pub username: String,
    pub identifier: String,
    pub location: String,
    pub issue: String,
}

impl TicketRequest {
    pub fn has_issue(&self) -> bool {
        !self.issue.trim().is_empty()
    }
}

/// Fields extracted from a model reply. Anything the reply did not carry is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketResult {
    pub ticket_name: String,
    pub details: String,
    pub username: String,
    pub location: String,
}

impl TicketResult {
    pub fn is_empty(&self) -> bool {
        self.ticket_name.is_empty()
            && self.details.is_empty()
            && self.username.is_empty()
            && self.location.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    TicketName,
    Name,
    Username,
    Identifier,
    Location,
    Details,
}

impl TicketField {
    pub const ALL: [TicketField; 6] = [
        TicketField::TicketName,
        TicketField::Name,
        TicketField::Username,
        TicketField::Identifier,
        TicketField::Location,
        TicketField::Details,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketField::TicketName => "Ticket Name",
            TicketField::Name => "Name",
            TicketField::Username => "Username",
            TicketField::Identifier => "ID",
            TicketField::Location => "Location",
            TicketField::Details => "Details",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "ticket-name" | "ticket" | "title" => Some(TicketField::TicketName),
            "name" => Some(TicketField::Name),
            "username" | "user" => Some(TicketField::Username),
            "id" | "identifier" => Some(TicketField::Identifier),
            "location" | "room" => Some(TicketField::Location),
            "details" | "description" | "summary" => Some(TicketField::Details),
            _ => None,
        }
    }
}
