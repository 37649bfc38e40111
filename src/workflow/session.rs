use crate::domain::ticket::TicketResult;

/// Holds the most recent parsed result for as long as the caller keeps it.
/// Each successful submission replaces it wholesale; it is read-only otherwise.
#[derive(Debug, Default)]
pub struct TicketSession {
    last: Option<TicketResult>,
    submissions: usize,
}

impl TicketSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: TicketResult) -> &TicketResult {
        self.submissions += 1;
        self.last.insert(result)
    }

    pub fn last(&self) -> Option<&TicketResult> {
        self.last.as_ref()
    }

    pub fn submissions(&self) -> usize {
        self.submissions
    }
}
