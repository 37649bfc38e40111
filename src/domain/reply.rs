//! Turns a free-text model reply into a [`TicketResult`].
//!
//! Parsing never fails: a reply that carries none of the expected fields
//! yields an empty result.
//!
//! A reply that opens with `{` (after any code fence) is read as a JSON
//! object, or scanned for quoted pairs when the object does not parse.
//! Anything else is read as labeled lines such as `Ticket Name: ...` and
//! `Details: ...`; an object embedded in prose is only consulted when no
//! label is found, so JSON-looking text inside a detail line stays text.

use serde_json::{Map, Value};

use crate::domain::ticket::TicketResult;

/// How a label that appears more than once is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    #[default]
    FirstWins,
    LastWins,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::FirstWins => "first",
            DuplicatePolicy::LastWins => "last",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "first" | "first-wins" => Some(DuplicatePolicy::FirstWins),
            "last" | "last-wins" => Some(DuplicatePolicy::LastWins),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    TicketName,
    Details,
    Username,
    Location,
}

const JSON_KEYS: [(&str, Slot); 5] = [
    ("ticket_name", Slot::TicketName),
    ("description", Slot::Details),
    ("details", Slot::Details),
    ("username", Slot::Username),
    ("location", Slot::Location),
];

const LINE_LABELS: [(&str, Slot); 5] = [
    ("ticket name:", Slot::TicketName),
    ("details:", Slot::Details),
    ("description:", Slot::Details),
    ("username:", Slot::Username),
    ("location:", Slot::Location),
];

/// Collects candidate values per field and keeps one according to the policy.
/// Blank candidates are ignored.
struct FieldReducer {
    policy: DuplicatePolicy,
    result: TicketResult,
}

impl FieldReducer {
    fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            result: TicketResult::default(),
        }
    }

    fn offer(&mut self, slot: Slot, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let target = match slot {
            Slot::TicketName => &mut self.result.ticket_name,
            Slot::Details => &mut self.result.details,
            Slot::Username => &mut self.result.username,
            Slot::Location => &mut self.result.location,
        };
        if self.policy == DuplicatePolicy::LastWins || target.is_empty() {
            *target = value.to_string();
        }
    }

    fn finish(self) -> TicketResult {
        self.result
    }
}

pub fn parse_reply(reply: &str, policy: DuplicatePolicy) -> TicketResult {
    let body = strip_code_fence(reply);

    if body.starts_with('{') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
            return from_json_map(&map, policy);
        }
        let result = scan_quoted_pairs(body, policy);
        if !result.is_empty() {
            return result;
        }
        return parse_labeled_lines(body, policy);
    }

    let result = parse_labeled_lines(body, policy);
    if !result.is_empty() {
        return result;
    }
    parse_embedded_json(body, policy)
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(index) => &rest[index + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Reads an object that starts after some prose, e.g. "Here is the ticket: {...}".
fn parse_embedded_json(body: &str, policy: DuplicatePolicy) -> TicketResult {
    let Some(start) = body.find('{') else {
        return TicketResult::default();
    };
    let tail = &body[start..];

    if let Some(end) = tail.rfind('}') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&tail[..=end]) {
            let result = from_json_map(&map, policy);
            if !result.is_empty() {
                return result;
            }
        }
    }
    scan_quoted_pairs(tail, policy)
}

fn from_json_map(map: &Map<String, Value>, policy: DuplicatePolicy) -> TicketResult {
    let mut reducer = FieldReducer::new(policy);
    for (key, slot) in JSON_KEYS {
        if let Some(value) = map.get(key) {
            reducer.offer(slot, &json_text(value));
        }
    }
    reducer.finish()
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn scan_quoted_pairs(body: &str, policy: DuplicatePolicy) -> TicketResult {
    let mut found = Vec::new();
    for (key, slot) in JSON_KEYS {
        let needle = format!("\"{key}\"");
        for (index, _) in body.match_indices(&needle) {
            if let Some(value) = read_quoted_value(&body[index + needle.len()..]) {
                found.push((index, slot, value));
            }
        }
    }
    found.sort_by_key(|(index, _, _)| *index);

    let mut reducer = FieldReducer::new(policy);
    for (_, slot, value) in found {
        reducer.offer(slot, &value);
    }
    reducer.finish()
}

/// Reads `: "value"` from the start of `text`. An unterminated string keeps
/// whatever was read before the reply ended.
fn read_quoted_value(text: &str) -> Option<String> {
    let rest = text
        .trim_start()
        .strip_prefix(':')?
        .trim_start()
        .strip_prefix('"')?;

    let mut value = String::new();
    let mut chars = rest.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => return Some(value),
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => {}
                Some('u') => {
                    let code: String = chars.by_ref().take(4).collect();
                    if let Some(decoded) = u32::from_str_radix(&code, 16)
                        .ok()
                        .and_then(char::from_u32)
                    {
                        value.push(decoded);
                    }
                }
                Some(other) => value.push(other),
                None => break,
            },
            other => value.push(other),
        }
    }
    Some(value)
}

fn parse_labeled_lines(body: &str, policy: DuplicatePolicy) -> TicketResult {
    let mut reducer = FieldReducer::new(policy);
    let mut lines = body.lines().peekable();

    while let Some(line) = lines.next() {
        let Some((slot, value)) = split_label(line) else {
            continue;
        };

        if slot == Slot::Details && value.is_empty() {
            let mut paragraph: Vec<&str> = Vec::new();
            while let Some(&next) = lines.peek() {
                if split_label(next).is_some() {
                    break;
                }
                let next = next.trim();
                if next.is_empty() && !paragraph.is_empty() {
                    break;
                }
                if !next.is_empty() {
                    paragraph.push(next);
                }
                lines.next();
            }
            reducer.offer(slot, &paragraph.join(" "));
        } else {
            reducer.offer(slot, value);
        }
    }

    reducer.finish()
}

fn split_label(line: &str) -> Option<(Slot, &str)> {
    let cleaned = line.trim_start_matches(|c: char| c.is_whitespace() || "*_#-".contains(c));
    LINE_LABELS.iter().find_map(|(label, slot)| {
        let prefix = cleaned.get(..label.len())?;
        if !prefix.eq_ignore_ascii_case(label) {
            return None;
        }
        let value = cleaned[label.len()..].trim_matches(|c: char| c.is_whitespace() || c == '*');
        Some((*slot, value))
    })
}
