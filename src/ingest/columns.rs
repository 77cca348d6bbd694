use crate::error::ScanError;

/// Header names recognized by the structured parser, tried in this order.
pub const KNOWN_COLUMNS: [&str; 8] = [
    "message", "Message", "text", "Text", "content", "Content", "email", "Email",
];

/// Lowercased names recognized by the raw fallback parser.
pub const FALLBACK_COLUMNS: [&str; 4] = ["message", "text", "content", "email"];

/// One step of the message-column detection chain. Matchers are evaluated
/// in sequence and the first hit wins, which keeps each fallback auditable
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMatcher {
    /// Walk the candidate list in order, looking for an exact header match.
    ExactCandidates,
    /// Walk the headers in order, matching lowercased names.
    CaseInsensitive,
    /// First header whose lowercased name is not "label".
    FirstNonLabel,
}

impl ColumnMatcher {
    pub fn locate(&self, headers: &[String]) -> Option<usize> {
        match self {
            ColumnMatcher::ExactCandidates => KNOWN_COLUMNS
                .iter()
                .find_map(|name| headers.iter().position(|h| h == name)),
            ColumnMatcher::CaseInsensitive => headers
                .iter()
                .position(|h| FALLBACK_COLUMNS.contains(&h.to_lowercase().as_str())),
            ColumnMatcher::FirstNonLabel => {
                headers.iter().position(|h| h.to_lowercase() != "label")
            }
        }
    }
}

pub fn resolve_message_column(
    headers: &[String],
    matchers: &[ColumnMatcher],
) -> Result<usize, ScanError> {
    matchers
        .iter()
        .find_map(|m| m.locate(headers))
        .ok_or_else(|| ScanError::ColumnNotFound {
            headers: headers.to_vec(),
        })
}
