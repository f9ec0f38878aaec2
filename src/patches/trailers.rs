//! Trailer extraction
//!
//! Review and provenance metadata travels in message bodies as trailer lines
//! such as `Reviewed-by: Jane <jane@example.org>`. Each known tag is matched by
//! a line prefix; the rest of the line becomes the flag value.

use chrono::NaiveDateTime;

use crate::models::{Flag, FlagKind};

/// Known trailers and the line prefixes that introduce them, in match order
pub const TRAILER_TABLE: [(FlagKind, &[&str]); 10] = [
    (FlagKind::AckedBy, &["Acked-by:"]),
    (FlagKind::Cc, &["Cc:"]),
    (FlagKind::Fixes, &["Fixes:"]),
    (FlagKind::From, &["From:", "from:"]),
    (FlagKind::ReportedBy, &["Reported-by:"]),
    (FlagKind::TestedBy, &["Tested-by:"]),
    (FlagKind::ReviewedBy, &["Reviewed-by:"]),
    (FlagKind::ReleaseAckedBy, &["Release-Acked-by:"]),
    (FlagKind::SignedOffBy, &["Signed-off-by:"]),
    (FlagKind::SuggestedBy, &["Suggested-by:"]),
];

/// Match one line against every table entry
///
/// Returns one `(kind, value)` pair per matching entry. Values are trimmed,
/// and a prefix followed only by whitespace yields nothing.
pub fn match_trailer_line(line: &str) -> Vec<(FlagKind, &str)> {
    TRAILER_TABLE
        .iter()
        .filter_map(|(kind, prefixes)| {
            prefixes
                .iter()
                .find_map(|prefix| line.strip_prefix(prefix))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| (*kind, value))
        })
        .collect()
}

/// Extract every trailer flag from a message body
///
/// All flags carry the owning message's date.
pub fn extract_trailers(body: &str, date: NaiveDateTime, tz_offset: i32) -> Vec<Flag> {
    body.split('\n')
        .flat_map(match_trailer_line)
        .map(|(kind, value)| Flag {
            kind,
            value: value.to_string(),
            date,
            tz_offset,
        })
        .collect()
}
