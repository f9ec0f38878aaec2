//! Patch subject grammar
//!
//! Patches posted to the list carry a bracketed tag in front of the summary:
//! - [PATCH 0/5] Cover letter describing the series
//! - [PATCH v2 3/5] Third patch of the second posting
//! - [ARM PATCH for-4.5 v3 1/2] Project-tagged patch aimed at a release
//!
//! Grammar of the tag, whitespace allowed between items:
//!
//! ```text
//! '[' TAG* PATCH TAG* ( 'for' ('-' | ' ') N '.' N )? ( 'v' N )? ( N '/' N )? ']' bare-subject
//! ```
//!
//! Anything before the bracket (reply prefixes, list tags) is ignored.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::error::SubjectParseError;

/// Lazy-initialized regex for the full patch subject grammar
static PATCH_SUBJECT_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get the compiled patch subject regex
///
/// The greedy `^.*\[` prefers the last bracket that still yields a match, so
/// reply prefixes and nested tags fall away. Optional groups are resolved the
/// same way: `v21/2` reads as version 2, patch 1 of 2.
///
/// Project tags (OSSTEST, MINI-OS, raisin, iommu, OPW, ARM) may surround
/// `PATCH`; any other word inside the brackets fails the match.
fn get_patch_subject_regex() -> &'static Regex {
    PATCH_SUBJECT_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"(?is)^.*\[\s*",
            r"(?:(?:OSSTEST|MINI-OS|raisin|iommu|OPW|ARM)\s*)*",
            r"PATCH\s*",
            r"(?:(?:OSSTEST|MINI-OS|raisin|iommu|OPW|ARM)\s*)*",
            r"(?:\s+for[-\s][0-9]+\.[0-9]+)?\s*",
            r"(?:v(?P<version>[0-9]+))?\s*",
            r"(?:(?P<num>[0-9]+)/(?P<total>[0-9]+))?\s*",
            r"\]\s*(?P<subject>.*\S.*)$",
        ))
        .expect("Invalid patch subject regex")
    })
}

/// Fields recovered from a patch subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSubject {
    /// Posting version, 1 when no `vN` marker is present
    pub version: u32,
    /// Position in the series; absent without an `M/N` marker or when `M` is 0
    pub sequence_number: Option<u32>,
    /// Declared number of patches in the posting
    pub total: Option<u32>,
    /// Subject text after the tag, trimmed
    pub bare_subject: String,
}

impl PatchSubject {
    /// Whether the subject announces a series rather than one patch
    pub fn is_cover_letter(&self) -> bool {
        self.sequence_number.is_none()
    }
}

/// Coarse check that a thread root looks like `[PATCH ...] ...`
pub fn is_patch_thread(subject: &str) -> bool {
    subject
        .strip_prefix("[PATCH")
        .and_then(|rest| rest.find(']').map(|pos| pos + 1 < rest.len()))
        .unwrap_or(false)
}

/// Parse a patch subject line
///
/// The bare subject is trimmed, and a tag followed only by whitespace does
/// not count as a patch subject. `vN` is taken as written, `v0` included.
/// Numbers too large for `u32` saturate.
///
/// ```rust
/// use patch_tracker::patches::parse_patch_subject;
///
/// let parsed = parse_patch_subject("[PATCH v2 2/3] Fix bug").unwrap();
/// assert_eq!(parsed.version, 2);
/// assert_eq!(parsed.sequence_number, Some(2));
/// assert_eq!(parsed.total, Some(3));
/// assert_eq!(parsed.bare_subject, "Fix bug");
///
/// assert!(parse_patch_subject("Re: question about Xen").is_err());
/// ```
pub fn parse_patch_subject(subject: &str) -> Result<PatchSubject, SubjectParseError> {
    let caps = get_patch_subject_regex()
        .captures(subject)
        .ok_or_else(|| SubjectParseError::new(subject))?;

    let version = capture_number(&caps, "version").unwrap_or(1);
    let total = capture_number(&caps, "total");
    let sequence_number = capture_number(&caps, "num").filter(|num| *num != 0);
    let bare_subject = caps
        .name("subject")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Ok(PatchSubject {
        version,
        sequence_number,
        total,
        bare_subject,
    })
}

fn capture_number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name).map(|m| m.as_str().parse().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(subject: &str) -> PatchSubject {
        parse_patch_subject(subject).unwrap()
    }

    #[test]
    fn test_cover_letter() {
        let parsed = parse("[PATCH 0/3] Improve scheduler");
        assert_eq!(
            parsed,
            PatchSubject {
                version: 1,
                sequence_number: None,
                total: Some(3),
                bare_subject: "Improve scheduler".to_string(),
            }
        );
        assert!(parsed.is_cover_letter());
    }

    #[test]
    fn test_versioned_patch() {
        let parsed = parse("[PATCH v2 2/3] Fix bug");
        assert_eq!(parsed.version, 2);
        assert_eq!(parsed.sequence_number, Some(2));
        assert_eq!(parsed.total, Some(3));
        assert_eq!(parsed.bare_subject, "Fix bug");
        assert!(!parsed.is_cover_letter());
    }

    #[test]
    fn test_single_patch_without_marker() {
        let parsed = parse("[PATCH] xen: fix crash");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.sequence_number, None);
        assert_eq!(parsed.total, None);
        assert_eq!(parsed.bare_subject, "xen: fix crash");
    }

    #[test]
    fn test_malformed_subject() {
        let err = parse_patch_subject("Re: question about Xen").unwrap_err();
        assert_eq!(err.subject, "Re: question about Xen");
    }

    #[test]
    fn test_reply_prefix_ignored() {
        let parsed = parse("Re: [PATCH v3 1/4] x86: tidy up");
        assert_eq!(parsed.version, 3);
        assert_eq!(parsed.sequence_number, Some(1));
        assert_eq!(parsed.bare_subject, "x86: tidy up");
    }

    #[test]
    fn test_project_tags() {
        let parsed = parse("[OSSTEST PATCH 2/7] ts-kernel-build: enable foo");
        assert_eq!(parsed.sequence_number, Some(2));
        assert_eq!(parsed.total, Some(7));

        let parsed = parse("[PATCH ARM v4] gic: fix");
        assert_eq!(parsed.version, 4);
        assert_eq!(parsed.bare_subject, "gic: fix");

        let parsed = parse("[MINI-OS PATCH] console: fix");
        assert_eq!(parsed.bare_subject, "console: fix");
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!(parse_patch_subject("[RFC PATCH] idea").is_err());
    }

    #[test]
    fn test_release_qualifier() {
        let parsed = parse("[PATCH for-4.5 v2 1/2] libxl: fix leak");
        assert_eq!(parsed.version, 2);
        assert_eq!(parsed.sequence_number, Some(1));
        assert_eq!(parsed.bare_subject, "libxl: fix leak");

        let parsed = parse("[PATCH for 4.6] tools: bump");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.bare_subject, "tools: bump");
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let parsed = parse("[patch V5 3/3] lower case");
        assert_eq!(parsed.version, 5);
        assert_eq!(parsed.sequence_number, Some(3));
    }

    #[test]
    fn test_compact_version() {
        let parsed = parse("[PATCHv2] compact");
        assert_eq!(parsed.version, 2);
    }

    #[test]
    fn test_last_bracket_wins() {
        let parsed = parse("[PATCH 1/2] Re: [PATCH v2 2/2] nested");
        assert_eq!(parsed.version, 2);
        assert_eq!(parsed.sequence_number, Some(2));
        assert_eq!(parsed.bare_subject, "nested");
    }

    #[test]
    fn test_falls_back_to_earlier_bracket() {
        let parsed = parse("[PATCH 1/2] handle [foo] arrays");
        assert_eq!(parsed.sequence_number, Some(1));
        assert_eq!(parsed.bare_subject, "handle [foo] arrays");
    }

    #[test]
    fn test_empty_bare_subject_rejected() {
        assert!(parse_patch_subject("[PATCH 1/2]   ").is_err());
    }

    #[test]
    fn test_garbage_inside_tag_rejected() {
        assert!(parse_patch_subject("[PATCH net-next] foo").is_err());
        assert!(parse_patch_subject("[PATCH 1/] foo").is_err());
    }

    #[test]
    fn test_thread_acceptance() {
        assert!(is_patch_thread("[PATCH] x"));
        assert!(is_patch_thread("[PATCH v2 1/3] Add foo"));
        assert!(is_patch_thread("[PATCHv2] compact"));
        assert!(!is_patch_thread("[PATCH]"));
        assert!(!is_patch_thread("Re: [PATCH] x"));
        assert!(!is_patch_thread("[patch] lower"));
        assert!(!is_patch_thread("[PATCH missing bracket"));
    }

    #[test]
    fn test_version_and_number_run_together() {
        let parsed = parse("[PATCH v21/2] Fix bug");
        assert_eq!(parsed.version, 2);
        assert_eq!(parsed.sequence_number, Some(1));
        assert_eq!(parsed.total, Some(2));
        assert_eq!(parsed.bare_subject, "Fix bug");
    }

    #[test]
    fn test_oversized_numbers_saturate() {
        let parsed = parse("[PATCH 1/99999999999] Fix bug");
        assert_eq!(parsed.sequence_number, Some(1));
        assert_eq!(parsed.total, Some(u32::MAX));
    }

    #[test]
    fn test_version_zero_kept_as_written() {
        let parsed = parse("[PATCH v0 1/1] Fix bug");
        assert_eq!(parsed.version, 0);
        assert_eq!(parsed.sequence_number, Some(1));
    }

    #[test]
    fn test_bare_subject_trimmed() {
        let parsed = parse("[PATCH 2/2]   spaced out  ");
        assert_eq!(parsed.bare_subject, "spaced out");
    }
}
