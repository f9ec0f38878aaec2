//! Subject cleanup applied while messages are ingested
//!
//! Archived subjects carry folded-header newlines, stray tabs, and list tags
//! in front of the patch tag (`[Xen-devel] Re: [patch ...`). Cleaning puts
//! the patch tag back at the start so the thread acceptance test sees it.

use regex::Regex;
use std::sync::OnceLock;

static LIST_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Matches a `[Xen-devel]` list tag up to the last following patch tag
fn get_list_tag_regex() -> &'static Regex {
    LIST_TAG_REGEX.get_or_init(|| {
        Regex::new(r"\[Xen-devel\].*\[[Pp][Aa][Tt][Cc][Hh]").expect("Invalid list tag regex")
    })
}

/// Clean a raw subject line
///
/// - newlines become single spaces
/// - tabs are removed
/// - `[Xen-devel] ... [patch` is rewritten to `[PATCH`
///
/// ```rust
/// use patch_tracker::threading::clean_subject;
///
/// assert_eq!(
///     clean_subject("[Xen-devel] [patch v2 1/2] xen: fix\n foo"),
///     "[PATCH v2 1/2] xen: fix  foo"
/// );
/// ```
pub fn clean_subject(subject: &str) -> String {
    let flattened = subject.replace('\n', " ").replace('\t', "");

    get_list_tag_regex()
        .replace(&flattened, "[PATCH")
        .into_owned()
}
