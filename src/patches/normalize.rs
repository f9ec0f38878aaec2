//! Subject keys for correlating patches with commits
//!
//! A commit's first message line and a patch's bare subject rarely match
//! byte for byte: commit lines carry `component: ` prefixes, trailing
//! periods, and punctuation that mail subjects drop or change. Both sides are
//! reduced to the same canonical key before lookup.

/// Characters removed entirely from a key
const STRIPPED_CHARS: [char; 6] = ['/', ' ', '\n', '\t', '.', '_'];

/// Normalize free text into a matching key
///
/// ## Steps
///
/// 1. Lowercase
/// 2. Replace double quotes with single quotes
/// 3. Drop one trailing period
/// 4. If `": "` occurs, drop everything up to and including its last occurrence
/// 5. Remove `/`, space, newline, tab, `.`, `_`
/// 6. Trim surrounding whitespace
///
/// The function is total and idempotent.
///
/// ```rust
/// use patch_tracker::patches::normalize_key;
///
/// assert_eq!(normalize_key("xen/arm: fix foo.bar."), "fixfoobar");
/// assert_eq!(normalize_key("Fix \"quoted\" thing"), "fix'quoted'thing");
/// ```
pub fn normalize_key(text: &str) -> String {
    let mut key = text.to_lowercase().replace('"', "'");

    if key.ends_with('.') {
        key.pop();
    }

    if let Some(pos) = key.rfind(": ") {
        key.drain(..pos + 2);
    }

    key.retain(|c| !STRIPPED_CHARS.contains(&c));
    key.trim().to_string()
}
