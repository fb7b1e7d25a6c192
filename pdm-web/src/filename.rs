//! Upload filename handling
//!
//! Uploaded names are reduced to a safe subset before they are used as a
//! path component inside the upload directory.

use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for batch uploads (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv"];

/// Prefix of every generated result file
pub const OUTPUT_PREFIX: &str = "output_";

/// True when the name has an allowed extension after its last dot
pub fn allowed_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed)),
        None => false,
    }
}

/// Reduce a client-supplied filename to `[A-Za-z0-9_.-]`
///
/// Letters are NFKD-decomposed and reduced to ASCII first (`é` becomes
/// `e`). Path separators become spaces, whitespace runs become a single `_`,
/// everything else outside the safe set is dropped, and leading/trailing
/// dots and underscores are stripped. The result never contains a path
/// separator and never starts with a dot; it may be empty.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    filtered.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Deterministic name of the result file for an already-sanitized input name
pub fn output_filename(input: &str) -> String {
    format!("{}{}", OUTPUT_PREFIX, input)
}
