/// Name normalization for comparing player names
///
/// Names from the search page, the teammates table and the player's own
/// guess rarely agree on accents or casing ("Nurkić" vs "nurkic"), so every
/// comparison goes through `normalize_name`.
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical comparison form of a name.
///
/// Compatibility-decomposes, drops combining marks, lower-cases and trims.
/// The decomposition runs again after lower-casing because a few lowercase
/// mappings (e.g. 'İ') introduce combining marks of their own; this keeps
/// the function idempotent.
pub fn normalize_name(name: &str) -> String {
    let lowered = strip_marks(name).to_lowercase();
    strip_marks(&lowered).trim().to_string()
}

fn strip_marks(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}
