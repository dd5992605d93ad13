//! URL-safe slugs for post ids, tag pages and author pages

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Anything that is not a word character, whitespace or a hyphen
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").expect("static regex");
    static ref SEPARATORS: Regex = Regex::new(r"[-\s]+").expect("static regex");
}

/// Turn arbitrary text into a URL-safe token
///
/// Punctuation and symbols are removed outright, so "O'Brien" becomes
/// "obrien" rather than "o-brien". With `allow_unicode` unset the rest is
/// transliterated to ASCII and the result only ever contains `[a-z0-9-]`.
/// With it set, the text is NFKC-normalized and Unicode letters and digits
/// survive (lowercased). Runs of whitespace and hyphens collapse to a single
/// hyphen and the result never starts or ends with one.
///
/// Distinct inputs can map to the same slug ("C++" and "C") and are not
/// disambiguated.
///
/// # Examples
/// ```ignore
/// slugify("Hello, World!", false) // -> "hello-world"
/// ```
pub fn slugify(text: &str, allow_unicode: bool) -> String {
    if !allow_unicode {
        return slug::slugify(NON_WORD.replace_all(text, ""));
    }

    let normalized: String = text.nfkc().collect();
    let stripped = NON_WORD.replace_all(&normalized, "");
    let lowered = stripped.trim().to_lowercase();
    SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
