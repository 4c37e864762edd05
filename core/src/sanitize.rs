#![deny(missing_docs)]

//! # Name Sanitization
//!
//! Turns user-chosen entity names into filesystem-safe path segments.
//!
//! Names are NFKD-normalized first so that accented letters decompose into a
//! base letter plus combining marks, and the marks are then dropped
//! (`Crème` -> `Creme`). Every remaining character outside the allowed set is
//! replaced, runs of the replacement are collapsed and the edges trimmed.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Placeholder used when a name sanitizes down to nothing.
pub const EMPTY_NAME: &str = "unnamed";

/// Per-use-site sanitization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Character substituted for every disallowed character.
    pub replacement: char,
    /// Case-fold the result to lowercase.
    pub lowercase: bool,
    /// Punctuation allowed in addition to ASCII alphanumerics.
    pub extra_allowed: &'static str,
}

impl SanitizeOptions {
    /// File names: case-preserving, allows `.`, `_` and `-`.
    pub const FILENAME: SanitizeOptions = SanitizeOptions {
        replacement: '_',
        lowercase: false,
        extra_allowed: "._-",
    };

    /// Identifiers and directory segments: lowercase, `a-z0-9_-` only.
    pub const IDENTIFIER: SanitizeOptions = SanitizeOptions {
        replacement: '_',
        lowercase: true,
        extra_allowed: "_-",
    };

    fn allows(&self, c: char) -> bool {
        if self.lowercase && c.is_ascii_uppercase() {
            return false;
        }
        c.is_ascii_alphanumeric() || self.extra_allowed.contains(c)
    }
}

/// Sanitizes a single name. Never returns an empty string.
pub fn sanitize(input: &str, options: &SanitizeOptions) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_replacement = false;

    for c in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        let c = if options.lowercase {
            c.to_ascii_lowercase()
        } else {
            c
        };

        if options.allows(c) && c != options.replacement {
            out.push(c);
            last_was_replacement = false;
        } else if !last_was_replacement {
            out.push(options.replacement);
            last_was_replacement = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == options.replacement || c == '.');
    if trimmed.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitizes a `/`-separated name segment by segment.
///
/// Empty segments are dropped, so `"/users/{id}"` becomes `"users/id"`.
pub fn sanitize_path(input: &str, options: &SanitizeOptions) -> String {
    let segments: Vec<String> = input
        .split('/')
        .filter(|s| !s.trim().is_empty())
        .map(|s| sanitize(s, options))
        .collect();

    if segments.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        segments.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_lowercases_and_strips_diacritics() {
        assert_eq!(sanitize("Crème Brûlée", &SanitizeOptions::IDENTIFIER), "creme_brulee");
        assert_eq!(sanitize("Shop", &SanitizeOptions::IDENTIFIER), "shop");
        assert_eq!(sanitize("list-items", &SanitizeOptions::IDENTIFIER), "list-items");
    }

    #[test]
    fn test_collapses_and_trims_replacements() {
        assert_eq!(
            sanitize("  hello   (world)!! ", &SanitizeOptions::IDENTIFIER),
            "hello_world"
        );
        assert_eq!(sanitize("a__b", &SanitizeOptions::IDENTIFIER), "a_b");
    }

    #[test]
    fn test_filename_preserves_case_and_dots() {
        assert_eq!(
            sanitize("Report v1.2.json", &SanitizeOptions::FILENAME),
            "Report_v1.2.json"
        );
    }

    #[test]
    fn test_compatibility_forms_decompose() {
        // U+FB01 LATIN SMALL LIGATURE FI
        assert_eq!(sanitize("\u{FB01}le", &SanitizeOptions::FILENAME), "file");
    }

    #[test]
    fn test_empty_result_falls_back() {
        assert_eq!(sanitize("???", &SanitizeOptions::IDENTIFIER), EMPTY_NAME);
        assert_eq!(sanitize("", &SanitizeOptions::FILENAME), EMPTY_NAME);
    }

    #[test]
    fn test_path_sanitizes_each_segment() {
        assert_eq!(
            sanitize_path("/Users/{user_id}/Posts", &SanitizeOptions::IDENTIFIER),
            "users/user_id/posts"
        );
        assert_eq!(sanitize_path("///", &SanitizeOptions::IDENTIFIER), EMPTY_NAME);
    }
}
