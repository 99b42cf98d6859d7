//! Splitting the output of a compiler's dependency-listing mode.
//!
//! `cc -MM a.c` prints a make rule such as
//!
//! ```text
//! a.o: a.c a.h \
//!   include/b.h
//! ```
//!
//! The rule is split on runs of whitespace, dropping line-continuation
//! backslashes. The first token is the rule's target, not a dependency.

/// Split a dependency listing into tokens, target included.
pub fn split_dependency_listing(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| !token.chars().all(|c| c == '\\'))
        .map(str::to_string)
        .collect()
}

/// Extract the dependency list from a listing.
///
/// Returns `None` when fewer than two tokens are present, which means the
/// compiler could not analyze the file.
pub fn parse_dependency_listing(text: &str) -> Option<Vec<String>> {
    let mut tokens = split_dependency_listing(text);
    if tokens.len() < 2 {
        return None;
    }
    tokens.remove(0);
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_rule() {
        assert_eq!(
            split_dependency_listing("a.o: a.c a.h\n"),
            vec!["a.o:", "a.c", "a.h"]
        );
    }

    #[test]
    fn test_parse_drops_target() {
        assert_eq!(
            parse_dependency_listing("a.o: a.c a.h\n"),
            Some(vec!["a.c".to_string(), "a.h".to_string()])
        );
    }

    #[test]
    fn test_split_continuation_lines() {
        let listing = "main.o: src/main.c include/util.h \\\n  include/config.h \\\n include/log.h\n";
        assert_eq!(
            split_dependency_listing(listing),
            vec![
                "main.o:",
                "src/main.c",
                "include/util.h",
                "include/config.h",
                "include/log.h"
            ]
        );
    }

    #[test]
    fn test_split_is_idempotent_on_clean_input() {
        let once = split_dependency_listing("a.o: a.c a.h\n").join(" ");
        assert_eq!(split_dependency_listing(&once).join(" "), once);
    }

    #[test]
    fn test_too_few_tokens() {
        assert_eq!(parse_dependency_listing(""), None);
        assert_eq!(parse_dependency_listing("   \n"), None);
        assert_eq!(parse_dependency_listing("a.o:"), None);
        assert_eq!(parse_dependency_listing("a.o: \\\n"), None);
    }
}
