//! Name Matcher
//!
//! Classifies a user-supplied list of names into one of three strategies:
//! select everything, match a single wildcard pattern, or test membership in
//! a set of exact names. A list with more than one value is never allowed to
//! contain a wildcard, even if every value is wildcarded.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashSet;

/// Parameter name used for project filters in error messages
pub const PROJECT_NAME_PARAM: &str = "ProjectName";

/// Parameter name used for library set filters in error messages
pub const LIBRARY_SET_NAME_PARAM: &str = "LibrarySetName";

/// Escape character: the next character is taken literally
pub const ESCAPE_CHAR: char = '`';

/// User-supplied names for one namespace, lowercased on construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    parameter: String,
    values: Vec<String>,
}

impl NameFilter {
    pub fn new<I, S>(parameter: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            parameter: parameter.to_string(),
            values: values
                .into_iter()
                .map(|v| v.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// How a namespace is searched
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    /// No names given
    All,
    /// Exactly one value, containing wildcards
    Wildcard(WildcardPattern),
    /// One or more literal names
    Exact(HashSet<String>),
}

impl MatchStrategy {
    /// Test an already-lowercased resource name
    pub fn matches(&self, name: &str) -> bool {
        match self {
            MatchStrategy::All => true,
            MatchStrategy::Wildcard(pattern) => pattern.is_match(name),
            MatchStrategy::Exact(names) => names.contains(name),
        }
    }
}

/// Pick the strategy for a filter, rejecting multi-value filters with wildcards
pub fn classify(filter: &NameFilter) -> Result<MatchStrategy> {
    let values = filter.values();

    if values.is_empty() {
        return Ok(MatchStrategy::All);
    }

    let any_wildcard = values.iter().any(|v| contains_wildcard_characters(v));

    if any_wildcard && values.len() > 1 {
        return Err(Error::ParameterCollectionHasRegularAndWildcardItem {
            parameter: filter.parameter().to_string(),
        });
    }

    if any_wildcard {
        return Ok(MatchStrategy::Wildcard(WildcardPattern::new(&values[0])?));
    }

    Ok(MatchStrategy::Exact(values.iter().cloned().collect()))
}

/// True if `value` contains an unescaped `*`, `?`, `[` or `]`
pub fn contains_wildcard_characters(value: &str) -> bool {
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE_CHAR => {
                chars.next();
            }
            '*' | '?' | '[' | ']' => return true,
            _ => {}
        }
    }
    false
}

/// Glob-style pattern anchored at both ends.
///
/// `*` matches any run (including empty), `?` exactly one character and
/// `[...]` one character from a set, with `a-z` ranges.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    pattern: String,
    regex: Regex,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let invalid = || Error::InvalidWildcardPattern {
            pattern: pattern.to_string(),
        };

        let source = translate(pattern).ok_or_else(invalid)?;
        let regex = Regex::new(&source).map_err(|_| invalid())?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Glob to regex. `None` when a `[` set is unterminated or empty
fn translate(pattern: &str) -> Option<String> {
    let mut out = String::from("(?s)^");
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE_CHAR => {
                let literal = chars.next().unwrap_or(ESCAPE_CHAR);
                out.push_str(&regex::escape(literal.encode_utf8(&mut [0; 4])));
            }
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut class = String::new();
                let mut closed = false;
                while let Some(n) = chars.next() {
                    match n {
                        ']' => {
                            closed = true;
                            break;
                        }
                        ESCAPE_CHAR => {
                            let literal = chars.next()?;
                            push_class_literal(&mut class, literal);
                        }
                        '-' => class.push('-'),
                        other => push_class_literal(&mut class, other),
                    }
                }
                if !closed || class.is_empty() {
                    return None;
                }
                out.push('[');
                out.push_str(&class);
                out.push(']');
            }
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    out.push('$');
    Some(out)
}

fn push_class_literal(class: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
        class.push('\\');
    }
    class.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(values: &[&str]) -> NameFilter {
        NameFilter::new(PROJECT_NAME_PARAM, values.iter().copied())
    }

    #[test]
    fn test_filter_lowercases_values() {
        let f = filter(&["Website_Stardust", "DATABASE1"]);
        assert_eq!(f.values(), ["website_stardust", "database1"]);
    }

    #[test]
    fn test_empty_filter_selects_all() {
        assert!(matches!(classify(&filter(&[])).unwrap(), MatchStrategy::All));
    }

    #[test]
    fn test_single_wildcard() {
        let strategy = classify(&filter(&["Stands_*"])).unwrap();
        assert!(matches!(strategy, MatchStrategy::Wildcard(_)));
        assert!(strategy.matches("stands_sc"));
        assert!(strategy.matches("stands_"));
        assert!(!strategy.matches("old_stands_sc"));
    }

    #[test]
    fn test_literal_list_is_exact() {
        let strategy = classify(&filter(&["Website_Stardust", "Website_Diamond"])).unwrap();
        assert!(matches!(strategy, MatchStrategy::Exact(_)));
        assert!(strategy.matches("website_diamond"));
        assert!(!strategy.matches("website"));
    }

    #[test]
    fn test_single_literal_is_equality() {
        let strategy = classify(&filter(&["Database1"])).unwrap();
        assert!(strategy.matches("database1"));
        assert!(!strategy.matches("database10"));
    }

    #[test]
    fn test_mixed_list_rejected() {
        let err = classify(&filter(&["WebServer*", "Database1"])).unwrap_err();
        match err {
            Error::ParameterCollectionHasRegularAndWildcardItem { parameter } => {
                assert_eq!(parameter, "ProjectName")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_all_wildcard_list_rejected() {
        let f = NameFilter::new(LIBRARY_SET_NAME_PARAM, ["a*", "b*"]);
        assert!(matches!(
            classify(&f),
            Err(Error::ParameterCollectionHasRegularAndWildcardItem { ref parameter })
                if parameter == "LibrarySetName"
        ));
    }

    #[test]
    fn test_contains_wildcard_characters() {
        assert!(contains_wildcard_characters("web*"));
        assert!(contains_wildcard_characters("web?"));
        assert!(contains_wildcard_characters("web[12]"));
        assert!(contains_wildcard_characters("web]"));
        assert!(!contains_wildcard_characters("web.server+(1)"));
        assert!(!contains_wildcard_characters("web`*"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let p = WildcardPattern::new("db?").unwrap();
        assert!(p.is_match("db1"));
        assert!(!p.is_match("db"));
        assert!(!p.is_match("db12"));
    }

    #[test]
    fn test_character_sets_and_ranges() {
        let p = WildcardPattern::new("web[1-3]").unwrap();
        assert!(p.is_match("web2"));
        assert!(!p.is_match("web4"));

        let p = WildcardPattern::new("[ab]x").unwrap();
        assert!(p.is_match("ax"));
        assert!(!p.is_match("cx"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let p = WildcardPattern::new("app.(prod)*").unwrap();
        assert!(p.is_match("app.(prod)-eu"));
        assert!(!p.is_match("appx(prod)-eu"));
    }

    #[test]
    fn test_escaped_star_is_literal() {
        let p = WildcardPattern::new("a`*b*").unwrap();
        assert!(p.is_match("a*bc"));
        assert!(!p.is_match("axbc"));
    }

    #[test]
    fn test_unterminated_set_is_invalid() {
        assert!(matches!(
            WildcardPattern::new("web[12"),
            Err(Error::InvalidWildcardPattern { .. })
        ));
        assert!(matches!(
            classify(&filter(&["web[]"])),
            Err(Error::InvalidWildcardPattern { .. })
        ));
    }

    #[test]
    fn test_match_spans_newlines() {
        let p = WildcardPattern::new("a*b").unwrap();
        assert!(p.is_match("a\nb"));
    }
}
