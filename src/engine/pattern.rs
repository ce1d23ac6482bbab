//! Wildcard name patterns for class and selector search.
//!
//! `*` means "zero or more characters" at the position it appears in:
//! `NSMutable*` is a prefix match, `*String` a suffix match, `*able*` a
//! substring match, and `NS*String` constrains prefix and suffix at once.
//! Matching is case-sensitive.

use std::fmt;

/// How a pattern constrains a candidate name.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MatchMode {
    /// No wildcard: the whole name must be equal
    Exact(String),
    /// Trailing `*`: the name must start with the stem
    Prefix(String),
    /// Leading `*`: the name must end with the stem
    Suffix(String),
    /// `*` at both ends: the stem must occur anywhere
    Substring(String),
    /// `*` in the middle: prefix before the first `*`, suffix after the last
    Bracket { prefix: String, suffix: String },
}

/// A compiled wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    raw: String,
    mode: MatchMode,
}

impl NamePattern {
    /// Compile a pattern token. Parsing never fails: a token without `*`
    /// is an exact match.
    pub fn parse(token: &str) -> Self {
        let starts = token.starts_with('*');
        let ends = token.ends_with('*') && token.len() > 1;

        let mode = if !token.contains('*') {
            MatchMode::Exact(token.to_string())
        } else if starts && ends {
            MatchMode::Substring(token[1..token.len() - 1].to_string())
        } else if starts {
            MatchMode::Suffix(token[1..].to_string())
        } else if ends {
            MatchMode::Prefix(token[..token.len() - 1].to_string())
        } else {
            // Interior wildcard(s): constrain both ends independently
            let first = token.find('*').expect("interior wildcard present");
            let last = token.rfind('*').expect("interior wildcard present");
            MatchMode::Bracket {
                prefix: token[..first].to_string(),
                suffix: token[last + 1..].to_string(),
            }
        };

        Self {
            raw: token.to_string(),
            mode,
        }
    }

    /// The original pattern text
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Does the pattern contain a wildcard?
    pub fn is_wildcard(&self) -> bool {
        !matches!(self.mode, MatchMode::Exact(_))
    }

    /// Does `name` satisfy the pattern?
    pub fn matches(&self, name: &str) -> bool {
        match &self.mode {
            MatchMode::Exact(stem) => name == stem,
            MatchMode::Prefix(stem) => name.starts_with(stem),
            MatchMode::Suffix(stem) => name.ends_with(stem),
            MatchMode::Substring(stem) => name.contains(stem),
            MatchMode::Bracket { prefix, suffix } => {
                // The prefix and suffix must not overlap in the name
                name.len() >= prefix.len() + suffix.len()
                    && name.starts_with(prefix)
                    && name.ends_with(suffix)
            }
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
