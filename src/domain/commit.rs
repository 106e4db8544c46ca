use regex::Regex;
use std::sync::LazyLock;

// type(scope)!: description, with scope and ! optional
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+)(?:\(([^)]+)\))?(!?):\s*(.*)").unwrap());

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit message according to the conventional commits format.
    ///
    /// A `!` after the type or scope, or any of `breaking_indicators` anywhere
    /// in the message, marks a breaking change. Messages that do not follow
    /// the format are treated as `chore`.
    pub fn parse(message: &str, breaking_indicators: &[String]) -> Self {
        let footer_breaking = breaking_indicators
            .iter()
            .any(|indicator| message.contains(indicator.as_str()));

        let header = message.lines().next().unwrap_or("");
        match HEADER_RE.captures(header) {
            Some(captures) => ParsedCommit {
                r#type: captures[1].to_string(),
                scope: captures.get(2).map(|m| m.as_str().to_string()),
                description: captures[4].to_string(),
                is_breaking_change: &captures[3] == "!" || footer_breaking,
            },
            None => ParsedCommit {
                r#type: "chore".to_string(),
                scope: None,
                description: header.to_string(),
                is_breaking_change: footer_breaking,
            },
        }
    }
}
