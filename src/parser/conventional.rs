//! Regex-driven conventional commit header parser.

use anyhow::Result;
use regex::Regex;

use crate::error::LogError;
use crate::parser::{CommitParser, ConventionalCommit, ParseResult, ParserOptions};

/// Parses commit headers with a configurable pattern.
#[derive(Debug, Clone)]
pub struct ConventionalParser {
    header: Regex,
    merge: Option<Regex>,
    type_group: Option<usize>,
    scope_group: Option<usize>,
    subject_group: Option<usize>,
}

impl ConventionalParser {
    /// Compiles the patterns in `options`.
    pub fn new(options: &ParserOptions) -> Result<Self, LogError> {
        let header = Regex::new(&options.header_pattern)
            .map_err(|e| LogError::InvalidPattern(e.to_string()))?;
        let merge = options
            .merge_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| LogError::InvalidPattern(e.to_string()))?;

        // Capture group 0 is the whole match.
        let group_of = |field: &str| {
            options
                .header_correspondence
                .iter()
                .position(|name| name == field)
                .map(|i| i + 1)
        };

        Ok(Self {
            header,
            merge,
            type_group: group_of("type"),
            scope_group: group_of("scope"),
            subject_group: group_of("subject"),
        })
    }

    /// Picks the line to parse as the header.
    fn header_line<'a>(&self, message: &'a str) -> Option<&'a str> {
        let mut lines = message.trim().lines().map(str::trim_end);
        let first = lines.next()?;

        match &self.merge {
            Some(merge) if merge.is_match(first) => lines.find(|line| !line.trim().is_empty()),
            _ => Some(first),
        }
    }
}

impl CommitParser for ConventionalParser {
    fn parse(&self, message: &str) -> Result<ParseResult> {
        let Some(header) = self.header_line(message) else {
            return Ok(ParseResult::Unrecognized);
        };
        let Some(captures) = self.header.captures(header) else {
            return Ok(ParseResult::Unrecognized);
        };

        let field = |group: Option<usize>| {
            group
                .and_then(|g| captures.get(g))
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
        };

        let Some(commit_type) = field(self.type_group) else {
            return Ok(ParseResult::Unrecognized);
        };

        Ok(ParseResult::Recognized(ConventionalCommit {
            commit_type: commit_type.to_string(),
            scope: field(self.scope_group).map(str::to_string),
            subject: field(self.subject_group).map(str::to_string),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn default_parser() -> ConventionalParser {
        ConventionalParser::new(&ParserOptions::default()).unwrap()
    }

    fn parse(message: &str) -> ParseResult {
        default_parser().parse(message).unwrap()
    }

    #[test]
    fn type_scope_and_subject() {
        let ParseResult::Recognized(commit) = parse("feat(cli): add --format flag\n\nbody") else {
            panic!("expected a conventional commit");
        };
        assert_eq!(commit.commit_type, "feat");
        assert_eq!(commit.scope.as_deref(), Some("cli"));
        assert_eq!(commit.subject.as_deref(), Some("add --format flag"));
    }

    #[test]
    fn type_without_scope() {
        let parsed = parse("fix: handle empty history");
        assert_eq!(parsed.commit_type(), Some("fix"));
        assert_eq!(parsed.scope(), None);
    }

    #[test]
    fn empty_scope_parens() {
        let parsed = parse("docs(): readme");
        assert_eq!(parsed.commit_type(), Some("docs"));
        assert_eq!(parsed.scope(), None);
    }

    #[test]
    fn free_text_is_unrecognized() {
        assert_eq!(parse("Initial commit"), ParseResult::Unrecognized);
        assert_eq!(parse(""), ParseResult::Unrecognized);
        assert_eq!(parse(": missing type"), ParseResult::Unrecognized);
    }

    #[test]
    fn type_less_header_drops_its_scope() {
        let parsed = parse("(ui): tweak");
        assert_eq!(parsed, ParseResult::Unrecognized);
        assert_eq!(parsed.scope(), None);
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        assert_eq!(parse("\n\nchore(deps): bump").scope(), Some("deps"));
    }

    #[test]
    fn custom_correspondence() {
        let options = ParserOptions {
            header_pattern: r"^\[(\w+)\] (\w+): (.*)$".to_string(),
            header_correspondence: vec![
                "scope".to_string(),
                "type".to_string(),
                "subject".to_string(),
            ],
            merge_pattern: None,
        };
        let parser = ConventionalParser::new(&options).unwrap();
        let parsed = parser.parse("[ui] feat: dark mode").unwrap();
        assert_eq!(parsed.commit_type(), Some("feat"));
        assert_eq!(parsed.scope(), Some("ui"));
    }

    #[test]
    fn merge_header_uses_next_line() {
        let options = ParserOptions {
            merge_pattern: Some(r"^Merge pull request #\d+".to_string()),
            ..ParserOptions::default()
        };
        let parser = ConventionalParser::new(&options).unwrap();
        let parsed = parser
            .parse("Merge pull request #12 from me/branch\n\nfeat(api): paging")
            .unwrap();
        assert_eq!(parsed.commit_type(), Some("feat"));
        assert_eq!(parsed.scope(), Some("api"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let options = ParserOptions {
            header_pattern: "(unclosed".to_string(),
            ..ParserOptions::default()
        };
        assert!(matches!(
            ConventionalParser::new(&options),
            Err(LogError::InvalidPattern(_))
        ));
    }
}
