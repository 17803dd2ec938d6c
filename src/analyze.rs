//! Deciding whether a hunk is worth reporting.

use regex::bytes::Regex;

use crate::input::Lines;
use crate::types::{CompareOptions, DiffError, Hunk};

/// Judges hunks of a finished script.
pub trait HunkAnalysis {
    /// A vacuous hunk changes nothing the caller cares about; a script made
    /// only of vacuous hunks counts as unchanged.
    fn is_vacuous(&self, hunk: &Hunk, lines0: &Lines<'_>, lines1: &Lines<'_>) -> bool;
}

/// Ignores hunks whose every deleted and inserted line is blank (`-B`) or
/// matches one of the `-I` patterns.
#[derive(Debug, Default)]
pub struct IgnorePolicy {
    blank_lines: bool,
    patterns: Vec<Regex>,
}

impl IgnorePolicy {
    pub fn from_options(opts: &CompareOptions) -> Result<Self, DiffError> {
        let patterns = opts
            .ignore_regex
            .iter()
            .map(|re| Regex::new(re))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IgnorePolicy {
            blank_lines: opts.ignore_blank_lines,
            patterns,
        })
    }

    /// Whether this policy can find anything vacuous at all.
    pub fn is_active(&self) -> bool {
        self.blank_lines || !self.patterns.is_empty()
    }

    fn ignores(&self, line: &[u8]) -> bool {
        (self.blank_lines && line.is_empty()) || self.patterns.iter().any(|re| re.is_match(line))
    }
}

impl HunkAnalysis for IgnorePolicy {
    fn is_vacuous(&self, hunk: &Hunk, lines0: &Lines<'_>, lines1: &Lines<'_>) -> bool {
        if !self.is_active() {
            return false;
        }
        let deleted = &lines0.lines[hunk.line0..hunk.line0 + hunk.deleted];
        let inserted = &lines1.lines[hunk.line1..hunk.line1 + hunk.inserted];
        deleted.iter().chain(inserted).all(|line| self.ignores(line))
    }
}

/// Whether any hunk of `script` survives the analysis.
pub fn has_real_changes(
    script: &[Hunk],
    analysis: &dyn HunkAnalysis,
    lines0: &Lines<'_>,
    lines1: &Lines<'_>,
) -> bool {
    script.iter().any(|hunk| !analysis.is_vacuous(hunk, lines0, lines1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::split_lines;

    fn opts(blank: bool, regex: &[&str]) -> CompareOptions {
        CompareOptions {
            ignore_blank_lines: blank,
            ignore_regex: regex.iter().map(|s| s.to_string()).collect(),
            ..CompareOptions::default()
        }
    }

    #[test]
    fn test_blank_hunk_is_vacuous() {
        let a = split_lines(b"x\ny\n");
        let b = split_lines(b"x\n\n\ny\n");
        let policy = IgnorePolicy::from_options(&opts(true, &[])).unwrap();
        assert!(policy.is_vacuous(&Hunk::new(1, 1, 0, 2), &a, &b));
    }

    #[test]
    fn test_whitespace_only_line_is_not_blank() {
        let a = split_lines(b"x\n");
        let b = split_lines(b"x\n \n");
        let policy = IgnorePolicy::from_options(&opts(true, &[])).unwrap();
        assert!(!policy.is_vacuous(&Hunk::new(1, 1, 0, 1), &a, &b));
    }

    #[test]
    fn test_regex_must_match_every_line() {
        let a = split_lines(b"# one\nkeep\n");
        let b = split_lines(b"# two\nkept\n");
        let policy = IgnorePolicy::from_options(&opts(false, &["^#"])).unwrap();
        assert!(policy.is_vacuous(&Hunk::new(0, 0, 1, 1), &a, &b));
        assert!(!policy.is_vacuous(&Hunk::new(0, 0, 2, 2), &a, &b));
        let script = [Hunk::new(0, 0, 1, 1), Hunk::new(1, 1, 1, 1)];
        assert!(has_real_changes(&script, &policy, &a, &b));
        assert!(!has_real_changes(&script[..1], &policy, &a, &b));
    }

    #[test]
    fn test_inactive_policy_keeps_everything() {
        let a = split_lines(b"\n");
        let b = split_lines(b"");
        let policy = IgnorePolicy::default();
        assert!(!policy.is_vacuous(&Hunk::new(0, 0, 1, 0), &a, &b));
    }

    #[test]
    fn test_bad_regex_is_an_error() {
        let err = IgnorePolicy::from_options(&opts(false, &["("])).unwrap_err();
        assert!(matches!(err, DiffError::Regex(_)));
    }
}
