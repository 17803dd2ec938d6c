use std::fmt;

// ============================================================================
// Constants
//
// Search heuristics (see algorithm::diag):
//   SNAKE_LIMIT      = a snake longer than this is "big"
//   HEURISTIC_WARMUP = cost after which the big-snake shortcut may fire
//   EXPENSIVE_FLOOR  = lower bound for the too-expensive cutoff
// Discarder thresholds (see discard):
//   MANY_BASE        = base of the provisional-discard threshold 5·2^k
//   EDGE_SCAN        = lines scanned at each end of a discard run
//   EDGE_RUN         = consecutive non-provisionals that end the edge scan
// Line fingerprints (see hash):
//   HASH_BASE        = polynomial base
//   HASH_MOD         = Mersenne prime 2^61-1
// ============================================================================

pub const SNAKE_LIMIT: usize = 20;
pub const HEURISTIC_WARMUP: isize = 200;
pub const EXPENSIVE_FLOOR: isize = 256;
pub const MANY_BASE: usize = 5;
pub const EDGE_SCAN: usize = 8;
pub const EDGE_RUN: usize = 3;
pub const HASH_BASE: u64 = 263;
pub const HASH_MOD: u64 = (1 << 61) - 1;
pub const BINARY_BUF_SIZE: usize = 8192; // default block size when stat gives none

/// Equivalence class reserved for lines that were never classified.
pub const UNCLASSIFIED: usize = 0;

// ============================================================================
// Hunks
// ============================================================================

/// One grouped unit of deletions and insertions.
///
/// `line0`/`line1` are 0-based.  When `deleted == 0`, `line0` is the line
/// before which the insertion happens; symmetrically for `inserted == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hunk {
    pub line0: usize,
    pub line1: usize,
    pub deleted: usize,
    pub inserted: usize,
}

impl Hunk {
    pub fn new(line0: usize, line1: usize, deleted: usize, inserted: usize) -> Self {
        Hunk { line0, line1, deleted, inserted }
    }

    pub fn is_insertion(&self) -> bool {
        self.deleted == 0
    }

    pub fn is_deletion(&self) -> bool {
        self.inserted == 0
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HUNK(line0={}, line1={}, del={}, ins={})",
            self.line0, self.line1, self.deleted, self.inserted
        )
    }
}

// ============================================================================
// Outcome and output style
// ============================================================================

/// Result of comparing two inputs, mapped to the process exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Changed,
    /// Changed, and the selected output style could not represent an
    /// incomplete last line.
    ChangedMissingNewline,
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        !matches!(self, Outcome::Unchanged)
    }

    pub fn exit_code(self) -> i32 {
        if self.is_changed() {
            1
        } else {
            0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputStyle {
    #[default]
    Normal,
    Ed,
    Brief,
}

// ============================================================================
// Options
// ============================================================================

/// How raw lines are folded before they are assigned an equivalence class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinePolicy {
    pub ignore_case: bool,
    pub ignore_space_change: bool,
    pub ignore_all_space: bool,
}

impl LinePolicy {
    /// Whether lines are compared by anything other than their exact bytes.
    pub fn is_active(&self) -> bool {
        self.ignore_case || self.ignore_space_change || self.ignore_all_space
    }
}

/// Options for a two-input comparison.
#[derive(Clone, Debug)]
pub struct CompareOptions {
    pub minimal: bool,
    pub no_discards: bool,
    pub context: usize,
    pub horizon_lines: usize,
    pub style: OutputStyle,
    pub text: bool,
    pub ignore_blank_lines: bool,
    pub ignore_regex: Vec<String>,
    pub line_policy: LinePolicy,
    /// Replaces the Discarder's size-derived `many` threshold.
    pub many_override: Option<usize>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            minimal: false,
            no_discards: false,
            context: 0,
            horizon_lines: 0,
            style: OutputStyle::Normal,
            text: false,
            ignore_blank_lines: false,
            ignore_regex: Vec::new(),
            line_policy: LinePolicy::default(),
            many_override: None,
        }
    }
}

impl CompareOptions {
    /// Shifting may not merge hunks when the horizon differs from the
    /// context the renderer will show.
    pub fn inhibit_hunk_merge(&self) -> bool {
        self.horizon_lines != self.context
    }

    /// Whether some hunks may turn out to be vacuous.
    pub fn ignores_some_changes(&self) -> bool {
        self.ignore_blank_lines || !self.ignore_regex.is_empty()
    }
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("{name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
}

impl DiffError {
    pub fn io(name: impl Into<String>, source: std::io::Error) -> Self {
        DiffError::Io { name: name.into(), source }
    }
}

// ============================================================================
// Summary statistics
// ============================================================================

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub num_hunks: usize,
    pub num_insertions: usize,
    pub num_deletions: usize,
    pub num_changes: usize,
    pub lines_deleted: usize,
    pub lines_inserted: usize,
}

pub fn script_summary(script: &[Hunk]) -> ScriptSummary {
    let mut summary = ScriptSummary {
        num_hunks: script.len(),
        ..ScriptSummary::default()
    };
    for hunk in script {
        if hunk.is_insertion() {
            summary.num_insertions += 1;
        } else if hunk.is_deletion() {
            summary.num_deletions += 1;
        } else {
            summary.num_changes += 1;
        }
        summary.lines_deleted += hunk.deleted;
        summary.lines_inserted += hunk.inserted;
    }
    summary
}
