pub mod types;
pub mod marks;
pub mod discard;
pub mod algorithm;
pub mod shift;
pub mod script;
pub mod apply;
pub mod hash;
pub mod input;
pub mod binary;
pub mod analyze;
pub mod render;
pub mod driver;

// Re-exports for convenience
pub use types::{
    CompareOptions, DiffError, Hunk, LinePolicy, Outcome, OutputStyle, ScriptSummary,
    EXPENSIVE_FLOOR, HEURISTIC_WARMUP, SNAKE_LIMIT,
};
pub use marks::ChangeMarks;
pub use discard::{discard_confusing_lines, Compacted};
pub use algorithm::{changed_marks, compare_compacted, diff, diff_default, too_expensive, ScriptOrder};
pub use algorithm::diag::Partition;
pub use shift::shift_boundaries;
pub use script::{build_reverse_script, build_script};
pub use apply::{apply_reverse_script, apply_script, output_len};
pub use hash::{fingerprint, mod_mersenne, normalize, Classifier};
pub use input::{split_lines, Input, Lines, StreamId};
pub use binary::{binary_files_differ, buffer_lcm};
pub use analyze::{has_real_changes, HunkAnalysis, IgnorePolicy};
pub use render::{renderer_for, write_brief, EdRenderer, NormalRenderer, Renderer};
pub use driver::{compare_files, compare_inputs};
pub use types::script_summary;
