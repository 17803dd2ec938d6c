//! Comparing two inputs end to end.

use std::io::Write;
use std::path::Path;

use log::{debug, warn};

use crate::algorithm::{diff, ScriptOrder};
use crate::analyze::{has_real_changes, HunkAnalysis, IgnorePolicy};
use crate::binary::binary_files_differ;
use crate::hash::Classifier;
use crate::input::{split_lines, Input, Lines};
use crate::render::{renderer_for, write_brief};
use crate::types::{CompareOptions, DiffError, Hunk, Outcome, OutputStyle};

const OUTPUT: &str = "standard output";

/// Compare two files by path; `-` reads standard input.
pub fn compare_files(
    path0: impl AsRef<Path>,
    path1: impl AsRef<Path>,
    opts: &CompareOptions,
    out: &mut dyn Write,
) -> Result<Outcome, DiffError> {
    let mut inputs = [Input::open(path0)?, Input::open(path1)?];
    compare_inputs(&mut inputs, opts, out)
}

/// Compare two inputs and write the result in the style `opts` selects.
pub fn compare_inputs(
    inputs: &mut [Input; 2],
    opts: &CompareOptions,
    out: &mut dyn Write,
) -> Result<Outcome, DiffError> {
    let policy = IgnorePolicy::from_options(opts)?;

    if inputs[0].id().is_same(&inputs[1].id()) {
        debug!("{}: same stream on both sides", inputs[0].name());
        return Ok(Outcome::Unchanged);
    }

    if use_binary_path(inputs, opts)? {
        return compare_binary(inputs, opts, out);
    }

    let [in0, in1] = inputs;
    let (name0, name1) = (in0.name().to_string(), in1.name().to_string());
    let lines0 = split_lines(in0.contents()?);
    let lines1 = split_lines(in1.contents()?);

    let mut classifier = Classifier::new(opts.line_policy);
    let equivs0 = classifier.classify(&lines0);
    let equivs1 = classifier.classify(&lines1);
    debug!(
        "text: {} vs {} lines, {} classes",
        lines0.len(),
        lines1.len(),
        classifier.num_classes()
    );

    let renderer = renderer_for(opts.style);
    let order = renderer.as_ref().map_or(ScriptOrder::Forward, |r| r.order());
    let script = diff(&equivs0, &equivs1, opts, order);

    let changed = if policy.is_active() {
        has_real_changes(&script, &policy, &lines0, &lines1)
    } else {
        !script.is_empty()
    };
    if !changed {
        return Ok(Outcome::Unchanged);
    }

    let Some(renderer) = renderer else {
        write_brief(out, &name0, &name1).map_err(|e| DiffError::io(OUTPUT, e))?;
        return Ok(Outcome::Changed);
    };
    renderer
        .render(out, &script, [&lines0, &lines1], &policy)
        .map_err(|e| DiffError::io(OUTPUT, e))?;

    if !renderer.represents_missing_newline() {
        let names = [&name0, &name1];
        for side in 0..2 {
            if touches_incomplete_line(&script, side, [&lines0, &lines1], &policy) {
                warn!("{}: no newline at end of file", names[side]);
                return Ok(Outcome::ChangedMissingNewline);
            }
        }
    }
    Ok(Outcome::Changed)
}

// Binary comparison when either side looks binary, or when only a yes/no
// answer is wanted and no option could make differing bytes compare equal.
fn use_binary_path(inputs: &mut [Input; 2], opts: &CompareOptions) -> Result<bool, DiffError> {
    if opts.text {
        return Ok(false);
    }
    if opts.style == OutputStyle::Brief && !opts.ignores_some_changes() && !opts.line_policy.is_active() {
        return Ok(true);
    }
    for input in inputs.iter_mut() {
        let n = input.block_size();
        if input.peek(n)?.contains(&0) {
            debug!("{}: NUL byte in first block, comparing as binary", input.name());
            return Ok(true);
        }
    }
    Ok(false)
}

fn compare_binary(inputs: &mut [Input; 2], opts: &CompareOptions, out: &mut dyn Write) -> Result<Outcome, DiffError> {
    if !binary_files_differ(inputs)? {
        return Ok(Outcome::Unchanged);
    }
    let (name0, name1) = (inputs[0].name(), inputs[1].name());
    let written = if opts.style == OutputStyle::Brief {
        write_brief(out, name0, name1)
    } else {
        writeln!(out, "Binary files {} and {} differ", name0, name1)
    };
    written.map_err(|e| DiffError::io(OUTPUT, e))?;
    Ok(Outcome::Changed)
}

// Whether a hunk that gets printed reaches the unterminated last line of
// `side`.  Vacuous hunks are never printed, so they cannot lose the newline.
fn touches_incomplete_line(
    script: &[Hunk],
    side: usize,
    [lines0, lines1]: [&Lines<'_>; 2],
    analysis: &dyn HunkAnalysis,
) -> bool {
    let lines = if side == 0 { lines0 } else { lines1 };
    lines.missing_newline
        && script.iter().any(|hunk| {
            let (start, count) = match side {
                0 => (hunk.line0, hunk.deleted),
                _ => (hunk.line1, hunk.inserted),
            };
            count > 0 && start + count == lines.len() && !analysis.is_vacuous(hunk, lines0, lines1)
        })
}
