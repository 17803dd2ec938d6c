//! Turning a script into text.

use std::io::{self, Write};

use crate::algorithm::ScriptOrder;
use crate::analyze::HunkAnalysis;
use crate::input::Lines;
use crate::types::{Hunk, OutputStyle};

const NO_NEWLINE: &[u8] = b"\\ No newline at end of file\n";

/// Writes a script in one output format.
pub trait Renderer {
    /// Order in which this renderer wants the hunks.
    fn order(&self) -> ScriptOrder;

    /// Whether the format can express a last line without a newline.
    fn represents_missing_newline(&self) -> bool;

    /// Write every non-vacuous hunk of `script`.
    fn render(
        &self,
        out: &mut dyn Write,
        script: &[Hunk],
        lines: [&Lines<'_>; 2],
        analysis: &dyn HunkAnalysis,
    ) -> io::Result<()>;
}

/// The renderer for a style; `None` for `Brief`, which prints no hunks.
pub fn renderer_for(style: OutputStyle) -> Option<Box<dyn Renderer>> {
    match style {
        OutputStyle::Normal => Some(Box::new(NormalRenderer)),
        OutputStyle::Ed => Some(Box::new(EdRenderer)),
        OutputStyle::Brief => None,
    }
}

/// `Files A and B differ`
pub fn write_brief(out: &mut dyn Write, name0: &str, name1: &str) -> io::Result<()> {
    writeln!(out, "Files {} and {} differ", name0, name1)
}

// 1-based range `first,last`, or just `first` for a single line.  An empty
// range prints the line before it.
fn write_range(out: &mut dyn Write, start: usize, count: usize) -> io::Result<()> {
    match count {
        0 => write!(out, "{}", start),
        1 => write!(out, "{}", start + 1),
        _ => write!(out, "{},{}", start + 1, start + count),
    }
}

fn command_letter(hunk: &Hunk) -> char {
    if hunk.is_insertion() {
        'a'
    } else if hunk.is_deletion() {
        'd'
    } else {
        'c'
    }
}

// ============================================================================
// Normal
// ============================================================================

/// `2,3c2`, `< old`, `---`, `> new`.
pub struct NormalRenderer;

impl NormalRenderer {
    fn write_lines(out: &mut dyn Write, prefix: &[u8], lines: &Lines<'_>, start: usize, count: usize) -> io::Result<()> {
        for i in start..start + count {
            out.write_all(prefix)?;
            out.write_all(lines.get(i))?;
            out.write_all(b"\n")?;
            if lines.is_incomplete(i) {
                out.write_all(NO_NEWLINE)?;
            }
        }
        Ok(())
    }
}

impl Renderer for NormalRenderer {
    fn order(&self) -> ScriptOrder {
        ScriptOrder::Forward
    }

    fn represents_missing_newline(&self) -> bool {
        true
    }

    fn render(
        &self,
        out: &mut dyn Write,
        script: &[Hunk],
        [lines0, lines1]: [&Lines<'_>; 2],
        analysis: &dyn HunkAnalysis,
    ) -> io::Result<()> {
        for hunk in script {
            if analysis.is_vacuous(hunk, lines0, lines1) {
                continue;
            }
            write_range(out, hunk.line0, hunk.deleted)?;
            write!(out, "{}", command_letter(hunk))?;
            write_range(out, hunk.line1, hunk.inserted)?;
            writeln!(out)?;

            Self::write_lines(out, b"< ", lines0, hunk.line0, hunk.deleted)?;
            if hunk.deleted > 0 && hunk.inserted > 0 {
                writeln!(out, "---")?;
            }
            Self::write_lines(out, b"> ", lines1, hunk.line1, hunk.inserted)?;
        }
        Ok(())
    }
}

// ============================================================================
// Ed
// ============================================================================

/// Commands for `ed`, last hunk first so line numbers stay valid while the
/// script is applied.
pub struct EdRenderer;

impl Renderer for EdRenderer {
    fn order(&self) -> ScriptOrder {
        ScriptOrder::Reverse
    }

    fn represents_missing_newline(&self) -> bool {
        false
    }

    fn render(
        &self,
        out: &mut dyn Write,
        script: &[Hunk],
        [lines0, lines1]: [&Lines<'_>; 2],
        analysis: &dyn HunkAnalysis,
    ) -> io::Result<()> {
        for hunk in script {
            if analysis.is_vacuous(hunk, lines0, lines1) {
                continue;
            }
            write_range(out, hunk.line0, hunk.deleted)?;
            writeln!(out, "{}", command_letter(hunk))?;
            if hunk.inserted == 0 {
                continue;
            }

            // Line number the first inserted line lands on.
            let base = hunk.line0 + 1;
            let mut inserting = true;
            for k in 0..hunk.inserted {
                if !inserting {
                    writeln!(out, "{}a", base + k - 1)?;
                    inserting = true;
                }
                let line = lines1.get(hunk.line1 + k);
                if line == b"." {
                    // A lone "." would end the insert; write ".." and fix it up.
                    writeln!(out, "..")?;
                    writeln!(out, ".")?;
                    writeln!(out, "{}s/^\\.\\././", base + k)?;
                    inserting = false;
                } else {
                    out.write_all(line)?;
                    out.write_all(b"\n")?;
                }
            }
            if inserting {
                writeln!(out, ".")?;
            }
        }
        Ok(())
    }
}
