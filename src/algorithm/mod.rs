pub mod diag;
pub mod vector;

use log::debug;

use crate::discard::{discard_confusing_lines, Compacted};
use crate::marks::ChangeMarks;
use crate::script::{build_reverse_script, build_script};
use crate::shift::shift_boundaries;
use crate::types::{script_summary, CompareOptions, Hunk, EXPENSIVE_FLOOR};

use vector::DiagonalVector;

/// Order in which the hunks of a script are listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptOrder {
    /// First hunk first; what most renderers want.
    Forward,
    /// Last hunk first; lets an ed script be applied top-down without
    /// renumbering.
    Reverse,
}

/// Working state of one comparison, owned exclusively by it.
pub(crate) struct Context<'a> {
    xv: &'a [usize],
    yv: &'a [usize],
    xreal: &'a [usize],
    yreal: &'a [usize],
    marks: &'a mut [ChangeMarks; 2],
    fdiag: DiagonalVector,
    bdiag: DiagonalVector,
    too_expensive: isize,
}

/// Edit cost after which `diag` stops searching exactly: about the square
/// root of the number of lines searched, at least `EXPENSIVE_FLOOR`.
pub fn too_expensive(lines: usize) -> isize {
    let mut te: isize = 1;
    let mut i = lines;
    while i != 0 {
        te <<= 1;
        i >>= 2;
    }
    te.max(EXPENSIVE_FLOOR)
}

impl<'a> Context<'a> {
    pub(crate) fn new(sides: &'a [Compacted; 2], marks: &'a mut [ChangeMarks; 2]) -> Self {
        let (xlen, ylen) = (sides[0].len(), sides[1].len());
        Context {
            xv: &sides[0].kept,
            yv: &sides[1].kept,
            xreal: &sides[0].real_index,
            yreal: &sides[1].real_index,
            marks,
            fdiag: DiagonalVector::new(xlen, ylen),
            bdiag: DiagonalVector::new(xlen, ylen),
            too_expensive: too_expensive(xlen + ylen),
        }
    }

    /// Mark the lines of `xv[xoff..xlim]` and `yv[yoff..ylim]` that are not
    /// on the (approximately) shortest path as changed.
    ///
    /// Matching lines at either end are free; an empty side makes every line
    /// of the other side a change; otherwise split at `diag`'s midpoint and
    /// recurse, each half inheriting its own minimality.
    pub(crate) fn compareseq(
        &mut self,
        mut xoff: isize,
        mut xlim: isize,
        mut yoff: isize,
        mut ylim: isize,
        minimal: bool,
    ) {
        let (xv, yv) = (self.xv, self.yv);

        while xoff < xlim && yoff < ylim && xv[xoff as usize] == yv[yoff as usize] {
            xoff += 1;
            yoff += 1;
        }
        while xlim > xoff && ylim > yoff && xv[xlim as usize - 1] == yv[ylim as usize - 1] {
            xlim -= 1;
            ylim -= 1;
        }

        if xoff == xlim {
            for y in yoff..ylim {
                self.marks[1].mark(self.yreal[y as usize]);
            }
        } else if yoff == ylim {
            for x in xoff..xlim {
                self.marks[0].mark(self.xreal[x as usize]);
            }
        } else {
            let (cost, part) = self.diag(xoff, xlim, yoff, ylim, minimal);
            // Cost 1 means one side is empty once trimmed, handled above.
            assert!(
                cost != 1,
                "edit distance 1 for trimmed rectangle [{}, {}) x [{}, {})",
                xoff,
                xlim,
                yoff,
                ylim
            );
            self.compareseq(xoff, part.xmid, yoff, part.ymid, part.lo_minimal);
            self.compareseq(part.xmid, xlim, part.ymid, ylim, part.hi_minimal);
        }
    }
}

/// Run the search over already-compacted sides, marking changed lines.
pub fn compare_compacted(sides: &[Compacted; 2], marks: &mut [ChangeMarks; 2], minimal: bool) {
    let mut ctx = Context::new(sides, marks);
    debug!(
        "search: {} x {} kept lines, too_expensive={}, minimal={}",
        sides[0].len(),
        sides[1].len(),
        ctx.too_expensive,
        minimal
    );
    let (xlim, ylim) = (sides[0].len() as isize, sides[1].len() as isize);
    ctx.compareseq(0, xlim, 0, ylim, minimal);
}

/// Compute the final changed marks for two sides of class ids: discard,
/// search, then shift boundaries.
pub fn changed_marks(a: &[usize], b: &[usize], opts: &CompareOptions) -> [ChangeMarks; 2] {
    let mut marks = [ChangeMarks::new(a.len()), ChangeMarks::new(b.len())];
    let sides = discard_confusing_lines([a, b], &mut marks, opts.no_discards, opts.many_override);
    compare_compacted(&sides, &mut marks, opts.minimal);
    shift_boundaries([a, b], &mut marks, opts.inhibit_hunk_merge());
    marks
}

/// Diff two sequences of class ids into a hunk script.
pub fn diff(a: &[usize], b: &[usize], opts: &CompareOptions, order: ScriptOrder) -> Vec<Hunk> {
    let marks = changed_marks(a, b, opts);
    let script = match order {
        ScriptOrder::Forward => build_script(&marks),
        ScriptOrder::Reverse => build_reverse_script(&marks),
    };
    log_script_stats(&script);
    script
}

/// Forward script with default options.
pub fn diff_default(a: &[usize], b: &[usize]) -> Vec<Hunk> {
    diff(a, b, &CompareOptions::default(), ScriptOrder::Forward)
}

pub(crate) fn log_script_stats(script: &[Hunk]) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let s = script_summary(script);
    debug!(
        "script: {} hunks ({} insert, {} delete, {} change), -{} +{} lines",
        s.num_hunks,
        s.num_insertions,
        s.num_deletions,
        s.num_changes,
        s.lines_deleted,
        s.lines_inserted
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(a: &[usize], b: &[usize]) -> [ChangeMarks; 2] {
        let sides = [Compacted::identity(a), Compacted::identity(b)];
        let mut marks = [ChangeMarks::new(a.len()), ChangeMarks::new(b.len())];
        compare_compacted(&sides, &mut marks, true);
        marks
    }

    #[test]
    fn test_too_expensive_floor() {
        assert_eq!(too_expensive(0), 256);
        assert_eq!(too_expensive(1000), 256);
        // 2^20 lines: 11 shifts until zero.
        assert_eq!(too_expensive(1 << 20), 2048);
    }

    #[test]
    fn test_single_substitution() {
        let marks = exact(&[1, 2, 3], &[1, 4, 3]);
        assert_eq!(marks[0].iter().collect::<Vec<_>>(), vec![false, true, false]);
        assert_eq!(marks[1].iter().collect::<Vec<_>>(), vec![false, true, false]);
    }

    #[test]
    fn test_pure_insertion() {
        let marks = exact(&[1, 3], &[1, 2, 3]);
        assert_eq!(marks[0].count(), 0);
        assert_eq!(marks[1].iter().collect::<Vec<_>>(), vec![false, true, false]);
    }

    #[test]
    fn test_minimal_cost() {
        // LCS of ABCABBA / CBABAC is 4: 3 deletions + 2 insertions.
        let a = [1, 2, 3, 1, 2, 2, 1];
        let b = [3, 2, 1, 2, 1, 3];
        let marks = exact(&a, &b);
        assert_eq!(marks[0].count(), 3);
        assert_eq!(marks[1].count(), 2);
    }

    #[test]
    fn test_diag_midpoint_on_path() {
        let a = [1, 2, 3, 4, 5, 6];
        let b = [9, 2, 3, 4, 5, 8];
        let sides = [Compacted::identity(&a), Compacted::identity(&b)];
        let mut marks = [ChangeMarks::new(6), ChangeMarks::new(6)];
        let mut ctx = Context::new(&sides, &mut marks);
        let (cost, part) = ctx.diag(0, 6, 0, 6, true);
        assert_eq!(cost, 4);
        assert!(part.lo_minimal && part.hi_minimal);
        assert_eq!(part.xmid - part.ymid, 0);
    }
}
