//! Script builder: changed marks → hunks.
//!
//! Unchanged lines of the two sides pair up one to one, so walking both
//! mark arrays in lockstep and stepping over each unchanged pair leaves the
//! cursors at matching alignment points; every stretch of changes found
//! there, in either side, is one hunk.

use crate::marks::ChangeMarks;
use crate::types::Hunk;

/// Hunks in forward order, found by scanning from the end toward the start.
pub fn build_script(marks: &[ChangeMarks; 2]) -> Vec<Hunk> {
    let (changed0, changed1) = (&marks[0], &marks[1]);
    let mut i0 = changed0.len() as isize;
    let mut i1 = changed1.len() as isize;
    let mut script = Vec::new();

    while i0 >= 0 || i1 >= 0 {
        if changed0.get(i0 - 1) || changed1.get(i1 - 1) {
            let (end0, end1) = (i0, i1);
            while changed0.get(i0 - 1) {
                i0 -= 1;
            }
            while changed1.get(i1 - 1) {
                i1 -= 1;
            }
            script.push(Hunk::new(
                i0 as usize,
                i1 as usize,
                (end0 - i0) as usize,
                (end1 - i1) as usize,
            ));
        }
        // Step over a pair of lines that match each other.
        i0 -= 1;
        i1 -= 1;
    }

    script.reverse();
    script
}

/// Hunks in reverse order (last hunk first), found by scanning from the
/// start toward the end.
pub fn build_reverse_script(marks: &[ChangeMarks; 2]) -> Vec<Hunk> {
    let (changed0, changed1) = (&marks[0], &marks[1]);
    let (len0, len1) = (changed0.len() as isize, changed1.len() as isize);
    let mut i0: isize = 0;
    let mut i1: isize = 0;
    let mut script = Vec::new();

    while i0 < len0 || i1 < len1 {
        if changed0.get(i0) || changed1.get(i1) {
            let (line0, line1) = (i0, i1);
            while changed0.get(i0) {
                i0 += 1;
            }
            while changed1.get(i1) {
                i1 += 1;
            }
            script.push(Hunk::new(
                line0 as usize,
                line1 as usize,
                (i0 - line0) as usize,
                (i1 - line1) as usize,
            ));
        }
        i0 += 1;
        i1 += 1;
    }

    script.reverse();
    script
}
