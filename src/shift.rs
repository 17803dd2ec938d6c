//! Boundary shifter.
//!
//! The search decides *which* lines change but not where a run of changes
//! sits among identical neighbours: deleting the second of two equal lines
//! is as short as deleting the first.  This pass slides every run of
//! changes across identical lines so that runs merge where possible and
//! otherwise end as late as possible, lining up with a changed run on the
//! other side when one exists.

use crate::marks::ChangeMarks;

/// Slide the changed runs of both sides.
///
/// `equivs` are the full (undiscarded) class ids of each side.  With
/// `inhibit_hunk_merge`, runs are never pulled back into a previous run and
/// never pushed into the next one.
pub fn shift_boundaries(equivs: [&[usize]; 2], marks: &mut [ChangeMarks; 2], inhibit_hunk_merge: bool) {
    let [m0, m1] = marks;
    shift_side(m0, m1, equivs[0], inhibit_hunk_merge);
    shift_side(m1, m0, equivs[1], inhibit_hunk_merge);
}

fn shift_side(changed: &mut ChangeMarks, other: &ChangeMarks, equivs: &[usize], inhibit: bool) {
    let eq = |k: isize| equivs[k as usize];
    let i_end = changed.len() as isize;
    let mut i: isize = 0;
    // Cursor into `other`: the line of the other side aligned with `i`.
    let mut j: isize = 0;

    loop {
        // Find the beginning of the next run, keeping `j` in step by
        // skipping the other side's changed lines.
        while i < i_end && !changed.get(i) {
            while other.get(j) {
                j += 1;
            }
            j += 1;
            i += 1;
        }
        if i == i_end {
            break;
        }

        let mut start = i;
        i += 1;
        while changed.get(i) {
            i += 1;
        }
        while other.get(j) {
            j += 1;
        }

        // End of the run at the last point where it lines up with a changed
        // run on the other side; `i_end` when there is none.
        let mut corresponding;
        loop {
            let runlength = i - start;

            // Move the run back while the previous unchanged line matches
            // its last line; this merges with earlier runs.
            if !inhibit {
                while start > 0 && eq(start - 1) == eq(i - 1) {
                    start -= 1;
                    changed.set(start, true);
                    i -= 1;
                    changed.set(i, false);
                    while changed.get(start - 1) {
                        start -= 1;
                    }
                    j -= 1;
                    while other.get(j) {
                        j -= 1;
                    }
                }
            }

            corresponding = if other.get(j - 1) { i } else { i_end };

            // Move the run forward while its first line matches the next
            // unchanged line.  Done second so that, absent merges, the run
            // ends up as far forward as possible.
            while i != i_end && eq(start) == eq(i) && !(inhibit && other.get(j)) {
                changed.set(start, false);
                start += 1;
                changed.set(i, true);
                i += 1;
                while changed.get(i) {
                    i += 1;
                }
                j += 1;
                while other.get(j) {
                    corresponding = i;
                    j += 1;
                }
            }

            if runlength == i - start {
                break;
            }
        }

        // Prefer lining up with the other side's changes over sitting alone.
        while corresponding < i {
            start -= 1;
            changed.set(start, true);
            i -= 1;
            changed.set(i, false);
            j -= 1;
            while other.get(j) {
                j -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks_from(flags: &[bool]) -> ChangeMarks {
        let mut m = ChangeMarks::new(flags.len());
        for (i, &f) in flags.iter().enumerate() {
            if f {
                m.mark(i);
            }
        }
        m
    }

    fn flags(m: &ChangeMarks) -> Vec<bool> {
        m.iter().collect()
    }

    #[test]
    fn insertion_slides_to_last_position() {
        // A B C + "B C" inserted after A: the run ends up at the end.
        let a = [1, 2, 3];
        let b = [1, 2, 3, 2, 3];
        let mut marks = [marks_from(&[false; 3]), marks_from(&[false, true, true, false, false])];
        shift_boundaries([&a, &b], &mut marks, false);
        assert_eq!(flags(&marks[1]), vec![false, false, false, true, true]);
        assert_eq!(marks[0].count(), 0);
    }

    #[test]
    fn runs_merge_across_identical_line() {
        let a = [2];
        let b = [9, 2, 2];
        let mut marks = [marks_from(&[false]), marks_from(&[true, false, true])];
        shift_boundaries([&a, &b], &mut marks, false);
        assert_eq!(flags(&marks[1]), vec![true, true, false]);
    }

    #[test]
    fn inhibited_runs_do_not_merge() {
        let a = [2];
        let b = [9, 2, 2];
        let mut marks = [marks_from(&[false]), marks_from(&[true, false, true])];
        shift_boundaries([&a, &b], &mut marks, true);
        assert_eq!(flags(&marks[1]), vec![true, false, true]);
    }

    #[test]
    fn no_changes_is_noop() {
        let a = [1, 2, 3];
        let mut marks = [ChangeMarks::new(3), ChangeMarks::new(3)];
        shift_boundaries([&a, &a], &mut marks, false);
        assert_eq!(marks[0].count() + marks[1].count(), 0);
    }

    #[test]
    fn deletion_aligns_with_other_side_change() {
        // x: A B A C, y: A D C.  A search may delete the first "B A" pair;
        // shifting must keep the counts and stay in bounds.
        let x = [1, 2, 1, 3];
        let y = [1, 4, 3];
        let mut marks = [
            marks_from(&[false, true, true, false]),
            marks_from(&[false, true, false]),
        ];
        shift_boundaries([&x, &y], &mut marks, false);
        assert_eq!(marks[0].count(), 2);
        assert_eq!(marks[1].count(), 1);
        assert!(marks[1].is_changed(1));
    }
}
