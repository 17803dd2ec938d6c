//! Line discarder.
//!
//! Lines whose class never occurs on the other side cannot be part of any
//! common subsequence, and lines whose class occurs very often on the other
//! side only slow the search down.  Both kinds are removed before the
//! search and marked changed up front.  Provisional (too common) discards
//! survive only inside runs of real discards, so that discarding never turns
//! a good match into a worse one.

use log::debug;

use crate::marks::ChangeMarks;
use crate::types::{EDGE_RUN, EDGE_SCAN, MANY_BASE, UNCLASSIFIED};

/// One side after discarding: the ids the search sees, and for each of them
/// the index of the original line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compacted {
    pub kept: Vec<usize>,
    pub real_index: Vec<usize>,
}

impl Compacted {
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// Every line kept, in order.
    pub fn identity(equivs: &[usize]) -> Self {
        Compacted {
            kept: equivs.to_vec(),
            real_index: (0..equivs.len()).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Discard {
    Keep,
    Always,
    Provisional,
}

/// Threshold above which a line is provisionally discardable: 5 doubled once
/// per non-zero step of `>> 2` starting from `lines / 64`, i.e. roughly
/// proportional to the square root of the side's length.
pub fn many_threshold(lines: usize) -> usize {
    let mut many = MANY_BASE;
    let mut tem = lines / 64;
    loop {
        tem >>= 2;
        if tem == 0 {
            break;
        }
        many *= 2;
    }
    many
}

/// Shortest provisional sub-run that is cancelled inside a discard run of
/// `length` lines: 1 + approximately the square root of `length / 4`.
pub fn minimum_subrun(length: usize) -> usize {
    let mut minimum = 1;
    let mut tem = length / 4;
    loop {
        tem >>= 2;
        if tem == 0 {
            break;
        }
        minimum *= 2;
    }
    minimum + 1
}

/// Per-class line counts, indexed by class id.
fn histogram(equivs: &[usize], classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; classes];
    for &e in equivs {
        if e != UNCLASSIFIED {
            counts[e] += 1;
        }
    }
    counts
}

fn classify(equivs: &[usize], other_counts: &[usize], many: usize) -> Vec<Discard> {
    equivs
        .iter()
        .map(|&e| {
            if e == UNCLASSIFIED {
                return Discard::Keep;
            }
            match other_counts[e] {
                0 => Discard::Always,
                n if n > many => Discard::Provisional,
                _ => Discard::Keep,
            }
        })
        .collect()
}

/// Cancel every provisional sub-run of `minimum` or more lines.
fn cancel_long_subruns(run: &mut [Discard], minimum: usize) {
    let mut consec = 0usize;
    for j in 0..run.len() {
        if run[j] != Discard::Provisional {
            consec = 0;
            continue;
        }
        consec += 1;
        if consec == minimum {
            for d in &mut run[j + 1 - minimum..=j] {
                *d = Discard::Keep;
            }
        } else if consec > minimum {
            run[j] = Discard::Keep;
        }
    }
}

/// Walk in from one end of a run, cancelling provisionals until three
/// consecutive real discards are seen or a real discard is found at least
/// `EDGE_SCAN` lines in.
fn cancel_edge(run: &mut [Discard], order: impl Iterator<Item = usize>) {
    let mut consec = 0usize;
    for (step, idx) in order.enumerate() {
        if step >= EDGE_SCAN && run[idx] == Discard::Always {
            break;
        }
        match run[idx] {
            Discard::Provisional => {
                consec = 0;
                run[idx] = Discard::Keep;
            }
            Discard::Keep => consec = 0,
            Discard::Always => consec += 1,
        }
        if consec == EDGE_RUN {
            break;
        }
    }
}

/// Keep provisional discards only in the middle of runs of discards that
/// begin and end with real discards.
fn cancel_isolated_provisionals(discards: &mut [Discard]) {
    let end = discards.len();
    let mut i = 0;
    while i < end {
        match discards[i] {
            Discard::Keep => {
                i += 1;
            }
            Discard::Provisional => {
                discards[i] = Discard::Keep;
                i += 1;
            }
            Discard::Always => {
                let mut j = i;
                let mut provisional = 0usize;
                while j < end && discards[j] != Discard::Keep {
                    if discards[j] == Discard::Provisional {
                        provisional += 1;
                    }
                    j += 1;
                }

                // The run must end on a real discard.
                while j > i && discards[j - 1] == Discard::Provisional {
                    j -= 1;
                    discards[j] = Discard::Keep;
                    provisional -= 1;
                }

                let run = &mut discards[i..j];
                let length = run.len();

                if provisional * 4 > length {
                    for d in run.iter_mut() {
                        if *d == Discard::Provisional {
                            *d = Discard::Keep;
                        }
                    }
                } else {
                    cancel_long_subruns(run, minimum_subrun(length));
                    cancel_edge(run, 0..length);
                    cancel_edge(run, (0..length).rev());
                }

                i = j;
            }
        }
    }
}

/// Remove unmatchable and overly common lines from both sides.
///
/// Every line actually discarded is marked changed in `marks`.  With
/// `no_discards` nothing is removed and the returned sides are the inputs.
pub fn discard_confusing_lines(
    equivs: [&[usize]; 2],
    marks: &mut [ChangeMarks; 2],
    no_discards: bool,
    many_override: Option<usize>,
) -> [Compacted; 2] {
    if no_discards {
        return [Compacted::identity(equivs[0]), Compacted::identity(equivs[1])];
    }

    let classes = equivs
        .iter()
        .flat_map(|side| side.iter().copied())
        .max()
        .map_or(1, |m| m + 1);
    let counts = [histogram(equivs[0], classes), histogram(equivs[1], classes)];

    let mut result: [Compacted; 2] = Default::default();
    for f in 0..2 {
        let side = equivs[f];
        let many = many_override.unwrap_or_else(|| many_threshold(side.len()));
        let mut discards = classify(side, &counts[1 - f], many);
        cancel_isolated_provisionals(&mut discards);

        let out = &mut result[f];
        for (i, (&e, d)) in side.iter().zip(&discards).enumerate() {
            if *d == Discard::Keep {
                out.kept.push(e);
                out.real_index.push(i);
            } else {
                marks[f].mark(i);
            }
        }

        debug!(
            "discard: side {} keeps {} of {} lines (many={})",
            f,
            out.len(),
            side.len(),
            many
        );
    }
    result
}
