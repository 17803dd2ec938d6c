//! Line classification.
//!
//! Each line is reduced to an equivalence-class id: lines that compare
//! equal under the active `LinePolicy` share an id.  Lines are bucketed by
//! a polynomial fingerprint over the Mersenne prime 2^61-1 and confirmed by
//! comparing their normalised bytes, so fingerprint collisions never merge
//! distinct lines.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::input::Lines;
use crate::types::{LinePolicy, HASH_BASE, HASH_MOD};

/// Reduce a u128 value modulo the Mersenne prime 2^61-1.
///
/// Uses the Mersenne identity: for M = 2^61-1, x mod M = (x >> 61) + (x & M),
/// with a final correction if the result >= M. No division needed.
#[inline]
pub fn mod_mersenne(x: u128) -> u64 {
    let m = HASH_MOD as u128;
    let mut r = (x >> 61) + (x & m);
    if r >= m {
        r -= m;
    }
    // x >> 61 can itself exceed M, so fold once more.
    let mut r2 = (r >> 61) + (r & m);
    if r2 >= m {
        r2 -= m;
    }
    r2 as u64
}

/// F(X) = (x_0 * b^{n-1} + x_1 * b^{n-2} + ... + x_{n-1}) mod (2^61-1)
pub fn fingerprint(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |h, &byte| {
        mod_mersenne(h as u128 * HASH_BASE as u128 + byte as u128)
    })
}

/// Fold a line according to the policy.  Borrows when nothing changes.
pub fn normalize(line: &[u8], policy: LinePolicy) -> Cow<'_, [u8]> {
    let space = policy.ignore_space_change || policy.ignore_all_space;
    let upper = policy.ignore_case && line.iter().any(u8::is_ascii_uppercase);
    let spaced = space && line.iter().any(u8::is_ascii_whitespace);
    if !upper && !spaced {
        return Cow::Borrowed(line);
    }

    let mut out = Vec::with_capacity(line.len());
    let mut pending_space = false;
    for &byte in line {
        if space && byte.is_ascii_whitespace() {
            // -w drops white space; -b keeps one blank per run, but only
            // once something follows it.
            pending_space = !policy.ignore_all_space;
            continue;
        }
        if pending_space {
            out.push(b' ');
            pending_space = false;
        }
        out.push(if policy.ignore_case { byte.to_ascii_lowercase() } else { byte });
    }
    Cow::Owned(out)
}

#[derive(Debug)]
struct Entry {
    text: Vec<u8>,
    incomplete: bool,
    class: usize,
}

/// Assigns class ids, starting at 1, shared across every side it
/// classifies.
#[derive(Debug)]
pub struct Classifier {
    policy: LinePolicy,
    buckets: HashMap<u64, Vec<Entry>>,
    next: usize,
}

impl Classifier {
    pub fn new(policy: LinePolicy) -> Self {
        Classifier {
            policy,
            buckets: HashMap::new(),
            next: 1,
        }
    }

    /// Class id of one line.  An unterminated last line never shares a
    /// class with a terminated one.
    pub fn class_of(&mut self, line: &[u8], incomplete: bool) -> usize {
        let text = normalize(line, self.policy);
        let bucket = self.buckets.entry(fingerprint(&text)).or_default();
        if let Some(entry) = bucket
            .iter()
            .find(|e| e.incomplete == incomplete && e.text[..] == text[..])
        {
            return entry.class;
        }
        let class = self.next;
        self.next += 1;
        bucket.push(Entry {
            text: text.into_owned(),
            incomplete,
            class,
        });
        class
    }

    /// Class ids of every line of one side.
    pub fn classify(&mut self, lines: &Lines<'_>) -> Vec<usize> {
        (0..lines.len())
            .map(|i| self.class_of(lines.get(i), lines.is_incomplete(i)))
            .collect()
    }

    /// Number of distinct classes handed out so far.
    pub fn num_classes(&self) -> usize {
        self.next - 1
    }
}
