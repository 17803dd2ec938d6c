//! Per-line changed flags with a false sentinel at each end.
//!
//! Indices run from -1 to `len` inclusive; the two sentinels are never set,
//! so scans may step one past either end without a bounds test.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeMarks {
    flags: Vec<bool>,
}

impl ChangeMarks {
    pub fn new(len: usize) -> Self {
        ChangeMarks { flags: vec![false; len + 2] }
    }

    /// Number of real lines (sentinels excluded).
    pub fn len(&self) -> usize {
        self.flags.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads a flag; anything outside `-1..=len` reads as unchanged.
    #[inline]
    pub fn get(&self, i: isize) -> bool {
        if i < -1 {
            return false;
        }
        self.flags.get((i + 1) as usize).copied().unwrap_or(false)
    }

    /// Sets the flag of a real line.
    ///
    /// Panics if `i` is a sentinel or out of range.
    #[inline]
    pub fn set(&mut self, i: isize, changed: bool) {
        assert!(
            i >= 0 && (i as usize) < self.len(),
            "change mark index {} outside 0..{}",
            i,
            self.len()
        );
        self.flags[(i + 1) as usize] = changed;
    }

    pub fn mark(&mut self, i: usize) {
        self.set(i as isize, true);
    }

    pub fn is_changed(&self, i: usize) -> bool {
        self.get(i as isize)
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Iterates the flags of the real lines.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.flags[1..self.flags.len() - 1].iter().copied()
    }
}
