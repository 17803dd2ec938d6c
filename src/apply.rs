use crate::types::Hunk;

/// Compute the length of side 1 implied by side 0 and a script.
pub fn output_len(len0: usize, script: &[Hunk]) -> usize {
    let deleted: usize = script.iter().map(|h| h.deleted).sum();
    let inserted: usize = script.iter().map(|h| h.inserted).sum();
    len0 + inserted - deleted
}

/// Apply a forward script: copy unchanged stretches of `a`, take inserted
/// lines from `b`.
///
/// Panics if the hunks are out of order or out of bounds.
pub fn apply_script<T: Clone>(a: &[T], b: &[T], script: &[Hunk]) -> Vec<T> {
    let mut out = Vec::with_capacity(output_len(a.len(), script));
    let mut pos = 0;
    for hunk in script {
        assert!(hunk.line0 >= pos, "hunk {} overlaps previous hunk", hunk);
        out.extend_from_slice(&a[pos..hunk.line0]);
        out.extend_from_slice(&b[hunk.line1..hunk.line1 + hunk.inserted]);
        pos = hunk.line0 + hunk.deleted;
    }
    out.extend_from_slice(&a[pos..]);
    out
}

/// Apply a reverse script (last hunk first) in place, the way an ed script
/// is applied: later hunks are edited first so earlier line numbers stay
/// valid.
pub fn apply_reverse_script<T: Clone>(a: &[T], b: &[T], script: &[Hunk]) -> Vec<T> {
    let mut out = a.to_vec();
    let mut limit = usize::MAX;
    for hunk in script {
        assert!(
            hunk.line0 + hunk.deleted <= limit,
            "hunk {} out of reverse order",
            hunk
        );
        out.splice(
            hunk.line0..hunk.line0 + hunk.deleted,
            b[hunk.line1..hunk.line1 + hunk.inserted].iter().cloned(),
        );
        limit = hunk.line0;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_forward() {
        let a = ["a", "b", "c", "d"];
        let b = ["a", "x", "c", "d", "e"];
        let script = [Hunk::new(1, 1, 1, 1), Hunk::new(4, 4, 0, 1)];
        assert_eq!(apply_script(&a, &b, &script), b.to_vec());
        assert_eq!(output_len(a.len(), &script), b.len());
    }

    #[test]
    fn test_apply_reverse() {
        let a = ["a", "b", "c", "d"];
        let b = ["b", "c", "y"];
        let script = [Hunk::new(3, 2, 1, 1), Hunk::new(0, 0, 1, 0)];
        assert_eq!(apply_reverse_script(&a, &b, &script), b.to_vec());
    }

    #[test]
    fn test_empty_script_is_identity() {
        let a = [1, 2, 3];
        assert_eq!(apply_script(&a, &a, &[]), a.to_vec());
        assert_eq!(apply_reverse_script(&a, &a, &[]), a.to_vec());
    }

    #[test]
    #[should_panic]
    fn test_overlapping_hunks_panic() {
        let a = [1, 2, 3];
        let b = [1, 2, 3];
        apply_script(&a, &b, &[Hunk::new(1, 1, 2, 0), Hunk::new(2, 1, 1, 0)]);
    }
}
