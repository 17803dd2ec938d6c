/// Furthest-reaching x coordinate per diagonal, indexed by signed diagonal
/// number `x - y`.
///
/// For an `xlen × ylen` edit graph the search touches diagonals
/// `-(ylen + 1) ..= xlen + 1` (one guard slot past each valid extreme), so
/// the buffer holds `xlen + ylen + 3` slots with a bias of `ylen + 1`.
#[derive(Clone, Debug)]
pub struct DiagonalVector {
    data: Vec<isize>,
    bias: isize,
}

impl DiagonalVector {
    pub fn new(xlen: usize, ylen: usize) -> Self {
        DiagonalVector {
            data: vec![0; xlen + ylen + 3],
            bias: ylen as isize + 1,
        }
    }

    #[inline]
    fn slot(&self, diagonal: isize) -> usize {
        let idx = diagonal + self.bias;
        assert!(
            idx >= 0 && (idx as usize) < self.data.len(),
            "diagonal {} outside {}..{}",
            diagonal,
            -self.bias,
            self.data.len() as isize - self.bias
        );
        idx as usize
    }

    #[inline]
    pub fn get(&self, diagonal: isize) -> isize {
        self.data[self.slot(diagonal)]
    }

    #[inline]
    pub fn set(&mut self, diagonal: isize, x: isize) {
        let slot = self.slot(diagonal);
        self.data[slot] = x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_are_addressable() {
        let mut v = DiagonalVector::new(4, 3);
        v.set(-4, 7);
        v.set(5, 9);
        assert_eq!(v.get(-4), 7);
        assert_eq!(v.get(5), 9);
        assert_eq!(v.get(0), 0);
    }

    #[test]
    #[should_panic]
    fn below_range_panics() {
        let v = DiagonalVector::new(4, 3);
        v.get(-5);
    }

    #[test]
    #[should_panic]
    fn above_range_panics() {
        let v = DiagonalVector::new(4, 3);
        v.get(6);
    }
}
