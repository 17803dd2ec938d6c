use crate::types::{HEURISTIC_WARMUP, SNAKE_LIMIT};

use super::Context;

const SNAKE: isize = SNAKE_LIMIT as isize;

/// A point of correspondence splitting a rectangle of the edit graph, and
/// whether each half should be searched without heuristics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub xmid: isize,
    pub ymid: isize,
    pub lo_minimal: bool,
    pub hi_minimal: bool,
}

impl Partition {
    fn exact(xmid: isize, ymid: isize) -> Self {
        Partition { xmid, ymid, lo_minimal: true, hi_minimal: true }
    }
}

impl Context<'_> {
    /// Find the midpoint of the shortest edit script for
    /// `xv[xoff..xlim]` against `yv[yoff..ylim]`.
    ///
    /// Forward and backward searches run in lockstep (Myers 1986, Section
    /// 4b) until their frontiers overlap; the overlap lies on an optimal
    /// path.  Returns the edit cost found and the partition.
    ///
    /// The rectangle must already be trimmed so that its first and last
    /// lines differ on both sides.  Unless `minimal` is set, the search may
    /// give up early through the big-snake shortcut or the too-expensive
    /// cutoff and return a point that is only approximately on an optimal
    /// path; the partition then says which half still deserves exact
    /// treatment.
    pub(crate) fn diag(
        &mut self,
        xoff: isize,
        xlim: isize,
        yoff: isize,
        ylim: isize,
        minimal: bool,
    ) -> (isize, Partition) {
        let xv = self.xv;
        let yv = self.yv;
        let dmin = xoff - ylim; // minimum valid diagonal
        let dmax = xlim - yoff; // maximum valid diagonal
        let fmid = xoff - yoff; // centre of the forward search
        let bmid = xlim - ylim; // centre of the backward search
        let (mut fmin, mut fmax) = (fmid, fmid);
        let (mut bmin, mut bmax) = (bmid, bmid);
        // Whether the south-east corner is on an odd diagonal from the
        // north-west one; decides which direction can detect the overlap.
        let odd = (fmid - bmid) & 1 != 0;

        self.fdiag.set(fmid, xoff);
        self.bdiag.set(bmid, xlim);

        let mut c: isize = 1;
        loop {
            let mut big_snake = false;

            // Extend the forward search by one edit step on every diagonal.
            if fmin > dmin {
                fmin -= 1;
                self.fdiag.set(fmin - 1, -1);
            } else {
                fmin += 1;
            }
            if fmax < dmax {
                fmax += 1;
                self.fdiag.set(fmax + 1, -1);
            } else {
                fmax -= 1;
            }
            let mut d = fmax;
            while d >= fmin {
                let tlo = self.fdiag.get(d - 1);
                let thi = self.fdiag.get(d + 1);
                let mut x = if tlo >= thi { tlo + 1 } else { thi };
                let oldx = x;
                let mut y = x - d;
                while x < xlim && y < ylim && xv[x as usize] == yv[y as usize] {
                    x += 1;
                    y += 1;
                }
                if x - oldx > SNAKE {
                    big_snake = true;
                }
                self.fdiag.set(d, x);
                if odd && bmin <= d && d <= bmax && self.bdiag.get(d) <= x {
                    return (2 * c - 1, Partition::exact(x, y));
                }
                d -= 2;
            }

            // Same for the backward search.
            if bmin > dmin {
                bmin -= 1;
                self.bdiag.set(bmin - 1, isize::MAX);
            } else {
                bmin += 1;
            }
            if bmax < dmax {
                bmax += 1;
                self.bdiag.set(bmax + 1, isize::MAX);
            } else {
                bmax -= 1;
            }
            let mut d = bmax;
            while d >= bmin {
                let tlo = self.bdiag.get(d - 1);
                let thi = self.bdiag.get(d + 1);
                let mut x = if tlo < thi { tlo } else { thi - 1 };
                let oldx = x;
                let mut y = x - d;
                while x > xoff && y > yoff && xv[x as usize - 1] == yv[y as usize - 1] {
                    x -= 1;
                    y -= 1;
                }
                if oldx - x > SNAKE {
                    big_snake = true;
                }
                self.bdiag.set(d, x);
                if !odd && fmin <= d && d <= fmax && x <= self.fdiag.get(d) {
                    return (2 * c, Partition::exact(x, y));
                }
                d -= 2;
            }

            if minimal {
                c += 1;
                continue;
            }

            // Heuristic: a diagonal that has made lots of progress compared
            // with the edit distance, ending in a big snake, is taken as if
            // the searches had met there.  Linear time for files with a
            // constant small density of changes.
            if c > HEURISTIC_WARMUP && big_snake {
                if let Some(part) = self.forward_big_snake(xoff, xlim, yoff, ylim, fmin, fmax, fmid, c) {
                    return (2 * c - 1, part);
                }
                if let Some(part) = self.backward_big_snake(xoff, xlim, yoff, ylim, bmin, bmax, bmid, c) {
                    return (2 * c - 1, part);
                }
            }

            // Heuristic: well beyond the call of duty; report the better of
            // the two frontiers.
            if c >= self.too_expensive {
                let part = self.cutoff(xoff, xlim, yoff, ylim, (fmin, fmax), (bmin, bmax));
                return (2 * c - 1, part);
            }

            c += 1;
        }
    }

    /// Forward diagonal with the most progress `2·(x − xoff) − dd` beyond
    /// `12·(c + |dd|)` that ends in a snake of `SNAKE_LIMIT` lines.  Only
    /// the half before it is known to be exact.
    #[allow(clippy::too_many_arguments)]
    fn forward_big_snake(
        &self,
        xoff: isize,
        xlim: isize,
        yoff: isize,
        ylim: isize,
        fmin: isize,
        fmax: isize,
        fmid: isize,
        c: isize,
    ) -> Option<Partition> {
        let (xv, yv) = (self.xv, self.yv);
        let mut best = 0;
        let mut found = None;
        let mut d = fmax;
        while d >= fmin {
            let dd = d - fmid;
            let x = self.fdiag.get(d);
            let y = x - d;
            let v = (x - xoff) * 2 - dd;
            if v > 12 * (c + dd.abs())
                && v > best
                && xoff + SNAKE <= x
                && x < xlim
                && yoff + SNAKE <= y
                && y < ylim
            {
                // Good enough; now insist it ends with a significant snake.
                let mut k = 1;
                while xv[(x - k) as usize] == yv[(y - k) as usize] {
                    if k == SNAKE {
                        best = v;
                        found = Some(Partition { xmid: x, ymid: y, lo_minimal: true, hi_minimal: false });
                        break;
                    }
                    k += 1;
                }
            }
            d -= 2;
        }
        found
    }

    /// Mirror of `forward_big_snake` with progress `2·(xlim − x) + dd`;
    /// only the half after the point is known to be exact.
    #[allow(clippy::too_many_arguments)]
    fn backward_big_snake(
        &self,
        xoff: isize,
        xlim: isize,
        yoff: isize,
        ylim: isize,
        bmin: isize,
        bmax: isize,
        bmid: isize,
        c: isize,
    ) -> Option<Partition> {
        let (xv, yv) = (self.xv, self.yv);
        let mut best = 0;
        let mut found = None;
        let mut d = bmax;
        while d >= bmin {
            let dd = d - bmid;
            let x = self.bdiag.get(d);
            let y = x - d;
            let v = (xlim - x) * 2 + dd;
            if v > 12 * (c + dd.abs())
                && v > best
                && xoff < x
                && x <= xlim - SNAKE
                && yoff < y
                && y <= ylim - SNAKE
            {
                let mut k = 0;
                while xv[(x + k) as usize] == yv[(y + k) as usize] {
                    if k == SNAKE - 1 {
                        best = v;
                        found = Some(Partition { xmid: x, ymid: y, lo_minimal: false, hi_minimal: true });
                        break;
                    }
                    k += 1;
                }
            }
            d -= 2;
        }
        found
    }

    /// Pick the forward diagonal maximising x + y and the backward diagonal
    /// minimising it, and split at whichever got further.  The half on the
    /// side of the chosen frontier is the one labelled minimal.
    fn cutoff(
        &self,
        xoff: isize,
        xlim: isize,
        yoff: isize,
        ylim: isize,
        (fmin, fmax): (isize, isize),
        (bmin, bmax): (isize, isize),
    ) -> Partition {
        let mut fxybest = -1;
        let mut fxbest = 0;
        let mut d = fmax;
        while d >= fmin {
            let mut x = self.fdiag.get(d).min(xlim);
            let mut y = x - d;
            if ylim < y {
                x = ylim + d;
                y = ylim;
            }
            if fxybest < x + y {
                fxybest = x + y;
                fxbest = x;
            }
            d -= 2;
        }

        let mut bxybest = isize::MAX;
        let mut bxbest = 0;
        let mut d = bmax;
        while d >= bmin {
            let mut x = self.bdiag.get(d).max(xoff);
            let mut y = x - d;
            if y < yoff {
                x = yoff + d;
                y = yoff;
            }
            if x + y < bxybest {
                bxybest = x + y;
                bxbest = x;
            }
            d -= 2;
        }

        if (xlim + ylim) - bxybest < fxybest - (xoff + yoff) {
            Partition {
                xmid: fxbest,
                ymid: fxybest - fxbest,
                lo_minimal: true,
                hi_minimal: false,
            }
        } else {
            Partition {
                xmid: bxbest,
                ymid: bxybest - bxbest,
                lo_minimal: false,
                hi_minimal: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discard::Compacted;
    use crate::marks::ChangeMarks;

    const C: isize = HEURISTIC_WARMUP + 1;

    fn sides(xv: Vec<usize>, yv: Vec<usize>) -> [Compacted; 2] {
        [Compacted::identity(&xv), Compacted::identity(&yv)]
    }

    fn marks(sides: &[Compacted; 2]) -> [ChangeMarks; 2] {
        [ChangeMarks::new(sides[0].len()), ChangeMarks::new(sides[1].len())]
    }

    // x = 1..=2000, y = x without its first 10 lines: every match lies on
    // diagonal 10, ten off the forward centre.
    fn shifted() -> [Compacted; 2] {
        let xv: Vec<usize> = (1..=2000).collect();
        let yv = xv[10..].to_vec();
        sides(xv, yv)
    }

    #[test]
    fn test_forward_snake_just_above_bound() {
        let sides = shifted();
        let mut m = marks(&sides);
        let mut ctx = Context::new(&sides, &mut m);
        // v = 2·1274 − 10 = 2538 > 12·(201 + 10) = 2532
        ctx.fdiag.set(10, 1274);
        let part = ctx.forward_big_snake(0, 2000, 0, 1990, 10, 10, 0, C);
        assert_eq!(
            part,
            Some(Partition { xmid: 1274, ymid: 1264, lo_minimal: true, hi_minimal: false })
        );
    }

    #[test]
    fn test_forward_snake_at_bound_rejected() {
        let sides = shifted();
        let mut m = marks(&sides);
        let mut ctx = Context::new(&sides, &mut m);
        // v = 2·1271 − 10 = 2532, not above the bound
        ctx.fdiag.set(10, 1271);
        assert_eq!(ctx.forward_big_snake(0, 2000, 0, 1990, 10, 10, 0, C), None);
    }

    #[test]
    fn test_forward_snake_needs_full_snake() {
        let xv: Vec<usize> = (1..=2000).collect();
        let mut yv = xv[10..].to_vec();
        // Break the run of equal lines five back from (1274, 1264).
        yv[1259] = 9999;
        let sides = sides(xv, yv);
        let mut m = marks(&sides);
        let mut ctx = Context::new(&sides, &mut m);
        ctx.fdiag.set(10, 1274);
        assert_eq!(ctx.forward_big_snake(0, 2000, 0, 1990, 10, 10, 0, C), None);
    }

    // x = 1..=2000, y = its first 1990 lines: matches lie on diagonal 0,
    // ten below the backward centre xlim − ylim = 10.
    fn truncated() -> [Compacted; 2] {
        let xv: Vec<usize> = (1..=2000).collect();
        let yv = xv[..1990].to_vec();
        sides(xv, yv)
    }

    #[test]
    fn test_backward_snake_just_above_bound() {
        let sides = truncated();
        let mut m = marks(&sides);
        let mut ctx = Context::new(&sides, &mut m);
        // v = 2·(2000 − 726) − 10 = 2538 > 2532
        ctx.bdiag.set(0, 726);
        let part = ctx.backward_big_snake(0, 2000, 0, 1990, 0, 0, 10, C);
        assert_eq!(
            part,
            Some(Partition { xmid: 726, ymid: 726, lo_minimal: false, hi_minimal: true })
        );
    }

    #[test]
    fn test_backward_snake_at_bound_rejected() {
        let sides = truncated();
        let mut m = marks(&sides);
        let mut ctx = Context::new(&sides, &mut m);
        // v = 2·(2000 − 729) − 10 = 2532
        ctx.bdiag.set(0, 729);
        assert_eq!(ctx.backward_big_snake(0, 2000, 0, 1990, 0, 0, 10, C), None);
    }

    #[test]
    fn test_cutoff_prefers_forward_frontier() {
        let sides = sides((1..=100).collect(), (101..=200).collect());
        let mut m = marks(&sides);
        let mut ctx = Context::new(&sides, &mut m);
        ctx.fdiag.set(0, 60);
        ctx.bdiag.set(0, 70);
        let part = ctx.cutoff(0, 100, 0, 100, (0, 0), (0, 0));
        assert_eq!(part, Partition { xmid: 60, ymid: 60, lo_minimal: true, hi_minimal: false });
    }

    #[test]
    fn test_cutoff_prefers_backward_frontier() {
        let sides = sides((1..=100).collect(), (101..=200).collect());
        let mut m = marks(&sides);
        let mut ctx = Context::new(&sides, &mut m);
        ctx.fdiag.set(0, 20);
        ctx.bdiag.set(0, 30);
        let part = ctx.cutoff(0, 100, 0, 100, (0, 0), (0, 0));
        assert_eq!(part, Partition { xmid: 30, ymid: 30, lo_minimal: false, hi_minimal: true });
    }

    #[test]
    fn test_cutoff_clamps_to_rectangle() {
        let sides = sides((1..=100).collect(), (101..=200).collect());
        let mut m = marks(&sides);
        let mut ctx = Context::new(&sides, &mut m);
        ctx.fdiag.set(0, 150);
        ctx.bdiag.set(0, 90);
        let part = ctx.cutoff(0, 100, 0, 100, (0, 0), (0, 0));
        assert_eq!(part, Partition { xmid: 100, ymid: 100, lo_minimal: true, hi_minimal: false });
    }
}
