//! Myers LCS diff engine, bidirectional variant.
//!
//! Implements Eugene Myers' O(ND) difference algorithm ("An O(ND)
//! Difference Algorithm and Its Variations", 1986) with a divide-and-conquer
//! middle-snake search running forward and reverse passes simultaneously.
//! Per-round snapshots of the diagonal arrays are retained up to a fixed
//! cap so that, in the common case, the full change list is reconstructed
//! by walking the snapshots backward without recursing; deeper searches
//! fall back to returning the midpoint and bisecting.
//!
//! The search polls an optional caller-supplied predicate once per outer
//! round; when it returns false the engine stops, keeps what it resolved
//! so far, and reports the unresolved remainder as one covering change
//! with `quit_early` set.

use crate::sequence::DiffSequence;

/// Number of search rounds for which the diagonal arrays are snapshotted.
/// Beyond this depth the engine returns only the midpoint and the caller
/// recurses on the two halves.
const MAX_DIFFERENCES_HISTORY: isize = 1447;

/// A single entry in an edit script: `original_length` items starting at
/// `original_start` are replaced by `modified_length` items starting at
/// `modified_start`. Either length may be zero (pure insertion or pure
/// deletion), never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffChange {
    pub original_start: usize,
    pub original_length: usize,
    pub modified_start: usize,
    pub modified_length: usize,
}

impl DiffChange {
    pub fn new(
        original_start: usize,
        original_length: usize,
        modified_start: usize,
        modified_length: usize,
    ) -> Self {
        Self {
            original_start,
            original_length,
            modified_start,
            modified_length,
        }
    }

    /// One past the last original position covered by this change.
    pub fn original_end(&self) -> usize {
        self.original_start + self.original_length
    }

    /// One past the last modified position covered by this change.
    pub fn modified_end(&self) -> usize {
        self.modified_start + self.modified_length
    }
}

/// Result of one LCS computation.
#[derive(Debug, Clone)]
pub struct LcsDiffResult {
    pub changes: Vec<DiffChange>,
    /// True when the search was abandoned before convergence because the
    /// continue-processing predicate returned false. The trailing region
    /// is then over-approximated as a single change.
    pub quit_early: bool,
}

/// Predicate polled once per search round with the furthest original
/// index reached and the match length of the best path so far. Returning
/// false abandons the search.
pub type ContinueProcessing<'a> = &'a dyn Fn(usize, usize) -> bool;

/// Outcome of one middle-snake search over a subrange.
struct RecursionPoint {
    mid_original: usize,
    mid_modified: usize,
    /// Fully reconstructed changes when the snapshot history sufficed;
    /// `None` means the caller must recurse around the midpoint.
    changes: Option<Vec<DiffChange>>,
    quit_early: bool,
}

/// Snapshot of the live diagonal window after one search round.
struct DiagonalWindow {
    k_min: isize,
    points: Vec<isize>,
}

impl DiagonalWindow {
    fn capture(v: &[isize], offset: isize, k_min: isize, k_max: isize) -> Self {
        let lo = (k_min + offset) as usize;
        let hi = (k_max + offset) as usize;
        Self {
            k_min,
            points: v[lo..=hi].to_vec(),
        }
    }

    fn get(&self, k: isize) -> isize {
        self.points[(k - self.k_min) as usize]
    }
}

/// Clip the diagonal range for round `d` to diagonals that can hold a
/// valid path, keeping the parity of `d` (only every other diagonal is
/// reachable in a given round).
fn clip_diagonal_bounds(d: isize, n: isize, m: isize) -> (isize, isize) {
    let mut k_min = -d.min(m);
    if (d - k_min) % 2 != 0 {
        k_min += 1;
    }
    let mut k_max = d.min(n);
    if (d - k_max) % 2 != 0 {
        k_max -= 1;
    }
    (k_min, k_max)
}

/// Merge two ordered changes into one if they touch or overlap on either
/// sequence.
fn merge_if_touching(left: DiffChange, right: DiffChange) -> Option<DiffChange> {
    debug_assert!(
        left.original_start <= right.original_start,
        "changes out of order on the original sequence"
    );
    debug_assert!(
        left.modified_start <= right.modified_start,
        "changes out of order on the modified sequence"
    );
    if left.original_end() >= right.original_start || left.modified_end() >= right.modified_start {
        let original_length = if left.original_end() >= right.original_start {
            right.original_end() - left.original_start
        } else {
            left.original_length
        };
        let modified_length = if left.modified_end() >= right.modified_start {
            right.modified_end() - left.modified_start
        } else {
            left.modified_length
        };
        Some(DiffChange::new(
            left.original_start,
            original_length,
            left.modified_start,
            modified_length,
        ))
    } else {
        None
    }
}

/// Fuse touching neighbors so the list is maximally merged.
fn coalesce(changes: Vec<DiffChange>) -> Vec<DiffChange> {
    let mut result: Vec<DiffChange> = Vec::with_capacity(changes.len());
    for change in changes {
        if let Some(last) = result.last_mut() {
            if let Some(merged) = merge_if_touching(*last, change) {
                *last = merged;
                continue;
            }
        }
        result.push(change);
    }
    result
}

/// Concatenate the change lists of two adjacent halves, fusing the
/// boundary changes when the recursive split cut through the middle of
/// what should be a single change.
fn concatenate_changes(mut left: Vec<DiffChange>, right: Vec<DiffChange>) -> Vec<DiffChange> {
    let Some(&last) = left.last() else {
        return right;
    };
    let mut right = right.into_iter();
    if let Some(first) = right.next() {
        match merge_if_touching(last, first) {
            Some(merged) => {
                if let Some(slot) = left.last_mut() {
                    *slot = merged;
                }
            }
            None => left.push(first),
        }
        left.extend(right);
    }
    left
}

/// The LCS diff engine over two sequences of the same kind.
pub struct LcsDiff<'a, S: DiffSequence> {
    original: &'a S,
    modified: &'a S,
    original_elements: &'a [u64],
    modified_elements: &'a [u64],
    predicate: Option<ContinueProcessing<'a>>,
}

impl<'a, S: DiffSequence> LcsDiff<'a, S> {
    pub fn new(
        original: &'a S,
        modified: &'a S,
        predicate: Option<ContinueProcessing<'a>>,
    ) -> Self {
        Self {
            original,
            modified,
            original_elements: original.elements(),
            modified_elements: modified.elements(),
            predicate,
        }
    }

    /// Compute the shortest edit script between the two sequences.
    pub fn compute_diff(&self, pretty: bool) -> LcsDiffResult {
        let (mut changes, quit_early) = self.compute_diff_recursive(
            0,
            self.original_elements.len(),
            0,
            self.modified_elements.len(),
        );
        if pretty {
            changes = self.prettify_changes(changes);
        }
        LcsDiffResult {
            changes,
            quit_early,
        }
    }

    fn elements_equal(&self, original_index: usize, modified_index: usize) -> bool {
        if self.original_elements[original_index] != self.modified_elements[modified_index] {
            return false;
        }
        // Hash collisions must never count as a match.
        match (
            self.original.element_str(original_index),
            self.modified.element_str(modified_index),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    fn original_elements_equal(&self, i: usize, j: usize) -> bool {
        if self.original_elements[i] != self.original_elements[j] {
            return false;
        }
        match (self.original.element_str(i), self.original.element_str(j)) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    fn modified_elements_equal(&self, i: usize, j: usize) -> bool {
        if self.modified_elements[i] != self.modified_elements[j] {
            return false;
        }
        match (self.modified.element_str(i), self.modified.element_str(j)) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Diff the half-open ranges `[ostart, oend)` x `[mstart, mend)`.
    fn compute_diff_recursive(
        &self,
        mut ostart: usize,
        mut oend: usize,
        mut mstart: usize,
        mut mend: usize,
    ) -> (Vec<DiffChange>, bool) {
        // Common elements at the very start and end are not part of any
        // change; trimming them bounds the search range.
        while ostart < oend && mstart < mend && self.elements_equal(ostart, mstart) {
            ostart += 1;
            mstart += 1;
        }
        while oend > ostart && mend > mstart && self.elements_equal(oend - 1, mend - 1) {
            oend -= 1;
            mend -= 1;
        }

        if ostart == oend || mstart == mend {
            let changes = if mstart < mend {
                debug_assert!(ostart == oend, "original range must be exhausted");
                vec![DiffChange::new(ostart, 0, mstart, mend - mstart)]
            } else if ostart < oend {
                debug_assert!(mstart == mend, "modified range must be exhausted");
                vec![DiffChange::new(ostart, oend - ostart, mstart, 0)]
            } else {
                Vec::new()
            };
            return (changes, false);
        }

        let point = self.compute_recursion_point(ostart, oend, mstart, mend);
        if let Some(changes) = point.changes {
            return (changes, point.quit_early);
        }

        // Bisect around the midpoint: first half [ostart, mid), second
        // half [mid, oend).
        let (left, left_quit) =
            self.compute_diff_recursive(ostart, point.mid_original, mstart, point.mid_modified);
        let (right, right_quit) = if left_quit {
            // The budget ran out inside the first half; consider the
            // entire rest of the range different.
            (
                vec![DiffChange::new(
                    point.mid_original,
                    oend - point.mid_original,
                    point.mid_modified,
                    mend - point.mid_modified,
                )],
                true,
            )
        } else {
            self.compute_diff_recursive(point.mid_original, oend, point.mid_modified, mend)
        };
        (concatenate_changes(left, right), left_quit || right_quit)
    }

    /// Bidirectional furthest-reaching search over `[ostart, oend)` x
    /// `[mstart, mend)`. Both subranges are non-empty and share no common
    /// prefix or suffix.
    fn compute_recursion_point(
        &self,
        ostart: usize,
        oend: usize,
        mstart: usize,
        mend: usize,
    ) -> RecursionPoint {
        let n = (oend - ostart) as isize;
        let m = (mend - mstart) as isize;
        let delta = n - m;
        let odd = delta % 2 != 0;

        // The searches must meet by round ceil((n + m) / 2).
        let max_d = (n + m + 1) / 2 + 1;
        let offset = max_d + 1;
        let array_size = (2 * max_d + 3) as usize;

        // v[k + offset] = furthest original index reached on diagonal k.
        let mut vf = vec![0isize; array_size];
        let mut vb = vec![0isize; array_size];

        let mut forward_history: Vec<DiagonalWindow> = Vec::new();
        let mut reverse_history: Vec<DiagonalWindow> = Vec::new();

        for d in 0..=max_d {
            let (k_min, k_max) = clip_diagonal_bounds(d, n, m);

            // Forward pass: extend the furthest reaching path on every
            // diagonal of this round's parity.
            let mut furthest_x = 0isize;
            let mut furthest_y = 0isize;
            let mut k = k_min;
            while k <= k_max {
                let mut x = if k == k_min
                    || (k != k_max && vf[(k - 1 + offset) as usize] < vf[(k + 1 + offset) as usize])
                {
                    vf[(k + 1 + offset) as usize]
                } else {
                    vf[(k - 1 + offset) as usize] + 1
                };
                let mut y = x - k;
                let x0 = x;
                while x < n
                    && y < m
                    && self.elements_equal(ostart + x as usize, mstart + y as usize)
                {
                    x += 1;
                    y += 1;
                }
                vf[(k + offset) as usize] = x;
                if x + y > furthest_x + furthest_y {
                    furthest_x = x;
                    furthest_y = y;
                }

                // With an odd delta the searches can only first meet on a
                // forward round, against the reverse front of round d - 1.
                if odd && (k - delta).abs() <= d - 1 {
                    let rx = vb[(delta - k + offset) as usize];
                    if x + rx >= n {
                        let x_rev = n - rx;
                        let y_rev = x_rev - k;
                        if x0 <= x_rev && d <= MAX_DIFFERENCES_HISTORY + 1 {
                            let left = self.walk_forward_history(
                                &forward_history,
                                d,
                                x,
                                y,
                                ostart,
                                mstart,
                                n,
                                m,
                            );
                            let right = self.walk_reverse_history(
                                &reverse_history,
                                d - 1,
                                x_rev,
                                y_rev,
                                ostart,
                                mstart,
                                n,
                                m,
                            );
                            return RecursionPoint {
                                mid_original: ostart + x as usize,
                                mid_modified: mstart + y as usize,
                                changes: Some(concatenate_changes(left, right)),
                                quit_early: false,
                            };
                        }
                        // False overlap (the paths passed each other) or
                        // the history cap was exceeded: report only the
                        // midpoint and let the caller bisect.
                        return RecursionPoint {
                            mid_original: ostart + x as usize,
                            mid_modified: mstart + y as usize,
                            changes: None,
                            quit_early: false,
                        };
                    }
                }
                k += 2;
            }

            if d <= MAX_DIFFERENCES_HISTORY {
                forward_history.push(DiagonalWindow::capture(&vf, offset, k_min, k_max));
            }

            // Cooperative cancellation checkpoint, once per round.
            if d >= 1 {
                if let Some(predicate) = self.predicate {
                    let match_length = (furthest_x + furthest_y - d) / 2;
                    if !predicate(
                        ostart + furthest_x as usize,
                        match_length.max(0) as usize,
                    ) {
                        return self.quit_early_point(
                            &forward_history,
                            d,
                            furthest_x,
                            furthest_y,
                            match_length,
                            ostart,
                            oend,
                            mstart,
                            mend,
                            n,
                            m,
                        );
                    }
                }
            }

            // Reverse pass, mirrored coordinates measured from (n, m).
            let mut k = k_min;
            while k <= k_max {
                let mut x = if k == k_min
                    || (k != k_max && vb[(k - 1 + offset) as usize] < vb[(k + 1 + offset) as usize])
                {
                    vb[(k + 1 + offset) as usize]
                } else {
                    vb[(k - 1 + offset) as usize] + 1
                };
                let mut y = x - k;
                let x0 = x;
                while x < n
                    && y < m
                    && self.elements_equal(
                        ostart + (n - 1 - x) as usize,
                        mstart + (m - 1 - y) as usize,
                    )
                {
                    x += 1;
                    y += 1;
                }
                vb[(k + offset) as usize] = x;

                // With an even delta the searches first meet on a reverse
                // round, against the forward front of the same round.
                if !odd && (k - delta).abs() <= d {
                    let forward_k = delta - k;
                    let fx = vf[(forward_k + offset) as usize];
                    if x + fx >= n {
                        let fy = fx - forward_k;
                        let x_rev = n - x;
                        let y_rev = x_rev - forward_k;
                        let x_rev_pre_snake = n - x0;
                        if fx <= x_rev_pre_snake && d <= MAX_DIFFERENCES_HISTORY + 1 {
                            let left = self.walk_forward_history(
                                &forward_history,
                                d,
                                fx,
                                fy,
                                ostart,
                                mstart,
                                n,
                                m,
                            );
                            let right = self.walk_reverse_history(
                                &reverse_history,
                                d,
                                x_rev,
                                y_rev,
                                ostart,
                                mstart,
                                n,
                                m,
                            );
                            return RecursionPoint {
                                mid_original: ostart + x_rev as usize,
                                mid_modified: mstart + y_rev as usize,
                                changes: Some(concatenate_changes(left, right)),
                                quit_early: false,
                            };
                        }
                        return RecursionPoint {
                            mid_original: ostart + x_rev as usize,
                            mid_modified: mstart + y_rev as usize,
                            changes: None,
                            quit_early: false,
                        };
                    }
                }
                k += 2;
            }

            if d <= MAX_DIFFERENCES_HISTORY {
                reverse_history.push(DiagonalWindow::capture(&vb, offset, k_min, k_max));
            }
        }

        unreachable!("diff search failed to converge within (n + m) / 2 + 1 rounds");
    }

    /// Build the result for a search abandoned by the predicate: keep the
    /// changes resolved up to the furthest point, over-approximate the
    /// rest as one covering change.
    #[allow(clippy::too_many_arguments)]
    fn quit_early_point(
        &self,
        forward_history: &[DiagonalWindow],
        d: isize,
        furthest_x: isize,
        furthest_y: isize,
        match_length: isize,
        ostart: usize,
        oend: usize,
        mstart: usize,
        mend: usize,
        n: isize,
        m: isize,
    ) -> RecursionPoint {
        let mid_original = ostart + furthest_x as usize;
        let mid_modified = mstart + furthest_y as usize;

        let changes = if match_length > 0 && d <= MAX_DIFFERENCES_HISTORY + 1 {
            let resolved =
                self.walk_forward_history(forward_history, d, furthest_x, furthest_y, ostart, mstart, n, m);
            let mut rest_original = mid_original;
            let mut rest_modified = mid_modified;
            if let Some(last) = resolved.last() {
                rest_original = rest_original.max(last.original_end());
                rest_modified = rest_modified.max(last.modified_end());
            }
            if rest_original < oend || rest_modified < mend {
                let tail = DiffChange::new(
                    rest_original,
                    oend - rest_original,
                    rest_modified,
                    mend - rest_modified,
                );
                concatenate_changes(resolved, vec![tail])
            } else {
                resolved
            }
        } else {
            // Not enough history (or nothing matched yet): the whole
            // remaining range counts as changed.
            vec![DiffChange::new(
                ostart,
                oend - ostart,
                mstart,
                mend - mstart,
            )]
        };

        RecursionPoint {
            mid_original,
            mid_modified,
            changes: Some(changes),
            quit_early: true,
        }
    }

    /// Walk the forward snapshots back from the point `(x, y)` reached in
    /// round `d_mid`, emitting the changes of the first half in order.
    #[allow(clippy::too_many_arguments)]
    fn walk_forward_history(
        &self,
        history: &[DiagonalWindow],
        d_mid: isize,
        mut x: isize,
        mut y: isize,
        ostart: usize,
        mstart: usize,
        n: isize,
        m: isize,
    ) -> Vec<DiffChange> {
        let mut units: Vec<DiffChange> = Vec::new();
        for d in (1..=d_mid).rev() {
            let prev = &history[(d - 1) as usize];
            let k = x - y;
            let (k_min, k_max) = clip_diagonal_bounds(d, n, m);
            let down = k == k_min || (k != k_max && prev.get(k - 1) < prev.get(k + 1));
            if down {
                // Vertical move: modified element inserted.
                let post_x = prev.get(k + 1);
                let post_y = post_x - k;
                units.push(DiffChange::new(
                    ostart + post_x as usize,
                    0,
                    mstart + (post_y - 1) as usize,
                    1,
                ));
                x = post_x;
                y = post_y - 1;
            } else {
                // Horizontal move: original element deleted.
                let post_x = prev.get(k - 1) + 1;
                let post_y = post_x - k;
                units.push(DiffChange::new(
                    ostart + (post_x - 1) as usize,
                    1,
                    mstart + post_y as usize,
                    0,
                ));
                x = post_x - 1;
                y = post_y;
            }
        }
        debug_assert!(x == y, "forward walk must end on the zero diagonal");
        units.reverse();
        coalesce(units)
    }

    /// Walk the reverse snapshots from the point `(x, y)` (forward
    /// coordinates) reached in round `d_mid`, emitting the changes of the
    /// second half in order.
    #[allow(clippy::too_many_arguments)]
    fn walk_reverse_history(
        &self,
        history: &[DiagonalWindow],
        d_mid: isize,
        x: isize,
        y: isize,
        ostart: usize,
        mstart: usize,
        n: isize,
        m: isize,
    ) -> Vec<DiffChange> {
        let mut rx = n - x;
        let mut ry = m - y;
        let mut units: Vec<DiffChange> = Vec::new();
        for d in (1..=d_mid).rev() {
            let prev = &history[(d - 1) as usize];
            let k = rx - ry;
            let (k_min, k_max) = clip_diagonal_bounds(d, n, m);
            let down = k == k_min || (k != k_max && prev.get(k - 1) < prev.get(k + 1));
            if down {
                // Vertical move in the mirrored frame: an insertion when
                // read in forward order.
                let post_rx = prev.get(k + 1);
                let post_ry = post_rx - k;
                units.push(DiffChange::new(
                    ostart + (n - post_rx) as usize,
                    0,
                    mstart + (m - post_ry) as usize,
                    1,
                ));
                rx = post_rx;
                ry = post_ry - 1;
            } else {
                let post_rx = prev.get(k - 1) + 1;
                let post_ry = post_rx - k;
                units.push(DiffChange::new(
                    ostart + (n - post_rx) as usize,
                    1,
                    mstart + (m - post_ry) as usize,
                    0,
                ));
                rx = post_rx - 1;
                ry = post_ry;
            }
        }
        debug_assert!(rx == ry, "reverse walk must end on the zero diagonal");
        coalesce(units)
    }

    fn original_is_boundary(&self, index: isize) -> bool {
        if index <= 0 || index >= self.original_elements.len() as isize - 1 {
            return true;
        }
        matches!(self.original.element_str(index as usize), Some(s) if s.trim().is_empty())
    }

    fn modified_is_boundary(&self, index: isize) -> bool {
        if index <= 0 || index >= self.modified_elements.len() as isize - 1 {
            return true;
        }
        matches!(self.modified.element_str(index as usize), Some(s) if s.trim().is_empty())
    }

    fn original_region_is_boundary(&self, start: usize, length: usize) -> bool {
        let start = start as isize;
        if self.original_is_boundary(start) || self.original_is_boundary(start - 1) {
            return true;
        }
        if length > 0 {
            let end = start + length as isize;
            if self.original_is_boundary(end - 1) || self.original_is_boundary(end) {
                return true;
            }
        }
        false
    }

    fn modified_region_is_boundary(&self, start: usize, length: usize) -> bool {
        let start = start as isize;
        if self.modified_is_boundary(start) || self.modified_is_boundary(start - 1) {
            return true;
        }
        if length > 0 {
            let end = start + length as isize;
            if self.modified_is_boundary(end - 1) || self.modified_is_boundary(end) {
                return true;
            }
        }
        false
    }

    /// Heuristic reward for change boundaries that land on a sequence
    /// edge or next to a blank element.
    fn boundary_score(
        &self,
        original_start: usize,
        original_length: usize,
        modified_start: usize,
        modified_length: usize,
    ) -> usize {
        let original = usize::from(self.original_region_is_boundary(original_start, original_length));
        let modified = usize::from(self.modified_region_is_boundary(modified_start, modified_length));
        original + modified
    }

    /// Shift change boundaries to more intuitive positions. The total
    /// edit length never changes; only where equal content allows, each
    /// change slides toward the position with the best boundary score.
    fn prettify_changes(&self, mut changes: Vec<DiffChange>) -> Vec<DiffChange> {
        let original_len = self.original_elements.len();
        let modified_len = self.modified_elements.len();

        // First push every change as far down as the content allows,
        // fusing any changes that collide.
        let mut i = 0;
        while i < changes.len() {
            let original_stop = if i + 1 < changes.len() {
                changes[i + 1].original_start
            } else {
                original_len
            };
            let modified_stop = if i + 1 < changes.len() {
                changes[i + 1].modified_start
            } else {
                modified_len
            };
            let check_original = changes[i].original_length > 0;
            let check_modified = changes[i].modified_length > 0;

            while changes[i].original_end() < original_stop
                && changes[i].modified_end() < modified_stop
                && (!check_original
                    || self.original_elements_equal(
                        changes[i].original_start,
                        changes[i].original_end(),
                    ))
                && (!check_modified
                    || self.modified_elements_equal(
                        changes[i].modified_start,
                        changes[i].modified_end(),
                    ))
            {
                changes[i].original_start += 1;
                changes[i].modified_start += 1;
            }

            if i + 1 < changes.len() {
                if let Some(merged) = merge_if_touching(changes[i], changes[i + 1]) {
                    changes[i] = merged;
                    changes.remove(i + 1);
                    continue;
                }
            }
            i += 1;
        }

        // Then pull each change back up toward the position that scores
        // best, working from the last change toward the first.
        for i in (0..changes.len()).rev() {
            let (original_stop, modified_stop) = if i > 0 {
                (changes[i - 1].original_end(), changes[i - 1].modified_end())
            } else {
                (0, 0)
            };
            let change = changes[i];
            let check_original = change.original_length > 0;
            let check_modified = change.modified_length > 0;

            let mut best_delta = 0usize;
            let mut best_score = self.boundary_score(
                change.original_start,
                change.original_length,
                change.modified_start,
                change.modified_length,
            );

            for delta in 1.. {
                if change.original_start < original_stop + delta
                    || change.modified_start < modified_stop + delta
                {
                    break;
                }
                let original_start = change.original_start - delta;
                let modified_start = change.modified_start - delta;
                if check_original
                    && !self
                        .original_elements_equal(original_start, original_start + change.original_length)
                {
                    break;
                }
                if check_modified
                    && !self
                        .modified_elements_equal(modified_start, modified_start + change.modified_length)
                {
                    break;
                }
                let touching = original_start == original_stop && modified_start == modified_stop;
                let score = if touching { 5 } else { 0 }
                    + self.boundary_score(
                        original_start,
                        change.original_length,
                        modified_start,
                        change.modified_length,
                    );
                if score > best_score {
                    best_score = score;
                    best_delta = delta;
                }
            }

            changes[i].original_start -= best_delta;
            changes[i].modified_start -= best_delta;
        }

        changes
    }
}
