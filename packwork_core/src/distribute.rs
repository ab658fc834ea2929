// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Share-and-shrink distribution of one axis.
//!
//! Given the length available along an axis and the size ranges of the
//! elements competing for it, every element starts from an equal share.
//! Elements whose maximum is below the share ("small" elements) are clamped
//! to their maximum, and the space they leave behind is spread over the
//! remaining elements. Spreading raises the share, which can turn more
//! elements small, so the step repeats until the small set stops growing.
//!
//! The small set only ever grows and is bounded by the element count, so the
//! loop runs at most `n + 1` rounds. Elements are visited in slice order in
//! every round, which keeps the placement of the rounding remainder
//! deterministic.

use crate::geometry::SizeRange;

/// Result of distributing one axis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Distribution {
    /// Length given to every element that is not small.
    pub share: u32,
    /// Rounding remainder added to the first element that is not small.
    pub extra: u32,
    /// Index of the element that absorbed `extra`. `None` when every
    /// element is small and the remainder stays unallocated.
    pub extra_to: Option<usize>,
    /// Per-element flag: clamped to its maximum.
    pub small: Vec<bool>,
    /// Allocated length per element, in input order.
    pub lengths: Vec<u32>,
}

impl Distribution {
    /// Total length handed out.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.lengths.iter().copied().map(u64::from).sum()
    }

    /// Number of elements clamped to their maximum.
    #[must_use]
    pub fn small_count(&self) -> usize {
        self.small.iter().filter(|&&s| s).count()
    }
}

/// Reasons a distribution cannot be carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistributeError {
    /// The clamped maxima plus the shares need more space than is available.
    Overcommitted {
        /// Pixels the allocation requires.
        required: u64,
    },
    /// The element that absorbs the rounding remainder would exceed its
    /// maximum.
    AboveMaximum {
        /// Position of the element in the input slice.
        index: usize,
        /// Length it would have been given.
        allocated: u32,
        /// Its maximum.
        maximum: u32,
    },
}

/// Distributes `available` pixels over elements with the given `ranges`.
///
/// `ranges` must be in packing order (leading bucket, main, trailing
/// bucket). Only maxima take part in the share computation; minima are
/// checked by the caller against the returned lengths.
///
/// # Errors
///
/// Returns [`DistributeError::Overcommitted`] if the clamped maxima plus the
/// shares exceed `available`, and [`DistributeError::AboveMaximum`] if the
/// first element that is not small cannot take the rounding remainder.
pub fn distribute(available: u32, ranges: &[SizeRange]) -> Result<Distribution, DistributeError> {
    let n = ranges.len();
    if n == 0 {
        return Ok(Distribution::default());
    }
    let count = u32::try_from(n).unwrap_or(u32::MAX);
    let base = available / count;

    let mut small = vec![false; n];
    let mut small_count = 0_usize;
    let mut share = base;
    for _ in 0..=n {
        let mut grew = false;
        for (flag, range) in small.iter_mut().zip(ranges) {
            if !*flag && range.max < share {
                *flag = true;
                small_count += 1;
                grew = true;
            }
        }
        if !grew {
            break;
        }
        share = rebalance(base, ranges, &small, n - small_count);
    }

    let open = n - small_count;
    let clamped: u64 = ranges
        .iter()
        .zip(&small)
        .filter(|(_, s)| **s)
        .map(|(r, _)| u64::from(r.max))
        .sum();
    let required = u64::from(share) * open as u64 + clamped;
    let Some(extra) = u64::from(available).checked_sub(required) else {
        return Err(DistributeError::Overcommitted { required });
    };
    // `extra` never exceeds `available`.
    let extra = u32::try_from(extra).unwrap_or(u32::MAX);

    let mut lengths: Vec<u32> = ranges
        .iter()
        .zip(&small)
        .map(|(r, &s)| if s { r.max } else { share })
        .collect();

    let mut extra_to = None;
    if extra > 0
        && let Some(i) = small.iter().position(|&s| !s)
    {
        // `share + extra` never exceeds `available`.
        let allocated = lengths[i].saturating_add(extra);
        if allocated > ranges[i].max {
            return Err(DistributeError::AboveMaximum {
                index: i,
                allocated,
                maximum: ranges[i].max,
            });
        }
        lengths[i] = allocated;
        extra_to = Some(i);
    }

    Ok(Distribution {
        share,
        extra,
        extra_to,
        small,
        lengths,
    })
}

/// Recomputes the share after the small set changed.
///
/// Each small element returns `base - max` to the pool (negative when its
/// maximum lies above the base share), and the pool is split evenly over the
/// `open` elements that are not small.
fn rebalance(base: u32, ranges: &[SizeRange], small: &[bool], open: usize) -> u32 {
    let surplus: i64 = ranges
        .iter()
        .zip(small)
        .filter(|(_, s)| **s)
        .map(|(r, _)| i64::from(base) - i64::from(r.max))
        .sum();
    let divisor = i64::try_from(open.max(1)).unwrap_or(i64::MAX);
    let share = i64::from(base) + surplus.div_euclid(divisor);
    u32::try_from(share.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANY: SizeRange = SizeRange::UNBOUNDED;

    #[test]
    fn empty_consumes_nothing() {
        let d = distribute(100, &[]).unwrap();
        assert_eq!(d, Distribution::default());
        assert_eq!(d.total(), 0);
    }

    #[test]
    fn equal_split() {
        let d = distribute(100, &[SizeRange::at_most(1000), SizeRange::at_most(1000)]).unwrap();
        assert_eq!(d.lengths, vec![50, 50]);
        assert_eq!(d.extra, 0);
        assert_eq!(d.small_count(), 0);
    }

    #[test]
    fn small_element_gives_space_to_the_rest() {
        let d = distribute(100, &[SizeRange::at_most(10), SizeRange::at_most(1000)]).unwrap();
        assert_eq!(d.lengths, vec![10, 90]);
        assert_eq!(d.share, 90);
        assert_eq!(d.small, vec![true, false]);
    }

    #[test]
    fn remainder_goes_to_first_open_element() {
        let d = distribute(100, &[SizeRange::at_most(1000), ANY, SizeRange::at_most(1000)]).unwrap();
        assert_eq!(d.lengths, vec![34, 33, 33]);
        assert_eq!(d.extra, 1);
        assert_eq!(d.extra_to, Some(0));
    }

    #[test]
    fn remainder_skips_small_elements() {
        // base 33: the first is small (max 5), leaving 95 over two: share 47, extra 1.
        let d = distribute(100, &[SizeRange::at_most(5), ANY, ANY]).unwrap();
        assert_eq!(d.lengths, vec![5, 48, 47]);
        assert_eq!(d.extra_to, Some(1));
        assert_eq!(d.total(), 100);
    }

    #[test]
    fn shrinking_cascades_until_stable() {
        // Round 1: base 25, only the first (max 5) is small -> share 31.
        // Round 2: max 30 < 31 joins -> share 32. Round 3: nothing new.
        let ranges = [
            SizeRange::at_most(5),
            SizeRange::at_most(30),
            ANY,
            ANY,
        ];
        let d = distribute(100, &ranges).unwrap();
        assert_eq!(d.small, vec![true, true, false, false]);
        assert_eq!(d.share, 32);
        assert_eq!(d.lengths, vec![5, 30, 33, 32]);
        assert_eq!(d.total(), 100);
    }

    #[test]
    fn all_small_leaves_space_unallocated() {
        let d = distribute(100, &[SizeRange::at_most(10), SizeRange::at_most(20)]).unwrap();
        assert_eq!(d.lengths, vec![10, 20]);
        assert_eq!(d.extra, 70);
        assert_eq!(d.extra_to, None);
    }

    #[test]
    fn remainder_past_maximum_fails() {
        // Three elements capped at 33 in 100px: none is small, and the first
        // cannot take the extra pixel.
        let capped = SizeRange::at_most(33);
        let err = distribute(100, &[capped, capped, capped]).unwrap_err();
        assert_eq!(
            err,
            DistributeError::AboveMaximum {
                index: 0,
                allocated: 34,
                maximum: 33,
            }
        );
    }

    #[test]
    fn remainder_does_not_skip_to_a_later_element() {
        let err = distribute(100, &[SizeRange::at_most(33), ANY, ANY]).unwrap_err();
        assert!(matches!(err, DistributeError::AboveMaximum { index: 0, .. }));
    }

    #[test]
    fn zero_available() {
        let d = distribute(0, &[ANY, ANY]).unwrap();
        assert_eq!(d.lengths, vec![0, 0]);
    }

    #[test]
    fn deterministic_across_calls() {
        let ranges = [SizeRange::at_most(7), ANY, SizeRange::at_most(40), ANY, ANY];
        let first = distribute(211, &ranges).unwrap();
        let second = distribute(211, &ranges).unwrap();
        assert_eq!(first, second);
    }
}
