//! # Bound Module
//!
//! This module provides the `Bound<D>` struct for representing inclusive integer intervals with
//! optional lower and upper bounds. Trace generation uses it in two places:
//!
//! - the length range `[1, max_length]` a failing candidate is drawn from,
//! - the repeat count range `{min, max}` of a repetition operator, clamped by the star limit
//!   when the pattern is expanded as a grammar.
//!
//! A value of `None` for a bound means the interval is open in that direction. Operations that
//! need concrete numbers substitute the type's minimum or maximum via [`Bound::as_explicit`].
//!
//! ## Examples
//!
//! ```
//! use fsm_tracegen::bound::Bound;
//!
//! // `a*` repeats zero or more times.
//! let star = Bound { lower: Some(0_u32), upper: None };
//!
//! // The grammar expander never repeats more than three times.
//! let limit = Bound { lower: None, upper: Some(3_u32) };
//!
//! assert_eq!(star.intersect(&limit), Some(Bound { lower: None, upper: Some(3_u32) }));
//! ```

use num::Bounded;
use std::cmp::{max, min};
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

/// An inclusive interval with optional lower and upper bounds.
///
/// # Examples
///
/// ```
/// use fsm_tracegen::bound::Bound;
///
/// // Trace lengths between one and five symbols: [1, 5]
/// let lengths = Bound { lower: Some(1_usize), upper: Some(5_usize) };
///
/// // At least one repetition: [1, ∞)
/// let plus = Bound { lower: Some(1_u32), upper: None };
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Bound<D> {
    pub lower: Option<D>,
    pub upper: Option<D>,
}

impl<D> fmt::Display for Bound<D>
where
    D: fmt::Display + Bounded + Copy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lower, upper) = self.as_explicit();
        write!(f, "[{}, {}]", lower, upper)
    }
}

impl<D> Bound<D> {
    /// Creates the closed interval `[lower, upper]`.
    pub fn closed(lower: D, upper: D) -> Self {
        Bound {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Replaces open ends with the minimum or maximum value of `D`.
    ///
    /// ```
    /// use fsm_tracegen::bound::Bound;
    ///
    /// let a = Bound { lower: Some(2_u32), upper: None };
    /// let b = Bound { lower: None, upper: Some(15_u32) };
    ///
    /// assert_eq!(a.as_explicit(), (2, u32::MAX));
    /// assert_eq!(b.as_explicit(), (0, 15));
    /// ```
    pub fn as_explicit(&self) -> (D, D)
    where
        D: Bounded + Copy,
    {
        let lower = match self.lower {
            Some(lower) => lower,
            None => D::min_value(),
        };

        let upper = match self.upper {
            Some(upper) => upper,
            None => D::max_value(),
        };

        (lower, upper)
    }

    /// Inverse of [`Bound::as_explicit`]: the minimum and maximum of `D` become open ends.
    ///
    /// ```
    /// use fsm_tracegen::bound::Bound;
    ///
    /// assert_eq!(
    ///     Bound::from_explicit((0_u32, 3)),
    ///     Bound { lower: None, upper: Some(3) }
    /// );
    /// ```
    pub fn from_explicit(bound: (D, D)) -> Self
    where
        D: Bounded + Copy + Eq,
    {
        let lower = Some(bound.0).filter(|b| *b != D::min_value());
        let upper = Some(bound.1).filter(|b| *b != D::max_value());
        Bound { lower, upper }
    }

    /// Returns the inclusive intersection if it is non-empty.
    ///
    /// ```
    /// use fsm_tracegen::bound::Bound;
    ///
    /// let a = Bound { lower: Some(10), upper: None };
    /// let b = Bound { lower: None, upper: Some(15) };
    /// let c = Bound { lower: Some(20), upper: None };
    ///
    /// assert_eq!(a.intersect(&b), Some(Bound { lower: Some(10), upper: Some(15) }));
    /// assert_eq!(b.intersect(&c), None);
    /// ```
    pub fn intersect(&self, other: &Self) -> Option<Self>
    where
        D: Ord + Copy + Bounded,
    {
        let (s_lower, s_upper) = self.as_explicit();
        let (o_lower, o_upper) = other.as_explicit();

        if s_lower > o_upper || s_upper < o_lower {
            None
        } else {
            Some(Bound::from_explicit((
                max(s_lower, o_lower),
                min(s_upper, o_upper),
            )))
        }
    }

    /// Checks whether `value` lies inside the interval.
    ///
    /// ```
    /// use fsm_tracegen::bound::Bound;
    ///
    /// let lengths = Bound::closed(1_usize, 5);
    ///
    /// assert!(lengths.contains(&1));
    /// assert!(lengths.contains(&5));
    /// assert!(!lengths.contains(&0));
    /// assert!(!lengths.contains(&6));
    /// ```
    pub fn contains(&self, value: &D) -> bool
    where
        D: Ord + Copy + Bounded,
    {
        let (lower, upper) = self.as_explicit();
        *value >= lower && *value <= upper
    }
}
