//! Approximate comparison of floating-point values, points and vectors.
//!
//! Geometry that passes through `sin`/`cos` rarely lands exactly on the
//! expected value, so tests compare with a [`Tol`] instead of `==`.

use crate::Interval;
use cgmath::{num_traits::Float, BaseFloat, InnerSpace, Point2, Vector2};

/// Tolerance to use when performing approximate comparisons.
///
/// When comparing floating-point values, [`Tol::AbsRel`] is a robust choice.
#[derive(Debug, Clone, Copy)]
pub enum Tol<S> {
    /// Absolute tolerance.
    Abs(S),
    /// Relative tolerance.
    Rel(S),
    /// Both absolute and relative tolerance.
    AbsRel { atol: S, rtol: S },
}
impl<S: Float> Tol<S> {
    /// Create a new absolute tolerance.
    pub fn abs(atol: S) -> Tol<S> {
        Tol::Abs(atol.abs())
    }

    /// Create a new relative tolerance.
    pub fn rel(rtol: S) -> Tol<S> {
        Tol::Rel(rtol.abs())
    }

    /// Create a new tolerance with absolute and relative components.
    pub fn absrel(atol: S, rtol: S) -> Tol<S> {
        Tol::AbsRel {
            atol: atol.abs(),
            rtol: rtol.abs(),
        }
    }

    /// Multiply every component of the tolerance by `factor`.
    pub fn scale(&self, factor: S) -> Tol<S> {
        use Tol::{Abs, AbsRel, Rel};
        match *self {
            Abs(atol) => Abs(factor * atol),
            Rel(rtol) => Rel(factor * rtol),
            AbsRel { atol, rtol } => AbsRel {
                atol: factor * atol,
                rtol: factor * rtol,
            },
        }
    }

    /// Test two scalars against this tolerance.
    ///
    /// - `Abs`: `|a - b| <= atol`
    /// - `Rel`: `|a - b| <= rtol * max(|a|, |b|)`
    /// - `AbsRel`: either of the above.
    fn accepts(&self, a: S, b: S) -> bool {
        let delta = (a - b).abs();
        let rel_limit = |rtol: S| rtol * a.abs().max(b.abs());
        match *self {
            Tol::Abs(atol) => delta <= atol,
            Tol::Rel(rtol) => delta <= rel_limit(rtol),
            Tol::AbsRel { atol, rtol } => delta <= atol || delta <= rel_limit(rtol),
        }
    }
}

/// Trait for a default tolerance.
///
/// Default tolerances are associated with the scalar type of a closeness
/// comparison.
pub trait DefaultTol: Sized {
    fn default_tol() -> Tol<Self>;
}

impl DefaultTol for f32 {
    fn default_tol() -> Tol<f32> {
        Tol::absrel(1e-7, 1e-5)
    }
}

impl DefaultTol for f64 {
    fn default_tol() -> Tol<f64> {
        Tol::absrel(1e-10, 1e-9)
    }
}

impl<S: Float + DefaultTol> Default for Tol<S> {
    fn default() -> Self {
        S::default_tol()
    }
}

/// Closeness test.
///
/// # Parameters
///
/// - `tol`: Tolerance test to use.
/// - `a`: One value to compare.
/// - `b`: The other value to compare.
///
/// # Returns
///
/// - `true` if the values are sufficiently close.
/// - `false` if the values are not sufficiently close.
pub fn close<T: CloseCmp>(tol: Tol<T::Scalar>, a: &T, b: &T) -> bool {
    CloseCmp::close(tol, a, b)
}

/// Closeness test with the default tolerance of the scalar type.
pub fn close_default_tol<T>(a: &T, b: &T) -> bool
where
    T: CloseCmp,
    T::Scalar: DefaultTol,
{
    CloseCmp::close(T::Scalar::default_tol(), a, b)
}

/// Trait for types that have a "close" comparison.
pub trait CloseCmp {
    /// Scalar type of the comparison.
    type Scalar;
    /// Returns `true` if `a` and `b` are within `tol` of each other.
    fn close(tol: Tol<Self::Scalar>, a: &Self, b: &Self) -> bool;
}

impl CloseCmp for f32 {
    type Scalar = f32;
    fn close(tol: Tol<f32>, a: &f32, b: &f32) -> bool {
        tol.accepts(*a, *b)
    }
}

impl CloseCmp for f64 {
    type Scalar = f64;
    fn close(tol: Tol<f64>, a: &f64, b: &f64) -> bool {
        tol.accepts(*a, *b)
    }
}

impl<T: CloseCmp> CloseCmp for Option<T> {
    type Scalar = T::Scalar;
    fn close(tol: Tol<T::Scalar>, a: &Option<T>, b: &Option<T>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(x), Some(y)) => CloseCmp::close(tol, x, y),
            _ => false,
        }
    }
}

impl<T: CloseCmp> CloseCmp for [T]
where
    T::Scalar: Copy,
{
    type Scalar = T::Scalar;
    fn close(tol: Tol<T::Scalar>, a: &[T], b: &[T]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| CloseCmp::close(tol, x, y))
    }
}

impl<T: CloseCmp> CloseCmp for Vec<T>
where
    T::Scalar: Copy,
{
    type Scalar = T::Scalar;
    fn close(tol: Tol<T::Scalar>, a: &Vec<T>, b: &Vec<T>) -> bool {
        CloseCmp::close(tol, a.as_slice(), b.as_slice())
    }
}

/// Points are close when the distance between them is close to zero.
impl<S> CloseCmp for Point2<S>
where
    S: BaseFloat,
{
    type Scalar = S;
    fn close(tol: Tol<S>, a: &Point2<S>, b: &Point2<S>) -> bool {
        tol.accepts((*a - *b).magnitude(), S::zero())
    }
}

impl<S> CloseCmp for Vector2<S>
where
    S: BaseFloat,
{
    type Scalar = S;
    fn close(tol: Tol<S>, a: &Vector2<S>, b: &Vector2<S>) -> bool {
        tol.accepts((*a - *b).magnitude(), S::zero())
    }
}

impl CloseCmp for Interval {
    type Scalar = f64;
    fn close(tol: Tol<f64>, a: &Interval, b: &Interval) -> bool {
        tol.accepts(a.min(), b.min()) && tol.accepts(a.max(), b.max())
    }
}

//// Macros

/// Asserts that two values are approximately equal.
///
/// With two arguments the default tolerance of the scalar type is used; a
/// [`Tol`] can be supplied as the first argument instead.
#[macro_export]
macro_rules! assert_close {
    ($tol:expr, $a: expr, $b: expr) => {
        if (!$crate::compare::close($tol, &$a, &$b)) {
            panic!(
                "assertion failed: `(left ≈ right)`
  left:  `{:?}`
  right: `{:?}`
  tol:   `{:?}`",
                $a, $b, $tol
            );
        }
    };
    ($a: expr, $b: expr) => {
        if (!$crate::compare::close_default_tol(&$a, &$b)) {
            panic!(
                "assertion failed: `(left ≈ right)`
  left:  `{:?}`
  right: `{:?}`",
                $a, $b
            );
        }
    };
}
