/// Closed interval of `f64` values.
///
/// Projecting a polygon onto an axis produces one of these. It includes both
/// its end points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    start: f64,
    end: f64,
}
impl Interval {
    /// Creates an interval with two end points.
    ///
    /// The order of `p1` and `p2` is not important.
    pub fn new(p1: f64, p2: f64) -> Interval {
        let mut interval = Interval::singleton(p1);
        interval.include(p2);
        interval
    }

    /// Create a singleton interval which contains just one `f64` value.
    pub fn singleton(value: f64) -> Interval {
        Interval {
            start: value,
            end: value,
        }
    }

    /// Creates an empty interval, ready to accumulate values with
    /// [`Interval::include`].
    ///
    /// The start is `+inf` and the end is `-inf`, so the first included value
    /// replaces both, whatever its sign.
    pub fn empty() -> Interval {
        Interval {
            start: f64::INFINITY,
            end: f64::NEG_INFINITY,
        }
    }

    /// Returns `true` if no value has been included yet.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Expand an interval, if necessary, to include another `f64` value.
    ///
    /// Both ends are checked: an empty interval must move both of them on the
    /// first value.
    pub fn include(&mut self, value: f64) {
        if value < self.start {
            self.start = value;
        }
        if value > self.end {
            self.end = value;
        }
    }

    /// Tests if two intervals are completely disjoint from one another.
    ///
    /// Intervals that share only an end point are not disjoint.
    pub fn disjoint(&self, other: &Interval) -> bool {
        self.end < other.start || other.end < self.start
    }

    /// Tests if two intervals overlap, including touching at an end point.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !self.disjoint(other)
    }

    /// Tests if two intervals share a range of positive width.
    ///
    /// Intervals that only touch at an end point are not strictly
    /// overlapping.
    pub fn overlaps_strictly(&self, other: &Interval) -> bool {
        !(self.start >= other.end || other.start >= self.end)
    }

    /// Returns the minimum value of an interval.
    pub fn min(&self) -> f64 {
        self.start
    }

    /// Returns the maximum value of an interval.
    pub fn max(&self) -> f64 {
        self.end
    }
}

impl FromIterator<f64> for Interval {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut interval = Interval::empty();
        for value in iter {
            interval.include(value);
        }
        interval
    }
}
