//! Reductions, rounding and searching.
//!
//! Reductions that keep the dimension of the elements (sum, mean, extrema)
//! keep the unit. The variance squares it and products raise it to the
//! number of factors.

use std::cmp::Ordering;

use ndarray::{Array1, ArrayD, ArrayViewD, Dimension};

use crate::{
    Element, Quantity, UnitArray, UnitArrayError, UnitArrayResult,
    ufunc::{BinaryUfunc, UnaryUfunc},
};

impl<A: Element> UnitArray<A> {
    /// Sums all elements.
    #[must_use]
    pub fn sum(&self) -> Quantity<A> {
        Quantity::new(self.data().sum(), self.unit().clone())
    }

    /// Sums the elements along `axis`.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis does not exist.
    pub fn sum_axis(&self, axis: usize) -> UnitArrayResult<Self> {
        let axis = self.check_axis(axis)?;

        Ok(self.derive(self.data().sum_axis(axis)))
    }

    /// Computes the arithmetic mean of all elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty.
    pub fn mean(&self) -> UnitArrayResult<Quantity<A>> {
        let mean = self
            .data()
            .mean()
            .ok_or(UnitArrayError::EmptyArray { operation: "mean" })?;

        Ok(Quantity::new(mean, self.unit().clone()))
    }

    /// Computes the arithmetic mean along `axis`.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis does not exist or has length zero.
    pub fn mean_axis(&self, axis: usize) -> UnitArrayResult<Self> {
        let axis = self.check_axis(axis)?;
        let mean = self
            .data()
            .mean_axis(axis)
            .ok_or(UnitArrayError::EmptyArray { operation: "mean" })?;

        Ok(self.derive(mean))
    }

    /// Computes the variance of all elements. The result has the squared
    /// unit.
    ///
    /// `ddof` is the delta degrees of freedom: the sum of squared
    /// deviations is divided by `len - ddof`.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty, if `ddof` is not smaller than
    /// its length, or if the squared unit overflows.
    pub fn var(&self, ddof: usize) -> UnitArrayResult<Quantity<A>> {
        let variance = self.raw_var(ddof, "variance")?;

        Ok(Quantity::new(variance, self.unit().powi(2)?))
    }

    /// Computes the standard deviation of all elements. The result has the
    /// unit of the array.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty or `ddof` is not smaller than
    /// its length.
    pub fn std(&self, ddof: usize) -> UnitArrayResult<Quantity<A>> {
        let variance = self.raw_var(ddof, "standard deviation")?;

        Ok(Quantity::new(variance.sqrt(), self.unit().clone()))
    }

    fn raw_var(&self, ddof: usize, operation: &'static str) -> UnitArrayResult<A> {
        let len = self.len();

        if len == 0 {
            return Err(UnitArrayError::EmptyArray { operation });
        }

        if ddof >= len {
            return Err(UnitArrayError::InvalidDdof { ddof, len });
        }

        let ddof = A::from_usize(ddof).ok_or(UnitArrayError::InvalidDdof { ddof, len })?;

        Ok(self.data().var(ddof))
    }

    /// Multiplies all elements. The unit is raised to the number of
    /// elements.
    ///
    /// # Errors
    ///
    /// Returns an error if an exponent of the unit overflows.
    pub fn prod(&self) -> UnitArrayResult<Quantity<A>> {
        let unit = self.unit().powi(count_exponent(self.len()))?;

        Ok(Quantity::new(self.data().product(), unit))
    }

    /// Multiplies the elements along `axis`. The unit is raised to the
    /// length of the axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis does not exist, or if an exponent of
    /// the unit overflows.
    pub fn prod_axis(&self, axis: usize) -> UnitArrayResult<Self> {
        let axis = self.check_axis(axis)?;
        let unit = self.unit().powi(count_exponent(self.data().len_of(axis)))?;
        let mut product = self.derive(self.data().product_axis(axis));
        product.set_unit(unit);

        Ok(product)
    }

    /// Computes the running product of the elements in row-major order.
    ///
    /// Each partial product would have a different unit, so the array
    /// must be dimensionless.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is not dimensionless.
    pub fn cumprod(&self) -> UnitArrayResult<Self> {
        if !self.unit().is_dimensionless() {
            return Err(UnitArrayError::NotDimensionlessArray {
                operation: "cumprod",
                unit: self.unit().clone(),
            });
        }

        let products = self
            .data()
            .iter()
            .scan(A::one(), |product, &value| {
                *product = *product * value;
                Some(*product)
            })
            .collect::<Array1<A>>();

        Ok(self.derive(products))
    }

    /// Computes the running sum of the elements in row-major order.
    #[must_use]
    pub fn cumsum(&self) -> Self {
        let sums = self
            .data()
            .iter()
            .scan(A::zero(), |sum, &value| {
                *sum = *sum + value;
                Some(*sum)
            })
            .collect::<Array1<A>>();

        self.derive(sums)
    }

    /// Returns the largest element. NaN elements propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty.
    pub fn max(&self) -> UnitArrayResult<Quantity<A>> {
        self.extremum(BinaryUfunc::Maximum, "maximum")
    }

    /// Returns the smallest element. NaN elements propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty.
    pub fn min(&self) -> UnitArrayResult<Quantity<A>> {
        self.extremum(BinaryUfunc::Minimum, "minimum")
    }

    /// Returns the range of the elements (maximum minus minimum).
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty.
    pub fn ptp(&self) -> UnitArrayResult<Quantity<A>> {
        let max = self.max()?;
        let min = self.min()?;

        max.checked_sub(&min)
    }

    fn extremum(&self, select: BinaryUfunc, operation: &'static str) -> UnitArrayResult<Quantity<A>> {
        let value = self
            .data()
            .iter()
            .copied()
            .reduce(|lhs, rhs| select.eval(lhs, rhs))
            .ok_or(UnitArrayError::EmptyArray { operation })?;

        Ok(Quantity::new(value, self.unit().clone()))
    }

    /// Limits the elements to the interval `[min, max]`.
    ///
    /// Either bound may be omitted, but not both. The bounds must have the
    /// unit of the array.
    ///
    /// # Errors
    ///
    /// Returns an error if both bounds are missing or a bound has a
    /// different unit.
    pub fn clip(&self, min: Option<&Quantity<A>>, max: Option<&Quantity<A>>) -> UnitArrayResult<Self> {
        if min.is_none() && max.is_none() {
            return Err(UnitArrayError::MissingClipBound);
        }

        for bound in min.iter().chain(max.iter()) {
            self.unit().check_same(&bound.unit)?;
        }

        let min = min.map(|bound| bound.value);
        let max = max.map(|bound| bound.value);

        Ok(self.map(|&value| {
            let value = min.map_or(value, |min| if value < min { min } else { value });
            max.map_or(value, |max| if value > max { max } else { value })
        }))
    }

    /// Rounds the elements to `decimals` decimal places, with ties going to
    /// the even neighbor.
    ///
    /// Negative `decimals` round to the left of the decimal point.
    #[must_use]
    pub fn round(&self, decimals: i32) -> Self {
        let factor = A::from_i32(10).map_or_else(A::one, |ten| ten.powi(decimals.saturating_abs()));
        let rint = UnaryUfunc::Rint;

        if decimals >= 0 {
            self.map(|&value| rint.eval(value * factor) / factor)
        } else {
            self.map(|&value| rint.eval(value / factor) * factor)
        }
    }

    /// Returns the flat indices that would sort the array, in row-major
    /// order. NaN elements sort last.
    #[must_use]
    pub fn argsort(&self) -> Vec<usize> {
        let values = self.data().iter().copied().collect::<Vec<_>>();
        let mut indices = (0..values.len()).collect::<Vec<_>>();

        indices.sort_by(|&lhs, &rhs| nan_last_cmp(values[lhs], values[rhs]));

        indices
    }

    /// Returns the flat index of the smallest element. The first NaN wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty.
    pub fn argmin(&self) -> UnitArrayResult<usize> {
        self.arg_extremum(Ordering::Less, "argmin")
    }

    /// Returns the flat index of the largest element. The first NaN wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty.
    pub fn argmax(&self) -> UnitArrayResult<usize> {
        self.arg_extremum(Ordering::Greater, "argmax")
    }

    fn arg_extremum(&self, wanted: Ordering, operation: &'static str) -> UnitArrayResult<usize> {
        let mut best: Option<(usize, A)> = None;

        for (index, &value) in self.data().iter().enumerate() {
            if value.is_nan() {
                return Ok(index);
            }

            let replace = best.is_none_or(|(_, current)| value.partial_cmp(&current) == Some(wanted));
            if replace {
                best = Some((index, value));
            }
        }

        best.map(|(index, _)| index)
            .ok_or(UnitArrayError::EmptyArray { operation })
    }

    /// Returns the multi-indices of the non-zero elements, in row-major
    /// order.
    #[must_use]
    pub fn nonzero(&self) -> Vec<Vec<usize>> {
        self.data()
            .indexed_iter()
            .filter(|(_, value)| !value.is_zero())
            .map(|(index, _)| index.slice().to_vec())
            .collect()
    }

    /// Finds the positions at which `values` would be inserted into the
    /// flattened array to keep it sorted. The array must already be sorted.
    ///
    /// Each position is the leftmost valid one.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` has a different unit.
    pub fn searchsorted(&self, values: &Self) -> UnitArrayResult<Vec<usize>> {
        self.unit().check_same(values.unit())?;

        let sorted = self.data().iter().copied().collect::<Vec<_>>();

        Ok(values
            .data()
            .iter()
            .map(|&value| sorted.partition_point(|&element| nan_last_cmp(element, value) == Ordering::Less))
            .collect())
    }
}

/// Converts an element count to a unit exponent.
fn count_exponent(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Orders numbers, treating NaN as larger than every other number.
fn nan_last_cmp<A: Element>(lhs: A, rhs: A) -> Ordering {
    match (lhs.is_nan(), rhs.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal),
    }
}

impl<A: Element> UnitArray<A> {
    /// Checks that the array is dimensionless, returning its elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the array carries a unit.
    pub fn dimensionless_value(&self) -> UnitArrayResult<ArrayViewD<'_, A>> {
        if self.unit().is_dimensionless() {
            Ok(self.value())
        } else {
            Err(UnitArrayError::NotDimensionlessArray {
                operation: "dimensionless_value",
                unit: self.unit().clone(),
            })
        }
    }

    /// Expresses the elements as multiples of `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if `reference` has a different unit.
    pub fn as_number(&self, reference: &Quantity<A>) -> UnitArrayResult<ArrayD<A>> {
        self.unit().check_same(&reference.unit)?;

        Ok(self.data().mapv(|value| value / reference.value))
    }
}
