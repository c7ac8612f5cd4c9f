//! Reading and writing single elements.
//!
//! Elements read from a unit array come back as quantities, and quantities
//! written into one must have its unit.

use ndarray::IxDyn;

use crate::{Element, Quantity, UnitArray, UnitArrayError, UnitArrayResult};

impl<A: Element> UnitArray<A> {
    /// Returns the element at `index` with the unit of the array.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` does not address an element.
    pub fn get(&self, index: &[usize]) -> UnitArrayResult<Quantity<A>> {
        let value = self
            .data()
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_bounds(index))?;

        Ok(Quantity::new(value, self.unit().clone()))
    }

    /// Returns the element at flat row-major position `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not smaller than the number of
    /// elements.
    pub fn item(&self, index: usize) -> UnitArrayResult<Quantity<A>> {
        let index = self.unravel(index)?;
        self.get(&index)
    }

    /// Writes `value` at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` has a different unit or `index` does not
    /// address an element. The array is unchanged on error.
    pub fn set(&mut self, index: &[usize], value: &Quantity<A>) -> UnitArrayResult<()> {
        self.unit().check_same(&value.unit)?;
        self.set_value(index, value.value)
    }

    /// Writes a bare number at `index`, leaving the unit unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` does not address an element.
    pub fn set_value(&mut self, index: &[usize], value: A) -> UnitArrayResult<()> {
        match self.data_mut().get_mut(index) {
            Some(element) => {
                *element = value;
                Ok(())
            }
            None => Err(self.out_of_bounds(index)),
        }
    }

    /// Sets every element to the value of `value` and adopts its unit.
    pub fn fill(&mut self, value: &Quantity<A>) {
        self.fill_value(value.value);
        self.set_unit(value.unit.clone());
    }

    /// Sets every element to `value`, leaving the unit unchanged.
    pub fn fill_value(&mut self, value: A) {
        self.value_mut().fill(value);
    }

    /// Writes the elements of `values` at the flat row-major positions
    /// `indices`.
    ///
    /// If there are more indices than values, the values are repeated.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` has a different unit, if it is empty
    /// while `indices` is not, or if an index is out of bounds. The array
    /// is unchanged on error.
    pub fn put(&mut self, indices: &[usize], values: &Self) -> UnitArrayResult<()> {
        self.unit().check_same(values.unit())?;

        if indices.is_empty() {
            return Ok(());
        }

        if values.is_empty() {
            return Err(UnitArrayError::EmptyArray { operation: "put" });
        }

        let positions = indices
            .iter()
            .map(|&index| self.unravel(index))
            .collect::<UnitArrayResult<Vec<_>>>()?;
        let values = values.data().iter().copied().collect::<Vec<_>>();

        let data = self.data_mut();
        for (position, &value) in positions.into_iter().zip(values.iter().cycle()) {
            data[IxDyn(&position)] = value;
        }

        Ok(())
    }

    /// Returns every element as a quantity, in row-major order.
    #[must_use]
    pub fn to_list(&self) -> Vec<Quantity<A>> {
        self.data()
            .iter()
            .map(|&value| Quantity::new(value, self.unit().clone()))
            .collect()
    }

    fn out_of_bounds(&self, index: &[usize]) -> UnitArrayError {
        UnitArrayError::IndexOutOfBounds {
            index: index.to_vec(),
            shape: self.shape().to_vec(),
        }
    }

    /// Converts a flat row-major position to a multi-index.
    fn unravel(&self, flat: usize) -> UnitArrayResult<Vec<usize>> {
        if flat >= self.len() {
            return Err(UnitArrayError::IndexOutOfBounds {
                index: vec![flat],
                shape: self.shape().to_vec(),
            });
        }

        let mut remainder = flat;
        let mut index = vec![0; self.ndim()];

        for (position, &size) in index.iter_mut().zip(self.shape()).rev() {
            *position = remainder % size;
            remainder /= size;
        }

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use quarray_unit::Unit;

    use super::*;

    fn meter() -> Unit {
        Unit::single("m")
    }

    fn grid() -> UnitArray<f64> {
        UnitArray::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], meter())
    }

    #[test]
    fn get_returns_quantity() {
        assert_eq!(grid().get(&[1, 2]), Ok(Quantity::new(6.0, meter())));
        assert_eq!(grid().item(4), Ok(Quantity::new(5.0, meter())));
    }

    #[test]
    fn get_out_of_bounds() {
        assert_eq!(
            grid().get(&[2, 0]),
            Err(UnitArrayError::IndexOutOfBounds {
                index: vec![2, 0],
                shape: vec![2, 3],
            })
        );
        assert!(grid().get(&[0]).is_err());
        assert!(grid().item(6).is_err());
    }

    #[test]
    fn set_checks_unit() {
        let mut array = grid();
        array.set(&[0, 0], &Quantity::new(10.0, meter())).expect("same unit");
        assert_eq!(array.value()[[0, 0]], 10.0);

        let result = array.set(&[0, 1], &Quantity::new(10.0, Unit::single("s")));
        assert!(result.is_err_and(|error| error.is_incompatible_units()));
        assert_eq!(array.value()[[0, 1]], 2.0);
    }

    #[test]
    fn fill_adopts_unit() {
        let mut array = grid();
        array.fill(&Quantity::new(7.0, Unit::single("s")));

        assert_eq!(array.unit(), &Unit::single("s"));
        assert!(array.value().iter().all(|&value| value == 7.0));
    }

    #[test]
    fn fill_value_keeps_unit() {
        let mut array = grid();
        array.fill_value(0.0);

        assert_eq!(array.unit(), &meter());
        assert_eq!(array.sum().value, 0.0);
    }

    #[test]
    fn put_repeats_values() {
        let mut array = grid();
        let values = UnitArray::new(array![-1.0, -2.0], meter());
        array.put(&[0, 2, 5], &values).expect("valid indices");

        assert_eq!(
            array,
            UnitArray::new(array![[-1.0, 2.0, -2.0], [4.0, 5.0, -1.0]], meter())
        );
    }

    #[test]
    fn put_rejects_bad_input() {
        let mut array = grid();

        let seconds = UnitArray::new(array![1.0], Unit::single("s"));
        assert!(array.put(&[0], &seconds).is_err());

        let values = UnitArray::new(array![1.0], meter());
        assert!(array.put(&[0, 6], &values).is_err());
        assert_eq!(array, grid());
    }

    #[test]
    fn to_list() {
        let array = UnitArray::new(array![1.0, 2.0], meter());
        assert_eq!(
            array.to_list(),
            vec![Quantity::new(1.0, meter()), Quantity::new(2.0, meter())]
        );
    }
}
