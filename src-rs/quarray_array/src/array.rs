use std::{fmt, sync::Arc};

use ndarray::{
    Array, Array1, ArrayD, ArrayViewD, ArrayViewMutD, Axis, Dimension, IxDyn, SliceArg, SliceInfoElem,
};
use num_traits::{NumCast, ToPrimitive};
use quarray_unit::Unit;

use crate::{ArrayType, ArrayValue, UnitArrayError, UnitArrayResult, hooks::HasUnit};

/// An n-dimensional array with a physical unit.
///
/// Every derived array (a slice, a reshaped copy, the result of an
/// element-wise operation) receives its unit through the hooks of the
/// array's [`ArrayType`], so a unit can never be lost or silently changed.
///
/// Derived arrays are owned copies; mutating one never affects the array it
/// was derived from. Cloning is a derivation too.
pub struct UnitArray<A> {
    data: ArrayD<A>,
    unit: Unit,
    array_type: Arc<ArrayType>,
}

impl<A> UnitArray<A> {
    /// Creates a unit array of the standard type.
    ///
    /// Unlike [`construct`](Self::construct), this always returns a unit
    /// array, even when `unit` is dimensionless.
    #[must_use]
    pub fn new<D: Dimension>(data: Array<A, D>, unit: Unit) -> Self {
        Self::from_parts(data.into_dyn(), unit, ArrayType::standard())
    }

    /// Creates a unit array of the given type.
    #[must_use]
    pub fn with_type<D: Dimension>(data: Array<A, D>, unit: Unit, array_type: Arc<ArrayType>) -> Self {
        Self::from_parts(data.into_dyn(), unit, array_type)
    }

    pub(crate) const fn from_parts(data: ArrayD<A>, unit: Unit, array_type: Arc<ArrayType>) -> Self {
        Self {
            data,
            unit,
            array_type,
        }
    }

    /// Constructs an array from `data` and a unit.
    ///
    /// - If `data` is a unit array and `unit` is not dimensionless, the two
    ///   units must be equal. The array is returned with its own unit.
    /// - If `data` is a unit array and `unit` is dimensionless, the array is
    ///   returned as is.
    /// - If `data` is plain and `unit` is not dimensionless, a unit array of
    ///   the standard type is created with a copy of `unit`.
    /// - If `data` is plain and `unit` is dimensionless, the plain array is
    ///   returned.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` carries a unit that differs from `unit`.
    pub fn construct(data: impl Into<ArrayValue<A>>, unit: &Unit) -> UnitArrayResult<ArrayValue<A>> {
        Self::construct_value(data.into(), unit, None)
    }

    /// Constructs an array like [`construct`](Self::construct), but gives
    /// the resulting unit array the type `array_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` carries a unit that differs from `unit`.
    pub fn construct_with(
        data: impl Into<ArrayValue<A>>,
        unit: &Unit,
        array_type: &Arc<ArrayType>,
    ) -> UnitArrayResult<ArrayValue<A>> {
        Self::construct_value(data.into(), unit, Some(array_type))
    }

    fn construct_value(
        data: ArrayValue<A>,
        unit: &Unit,
        array_type: Option<&Arc<ArrayType>>,
    ) -> UnitArrayResult<ArrayValue<A>> {
        match data {
            ArrayValue::Tagged(mut array) => {
                if !unit.is_dimensionless() {
                    array.unit.check_same(unit)?;
                }

                if let Some(array_type) = array_type {
                    array.array_type = Arc::clone(array_type);
                }

                Ok(ArrayValue::Tagged(array))
            }

            ArrayValue::Plain(data) if unit.is_dimensionless() => {
                log::trace!("no unit given, keeping the plain array");
                Ok(ArrayValue::Plain(data))
            }

            ArrayValue::Plain(data) => {
                let array_type = array_type.map_or_else(ArrayType::standard, Arc::clone);
                log::trace!("tagging plain array with [{unit}] as {}", array_type.name());

                Ok(ArrayValue::Tagged(Self::from_parts(
                    data,
                    unit.clone(),
                    array_type,
                )))
            }
        }
    }

    /// Constructs an array from a flat list of elements in row-major order.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of elements does not match `shape`.
    pub fn from_shape_vec(shape: &[usize], values: Vec<A>, unit: &Unit) -> UnitArrayResult<ArrayValue<A>> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)
            .map_err(|error| UnitArrayError::allocation(error.to_string()))?;

        Self::construct(data, unit)
    }

    /// Creates a unit array of the standard type from `data`, taking the
    /// unit from `parent`.
    ///
    /// This is the entry point for arrays created by reinterpreting
    /// existing data. Without a parent, or with a plain parent, the array
    /// is dimensionless.
    #[must_use]
    pub fn from_parent<D: Dimension>(data: Array<A, D>, parent: Option<&dyn HasUnit>) -> Self {
        let array_type = ArrayType::standard();
        let unit = array_type.propagate(parent);

        Self::from_parts(data.into_dyn(), unit, array_type)
    }

    /// Creates an array derived from `self`, with the unit given by the
    /// propagate hook.
    pub(crate) fn derive<D: Dimension>(&self, data: Array<A, D>) -> Self {
        let unit = self.array_type.propagate(Some(self));

        Self::from_parts(data.into_dyn(), unit, Arc::clone(&self.array_type))
    }

    /// Returns the unit of the array.
    #[must_use]
    pub const fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Returns a mutable reference to the unit of the array.
    pub const fn unit_mut(&mut self) -> &mut Unit {
        &mut self.unit
    }

    /// Replaces the unit of the array without touching its elements.
    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    /// Returns the textual form of the unit, for example `"m/s**2"`.
    #[must_use]
    pub fn symbol(&self) -> String {
        self.unit.to_string()
    }

    /// Returns the type of the array.
    #[must_use]
    pub const fn array_type(&self) -> &Arc<ArrayType> {
        &self.array_type
    }

    /// Returns a view of the elements without the unit.
    #[must_use]
    pub fn value(&self) -> ArrayViewD<'_, A> {
        self.data.view()
    }

    /// Returns a mutable view of the elements.
    ///
    /// The unit is not affected by writes through the view.
    pub fn value_mut(&mut self) -> ArrayViewMutD<'_, A> {
        self.data.view_mut()
    }

    /// Returns the elements without the unit.
    #[must_use]
    pub fn into_value(self) -> ArrayD<A> {
        self.data
    }

    /// Returns the elements and the unit.
    #[must_use]
    pub fn into_parts(self) -> (ArrayD<A>, Unit) {
        (self.data, self.unit)
    }

    /// Returns the shape of the array.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Returns the number of dimensions of the array.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Returns the number of elements in the array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) const fn data(&self) -> &ArrayD<A> {
        &self.data
    }

    pub(crate) const fn data_mut(&mut self) -> &mut ArrayD<A> {
        &mut self.data
    }

    pub(crate) fn replace_data(&mut self, data: ArrayD<A>, unit: Unit) {
        self.data = data;
        self.unit = unit;
    }

    pub(crate) fn check_axis(&self, axis: usize) -> UnitArrayResult<Axis> {
        if axis < self.ndim() {
            Ok(Axis(axis))
        } else {
            Err(UnitArrayError::AxisOutOfBounds {
                axis,
                ndim: self.ndim(),
            })
        }
    }
}

impl<A: Clone> UnitArray<A> {
    /// Returns a copy of the elements selected by `info`, with the same
    /// unit.
    ///
    /// # Panics
    ///
    /// Panics if the slice does not fit the array. See
    /// [`try_slice`](Self::try_slice) for a fallible version.
    #[must_use]
    pub fn slice<I: SliceArg<IxDyn>>(&self, info: I) -> Self {
        self.derive(self.data.slice(info).to_owned())
    }

    /// Returns a copy of the elements selected by `info`, with the same
    /// unit.
    ///
    /// # Errors
    ///
    /// Returns an error if `info` does not have one entry per axis, if an
    /// index or a slice bound lies outside of its axis, or if a step is zero.
    pub fn try_slice<I: SliceArg<IxDyn>>(&self, info: I) -> UnitArrayResult<Self> {
        check_slice(self.shape(), info.as_ref())?;

        Ok(self.slice(info))
    }

    /// Returns a copy of the sub-array at `index` along `axis`, with the
    /// same unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis or the index is out of bounds.
    pub fn index_axis(&self, axis: usize, index: usize) -> UnitArrayResult<Self> {
        let axis = self.check_axis(axis)?;

        if index >= self.data.len_of(axis) {
            return Err(UnitArrayError::IndexOutOfBounds {
                index: vec![index],
                shape: self.shape().to_vec(),
            });
        }

        Ok(self.derive(self.data.index_axis(axis, index).to_owned()))
    }

    /// Returns a copy of the array with a new shape, keeping the row-major
    /// order of the elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of elements does not match `shape`.
    pub fn reshape(&self, shape: &[usize]) -> UnitArrayResult<Self> {
        let data = self
            .data
            .to_shape(shape.to_vec())
            .map_err(|_| UnitArrayError::ShapeMismatch {
                lhs: self.shape().to_vec(),
                rhs: shape.to_vec(),
            })?
            .into_owned();

        Ok(self.derive(data))
    }

    /// Returns a copy of the array with its axes reversed.
    #[must_use]
    pub fn transpose(&self) -> Self {
        self.derive(self.data.t().to_owned())
    }

    /// Returns a one-dimensional copy of the array in row-major order.
    #[must_use]
    pub fn flatten(&self) -> Self {
        self.derive(self.data.iter().cloned().collect::<Array1<A>>())
    }

    /// Applies `f` to every element, keeping the unit.
    ///
    /// `f` must not change the dimension of the values, for example scaling
    /// is fine while squaring is not. Use the element-wise operations for
    /// anything that affects the unit.
    #[must_use]
    pub fn map<F: FnMut(&A) -> A>(&self, f: F) -> Self {
        self.derive(self.data.map(f))
    }

    /// Converts the elements to another numeric type, keeping the unit.
    ///
    /// # Errors
    ///
    /// Returns an error if an element cannot be represented in `B`.
    pub fn astype<B: NumCast>(&self) -> UnitArrayResult<UnitArray<B>>
    where
        A: ToPrimitive,
    {
        let data = cast_elements(&self.data)?;
        let unit = self.array_type.propagate(Some(self));

        Ok(UnitArray::from_parts(data, unit, Arc::clone(&self.array_type)))
    }
}

impl<A: NumCast> UnitArray<A> {
    /// Constructs an array like [`construct`](Self::construct), converting
    /// the elements of `data` to `A` first.
    ///
    /// # Errors
    ///
    /// Returns an error if an element cannot be represented in `A`, or if
    /// `data` carries a unit that differs from `unit`.
    pub fn construct_as<B>(data: impl Into<ArrayValue<B>>, unit: &Unit) -> UnitArrayResult<ArrayValue<A>>
    where
        B: ToPrimitive + Clone,
    {
        let data = match data.into() {
            ArrayValue::Plain(data) => ArrayValue::Plain(cast_elements(&data)?),
            ArrayValue::Tagged(array) => ArrayValue::Tagged(Self::from_parts(
                cast_elements(&array.data)?,
                array.unit,
                array.array_type,
            )),
        };

        Self::construct_value(data, unit, None)
    }
}

fn cast_elements<B, A>(data: &ArrayD<B>) -> UnitArrayResult<ArrayD<A>>
where
    B: ToPrimitive + Clone,
    A: NumCast,
{
    let values = data
        .iter()
        .map(|value| {
            <A as NumCast>::from(value.clone()).ok_or_else(|| {
                UnitArrayError::allocation("element cannot be represented in the requested type")
            })
        })
        .collect::<UnitArrayResult<Vec<A>>>()?;

    ArrayD::from_shape_vec(data.raw_dim(), values)
        .map_err(|error| UnitArrayError::allocation(error.to_string()))
}

impl<A: Clone> Clone for UnitArray<A> {
    fn clone(&self) -> Self {
        self.derive(self.data.clone())
    }
}

/// Checks that a slice selects valid positions along every axis.
fn check_slice(shape: &[usize], elements: &[SliceInfoElem]) -> UnitArrayResult<()> {
    let invalid = |axis: usize| UnitArrayError::InvalidSlice {
        axis,
        shape: shape.to_vec(),
    };
    let mut axis = 0;

    for element in elements {
        match *element {
            SliceInfoElem::NewAxis => continue,
            SliceInfoElem::Index(index) => {
                let len = *shape.get(axis).ok_or_else(|| invalid(axis))?;
                if resolve_index(index, len).is_none_or(|index| index >= len) {
                    return Err(invalid(axis));
                }
            }
            SliceInfoElem::Slice { start, end, step } => {
                let len = *shape.get(axis).ok_or_else(|| invalid(axis))?;
                let start_fits = resolve_index(start, len).is_some_and(|start| start <= len);
                let end_fits = end.is_none_or(|end| resolve_index(end, len).is_some_and(|end| end <= len));
                if !start_fits || !end_fits || step == 0 {
                    return Err(invalid(axis));
                }
            }
        }
        axis += 1;
    }

    if axis == shape.len() { Ok(()) } else { Err(invalid(axis)) }
}

/// Resolves a possibly negative index counted from the end of an axis.
fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        index.try_into().ok()
    }
}

impl<A> HasUnit for UnitArray<A> {
    fn unit_attr(&self) -> Option<&Unit> {
        Some(&self.unit)
    }
}

impl<A: PartialEq> PartialEq for UnitArray<A> {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.data == other.data
    }
}

impl<A: fmt::Debug> fmt::Debug for UnitArray<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitArray")
            .field("data", &self.data)
            .field("unit", &self.unit)
            .field("array_type", &self.array_type.name())
            .finish()
    }
}

impl<A: fmt::Display> fmt::Display for UnitArray<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.data, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, s};

    use super::*;
    use crate::hooks::PassthroughHooks;

    fn meter() -> Unit {
        Unit::single("m")
    }

    mod construct_tests {
        use super::*;

        #[test]
        fn plain_with_unit_is_tagged() {
            let value = UnitArray::construct(array![1.0, 2.0], &meter()).expect("valid construction");

            let array = value.into_tagged().expect("array should carry a unit");
            assert_eq!(array.unit(), &meter());
            assert_eq!(array.array_type().name(), "UnitArray");
        }

        #[test]
        fn plain_without_unit_stays_plain() {
            let value = UnitArray::construct(array![1.0, 2.0], &Unit::dimensionless())
                .expect("valid construction");

            assert_eq!(value, ArrayValue::from(array![1.0, 2.0]));
        }

        #[test]
        fn tagged_with_same_unit() {
            let array = UnitArray::new(array![1.0], meter());
            let value = UnitArray::construct(&array, &meter()).expect("units agree");
            assert_eq!(value.into_tagged(), Some(array));
        }

        #[test]
        fn tagged_without_unit_keeps_its_unit() {
            let array = UnitArray::new(array![1.0], meter());
            let value = UnitArray::construct(&array, &Unit::dimensionless()).expect("no unit to check");
            assert_eq!(value.unit(), Some(&meter()));
        }

        #[test]
        fn tagged_with_other_unit_fails() {
            let array = UnitArray::new(array![1.0], meter());
            let result = UnitArray::construct(&array, &Unit::single("s"));
            assert!(result.is_err_and(|error| error.is_incompatible_units()));
        }

        #[test]
        fn construct_with_custom_type() {
            let array_type = Arc::new(ArrayType::new("Copying", PassthroughHooks));
            let value = UnitArray::construct_with(array![1.0], &meter(), &array_type)
                .expect("valid construction");

            let array = value.into_tagged().expect("array should carry a unit");
            assert!(Arc::ptr_eq(array.array_type(), &array_type));
        }

        #[test]
        fn construct_as_converts_elements() {
            let value = UnitArray::<f64>::construct_as(array![1_i32, 2, 3], &meter())
                .expect("integers fit in f64");

            assert_eq!(value.value(), array![1.0, 2.0, 3.0].into_dyn().view());
            assert_eq!(value.unit(), Some(&meter()));
        }

        #[test]
        fn construct_as_rejects_unrepresentable() {
            let result = UnitArray::<i32>::construct_as(array![f64::NAN], &meter());
            assert!(matches!(result, Err(UnitArrayError::Allocation { .. })));
        }

        #[test]
        fn from_shape_vec_checks_length() {
            let value = UnitArray::from_shape_vec(&[2, 2], vec![1.0, 2.0, 3.0, 4.0], &meter())
                .expect("length matches");
            assert_eq!(value.shape(), &[2, 2]);

            let result = UnitArray::from_shape_vec(&[2, 2], vec![1.0, 2.0], &meter());
            assert!(matches!(result, Err(UnitArrayError::Allocation { .. })));
        }

        #[test]
        fn from_parent_copies_unit() {
            let parent = UnitArray::new(array![1.0], meter());
            let array = UnitArray::from_parent(array![5.0, 6.0], Some(&parent));
            assert_eq!(array.unit(), &meter());

            let array = UnitArray::from_parent(array![5.0, 6.0], None);
            assert!(array.unit().is_dimensionless());
        }
    }

    mod derive_tests {
        use super::*;

        fn grid() -> UnitArray<f64> {
            UnitArray::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], meter())
        }

        #[test]
        fn slice_keeps_unit() {
            let row = grid().slice(s![1, ..]);
            assert_eq!(row, UnitArray::new(array![4.0, 5.0, 6.0], meter()));
        }

        #[test]
        fn slice_is_a_copy() {
            let array = grid();
            let mut column = array.slice(s![.., 0]);
            column.value_mut().fill(0.0);

            assert_eq!(array.value()[[0, 0]], 1.0);
        }

        #[test]
        fn try_slice_in_bounds() {
            let corner = grid().try_slice(s![-1.., ..2]).expect("slice fits");
            assert_eq!(corner, UnitArray::new(array![[4.0, 5.0]], meter()));
        }

        #[test]
        fn try_slice_out_of_bounds() {
            let shape = vec![2, 3];
            assert_eq!(
                grid().try_slice(s![..5, ..]),
                Err(UnitArrayError::InvalidSlice { axis: 0, shape: shape.clone() })
            );
            assert_eq!(
                grid().try_slice(s![.., -4..]),
                Err(UnitArrayError::InvalidSlice { axis: 1, shape: shape.clone() })
            );
            assert_eq!(
                grid().try_slice(s![0, 3]),
                Err(UnitArrayError::InvalidSlice { axis: 1, shape: shape.clone() })
            );
            assert_eq!(
                grid().try_slice(s![0]),
                Err(UnitArrayError::InvalidSlice { axis: 1, shape })
            );
        }

        #[test]
        fn try_slice_zero_step() {
            let info = [
                SliceInfoElem::Slice {
                    start: 0,
                    end: None,
                    step: 0,
                },
                SliceInfoElem::Index(0),
            ];
            assert!(matches!(
                grid().try_slice(&info[..]),
                Err(UnitArrayError::InvalidSlice { axis: 0, .. })
            ));
        }

        #[test]
        fn clone_is_a_derivation() {
            let array = grid();
            let copy = array.clone();
            assert_eq!(copy, array);
            assert!(Arc::ptr_eq(copy.array_type(), array.array_type()));
        }

        #[test]
        fn index_axis() {
            let column = grid().index_axis(1, 2).expect("index in bounds");
            assert_eq!(column, UnitArray::new(array![3.0, 6.0], meter()));

            assert_eq!(
                grid().index_axis(0, 2),
                Err(UnitArrayError::IndexOutOfBounds {
                    index: vec![2],
                    shape: vec![2, 3],
                })
            );
            assert_eq!(
                grid().index_axis(2, 0),
                Err(UnitArrayError::AxisOutOfBounds { axis: 2, ndim: 2 })
            );
        }

        #[test]
        fn reshape() {
            let reshaped = grid().reshape(&[3, 2]).expect("same number of elements");
            assert_eq!(
                reshaped,
                UnitArray::new(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]], meter())
            );

            assert!(matches!(
                grid().reshape(&[4, 2]),
                Err(UnitArrayError::ShapeMismatch { .. })
            ));
        }

        #[test]
        fn transpose_and_flatten() {
            let transposed = grid().transpose();
            assert_eq!(transposed.shape(), &[3, 2]);
            assert_eq!(
                transposed.flatten(),
                UnitArray::new(array![1.0, 4.0, 2.0, 5.0, 3.0, 6.0], meter())
            );
        }

        #[test]
        fn map_keeps_unit() {
            let doubled = grid().map(|x| x * 2.0);
            assert_eq!(doubled.unit(), &meter());
            assert_eq!(doubled.value()[[1, 2]], 12.0);
        }

        #[test]
        fn astype_keeps_unit() {
            let array = grid().astype::<f32>().expect("values fit in f32");
            assert_eq!(array.unit(), &meter());
            assert_eq!(array.value()[[0, 1]], 2.0_f32);
        }

        #[test]
        fn derived_arrays_keep_type() {
            let array_type = Arc::new(ArrayType::new("Copying", PassthroughHooks));
            let array = UnitArray::with_type(array![1.0, 2.0], meter(), Arc::clone(&array_type));

            assert!(Arc::ptr_eq(array.flatten().array_type(), &array_type));
        }
    }

    #[test]
    fn display() {
        let array = UnitArray::new(array![1.0, 2.5], Unit::from_pairs([("m", 1), ("s", -2)]));
        assert_eq!(array.to_string(), "[1, 2.5] [m/s**2]");
    }

    #[test]
    fn symbol() {
        let array = UnitArray::new(array![1.0], Unit::from_pairs([("kg", 1), ("m", 2)]));
        assert_eq!(array.symbol(), "kg m**2");
    }
}
