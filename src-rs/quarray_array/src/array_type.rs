use std::sync::{Arc, OnceLock};

use quarray_unit::Unit;

use crate::{
    UnitArrayResult,
    hooks::{ArrayHooks, HasUnit, UnitHooks, WrapContext, Wrapped},
};

/// The wrap priority of the standard array type.
pub const DEFAULT_PRIORITY: i32 = 5;

/// Describes a kind of unit array.
///
/// An array type bundles the hooks that keep units consistent with a name
/// and a wrap priority. When an operation combines arrays of different
/// types, the operand whose type has the highest priority decides the type
/// (and therefore the hooks) of the result; ties go to the left operand.
///
/// Array types are immutable once created. They are shared between all
/// arrays of the type.
#[derive(Debug)]
pub struct ArrayType {
    name: String,
    priority: i32,
    hooks: Box<dyn ArrayHooks>,
}

impl ArrayType {
    /// Creates an array type with the given hooks and the default priority.
    pub fn new(name: impl Into<String>, hooks: impl ArrayHooks + 'static) -> Self {
        Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            hooks: Box::new(hooks),
        }
    }

    /// Sets the wrap priority of the array type.
    #[must_use]
    pub fn with_priority(self, priority: i32) -> Self {
        Self { priority, ..self }
    }

    /// Returns the standard array type, which applies [`UnitHooks`].
    ///
    /// The standard type is created on first use and shared afterwards.
    #[must_use]
    pub fn standard() -> Arc<Self> {
        static STANDARD: OnceLock<Arc<ArrayType>> = OnceLock::new();

        Arc::clone(STANDARD.get_or_init(|| Arc::new(Self::new("UnitArray", UnitHooks))))
    }

    /// Returns the name of the array type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wrap priority of the array type.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the hooks of the array type.
    #[must_use]
    pub fn hooks(&self) -> &dyn ArrayHooks {
        self.hooks.as_ref()
    }

    pub(crate) fn propagate(&self, parent: Option<&dyn HasUnit>) -> Unit {
        self.hooks.propagate(parent)
    }

    pub(crate) fn wrap(&self, result: Unit, context: &WrapContext<'_>) -> UnitArrayResult<Wrapped> {
        self.hooks.wrap(result, context)
    }
}

impl Default for ArrayType {
    fn default() -> Self {
        Self::new("UnitArray", UnitHooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::PassthroughHooks;

    #[test]
    fn standard_is_shared() {
        let first = ArrayType::standard();
        let second = ArrayType::standard();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "UnitArray");
        assert_eq!(first.priority(), DEFAULT_PRIORITY);
    }

    #[test]
    fn custom_type() {
        let array_type = ArrayType::new("CopyingArray", PassthroughHooks).with_priority(10);
        assert_eq!(array_type.name(), "CopyingArray");
        assert_eq!(array_type.priority(), 10);
    }
}
