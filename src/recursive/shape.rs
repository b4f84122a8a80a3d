//! Shape descriptions of recursively bound modules.

use super::value::Value;

/// The kind of a leaf binding, deciding how its placeholder is built and
/// how it is patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// Patched by replacing the field of the parent record.
    Function,
    /// Patched in place: the placeholder cell takes over the real thunk.
    Lazy,
    /// Patched in place: the placeholder block takes over the real block.
    Class,
}

/// The structure of a recursively bound value.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A single binding of the given kind.
    Value(LeafKind),
    /// A record with one named field per entry.
    Module(Vec<Field>),
    /// A value known before the group is evaluated. It is installed as-is
    /// and left alone when patching.
    Constant(Value),
}

/// A named field of a [`Shape::Module`].
#[derive(Debug, Clone)]
pub struct Field {
    /// The field name within the record.
    pub name: String,
    /// The shape of the field's value.
    pub shape: Shape,
}

impl Field {
    /// Creates a field.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

impl Shape {
    /// A function leaf.
    #[inline]
    pub const fn function() -> Self {
        Self::Value(LeafKind::Function)
    }

    /// A lazy value leaf.
    #[inline]
    pub const fn lazy() -> Self {
        Self::Value(LeafKind::Lazy)
    }

    /// A class leaf.
    #[inline]
    pub const fn class() -> Self {
        Self::Value(LeafKind::Class)
    }

    /// Builds a module shape from `(name, shape)` pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambda_rt::recursive::Shape;
    ///
    /// let shape = Shape::module([
    ///     ("even", Shape::function()),
    ///     ("nested", Shape::module([("table", Shape::lazy())])),
    /// ]);
    /// assert_eq!(shape.field_count(), 2);
    /// ```
    pub fn module<I, N>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Self)>,
        N: Into<String>,
    {
        Self::Module(
            fields
                .into_iter()
                .map(|(name, shape)| Field::new(name, shape))
                .collect(),
        )
    }

    /// A value installed as-is.
    pub const fn constant(value: Value) -> Self {
        Self::Constant(value)
    }

    /// Returns the number of direct fields of a module shape, `0` otherwise.
    pub fn field_count(&self) -> usize {
        match self {
            Self::Module(fields) => fields.len(),
            Self::Value(_) | Self::Constant(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Shape::function(), LeafKind::Function)]
    #[case(Shape::lazy(), LeafKind::Lazy)]
    #[case(Shape::class(), LeafKind::Class)]
    fn test_leaf_constructors(#[case] shape: Shape, #[case] expected: LeafKind) {
        assert!(matches!(shape, Shape::Value(kind) if kind == expected));
        assert_eq!(shape.field_count(), 0);
    }

    #[rstest]
    fn test_module_keeps_field_order() {
        let shape = Shape::module([("b", Shape::lazy()), ("a", Shape::constant(Value::Int(1)))]);
        let Shape::Module(fields) = shape else {
            panic!("expected a module shape");
        };
        let names: Vec<&str> = fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
