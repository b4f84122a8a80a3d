//! Placeholder construction and patching for recursive bindings.

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use super::shape::{Field, LeafKind, Shape};
use super::value::{ClassBlock, ClassValue, Function, LazyValue, Record, Value};

/// A position in the source program, reported when a placeholder is used
/// too early.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Source file name.
    pub file: String,
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

impl Location {
    /// Creates a location.
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A recursive binding was used before its group finished evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("undefined recursive module at {location}")]
pub struct UndefinedRecursiveModule {
    /// Where the recursive group is defined.
    pub location: Location,
}

/// Builds the placeholder for a value of the given shape.
///
/// Every function, lazy value or class reachable in the placeholder fails
/// with [`UndefinedRecursiveModule`] naming `location` when used.
///
/// # Examples
///
/// ```rust
/// use lambda_rt::recursive::{init_module, Location, Shape, Value};
///
/// let location = Location::new("main.ml", 3, 8);
/// let placeholder = init_module(&location, &Shape::module([("f", Shape::function())]));
///
/// let Value::Module(record) = placeholder else { unreachable!() };
/// let error = record.get("f").unwrap().call(Value::Unit).unwrap_err();
/// assert_eq!(error.to_string(), "undefined recursive module at main.ml:3:8");
/// ```
pub fn init_module(location: &Location, shape: &Shape) -> Value {
    debug!(%location, fields = shape.field_count(), "building recursive module placeholder");
    placeholder(location, shape)
}

fn placeholder(location: &Location, shape: &Shape) -> Value {
    match shape {
        Shape::Value(LeafKind::Function) => Value::Function(undefined_function(location)),
        Shape::Value(LeafKind::Lazy) => {
            let location = location.clone();
            Value::Lazy(LazyValue::new(move || {
                Err(UndefinedRecursiveModule { location }.into())
            }))
        }
        Shape::Value(LeafKind::Class) => Value::Class(ClassValue::new(ClassBlock {
            object_init: Value::Function(undefined_function(location)),
            class_init: Value::Function(undefined_function(location)),
            env_init: Value::Function(undefined_function(location)),
            initialized: false,
        })),
        Shape::Module(fields) => Value::Module(Record::from_fields(
            fields
                .iter()
                .map(|field| (field.name.clone(), placeholder(location, &field.shape))),
        )),
        Shape::Constant(value) => value.clone(),
    }
}

fn undefined_function(location: &Location) -> Function {
    let location = location.clone();
    Function::new(move |_| {
        Err(UndefinedRecursiveModule {
            location: location.clone(),
        }
        .into())
    })
}

/// Patches `placeholder` with the contents of `real`, field by field.
///
/// Function fields are replaced in the placeholder's record. Lazy and class
/// fields keep their placeholder cell, which takes over the real contents,
/// so handles captured before patching see the real values. Nested modules
/// are patched recursively and constant fields are left alone.
///
/// # Panics
///
/// Panics if `shape` is not a module, if either value is not a module
/// record, if a field named by the shape is missing, or if a field's value
/// does not match its leaf kind. These indicate a miscompiled program.
pub fn update_module(shape: &Shape, placeholder: &Value, real: &Value) {
    let Shape::Module(fields) = shape else {
        panic!("update_module: top-level shape must be a module");
    };
    let (Value::Module(placeholder), Value::Module(real)) = (placeholder, real) else {
        panic!(
            "update_module: expected two modules, found {} and {}",
            placeholder.kind(),
            real.kind()
        );
    };
    debug!(fields = fields.len(), "patching recursive module");
    update_fields(fields, placeholder, real);
}

fn update_fields(fields: &[Field], placeholder: &Record, real: &Record) {
    for field in fields {
        match &field.shape {
            Shape::Value(LeafKind::Function) => {
                trace!(field = %field.name, "replacing function");
                placeholder.set(field.name.clone(), lookup(real, &field.name));
            }
            Shape::Value(LeafKind::Lazy) => {
                match (lookup(placeholder, &field.name), lookup(real, &field.name)) {
                    (Value::Lazy(cell), Value::Lazy(real)) => {
                        trace!(field = %field.name, "patching lazy value");
                        cell.patch_from(&real);
                    }
                    (cell, real) => mismatch(&field.name, "lazy", &cell, &real),
                }
            }
            Shape::Value(LeafKind::Class) => {
                match (lookup(placeholder, &field.name), lookup(real, &field.name)) {
                    (Value::Class(cell), Value::Class(real)) => {
                        trace!(field = %field.name, "patching class");
                        cell.patch_from(&real);
                    }
                    (cell, real) => mismatch(&field.name, "class", &cell, &real),
                }
            }
            Shape::Module(children) => {
                match (lookup(placeholder, &field.name), lookup(real, &field.name)) {
                    (Value::Module(inner), Value::Module(real)) => {
                        trace!(field = %field.name, fields = children.len(), "patching nested module");
                        update_fields(children, &inner, &real);
                    }
                    (inner, real) => mismatch(&field.name, "module", &inner, &real),
                }
            }
            Shape::Constant(_) => {}
        }
    }
}

fn lookup(record: &Record, name: &str) -> Value {
    record
        .get(name)
        .unwrap_or_else(|_| panic!("update_module: missing field `{name}`"))
}

fn mismatch(name: &str, expected: &str, placeholder: &Value, real: &Value) -> ! {
    panic!(
        "update_module: field `{name}` should be {expected}, found {} and {}",
        placeholder.kind(),
        real.kind()
    )
}

/// A group of recursive bindings whose placeholder has been built but not
/// yet patched.
///
/// [`patch`](Self::patch) consumes the group, so a group is patched exactly
/// once.
///
/// # Examples
///
/// ```rust
/// use lambda_rt::recursive::{Location, Record, RecursiveGroup, Shape, Value, LazyValue};
///
/// let group = RecursiveGroup::new(Location::new("m.ml", 1, 0), Shape::module([("x", Shape::lazy())]));
/// let Value::Module(placeholder) = group.placeholder().clone() else { unreachable!() };
/// let Value::Lazy(early) = placeholder.get("x").unwrap() else { unreachable!() };
/// assert!(early.force().is_err());
///
/// let real = Value::Module(Record::from_fields([("x", Value::Lazy(LazyValue::from_value(Value::Int(1))))]));
/// group.patch(&real);
/// assert!(early.force().unwrap().same(&Value::Int(1)));
/// ```
#[derive(Debug)]
pub struct RecursiveGroup {
    location: Location,
    shape: Shape,
    placeholder: Value,
}

impl RecursiveGroup {
    /// Builds the placeholder for `shape`.
    pub fn new(location: Location, shape: Shape) -> Self {
        let placeholder = init_module(&location, &shape);
        Self {
            location,
            shape,
            placeholder,
        }
    }

    /// Returns the placeholder to evaluate the group's bodies against.
    #[inline]
    pub const fn placeholder(&self) -> &Value {
        &self.placeholder
    }

    /// Returns the group's source location.
    #[inline]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the group's shape.
    #[inline]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Patches the placeholder with `real` and returns it.
    ///
    /// # Panics
    ///
    /// Panics under the conditions listed on [`update_module`].
    pub fn patch(self, real: &Value) -> Value {
        debug!(location = %self.location, "patching recursive group");
        update_module(&self.shape, &self.placeholder, real);
        self.placeholder
    }
}
