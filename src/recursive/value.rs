//! The dynamic object model patched by the resolver.
//!
//! Functions, lazy values, classes and module records are shared handles:
//! cloning a [`Value`] clones the handle, and [`Value::same`] compares
//! handles by identity. Lazy values, classes and records are stable cells
//! whose contents can be replaced, so every holder of a handle observes a
//! patch.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::control::Lazy;
use crate::error::RuntimeError;
use crate::persistent::{NotFound, OrderedMap};

/// The result of running a runtime function or forcing a lazy value.
pub type Outcome = Result<Value, RuntimeError>;

type Thunk = Box<dyn FnOnce() -> Outcome>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// The unit value.
    Unit,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// An immutable string.
    Text(Rc<str>),
    /// A function handle.
    Function(Function),
    /// A lazy value handle.
    Lazy(LazyValue),
    /// A class handle.
    Class(ClassValue),
    /// A module record handle.
    Module(Record),
}

impl Value {
    /// Physical equality: handles are compared by identity, scalars by
    /// value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambda_rt::recursive::{Function, Value};
    ///
    /// let identity = Value::Function(Function::new(Ok));
    /// assert!(identity.same(&identity.clone()));
    /// assert!(!identity.same(&Value::Function(Function::new(Ok))));
    /// assert!(Value::Int(3).same(&Value::Int(3)));
    /// ```
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Text(left), Self::Text(right)) => left == right,
            (Self::Function(left), Self::Function(right)) => left.ptr_eq(right),
            (Self::Lazy(left), Self::Lazy(right)) => left.ptr_eq(right),
            (Self::Class(left), Self::Class(right)) => left.ptr_eq(right),
            (Self::Module(left), Self::Module(right)) => left.ptr_eq(right),
            _ => false,
        }
    }

    /// Returns the name of the value's variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Function(_) => "function",
            Self::Lazy(_) => "lazy",
            Self::Class(_) => "class",
            Self::Module(_) => "module",
        }
    }

    /// Applies a function value to `argument`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the function body, or
    /// [`RuntimeError::Failure`] if the value is not a function.
    pub fn call(&self, argument: Self) -> Outcome {
        match self {
            Self::Function(function) => function.call(argument),
            other => Err(RuntimeError::failure(format!(
                "Value.call: {} is not a function",
                other.kind()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(Rc::from(value))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => formatter.write_str("Unit"),
            Self::Bool(value) => formatter.debug_tuple("Bool").field(value).finish(),
            Self::Int(value) => formatter.debug_tuple("Int").field(value).finish(),
            Self::Text(value) => formatter.debug_tuple("Text").field(value).finish(),
            Self::Function(function) => fmt::Debug::fmt(function, formatter),
            Self::Lazy(lazy) => fmt::Debug::fmt(lazy, formatter),
            Self::Class(class) => fmt::Debug::fmt(class, formatter),
            Self::Module(record) => fmt::Debug::fmt(record, formatter),
        }
    }
}

/// A runtime function of one argument.
#[derive(Clone)]
pub struct Function(Rc<dyn Fn(Value) -> Outcome>);

impl Function {
    /// Wraps a closure as a runtime function.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(Value) -> Outcome + 'static,
    {
        Self(Rc::new(function))
    }

    /// Applies the function.
    ///
    /// # Errors
    ///
    /// Returns whatever error the function body produces.
    pub fn call(&self, argument: Value) -> Outcome {
        (self.0)(argument)
    }

    /// Returns whether both handles refer to the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Function")
    }
}

/// A stable cell holding a memoized suspended value.
///
/// The memoized computation itself is shared: patching a placeholder makes
/// it refer to the real value's computation, so whichever handle forces
/// first does so for both.
#[derive(Clone)]
pub struct LazyValue(Rc<RefCell<Rc<Lazy<Outcome, Thunk>>>>);

impl LazyValue {
    /// Suspends `thunk` until the value is first forced.
    pub fn new<F>(thunk: F) -> Self
    where
        F: FnOnce() -> Outcome + 'static,
    {
        let thunk: Thunk = Box::new(thunk);
        Self(Rc::new(RefCell::new(Rc::new(Lazy::new(thunk)))))
    }

    /// Creates an already evaluated lazy value.
    pub fn from_value(value: Value) -> Self {
        Self(Rc::new(RefCell::new(Rc::new(Lazy::forced(Ok(value))))))
    }

    /// Evaluates the value, running the suspended computation at most once.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the computation, or
    /// [`RuntimeError::LazyUndefined`] if the value is forced during its own
    /// evaluation.
    pub fn force(&self) -> Outcome {
        let cell = Rc::clone(&self.0.borrow());
        cell.try_force()?.clone()
    }

    /// Returns whether the current computation has run.
    pub fn is_forced(&self) -> bool {
        self.0.borrow().is_forced()
    }

    /// Makes this cell share the computation of `real`.
    pub fn patch_from(&self, real: &Self) {
        let computation = Rc::clone(&real.0.borrow());
        *self.0.borrow_mut() = computation;
    }

    /// Returns whether both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = Rc::clone(&self.0.borrow());
        match cell.get() {
            Some(outcome) => formatter.debug_tuple("Lazy").field(&*outcome).finish(),
            None => formatter.write_str("Lazy"),
        }
    }
}

/// The contents of a class value.
#[derive(Debug, Clone)]
pub struct ClassBlock {
    /// Builds instances of the class.
    pub object_init: Value,
    /// Runs the class initializer.
    pub class_init: Value,
    /// Builds the class environment.
    pub env_init: Value,
    /// Whether the class initializer has run.
    pub initialized: bool,
}

/// A stable cell holding a [`ClassBlock`].
#[derive(Clone)]
pub struct ClassValue(Rc<RefCell<ClassBlock>>);

impl ClassValue {
    /// Creates a class cell.
    pub fn new(block: ClassBlock) -> Self {
        Self(Rc::new(RefCell::new(block)))
    }

    /// Returns a copy of the current contents.
    pub fn block(&self) -> ClassBlock {
        self.0.borrow().clone()
    }

    /// Returns whether the class initializer has run.
    pub fn is_initialized(&self) -> bool {
        self.0.borrow().initialized
    }

    /// Marks the class as initialized.
    pub fn set_initialized(&self) {
        self.0.borrow_mut().initialized = true;
    }

    /// Overwrites the contents of this cell with those of `real`.
    pub fn patch_from(&self, real: &Self) {
        let block = real.block();
        *self.0.borrow_mut() = block;
    }

    /// Returns whether both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ClassValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Class")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

/// A stable cell holding the named fields of a module.
///
/// Fields live in a persistent [`OrderedMap`]; [`set`](Self::set) swaps in
/// the updated map, and leaves the cell untouched when the field already
/// holds the same value.
#[derive(Clone, Default)]
pub struct Record(Rc<RefCell<OrderedMap<String, Value>>>);

impl Record {
    /// Creates a record with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from `(name, value)` pairs; later pairs win.
    pub fn from_fields<I, N>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Value)>,
        N: Into<String>,
    {
        let record = Self::new();
        for (name, value) in fields {
            record.set(name, value);
        }
        record
    }

    /// Returns the value of the field `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the record has no such field.
    pub fn get(&self, name: &str) -> Result<Value, NotFound> {
        self.0.borrow().find(name).cloned()
    }

    /// Binds the field `name` to `value`.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        let fields = self.0.borrow().insert_by(name.into(), value, Value::same);
        *self.0.borrow_mut() = fields;
    }

    /// Returns the field names in ascending order.
    pub fn field_names(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.borrow().cardinal()
    }

    /// Returns whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns whether both handles refer to the same record.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Module")
            .field(&self.field_names())
            .finish()
    }
}
