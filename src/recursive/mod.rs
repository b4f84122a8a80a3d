//! Recursive module bindings.
//!
//! A group of mutually recursive bindings is evaluated in two steps. First a
//! placeholder is built from the group's [`Shape`]: every function, lazy
//! value and class in it fails with [`UndefinedRecursiveModule`] when used.
//! The group's bodies are then evaluated against the placeholder, and the
//! placeholder is patched with the real values:
//!
//! - function fields are replaced in the placeholder's record
//! - lazy and class fields keep their identity and take over the real
//!   contents, so references captured during evaluation see the real values
//!
//! # Examples
//!
//! ```rust
//! use lambda_rt::recursive::{Function, Location, Record, RecursiveGroup, Shape, Value};
//!
//! let shape = Shape::module([("answer", Shape::function())]);
//! let group = RecursiveGroup::new(Location::new("lib.ml", 1, 0), shape);
//!
//! let real = Value::Module(Record::from_fields([(
//!     "answer",
//!     Value::Function(Function::new(|_| Ok(Value::Int(42)))),
//! )]));
//! let module = group.patch(&real);
//!
//! let Value::Module(record) = module else { unreachable!() };
//! let answer = record.get("answer").unwrap().call(Value::Unit).unwrap();
//! assert!(answer.same(&Value::Int(42)));
//! ```

mod resolver;
mod shape;
mod value;

pub use resolver::{init_module, update_module, Location, RecursiveGroup, UndefinedRecursiveModule};
pub use shape::{Field, LeafKind, Shape};
pub use value::{ClassBlock, ClassValue, Function, LazyValue, Outcome, Record, Value};

static_assertions::assert_not_impl_any!(Value: Send, Sync);
static_assertions::assert_not_impl_any!(RecursiveGroup: Send, Sync);
