//! Dynval Core - Tagged dynamic values for crossing a dynamically typed boundary
//!
//! This crate provides a single value type, [`Value`], that holds exactly one
//! of a closed set of kinds:
//! - Scalars: `bool`, `i8`, `u8`, `i32`, `u32`, `f32`, `f64`
//! - Owned strings with value semantics
//! - Shared handles to object and function capabilities ([`ObjectRef`], [`FunctionRef`])
//! - A non-owning raw pointer, for callers that need an escape hatch
//!
//! Reads go through a coercion matrix ([`coerce()`]) and report failures as
//! [`Error`] values; nothing panics on a failed conversion.
//!
//! ```
//! use dynval_core::{Value, ValueKind};
//!
//! let mut v = Value::from("42");
//! assert_eq!(v.get_int32().unwrap(), 42);
//!
//! v.coerce_type(ValueKind::UInt8).unwrap();
//! assert_eq!(v, Value::UInt8(42));
//! assert!(v.get_object().is_err());
//! ```
//!
//! ## Threading
//!
//! Handles are reference counted with [`std::rc::Rc`], so `Value` is neither
//! `Send` nor `Sync`. Sharing values across threads requires the caller to
//! provide its own synchronisation around a separate representation.

mod coerce;
mod config;
mod convert;
mod error;
mod handle;
mod kind;
mod value;

pub use coerce::coerce;
pub use config::{CoercionConfig, Narrowing};
pub use convert::FromValue;
pub use error::{Error, Result};
pub use handle::{Function, FunctionRef, NativeFunction, Object, ObjectRef, PropertyObject};
pub use kind::{UnknownKind, ValueKind};
pub use value::Value;
