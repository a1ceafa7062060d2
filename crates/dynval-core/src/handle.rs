//! Shared capability handles
//!
//! Objects and functions live behind reference-counted handles. Cloning a
//! handle retains the capability, dropping it releases it, and the
//! capability itself is dropped together with its last handle.
//!
//! Handles use [`Rc`], so the count is not atomic and neither handles nor
//! the values holding them can cross threads. Sharing a capability between
//! threads needs a synchronised wrapper on the caller's side.

use crate::{Error, Result, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// A polymorphic object exposing named properties
pub trait Object {
    /// Read a property
    fn get(&self, name: &str) -> Result<Value>;

    /// Write a property
    fn set(&self, name: &str, value: Value) -> Result<()>;

    /// Name used in diagnostics
    fn type_name(&self) -> &str {
        "object"
    }
}

/// A polymorphic callable
pub trait Function {
    /// Invoke with positional arguments
    fn call(&self, args: &[Value]) -> Result<Value>;

    /// Name used in diagnostics
    fn type_name(&self) -> &str {
        "function"
    }
}

/// Shared handle to an [`Object`]
///
/// Equality is identity: two handles are equal iff they point at the same
/// object.
#[derive(Clone)]
pub struct ObjectRef(Rc<dyn Object>);

impl ObjectRef {
    /// Wrap a new object in a handle
    pub fn new<O: Object + 'static>(object: O) -> Self {
        Self(Rc::new(object))
    }

    /// Retain an already shared object
    pub fn from_rc(object: Rc<dyn Object>) -> Self {
        Self(object)
    }

    /// Number of handles currently keeping the object alive
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Check if both handles reference the same object
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    /// Get the inner shared pointer
    pub fn as_rc(&self) -> &Rc<dyn Object> {
        &self.0
    }
}

impl Deref for ObjectRef {
    type Target = dyn Object;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}@{:p})", self.0.type_name(), Rc::as_ptr(&self.0))
    }
}

impl From<Rc<dyn Object>> for ObjectRef {
    fn from(object: Rc<dyn Object>) -> Self {
        Self(object)
    }
}

/// Shared handle to a [`Function`]
///
/// Equality is identity, as for [`ObjectRef`].
#[derive(Clone)]
pub struct FunctionRef(Rc<dyn Function>);

impl FunctionRef {
    /// Wrap a new function in a handle
    pub fn new<F: Function + 'static>(function: F) -> Self {
        Self(Rc::new(function))
    }

    /// Wrap a Rust closure as a function capability
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Self::new(NativeFunction::new(f))
    }

    /// Retain an already shared function
    pub fn from_rc(function: Rc<dyn Function>) -> Self {
        Self(function)
    }

    /// Number of handles currently keeping the function alive
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Check if both handles reference the same function
    pub fn ptr_eq(&self, other: &FunctionRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    /// Get the inner shared pointer
    pub fn as_rc(&self) -> &Rc<dyn Function> {
        &self.0
    }
}

impl Deref for FunctionRef {
    type Target = dyn Function;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for FunctionRef {}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionRef({}@{:p})", self.0.type_name(), Rc::as_ptr(&self.0))
    }
}

impl From<Rc<dyn Function>> for FunctionRef {
    fn from(function: Rc<dyn Function>) -> Self {
        Self(function)
    }
}

/// An object backed by an insertion-ordered property map
///
/// Setting an unknown property adds it; reading one fails with
/// [`Error::PropertyNotFound`].
#[derive(Debug, Default)]
pub struct PropertyObject {
    properties: RefCell<IndexMap<String, Value>>,
}

impl PropertyObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style property insertion
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.borrow_mut().insert(name.into(), value.into());
        self
    }

    /// Check if a property exists
    pub fn contains(&self, name: &str) -> bool {
        self.properties.borrow().contains_key(name)
    }

    /// Property names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.properties.borrow().keys().cloned().collect()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.borrow().len()
    }

    /// Check if the object has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.borrow().is_empty()
    }
}

impl Object for PropertyObject {
    fn get(&self, name: &str) -> Result<Value> {
        self.properties
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::PropertyNotFound(name.to_string()))
    }

    fn set(&self, name: &str, value: Value) -> Result<()> {
        self.properties.borrow_mut().insert(name.to_string(), value);
        Ok(())
    }

    fn type_name(&self) -> &str {
        "property_object"
    }
}

type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

/// A function backed by a Rust closure
pub struct NativeFunction {
    f: Box<NativeFn>,
}

impl NativeFunction {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Self { f: Box::new(f) }
    }
}

impl Function for NativeFunction {
    fn call(&self, args: &[Value]) -> Result<Value> {
        (self.f)(args)
    }

    fn type_name(&self) -> &str {
        "native_function"
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeFunction(..)")
    }
}
