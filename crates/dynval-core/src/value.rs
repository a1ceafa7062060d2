//! The dynamic value container

use crate::coerce::Number;
use crate::{coerce, CoercionConfig, FunctionRef, ObjectRef, Result, ValueKind};
use std::ffi::c_void;
use std::fmt;
use std::rc::Rc;

use crate::handle::{Function, Object};

/// A value of exactly one kind, tagged at runtime
///
/// Scalars are stored inline. `String` owns its buffer, so clones are
/// independent. `Object` and `Function` hold shared handles: a clone
/// retains the capability and dropping the value releases it. Replacing a
/// value (through a setter, [`assign`](Value::assign) or plain assignment)
/// drops the previous payload first.
///
/// `VoidPtr` is a raw address with no ownership at all. The value never
/// dereferences, copies or frees the pointee.
///
/// All reads go through the coercion matrix; see [`Value::coerce_to`].
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value
    #[default]
    Empty,
    Bool(bool),
    Int8(i8),
    UInt8(u8),
    Int32(i32),
    UInt32(u32),
    Float(f32),
    Double(f64),
    String(String),
    Object(ObjectRef),
    Function(FunctionRef),
    /// Non-owning raw address
    VoidPtr(*mut c_void),
}

impl Value {
    /// Get the kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Empty => ValueKind::Empty,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int8(_) => ValueKind::Int8,
            Value::UInt8(_) => ValueKind::UInt8,
            Value::Int32(_) => ValueKind::Int32,
            Value::UInt32(_) => ValueKind::UInt32,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Object(_) => ValueKind::Object,
            Value::Function(_) => ValueKind::Function,
            Value::VoidPtr(_) => ValueKind::VoidPtr,
        }
    }

    /// Check if this value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    // === Setters ===

    /// Reset to empty, releasing any held resource
    pub fn set_empty(&mut self) {
        *self = Value::Empty;
    }

    /// Replace with a copy of another value
    pub fn set_value(&mut self, value: &Value) {
        *self = value.clone();
    }

    /// Store a bool
    pub fn set_bool(&mut self, v: bool) {
        *self = Value::Bool(v);
    }

    /// Store an `i8`
    pub fn set_int8(&mut self, v: i8) {
        *self = Value::Int8(v);
    }

    /// Store a `u8`
    pub fn set_uint8(&mut self, v: u8) {
        *self = Value::UInt8(v);
    }

    /// Store an `i32`
    pub fn set_int32(&mut self, v: i32) {
        *self = Value::Int32(v);
    }

    /// Store a `u32`
    pub fn set_uint32(&mut self, v: u32) {
        *self = Value::UInt32(v);
    }

    /// Store an `f32`
    pub fn set_float(&mut self, v: f32) {
        *self = Value::Float(v);
    }

    /// Store an `f64`
    pub fn set_double(&mut self, v: f64) {
        *self = Value::Double(v);
    }

    /// Store an owned copy of a string
    pub fn set_string(&mut self, v: impl Into<String>) {
        *self = Value::String(v.into());
    }

    /// Store an object handle, retaining it
    pub fn set_object(&mut self, v: impl Into<ObjectRef>) {
        *self = Value::Object(v.into());
    }

    /// Store a function handle, retaining it
    pub fn set_function(&mut self, v: impl Into<FunctionRef>) {
        *self = Value::Function(v.into());
    }

    /// Store a raw address; the caller keeps responsibility for the pointee
    pub fn set_void_ptr(&mut self, v: *mut c_void) {
        *self = Value::VoidPtr(v);
    }

    // === Getters ===

    /// Copy this value (never fails)
    pub fn get_value(&self) -> Result<Value> {
        Ok(self.clone())
    }

    /// Read as a bool; numbers are true when nonzero
    pub fn get_bool(&self) -> Result<bool> {
        self.convert()
    }

    /// Read as an `i8`
    pub fn get_int8(&self) -> Result<i8> {
        self.convert()
    }

    /// Read as a `u8`
    pub fn get_uint8(&self) -> Result<u8> {
        self.convert()
    }

    /// Read as an `i32`
    pub fn get_int32(&self) -> Result<i32> {
        self.convert()
    }

    /// Read as a `u32`
    pub fn get_uint32(&self) -> Result<u32> {
        self.convert()
    }

    /// Read as an `f32`
    pub fn get_float(&self) -> Result<f32> {
        self.convert()
    }

    /// Read as an `f64`
    pub fn get_double(&self) -> Result<f64> {
        self.convert()
    }

    /// Read as a string, rendering numbers in their canonical form
    pub fn get_string(&self) -> Result<String> {
        self.convert()
    }

    /// Read the object handle, retaining it
    pub fn get_object(&self) -> Result<ObjectRef> {
        self.convert()
    }

    /// Read the function handle, retaining it
    pub fn get_function(&self) -> Result<FunctionRef> {
        self.convert()
    }

    /// Read the raw address; only a pointer value succeeds
    pub fn get_void_ptr(&self) -> Result<*mut c_void> {
        self.convert()
    }

    // === Infallible readers ===
    //
    // These fall back to the target's default when coercion fails.

    /// Read as a bool, or `false`
    pub fn to_bool(&self) -> bool {
        self.convert_or_default()
    }

    /// Read as an `i8`, or 0
    pub fn to_int8(&self) -> i8 {
        self.convert_or_default()
    }

    /// Read as a `u8`, or 0
    pub fn to_uint8(&self) -> u8 {
        self.convert_or_default()
    }

    /// Read as an `i32`, or 0
    pub fn to_int32(&self) -> i32 {
        self.convert_or_default()
    }

    /// Read as a `u32`, or 0
    pub fn to_uint32(&self) -> u32 {
        self.convert_or_default()
    }

    /// Read as an `f32`, or 0.0
    pub fn to_float(&self) -> f32 {
        self.convert_or_default()
    }

    /// Read as an `f64`, or 0.0
    pub fn to_double(&self) -> f64 {
        self.convert_or_default()
    }

    /// Get the object handle, if this value holds one
    pub fn to_object(&self) -> Option<ObjectRef> {
        self.get_object().ok()
    }

    /// Get the function handle, if this value holds one
    pub fn to_function(&self) -> Option<FunctionRef> {
        self.get_function().ok()
    }

    /// Null when this value is not a pointer
    pub fn to_void_ptr(&self) -> *mut c_void {
        self.get_void_ptr().unwrap_or(std::ptr::null_mut())
    }

    // === Coercion ===

    /// Produce a copy of this value converted to `kind`
    pub fn coerce_to(&self, kind: ValueKind) -> Result<Value> {
        coerce::coerce(self, kind)
    }

    /// Convert this value in place
    ///
    /// On failure the value is left exactly as it was.
    pub fn coerce_type(&mut self, kind: ValueKind) -> Result<()> {
        self.coerce_type_with(kind, &CoercionConfig::default())
    }

    /// Convert this value in place using an explicit configuration
    pub fn coerce_type_with(&mut self, kind: ValueKind, config: &CoercionConfig) -> Result<()> {
        let coerced = config.coerce(self, kind)?;
        *self = coerced;
        Ok(())
    }
}

/// Values compare equal when their payloads match without coercion
///
/// Numeric kinds (bool included) compare by value across kinds, so
/// `Int32(5) == Double(5.0)`. Strings compare by content, handles by
/// identity, pointers by address. Any other cross-kind pair is unequal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::VoidPtr(a), Value::VoidPtr(b)) => std::ptr::eq(*a, *b),
            _ => match (Number::of(self), Number::of(other)) {
                (Some(a), Some(b)) => a.same_value(&b),
                _ => false,
            },
        }
    }
}

/// Canonical text rendering
///
/// Numbers and strings render exactly as [`Value::get_string`] returns
/// them. Other kinds render a diagnostic form that `get_string` refuses.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int8(i) => write!(f, "{}", i),
            Value::UInt8(i) => write!(f, "{}", i),
            Value::Int32(i) => write!(f, "{}", i),
            Value::UInt32(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Double(fl) => write!(f, "{}", fl),
            Value::String(s) => f.write_str(s),
            Value::Object(o) => write!(f, "[object {}]", o.type_name()),
            Value::Function(func) => write!(f, "[function {}]", func.type_name()),
            Value::VoidPtr(p) => write!(f, "{:p}", *p),
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int8(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::UInt8(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt32(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<&ObjectRef> for Value {
    fn from(o: &ObjectRef) -> Self {
        Value::Object(o.clone())
    }
}

impl From<Rc<dyn Object>> for Value {
    fn from(o: Rc<dyn Object>) -> Self {
        Value::Object(ObjectRef::from_rc(o))
    }
}

impl From<FunctionRef> for Value {
    fn from(func: FunctionRef) -> Self {
        Value::Function(func)
    }
}

impl From<&FunctionRef> for Value {
    fn from(func: &FunctionRef) -> Self {
        Value::Function(func.clone())
    }
}

impl From<Rc<dyn Function>> for Value {
    fn from(func: Rc<dyn Function>) -> Self {
        Value::Function(FunctionRef::from_rc(func))
    }
}

impl From<*mut c_void> for Value {
    fn from(p: *mut c_void) -> Self {
        Value::VoidPtr(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Narrowing, PropertyObject};
    use std::cell::Cell;

    struct Tracked(Rc<Cell<bool>>);

    impl Object for Tracked {
        fn get(&self, name: &str) -> Result<Value> {
            Err(Error::PropertyNotFound(name.to_string()))
        }

        fn set(&self, name: &str, _value: Value) -> Result<()> {
            Err(Error::PropertyNotFound(name.to_string()))
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn test_default_is_empty() {
        let v = Value::default();
        assert!(v.is_empty());
        assert_eq!(v.kind(), ValueKind::Empty);
    }

    #[test]
    fn test_round_trip_scalars() {
        let mut v = Value::Empty;
        v.set_bool(true);
        assert!(v.get_bool().unwrap());
        v.set_int8(-8);
        assert_eq!(v.get_int8().unwrap(), -8);
        v.set_uint8(200);
        assert_eq!(v.get_uint8().unwrap(), 200);
        v.set_int32(-70000);
        assert_eq!(v.get_int32().unwrap(), -70000);
        v.set_uint32(4_000_000_000);
        assert_eq!(v.get_uint32().unwrap(), 4_000_000_000);
        v.set_float(1.25);
        assert_eq!(v.get_float().unwrap(), 1.25);
        v.set_double(-0.5);
        assert_eq!(v.get_double().unwrap(), -0.5);
        v.set_string("hello");
        assert_eq!(v.get_string().unwrap(), "hello");
        assert_eq!(v.kind(), ValueKind::String);
    }

    #[test]
    fn test_round_trip_handles_and_pointer() {
        let obj = ObjectRef::new(PropertyObject::new());
        let func = FunctionRef::from_fn(|_| Ok(Value::Empty));
        let mut slot = 0u8;
        let ptr = &mut slot as *mut u8 as *mut c_void;

        let mut v = Value::Empty;
        v.set_object(obj.clone());
        assert_eq!(v.get_object().unwrap(), obj);
        v.set_function(func.clone());
        assert_eq!(v.get_function().unwrap(), func);
        v.set_void_ptr(ptr);
        assert_eq!(v.get_void_ptr().unwrap(), ptr);
        v.set_empty();
        assert!(v.get_value().unwrap().is_empty());
    }

    #[test]
    fn test_string_copy_independence() {
        let mut source = Value::from("abc");
        let copy = source.clone();

        if let Value::String(s) = &mut source {
            s.push_str("def");
        }
        assert_eq!(source.get_string().unwrap(), "abcdef");
        assert_eq!(copy.get_string().unwrap(), "abc");
    }

    #[test]
    fn test_object_shared_ownership() {
        let released = Rc::new(Cell::new(false));
        let original = Value::from(ObjectRef::new(Tracked(released.clone())));
        let copy = original.clone();
        assert_eq!(copy.get_object().unwrap().ref_count(), 3);

        drop(original);
        assert!(!released.get());
        assert_eq!(copy.to_object().map(|o| o.ref_count()), Some(2));

        drop(copy);
        assert!(released.get());
    }

    #[test]
    fn test_setter_releases_previous_handle() {
        let released = Rc::new(Cell::new(false));
        let mut v = Value::from(ObjectRef::new(Tracked(released.clone())));
        v.set_int32(1);
        assert!(released.get());
        assert_eq!(v, Value::Int32(1));
    }

    struct TrackedFn(Rc<Cell<bool>>);

    impl Function for TrackedFn {
        fn call(&self, _args: &[Value]) -> Result<Value> {
            Ok(Value::Empty)
        }
    }

    impl Drop for TrackedFn {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn test_set_value_copy_assign() {
        let obj = ObjectRef::new(PropertyObject::new());
        let source = Value::from(&obj);
        let mut target = Value::from("previous");

        target.set_value(&source);
        assert_eq!(target.kind(), ValueKind::Object);
        assert_eq!(target, source);
        assert_eq!(obj.ref_count(), 3);

        target.set_value(&Value::Int8(1));
        assert_eq!(target, Value::Int8(1));
        assert_eq!(obj.ref_count(), 2);

        let mut text = Value::from("abc");
        let copy = {
            let mut copy = Value::Empty;
            copy.set_value(&text);
            copy
        };
        text.set_string("xyz");
        assert_eq!(copy.get_string().unwrap(), "abc");
    }

    #[test]
    fn test_function_handle_release() {
        let released = Rc::new(Cell::new(false));
        let shared: Rc<dyn Function> = Rc::new(TrackedFn(released.clone()));
        let a = Value::from(shared);
        let mut b = Value::Empty;
        b.set_value(&a);
        assert_eq!(a, b);

        drop(a);
        assert!(!released.get());

        b.set_value(&Value::Int8(1));
        assert!(released.get());

        let released = Rc::new(Cell::new(false));
        let mut c = Value::from(FunctionRef::new(TrackedFn(released.clone())));
        let d = c.clone();
        c.set_empty();
        assert!(!released.get());
        drop(d);
        assert!(released.get());
    }

    #[test]
    fn test_set_object_from_shared_rc() {
        let released = Rc::new(Cell::new(false));
        let shared: Rc<dyn Object> = Rc::new(Tracked(released.clone()));
        let mut v = Value::Empty;
        v.set_object(shared.clone());
        assert_eq!(v.get_object().unwrap().as_rc().type_name(), "object");
        assert_eq!(Rc::strong_count(&shared), 2);
        assert_eq!(v, Value::from(shared.clone()));

        drop(shared);
        assert!(!released.get());
        v.set_bool(false);
        assert!(released.get());
    }

    #[test]
    fn test_coercing_getters() {
        assert_eq!(Value::Int32(1000).get_int8().unwrap(), -24);
        assert_eq!(Value::from("42").get_int32().unwrap(), 42);
        assert!(matches!(
            Value::from("abc").get_int32(),
            Err(Error::ParseFailure { .. })
        ));
        assert_eq!(Value::Double(7.0).get_string().unwrap(), "7");
    }

    #[test]
    fn test_mismatch_and_empty() {
        let obj = Value::from(ObjectRef::new(PropertyObject::new()));
        assert!(matches!(obj.get_int32(), Err(Error::TypeMismatch { .. })));
        assert!(matches!(obj.get_string(), Err(Error::TypeMismatch { .. })));
        assert!(matches!(obj.get_bool(), Err(Error::TypeMismatch { .. })));

        let empty = Value::Empty;
        assert!(matches!(empty.get_bool(), Err(Error::EmptyValue { .. })));
        assert!(matches!(empty.get_string(), Err(Error::EmptyValue { .. })));
        assert!(matches!(empty.get_object(), Err(Error::EmptyValue { .. })));
        assert!(matches!(empty.get_void_ptr(), Err(Error::EmptyValue { .. })));
    }

    #[test]
    fn test_infallible_readers() {
        assert_eq!(Value::from("12").to_int32(), 12);
        assert_eq!(Value::from("x").to_int32(), 0);
        assert!(!Value::Empty.to_bool());
        assert!(Value::Int8(3).to_object().is_none());
        assert!(Value::Double(1.0).to_void_ptr().is_null());
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::Int32(5), Value::Int32(5));
        assert_ne!(Value::Int32(5), Value::from("5"));
        assert_eq!(Value::Int32(5), Value::Double(5.0));
        assert_eq!(Value::Bool(true), Value::UInt8(1));
        assert_ne!(Value::Int32(0), Value::Empty);
        assert_eq!(Value::Empty, Value::Empty);

        let shared = ObjectRef::new(PropertyObject::new());
        assert_eq!(Value::from(&shared), Value::from(&shared));
        assert_ne!(
            Value::from(&shared),
            Value::from(ObjectRef::new(PropertyObject::new()))
        );

        let func = FunctionRef::from_fn(|_| Ok(Value::Empty));
        assert_ne!(Value::from(&func), Value::from(&shared));
    }

    #[test]
    fn test_failed_coerce_type_is_noop() {
        let mut v = Value::Int32(5);
        let err = v.coerce_type(ValueKind::Object).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(v.kind(), ValueKind::Int32);
        assert_eq!(v.get_int32().unwrap(), 5);

        let mut v = Value::Int32(1000);
        let config = CoercionConfig::with_narrowing(Narrowing::Reject);
        assert!(v.coerce_type_with(ValueKind::UInt8, &config).is_err());
        assert_eq!(v.kind(), ValueKind::Int32);
    }

    #[test]
    fn test_coerce_type_in_place() {
        let mut v = Value::from("3.5");
        v.coerce_type(ValueKind::Double).unwrap();
        assert_eq!(v.kind(), ValueKind::Double);
        v.coerce_type(ValueKind::Int32).unwrap();
        assert_eq!(v.kind(), ValueKind::Int32);
        assert_eq!(v.get_int32().unwrap(), 3);
        v.coerce_type(ValueKind::String).unwrap();
        assert_eq!(v.get_string().unwrap(), "3");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Empty.to_string(), "");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::from("x").to_string(), "x");
        let obj = Value::from(ObjectRef::new(PropertyObject::new()));
        assert_eq!(obj.to_string(), "[object property_object]");
    }
}
