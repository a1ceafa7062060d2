//! Generic typed reads and writes

use crate::{Error, FunctionRef, ObjectRef, Result, Value, ValueKind};
use std::ffi::c_void;

/// A Rust type that a [`Value`] can be read as
///
/// Each implementation coerces to its [`KIND`](FromValue::KIND) and takes
/// the payload out of the result.
pub trait FromValue: Sized {
    /// Kind the value is coerced to before extraction
    const KIND: ValueKind;

    /// Read `value` as `Self`
    fn from_value(value: &Value) -> Result<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                fn from_value(value: &Value) -> Result<Self> {
                    match value.coerce_to(Self::KIND)? {
                        Value::$kind(v) => Ok(v),
                        other => Err(Error::TypeMismatch {
                            from: other.kind(),
                            to: Self::KIND,
                        }),
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i8 => Int8,
    u8 => UInt8,
    i32 => Int32,
    u32 => UInt32,
    f32 => Float,
    f64 => Double,
    String => String,
    ObjectRef => Object,
    FunctionRef => Function,
    *mut c_void => VoidPtr,
}

/// Reading a `Value` as a `Value` copies it without coercion
///
/// `KIND` is never used as a coercion target here; `Empty` is only a
/// placeholder, and every kind (not just `Empty`) reads successfully.
impl FromValue for Value {
    const KIND: ValueKind = ValueKind::Empty;

    fn from_value(value: &Value) -> Result<Self> {
        value.get_value()
    }
}

impl Value {
    /// Read this value as `T`
    ///
    /// ```
    /// use dynval_core::Value;
    ///
    /// let v = Value::from("42");
    /// assert_eq!(v.convert::<u8>().unwrap(), 42);
    /// assert!(v.convert::<bool>().is_err());
    /// ```
    pub fn convert<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }

    /// Read this value as `T`, or `T::default()` if it cannot be converted
    pub fn convert_or_default<T: FromValue + Default>(&self) -> T {
        self.convert().unwrap_or_default()
    }

    /// Replace this value with `v`, releasing the previous payload
    pub fn assign<T: Into<Value>>(&mut self, v: T) {
        *self = v.into();
    }
}
