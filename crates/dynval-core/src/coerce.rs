//! The coercion matrix
//!
//! A pure function from (stored value, target kind) to a new value of the
//! target kind. Typed getters and in-place coercion both go through here;
//! nothing reads a payload by reinterpreting another variant's storage.
//!
//! | source \ target | numeric | string | object/function | void_ptr | empty |
//! |-----------------|---------|--------|-----------------|----------|-------|
//! | numeric         | cast    | render | mismatch        | mismatch | mismatch |
//! | string          | parse   | copy   | mismatch        | mismatch | mismatch |
//! | object/function | mismatch| mismatch | identity only | mismatch | mismatch |
//! | void_ptr        | mismatch| mismatch | mismatch      | identity | mismatch |
//! | empty           | empty   | empty  | empty           | empty    | identity |

use crate::{CoercionConfig, Error, Narrowing, Result, Value, ValueKind};

/// Coerce `value` to `target` using the default configuration
pub fn coerce(value: &Value, target: ValueKind) -> Result<Value> {
    CoercionConfig::default().coerce(value, target)
}

impl CoercionConfig {
    /// Coerce `value` to `target` using this configuration
    pub fn coerce(&self, value: &Value, target: ValueKind) -> Result<Value> {
        let source = value.kind();
        if source == target {
            return Ok(value.clone());
        }

        let result = match value {
            Value::Empty => Err(Error::EmptyValue { to: target }),
            Value::String(s) => self.parse(s, target),
            _ => match Number::of(value) {
                Some(_) if target == ValueKind::String => Ok(Value::String(value.to_string())),
                Some(n) => self.cast_number(n, source, target),
                None => Err(Error::TypeMismatch {
                    from: source,
                    to: target,
                }),
            },
        };

        if let Err(err) = &result {
            log::trace!("coercion {} -> {} failed: {}", source, target, err);
        }
        result
    }

    fn cast_number(&self, n: Number, source: ValueKind, target: ValueKind) -> Result<Value> {
        match target {
            ValueKind::Bool => Ok(Value::Bool(n.is_nonzero())),
            ValueKind::Int8 => self.narrow::<i8>(n).map(Value::Int8),
            ValueKind::UInt8 => self.narrow::<u8>(n).map(Value::UInt8),
            ValueKind::Int32 => self.narrow::<i32>(n).map(Value::Int32),
            ValueKind::UInt32 => self.narrow::<u32>(n).map(Value::UInt32),
            ValueKind::Float => self.narrow_f32(n).map(Value::Float),
            ValueKind::Double => Ok(Value::Double(n.as_f64())),
            _ => Err(Error::TypeMismatch {
                from: source,
                to: target,
            }),
        }
    }

    fn narrow<T: Narrow>(&self, n: Number) -> Result<T> {
        match (self.narrowing, n) {
            (Narrowing::Wrap, Number::Int(i)) => Ok(T::wrapping(i)),
            (Narrowing::Wrap, Number::Float(f)) => Ok(T::wrapping(wrap_f64(f))),
            (Narrowing::Saturate, Number::Int(i)) => Ok(T::saturating(i)),
            (Narrowing::Saturate, Number::Float(f)) => Ok(T::saturating_f64(f)),
            (Narrowing::Reject, Number::Int(i)) => T::checked(i).ok_or_else(|| n.out_of_range(T::KIND)),
            (Narrowing::Reject, Number::Float(f)) => {
                let t = f.trunc();
                if f.is_finite() && t >= T::MIN_F64 && t <= T::MAX_F64 {
                    Ok(T::saturating_f64(t))
                } else {
                    Err(n.out_of_range(T::KIND))
                }
            }
        }
    }

    fn narrow_f32(&self, n: Number) -> Result<f32> {
        let f = match n {
            Number::Int(i) => return Ok(i as f32),
            Number::Float(f) => f,
        };
        let max = f32::MAX as f64;
        if !f.is_finite() || f.abs() <= max {
            return Ok(f as f32);
        }
        match self.narrowing {
            Narrowing::Wrap => Ok(f as f32),
            Narrowing::Saturate => Ok(f.clamp(-max, max) as f32),
            Narrowing::Reject => Err(n.out_of_range(ValueKind::Float)),
        }
    }

    fn parse(&self, s: &str, target: ValueKind) -> Result<Value> {
        let input = if self.trim_strings { s.trim() } else { s };
        let parse_failure = || Error::ParseFailure {
            input: s.to_string(),
            to: target,
        };

        match target {
            ValueKind::Bool => input.parse().map(Value::Bool).map_err(|_| parse_failure()),
            ValueKind::Int8 => input.parse().map(Value::Int8).map_err(|_| parse_failure()),
            ValueKind::UInt8 => input.parse().map(Value::UInt8).map_err(|_| parse_failure()),
            ValueKind::Int32 => input.parse().map(Value::Int32).map_err(|_| parse_failure()),
            ValueKind::UInt32 => input.parse().map(Value::UInt32).map_err(|_| parse_failure()),
            ValueKind::Float => input.parse().map(Value::Float).map_err(|_| parse_failure()),
            ValueKind::Double => input.parse().map(Value::Double).map_err(|_| parse_failure()),
            _ => Err(Error::TypeMismatch {
                from: ValueKind::String,
                to: target,
            }),
        }
    }
}

/// Truncate toward zero and keep the low 64 bits of the integer part
///
/// NaN and both infinities map to 0. Finite values of magnitude 2^127 or
/// more are multiples of 2^64, so their low bits are also 0.
fn wrap_f64(f: f64) -> i64 {
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0; // 2^127
    let t = f.trunc();
    if !t.is_finite() || t.abs() >= LIMIT {
        return 0;
    }
    (t as i128) as i64
}

/// Widened view of a numeric payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Widen a numeric value; `None` for every non-numeric kind
    pub(crate) fn of(value: &Value) -> Option<Number> {
        match *value {
            Value::Bool(b) => Some(Number::Int(b as i64)),
            Value::Int8(v) => Some(Number::Int(v as i64)),
            Value::UInt8(v) => Some(Number::Int(v as i64)),
            Value::Int32(v) => Some(Number::Int(v as i64)),
            Value::UInt32(v) => Some(Number::Int(v as i64)),
            Value::Float(v) => Some(Number::Float(v as f64)),
            Value::Double(v) => Some(Number::Float(v)),
            _ => None,
        }
    }

    fn is_nonzero(&self) -> bool {
        match *self {
            Number::Int(i) => i != 0,
            Number::Float(f) => f != 0.0,
        }
    }

    pub(crate) fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Compare by value across numeric kinds
    pub(crate) fn same_value(&self, other: &Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }

    fn out_of_range(&self, to: ValueKind) -> Error {
        let value = match self {
            Number::Int(i) => i.to_string(),
            Number::Float(f) => f.to_string(),
        };
        Error::OutOfRange { value, to }
    }
}

/// Integer targets of numeric narrowing
trait Narrow: Sized {
    const KIND: ValueKind;
    const MIN_F64: f64;
    const MAX_F64: f64;

    fn wrapping(i: i64) -> Self;
    fn saturating(i: i64) -> Self;
    fn saturating_f64(f: f64) -> Self;
    fn checked(i: i64) -> Option<Self>;
}

macro_rules! impl_narrow {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Narrow for $ty {
                const KIND: ValueKind = ValueKind::$kind;
                const MIN_F64: f64 = <$ty>::MIN as f64;
                const MAX_F64: f64 = <$ty>::MAX as f64;

                fn wrapping(i: i64) -> Self {
                    i as $ty
                }

                fn saturating(i: i64) -> Self {
                    i.clamp(<$ty>::MIN as i64, <$ty>::MAX as i64) as $ty
                }

                fn saturating_f64(f: f64) -> Self {
                    f as $ty
                }

                fn checked(i: i64) -> Option<Self> {
                    <$ty>::try_from(i).ok()
                }
            }
        )*
    };
}

impl_narrow!(i8 => Int8, u8 => UInt8, i32 => Int32, u32 => UInt32);
