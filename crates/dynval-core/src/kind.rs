//! Kind tags for dynamic values

use std::fmt;
use std::str::FromStr;

/// Runtime discriminator naming which variant of a [`Value`](crate::Value) is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueKind {
    /// No value
    #[default]
    Empty,
    Bool,
    Int8,
    UInt8,
    Int32,
    UInt32,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    String,
    /// Shared handle to an object capability
    Object,
    /// Shared handle to a function capability
    Function,
    /// Non-owning raw address
    VoidPtr,
}

impl ValueKind {
    /// All kinds, in tag order
    pub const ALL: [ValueKind; 12] = [
        ValueKind::Empty,
        ValueKind::Bool,
        ValueKind::Int8,
        ValueKind::UInt8,
        ValueKind::Int32,
        ValueKind::UInt32,
        ValueKind::Float,
        ValueKind::Double,
        ValueKind::String,
        ValueKind::Object,
        ValueKind::Function,
        ValueKind::VoidPtr,
    ];

    /// Get the lowercase name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Empty => "empty",
            ValueKind::Bool => "bool",
            ValueKind::Int8 => "int8",
            ValueKind::UInt8 => "uint8",
            ValueKind::Int32 => "int32",
            ValueKind::UInt32 => "uint32",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Object => "object",
            ValueKind::Function => "function",
            ValueKind::VoidPtr => "void_ptr",
        }
    }

    /// Check if this kind takes part in numeric coercion (bool included)
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueKind::Bool
                | ValueKind::Int8
                | ValueKind::UInt8
                | ValueKind::Int32
                | ValueKind::UInt32
                | ValueKind::Float
                | ValueKind::Double
        )
    }

    /// Check if this kind is a numeric kind without a fractional part
    pub fn is_integer(&self) -> bool {
        self.is_numeric() && !self.is_floating()
    }

    /// Check if this kind is `Float` or `Double`
    pub fn is_floating(&self) -> bool {
        matches!(self, ValueKind::Float | ValueKind::Double)
    }

    /// Check if this kind carries a shared capability handle
    pub fn is_handle(&self) -> bool {
        matches!(self, ValueKind::Object | ValueKind::Function)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a kind name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ValueKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
