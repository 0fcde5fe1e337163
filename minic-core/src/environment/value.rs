use std::fmt::Display;

pub const TRUE: Value = Value::Integer { value: 1 };
pub const FALSE: Value = Value::Integer { value: 0 };

/// Runtime value. `Void` is what `print` yields; it can never be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer {
        value: i32
    },
    String {
        value: String,
    },
    Void,
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer { value } => write!(f, "{value}"),
            Value::String { value } => write!(f, "{value}"),
            Value::Void => write!(f, "void")
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        if value { TRUE } else { FALSE }
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Integer { .. } => ValueType::Integer,
            Self::String { .. } => ValueType::String,
            Self::Void => ValueType::Void
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    String,
    Void
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            ValueType::Integer => "int",
            ValueType::String => "string",
            ValueType::Void => "void"
        })
    }
}
