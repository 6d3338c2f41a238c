//! Typed values carried by signal channels.

use std::fmt;

// ── SignalKind ────────────────────────────────────────────────────────────────

/// The payload type a channel is declared with.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SignalKind {
    Bool,
    Int,
    Double,
    Text,
    Doubles,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalKind::Bool    => "bool",
            SignalKind::Int     => "int",
            SignalKind::Double  => "double",
            SignalKind::Text    => "text",
            SignalKind::Doubles => "doubles",
        };
        f.write_str(s)
    }
}

// ── SignalValue ───────────────────────────────────────────────────────────────

/// One value written to a channel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SignalValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Doubles(Vec<f64>),
}

impl SignalValue {
    pub fn kind(&self) -> SignalKind {
        match self {
            SignalValue::Bool(_)    => SignalKind::Bool,
            SignalValue::Int(_)     => SignalKind::Int,
            SignalValue::Double(_)  => SignalKind::Double,
            SignalValue::Text(_)    => SignalKind::Text,
            SignalValue::Doubles(_) => SignalKind::Doubles,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            SignalValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            SignalValue::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self {
            SignalValue::Double(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SignalValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&[f64]> {
        match self {
            SignalValue::Doubles(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Bool(b)    => write!(f, "{b}"),
            SignalValue::Int(i)     => write!(f, "{i}"),
            SignalValue::Double(d)  => write!(f, "{d}"),
            SignalValue::Text(s)    => f.write_str(s),
            SignalValue::Doubles(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for SignalValue {
    fn from(b: bool) -> Self {
        SignalValue::Bool(b)
    }
}

impl From<i64> for SignalValue {
    fn from(i: i64) -> Self {
        SignalValue::Int(i)
    }
}

impl From<f64> for SignalValue {
    fn from(d: f64) -> Self {
        SignalValue::Double(d)
    }
}

// ── Port ──────────────────────────────────────────────────────────────────────

/// One declared input or output of a component: which channel, which kind.
///
/// Ports are addressed by position in the component's input or output list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Port {
    pub channel: String,
    pub kind:    SignalKind,
}

impl Port {
    pub fn new(channel: impl Into<String>, kind: SignalKind) -> Self {
        Self { channel: channel.into(), kind }
    }
}
