//! codec: explicit encode/decode contract for static values.
//!
//! All multi-byte values are stored little-endian (byteorder). `bool` takes one
//! byte: 0 = false, anything else decodes as true.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

/// Kind tag carried by a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
    /// Opaque bytes; the entry size alone describes it.
    Bytes,
}

impl ValueKind {
    /// Encoded size of one element; None for `Bytes`.
    pub fn size(self) -> Option<usize> {
        match self {
            ValueKind::I8 | ValueKind::U8 | ValueKind::Bool => Some(1),
            ValueKind::I16 | ValueKind::U16 => Some(2),
            ValueKind::I32 | ValueKind::U32 | ValueKind::F32 => Some(4),
            ValueKind::I64 | ValueKind::U64 | ValueKind::F64 => Some(8),
            ValueKind::Bytes => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::I8 => "i8",
            ValueKind::U8 => "u8",
            ValueKind::I16 => "i16",
            ValueKind::U16 => "u16",
            ValueKind::I32 => "i32",
            ValueKind::U32 => "u32",
            ValueKind::I64 => "i64",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Bool => "bool",
            ValueKind::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let k = match s.trim().to_ascii_lowercase().as_str() {
            "i8" => ValueKind::I8,
            "u8" => ValueKind::U8,
            "i16" => ValueKind::I16,
            "u16" => ValueKind::U16,
            "i32" | "int" => ValueKind::I32,
            "u32" => ValueKind::U32,
            "i64" => ValueKind::I64,
            "u64" => ValueKind::U64,
            "f32" | "float" => ValueKind::F32,
            "f64" | "double" => ValueKind::F64,
            "bool" => ValueKind::Bool,
            "bytes" => ValueKind::Bytes,
            other => return Err(anyhow!("unknown value kind '{}'", other)),
        };
        Ok(k)
    }
}

/// A fixed-size value that can live in a static slot.
///
/// `encode` writes exactly `SIZE` bytes into `out[..SIZE]`; `decode` reads
/// exactly `SIZE` bytes from `buf[..SIZE]`. Callers guarantee the lengths.
pub trait StaticValue: Copy {
    const KIND: ValueKind;
    const SIZE: usize;

    fn encode(&self, out: &mut [u8]);
    fn decode(buf: &[u8]) -> Self;
}

macro_rules! le_static_value {
    ($ty:ty, $kind:expr, $size:expr, $write:ident, $read:ident) => {
        impl StaticValue for $ty {
            const KIND: ValueKind = $kind;
            const SIZE: usize = $size;

            #[inline]
            fn encode(&self, out: &mut [u8]) {
                LittleEndian::$write(&mut out[..$size], *self);
            }

            #[inline]
            fn decode(buf: &[u8]) -> Self {
                LittleEndian::$read(&buf[..$size])
            }
        }
    };
}

le_static_value!(i16, ValueKind::I16, 2, write_i16, read_i16);
le_static_value!(u16, ValueKind::U16, 2, write_u16, read_u16);
le_static_value!(i32, ValueKind::I32, 4, write_i32, read_i32);
le_static_value!(u32, ValueKind::U32, 4, write_u32, read_u32);
le_static_value!(i64, ValueKind::I64, 8, write_i64, read_i64);
le_static_value!(u64, ValueKind::U64, 8, write_u64, read_u64);
le_static_value!(f32, ValueKind::F32, 4, write_f32, read_f32);
le_static_value!(f64, ValueKind::F64, 8, write_f64, read_f64);

impl StaticValue for u8 {
    const KIND: ValueKind = ValueKind::U8;
    const SIZE: usize = 1;

    #[inline]
    fn encode(&self, out: &mut [u8]) {
        out[0] = *self;
    }

    #[inline]
    fn decode(buf: &[u8]) -> Self {
        buf[0]
    }
}

impl StaticValue for i8 {
    const KIND: ValueKind = ValueKind::I8;
    const SIZE: usize = 1;

    #[inline]
    fn encode(&self, out: &mut [u8]) {
        out[0] = *self as u8;
    }

    #[inline]
    fn decode(buf: &[u8]) -> Self {
        buf[0] as i8
    }
}

impl StaticValue for bool {
    const KIND: ValueKind = ValueKind::Bool;
    const SIZE: usize = 1;

    #[inline]
    fn encode(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    #[inline]
    fn decode(buf: &[u8]) -> Self {
        buf[0] != 0
    }
}

/// Runtime-tagged scalar (CLI, layout-driven access).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl ScalarValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ScalarValue::I8(_) => ValueKind::I8,
            ScalarValue::U8(_) => ValueKind::U8,
            ScalarValue::I16(_) => ValueKind::I16,
            ScalarValue::U16(_) => ValueKind::U16,
            ScalarValue::I32(_) => ValueKind::I32,
            ScalarValue::U32(_) => ValueKind::U32,
            ScalarValue::I64(_) => ValueKind::I64,
            ScalarValue::U64(_) => ValueKind::U64,
            ScalarValue::F32(_) => ValueKind::F32,
            ScalarValue::F64(_) => ValueKind::F64,
            ScalarValue::Bool(_) => ValueKind::Bool,
        }
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.kind().size().unwrap_or(0)
    }

    pub fn encode(&self, out: &mut [u8]) {
        match self {
            ScalarValue::I8(v) => v.encode(out),
            ScalarValue::U8(v) => v.encode(out),
            ScalarValue::I16(v) => v.encode(out),
            ScalarValue::U16(v) => v.encode(out),
            ScalarValue::I32(v) => v.encode(out),
            ScalarValue::U32(v) => v.encode(out),
            ScalarValue::I64(v) => v.encode(out),
            ScalarValue::U64(v) => v.encode(out),
            ScalarValue::F32(v) => v.encode(out),
            ScalarValue::F64(v) => v.encode(out),
            ScalarValue::Bool(v) => v.encode(out),
        }
    }

    /// Decode a scalar of `kind` from `buf`. None for `Bytes` or a short buffer.
    pub fn decode(kind: ValueKind, buf: &[u8]) -> Option<Self> {
        let need = kind.size()?;
        if buf.len() < need {
            return None;
        }
        let v = match kind {
            ValueKind::I8 => ScalarValue::I8(i8::decode(buf)),
            ValueKind::U8 => ScalarValue::U8(u8::decode(buf)),
            ValueKind::I16 => ScalarValue::I16(i16::decode(buf)),
            ValueKind::U16 => ScalarValue::U16(u16::decode(buf)),
            ValueKind::I32 => ScalarValue::I32(i32::decode(buf)),
            ValueKind::U32 => ScalarValue::U32(u32::decode(buf)),
            ValueKind::I64 => ScalarValue::I64(i64::decode(buf)),
            ValueKind::U64 => ScalarValue::U64(u64::decode(buf)),
            ValueKind::F32 => ScalarValue::F32(f32::decode(buf)),
            ValueKind::F64 => ScalarValue::F64(f64::decode(buf)),
            ValueKind::Bool => ScalarValue::Bool(bool::decode(buf)),
            ValueKind::Bytes => return None,
        };
        Some(v)
    }

    /// Parse a textual value according to `kind` (CLI input).
    pub fn parse(kind: ValueKind, s: &str) -> Result<Self> {
        let s = s.trim();
        let bad = |e: String| anyhow!("invalid {} value '{}': {}", kind, s, e);
        let v = match kind {
            ValueKind::I8 => ScalarValue::I8(s.parse::<i8>().map_err(|e| bad(e.to_string()))?),
            ValueKind::U8 => ScalarValue::U8(s.parse::<u8>().map_err(|e| bad(e.to_string()))?),
            ValueKind::I16 => ScalarValue::I16(s.parse::<i16>().map_err(|e| bad(e.to_string()))?),
            ValueKind::U16 => ScalarValue::U16(s.parse::<u16>().map_err(|e| bad(e.to_string()))?),
            ValueKind::I32 => ScalarValue::I32(s.parse::<i32>().map_err(|e| bad(e.to_string()))?),
            ValueKind::U32 => ScalarValue::U32(s.parse::<u32>().map_err(|e| bad(e.to_string()))?),
            ValueKind::I64 => ScalarValue::I64(s.parse::<i64>().map_err(|e| bad(e.to_string()))?),
            ValueKind::U64 => ScalarValue::U64(s.parse::<u64>().map_err(|e| bad(e.to_string()))?),
            ValueKind::F32 => ScalarValue::F32(s.parse::<f32>().map_err(|e| bad(e.to_string()))?),
            ValueKind::F64 => ScalarValue::F64(s.parse::<f64>().map_err(|e| bad(e.to_string()))?),
            ValueKind::Bool => {
                let b = match s.to_ascii_lowercase().as_str() {
                    "1" | "true" | "on" | "yes" => true,
                    "0" | "false" | "off" | "no" => false,
                    _ => return Err(anyhow!("invalid bool value '{}'", s)),
                };
                ScalarValue::Bool(b)
            }
            ValueKind::Bytes => return Err(anyhow!("bytes entries take hex input, not a scalar")),
        };
        Ok(v)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::I8(v) => write!(f, "{}", v),
            ScalarValue::U8(v) => write!(f, "{}", v),
            ScalarValue::I16(v) => write!(f, "{}", v),
            ScalarValue::U16(v) => write!(f, "{}", v),
            ScalarValue::I32(v) => write!(f, "{}", v),
            ScalarValue::U32(v) => write!(f, "{}", v),
            ScalarValue::I64(v) => write!(f, "{}", v),
            ScalarValue::U64(v) => write!(f, "{}", v),
            ScalarValue::F32(v) => write!(f, "{}", v),
            ScalarValue::F64(v) => write!(f, "{}", v),
            ScalarValue::Bool(v) => write!(f, "{}", v),
        }
    }
}
