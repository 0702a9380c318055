//! Dynamic values carried in frame slots.

use packetgen_schema::ScalarType;

/// A value for one element of a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// `int8`
    Int8(i8),
    /// `uint8`
    Uint8(u8),
    /// `int16`
    Int16(i16),
    /// `uint16`
    Uint16(u16),
    /// `int32`
    Int32(i32),
    /// `uint32`
    Uint32(u32),
    /// `int64`
    Int64(i64),
    /// `uint64`
    Uint64(u64),
    /// `float`
    Float(f32),
    /// `bool`
    Bool(bool),
    /// `char`
    Char(u8),
    /// `string`, raw bytes. Decoded strings always hold the full capacity.
    String(Vec<u8>),
    /// Fixed-size array of a non-string type.
    Array(Vec<WireValue>),
}

impl WireValue {
    /// The scalar type of this value; `None` for arrays.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        Some(match self {
            WireValue::Int8(_) => ScalarType::Int8,
            WireValue::Uint8(_) => ScalarType::Uint8,
            WireValue::Int16(_) => ScalarType::Int16,
            WireValue::Uint16(_) => ScalarType::Uint16,
            WireValue::Int32(_) => ScalarType::Int32,
            WireValue::Uint32(_) => ScalarType::Uint32,
            WireValue::Int64(_) => ScalarType::Int64,
            WireValue::Uint64(_) => ScalarType::Uint64,
            WireValue::Float(_) => ScalarType::Float,
            WireValue::Bool(_) => ScalarType::Bool,
            WireValue::Char(_) => ScalarType::Char,
            WireValue::String(_) => ScalarType::String,
            WireValue::Array(_) => return None,
        })
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            WireValue::Array(items) => format!("array of {}", items.len()),
            other => other
                .scalar_type()
                .map(|t| t.to_string())
                .unwrap_or_default(),
        }
    }

    /// Integer value widened to i64, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            WireValue::Int8(v) => Some(v.into()),
            WireValue::Uint8(v) => Some(v.into()),
            WireValue::Int16(v) => Some(v.into()),
            WireValue::Uint16(v) => Some(v.into()),
            WireValue::Int32(v) => Some(v.into()),
            WireValue::Uint32(v) => Some(v.into()),
            WireValue::Int64(v) => Some(v),
            WireValue::Uint64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Float value.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            WireValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            WireValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Array items.
    pub fn as_array(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Raw string bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            WireValue::String(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// String text up to the first NUL byte, lossily decoded.
    ///
    /// A full-capacity string carries no terminator; all of it is returned.
    pub fn as_text(&self) -> Option<String> {
        self.as_bytes().map(|bytes| {
            let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
            String::from_utf8_lossy(&bytes[..end]).into_owned()
        })
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for WireValue {
                fn from(v: $ty) -> Self {
                    WireValue::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32,
    i64 => Int64,
    u64 => Uint64,
    f32 => Float,
    bool => Bool,
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        WireValue::String(s.as_bytes().to_vec())
    }
}

impl<T: Into<WireValue>> From<Vec<T>> for WireValue {
    fn from(items: Vec<T>) -> Self {
        WireValue::Array(items.into_iter().map(Into::into).collect())
    }
}
