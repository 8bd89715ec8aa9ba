use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Element type tag carried by a [`VectorValue`] payload.
///
/// The numeric wire tags are stable within the Transmix encoding and have no
/// meaning outside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    /// 32-bit IEEE float, tag 0.
    Float,
    /// Signed 32-bit integer, tag 1.
    Int,
    /// Unsigned 32-bit integer, tag 2.
    UInt,
    /// Signed 16-bit integer, tag 3.
    Short,
    /// Unsigned 16-bit integer, tag 4.
    UShort,
    /// Signed 8-bit integer, tag 5.
    Char,
    /// Unsigned 8-bit integer, tag 6.
    UChar,
}

impl ScalarType {
    fn tag(self) -> u8 {
        match self {
            ScalarType::Float => 0,
            ScalarType::Int => 1,
            ScalarType::UInt => 2,
            ScalarType::Short => 3,
            ScalarType::UShort => 4,
            ScalarType::Char => 5,
            ScalarType::UChar => 6,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ScalarType::Float),
            1 => Some(ScalarType::Int),
            2 => Some(ScalarType::UInt),
            3 => Some(ScalarType::Short),
            4 => Some(ScalarType::UShort),
            5 => Some(ScalarType::Char),
            6 => Some(ScalarType::UChar),
            _ => None,
        }
    }

    /// Bytes occupied by one element of this type.
    pub fn element_len(self) -> usize {
        match self {
            ScalarType::Float | ScalarType::Int | ScalarType::UInt => 4,
            ScalarType::Short | ScalarType::UShort => 2,
            ScalarType::Char | ScalarType::UChar => 1,
        }
    }
}

/// Numeric vector parameter: a raw little-endian byte payload plus its
/// element type.
///
/// Serialized as `{ "data": <base64>, "type": <tag> }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorValue {
    scalar_type: ScalarType,
    bytes: Vec<u8>,
}

impl VectorValue {
    /// Build a float vector from `values` (little-endian payload).
    pub fn from_f32s(values: &[f32]) -> Self {
        let mut bytes = Vec::with_capacity(values.len() * 4);
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        Self {
            scalar_type: ScalarType::Float,
            bytes,
        }
    }

    /// Build a signed-int vector from `values` (little-endian payload).
    pub fn from_i32s(values: &[i32]) -> Self {
        let mut bytes = Vec::with_capacity(values.len() * 4);
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        Self {
            scalar_type: ScalarType::Int,
            bytes,
        }
    }

    /// Element type of the payload.
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Raw payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the payload as `f32` elements; `None` unless the payload is a
    /// whole number of float elements.
    pub fn as_f32s(&self) -> Option<Vec<f32>> {
        if self.scalar_type != ScalarType::Float || !self.bytes.len().is_multiple_of(4) {
            return None;
        }
        Some(
            self.bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    /// Decode the payload as `i32` elements; `None` unless the payload is a
    /// whole number of int elements.
    pub fn as_i32s(&self) -> Option<Vec<i32>> {
        if self.scalar_type != ScalarType::Int || !self.bytes.len().is_multiple_of(4) {
            return None;
        }
        Some(
            self.bytes
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }
}

#[derive(Serialize, Deserialize)]
struct VectorWire {
    data: String,
    #[serde(rename = "type")]
    scalar_type: u8,
}

impl Serialize for VectorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VectorWire {
            data: BASE64.encode(&self.bytes),
            scalar_type: self.scalar_type.tag(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VectorValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = VectorWire::deserialize(deserializer)?;
        let bytes = BASE64
            .decode(&wire.data)
            .map_err(|e| serde::de::Error::custom(format!("invalid base64 vector payload: {e}")))?;
        let scalar_type = ScalarType::from_tag(wire.scalar_type)
            .ok_or_else(|| serde::de::Error::custom("unknown vector scalar type tag"))?;
        Ok(Self { scalar_type, bytes })
    }
}

/// Recursive value used to encode transition parameters.
///
/// Closed union: integers, floats, byte-payload vectors, strings, ordered
/// lists, and string-keyed maps of itself. Decoding the encoding of any
/// value reproduces an equal value.
///
/// Deserialization is an untagged cascade in declaration order, so `3`
/// decodes as [`Value::Int`] and `3.5` as [`Value::Float`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Numeric vector payload.
    Vector(VectorValue),
    /// Text.
    Str(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// String-keyed map of values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Numeric view: `Int` widened to `f64`, `Float` as-is, else `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String view, `None` for non-string variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Vector view, `None` for non-vector variants.
    pub fn as_vector(&self) -> Option<&VectorValue> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<VectorValue> for Value {
    fn from(v: VectorValue) -> Self {
        Value::Vector(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/value.rs"]
mod tests;
