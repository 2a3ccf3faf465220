//! JSON encoding of property values.

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::{self, Error as _};

/// Serializes `value` for storage under `key`.
///
/// JSON has no representation for NaN or infinities; `serde_json` would write
/// them as `null`, which no longer decodes into the float type. Such values
/// are rejected instead, so the write is dropped.
pub(crate) fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Vec<u8>> {
    value
        .serialize(FiniteFloats)
        .map_err(|source| Error::encode(key, source))?;
    serde_json::to_vec(value).map_err(|source| Error::encode(key, source))
}

/// Deserializes bytes stored under `key`.
pub(crate) fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|source| Error::decode(key, source))
}

/// Validation-only serializer: walks a value and fails on non-finite floats.
/// Produces no output; everything else is left for `serde_json` to judge.
struct FiniteFloats;

type Check = std::result::Result<(), serde_json::Error>;

fn check_float(value: f64) -> Check {
    if value.is_finite() {
        Ok(())
    } else {
        Err(serde_json::Error::custom(format!(
            "{value} cannot be represented in JSON"
        )))
    }
}

macro_rules! accept {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Check {
                Ok(())
            }
        )*
    };
}

impl ser::Serializer for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_f32(self, v: f32) -> Check {
        check_float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Check {
        check_float(v)
    }

    fn serialize_none(self) -> Check {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Check {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Check {
        Ok(())
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Check {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Check {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Check {
        key.serialize(FiniteFloats)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}
