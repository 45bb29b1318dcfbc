//! JSON helpers
//!
//! Response bodies use `": "` and `", "` separators on a single line, e.g.
//! `{"message": "Hello, JSON!", "status": "success"}`. Request bodies are
//! read as flat objects whose string fields are looked up by key.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::fmt;
use std::io;

/// Compact formatter with a space after every `:` and `,`
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize `value` with [`SpacedFormatter`]
pub fn to_spaced_vec<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

/// A request body decoded as a single-level JSON object.
///
/// When a key repeats, its first string value is kept; a non-string value
/// only stands until a string shows up for the same key.
#[derive(Debug, Clone, Default)]
pub struct FlatObject {
    fields: Map<String, Value>,
}

impl FlatObject {
    /// Decode `body`; anything other than a JSON object yields `None`
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// Non-empty string value of `key`.
    ///
    /// Numbers, booleans, null, nested values and `""` count as absent.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<'de> Deserialize<'de> for FlatObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FirstWinsVisitor)
    }
}

struct FirstWinsVisitor;

impl<'de> Visitor<'de> for FirstWinsVisitor {
    type Value = FlatObject;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut fields = Map::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            if !matches!(fields.get(&key), Some(Value::String(_))) {
                fields.insert(key, value);
            }
        }
        Ok(FlatObject { fields })
    }
}
