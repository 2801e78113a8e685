use crate::core::value::{FieldValue, Value};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use std::fmt;

/// One row of a dataset: field names mapped to values, in the order
/// the API emitted them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub field_values: Vec<FieldValue>,
}

impl Record {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        Record { field_values }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values.iter().find(|f| f.name == field)
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    /// Coerces `field` to text and strips surrounding whitespace.
    /// Nulls and absent fields are left alone.
    ///
    /// Numbers use their shortest Rust rendering: `Float(1.0)` becomes
    /// `"1"`, not `"1.0"`. Trim fields hold agent codes, which arrive as text.
    pub fn trim_text(&mut self, field: &str) {
        if let Some(fv) = self.field_values.iter_mut().find(|f| f.name == field)
            && let Some(text) = fv.value.as_string()
        {
            fv.value = Value::String(text.trim().to_string());
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.field_values.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.field_values
            .iter()
            .map(|f| f.name.len() + f.value.size_bytes())
            .sum()
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Record {
    fn from(fields: [(&str, Value); N]) -> Self {
        Record::new(
            fields
                .into_iter()
                .map(|(name, value)| FieldValue::new(name, value))
                .collect(),
        )
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.field_values.len()))?;
        for fv in &self.field_values {
            match &fv.value {
                Value::Int(v) => map.serialize_entry(&fv.name, v)?,
                Value::Float(v) => map.serialize_entry(&fv.name, v)?,
                Value::String(v) => map.serialize_entry(&fv.name, v)?,
                Value::Boolean(v) => map.serialize_entry(&fv.name, v)?,
                Value::Json(v) => map.serialize_entry(&fv.name, v)?,
                Value::Null => map.serialize_entry(&fv.name, &Option::<()>::None)?,
            }
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut field_values = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, raw)) = access.next_entry::<String, serde_json::Value>()? {
            field_values.push(FieldValue {
                name,
                value: Value::from(raw),
            });
        }
        Ok(Record { field_values })
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}
