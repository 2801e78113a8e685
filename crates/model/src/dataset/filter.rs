use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accepted value(s) for one filtered field.
///
/// Serializes untagged, so a filter map renders as the API expects:
/// `{"SigIndicador": ["DEC", "FEC"], "AnoIndice": "2025"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Number(i64),
    TextList(Vec<String>),
}

impl FilterValue {
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::TextList(values.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value)
    }
}

/// Equality/membership restriction applied to a dataset, field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    conditions: BTreeMap<String, FilterValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) {
        self.conditions.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.conditions.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Wire form sent as the `filters` query parameter.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.conditions)
    }

    /// Copy of this filter with `field` re-typed from text to number.
    ///
    /// Returns `None` when the field is absent, already numeric, or its
    /// text does not parse as an integer.
    pub fn retype_numeric(&self, field: &str) -> Option<Filter> {
        let FilterValue::Text(text) = self.conditions.get(field)? else {
            return None;
        };
        let number = text.trim().parse::<i64>().ok()?;
        Some(self.clone().with(field, FilterValue::Number(number)))
    }
}

impl<const N: usize> From<[(&str, FilterValue); N]> for Filter {
    fn from(conditions: [(&str, FilterValue); N]) -> Self {
        conditions
            .into_iter()
            .fold(Filter::new(), |filter, (field, value)| filter.with(field, value))
    }
}
