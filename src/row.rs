use indexmap::IndexMap;
use serde::Serialize;

/// One editable key/value pair. An empty key marks the trailing "add new" placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Row {
    pub key: String,
    pub value: String,
    pub is_saved: bool,
}

impl Row {
    pub fn new(key: impl Into<String>, value: impl Into<String>, is_saved: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_saved,
        }
    }

    pub fn saved(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value, true)
    }

    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.key.is_empty()
    }
}

/// Saved rows for every property in map order, followed by exactly one placeholder.
pub fn rows_from_properties(properties: &IndexMap<String, String>) -> Vec<Row> {
    let mut rows: Vec<Row> = properties
        .iter()
        .map(|(key, value)| Row::saved(key.clone(), value.clone()))
        .collect();
    rows.push(Row::placeholder());
    rows
}

/// Property map of the non-placeholder rows. A repeated key keeps its first
/// position and takes the value of its last occurrence.
pub fn properties_from_rows(rows: &[Row]) -> IndexMap<String, String> {
    let mut properties = IndexMap::new();
    for row in rows.iter().filter(|r| !r.is_placeholder()) {
        properties.insert(row.key.clone(), row.value.clone());
    }
    properties
}
