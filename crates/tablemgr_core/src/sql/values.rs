use rusqlite::types::Value;
use std::collections::BTreeMap;

/// Column-to-value assignments for INSERT rows and UPDATE sets.
///
/// Iteration order is the column name order, which keeps rendered SQL stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values(BTreeMap<String, Value>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style assignment.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(column.into(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Merges `other` into `self`; on collision `other` wins.
    pub fn merge(mut self, other: &Values) -> Self {
        for (column, value) in &other.0 {
            self.0.insert(column.clone(), value.clone());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(column, value)| (column.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Values;
    use rusqlite::types::Value;

    #[test]
    fn merge_is_last_write_wins() {
        let first = Values::new()
            .set("name", "a".to_string())
            .set("is_free", false);
        let second = Values::new().set("name", "b".to_string());

        let merged = first.merge(&second);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("name"), Some(&Value::Text("b".to_string())));
        assert_eq!(merged.get("is_free"), Some(&Value::Integer(0)));
    }

    #[test]
    fn columns_iterate_in_name_order() {
        let values = Values::new().set("b", 2_i64).set("a", 1_i64);
        assert_eq!(values.columns().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
