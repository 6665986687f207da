use std::collections::HashMap;

/// Ordered set of column names promoted to metric labels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelSchema(Vec<String>);

impl LabelSchema {
    /// Build a schema from column names.
    ///
    /// Duplicates collapse onto the position of their first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Self(out)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Label name to value mapping for one row. Keys are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelAssignment(Vec<(String, String)>);

impl LabelAssignment {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Set `name` to `value`, replacing an earlier value for the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label values in insertion order.
    pub fn values(&self) -> Vec<&str> {
        self.0.iter().map(|(_, v)| v.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> HashMap<&str, &str> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_dedups_keeping_first_position() {
        let schema = LabelSchema::new(["id", "region", "id", "zone"]);
        assert_eq!(schema.names(), &["id", "region", "zone"]);
        assert!(schema.contains("zone"));
        assert!(!schema.contains("value"));
    }

    #[test]
    fn assignment_insert_replaces_in_place() {
        let mut labels = LabelAssignment::default();
        labels.insert("id", "a");
        labels.insert("region", "us");
        labels.insert("id", "b");

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("id"), Some("b"));
        assert_eq!(labels.values(), vec!["b", "us"]);
    }
}
