//! Selection context snapshots
//!
//! A context maps every hierarchy key, in hierarchy order, to its selected
//! value or `None`. It is always a copy; later state changes never show
//! through an already-issued request.

use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionContext {
    entries: Vec<(String, Option<String>)>,
}

impl SelectionContext {
    pub fn new(entries: Vec<(String, Option<String>)>) -> Self {
        Self { entries }
    }

    /// Context with every key unselected
    pub fn unselected<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            entries: keys.into_iter().map(|k| (k.to_string(), None)).collect(),
        }
    }

    /// Value for `key`; `None` when unselected or not present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Only the selected entries, in hierarchy order
    pub fn selected(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SelectionContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_skips_nulls() {
        let ctx = SelectionContext::new(vec![
            ("catalog".to_string(), Some("Electronics".to_string())),
            ("category".to_string(), None),
        ]);
        assert_eq!(ctx.get("catalog"), Some("Electronics"));
        assert_eq!(ctx.get("category"), None);
        assert!(ctx.contains_key("category"));
        assert!(!ctx.contains_key("brand"));
        assert_eq!(ctx.selected().collect::<Vec<_>>(), vec![("catalog", "Electronics")]);
    }

    #[test]
    fn test_serializes_as_ordered_map_with_nulls() {
        let ctx = SelectionContext::new(vec![
            ("catalog".to_string(), Some("Electronics".to_string())),
            ("category".to_string(), None),
        ]);
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, r#"{"catalog":"Electronics","category":null}"#);
    }
}
