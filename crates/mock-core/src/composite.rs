//! Keyed and ordered composites.
//!
//! Composites own their children exclusively. Generation and descriptor
//! rendering recurse into each child independently.

use crate::descriptor::Descriptor;
use crate::error::FieldError;
use crate::field::FieldSpec;
use crate::provider::Provider;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Named children; key order is kept for generated objects and descriptors.
#[derive(Debug, Clone, Default)]
pub struct KeyedComposite {
    fields: IndexMap<String, FieldSpec>,
}

impl KeyedComposite {
    pub fn new(fields: IndexMap<String, FieldSpec>) -> Self {
        Self { fields }
    }

    /// Insert or replace a child. A replaced child keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, field: FieldSpec) -> Option<FieldSpec> {
        self.fields.insert(name.into(), field)
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldSpec> {
        self.fields.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> IndexMap<String, FieldSpec> {
        self.fields
    }

    pub fn mock(&mut self, provider: &mut Provider) -> Result<Value, FieldError> {
        let mut obj = Map::with_capacity(self.fields.len());
        for (name, field) in self.fields.iter_mut() {
            obj.insert(name.clone(), field.mock(provider)?);
        }
        Ok(Value::Object(obj))
    }

    pub fn descriptor(&self) -> Descriptor {
        Descriptor::Keyed(
            self.fields
                .iter()
                .map(|(name, field)| (name.clone(), field.descriptor()))
                .collect(),
        )
    }
}

impl FromIterator<(String, FieldSpec)> for KeyedComposite {
    fn from_iter<I: IntoIterator<Item = (String, FieldSpec)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Positional children.
#[derive(Debug, Clone, Default)]
pub struct OrderedComposite {
    items: Vec<FieldSpec>,
}

impl OrderedComposite {
    pub fn new(items: Vec<FieldSpec>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, field: FieldSpec) {
        self.items.push(field);
    }

    pub fn get(&self, index: usize) -> Option<&FieldSpec> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.items.iter()
    }

    pub fn into_inner(self) -> Vec<FieldSpec> {
        self.items
    }

    pub fn mock(&mut self, provider: &mut Provider) -> Result<Value, FieldError> {
        self.items
            .iter_mut()
            .map(|field| field.mock(provider))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    pub fn descriptor(&self) -> Descriptor {
        Descriptor::Ordered(self.items.iter().map(FieldSpec::descriptor).collect())
    }
}

impl FromIterator<FieldSpec> for OrderedComposite {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Resolution;

    #[test]
    fn test_empty_composites() {
        let mut provider = Provider::seeded(42);

        let mut dict = KeyedComposite::default();
        let value = dict.mock(&mut provider).unwrap();
        assert_eq!(value, Value::Object(Map::new()));
        assert_eq!(dict.descriptor(), Descriptor::Keyed(IndexMap::new()));
        assert!(dict.descriptor().is_empty());

        let mut list = OrderedComposite::default();
        assert_eq!(list.mock(&mut provider).unwrap(), Value::Array(Vec::new()));
        assert!(list.descriptor().is_empty());
    }

    #[test]
    fn test_keyed_mock_preserves_order() {
        let mut provider = Provider::seeded(42);
        let mut dict: KeyedComposite = [
            ("z".to_string(), FieldSpec::int8()),
            ("a".to_string(), FieldSpec::string()),
            ("m".to_string(), FieldSpec::timestamp(Resolution::Millis)),
        ]
        .into_iter()
        .collect();

        let value = dict.mock(&mut provider).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert!(value["z"].is_i64() || value["z"].is_u64());
        assert!(value["a"].is_string());
        assert!(value["m"].is_i64());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut dict = KeyedComposite::default();
        dict.insert("a", FieldSpec::int());
        dict.insert("b", FieldSpec::string());
        let previous = dict.insert("a", FieldSpec::float());

        assert!(matches!(previous, Some(FieldSpec::Int(_))));
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(matches!(dict.get("a"), Some(FieldSpec::Float(_))));
    }

    #[test]
    fn test_ordered_mock_and_descriptor() {
        let mut provider = Provider::seeded(42);
        let mut list: OrderedComposite = vec![FieldSpec::string(), FieldSpec::int(), FieldSpec::float()]
            .into_iter()
            .collect();

        let value = list.mock(&mut provider).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_string());
        assert!(items[2].is_f64());

        assert_eq!(
            list.descriptor(),
            Descriptor::Ordered(vec![
                Descriptor::from("Str"),
                Descriptor::from("Int"),
                Descriptor::from("Float_2_10"),
            ])
        );
    }

    #[test]
    fn test_child_error_fails_whole_composite() {
        let mut provider = Provider::seeded(42);
        let mut dict = KeyedComposite::default();
        dict.insert("ok", FieldSpec::int());
        dict.insert("bad", FieldSpec::fake("missing").unwrap());
        assert!(dict.mock(&mut provider).is_err());
    }
}
