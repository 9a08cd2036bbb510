//! Typed entities extracted from ticket text

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Entity types recognised in ticket text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    MoneyAmount,
    OrderNumber,
    Email,
    Phone,
    Date,
    ProductReference,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MoneyAmount => "money_amount",
            Self::OrderNumber => "order_number",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::ProductReference => "product_reference",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities found in one ticket, keyed by type
///
/// Types with no match are never stored, so `contains` doubles as a
/// presence check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedEntities {
    by_type: BTreeMap<EntityType, Vec<String>>,
}

impl ExtractedEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record matches for a type; an empty list is ignored
    pub fn insert(&mut self, entity_type: EntityType, values: Vec<String>) {
        if !values.is_empty() {
            self.by_type.entry(entity_type).or_default().extend(values);
        }
    }

    pub fn get(&self, entity_type: EntityType) -> Option<&[String]> {
        self.by_type.get(&entity_type).map(|v| v.as_slice())
    }

    pub fn contains(&self, entity_type: EntityType) -> bool {
        self.by_type.contains_key(&entity_type)
    }

    /// How many of `types` are present
    pub fn count_present(&self, types: &[EntityType]) -> usize {
        types.iter().filter(|t| self.contains(**t)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_not_stored() {
        let mut entities = ExtractedEntities::new();
        entities.insert(EntityType::Email, vec![]);
        assert!(entities.is_empty());
        assert!(!entities.contains(EntityType::Email));
    }

    #[test]
    fn test_count_present() {
        let mut entities = ExtractedEntities::new();
        entities.insert(EntityType::MoneyAmount, vec!["$25".to_string()]);
        entities.insert(EntityType::OrderNumber, vec!["order #12345".to_string()]);

        assert_eq!(
            entities.count_present(&[EntityType::MoneyAmount, EntityType::Phone]),
            1
        );
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut entities = ExtractedEntities::new();
        entities.insert(EntityType::Email, vec!["a@b.com".to_string()]);
        let json = serde_json::to_value(&entities).unwrap();
        assert_eq!(json["email"][0], "a@b.com");
    }
}
