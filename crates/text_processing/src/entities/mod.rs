//! Entity extraction
//!
//! Extracts typed spans used as scoring context:
//! - Money amounts (`$25`, `40 dollars`)
//! - Order numbers (`order #A-10023`, `#55512`)
//! - Email addresses
//! - Phone numbers
//! - Dates (numeric, month names, relative days)
//! - Product references (`model X200`, `sku 4471`)
//!
//! Patterns come from the pattern library and are matched case-insensitively
//! against lightly normalized text (see `TextNormalizer::normalize_for_entities`).
//!
//! # Example
//!
//! ```ignore
//! use ticket_intent_text_processing::{default_library, EntityExtractor};
//!
//! let extractor = EntityExtractor::new(default_library());
//! let entities = extractor.extract("charged $25 twice on order #10023");
//!
//! assert!(entities.contains(EntityType::MoneyAmount));
//! assert!(entities.contains(EntityType::OrderNumber));
//! ```

use std::sync::Arc;
use ticket_intent_core::{ExtractedEntities, IntentLabel};

use crate::library::PatternLibrary;

/// Regex-based entity extractor
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    library: Arc<PatternLibrary>,
}

impl EntityExtractor {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    /// Extract every configured entity type; types without a match are omitted
    pub fn extract(&self, text: &str) -> ExtractedEntities {
        let mut entities = ExtractedEntities::new();

        for (entity_type, patterns) in self.library.entity_patterns() {
            let mut values: Vec<String> = Vec::new();
            for pattern in patterns {
                for m in pattern.regex.find_iter(text) {
                    let value = m.as_str().trim().to_string();
                    if !value.is_empty() && !values.contains(&value) {
                        values.push(value);
                    }
                }
            }
            entities.insert(*entity_type, values);
        }

        entities
    }

    /// How many of the intent's relevant entity types are present
    pub fn relevant_entity_count(&self, intent: &IntentLabel, entities: &ExtractedEntities) -> usize {
        self.library
            .intent(intent)
            .map(|patterns| entities.count_present(&patterns.relevant_entities))
            .unwrap_or(0)
    }
}
