//! Catalogue - candidate questions grouped by category, ranked by learned weight.
//!
//! The catalogue consists of:
//! - **Categories**: named groups, kept in insertion order for display
//! - **Entries**: question text plus a weight in `[0, 1)`
//! - **Ranking**: within a category, entries are sorted by weight descending
//!
//! On disk the catalogue is a JSON object mapping each category name to an
//! array of `{ "q": ..., "weight": ... }` objects, in ranked order.

mod entry;
mod store;

pub use entry::*;
pub use store::*;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A named group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub entries: Vec<QuestionEntry>,
}

impl Category {
    /// Create a category; entries are ranked immediately.
    pub fn new(name: impl Into<String>, entries: Vec<QuestionEntry>) -> Self {
        let mut category = Self {
            name: name.into(),
            entries,
        };
        category.sort_by_weight();
        category
    }

    /// Find an entry by exact, case-sensitive text.
    pub fn find(&self, question: &str) -> Option<&QuestionEntry> {
        self.entries.iter().find(|e| e.text == question)
    }

    /// Whether entries are in descending weight order.
    pub fn is_ranked(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].weight >= w[1].weight)
    }

    // Vec::sort_by is stable, so equal weights keep their prior order.
    fn sort_by_weight(&mut self) {
        self.entries
            .sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    }
}

/// The full mapping of category name to ranked entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalogue {
    categories: Vec<Category>,
}

impl Catalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category, replacing any existing one with the same name in place.
    pub fn with_category(mut self, name: impl Into<String>, entries: Vec<QuestionEntry>) -> Self {
        let category = Category::new(name, entries);
        match self
            .categories
            .iter_mut()
            .find(|c| c.name == category.name)
        {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
        self
    }

    /// The built-in catalogue used when nothing has been persisted yet.
    pub fn defaults() -> Self {
        Self::new()
            .with_category(
                "1️⃣ Core Questions",
                vec![
                    QuestionEntry::new("What is the problem with this crop?", 0.9),
                    QuestionEntry::new("Is this a serious problem?", 0.8),
                ],
            )
            .with_category(
                "2️⃣ Pesticide Selection",
                vec![
                    QuestionEntry::new("What pesticide should I use?", 0.7),
                    QuestionEntry::new("Is there an organic alternative?", 0.6),
                ],
            )
            .with_category(
                "3️⃣ Dosage (Regression Model)",
                vec![
                    QuestionEntry::new("What is the correct dosage per acre?", 0.5),
                    QuestionEntry::new("Will using more damage the crop?", 0.5),
                ],
            )
            .with_category(
                "4️⃣ Application Method",
                vec![
                    QuestionEntry::new("When is the best time to spray?", 0.5),
                    QuestionEntry::new("Should I spray leaves or soil?", 0.5),
                ],
            )
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Get a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Check if a category exists.
    pub fn contains_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    /// Find an entry by category and exact question text.
    pub fn find(&self, category: &str, question: &str) -> Option<&QuestionEntry> {
        self.category(category).and_then(|c| c.find(question))
    }

    /// Iterate `(category name, entry)` pairs in category order, then rank order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &QuestionEntry)> {
        self.categories
            .iter()
            .flat_map(|c| c.entries.iter().map(move |e| (c.name.as_str(), e)))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of entries across all categories.
    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    /// Whether every weight lies in `[0, 1)`.
    pub fn has_valid_weights(&self) -> bool {
        self.entries().all(|(_, e)| e.has_valid_weight())
    }

    /// Apply `update` to one entry's weight and re-rank its category.
    ///
    /// This is the only way weights change after construction. Returns `None`
    /// without touching anything when the category or the exact question
    /// text is not present.
    pub(crate) fn update_weight<F>(
        &mut self,
        category: &str,
        question: &str,
        update: F,
    ) -> Option<WeightChange>
    where
        F: FnOnce(f64) -> f64,
    {
        let group = self.categories.iter_mut().find(|c| c.name == category)?;
        let entry = group.entries.iter_mut().find(|e| e.text == question)?;

        let old_weight = entry.weight;
        let new_weight = clamp_weight(update(old_weight));
        entry.weight = new_weight;

        group.sort_by_weight();
        let new_rank = group
            .entries
            .iter()
            .position(|e| e.text == question && e.weight == new_weight)
            .unwrap_or_default();

        Some(WeightChange {
            category: group.name.clone(),
            question: question.to_string(),
            old_weight,
            new_weight,
            new_rank,
        })
    }
}

impl Serialize for Catalogue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalogue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogueVisitor;

        impl<'de> Visitor<'de> for CatalogueVisitor {
            type Value = Catalogue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category names to question lists")
            }

            // Entries keep their file order so a saved ranking reloads unchanged.
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalogue, A::Error> {
                let mut catalogue = Catalogue::new();
                while let Some((name, entries)) =
                    access.next_entry::<String, Vec<QuestionEntry>>()?
                {
                    if catalogue.contains_category(&name) {
                        return Err(de::Error::custom(format!("duplicate category '{}'", name)));
                    }
                    catalogue.categories.push(Category { name, entries });
                }
                Ok(catalogue)
            }
        }

        deserializer.deserialize_map(CatalogueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_shape() {
        let catalogue = Catalogue::defaults();
        assert_eq!(catalogue.len(), 4);
        assert_eq!(catalogue.entry_count(), 8);
        assert!(catalogue.has_valid_weights());

        let names: Vec<_> = catalogue.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "1️⃣ Core Questions",
                "2️⃣ Pesticide Selection",
                "3️⃣ Dosage (Regression Model)",
                "4️⃣ Application Method",
            ]
        );

        let core = catalogue.find("1️⃣ Core Questions", "What is the problem with this crop?");
        assert_eq!(core.unwrap().weight, 0.9);
        let dosage = catalogue.find("3️⃣ Dosage (Regression Model)", "Will using more damage the crop?");
        assert_eq!(dosage.unwrap().weight, 0.5);
    }

    #[test]
    fn test_with_category_sorts() {
        let catalogue = Catalogue::new().with_category(
            "Mixed",
            vec![QuestionEntry::new("low", 0.1), QuestionEntry::new("high", 0.9)],
        );
        let mixed = catalogue.category("Mixed").unwrap();
        assert_eq!(mixed.entries[0].text, "high");
        assert!(mixed.is_ranked());
    }

    #[test]
    fn test_with_category_replaces_in_place() {
        let catalogue = Catalogue::new()
            .with_category("A", vec![QuestionEntry::new("one", 0.5)])
            .with_category("B", vec![])
            .with_category("A", vec![QuestionEntry::new("two", 0.5)]);
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.categories()[0].name, "A");
        assert!(catalogue.find("A", "two").is_some());
        assert!(catalogue.find("A", "one").is_none());
    }

    #[test]
    fn test_find_is_exact() {
        let catalogue = Catalogue::defaults();
        assert!(catalogue
            .find("2️⃣ Pesticide Selection", "what pesticide should I use?")
            .is_none());
        assert!(catalogue
            .find("2️⃣ Pesticide Selection", "What pesticide should I use?")
            .is_some());
    }

    #[test]
    fn test_entries_iteration_order() {
        let catalogue = Catalogue::defaults();
        let first: Vec<_> = catalogue.entries().take(3).map(|(_, e)| e.text.as_str()).collect();
        assert_eq!(
            first,
            vec![
                "What is the problem with this crop?",
                "Is this a serious problem?",
                "What pesticide should I use?",
            ]
        );
    }

    #[test]
    fn test_update_weight_reranks() {
        let mut catalogue = Catalogue::defaults();
        let change = catalogue
            .update_weight("1️⃣ Core Questions", "Is this a serious problem?", |_| 0.95)
            .unwrap();

        assert_eq!(change.old_weight, 0.8);
        assert_eq!(change.new_weight, 0.95);
        assert_eq!(change.new_rank, 0);

        let core = catalogue.category("1️⃣ Core Questions").unwrap();
        assert_eq!(core.entries[0].text, "Is this a serious problem?");
        assert!(core.is_ranked());
    }

    #[test]
    fn test_update_weight_unknown_is_noop() {
        let mut catalogue = Catalogue::defaults();
        let before = catalogue.clone();

        assert!(catalogue.update_weight("Nope", "Is this a serious problem?", |w| w + 0.1).is_none());
        assert!(catalogue
            .update_weight("1️⃣ Core Questions", "is this a serious problem?", |w| w + 0.1)
            .is_none());
        assert_eq!(catalogue, before);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut catalogue = Catalogue::new().with_category(
            "Ties",
            vec![
                QuestionEntry::new("first", 0.5),
                QuestionEntry::new("second", 0.5),
                QuestionEntry::new("third", 0.5),
                QuestionEntry::new("fourth", 0.2),
            ],
        );

        catalogue.update_weight("Ties", "fourth", |_| 0.5).unwrap();

        let order: Vec<_> = catalogue.category("Ties").unwrap().entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_json_preserves_category_order() {
        let json = r#"{
            "Zeta": [{"q": "last letter?", "weight": 0.3}],
            "Alpha": [{"q": "first letter?", "weight": 0.6}, {"q": "second?", "weight": 0.4}]
        }"#;
        let catalogue: Catalogue = serde_json::from_str(json).unwrap();

        assert_eq!(catalogue.categories()[0].name, "Zeta");
        assert_eq!(catalogue.categories()[1].name, "Alpha");
        assert_eq!(catalogue.category("Alpha").unwrap().entries[1].text, "second?");

        let reparsed: Catalogue =
            serde_json::from_str(&serde_json::to_string(&catalogue).unwrap()).unwrap();
        assert_eq!(reparsed, catalogue);
    }

    #[test]
    fn test_json_rejects_duplicate_category() {
        let json = r#"{"A": [], "A": []}"#;
        assert!(serde_json::from_str::<Catalogue>(json).is_err());
    }
}
