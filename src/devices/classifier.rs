//! Keyword-table classifier mapping free-text device names to categories.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Per-category keyword lists, as read from the `[classifier]` config section.
///
/// A list given in the config replaces the built-in list for that category;
/// omitted categories keep their defaults. `other` has no keywords, it is the
/// fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordConfig {
    pub cooling: Vec<String>,
    pub heating: Vec<String>,
    pub fans: Vec<String>,
    pub lighting: Vec<String>,
    pub electronics: Vec<String>,
    pub kitchen: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            cooling: owned(&["ثلاجة", "مكيف"]),
            heating: owned(&["سخان", "دفاية", "جك", "هيتر", "مدفأة"]),
            fans: owned(&["مروحة"]),
            lighting: owned(&["لمبة", "led"]),
            electronics: owned(&["شاحن", "حاسوب", "تلفزيون", "راوتر"]),
            kitchen: owned(&["خلاط", "كبة", "ميكروويف", "فرن", "غسالة"]),
        }
    }
}

impl KeywordConfig {
    fn keywords(&self, category: Category) -> &[String] {
        match category {
            Category::Cooling => &self.cooling,
            Category::Heating => &self.heating,
            Category::Fans => &self.fans,
            Category::Lighting => &self.lighting,
            Category::Electronics => &self.electronics,
            Category::Kitchen => &self.kitchen,
            Category::Other => &[],
        }
    }
}

/// Case-insensitive substring classifier.
///
/// Categories are tried in [`Category::MATCHABLE`] order and the first one with
/// a keyword contained in the name wins; names matching nothing are
/// [`Category::Other`].
///
/// # Examples
///
/// ```
/// use solar_sizer::devices::{Category, Classifier};
///
/// let classifier = Classifier::default();
/// assert_eq!(classifier.classify("LED strip"), Category::Lighting);
/// assert_eq!(classifier.classify("جهاز غريب"), Category::Other);
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Lowercased keywords per matchable category, in priority order.
    table: Vec<(Category, Vec<String>)>,
}

impl Classifier {
    /// Builds a classifier from a keyword table.
    pub fn from_config(config: &KeywordConfig) -> Self {
        let table = Category::MATCHABLE
            .iter()
            .map(|&category| {
                let words = config
                    .keywords(category)
                    .iter()
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect();
                (category, words)
            })
            .collect();
        Self { table }
    }

    /// Adds keywords to a category without touching the others.
    ///
    /// Keywords for [`Category::Other`] are ignored.
    pub fn extend<I, S>(&mut self, category: Category, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some((_, words)) = self.table.iter_mut().find(|(c, _)| *c == category) {
            words.extend(
                keywords
                    .into_iter()
                    .map(|w| w.as_ref().trim().to_lowercase())
                    .filter(|w| !w.is_empty()),
            );
        }
    }

    /// Returns the category for a device name.
    pub fn classify(&self, name: &str) -> Category {
        let lower = name.to_lowercase();
        self.table
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w.as_str())))
            .map_or(Category::Other, |(category, _)| *category)
    }

    /// Keywords currently registered for a category.
    pub fn keywords(&self, category: Category) -> &[String] {
        self.table
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, words)| words.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&KeywordConfig::default())
    }
}
