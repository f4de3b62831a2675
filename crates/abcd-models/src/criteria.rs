//! Brand criteria used by feature detectors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stock call-to-action phrases recognized by the Direct features.
pub const CALL_TO_ACTION_PHRASES: [&str; 17] = [
    "LEARN MORE",
    "GET QUOTE",
    "APPLY NOW",
    "SIGN UP",
    "CONTACT US",
    "SUBSCRIBE",
    "DOWNLOAD",
    "BOOK NOW",
    "SHOP NOW",
    "BUY NOW",
    "DONATE NOW",
    "ORDER NOW",
    "PLAY NOW",
    "SEE MORE",
    "START NOW",
    "VISIT SITE",
    "WATCH NOW",
];

/// Verb forms of the stock call-to-action phrases, used for short on-screen
/// text where the full phrase rarely fits.
pub const CALL_TO_ACTION_VERBS: [&str; 17] = [
    "LEARN", "QUOTE", "APPLY", "SIGN UP", "CONTACT", "SUBSCRIBE", "DOWNLOAD", "BOOK", "SHOP",
    "BUY", "DONATE", "ORDER", "PLAY", "SEE", "START", "VISIT", "WATCH",
];

/// Brand inputs for one assessment run. Immutable once constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrandCriteria {
    pub brand_name: String,
    pub brand_variations: Vec<String>,
    pub branded_products: Vec<String>,
    pub branded_products_categories: Vec<String>,
    pub branded_call_to_actions: Vec<String>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl BrandCriteria {
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            ..Default::default()
        }
    }

    /// Brand name plus all its variations.
    pub fn brand_terms(&self) -> Vec<String> {
        let mut terms = vec![self.brand_name.clone()];
        terms.extend(self.brand_variations.iter().cloned());
        terms
    }

    /// Whether `text` mentions the brand or one of its variations.
    pub fn matches_brand(&self, text: &str) -> bool {
        self.brand_terms().iter().any(|t| contains_ci(text, t))
    }

    /// Whether `text` mentions a branded product.
    pub fn matches_product(&self, text: &str) -> bool {
        self.branded_products.iter().any(|p| contains_ci(text, p))
    }

    /// Whether `text` mentions a branded product category.
    pub fn matches_category(&self, text: &str) -> bool {
        self.branded_products_categories
            .iter()
            .any(|c| contains_ci(text, c))
    }

    /// Stock call-to-action phrases extended with the brand's own.
    pub fn call_to_action_phrases(&self) -> Vec<String> {
        let mut phrases: Vec<String> = CALL_TO_ACTION_PHRASES
            .iter()
            .map(|p| p.to_string())
            .collect();
        phrases.extend(self.branded_call_to_actions.iter().cloned());
        phrases
    }

    /// Whether `text` contains any call-to-action phrase.
    pub fn matches_call_to_action(&self, text: &str) -> bool {
        self.call_to_action_phrases()
            .iter()
            .any(|p| contains_ci(text, p))
    }
}
