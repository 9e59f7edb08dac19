//! Built-in suggestion tables
//!
//! Works without any network access. Used on its own in offline mode and as
//! the secondary source behind the HTTP client.

use super::{ProviderError, SuggestionProvider};
use crate::context::SelectionContext;
use crate::identifier::fallback_identifier;
use async_trait::async_trait;
use chrono::{Datelike, Utc};

/// Number of model years offered
const YEAR_WINDOW: i32 = 15;

#[derive(Debug, Clone, Default)]
pub struct OfflineCatalog;

impl OfflineCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Suggestions for `level` given `context`
    pub fn suggestions(&self, level: &str, context: &SelectionContext) -> Vec<String> {
        let catalog = context.get("catalog");
        let category = context.get("category");
        let brand = context.get("brand");

        match level {
            "catalog" => strings(&[
                "Electronics",
                "Automotive",
                "Home & Garden",
                "Fashion",
                "Industrial",
                "Office Supplies",
            ]),
            "category" => strings(match catalog {
                Some("Electronics") => &["Smartphones", "Computers", "Audio", "Cameras", "Wearables"],
                Some("Automotive") => &[
                    "Car Parts",
                    "Motorcycle Parts",
                    "Tools & Equipment",
                    "Car Care",
                    "Tires & Wheels",
                ],
                Some("Home & Garden") => &["Furniture", "Kitchen", "Bedding", "Decor", "Garden Tools"],
                Some("Fashion") => &["Men", "Women", "Kids", "Accessories", "Shoes"],
                _ => &["General Category 1", "General Category 2", "General Category 3"],
            }),
            "subCategory" => strings(match category {
                Some("Smartphones") => &["Android Phones", "iPhones", "Feature Phones", "Refurbished Phones"],
                Some("Computers") => &["Laptops", "Desktops", "Monitors", "Tablets", "Components"],
                Some("Car Parts") => &["Brakes", "Engine", "Suspension", "Exhaust", "Filters"],
                Some("Furniture") => &["Living Room", "Bedroom", "Dining Room", "Office Furniture"],
                _ => &["Standard", "Premium", "Budget", "Professional"],
            }),
            "brand" => strings(match catalog {
                Some("Electronics") => &["Samsung", "Apple", "Sony", "LG", "Dell", "Asus", "HP"],
                Some("Automotive") => &["Bosch", "Michelin", "Castrol", "3M", "Meguiars", "Ford", "Toyota"],
                Some("Home & Garden") => &["IKEA", "Ashley", "Wayfair", "Herman Miller", "KitchenAid"],
                Some("Fashion") => &["Nike", "Adidas", "Zara", "Gucci", "Uniqlo", "Levis"],
                _ => &["Acme Corp", "Generic Brand", "Premium Co", "Value Plus"],
            }),
            "model" => match brand {
                Some(brand) => ["Pro Max", "Ultra", "Lite Series", "Standard Edition", "X-1000", "Eco-Line"]
                    .iter()
                    .map(|suffix| format!("{} {}", brand, suffix))
                    .collect(),
                None => strings(&["Model X", "Model Y", "Model Z", "Series 1", "Series 2"]),
            },
            "year" => {
                // Next year first, then back through the window
                let next_year = Utc::now().year() + 1;
                (0..YEAR_WINDOW).map(|i| (next_year - i).to_string()).collect()
            }
            "color" => strings(match catalog {
                Some("Automotive") => &[
                    "Metallic Black",
                    "Pearl White",
                    "Racing Red",
                    "Midnight Blue",
                    "Silver Grey",
                    "Matte Grey",
                ],
                Some("Electronics") => &["Space Grey", "Silver", "Gold", "Midnight Green", "Blue", "Product Red"],
                _ => &["Black", "White", "Red", "Blue", "Green", "Yellow", "Silver"],
            }),
            _ => strings(&["Option 1", "Option 2", "Option 3"]),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[async_trait]
impl SuggestionProvider for OfflineCatalog {
    fn name(&self) -> &'static str {
        "Offline"
    }

    async fn fetch_options(
        &self,
        level: &str,
        context: &SelectionContext,
    ) -> Result<Vec<String>, ProviderError> {
        Ok(self.suggestions(level, context))
    }

    async fn fetch_identifier(&self, seed: &str) -> Result<String, ProviderError> {
        Ok(fallback_identifier(seed))
    }
}
