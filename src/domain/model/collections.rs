use super::{CollectionModel, SchemaError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_true() -> bool {
    true
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), SchemaError> {
    if value.is_nan() || value < 0.0 {
        return Err(SchemaError::field(
            field,
            format!("must be greater than or equal to 0 (got {})", value),
        ));
    }
    Ok(())
}

/// Users collection schema (collection `user`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct User {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Address
    pub address: String,
    /// Age in years
    #[serde(default)]
    #[schema(minimum = 0, maximum = 120)]
    pub age: Option<i64>,
    /// Whether user is active
    #[serde(default = "default_true")]
    #[schema(default = true)]
    pub is_active: bool,
}

impl CollectionModel for User {
    const COLLECTION: &'static str = "user";

    fn validate(&self) -> Result<(), SchemaError> {
        match self.age {
            Some(age) if !(0..=120).contains(&age) => Err(SchemaError::field(
                "age",
                format!("must be between 0 and 120 (got {})", age),
            )),
            _ => Ok(()),
        }
    }
}

/// Products collection schema (collection `product`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Product {
    /// Product title
    pub title: String,
    /// Product description
    #[serde(default)]
    pub description: Option<String>,
    /// Price in dollars
    #[schema(minimum = 0)]
    pub price: f64,
    /// Product category
    pub category: String,
    /// Whether product is in stock
    #[serde(default = "default_true")]
    #[schema(default = true)]
    pub in_stock: bool,
}

impl CollectionModel for Product {
    const COLLECTION: &'static str = "product";

    fn validate(&self) -> Result<(), SchemaError> {
        check_non_negative("price", self.price)
    }
}

/// Gifts collection schema (collection `gift`).
///
/// `gift`, `background` and `pattern` are required; everything else is optional and
/// stored as `null` when omitted.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Gift {
    /// Gift type or name (e.g. flowers, toy, gadget)
    #[schema(example = "flowers")]
    pub gift: String,
    /// Background style identifier
    #[schema(example = "red")]
    pub background: String,
    /// Pattern identifier
    #[schema(example = "dots")]
    pub pattern: String,
    /// Number or code associated with item
    #[serde(default)]
    pub number: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// Preview image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Price if applicable
    #[serde(default)]
    #[schema(minimum = 0)]
    pub price: Option<f64>,
    /// Search tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Gift {
    /// Fields covered by the free-text `q` search.
    pub const TEXT_SEARCH_FIELDS: [&'static str; 3] = ["title", "description", "tags"];

    pub fn new(
        gift: impl Into<String>,
        background: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            gift: gift.into(),
            background: background.into(),
            pattern: pattern.into(),
            number: None,
            title: None,
            description: None,
            image_url: None,
            price: None,
            tags: None,
        }
    }
}

impl CollectionModel for Gift {
    const COLLECTION: &'static str = "gift";

    fn validate(&self) -> Result<(), SchemaError> {
        match self.price {
            Some(price) => check_non_negative("price", price),
            None => Ok(()),
        }
    }
}
