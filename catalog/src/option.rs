use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Store id of the admin (default) scope.
pub const DEFAULT_STORE_ID: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceType {
    Fixed,
    Percent,
}

impl PriceType {
    pub const ALL: [PriceType; 2] = [PriceType::Fixed, PriceType::Percent];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Fixed => "fixed",
            PriceType::Percent => "percent",
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown price type: {0}")]
pub struct UnknownPriceType(pub String);

impl FromStr for PriceType {
    type Err = UnknownPriceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceType::ALL
            .into_iter()
            .find(|price_type| price_type.as_str() == s)
            .ok_or_else(|| UnknownPriceType(s.to_string()))
    }
}

/// A custom product option as submitted from the admin form.
///
/// Numeric fields stay raw strings; they are parsed with the store's
/// locale at validation time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductOption {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub option_type: Option<String>,
    pub price_type: Option<String>,
    pub price: Option<String>,
    pub image_size_x: Option<String>,
    pub image_size_y: Option<String>,
    #[serde(default)]
    pub store_id: u32,
}

impl ProductOption {
    pub fn file(title: &str, option_type: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            option_type: Some(option_type.to_string()),
            ..Default::default()
        }
    }

    pub fn with_price(mut self, price_type: &str, price: &str) -> Self {
        self.price_type = Some(price_type.to_string());
        self.price = Some(price.to_string());
        self
    }

    pub fn with_image_size(mut self, x: &str, y: &str) -> Self {
        self.image_size_x = Some(x.to_string());
        self.image_size_y = Some(y.to_string());
        self
    }

    pub fn with_store(mut self, store_id: u32) -> Self {
        self.store_id = store_id;
        self
    }
}
