use std::collections::BTreeMap;
use std::sync::Arc;

use common::config::CatalogConfig;
use tracing::debug;

use crate::locale::{DefaultLocaleFormat, LocaleFormat};
use crate::option::{DEFAULT_STORE_ID, PriceType, ProductOption};
use crate::option_config::{ProductOptionConfig, option_type_names};

pub const REQUIRED_FIELDS_KEY: &str = "option required fields";
pub const OPTION_TYPE_KEY: &str = "option type";
pub const OPTION_VALUES_KEY: &str = "option values";

pub const REQUIRED_FIELDS_MESSAGE: &str = "Missing or invalid required fields";
pub const OPTION_TYPE_MESSAGE: &str = "Invalid option type";
pub const OPTION_VALUES_MESSAGE: &str = "Invalid option value";

/// Validates file-type product options before they are saved.
pub struct FileOptionValidator {
    option_types: Vec<String>,
    price_types: Vec<PriceType>,
    locale_format: Arc<dyn LocaleFormat>,
    messages: BTreeMap<String, String>,
}

impl FileOptionValidator {
    pub fn new(config: &dyn ProductOptionConfig, locale_format: Arc<dyn LocaleFormat>) -> Self {
        Self {
            option_types: option_type_names(config),
            price_types: PriceType::ALL.to_vec(),
            locale_format,
            messages: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config, Arc::new(DefaultLocaleFormat::default()))
    }

    /// Messages of the last `is_valid` call, keyed by check.
    pub fn messages(&self) -> &BTreeMap<String, String> {
        &self.messages
    }

    pub fn is_valid(&mut self, option: &ProductOption) -> bool {
        self.messages.clear();

        if !self.validate_required_fields(option) {
            self.add_message(REQUIRED_FIELDS_KEY, REQUIRED_FIELDS_MESSAGE);
        }
        if !self.validate_option_type(option) {
            self.add_message(OPTION_TYPE_KEY, OPTION_TYPE_MESSAGE);
        }
        if !self.validate_option_value(option) {
            self.add_message(OPTION_VALUES_KEY, OPTION_VALUES_MESSAGE);
        }

        if !self.messages.is_empty() {
            debug!(messages = ?self.messages, "Product option rejected");
        }
        self.messages.is_empty()
    }

    fn add_message(&mut self, key: &str, message: &str) {
        self.messages.insert(key.to_string(), message.to_string());
    }

    fn validate_required_fields(&self, option: &ProductOption) -> bool {
        // store views inherit the title of the default scope
        let title_valid = match option.title.as_deref() {
            None => option.store_id > DEFAULT_STORE_ID,
            Some(title) => !title.trim().is_empty(),
        };
        title_valid && !is_empty(option.option_type.as_deref())
    }

    fn validate_option_type(&self, option: &ProductOption) -> bool {
        option
            .option_type
            .as_deref()
            .is_some_and(|option_type| self.option_types.iter().any(|known| known == option_type))
    }

    /// Price first, then width, then height; stops at the first failure.
    fn validate_option_value(&self, option: &ProductOption) -> bool {
        let price_type = match option.price_type.as_deref().map(str::parse::<PriceType>) {
            Some(Ok(price_type)) if self.price_types.contains(&price_type) => price_type,
            _ => return false,
        };

        self.is_valid_price(price_type, option)
            && !self.is_negative(option.image_size_x.as_deref())
            && !self.is_negative(option.image_size_y.as_deref())
    }

    fn is_valid_price(&self, price_type: PriceType, option: &ProductOption) -> bool {
        if price_type == PriceType::Percent && option.store_id > DEFAULT_STORE_ID {
            return true;
        }
        !self.is_negative(option.price.as_deref())
    }

    /// Blank and unparsable values read as zero.
    fn is_negative(&self, value: Option<&str>) -> bool {
        if is_empty(value) {
            return false;
        }
        value
            .and_then(|raw| self.locale_format.get_number(raw))
            .is_some_and(|number| number < 0.0)
    }
}

fn is_empty(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
