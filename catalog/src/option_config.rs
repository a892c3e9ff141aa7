use common::config::{CatalogConfig, OptionGroupConfig};

/// Source of the configured product option groups.
pub trait ProductOptionConfig {
    fn all(&self) -> Vec<OptionGroupConfig>;
}

impl ProductOptionConfig for CatalogConfig {
    fn all(&self) -> Vec<OptionGroupConfig> {
        self.option_groups.clone()
    }
}

/// Every option type name declared in `config`, disabled ones included.
pub fn option_type_names(config: &dyn ProductOptionConfig) -> Vec<String> {
    config
        .all()
        .into_iter()
        .flat_map(|group| group.types.into_iter().map(|option_type| option_type.name))
        .collect()
}
