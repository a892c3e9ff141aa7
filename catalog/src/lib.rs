pub mod locale;
pub mod option;
pub mod option_config;
pub mod validator;

pub use locale::{DefaultLocaleFormat, LocaleFormat};
pub use option::{PriceType, ProductOption};
pub use option_config::ProductOptionConfig;
pub use validator::FileOptionValidator;
