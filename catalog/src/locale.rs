use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").expect("valid number pattern")
});

/// Turns locale-formatted user input into a number.
pub trait LocaleFormat: Send + Sync {
    fn get_number(&self, value: &str) -> Option<f64>;
}

#[derive(Debug, Clone)]
pub struct DefaultLocaleFormat {
    pub decimal_separator: char,
    pub group_separator: char,
}

impl Default for DefaultLocaleFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
        }
    }
}

impl DefaultLocaleFormat {
    pub fn new(decimal_separator: char, group_separator: char) -> Self {
        Self {
            decimal_separator,
            group_separator,
        }
    }
}

impl LocaleFormat for DefaultLocaleFormat {
    fn get_number(&self, value: &str) -> Option<f64> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != self.group_separator && !c.is_whitespace())
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        if !NUMBER.is_match(&normalized) {
            return None;
        }
        normalized.parse().ok()
    }
}
