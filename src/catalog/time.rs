use chrono::NaiveDateTime;

/// Default format of catalog begin/end strings once the weekday is dropped,
/// e.g. `Mon Jan 01 10:00:00 2016` → `Jan 01 10:00:00 2016`.
pub const DEFAULT_TIME_FORMAT: &str = "%b %d %H:%M:%S %Y";

/// Parser for the wall-clock strings stored in the run catalog.
///
/// Catalog times look like `ctime` output: `<weekday> <month> <day> <HH:MM:SS> <year>`.
/// The leading weekday token is redundant and is dropped before the format is
/// applied; runs of whitespace (ctime pads single-digit days) are collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTimeFormat {
    format: String,
}

impl Default for CatalogTimeFormat {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl CatalogTimeFormat {
    /// Use a catalog-specific chrono format string
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// The chrono format string in use
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse a catalog time string, returning `None` when it does not match.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }

        let without_weekday = tokens[1..].join(" ");
        NaiveDateTime::parse_from_str(&without_weekday, &self.format)
            .or_else(|_| NaiveDateTime::parse_from_str(&tokens.join(" "), &self.format))
            .ok()
    }
}
