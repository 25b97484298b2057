//! Name filters for list data sources

use regex::Regex;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid regex_match '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },
}

/// Optional predicates, applied as successive narrowing passes in the order
/// starts_with, ends_with, contains, regex_match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub contains: Option<String>,
    pub regex_match: Option<String>,
}

impl ListFilter {
    /// Read the four filter attributes; empty strings count as unset.
    pub fn from_config(config: &DynamicValue) -> Self {
        let read = |name: &str| {
            config
                .get_ok(&AttributePath::new(name))
                .and_then(Dynamic::as_str)
                .map(str::to_string)
        };
        Self {
            starts_with: read("starts_with"),
            ends_with: read("ends_with"),
            contains: read("contains"),
            regex_match: read("regex_match"),
        }
    }

    pub fn apply(&self, items: Vec<String>) -> Result<Vec<String>, FilterError> {
        let regex = self
            .regex_match
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| FilterError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        let mut items = items;
        if let Some(prefix) = &self.starts_with {
            items.retain(|item| item.starts_with(prefix.as_str()));
        }
        if let Some(suffix) = &self.ends_with {
            items.retain(|item| item.ends_with(suffix.as_str()));
        }
        if let Some(needle) = &self.contains {
            items.retain(|item| item.contains(needle.as_str()));
        }
        if let Some(regex) = &regex {
            items.retain(|item| regex.is_match(item));
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_filters_keeps_everything_in_order() {
        let input = names(&["tm-b", "tm-a", "lb-1"]);
        assert_eq!(ListFilter::default().apply(input.clone()).unwrap(), input);
    }

    #[test]
    fn filters_compose_left_to_right() {
        let input = names(&["alpha-z", "alpha", "beta-z", "az"]);
        let both = ListFilter {
            starts_with: Some("a".into()),
            contains: Some("z".into()),
            ..Default::default()
        };
        let starts = ListFilter {
            starts_with: Some("a".into()),
            ..Default::default()
        };
        let contains = ListFilter {
            contains: Some("z".into()),
            ..Default::default()
        };

        let chained = contains
            .apply(starts.apply(input.clone()).unwrap())
            .unwrap();
        assert_eq!(both.apply(input).unwrap(), chained);
        assert_eq!(chained, names(&["alpha-z", "az"]));
    }

    #[test]
    fn ends_with_and_regex_narrow_further() {
        let filter = ListFilter {
            ends_with: Some(".example.com".into()),
            regex_match: Some(r"^tm-\d+\.".into()),
            ..Default::default()
        };
        let result = filter
            .apply(names(&[
                "tm-1.example.com",
                "tm-x.example.com",
                "tm-2.example.org",
            ]))
            .unwrap();
        assert_eq!(result, names(&["tm-1.example.com"]));
    }

    #[test]
    fn invalid_regex_is_an_error_even_for_empty_input() {
        let filter = ListFilter {
            regex_match: Some("tm-(".into()),
            ..Default::default()
        };
        let err = filter.apply(Vec::new()).unwrap_err();
        assert!(err.to_string().contains("tm-("));
    }

    #[test]
    fn from_config_ignores_empty_strings() {
        let mut config = DynamicValue::empty_object();
        config
            .set_string(&AttributePath::new("starts_with"), "tm".into())
            .unwrap();
        config
            .set_string(&AttributePath::new("contains"), String::new())
            .unwrap();
        let filter = ListFilter::from_config(&config);
        assert_eq!(filter.starts_with.as_deref(), Some("tm"));
        assert!(filter.contains.is_none());
        assert!(filter.regex_match.is_none());
    }
}
