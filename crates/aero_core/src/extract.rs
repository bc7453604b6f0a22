use regex::Regex;

use crate::{Error, Result};

/// Shape of a selected document fragment, decided once at the DOM boundary.
///
/// The source pages are hand-authored HTML where the nesting of formatting
/// tags around a value drifts over time, so callers match on this variant
/// instead of chaining node-type checks at every call site.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A single text node.
    Text(String),
    /// Multiple text nodes from one selection.
    List(Vec<String>),
    /// Markup where text was expected; carries the offending HTML.
    Markup(String),
    /// Nothing selected.
    Empty,
}

impl Fragment {
    /// Trimmed text form; multiple text nodes join with single spaces.
    pub fn as_str(&self) -> Result<String> {
        match self {
            Fragment::Text(text) => Ok(text.trim().to_string()),
            Fragment::List(items) => match items.len() {
                0 => Err(Error::UnexpectedShape("empty node list".to_string())),
                1 => Ok(items[0].trim().to_string()),
                _ => Ok(items
                    .iter()
                    .map(|item| item.trim())
                    .collect::<Vec<_>>()
                    .join(" ")),
            },
            Fragment::Markup(html) => Err(Error::UnexpectedShape(format!(
                "markup where text was expected: {}",
                html
            ))),
            Fragment::Empty => Err(Error::UnexpectedShape("empty selection".to_string())),
        }
    }

    /// First run of digits in the string form.
    pub fn as_int(&self) -> Result<i64> {
        parse_int(&self.as_str()?)
    }

    /// First decimal-pointed number in the string form, falling back to a
    /// bare digit run (the station prints whole-number floats without a point).
    pub fn as_float(&self) -> Result<f64> {
        parse_float(&self.as_str()?)
    }
}

pub fn parse_int(s: &str) -> Result<i64> {
    let digits = Regex::new(r"\d+").unwrap();
    let m = digits
        .find(s)
        .ok_or_else(|| Error::NoNumberFound(s.to_string()))?;
    m.as_str()
        .parse::<i64>()
        .map_err(|_| Error::NoNumberFound(s.to_string()))
}

pub fn parse_float(s: &str) -> Result<f64> {
    let decimal = Regex::new(r"\d+\.\d+").unwrap();
    if let Some(m) = decimal.find(s) {
        return m
            .as_str()
            .parse::<f64>()
            .map_err(|_| Error::NoNumberFound(s.to_string()));
    }
    parse_int(s).map(|n| n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_single_item_list_is_trimmed() {
        let fragment = Fragment::List(vec!["  3.2 ".to_string()]);
        assert_eq!(fragment.as_str().unwrap(), "3.2");
    }

    #[test]
    fn test_as_str_joins_homogeneous_text_nodes() {
        let fragment = Fragment::List(vec![" a ".to_string(), " b ".to_string()]);
        assert_eq!(fragment.as_str().unwrap(), "a b");
    }

    #[test]
    fn test_as_int_finds_first_digit_run() {
        let fragment = Fragment::Text("Humidity: 61%".to_string());
        assert_eq!(fragment.as_int().unwrap(), 61);
    }

    #[test]
    fn test_as_float_finds_decimal() {
        let fragment = Fragment::Text("Temp 73.1F".to_string());
        assert_eq!(fragment.as_float().unwrap(), 73.1);
    }

    #[test]
    fn test_as_float_accepts_bare_integer() {
        let fragment = Fragment::Text("0 in".to_string());
        assert_eq!(fragment.as_float().unwrap(), 0.0);
    }

    #[test]
    fn test_empty_list_is_unexpected_shape() {
        let fragment = Fragment::List(vec![]);
        assert!(matches!(
            fragment.as_str(),
            Err(Error::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_empty_selection_is_unexpected_shape() {
        assert!(matches!(
            Fragment::Empty.as_str(),
            Err(Error::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_markup_is_unexpected_shape_and_reports_offender() {
        let fragment = Fragment::Markup("<img src=\"radar.gif\">".to_string());
        match fragment.as_str() {
            Err(Error::UnexpectedShape(msg)) => assert!(msg.contains("radar.gif")),
            other => panic!("expected UnexpectedShape, got {:?}", other),
        }
    }

    #[test]
    fn test_no_digits_is_no_number_found() {
        let fragment = Fragment::Text("no digits here".to_string());
        match fragment.as_int() {
            Err(Error::NoNumberFound(s)) => assert_eq!(s, "no digits here"),
            other => panic!("expected NoNumberFound, got {:?}", other),
        }
    }
}
