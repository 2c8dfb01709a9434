//! Search parameter parsing and validation
//!
//! Turns the ordered `(key, value)` pairs of a `/v1/products` query string into a
//! typed [`SearchRequest`]:
//! - `q`: free-text term (absent or blank matches everything)
//! - `filter`: repeatable and/or comma-separated `field:value` exact matches
//! - `sort`: repeatable and/or comma-separated `field:asc|desc` keys, primary first
//! - `from` / `size`: pagination
//! - `pretty`: pretty-print the JSON response
//!
//! Unknown parameter names are ignored. Unknown *field* names inside `filter`
//! or `sort` are rejected. Whitespace around filter field names and values is
//! trimmed; inner whitespace is kept.

use crate::error::{QueryError, Result};
use crate::escape::{split_unescaped, unescape};
use crate::fields::{FieldKind, ProductField};

/// Parsed, validated search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free-text term matched across the full-text fields.
    pub term: Option<String>,
    /// Exact-match constraints in request order, ANDed together.
    pub filters: Vec<Filter>,
    /// Sort keys in request order; the first is primary.
    pub sort: Vec<SortKey>,
    /// Number of matches to skip.
    pub offset: usize,
    /// Maximum number of matches to return.
    pub limit: usize,
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: ProductField,
    pub value: FilterValue,
}

/// Filter value typed after the field it constrains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: ProductField,
    pub direction: SortDirection,
}

/// Pagination defaults and limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// `size` used when the parameter is absent.
    pub default_size: usize,
    /// Largest accepted `size`. Defaults to the full result window.
    pub max_size: usize,
    /// Largest accepted `from + size`.
    pub max_window: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_size: 10,
            max_size: 10_000,
            max_window: 10_000,
        }
    }
}

impl SearchRequest {
    /// Parse with the default [`ParseOptions`].
    pub fn from_items(items: &[(String, String)]) -> Result<Self> {
        Self::from_items_with(items, &ParseOptions::default())
    }

    /// Parse ordered (key, value) items, already form-urlencoded-decoded.
    pub fn from_items_with(items: &[(String, String)], options: &ParseOptions) -> Result<Self> {
        let mut term: Option<Option<String>> = None;
        let mut filters = Vec::new();
        let mut sort = Vec::new();
        let mut offset: Option<usize> = None;
        let mut limit: Option<usize> = None;
        let mut pretty: Option<bool> = None;

        for (key, value) in items {
            match key.as_str() {
                "q" => {
                    if term.is_some() {
                        return Err(QueryError::Repeated("q"));
                    }
                    let trimmed = value.trim();
                    term = Some((!trimmed.is_empty()).then(|| trimmed.to_string()));
                }
                "filter" => {
                    for raw in split_unescaped(value, ',') {
                        if raw.trim().is_empty() {
                            continue;
                        }
                        filters.push(parse_filter(raw)?);
                    }
                }
                "sort" => {
                    for raw in split_unescaped(value, ',') {
                        if raw.trim().is_empty() {
                            continue;
                        }
                        sort.push(parse_sort_key(raw)?);
                    }
                }
                "from" => {
                    if offset.is_some() {
                        return Err(QueryError::Repeated("from"));
                    }
                    offset = Some(parse_non_negative("from", value)?.unwrap_or(0));
                }
                "size" => {
                    if limit.is_some() {
                        return Err(QueryError::Repeated("size"));
                    }
                    limit = Some(parse_non_negative("size", value)?.unwrap_or(options.default_size));
                }
                "pretty" => {
                    if pretty.is_some() {
                        return Err(QueryError::Repeated("pretty"));
                    }
                    pretty = Some(parse_flag(value).ok_or(QueryError::Malformed("pretty"))?);
                }
                _ => {
                    // Not part of the product search contract; ignored.
                }
            }
        }

        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(options.default_size);

        if limit > options.max_size {
            return Err(QueryError::SizeTooLarge {
                size: limit,
                max: options.max_size,
            });
        }
        let window = offset.saturating_add(limit);
        if window > options.max_window {
            return Err(QueryError::WindowTooLarge {
                requested: window,
                max: options.max_window,
            });
        }

        Ok(Self {
            term: term.flatten(),
            filters,
            sort,
            offset,
            limit,
            pretty: pretty.unwrap_or(false),
        })
    }
}

/// Parse `field:value`, splitting at the first `:` so values may contain colons.
fn parse_filter(raw: &str) -> Result<Filter> {
    let entry = unescape(raw).ok_or_else(|| QueryError::Escape(raw.to_string()))?;
    let (name, value) = entry
        .split_once(':')
        .ok_or_else(|| QueryError::FilterSyntax(entry.clone()))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(QueryError::FilterSyntax(entry.clone()));
    }

    let field = ProductField::parse(name).ok_or_else(|| QueryError::UnknownField(name.to_string()))?;
    let value = match field.kind() {
        FieldKind::Text => FilterValue::Text(value.to_string()),
        FieldKind::Integer => {
            let parsed = value.parse::<i64>().map_err(|_| QueryError::FieldValue {
                field: field.name(),
                value: value.to_string(),
            })?;
            FilterValue::Integer(parsed)
        }
    };

    Ok(Filter { field, value })
}

fn parse_sort_key(raw: &str) -> Result<SortKey> {
    let entry = raw.trim();
    let parts: Vec<&str> = entry.split(':').collect();
    let [name, direction] = parts.as_slice() else {
        return Err(QueryError::SortSyntax(entry.to_string()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(QueryError::SortSyntax(entry.to_string()));
    }

    let field = ProductField::parse(name).ok_or_else(|| QueryError::UnknownField(name.to_string()))?;
    let direction = SortDirection::parse(direction.trim())
        .ok_or_else(|| QueryError::SortDirection(direction.trim().to_string()))?;

    Ok(SortKey { field, direction })
}

/// Empty values count as absent, matching how HTML forms submit blank inputs.
fn parse_non_negative(param: &'static str, value: &str) -> Result<Option<usize>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<usize>()
        .map(Some)
        .map_err(|_| QueryError::Malformed(param))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn parse(pairs: &[(&str, &str)]) -> Result<SearchRequest> {
        SearchRequest::from_items(&items(pairs))
    }

    #[test]
    fn empty_request_matches_everything_with_defaults() {
        let request = parse(&[]).unwrap();
        assert_eq!(request.term, None);
        assert!(request.filters.is_empty());
        assert!(request.sort.is_empty());
        assert_eq!(request.offset, 0);
        assert_eq!(request.limit, 10);
        assert!(!request.pretty);
    }

    #[test]
    fn blank_term_means_match_everything() {
        let request = parse(&[("q", "   ")]).unwrap();
        assert_eq!(request.term, None);
    }

    #[test]
    fn term_is_trimmed() {
        let request = parse(&[("q", " Nike ")]).unwrap();
        assert_eq!(request.term.as_deref(), Some("Nike"));
    }

    #[test]
    fn filters_preserve_request_order_across_repeats_and_lists() {
        let request = parse(&[
            ("filter", "brand:Nike,price:1500"),
            ("filter", "title:Pegasus Shield"),
        ])
        .unwrap();
        assert_eq!(
            request.filters,
            vec![
                Filter {
                    field: ProductField::Brand,
                    value: FilterValue::Text("Nike".to_string()),
                },
                Filter {
                    field: ProductField::Price,
                    value: FilterValue::Integer(1500),
                },
                Filter {
                    field: ProductField::Title,
                    value: FilterValue::Text("Pegasus Shield".to_string()),
                },
            ]
        );
    }

    #[test]
    fn filter_value_may_contain_colons_and_escaped_commas() {
        let request = parse(&[("filter", r"title:Run: 5k\, fast")]).unwrap();
        assert_eq!(
            request.filters[0].value,
            FilterValue::Text("Run: 5k, fast".to_string())
        );
    }

    #[test]
    fn filter_values_are_trimmed_but_keep_inner_spaces() {
        let request = parse(&[("filter", "brand: Nike ,title:  Pegasus Shield")]).unwrap();
        assert_eq!(
            request.filters[0].value,
            FilterValue::Text("Nike".to_string())
        );
        assert_eq!(
            request.filters[1].value,
            FilterValue::Text("Pegasus Shield".to_string())
        );
        assert_eq!(
            parse(&[("filter", "brand:   ")]).unwrap_err(),
            QueryError::FilterSyntax("brand:   ".to_string())
        );
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert_eq!(
            parse(&[("filter", "brand")]).unwrap_err(),
            QueryError::FilterSyntax("brand".to_string())
        );
        assert_eq!(
            parse(&[("filter", ":Nike")]).unwrap_err(),
            QueryError::FilterSyntax(":Nike".to_string())
        );
        assert_eq!(
            parse(&[("filter", "brand:")]).unwrap_err(),
            QueryError::FilterSyntax("brand:".to_string())
        );
    }

    #[test]
    fn unknown_filter_field_is_rejected() {
        assert_eq!(
            parse(&[("filter", "color:red")]).unwrap_err(),
            QueryError::UnknownField("color".to_string())
        );
    }

    #[test]
    fn integer_filter_requires_integer_value() {
        assert_eq!(
            parse(&[("filter", "price:cheap")]).unwrap_err(),
            QueryError::FieldValue {
                field: "price",
                value: "cheap".to_string(),
            }
        );
    }

    #[test]
    fn invalid_escape_in_filter_is_rejected() {
        assert!(matches!(
            parse(&[("filter", r"title:a\b")]).unwrap_err(),
            QueryError::Escape(_)
        ));
    }

    #[test]
    fn sort_keys_keep_order_and_accept_any_case_direction() {
        let request = parse(&[("sort", "title:ASC"), ("sort", "price:desc,stock:Asc")]).unwrap();
        assert_eq!(
            request.sort,
            vec![
                SortKey {
                    field: ProductField::Title,
                    direction: SortDirection::Asc,
                },
                SortKey {
                    field: ProductField::Price,
                    direction: SortDirection::Desc,
                },
                SortKey {
                    field: ProductField::Stock,
                    direction: SortDirection::Asc,
                },
            ]
        );
    }

    #[test]
    fn sort_requires_exactly_field_and_direction() {
        assert_eq!(
            parse(&[("sort", "price")]).unwrap_err(),
            QueryError::SortSyntax("price".to_string())
        );
        assert_eq!(
            parse(&[("sort", "price:desc:text")]).unwrap_err(),
            QueryError::SortSyntax("price:desc:text".to_string())
        );
        assert_eq!(
            parse(&[("sort", "price:down")]).unwrap_err(),
            QueryError::SortDirection("down".to_string())
        );
        assert_eq!(
            parse(&[("sort", "rating:asc")]).unwrap_err(),
            QueryError::UnknownField("rating".to_string())
        );
    }

    #[test]
    fn pagination_is_parsed_and_validated() {
        let request = parse(&[("from", "11"), ("size", "23")]).unwrap();
        assert_eq!((request.offset, request.limit), (11, 23));

        assert_eq!(
            parse(&[("from", "abc")]).unwrap_err(),
            QueryError::Malformed("from")
        );
        assert_eq!(
            parse(&[("from", "-1")]).unwrap_err(),
            QueryError::Malformed("from")
        );
        assert_eq!(
            parse(&[("size", "-1")]).unwrap_err(),
            QueryError::Malformed("size")
        );
        assert_eq!(
            parse(&[("size", "1.5")]).unwrap_err(),
            QueryError::Malformed("size")
        );
    }

    #[test]
    fn zero_size_is_valid() {
        let request = parse(&[("size", "0")]).unwrap();
        assert_eq!(request.limit, 0);
    }

    #[test]
    fn default_size_cap_is_the_result_window() {
        let request = parse(&[("size", "120")]).unwrap();
        assert_eq!(request.limit, 120);

        let request = parse(&[("size", "10000")]).unwrap();
        assert_eq!(request.limit, 10_000);

        assert_eq!(
            parse(&[("from", "1"), ("size", "10000")]).unwrap_err(),
            QueryError::WindowTooLarge {
                requested: 10_001,
                max: 10_000,
            }
        );
    }

    #[test]
    fn blank_pagination_values_fall_back_to_defaults() {
        let request = parse(&[("from", ""), ("size", "")]).unwrap();
        assert_eq!((request.offset, request.limit), (0, 10));
    }

    #[test]
    fn size_and_window_limits_are_enforced() {
        let options = ParseOptions {
            default_size: 5,
            max_size: 20,
            max_window: 50,
        };
        let too_big = items(&[("size", "21")]);
        assert_eq!(
            SearchRequest::from_items_with(&too_big, &options).unwrap_err(),
            QueryError::SizeTooLarge { size: 21, max: 20 }
        );

        let too_deep = items(&[("from", "40"), ("size", "11")]);
        assert_eq!(
            SearchRequest::from_items_with(&too_deep, &options).unwrap_err(),
            QueryError::WindowTooLarge {
                requested: 51,
                max: 50,
            }
        );

        let defaulted = SearchRequest::from_items_with(&[], &options).unwrap();
        assert_eq!(defaulted.limit, 5);
    }

    #[test]
    fn single_valued_parameters_must_not_repeat() {
        assert_eq!(
            parse(&[("q", "a"), ("q", "b")]).unwrap_err(),
            QueryError::Repeated("q")
        );
        assert_eq!(
            parse(&[("size", "1"), ("size", "2")]).unwrap_err(),
            QueryError::Repeated("size")
        );
    }

    #[test]
    fn pretty_flag_accepts_form_values() {
        assert!(parse(&[("pretty", "yes")]).unwrap().pretty);
        assert!(parse(&[("pretty", "")]).unwrap().pretty);
        assert!(!parse(&[("pretty", "false")]).unwrap().pretty);
        assert_eq!(
            parse(&[("pretty", "maybe")]).unwrap_err(),
            QueryError::Malformed("pretty")
        );
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let request = parse(&[("q", "Nike"), ("utm_source", "mail")]).unwrap();
        assert_eq!(request.term.as_deref(), Some("Nike"));
    }
}
