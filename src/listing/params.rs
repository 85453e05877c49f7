use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::categories::CategoryMap;
use crate::errors::DirectoryError;
use crate::query::{Filter, Order};
use crate::restaurant::AVERAGE_RATING_FIELD;

const DEFAULT_SORT_FIELD: &str = "name";
const NAME_PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// `/restaurants` query string exactly as received. Every field is optional
/// and untyped; [`parse_listing`] turns it into a [`ListingQuery`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawListingParams {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub borough: Option<String>,
    pub grade: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl RawListingParams {
    /// Builds the parameters from decoded query pairs. When a key repeats, the
    /// first occurrence wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut p = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "name" => &mut p.name,
                "cuisine" => &mut p.cuisine,
                "borough" => &mut p.borough,
                "grade" => &mut p.grade,
                "category" => &mut p.category,
                "page" => &mut p.page,
                "limit" => &mut p.limit,
                "sortBy" => &mut p.sort_by,
                "order" => &mut p.order,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        p
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self { default_limit: 20, max_limit: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// The derived mean of grade scores.
    AverageRating,
    /// Any stored field, possibly dotted.
    Field(String),
}

impl SortKey {
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::AverageRating => AVERAGE_RATING_FIELD,
            Self::Field(f) => f,
        }
    }
}

/// Validated listing request.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub filter: Filter,
    /// 1-based, echoed back as `currentPage`.
    pub page: usize,
    pub limit: usize,
    pub offset: usize,
    pub sort: SortKey,
    pub order: Order,
}

/// Builds the filter and paging for one listing request.
///
/// # Errors
/// `InvalidCategories` when `category` is given but none of its names resolve
/// to a cuisine; `InvalidParameter` when the `name` pattern cannot be compiled.
pub fn parse_listing(
    raw: &RawListingParams,
    categories: &CategoryMap,
    limits: &PageLimits,
) -> Result<ListingQuery, DirectoryError> {
    let mut filters = Vec::new();

    if let Some(name) = present(raw.name.as_deref()) {
        let regex = RegexBuilder::new(&regex::escape(name))
            .case_insensitive(true)
            .size_limit(NAME_PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|e| DirectoryError::InvalidParameter(format!("name: {e}")))?;
        filters.push(Filter::Regex { path: "name".to_string(), regex });
    }

    // `category` replaces `cuisine` rather than narrowing it.
    if let Some(category) = present(raw.category.as_deref()) {
        let cuisines = categories.resolve_all(split_list(category));
        if cuisines.is_empty() {
            return Err(DirectoryError::InvalidCategories);
        }
        filters.push(Filter::one_of("cuisine", cuisines));
    } else if let Some(f) = list_filter("cuisine", raw.cuisine.as_deref()) {
        filters.push(f);
    }
    if let Some(f) = list_filter("borough", raw.borough.as_deref()) {
        filters.push(f);
    }
    if let Some(f) = list_filter("grades.grade", raw.grade.as_deref()) {
        filters.push(f);
    }

    let page = positive_or("page", raw.page.as_deref(), 1);
    let mut limit = positive_or("limit", raw.limit.as_deref(), limits.default_limit);
    if limit > limits.max_limit {
        log::debug!("limit {limit} capped at {}", limits.max_limit);
        limit = limits.max_limit;
    }

    let sort = match present(raw.sort_by.as_deref()) {
        Some(AVERAGE_RATING_FIELD) => SortKey::AverageRating,
        Some(field) => SortKey::Field(field.to_string()),
        None => SortKey::Field(DEFAULT_SORT_FIELD.to_string()),
    };
    let order = if raw.order.as_deref() == Some("desc") { Order::Desc } else { Order::Asc };

    Ok(ListingQuery {
        filter: Filter::and(filters),
        page,
        limit,
        offset: (page - 1).saturating_mul(limit),
        sort,
        order,
    })
}

fn present(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

fn split_list(v: &str) -> impl Iterator<Item = &str> {
    v.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn list_filter(path: &str, raw: Option<&str>) -> Option<Filter> {
    let values: Vec<&str> = split_list(present(raw)?).collect();
    if values.is_empty() {
        return None;
    }
    Some(Filter::one_of(path, values))
}

fn positive_or(param: &str, raw: Option<&str>, default: usize) -> usize {
    let Some(s) = present(raw) else {
        return default;
    };
    match s.trim().parse::<usize>() {
        Ok(0) => {
            log::debug!("{param}=0 raised to 1");
            1
        }
        Ok(n) => n,
        Err(_) => {
            log::debug!("{param}=`{s}` is not a positive integer, using {default}");
            default
        }
    }
}
