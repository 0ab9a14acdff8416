//! Pagination, sort, and search parameters for the read endpoints.
//!
//! The server takes a single sort expression per request, written `field,direction`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::form_urlencoded;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortParseError {
    #[error("sort field must not be empty")]
    EmptyField,
    #[error("unknown sort direction `{0}`, expected `asc` or `desc`")]
    Direction(String),
}

/// One sort field plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }

    /// Column-header behaviour: clicking the active column flips its
    /// direction, clicking another column sorts it ascending.
    pub fn toggled(&self, field: &str) -> Self {
        if self.field == field {
            Self {
                field: self.field.clone(),
                direction: self.direction.flipped(),
            }
        } else {
            Self::asc(field)
        }
    }

    /// Default ordering for the list endpoint.
    pub fn list_default() -> Self {
        Self::asc("nomorInduk")
    }

    /// Default ordering for the search endpoint.
    pub fn search_default() -> Self {
        Self::asc("namaDepan")
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction.as_str())
    }
}

impl FromStr for Sort {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(',') {
            Some((field, dir)) => (field.trim(), dir.trim()),
            None => (s.trim(), "asc"),
        };
        if field.is_empty() {
            return Err(SortParseError::EmptyField);
        }
        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(SortParseError::Direction(other.to_string())),
        };
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Parameters of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListParams {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::list_default(),
        }
    }
}

impl ListParams {
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("page", &self.page.to_string())
            .append_pair("size", &self.size.to_string())
            .append_pair("sort", &self.sort.to_string())
            .finish()
    }
}

/// Parameters of the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchParams {
    pub keyword: String,
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl SearchParams {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::search_default(),
        }
    }

    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("keyword", &self.keyword)
            .append_pair("page", &self.page.to_string())
            .append_pair("size", &self.size.to_string())
            .append_pair("sort", &self.sort.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_roundtrips_through_wire_form() {
        let sort: Sort = "usia,desc".parse().unwrap();
        assert_eq!(sort, Sort::desc("usia"));
        assert_eq!(sort.to_string(), "usia,desc");
    }

    #[test]
    fn sort_without_direction_defaults_to_asc() {
        let sort: Sort = "namaDepan".parse().unwrap();
        assert_eq!(sort, Sort::asc("namaDepan"));
    }

    #[test]
    fn sort_rejects_bad_input() {
        assert_eq!("".parse::<Sort>(), Err(SortParseError::EmptyField));
        assert_eq!(
            "usia,up".parse::<Sort>(),
            Err(SortParseError::Direction("up".to_string()))
        );
    }

    #[test]
    fn toggling_same_field_flips_direction() {
        let sort = Sort::asc("namaDepan");
        assert_eq!(sort.toggled("namaDepan"), Sort::desc("namaDepan"));
        assert_eq!(sort.toggled("namaDepan").toggled("namaDepan"), sort);
    }

    #[test]
    fn toggling_other_field_starts_ascending() {
        let sort = Sort::desc("namaDepan");
        assert_eq!(sort.toggled("usia"), Sort::asc("usia"));
    }

    #[test]
    fn list_query_string_uses_defaults() {
        assert_eq!(
            ListParams::default().query_string(),
            "page=0&size=10&sort=nomorInduk%2Casc"
        );
    }

    #[test]
    fn search_query_string_encodes_keyword() {
        let params = SearchParams::new("budi santoso");
        assert_eq!(
            params.query_string(),
            "keyword=budi+santoso&page=0&size=10&sort=namaDepan%2Casc"
        );
    }
}
