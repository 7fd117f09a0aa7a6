//! Pagination utilities for the service layer.
//!
//! Provides the window specification handed to repositories and the
//! serializable page envelope returned to the boundary.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 12;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Window specification from the API boundary. `page` is the 0-based
/// window index, matching the store paginator.
#[derive(Clone, Debug, Default)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub size: Option<u64>,
    /// Raw `field[,asc|desc]` clause, resolved by the service.
    pub sort: Option<String>,
}

impl PageRequest {
    /// Clamp to sane bounds and fill defaults.
    pub fn normalize(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(0);
        let size = self
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parsed sort clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut parts = raw.splitn(2, ',');
        let field = parts.next().unwrap_or("").trim();
        if field.is_empty() {
            return Err("sort field is empty".to_string());
        }
        let direction = match parts.next().map(str::trim) {
            None | Some("") | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => return Err(format!("unknown sort direction: {}", other)),
        };
        Ok(Sort {
            field: field.to_string(),
            direction,
        })
    }
}

/// One window of results plus the bookkeeping the boundary serializes.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_fills_defaults() {
        let (page, size) = PageRequest::default().normalize();
        assert_eq!(page, 0);
        assert_eq!(size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn normalize_clamps_bounds() {
        let req = PageRequest {
            page: Some(5),
            size: Some(1000),
            sort: None,
        };
        assert_eq!(req.normalize(), (5, MAX_PAGE_SIZE));
        let req = PageRequest {
            page: None,
            size: Some(0),
            sort: None,
        };
        assert_eq!(req.normalize(), (0, 1));
    }

    #[test]
    fn sort_parse_defaults_to_ascending() {
        let s = Sort::parse("name").expect("parse");
        assert_eq!(s.field, "name");
        assert_eq!(s.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_parse_reads_direction() {
        let s = Sort::parse("price,desc").expect("parse");
        assert_eq!(s.field, "price");
        assert_eq!(s.direction, SortDirection::Desc);
    }

    #[test]
    fn sort_parse_rejects_garbage() {
        assert!(Sort::parse("").is_err());
        assert!(Sort::parse(" ,asc").is_err());
        assert!(Sort::parse("name,sideways").is_err());
    }
}
