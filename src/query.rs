// Paginated query/filter contract shared by the policy and bid listings

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// List request: pagination plus keyword/region/industry filters.
///
/// An absent filter means "no filter", not "empty set"; absent fields are
/// omitted from the encoded query string entirely.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub keywords: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    pub fn regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    pub fn industries<I, S>(mut self, industries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.industries = Some(industries.into_iter().map(Into::into).collect());
        self
    }

    pub fn date_range(mut self, start: &str, end: &str) -> Self {
        self.date_range = Some(DateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
        self
    }

    /// Effective page, after defaulting. Clamped to >= 1 so a direct
    /// field write cannot smuggle `page=0` onto the wire.
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    /// Effective page size, after defaulting and clamping.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// Encode into transport-level query parameters.
    ///
    /// `page` and `pageSize` are always sent; set-valued filters are sent
    /// as repeated parameters (`regions=a&regions=b`).
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.effective_page().to_string()),
            (
                "pageSize".to_string(),
                self.effective_page_size().to_string(),
            ),
        ];

        for (name, values) in [
            ("keywords", &self.keywords),
            ("regions", &self.regions),
            ("industries", &self.industries),
        ] {
            if let Some(values) = values {
                for value in values {
                    params.push((name.to_string(), value.clone()));
                }
            }
        }

        if let Some(range) = &self.date_range {
            params.push(("startDate".to_string(), range.start.clone()));
            params.push(("endDate".to_string(), range.end.clone()));
        }

        params
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    /// Well-formed empty page, echoing the requested pagination.
    /// Used by the degrade-to-empty policy on list-fetch failures.
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page,
            page_size,
            total_pages: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Monotonic fetch tickets for callers racing concurrent list fetches.
///
/// Two fetches issued from a rapid filter change complete in arbitrary
/// order; a caller applies a result only while its ticket is still the
/// latest issued, so a superseded response never overwrites a newer one.
#[derive(Debug, Default)]
pub struct FetchSequence {
    next: AtomicU64,
}

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket, superseding all earlier ones.
    pub fn begin(&self) -> FetchTicket<'_> {
        let id = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket { sequence: self, id }
    }
}

#[derive(Debug)]
pub struct FetchTicket<'a> {
    sequence: &'a FetchSequence,
    id: u64,
}

impl FetchTicket<'_> {
    /// True while no newer fetch has been issued.
    pub fn is_current(&self) -> bool {
        self.sequence.next.load(Ordering::SeqCst) == self.id
    }
}
