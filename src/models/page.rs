use serde::{Deserialize, Serialize};

fn first_page() -> u32 {
    1
}

/// Laravel-style pagination envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "super::null_as_default")]
    pub data: Vec<T>,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::single(Vec::new())
    }
}

impl<T> Page<T> {
    /// A one-page result, used when the backend returns a bare array.
    pub fn single(data: Vec<T>) -> Self {
        Self {
            data,
            current_page: 1,
            last_page: 1,
            per_page: None,
            total: None,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn previous_page(&self) -> u32 {
        self.current_page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> u32 {
        (self.current_page + 1).min(self.last_page.max(1))
    }
}

/// List responses come either flat (`{data: [..], current_page}`) or wrapped
/// once more (`{data: {data: [..], current_page}}`) depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PageEnvelope<T> {
    Flat(Page<T>),
    Wrapped { data: Page<T> },
}

impl<T> PageEnvelope<T> {
    pub(crate) fn into_page(self) -> Page<T> {
        match self {
            PageEnvelope::Wrapped { data } => data,
            PageEnvelope::Flat(page) => page,
        }
    }
}

/// Either a paginated block or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PageOrList<T> {
    List(Vec<T>),
    Page(Page<T>),
}

impl<T> From<PageOrList<T>> for Page<T> {
    fn from(value: PageOrList<T>) -> Self {
        match value {
            PageOrList::List(items) => Page::single(items),
            PageOrList::Page(page) => page,
        }
    }
}
