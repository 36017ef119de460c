use std::fmt;

use url::form_urlencoded;

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_RECORD_ID};

pub const LIST_PATH: &str = "/knitting/list";
pub const CREATE_PATH: &str = "/knitting/create";
pub const UPDATE_PATH: &str = "/knitting/update";

/// The views of the diary and their entry parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List { page: u32, size: u32 },
    Create,
    /// `id == 0` means no record.
    Update { id: i64 },
}

impl Route {
    /// Parses `path?query`. Missing or unparsable parameters take their
    /// defaults; unknown paths are `None`.
    pub fn parse(href: &str) -> Option<Route> {
        let (path, query) = href.split_once('?').unwrap_or((href, ""));
        let param = |name: &str| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };

        match path.trim_end_matches('/') {
            "" | LIST_PATH => Some(Route::List {
                page: param("page")
                    .and_then(|v| v.parse().ok())
                    .filter(|p| *p >= 1)
                    .unwrap_or(DEFAULT_PAGE),
                size: param("size")
                    .and_then(|v| v.parse().ok())
                    .filter(|s| *s >= 1)
                    .unwrap_or(DEFAULT_PAGE_SIZE),
            }),
            CREATE_PATH => Some(Route::Create),
            UPDATE_PATH => Some(Route::Update {
                id: param("id")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RECORD_ID),
            }),
            _ => None,
        }
    }

    pub fn to_href(&self) -> String {
        match self {
            Route::List { page, size } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("page", &page.to_string())
                    .append_pair("size", &size.to_string())
                    .finish();
                format!("{}?{}", LIST_PATH, query)
            }
            Route::Create => CREATE_PATH.to_string(),
            Route::Update { id } => format!("{}?id={}", UPDATE_PATH, id),
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::List {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_href())
    }
}
