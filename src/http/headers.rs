// Response metadata: alert headers and pagination headers

use crate::paging::Page;
use anyhow::{Context, Result};
use axum::http::header::{HeaderName, HeaderValue, LINK};
use axum::http::HeaderMap;
use tracing::warn;

pub const TOTAL_COUNT: &str = "x-total-count";

/// `X-{app}-alert`, `X-{app}-error` and `X-{app}-params` headers
#[derive(Debug, Clone)]
pub struct AlertHeaders {
    alert: HeaderName,
    error: HeaderName,
    params: HeaderName,
}

impl AlertHeaders {
    pub fn new(app_name: &str) -> Result<Self> {
        let name = |suffix: &str| {
            HeaderName::try_from(format!("X-{}-{}", app_name, suffix))
                .with_context(|| format!("'{}' cannot be used in a header name", app_name))
        };

        Ok(AlertHeaders {
            alert: name("alert")?,
            error: name("error")?,
            params: name("params")?,
        })
    }

    pub fn entity_created(&self, entity: &str, id: &str) -> HeaderMap {
        self.alert_with(id, |id| format!("A new {} is created with identifier {}", entity, id))
    }

    pub fn entity_updated(&self, entity: &str, id: &str) -> HeaderMap {
        self.alert_with(id, |id| format!("A {} is updated with identifier {}", entity, id))
    }

    pub fn entity_deleted(&self, entity: &str, id: &str) -> HeaderMap {
        self.alert_with(id, |id| format!("A {} is deleted with identifier {}", entity, id))
    }

    pub fn failure(&self, entity: &str, message_key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert(&mut headers, self.error.clone(), message_key);
        insert(&mut headers, self.params.clone(), entity);
        headers
    }

    /// Identifiers are percent-encoded so any id yields a valid header value
    fn alert_with(&self, id: &str, message: impl FnOnce(&str) -> String) -> HeaderMap {
        let id = urlencoding::encode(id);

        let mut headers = HeaderMap::new();
        insert(&mut headers, self.alert.clone(), &message(id.as_ref()));
        insert(&mut headers, self.params.clone(), &id);
        headers
    }
}

/// `X-Total-Count` plus an RFC 5988 `Link` header with next/prev/last/first
pub fn pagination_headers<T>(page: &Page<T>, base_path: &str) -> HeaderMap {
    let uri = |number: u64| format!("{}?page={}&size={}", base_path, number, page.size);
    let number = u64::from(page.number);

    let mut links = Vec::with_capacity(4);
    if page.has_next() {
        links.push(format!("<{}>; rel=\"next\"", uri(number + 1)));
    }
    if page.has_previous() {
        links.push(format!("<{}>; rel=\"prev\"", uri(number - 1)));
    }
    let last = page.total_pages().saturating_sub(1);
    links.push(format!("<{}>; rel=\"last\"", uri(last)));
    links.push(format!("<{}>; rel=\"first\"", uri(0)));

    let mut headers = HeaderMap::new();
    insert(
        &mut headers,
        HeaderName::from_static(TOTAL_COUNT),
        &page.total_elements.to_string(),
    );
    insert(&mut headers, LINK, &links.join(","));
    headers
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => warn!(header = %name, value, "Dropping header with invalid characters"),
    }
}
