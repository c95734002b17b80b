//! Per-request context: request id and locale.
//!
//! Transport middleware builds a [`RequestContext`] from the incoming request
//! and runs the handler inside [`scope`]. Anything below it (the error
//! factory, the formatters) reads the context with [`current`] instead of
//! taking it as a parameter.
//!
//! ```ignore
//! let ctx = RequestContext::new(header_request_id, Some("id".into()));
//! let response = core_errors::context::scope(ctx, handler(req)).await;
//! ```

use std::future::Future;
use std::sync::{Arc, OnceLock};

use crate::i18n::{self, DEFAULT_LOCALE, base_language, normalize_locale};

/// Header carrying the request id (HTTP header and gRPC metadata key).
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Header carrying the caller's preferred languages.
pub const ACCEPT_LANGUAGE_HEADER: &str = "accept-language";

tokio::task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Generate a fresh request id (UUID v4).
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Request id and locale of the request being served.
///
/// The request id is generated on first read when the caller did not supply
/// one; clones share it, so every reader sees the same value.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Arc<OnceLock<String>>,
    locale: String,
}

impl RequestContext {
    /// Build a context from optional transport values.
    ///
    /// Blank values count as absent.
    pub fn new(request_id: Option<String>, locale: Option<String>) -> Self {
        let request_id_cell = OnceLock::new();
        if let Some(id) = request_id.filter(|id| !id.trim().is_empty()) {
            let _ = request_id_cell.set(id.trim().to_string());
        }

        let locale = locale
            .filter(|locale| !locale.trim().is_empty())
            .map(|locale| normalize_locale(&locale))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Self {
            request_id: Arc::new(request_id_cell),
            locale,
        }
    }

    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self::new(Some(request_id.into()), None)
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        if !locale.trim().is_empty() {
            self.locale = normalize_locale(locale);
        }
        self
    }

    /// Request id, generated on first call if none was supplied.
    pub fn request_id(&self) -> &str {
        self.request_id.get_or_init(new_request_id)
    }

    /// True when the id came from the caller or was already generated.
    pub fn has_request_id(&self) -> bool {
        self.request_id.get().is_some()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Run `future` with `ctx` as the current context.
pub async fn scope<F>(ctx: RequestContext, future: F) -> F::Output
where
    F: Future,
{
    REQUEST_CONTEXT.scope(ctx, future).await
}

/// Run `f` synchronously with `ctx` as the current context.
pub fn sync_scope<F, R>(ctx: RequestContext, f: F) -> R
where
    F: FnOnce() -> R,
{
    REQUEST_CONTEXT.sync_scope(ctx, f)
}

/// Context of the enclosing [`scope`], if any.
pub fn try_current() -> Option<RequestContext> {
    REQUEST_CONTEXT.try_with(|ctx| ctx.clone()).ok()
}

/// Context of the enclosing [`scope`], or a fresh default one outside a scope.
pub fn current() -> RequestContext {
    try_current().unwrap_or_default()
}

pub fn current_request_id() -> String {
    current().request_id().to_string()
}

pub fn current_locale() -> String {
    current().locale().to_string()
}

/// Pick the best of `supported` for an `Accept-Language` header value.
///
/// Honors `q=` weights, matches region tags against their primary language
/// (`id-ID` → `id`) and ignores `*`. Returns `None` when nothing matches.
pub fn negotiate_locale(accept_language: &str, supported: &[&str]) -> Option<String> {
    let mut candidates: Vec<(String, f32, usize)> = accept_language
        .split(',')
        .enumerate()
        .filter_map(|(position, part)| {
            let mut pieces = part.split(';');
            let tag = normalize_locale(pieces.next()?);
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = pieces
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some((tag, quality, position))
        })
        .collect();

    // Highest weight first; equal weights keep header order.
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.2.cmp(&b.2)));

    let supported: Vec<String> = supported.iter().map(|s| normalize_locale(s)).collect();

    candidates.iter().find_map(|(tag, _, _)| {
        supported
            .iter()
            .find(|s| *s == tag)
            .or_else(|| supported.iter().find(|s| s.as_str() == base_language(tag)))
            .cloned()
    })
}

fn header_str<'a>(headers: &'a http::HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Context for incoming HTTP headers or gRPC metadata.
///
/// Keeps `x-request-id` when present. The locale is the best
/// `Accept-Language` match among the installed locales, or the catalog
/// fallback when nothing matches.
pub fn from_headers(headers: &http::HeaderMap) -> RequestContext {
    let request_id = header_str(headers, REQUEST_ID_HEADER).map(str::to_string);

    let catalog = i18n::catalog();
    let locale = header_str(headers, ACCEPT_LANGUAGE_HEADER)
        .and_then(|accept| negotiate_locale(accept, &catalog.locales()))
        .unwrap_or_else(|| catalog.fallback().to_string());

    RequestContext::new(request_id, Some(locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplied_request_id_is_kept() {
        let ctx = RequestContext::new(Some("req-1".into()), None);
        assert!(ctx.has_request_id());
        assert_eq!(ctx.request_id(), "req-1");
        assert_eq!(ctx.locale(), "en");
    }

    #[test]
    fn test_request_id_is_generated_lazily_and_stable() {
        let ctx = RequestContext::default();
        assert!(!ctx.has_request_id());

        let clone = ctx.clone();
        let first = ctx.request_id().to_string();
        assert!(uuid::Uuid::parse_str(&first).is_ok());
        assert_eq!(ctx.request_id(), first);
        assert_eq!(clone.request_id(), first);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let ctx = RequestContext::new(Some("  ".into()), Some("".into()));
        assert!(!ctx.has_request_id());
        assert_eq!(ctx.locale(), "en");
    }

    #[test]
    fn test_locale_is_normalized() {
        let ctx = RequestContext::default().with_locale("ID_id");
        assert_eq!(ctx.locale(), "id-id");
    }

    #[tokio::test]
    async fn test_scope_exposes_context() {
        let ctx = RequestContext::new(Some("scoped".into()), Some("id".into()));
        let (request_id, locale) =
            scope(ctx, async { (current_request_id(), current_locale()) }).await;
        assert_eq!(request_id, "scoped");
        assert_eq!(locale, "id");
    }

    #[tokio::test]
    async fn test_generated_id_is_shared_within_scope() {
        let ids = scope(RequestContext::default(), async {
            let first = current_request_id();
            tokio::task::yield_now().await;
            (first, current_request_id())
        })
        .await;
        assert_eq!(ids.0, ids.1);
    }

    #[tokio::test]
    async fn test_concurrent_scopes_are_isolated() {
        let a = tokio::spawn(scope(RequestContext::with_request_id("a"), async {
            tokio::task::yield_now().await;
            current_request_id()
        }));
        let b = tokio::spawn(scope(RequestContext::with_request_id("b"), async {
            tokio::task::yield_now().await;
            current_request_id()
        }));
        assert_eq!(a.await.unwrap(), "a");
        assert_eq!(b.await.unwrap(), "b");
    }

    #[test]
    fn test_outside_scope_defaults() {
        assert!(try_current().is_none());
        assert_eq!(current_locale(), "en");
        assert!(!current_request_id().is_empty());
    }

    #[test]
    fn test_sync_scope() {
        let locale = sync_scope(RequestContext::default().with_locale("id"), current_locale);
        assert_eq!(locale, "id");
    }

    #[test]
    fn test_negotiate_locale_honors_quality() {
        let supported = ["en", "id"];
        assert_eq!(
            negotiate_locale("en;q=0.5, id;q=0.9", &supported).as_deref(),
            Some("id")
        );
        assert_eq!(
            negotiate_locale("fr, en;q=0.1", &supported).as_deref(),
            Some("en")
        );
    }

    #[test]
    fn test_negotiate_locale_matches_region_tags() {
        assert_eq!(
            negotiate_locale("id-ID,id;q=0.9,en-US;q=0.8", &["en", "id"]).as_deref(),
            Some("id")
        );
    }

    #[test]
    fn test_negotiate_locale_no_match() {
        assert_eq!(negotiate_locale("fr, de;q=0.5, *", &["en", "id"]), None);
        assert_eq!(negotiate_locale("id;q=0", &["en", "id"]), None);
        assert_eq!(negotiate_locale("", &["en"]), None);
    }

    #[test]
    fn test_from_headers() {
        let mut headers = http::HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "abc-123".parse().unwrap());
        headers.insert(ACCEPT_LANGUAGE_HEADER, "id-ID,id;q=0.9,en;q=0.8".parse().unwrap());

        let ctx = from_headers(&headers);
        assert_eq!(ctx.request_id(), "abc-123");
        assert_eq!(ctx.locale(), "id");
    }

    #[test]
    fn test_from_headers_unsupported_language_uses_fallback() {
        let mut headers = http::HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE_HEADER, "fr-FR,de;q=0.5".parse().unwrap());

        let ctx = from_headers(&headers);
        assert_eq!(ctx.locale(), "en");
        assert!(!ctx.has_request_id());
    }
}
