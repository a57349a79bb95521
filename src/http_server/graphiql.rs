//! GraphiQL page served to browsers on the GraphQL endpoint

use axum::http::{header::ACCEPT, HeaderMap};

/// Renders the GraphiQL page pointed at `endpoint`
pub fn graphiql_page(endpoint: &str) -> String {
    const TEMPLATE: &str = include_str!("../../templates/graphiql.html");
    // A JSON string literal is also a valid JS string literal
    let endpoint = serde_json::Value::String(endpoint.to_string()).to_string();
    TEMPLATE.replace("{{ENDPOINT}}", &endpoint)
}

/// True when any `Accept` header lists `text/html`
pub fn prefers_html(headers: &HeaderMap) -> bool {
    headers.get_all(ACCEPT).iter().any(|value| {
        value
            .to_str()
            .map(|accept| {
                accept.split(',').any(|media| {
                    let essence = media.split(';').next().unwrap_or_default().trim();
                    essence.eq_ignore_ascii_case("text/html")
                })
            })
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_browser_accept_prefers_html() {
        assert!(prefers_html(&accept(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
        )));
        assert!(prefers_html(&accept("application/json, TEXT/HTML; q=0.5")));
    }

    #[test]
    fn test_api_clients_do_not_prefer_html() {
        assert!(!prefers_html(&HeaderMap::new()));
        assert!(!prefers_html(&accept("application/json")));
        assert!(!prefers_html(&accept("*/*")));
    }

    #[test]
    fn test_page_targets_endpoint() {
        let page = graphiql_page("/api/graphql");
        assert!(page.contains(r#"url: "/api/graphql""#));
        assert!(!page.contains("{{ENDPOINT}}"));
    }
}
