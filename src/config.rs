//! Backend address resolution.
//!
//! The base URL comes from `--api-url`, then the `TASKDECK_API_URL`
//! environment variable, then a local default.

/// Default backend address when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the backend address.
pub const API_URL_ENV: &str = "TASKDECK_API_URL";

/// Resolve the backend base URL from the CLI override and the environment.
pub fn api_base_url(cli_override: Option<String>) -> String {
    let url = cli_override
        .or_else(|| std::env::var(API_URL_ENV).ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    normalize_base_url(&url)
}

/// Trim whitespace and any trailing slash so paths can be appended directly.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_wins() {
        let url = api_base_url(Some("http://10.0.0.2:8080/api/".into()));
        assert_eq!(url, "http://10.0.0.2:8080/api");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(normalize_base_url("http://x/api/"), "http://x/api");
        assert_eq!(normalize_base_url("  http://x/api  "), "http://x/api");
    }
}
