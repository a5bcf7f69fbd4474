//! URL helpers for project and milestone links

use url::Url;

/// Returns true if the string is a URL with both a scheme and a host
pub fn is_absolute(s: &str) -> bool {
    Url::parse(s)
        .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false)
}

/// Returns true if the string parses as a URL at all
pub fn is_valid(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Joins a path onto a base URL with exactly one slash between them
pub fn join(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Resolves a link against a base URL unless it is already absolute
pub fn resolve(base_url: &str, link: &str) -> String {
    if base_url.is_empty() || is_absolute(link) {
        return link.to_string();
    }

    join(base_url, link)
}
