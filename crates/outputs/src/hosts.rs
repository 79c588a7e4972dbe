//! Host normalisation for agent-facing Elasticsearch URLs.
//!
//! Agents do not apply a scheme's default port on their own, so stored hosts
//! always carry an explicit port.

use url::Url;

/// Normalise a host URL into the form agents expect.
///
/// - A missing port becomes the scheme default (443 for https, 80 for http).
/// - A lone trailing `/` path is dropped.
/// - Input that does not parse as a URL is returned unchanged.
pub fn normalize_host_for_agents(host: &str) -> String {
    let Ok(url) = Url::parse(host) else {
        return host.to_string();
    };

    let default_port = match url.scheme() {
        "https" => 443,
        "http" => 80,
        _ => return trim_trailing_slash(host),
    };

    // `Url` strips a port equal to the scheme default, so inspect the raw text.
    if url.port().is_some() || has_explicit_port(host, url.host_str()) {
        return trim_trailing_slash(host);
    }

    let Some(hostname) = url.host_str() else {
        return host.to_string();
    };
    let path = match url.path() {
        "/" => "",
        path => path,
    };
    let userinfo = match (url.username(), url.password()) {
        ("", None) => String::new(),
        (user, None) => format!("{user}@"),
        (user, Some(password)) => format!("{user}:{password}@"),
    };

    format!(
        "{}://{userinfo}{hostname}:{default_port}{path}",
        url.scheme()
    )
}

fn has_explicit_port(raw: &str, hostname: Option<&str>) -> bool {
    let Some(hostname) = hostname else {
        return false;
    };
    let after_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    // Userinfo may contain `host:` too; only the part after the last `@` names the host.
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    host_port
        .to_ascii_lowercase()
        .strip_prefix(&hostname.to_ascii_lowercase())
        .is_some_and(|rest| rest.starts_with(':'))
}

fn trim_trailing_slash(host: &str) -> String {
    host.strip_suffix('/').unwrap_or(host).to_string()
}
