//! Best-effort browser/platform extraction from a `User-Agent` header.
//!
//! The result feeds the login history only. Anything unrecognised comes back
//! as an empty string; parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

/// Browser and platform names recorded with each login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub browser: String,
    pub platform: String,
}

/// Ordered so that more specific tokens win: Edge and Opera both carry a
/// `Chrome/` token, and Chrome carries a `Safari/` token.
static BROWSERS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile(&[
        (r"Edg(e|A|iOS)?/", "Edge"),
        (r"(OPR|Opera)/", "Opera"),
        (r"SamsungBrowser/", "Samsung Browser"),
        (r"(Firefox|FxiOS)/", "Firefox"),
        (r"(Chrome|CriOS)/", "Chrome"),
        (r"Mobile/\S+ Safari/|Version/\S+ Mobile/\S+ Safari/", "Mobile Safari"),
        (r"Version/\S+ Safari/", "Safari"),
        (r"MSIE |Trident/", "IE"),
    ])
});

/// Android before Linux and iOS before macOS, for the same reason.
static PLATFORMS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile(&[
        (r"Windows", "Windows"),
        (r"Android", "Android"),
        (r"iPhone|iPad|iPod", "iOS"),
        (r"CrOS", "Chromium OS"),
        (r"Mac OS X|Macintosh", "Mac OS"),
        (r"Ubuntu", "Ubuntu"),
        (r"Linux|X11", "Linux"),
    ])
});

fn compile(table: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    table
        .iter()
        .filter_map(|(pattern, name)| Regex::new(pattern).ok().map(|re| (re, *name)))
        .collect()
}

fn first_match(table: &[(Regex, &'static str)], ua: &str) -> String {
    table
        .iter()
        .find(|(re, _)| re.is_match(ua))
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_default()
}

/// Parse a raw `User-Agent` string.
pub fn parse_user_agent(ua: &str) -> ClientInfo {
    ClientInfo {
        browser: first_match(&BROWSERS, ua),
        platform: first_match(&PLATFORMS, ua),
    }
}
