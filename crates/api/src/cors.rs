use alloc::{boxed::Box, vec::Vec};
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
};

enum Rule {
    /// The origin must match exactly, e.g. `http://localhost:5173`.
    Exact(Box<str>),
    /// Written as `*.example.app`. Any origin ending in `.example.app` matches.
    Suffix(Box<str>),
}

impl Rule {
    fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Exact(allowed) => origin == allowed.as_ref(),
            Self::Suffix(suffix) => origin.ends_with(suffix.as_ref()),
        }
    }
}

/// Origins that may call the API from a browser.
pub struct Cors(Vec<Rule>);

impl Cors {
    /// Parses a comma-separated list of origins. Blank entries are skipped.
    pub fn parse(list: &str) -> Self {
        let rules = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.strip_prefix('*') {
                Some(suffix) => Rule::Suffix(suffix.into()),
                None => Rule::Exact(entry.trim_end_matches('/').into()),
            })
            .collect();
        Self(rules)
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.0.iter().any(|rule| rule.matches(origin))
    }

    /// Echoes the request origin back if it is allowed. Nothing is added otherwise.
    pub fn decorate(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        let Some(origin) = origin else { return };
        let Ok(text) = origin.to_str() else { return };
        if !self.allows(text) {
            return;
        }

        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }

    pub fn decorate_preflight(&self, request: &HeaderMap, headers: &mut HeaderMap) {
        self.decorate(request.get(ORIGIN), headers);
        if headers.contains_key(ACCESS_CONTROL_ALLOW_ORIGIN) {
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type, Accept"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cors;
    use hyper::header::{HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};

    #[test]
    fn exact_and_suffix_rules() {
        let cors = Cors::parse("http://localhost:5173, *.netlify.app ,,");
        assert!(cors.allows("http://localhost:5173"));
        assert!(cors.allows("https://valentines-app2026.netlify.app"));
        assert!(!cors.allows("http://localhost:3000"));
        assert!(!cors.allows("https://netlify.app.evil.com"));
    }

    #[test]
    fn only_allowed_origins_are_echoed() {
        let cors = Cors::parse("http://localhost:5173");

        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("http://localhost:5173");
        cors.decorate(Some(&origin), &mut headers);
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN), Some(&origin));

        let mut headers = HeaderMap::new();
        cors.decorate(Some(&HeaderValue::from_static("https://evil.com")), &mut headers);
        assert!(headers.is_empty());

        cors.decorate(None, &mut headers);
        assert!(headers.is_empty());
    }
}
