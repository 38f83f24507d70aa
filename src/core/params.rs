//! Merged request parameters.
//!
//! Admin forms post their fields either in the query string (GET links) or
//! url-encoded in the body, and owner ids can also come from the route. All
//! three sources are merged into one lookup: path parameters first, then the
//! query string, then the body. The first occurrence of a name wins.

use actix_web::HttpRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge path, query string and url-encoded body of `req`
    pub fn from_request(req: &HttpRequest, body: Option<Vec<(String, String)>>) -> Self {
        let mut params = Self::new();

        for (name, value) in req.match_info().iter() {
            params.push(name, value);
        }

        if let Ok(query) =
            actix_web::web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        {
            for (name, value) in query.into_inner() {
                params.push(name, value);
            }
        }

        for (name, value) in body.unwrap_or_default() {
            params.push(name, value);
        }

        params
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Insert `name` ahead of every other source
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.pairs.retain(|(n, _)| *n != name);
        self.pairs.insert(0, (name, value.into()));
    }

    /// Raw value, present even when blank
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value with blank strings coerced to absent
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<N, V> FromIterator<(N, V)> for RequestParams
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}
