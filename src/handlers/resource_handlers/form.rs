use serde::Deserialize;

/// A submitted url-encoded form kept as ordered pairs, so repeated keys
/// (checkbox groups) survive.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// First value for `name`, or `""`.
    pub fn get(&self, name: &str) -> &str {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map_or("", |(_, v)| v.as_str())
    }

    pub fn trimmed(&self, name: &str) -> &str {
        self.get(name).trim()
    }

    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0.iter().filter(move |(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Every value of `name` that parses as an id. Duplicates are dropped.
    pub fn ids(&self, name: &str) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::new();
        for id in self.all(name).filter_map(|v| v.trim().parse().ok()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn optional_id(&self, name: &str) -> Option<i64> {
        self.trimmed(name).parse().ok()
    }
}
