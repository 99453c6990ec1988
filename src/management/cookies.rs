/// Session cookies sent to the token issuance endpoint.
///
/// Entries keep their first insertion order so the rendered `cookie` header
/// stays stable across merges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    entries: Vec<(String, String)>,
}

impl CookieJar {
    /// Parses a `cookie` request header value (`a=1; b=2`).
    ///
    /// Pairs without `=` or with an empty name are skipped.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::default();
        for pair in header.split(';') {
            if let Some((name, value)) = split_pair(pair) {
                jar.set(name, value);
            }
        }
        jar
    }

    /// Inserts or overwrites a cookie by name.
    fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Applies `Set-Cookie` response header values to the jar.
    ///
    /// Only the leading `name=value` pair of each header is used; attributes
    /// like `Path` or `Expires` are ignored.
    pub fn merge_set_cookies<'a, I>(&mut self, set_cookies: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for header in set_cookies {
            let pair = header.split(';').next().unwrap_or_default();
            if let Some((name, value)) = split_pair(pair) {
                self.set(name, value);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Renders the jar as a `cookie` request header value.
    pub fn header_value(&self) -> String {
        self.entries
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

