use std::collections::HashMap;
use std::ops::Index;

/// A single URL parameter, consisting of a key and a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Param {
    pub key: String,
    pub value: String,
}

/// The parameters bound by a successful lookup, in the order they appear in
/// the route pattern.
///
/// ```rust
/// # use httptree::Params;
/// let mut params = Params::default();
/// # params.push("user", b"gordon");
/// let user = params.get("user"); // defined by :user or *user
/// let first = &params[0];        // positional access, with the key
/// # assert_eq!(user, Some("gordon"));
/// # assert_eq!(first.key, "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: Vec<Param>,
}

impl Params {
    /// Returns the value of the first parameter registered under `name`.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.inner
            .iter()
            .find(|param| param.key == name)
            .map(|param| param.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .map(|param| (param.key.as_str(), param.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[doc(hidden)]
    pub fn push(&mut self, key: &str, value: &[u8]) {
        self.inner.push(Param {
            key: key.to_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        });
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }
}

impl Index<usize> for Params {
    type Output = Param;

    fn index(&self, i: usize) -> &Param {
        &self.inner[i]
    }
}

impl From<Params> for HashMap<String, String> {
    fn from(params: Params) -> Self {
        params
            .inner
            .into_iter()
            .map(|param| (param.key, param.value))
            .collect()
    }
}
