/// API key and host for the RapidAPI gateway.
///
/// Loaded once at startup and passed explicitly to every search.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_host: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: api_host.into(),
        }
    }

    /// Both the key and the host are set.
    pub fn is_present(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_host.trim().is_empty()
    }
}

// The key must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_host", &self.api_host)
            .finish()
    }
}
