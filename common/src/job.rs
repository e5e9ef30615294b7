
/// One job listing as returned by the search API, projected to the fields
/// the front-end displays.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_date: String,
    pub description_text: String,
    pub apply_url: String,
    pub remote: bool,
    pub employment_type: String,
    pub salary: String,
    pub industry: String,
}

impl JobRecord {
    /// Placeholder used by the API when a listing has no apply link.
    pub const NO_APPLY_URL: &'static str = "#";

    /// Returns the apply link if the listing carries a usable one.
    pub fn apply_link(&self) -> Option<&str> {
        let url = self.apply_url.trim();
        if url.is_empty() || url == Self::NO_APPLY_URL {
            None
        } else {
            Some(url)
        }
    }
}
