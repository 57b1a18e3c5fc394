/// A book's series membership.
///
/// Douban exposes series names but never a position within the series, so
/// the index defaults to 1.0; both fields travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Series name as displayed on the subject page.
    pub name: String,
    /// Position in series (1-indexed).
    pub index: f32,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), index: 1.0 }
    }
}

impl From<String> for Series {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
