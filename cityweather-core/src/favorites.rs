//! Session-only favorites: a plain list of city names, never persisted and
//! cleared when the process exits. This is deliberately a separate,
//! name-keyed mechanism from [`crate::bookmarks::BookmarkStore`] — no
//! uniqueness, no record identity — and the two are not interchangeable.

#[derive(Debug, Default)]
pub struct Favorites {
    names: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unconditionally; duplicate names are allowed.
    pub fn add(&mut self, city_name: impl Into<String>) {
        self.names.push(city_name.into());
    }

    /// Remove the first matching name, if any.
    pub fn remove(&mut self, city_name: &str) {
        if let Some(index) = self.names.iter().position(|name| name == city_name) {
            self.names.remove(index);
        }
    }

    pub fn contains(&self, city_name: &str) -> bool {
        self.names.iter().any(|name| name == city_name)
    }

    pub fn list(&self) -> &[String] {
        &self.names
    }
}
