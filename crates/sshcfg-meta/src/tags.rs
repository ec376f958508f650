//! Tag collections with case-insensitive identity.

/// Whether two tag names are the same tag. Case folding covers non-ASCII
/// names too.
pub fn same_tag(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Key under which a tag name is grouped, lower-cased.
pub fn tag_key(tag: &str) -> String {
    tag.to_lowercase()
}

/// Ordered set of tag names.
///
/// Keeps insertion order and the case a tag was first added with; two tags
/// differing only in case are the same tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag. Returns `false` if it was already present (any case)
    /// or blank.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Removes a tag, ignoring case. Returns whether anything was removed.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| !same_tag(existing, tag));
        self.tags.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| same_tag(existing, tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

/// Tag declarations of one config file: name to optional color.
///
/// Names compare case-insensitively; the canonical spelling is the one
/// declared first. An empty color means "no color".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDefinitions {
    entries: Vec<(String, String)>,
}

impl TagDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a tag or updates its color.
    ///
    /// Redeclaring an existing tag in a different case keeps the original
    /// spelling.
    pub fn insert(&mut self, name: impl Into<String>, color: impl Into<String>) {
        let name = name.into();
        let color = color.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = color,
            None => self.entries.push((name, color)),
        }
    }

    /// Removes a declaration. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Color of a tag; `Some("")` for a tag declared without color.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    /// The declared spelling of a tag.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].0.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, color)| (name.as_str(), color.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| same_tag(existing, name))
    }
}
