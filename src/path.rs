//! Field paths.
//!
//! A [`FieldPath`] addresses one field inside a nested document, e.g.
//! `detail.phones[2].countryCode`. Load errors are keyed by paths built from
//! external keys, dump errors by paths built from internal names.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Dotted / indexed address of a field. The root path renders as `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended with an object key.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        FieldPath { segments }
    }

    /// Returns this path extended with an array index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        FieldPath { segments }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Path with array indexes dropped, e.g. `phones.country_code`.
    ///
    /// Options that address fields (`exclude`, per-field `required`) use this
    /// form, since they apply to every element of a list.
    #[must_use]
    pub fn without_indexes(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Key(key) => Some(key.as_str()),
                Segment::Index(_) => None,
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let path = FieldPath::root()
            .key("detail")
            .key("phones")
            .index(2)
            .key("countryCode");
        assert_eq!(path.to_string(), "detail.phones[2].countryCode");
        assert_eq!(path.without_indexes(), "detail.phones.countryCode");
    }

    #[test]
    fn test_root_and_leading_index() {
        assert_eq!(FieldPath::root().to_string(), "");
        assert!(FieldPath::root().is_root());
        assert_eq!(FieldPath::root().index(0).key("name").to_string(), "[0].name");
    }
}
