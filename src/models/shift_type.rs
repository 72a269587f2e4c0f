//! Shift-type catalog.
//!
//! This module defines the ordered set of shift types for one scheduling
//! problem, with index 0 reserved for the distinguished "off" type.

use serde::{Deserialize, Serialize};

/// Index of the distinguished "off" shift type.
///
/// The off type carries no coverage demand and may not appear in a
/// transition penalty. Every shift type with a larger index is a working
/// shift.
pub const OFF_SHIFT: usize = 0;

/// The ordered catalog of shift types for one scheduling problem.
///
/// A shift type's identity is its position in the catalog; the stored
/// string is its display label. Index [`OFF_SHIFT`] must be the "off"
/// type.
///
/// # Examples
///
/// ```
/// use roster_engine::models::ShiftSet;
///
/// let shifts = ShiftSet::new(vec![
///     "Off".to_string(),
///     "Morning".to_string(),
///     "Night".to_string(),
/// ]);
/// assert_eq!(shifts.len(), 3);
/// assert_eq!(shifts.label(2), "Night");
/// assert_eq!(shifts.resolve("Morning"), Some(1));
/// assert_eq!(shifts.resolve("Twilight"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftSet {
    labels: Vec<String>,
}

impl ShiftSet {
    /// Creates a catalog from ordered labels; the first label is the off type.
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Returns the number of shift types, including the off type.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the catalog holds no shift types at all.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the display label for a shift-type index.
    ///
    /// # Panics
    ///
    /// Panics if `shift` is out of range; indices are validated when the
    /// problem is validated.
    pub fn label(&self, shift: usize) -> &str {
        &self.labels[shift]
    }

    /// Resolves a display label to its shift-type index.
    pub fn resolve(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Iterates over the working shift-type indices (everything but off).
    pub fn working(&self) -> impl Iterator<Item = usize> + '_ {
        (OFF_SHIFT + 1)..self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shifts() -> ShiftSet {
        ShiftSet::new(vec![
            "Off".to_string(),
            "Day".to_string(),
            "Night".to_string(),
        ])
    }

    #[test]
    fn test_off_shift_is_index_zero() {
        assert_eq!(OFF_SHIFT, 0);
        assert_eq!(shifts().label(OFF_SHIFT), "Off");
    }

    #[test]
    fn test_working_excludes_off() {
        let working: Vec<usize> = shifts().working().collect();
        assert_eq!(working, vec![1, 2]);
    }

    #[test]
    fn test_resolve_label() {
        assert_eq!(shifts().resolve("Night"), Some(2));
        assert_eq!(shifts().resolve("off"), None); // labels are case-sensitive
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&shifts()).unwrap();
        assert_eq!(json, r#"["Off","Day","Night"]"#);
        let back: ShiftSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shifts());
    }
}
