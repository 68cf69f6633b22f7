use std::fmt;

/// A class label attached to a training or query sequence.
///
/// Wraps the integer class encoding used by classification datasets. Labels
/// are opaque: only equality matters to the search and the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassLabel(i64);

impl ClassLabel {
    /// Create a label from its integer encoding.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Return the integer encoding.
    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ClassLabel;

    #[test]
    fn roundtrip() {
        let label = ClassLabel::new(-3);
        assert_eq!(label.value(), -3);
    }

    #[test]
    fn display() {
        let label = ClassLabel::new(7);
        assert_eq!(format!("{label}"), "7");
    }

    #[test]
    fn equality() {
        assert_eq!(ClassLabel::new(2), ClassLabel::new(2));
        assert_ne!(ClassLabel::new(2), ClassLabel::new(3));
    }
}
