//! String interning.
//!
//! Identifiers, property names and string literal values are interned once per
//! session so that names compare as integers everywhere in the binder and
//! checker.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// A lightweight handle to an interned string.
///
/// Two handles produced by the same [`StringInterner`] are equal iff their
/// text is equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl InternedString {
    #[inline]
    pub fn from_spur(spur: Spur) -> Self {
        Self(spur)
    }

    #[inline]
    pub fn as_spur(self) -> Spur {
        self.0
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.0)
    }
}

/// Thread-safe string interner.
///
/// Cloning is cheap: clones share one table. Parser threads, binder threads
/// and checker queries all intern into the same table.
#[derive(Clone)]
pub struct StringInterner {
    rodeo: Arc<ThreadedRodeo>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Intern a string, returning the existing handle if it was seen before.
    #[inline]
    pub fn intern(&self, s: &str) -> InternedString {
        InternedString::from_spur(self.rodeo.get_or_intern(s))
    }

    #[inline]
    pub fn intern_static(&self, s: &'static str) -> InternedString {
        InternedString::from_spur(self.rodeo.get_or_intern_static(s))
    }

    /// Look up a string without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.rodeo.get(s).map(InternedString::from_spur)
    }

    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.rodeo.resolve(&key.as_spur())
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Whether two interners share the same underlying table.
    pub fn ptr_eq(&self, other: &StringInterner) -> bool {
        Arc::ptr_eq(&self.rodeo, &other.rodeo)
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        let c = interner.intern("bar");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "foo");
        assert_eq!(interner.resolve(c), "bar");
    }

    #[test]
    fn test_get_does_not_intern() {
        let interner = StringInterner::new();
        assert!(interner.get("missing").is_none());
        let a = interner.intern("missing");
        assert_eq!(interner.get("missing"), Some(a));
    }

    #[test]
    fn test_clones_share_table() {
        let interner = StringInterner::new();
        let other = interner.clone();
        let a = interner.intern("shared");
        assert_eq!(other.get("shared"), Some(a));
        assert!(interner.ptr_eq(&other));
        assert!(!interner.ptr_eq(&StringInterner::new()));
    }
}
