//! Atomic objects and types.
//! A type is an ordered sequence of atomic objects: the free monoid under
//! concatenation, whose unit is the empty type.
use crate::macros::impl_arith;
use itertools::Itertools;
use std::{
    fmt::{Debug, Display, Formatter},
    ops::{BitOr, Index, Range},
};

/// An atomic object: the smallest named entity, a single wire label.
///
/// Equality and hashing are by name only.
///
/// # Examples
///
/// ```
/// use monoidal::Ob;
/// assert_eq!(Ob::new("x"), Ob::new("x"));
/// assert_eq!(Ob::new("x").to_string(), "x");
/// ```
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct Ob {
    pub(crate) name: String,
}

impl Ob {
    /// A new atomic object with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The name of this object.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Ob {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Ob {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl Display for Ob {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Debug for Ob {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Reuse Display cuz it's nice
        std::fmt::Display::fmt(self, f)
    }
}

/// A type: an ordered sequence of atomic objects.
///
/// Types form the free monoid under concatenation (the `|` operator), with
/// [`Ty::empty`] as the unit. They are the domains and codomains of diagrams.
///
/// # Examples
///
/// ```
/// use monoidal::Ty;
/// let t = Ty::new(["x", "y"]);
/// assert_eq!(t.to_string(), "x @ y");
/// assert_eq!(t, Ty::new(["x"]) | Ty::new(["y"]));
/// assert_eq!(&t | &Ty::empty(), t);
/// ```
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct Ty {
    pub(crate) objects: Vec<Ob>,
}

impl Ty {
    /// A new type from a sequence of objects (or names).
    pub fn new<I>(objects: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Ob>,
    {
        Self {
            objects: objects.into_iter().map(Into::into).collect(),
        }
    }

    /// The empty type: the unit of concatenation.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Concatenate this type with another.
    ///
    /// # Note
    ///
    /// This is also available via the `|` operator, to suggest parallel
    /// composition.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            objects: self.objects.iter().chain(&other.objects).cloned().collect(),
        }
    }

    /// The n-fold concatenation of this type with itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::Ty;
    /// assert_eq!(Ty::new(["x"]).pow(3), Ty::new(["x", "x", "x"]));
    /// assert_eq!(Ty::new(["x"]).pow(0), Ty::empty());
    /// ```
    #[must_use]
    pub fn pow(&self, n: usize) -> Self {
        Self {
            objects: std::iter::repeat_n(&self.objects, n)
                .flatten()
                .cloned()
                .collect(),
        }
    }

    /// Number of objects in this type.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Is this the empty type?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterator over the objects of this type.
    pub fn iter(&self) -> std::slice::Iter<'_, Ob> {
        self.objects.iter()
    }

    /// The sub-type at the given range, with out-of-range bounds clamped to
    /// the ends rather than panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::Ty;
    /// let t = Ty::new(["x", "y", "z"]);
    /// assert_eq!(t.slice(1..3), Ty::new(["y", "z"]));
    /// assert_eq!(t.slice(2..17), Ty::new(["z"]));
    /// assert_eq!(t.slice(5..7), Ty::empty());
    /// ```
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let lo = range.start.min(self.len());
        let hi = range.end.min(self.len());
        Self {
            objects: self.objects[lo..hi.max(lo)].to_vec(),
        }
    }

    /// Replace the `cut` objects starting at `off` with `replacement`:
    /// the single scan-update step used when walking a diagram top to bottom.
    pub(crate) fn splice(&self, off: usize, cut: usize, replacement: &Self) -> Self {
        let mut objects = self.slice(0..off).objects;
        objects.extend(replacement.objects.iter().cloned());
        objects.extend(self.slice(off + cut..self.len()).objects);
        Self { objects }
    }
}

impl From<Ob> for Ty {
    fn from(ob: Ob) -> Self {
        Self { objects: vec![ob] }
    }
}

impl Index<usize> for Ty {
    type Output = Ob;
    fn index(&self, i: usize) -> &Self::Output {
        &self.objects[i]
    }
}

impl<'a> IntoIterator for &'a Ty {
    type Item = &'a Ob;
    type IntoIter = std::slice::Iter<'a, Ob>;
    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.objects.is_empty() {
            write!(f, "𝟙")
        } else {
            write!(f, "{}", self.objects.iter().format(" @ "))
        }
    }
}

impl Debug for Ty {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Reuse Display cuz it's nice
        std::fmt::Display::fmt(self, f)
    }
}

impl_arith!(Ty, BitOr, bitor, concat, simple);

/// `proptest` strategies for generating arbitrary objects and types.
#[cfg(test)]
pub(crate) mod strategies {
    use super::*;
    use proptest::prelude::*;

    pub fn object() -> impl Strategy<Value = Ob> {
        prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(Ob::new)
    }

    pub fn ty(max_len: usize) -> impl Strategy<Value = Ty> {
        proptest::collection::vec(object(), 0..=max_len).prop_map(Ty::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unit_display() {
        assert_eq!(Ty::empty().to_string(), "𝟙");
        assert_eq!(Ty::new(["x", "y"]).to_string(), "x @ y");
    }

    #[test]
    fn slice_vs_index() {
        let t = Ty::new(["x", "y", "z"]);
        assert_eq!(t[0], Ob::new("x"));
        assert_eq!(t.slice(0..1), Ty::new(["x"]));
        assert_eq!(t.slice(1..t.len()), Ty::new(["y", "z"]));
    }

    #[test]
    fn splice_replaces_middle() {
        let t = Ty::new(["x", "y", "z"]);
        assert_eq!(t.splice(1, 1, &Ty::new(["w", "w"])), Ty::new(["x", "w", "w", "z"]));
        assert_eq!(t.splice(0, 3, &Ty::empty()), Ty::empty());
    }

    proptest! {
        #[test]
        fn monoid_associative(s in strategies::ty(4), t in strategies::ty(4), u in strategies::ty(4)) {
            prop_assert_eq!((&s | &t) | &u, s | (t | u));
        }

        #[test]
        fn monoid_unit(t in strategies::ty(4)) {
            prop_assert_eq!(&(&Ty::empty() | &t), &t);
            prop_assert_eq!(&(&t | &Ty::empty()), &t);
        }

        #[test]
        fn pow_is_iterated_concat(t in strategies::ty(3), n in 0_usize..5) {
            let mut expected = Ty::empty();
            for _ in 0..n {
                expected = expected | &t;
            }
            prop_assert_eq!(t.pow(n), expected);
        }

        #[test]
        fn concat_lengths(s in strategies::ty(4), t in strategies::ty(4)) {
            prop_assert_eq!((&s | &t).len(), s.len() + t.len());
        }

        #[test]
        fn slice_concat_roundtrip(t in strategies::ty(5), i in 0_usize..6) {
            let i = i.min(t.len());
            prop_assert_eq!(&(t.slice(0..i) | t.slice(i..t.len())), &t);
        }
    }
}
