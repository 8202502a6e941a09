//! Diagrams in a free monoidal category.
//!
//! A diagram is a domain type, a codomain type, and an ordered sequence of
//! boxes placed at integer offsets within the evolving "scan" type. Identity
//! diagrams are simply diagrams with no boxes; a generator is a diagram with
//! a single box. Diagrams are immutable value types: every operation returns
//! a new diagram, so sharing sub-diagrams across composites is always safe.
use crate::{macros::impl_arith, ty::Ty};
use itertools::Itertools;
use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{BitOr, Shr},
};

/// A generator: an atomic box with a name, a domain, a codomain, an optional
/// opaque payload, and a dagger flag distinguishing it from its formal
/// adjoint.
///
/// Equality and hashing cover the printed signature (name, domain, codomain,
/// dagger flag) and ignore the payload, so two instances with the same
/// signature are interchangeable as keys.
///
/// # Examples
///
/// ```
/// use monoidal::{Generator, Ty};
/// let f = Generator::new("f", Ty::new(["x"]), Ty::new(["y"])).with_data(42);
/// let g = Generator::new("f", Ty::new(["x"]), Ty::new(["y"])).with_data(7);
/// assert_eq!(f, g);
/// assert_eq!(f.dagger().to_string(), "f†");
/// assert_eq!(f.dagger().dagger(), f);
/// ```
#[derive(Clone)]
pub struct Generator<D = ()> {
    pub(crate) name: String,
    pub(crate) dom: Ty,
    pub(crate) cod: Ty,
    pub(crate) dagger: bool,
    pub(crate) data: Option<D>,
}

impl<D> Generator<D> {
    /// A new generator with the given name, domain, and codomain.
    pub fn new(name: impl Into<String>, dom: Ty, cod: Ty) -> Self {
        Self {
            name: name.into(),
            dom,
            cod,
            dagger: false,
            data: None,
        }
    }

    /// Attach an opaque payload to this generator.
    ///
    /// The payload travels with the generator through every diagram operation
    /// but plays no part in equality, hashing, or rewriting.
    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// The name of this generator.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The domain of this generator.
    #[must_use]
    pub const fn dom(&self) -> &Ty {
        &self.dom
    }

    /// The codomain of this generator.
    #[must_use]
    pub const fn cod(&self) -> &Ty {
        &self.cod
    }

    /// Is this the formal adjoint of the named generator?
    #[must_use]
    pub const fn is_dagger(&self) -> bool {
        self.dagger
    }

    /// The opaque payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }
}

impl<D: Clone> Generator<D> {
    /// The formal adjoint: domain and codomain swapped, dagger flag flipped.
    /// Involutive, so `g.dagger().dagger() == g`.
    #[must_use]
    pub fn dagger(&self) -> Self {
        Self {
            name: self.name.clone(),
            dom: self.cod.clone(),
            cod: self.dom.clone(),
            dagger: !self.dagger,
            data: self.data.clone(),
        }
    }

    /// The one-box diagram whose sole box is this generator, at offset 0.
    #[must_use]
    pub fn to_diagram(&self) -> Diagram<D> {
        Diagram {
            dom: self.dom.clone(),
            cod: self.cod.clone(),
            boxes: vec![Term::Generator(self.clone())],
            offsets: vec![0],
        }
    }
}

impl<D> PartialEq for Generator<D> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.dom == other.dom
            && self.cod == other.cod
            && self.dagger == other.dagger
    }
}

impl<D> Eq for Generator<D> {}

impl<D> Hash for Generator<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.dom.hash(state);
        self.cod.hash(state);
        self.dagger.hash(state);
    }
}

impl<D: Clone> From<Generator<D>> for Diagram<D> {
    fn from(g: Generator<D>) -> Self {
        g.to_diagram()
    }
}

impl<D> Display for Generator<D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.name, if self.dagger { "†" } else { "" })
    }
}

impl<D> Debug for Generator<D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Reuse Display cuz it's nice
        std::fmt::Display::fmt(self, f)
    }
}

/// One entry in a diagram's box sequence.
///
/// In a well-formed bottom-level diagram every entry is a [`Generator`]; the
/// [`Diagram`](Term::Diagram) case holds the diagrams-of-diagrams produced by
/// [`Diagram::slice`], one whole layer per entry.
#[derive(Clone)]
pub enum Term<D = ()> {
    /// An atomic box.
    Generator(Generator<D>),
    /// A nested diagram, used as a box of a sliced diagram.
    Diagram(Diagram<D>),
}

impl<D> Term<D> {
    /// The domain of this entry.
    #[must_use]
    pub const fn dom(&self) -> &Ty {
        match self {
            Self::Generator(g) => &g.dom,
            Self::Diagram(d) => &d.dom,
        }
    }

    /// The codomain of this entry.
    #[must_use]
    pub const fn cod(&self) -> &Ty {
        match self {
            Self::Generator(g) => &g.cod,
            Self::Diagram(d) => &d.cod,
        }
    }
}

impl<D: Clone> Term<D> {
    /// The formal adjoint of this entry.
    #[must_use]
    pub fn dagger(&self) -> Self {
        match self {
            Self::Generator(g) => Self::Generator(g.dagger()),
            Self::Diagram(d) => Self::Diagram(d.dagger()),
        }
    }
}

impl<D> PartialEq for Term<D> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Generator(g), Self::Generator(h)) => g == h,
            (Self::Diagram(d), Self::Diagram(e)) => d == e,
            _ => false,
        }
    }
}

impl<D> Eq for Term<D> {}

impl<D> PartialEq<Generator<D>> for Term<D> {
    fn eq(&self, other: &Generator<D>) -> bool {
        matches!(self, Self::Generator(g) if g == other)
    }
}

impl<D> Hash for Term<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Generator(g) => {
                0_u8.hash(state);
                g.hash(state);
            }
            Self::Diagram(d) => {
                1_u8.hash(state);
                d.hash(state);
            }
        }
    }
}

impl<D> Display for Term<D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Generator(g) => write!(f, "{g}"),
            Self::Diagram(d) => write!(f, "{d}"),
        }
    }
}

impl<D> Debug for Term<D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Reuse Display cuz it's nice
        std::fmt::Display::fmt(self, f)
    }
}

/// A diagram: a domain, a codomain, and boxes placed at offsets.
///
/// # Examples
///
/// ```
/// use monoidal::{Diagram, Generator, Term, Ty};
/// let (x, y, z, w) = (Ty::new(["x"]), Ty::new(["y"]), Ty::new(["z"]), Ty::new(["w"]));
/// let f0 = Generator::<()>::new("f0", x.clone(), y.clone());
/// let f1 = Generator::new("f1", z.clone(), w.clone());
/// let g = Generator::new("g", &y | &w, y.clone());
/// let d = Diagram::new(
///     &x | &z,
///     y.clone(),
///     vec![
///         Term::Generator(f0.clone()),
///         Term::Generator(f1.clone()),
///         Term::Generator(g.clone()),
///     ],
///     vec![0, 1, 0],
/// );
/// assert!(d.is_ok());
/// let explicit = (f0.to_diagram() | f1.to_diagram()).then(&g.to_diagram());
/// assert_eq!(d.unwrap(), explicit.unwrap());
/// ```
#[derive(Clone)]
pub struct Diagram<D = ()> {
    pub(crate) dom: Ty,
    pub(crate) cod: Ty,
    pub(crate) boxes: Vec<Term<D>>,
    pub(crate) offsets: Vec<usize>,
}

impl<D> Diagram<D> {
    /// Check that the boxes and offsets compose from `dom` to `cod`.
    ///
    /// Simulates the scan: for each box in order, the sub-type of the scan at
    /// its offset must equal the box's domain and is replaced by the box's
    /// codomain; the final scan must equal `cod`.
    ///
    /// # Errors
    ///
    /// If the sequences differ in length, or the scan diverges from a box's
    /// domain or from the declared codomain.
    ///
    /// # References
    ///
    /// [John Regehr on assertions](https://blog.regehr.org/archives/1091)
    pub(crate) fn check_rep(&self) -> Result<(), Error> {
        if self.boxes.len() != self.offsets.len() {
            return Err(Error::LengthMismatch {
                boxes: self.boxes.len(),
                offsets: self.offsets.len(),
            });
        }
        let mut scan = self.dom.clone();
        for (term, &off) in self.boxes.iter().zip_eq(&self.offsets) {
            let expected = scan.slice(off..off + term.dom().len());
            if expected != *term.dom() {
                return Err(Error::DomainMismatch {
                    expected,
                    actual: term.dom().clone(),
                });
            }
            scan = scan.splice(off, term.dom().len(), term.cod());
        }
        if scan != self.cod {
            return Err(Error::CodomainMismatch {
                expected: self.cod.clone(),
                actual: scan,
            });
        }
        Ok(())
    }

    /// Safely construct a new `Diagram`.
    ///
    /// # Errors
    ///
    /// If `boxes` and `offsets` differ in length, or if the scan-type
    /// simulation diverges from a box's domain or fails to land on `cod`.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Generator, Term, Ty};
    /// let (x, y) = (Ty::new(["x"]), Ty::new(["y"]));
    /// let f = Generator::<()>::new("f", x.clone(), y.clone());
    /// let bad = Diagram::new(y.clone(), y, vec![Term::Generator(f)], vec![0]);
    /// assert_eq!(
    ///     bad.unwrap_err().to_string(),
    ///     "Domain y expected, got x instead."
    /// );
    /// ```
    pub fn new(dom: Ty, cod: Ty, boxes: Vec<Term<D>>, offsets: Vec<usize>) -> Result<Self, Error> {
        let result = Self {
            dom,
            cod,
            boxes,
            offsets,
        };
        result.check_rep()?;
        Ok(result)
    }

    /// The identity diagram on a type: no boxes, equal domain and codomain.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Ty};
    /// let i: Diagram = Diagram::id(Ty::new(["x"]));
    /// assert_eq!(i.to_string(), "Id(x)");
    /// assert_eq!(i.dom(), i.cod());
    /// ```
    #[must_use]
    pub fn id(ty: Ty) -> Self {
        Self {
            dom: ty.clone(),
            cod: ty,
            boxes: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// The domain of this diagram.
    #[must_use]
    pub const fn dom(&self) -> &Ty {
        &self.dom
    }

    /// The codomain of this diagram.
    #[must_use]
    pub const fn cod(&self) -> &Ty {
        &self.cod
    }

    /// The boxes of this diagram, in order.
    #[must_use]
    pub fn boxes(&self) -> &[Term<D>] {
        &self.boxes
    }

    /// The offset of each box within the scan type.
    #[must_use]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of boxes in this diagram.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Is this an identity diagram?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl<D: Clone> Diagram<D> {
    /// Compose this diagram with another in series.
    ///
    /// # Note
    ///
    /// This is also available via the `>>` operator, to suggest serial
    /// composition.
    ///
    /// # Errors
    ///
    /// If this diagram's codomain doesn't match the other's domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Generator, Ty};
    /// let (x, y) = (Ty::new(["x"]), Ty::new(["y"]));
    /// let f: Diagram = Generator::new("f", x.clone(), y.clone()).into();
    /// assert_eq!((Diagram::id(x) >> &f).unwrap(), f);
    /// assert_eq!((&f >> Diagram::id(y)).unwrap(), f);
    /// ```
    pub fn then(&self, other: &Self) -> Result<Self, Error> {
        if self.cod != other.dom {
            return Err(Error::CompositionMismatch {
                cod: self.cod.clone(),
                dom: other.dom.clone(),
            });
        }
        Ok(Self {
            dom: self.dom.clone(),
            cod: other.cod.clone(),
            boxes: self.boxes.iter().chain(&other.boxes).cloned().collect(),
            offsets: self.offsets.iter().chain(&other.offsets).copied().collect(),
        })
    }

    /// Compose this diagram with another in parallel.
    ///
    /// The other diagram's boxes act to the right of this diagram's output,
    /// so its offsets shift by the length of this codomain.
    ///
    /// # Note
    ///
    /// This is also available via the `|` operator, to suggest parallel
    /// composition.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Generator, Ty};
    /// let (x, y, z, w) = (Ty::new(["x"]), Ty::new(["y"]), Ty::new(["z"]), Ty::new(["w"]));
    /// let f0: Diagram = Generator::new("f0", x.clone(), y.clone()).into();
    /// let f1: Diagram = Generator::new("f1", z.clone(), w).into();
    /// let explicit = ((&f0 | Diagram::id(z)) >> (Diagram::id(y) | &f1)).unwrap();
    /// assert_eq!(&f0 | &f1, explicit);
    /// assert_eq!((&f0 | &f1).dom(), &(&x | f1.dom()));
    /// ```
    #[must_use]
    pub fn tensor(&self, other: &Self) -> Self {
        Self {
            dom: &self.dom | &other.dom,
            cod: &self.cod | &other.cod,
            boxes: self.boxes.iter().chain(&other.boxes).cloned().collect(),
            offsets: self
                .offsets
                .iter()
                .copied()
                .chain(other.offsets.iter().map(|off| off + self.cod.len()))
                .collect(),
        }
    }

    /// The formal adjoint: swap domain and codomain, reverse the box and
    /// offset sequences, and dagger every box.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Generator, Ty};
    /// let (x, y, z, w) = (Ty::new(["x"]), Ty::new(["y"]), Ty::new(["z"]), Ty::new(["w"]));
    /// let f0: Diagram = Generator::new("f0", x, y).into();
    /// let f1: Diagram = Generator::new("f1", z, w).into();
    /// let d = &f0 | &f1;
    /// assert_eq!(d.dagger().to_string(), "Id(y) @ f1† >> f0† @ Id(z)");
    /// assert_eq!(d.dagger().dagger(), d);
    /// assert_eq!(
    ///     (&f0 >> &f0.dagger()).unwrap().dagger(),
    ///     (&f0 >> &f0.dagger()).unwrap()
    /// );
    /// ```
    #[must_use]
    pub fn dagger(&self) -> Self {
        Self {
            dom: self.cod.clone(),
            cod: self.dom.clone(),
            boxes: self.boxes.iter().rev().map(Term::dagger).collect(),
            offsets: self.offsets.iter().rev().copied().collect(),
        }
    }
}

impl<D> PartialEq for Diagram<D> {
    fn eq(&self, other: &Self) -> bool {
        self.dom == other.dom
            && self.cod == other.cod
            && self.boxes == other.boxes
            && self.offsets == other.offsets
    }
}

impl<D> Eq for Diagram<D> {}

impl<D> Hash for Diagram<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dom.hash(state);
        self.cod.hash(state);
        self.boxes.hash(state);
        self.offsets.hash(state);
    }
}

impl<D> Display for Diagram<D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.boxes.is_empty() {
            return write!(f, "Id({})", self.dom);
        }
        let mut scan = self.dom.clone();
        for (i, (term, &off)) in self.boxes.iter().zip(&self.offsets).enumerate() {
            if i > 0 {
                write!(f, " >> ")?;
            }
            let left = scan.slice(0..off);
            let right = scan.slice(off + term.dom().len()..scan.len());
            if !left.is_empty() {
                write!(f, "Id({left}) @ ")?;
            }
            write!(f, "{term}")?;
            if !right.is_empty() {
                write!(f, " @ Id({right})")?;
            }
            scan = scan.splice(off, term.dom().len(), term.cod());
        }
        Ok(())
    }
}

impl<D> Debug for Diagram<D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Reuse Display cuz it's nice
        std::fmt::Display::fmt(self, f)
    }
}

impl_arith!(Diagram, Shr, shr, then, true);
impl_arith!(Diagram, BitOr, bitor, tensor, false);

/// Errors that can arise when building or computing with diagrams.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Boxes and offsets must have the same length, got {boxes} and {offsets}.
    #[error("Boxes and offsets must have the same length, got {boxes} and {offsets}.")]
    LengthMismatch {
        /// Number of boxes
        boxes: usize,
        /// Number of offsets
        offsets: usize,
    },
    /// Domain {expected} expected, got {actual} instead.
    #[error("Domain {expected} expected, got {actual} instead.")]
    DomainMismatch {
        /// The scanned sub-type at the box's offset
        expected: Ty,
        /// The box's declared domain
        actual: Ty,
    },
    /// Codomain {expected} expected, got {actual} instead.
    #[error("Codomain {expected} expected, got {actual} instead.")]
    CodomainMismatch {
        /// The declared codomain
        expected: Ty,
        /// Where the scan actually landed
        actual: Ty,
    },
    /// Codomain {cod} does not compose with domain {dom}.
    #[error("Codomain {cod} does not compose with domain {dom}.")]
    CompositionMismatch {
        /// Codomain of the first diagram
        cod: Ty,
        /// Domain of the second diagram
        dom: Ty,
    },
    /// Expected indices in range 0..{len}, got ({i}, {j}) instead.
    #[error("Expected indices in range 0..{len}, got ({i}, {j}) instead.")]
    IndexOutOfRange {
        /// First index
        i: usize,
        /// Second index
        j: usize,
        /// Number of boxes in the diagram
        len: usize,
    },
    /// Boxes {box0} and {box1} do not commute.
    #[error("Boxes {box0} and {box1} do not commute.")]
    DoesNotCommute {
        /// The earlier box
        box0: String,
        /// The later box
        box1: String,
    },
    /// Diagram {diagram} is not connected.
    #[error("Diagram {diagram} is not connected.")]
    NotConnected {
        /// The diagram whose rewriting revisited a previous state
        diagram: String,
    },
}

/// `proptest` strategies for generating arbitrary well-formed diagrams.
#[cfg(test)]
pub(crate) mod strategies {
    use super::*;
    use crate::ty::strategies as ts;
    use proptest::prelude::*;

    /// Offset choice, wire count choice, and codomain for one generator.
    type Seed = (usize, usize, Ty);

    /// Grow a well-formed diagram one generator at a time: each seed picks
    /// how many wires of the current scan type the generator consumes, where,
    /// and what it produces.
    fn grow<D: Clone>(dom: Ty, seeds: Vec<Seed>) -> Diagram<D> {
        let mut diagram = Diagram::id(dom);
        for (k, (off_seed, len_seed, cod)) in seeds.into_iter().enumerate() {
            let scan = diagram.cod().clone();
            let len = len_seed % (scan.len() + 1);
            let off = off_seed % (scan.len() - len + 1);
            let g: Generator<D> = Generator::new(format!("g{k}"), scan.slice(off..off + len), cod);
            let layer = Diagram::id(scan.slice(0..off))
                .tensor(&g.to_diagram())
                .tensor(&Diagram::id(scan.slice(off + len..scan.len())));
            diagram = diagram.then(&layer).expect("layer domain is the scan type");
        }
        diagram
    }

    fn seeds(count: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Seed>> {
        proptest::collection::vec((0..100_usize, 0..100_usize, ts::ty(2)), count)
    }

    pub fn diagrams<D: Clone + 'static>() -> impl Strategy<Value = Diagram<D>> {
        (ts::ty(3), seeds(0..5)).prop_map(|(dom, seeds)| grow(dom, seeds))
    }

    pub fn two_composite<D: Clone + 'static>() -> impl Strategy<Value = (Diagram<D>, Diagram<D>)> {
        (diagrams(), seeds(0..4)).prop_map(|(f, seeds)| {
            let g = grow(f.cod().clone(), seeds);
            (f, g)
        })
    }

    pub fn three_composite<D: Clone + 'static>()
    -> impl Strategy<Value = (Diagram<D>, Diagram<D>, Diagram<D>)> {
        (diagrams(), seeds(0..3), seeds(0..3)).prop_map(|(f, s, t)| {
            let g = grow(f.cod().clone(), s);
            let h = grow(g.cod().clone(), t);
            (f, g, h)
        })
    }
}
