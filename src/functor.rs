//! Monoidal functors: structure-preserving maps between diagram categories.
use crate::{
    diagram::{Diagram, Generator, Term},
    ty::{Ob, Ty},
};
use std::collections::HashMap;

/// Strict monoidal functors, determined by their action on atomic objects
/// and on generators.
///
/// Implementors supply [`Functor::map_ob`] and [`Functor::map_generator`];
/// the action on types and diagrams then follows by structural induction.
/// The image of a diagram is rebuilt layer by layer, so it is well formed
/// whenever the generator images have the mapped domains and codomains.
pub trait Functor<D: Clone> {
    /// The image of an atomic object, a whole type in the target category.
    ///
    /// # Errors
    ///
    /// Whatever the implementor raises for objects outside its domain;
    /// [`MonoidalFunctor`] raises [`Error::MissingObject`].
    fn map_ob(&self, ob: &Ob) -> Result<Ty, Error>;

    /// The image of a generator, a whole diagram in the target category.
    ///
    /// # Errors
    ///
    /// Whatever the implementor raises for generators outside its domain;
    /// [`MonoidalFunctor`] raises [`Error::MissingGenerator`].
    fn map_generator(&self, generator: &Generator<D>) -> Result<Diagram<D>, Error>;

    /// The image of a type: the concatenation of its objects' images.
    ///
    /// # Errors
    ///
    /// Propagates the first [`Functor::map_ob`] failure.
    fn map_ty(&self, ty: &Ty) -> Result<Ty, Error> {
        let mut image = Ty::empty();
        for ob in ty {
            image = image | self.map_ob(ob)?;
        }
        Ok(image)
    }

    /// The image of a diagram, built by walking its layers top to bottom and
    /// composing the image of each box between mapped identity wires.
    ///
    /// # Errors
    ///
    /// Propagates [`Functor::map_ob`] and [`Functor::map_generator`]
    /// failures, and [`Error::Diagram`] if the generator images do not
    /// compose (their domains and codomains disagree with the mapped types).
    fn map_diagram(&self, diagram: &Diagram<D>) -> Result<Diagram<D>, Error> {
        let mut scan = diagram.dom().clone();
        let mut result = Diagram::id(self.map_ty(&scan)?);
        for (term, &off) in diagram.boxes().iter().zip(diagram.offsets()) {
            let image = match term {
                Term::Generator(generator) => self.map_generator(generator)?,
                Term::Diagram(inner) => self.map_diagram(inner)?,
            };
            let left = Diagram::id(self.map_ty(&scan.slice(0..off))?);
            let right =
                Diagram::id(self.map_ty(&scan.slice(off + term.dom().len()..scan.len()))?);
            result = (result >> (left | image | right))?;
            scan = scan.splice(off, term.dom().len(), term.cod());
        }
        Ok(result)
    }
}

/// A monoidal functor given by lookup tables on objects and generators.
///
/// Daggered generators need no entry of their own: when the table has no
/// direct entry, their image defaults to the dagger of the undaggered
/// generator's image.
///
/// # Examples
///
/// ```
/// use monoidal::{Functor, Generator, MonoidalFunctor, Ob, Ty};
/// let (x, y) = (Ty::new(["x"]), Ty::new(["y"]));
/// let f0 = Generator::<()>::new("f0", x.clone(), y.clone());
/// let f1 = Generator::<()>::new("f1", y.clone(), x.clone());
/// let swap = MonoidalFunctor::new(
///     [(Ob::new("x"), y.clone()), (Ob::new("y"), x)],
///     [(f0.clone(), f1.to_diagram()), (f1, f0.to_diagram())],
/// );
/// assert_eq!(swap.map_diagram(&f0.to_diagram()).unwrap().to_string(), "f1");
/// ```
pub struct MonoidalFunctor<D = ()> {
    ob: HashMap<Ob, Ty>,
    ar: HashMap<Generator<D>, Diagram<D>>,
}

impl<D: Clone> MonoidalFunctor<D> {
    /// A new monoidal functor from its object and generator tables.
    pub fn new(
        ob: impl IntoIterator<Item = (Ob, Ty)>,
        ar: impl IntoIterator<Item = (Generator<D>, Diagram<D>)>,
    ) -> Self {
        Self {
            ob: ob.into_iter().collect(),
            ar: ar.into_iter().collect(),
        }
    }
}

impl<D: Clone> Functor<D> for MonoidalFunctor<D> {
    fn map_ob(&self, ob: &Ob) -> Result<Ty, Error> {
        self.ob
            .get(ob)
            .cloned()
            .ok_or_else(|| Error::MissingObject(ob.clone()))
    }

    fn map_generator(&self, generator: &Generator<D>) -> Result<Diagram<D>, Error> {
        // A direct entry wins, daggered or not; the fallback only covers misses.
        if let Some(image) = self.ar.get(generator) {
            return Ok(image.clone());
        }
        if generator.is_dagger() {
            return Ok(self.map_generator(&generator.dagger())?.dagger());
        }
        Err(Error::MissingGenerator(generator.to_string()))
    }
}

/// The identity-on-generators functor behind [`Diagram::flatten`].
struct Flattener;

impl<D: Clone> Functor<D> for Flattener {
    fn map_ob(&self, ob: &Ob) -> Result<Ty, Error> {
        Ok(ob.clone().into())
    }

    fn map_generator(&self, generator: &Generator<D>) -> Result<Diagram<D>, Error> {
        Ok(generator.to_diagram())
    }
}

impl<D: Clone> Diagram<D> {
    /// Replace every nested-diagram box with its own boxes, recursively:
    /// the image of this diagram under the identity functor.
    ///
    /// Undoes [`Diagram::slice`] up to interchange, so both sides of
    /// `d.slice().flatten()? ~ d` have the same normal form.
    ///
    /// # Errors
    ///
    /// [`Error::Diagram`] if a nested diagram is not well formed.
    pub fn flatten(&self) -> Result<Self, Error> {
        Flattener.map_diagram(self)
    }
}

/// Errors that can occur when applying a functor.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An atomic object with no image.
    #[error("No image for object {0}.")]
    MissingObject(Ob),
    /// A generator with no image.
    #[error("No image for generator {0}.")]
    MissingGenerator(String),
    /// The generator images do not compose.
    #[error(transparent)]
    Diagram(#[from] crate::diagram::Error),
}
