#![forbid(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]
pub mod diagram;
pub mod functor;
mod macros;
pub mod rewrite;
pub mod ty;

pub use diagram::{Diagram, Generator, Term};
pub use functor::{Functor, MonoidalFunctor};
pub use rewrite::Normalizer;
pub use ty::{Ob, Ty};
