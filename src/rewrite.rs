//! Rewriting diagrams under the interchange law.
//!
//! Two adjacent boxes commute when they act on disjoint wires; interchanging
//! them is the only rewrite of free monoidal categories. Iterating it yields
//! normal forms ([`Diagram::normal_form`], following the quadratic algorithm
//! of arXiv:1804.07832) and the decomposition of a diagram into minimal-depth
//! layers ([`Diagram::slice`]).
use crate::diagram::{Diagram, Error, Term};
use std::collections::HashSet;

impl<D: Clone> Diagram<D> {
    /// A new diagram with the boxes at positions `i` and `j` interchanged.
    ///
    /// Non-adjacent positions are walked one adjacent swap at a time, failing
    /// as soon as any intermediate swap fails. For adjacent positions the two
    /// boxes commute iff one lies entirely to the left or right of the other
    /// in the current wire layout; when both readings apply (a state next to
    /// an effect on disjoint wires) the `left` flag picks which is tried
    /// first, so it decides which canonical form ambiguous diagrams rewrite
    /// towards.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `i` or `j` is not a box position, and
    /// [`Error::DoesNotCommute`] if the two boxes share wires.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Generator, Ty};
    /// let x = Ty::new(["x"]);
    /// let cup: Diagram = Generator::new("cup", &x | &x, Ty::empty()).into();
    /// let cap: Diagram = Generator::new("cap", Ty::empty(), &x | &x).into();
    /// let d = (&cup >> &cap).unwrap();
    /// assert_eq!(
    ///     d.interchange(0, 1, false).unwrap().to_string(),
    ///     "cap @ Id(x @ x) >> Id(x @ x) @ cup"
    /// );
    /// assert_eq!(
    ///     d.interchange(0, 1, true).unwrap().to_string(),
    ///     "Id(x @ x) @ cap >> cup @ Id(x @ x)"
    /// );
    /// ```
    pub fn interchange(&self, i: usize, j: usize, left: bool) -> Result<Self, Error> {
        let n = self.len();
        if i >= n || j >= n {
            return Err(Error::IndexOutOfRange { i, j, len: n });
        }
        if i == j {
            return Ok(self.clone());
        }
        // Walks always take the default tie-break, whatever `left` says.
        if j + 1 < i {
            let mut result = self.clone();
            for k in 0..(i - j) {
                result = result.interchange(i - k, i - k - 1, false)?;
            }
            return Ok(result);
        }
        if j > i + 1 {
            let mut result = self.clone();
            for k in 0..(j - i) {
                result = result.interchange(i + k, i + k + 1, false)?;
            }
            return Ok(result);
        }
        let (i, j) = if j < i { (j, i) } else { (i, j) };
        let (box0, box1) = (self.boxes[i].clone(), self.boxes[j].clone());
        let (mut off0, mut off1) = (self.offsets[i], self.offsets[j]);
        // By default, check whether box0 is to the right first, then to the left.
        if left && off1 >= off0 + box0.cod().len() {
            off1 = off1 - box0.cod().len() + box0.dom().len();
        } else if off0 >= off1 + box1.dom().len() {
            off0 = off0 - box1.dom().len() + box1.cod().len();
        } else if off1 >= off0 + box0.cod().len() {
            off1 = off1 - box0.cod().len() + box0.dom().len();
        } else {
            return Err(Error::DoesNotCommute {
                box0: box0.to_string(),
                box1: box1.to_string(),
            });
        }
        let mut boxes = self.boxes.clone();
        let mut offsets = self.offsets.clone();
        boxes[i] = box1;
        boxes[j] = box0;
        offsets[i] = off1;
        offsets[j] = off0;
        Ok(Self {
            dom: self.dom.clone(),
            cod: self.cod.clone(),
            boxes,
            offsets,
        })
    }

    /// The lazy sequence of diagrams reached by single interchange steps on
    /// the way to a normal form.
    ///
    /// Each step rescans adjacent pairs from the left and yields the diagram
    /// after the first swap in the chosen direction; the sequence ends when a
    /// full scan finds no swap. It never ends on a diagram with parallel
    /// cycles of commuting boxes, which keep sliding past each other forever.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Generator, Ty};
    /// let (x, y) = (Ty::new(["x"]), Ty::new(["y"]));
    /// let f0: Diagram = Generator::new("f0", x.clone(), y.clone()).into();
    /// let f1: Diagram = Generator::new("f1", y, x.clone()).into();
    /// let d = ((Diagram::id(x.clone()) | &f1) >> (&f0 | Diagram::id(x))).unwrap();
    /// let steps: Vec<Diagram> = d.normalize(false).collect();
    /// assert_eq!(steps, vec![&f0 | &f1]);
    /// ```
    #[must_use]
    pub fn normalize(&self, left: bool) -> Normalizer<D> {
        Normalizer {
            diagram: self.clone(),
            left,
            done: false,
        }
    }

    /// The normal form of this diagram under the interchange law.
    ///
    /// Drains [`Diagram::normalize`], recording every intermediate diagram;
    /// returns the last one, or this diagram unchanged if no step applies.
    /// By default only right interchange moves are applied; set `left` for
    /// the mirrored strategy (which reaches a different, equally canonical,
    /// form).
    ///
    /// # Errors
    ///
    /// [`Error::NotConnected`] if an intermediate diagram recurs: the diagram
    /// has a component that cycles under the chosen strategy rather than
    /// settling.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Generator, Ty};
    /// let s0: Diagram = Generator::new("s0", Ty::empty(), Ty::empty()).into();
    /// let s1: Diagram = Generator::new("s1", Ty::empty(), Ty::empty()).into();
    /// assert_eq!(
    ///     (&s0 >> &s1).unwrap().normal_form(false).unwrap_err().to_string(),
    ///     "Diagram s0 >> s1 is not connected."
    /// );
    /// ```
    pub fn normal_form(&self, left: bool) -> Result<Self, Error> {
        let mut diagram = self.clone();
        let mut cache = HashSet::new();
        for step in self.normalize(left) {
            if !cache.insert(step.clone()) {
                return Err(Error::NotConnected {
                    diagram: self.to_string(),
                });
            }
            diagram = step;
        }
        Ok(diagram)
    }

    /// Partition this diagram into consecutive depth layers of mutually
    /// independent boxes.
    ///
    /// Repeatedly pulls every box that commutes past the current layer into
    /// it, then packages each layer as a single nested-diagram box at offset
    /// 0. Flattening the result normalizes to the same diagram as this one.
    #[must_use]
    pub fn slice(&self) -> Self {
        let mut diagram = self.clone();
        let mut slices = Vec::new();
        let mut i = 0;
        let mut cod = self.dom.clone();
        while i < diagram.len() {
            let dom = cod.clone();
            let mut pulled = 0;
            for j in (i + 1)..diagram.len() {
                if let Ok(moved) = diagram.interchange(j, i, false) {
                    diagram = moved;
                    pulled += 1;
                }
            }
            for j in i..=(i + pulled) {
                let (term, off) = (&diagram.boxes[j], diagram.offsets[j]);
                cod = cod.splice(off, term.dom().len(), term.cod());
            }
            slices.push(Term::Diagram(Self {
                dom,
                cod: cod.clone(),
                boxes: diagram.boxes[i..=(i + pulled)].to_vec(),
                offsets: diagram.offsets[i..=(i + pulled)].to_vec(),
            }));
            i += pulled + 1;
        }
        Self {
            dom: self.dom.clone(),
            cod: self.cod.clone(),
            offsets: vec![0; slices.len()],
            boxes: slices,
        }
    }

    /// The depth of this diagram: its number of layers after slicing.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoidal::{Diagram, Generator, Ty};
    /// let (x, y) = (Ty::new(["x"]), Ty::new(["y"]));
    /// let f: Diagram = Generator::new("f", x.clone(), y.clone()).into();
    /// let g: Diagram = Generator::new("g", y.clone(), x.clone()).into();
    /// assert_eq!(Diagram::<()>::id(&x | &y).depth(), 0);
    /// assert_eq!(f.depth(), 1);
    /// assert_eq!((&f | &g).depth(), 1);
    /// assert_eq!((&f >> &g).unwrap().depth(), 2);
    /// ```
    #[must_use]
    pub fn depth(&self) -> usize {
        self.slice().len()
    }
}

/// The lazy normalization step sequence returned by [`Diagram::normalize`].
///
/// A pull-based iterator: the consumer drives each step, and dropping it
/// cancels the rewrite with nothing to clean up. Restart by calling
/// [`Diagram::normalize`] on any intermediate diagram.
#[derive(Clone)]
pub struct Normalizer<D = ()> {
    diagram: Diagram<D>,
    left: bool,
    done: bool,
}

impl<D: Clone> Iterator for Normalizer<D> {
    type Item = Diagram<D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for i in 0..self.diagram.len().saturating_sub(1) {
            let (box0, box1) = (&self.diagram.boxes[i], &self.diagram.boxes[i + 1]);
            let (off0, off1) = (self.diagram.offsets[i], self.diagram.offsets[i + 1]);
            let candidate = if self.left {
                off1 >= off0 + box0.cod().len()
            } else {
                off0 >= off1 + box1.dom().len()
            };
            // A candidate pair can still share wires; skip it and keep scanning.
            if candidate {
                if let Ok(step) = self.diagram.interchange(i, i + 1, self.left) {
                    self.diagram = step;
                    return Some(self.diagram.clone());
                }
            }
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagram::strategies, diagram::Generator, ty::Ty};
    use paste::paste;

    fn xy() -> (Ty, Ty) {
        (Ty::new(["x"]), Ty::new(["y"]))
    }

    /// One unit, `n` nested caps, a counit in the middle, `n` nested cups:
    /// the asymptotic worst case for normalization (arXiv:1804.07832).
    fn spiral(n: usize) -> (Diagram, Generator, Generator) {
        let x = Ty::new(["x"]);
        let unit: Generator = Generator::new("unit", Ty::empty(), x.clone());
        let counit: Generator = Generator::new("counit", x.clone(), Ty::empty());
        let cup: Diagram = Generator::new("cup", &x | &x, Ty::empty()).into();
        let cap: Diagram = Generator::new("cap", Ty::empty(), &x | &x).into();
        let mut result = unit.to_diagram();
        for i in 0..n {
            result = (result >> (Diagram::id(x.pow(i)) | &cap | Diagram::id(x.pow(i + 1)))).unwrap();
        }
        result =
            (result >> (Diagram::id(x.pow(n)) | counit.to_diagram() | Diagram::id(x.pow(n)))).unwrap();
        for i in 0..n {
            result = (result
                >> (Diagram::id(x.pow(n - i - 1)) | &cup | Diagram::id(x.pow(n - i - 1))))
            .unwrap();
        }
        (result, unit, counit)
    }

    #[test]
    fn interchange_matches_the_explicit_two_step_form() {
        let (x, y) = xy();
        let (z, w) = (Ty::new(["z"]), Ty::new(["w"]));
        let f0: Diagram = Generator::new("f0", x.clone(), y.clone()).into();
        let f1: Diagram = Generator::new("f1", z.clone(), w.clone()).into();
        let d = ((Diagram::id(x) | &f1) >> (&f0 | Diagram::id(w))).unwrap();
        assert_eq!(d, (&f0 | &f1).interchange(0, 1, false).unwrap());
        assert_eq!(&f0 | &f1, d.interchange(0, 1, false).unwrap());
    }

    #[test]
    fn interchange_same_index_is_identity() {
        let (x, y) = xy();
        let f: Diagram = Generator::new("f", x, y).into();
        let d = &f | &f.dagger();
        assert_eq!(d.interchange(0, 0, false).unwrap(), d);
    }

    #[test]
    fn interchange_walks_non_adjacent_indices() {
        let (x, y) = xy();
        let f: Diagram = Generator::new("f", x.clone(), y.clone()).into();
        let d = &f | &f.dagger();
        let dd = (&d >> &d.dagger()).unwrap();
        assert_eq!(
            dd.interchange(0, 2, false).unwrap().to_string(),
            "Id(x) @ f† >> Id(x) @ f >> f @ Id(y) >> f† @ Id(y)"
        );
    }

    #[test]
    fn interchange_walk_both_directions() {
        let (x, y) = xy();
        let f0: Diagram = Generator::new("f0", x.clone(), y.clone()).into();
        let f1: Diagram = Generator::new("f1", y.clone(), x.clone()).into();
        let d = (((&f0 | Diagram::id(y.clone())) >> (&f1 | &f1)).unwrap()
            >> (Diagram::id(x.clone()) | &f0))
            .unwrap();
        assert_eq!(
            d.interchange(0, 2, false).unwrap_err(),
            Error::DoesNotCommute {
                box0: "f0".into(),
                box1: "f1".into()
            }
        );
        let expected = (((Diagram::id(x.clone()) | &f1) >> (&f0 | Diagram::id(x))).unwrap()
            >> (&f1 | &f0))
            .unwrap();
        assert_eq!(d.interchange(2, 0, false).unwrap(), expected);
    }

    #[test]
    fn interchange_rejects_boxes_sharing_wires() {
        let (x, y) = xy();
        let f: Diagram = Generator::new("f", x, y.clone()).into();
        let g: Diagram = Generator::new("g", y, Ty::new(["z"])).into();
        let d = (&f >> &g).unwrap();
        assert_eq!(
            d.interchange(0, 1, false).unwrap_err(),
            Error::DoesNotCommute {
                box0: "f".into(),
                box1: "g".into()
            }
        );
    }

    #[test]
    fn interchange_checks_bounds() {
        let (x, _) = xy();
        let d: Diagram = Diagram::id(x);
        assert_eq!(
            d.interchange(0, 1, false).unwrap_err(),
            Error::IndexOutOfRange { i: 0, j: 1, len: 0 }
        );
    }

    #[test]
    fn eckmann_hilton_up_to_interchange() {
        let s0: Diagram = Generator::new("s0", Ty::empty(), Ty::empty()).into();
        let s1: Diagram = Generator::new("s1", Ty::empty(), Ty::empty()).into();
        assert_eq!(&s0 | &s1, (&s0 >> &s1).unwrap());
        assert_eq!(&s0 | &s1, (&s1 | &s0).interchange(0, 1, false).unwrap());
        assert_eq!(&s1 | &s0, (&s1 >> &s0).unwrap());
        assert_eq!(&s1 | &s0, (&s0 | &s1).interchange(0, 1, false).unwrap());
    }

    #[test]
    fn scalars_slide_forever() {
        let s0: Diagram = Generator::new("s0", Ty::empty(), Ty::empty()).into();
        let s1: Diagram = Generator::new("s1", Ty::empty(), Ty::empty()).into();
        let steps: Vec<Diagram> = (&s0 | &s1).normalize(false).take(3).collect();
        let forward = (&s0 >> &s1).unwrap();
        let backward = (&s1 >> &s0).unwrap();
        assert_eq!(steps, vec![backward.clone(), forward, backward]);
        assert_eq!(
            (&s0 >> &s1).unwrap().normal_form(false).unwrap_err(),
            Error::NotConnected {
                diagram: "s0 >> s1".into()
            }
        );
    }

    #[test]
    fn normal_form_fixpoints() {
        let (x, y) = xy();
        assert_eq!(
            Diagram::<()>::id(Ty::empty()).normal_form(false).unwrap(),
            Diagram::id(Ty::empty())
        );
        assert_eq!(
            Diagram::<()>::id(&x | &y).normal_form(false).unwrap(),
            Diagram::id(&x | &y)
        );
        let f0: Diagram = Generator::new("f0", x.clone(), y.clone()).into();
        let f1: Diagram = Generator::new("f1", y.clone(), x.clone()).into();
        assert_eq!(f0.normal_form(false).unwrap(), f0);
        let composite = (&f0 >> &f1).unwrap();
        assert_eq!(composite.normal_form(false).unwrap(), composite);
    }

    #[test]
    fn normal_form_reorders_independent_boxes() {
        let (x, y) = xy();
        let f0: Diagram = Generator::new("f0", x.clone(), y.clone()).into();
        let f1: Diagram = Generator::new("f1", y.clone(), x.clone()).into();
        let d = ((Diagram::id(x.clone()) | &f1) >> (&f0 | Diagram::id(x.clone()))).unwrap();
        assert_eq!(d.normal_form(false).unwrap(), &f0 | &f1);
        let mirrored = ((Diagram::id(x.clone()) | &f1) >> (&f0 | Diagram::id(x))).unwrap();
        assert_eq!((&f0 | &f1).normal_form(true).unwrap(), mirrored);
    }

    #[test]
    fn spiral_normal_form_places_unit_next_to_counit() {
        for n in [2, 5] {
            let (d, unit, counit) = spiral(n);
            assert_eq!(d.boxes()[0], unit);
            assert_eq!(d.boxes()[n + 1], counit);
            let nf = d.normal_form(false).unwrap();
            assert_eq!(nf.boxes()[nf.len() - 1], counit);
            assert_eq!(nf.boxes()[n], unit);
        }
    }

    #[test]
    fn slice_groups_independent_boxes_into_layers() {
        let (x, y) = xy();
        let f0: Diagram = Generator::new("f0", x.clone(), y.clone()).into();
        let f1: Diagram = Generator::new("f1", y.clone(), x.clone()).into();
        let d = (((&f0 | Diagram::id(y.clone())) >> (&f0.dagger() | &f1)).unwrap()
            >> (Diagram::id(x) | &f0))
            .unwrap();
        let sliced = d.slice();
        assert!(sliced.offsets().iter().all(|&off| off == 0));
        assert_eq!(sliced.dom(), d.dom());
        assert_eq!(sliced.cod(), d.cod());
        assert_eq!(d.depth(), sliced.len());
        assert_eq!(
            d.slice().flatten().unwrap().normal_form(false).unwrap(),
            d.normal_form(false).unwrap()
        );
    }

    #[test]
    fn sliced_diagrams_print_their_layers_inline() {
        let (x, y) = xy();
        let (z, w) = (Ty::new(["z"]), Ty::new(["w"]));
        let f: Diagram = Generator::new("f", x, y.clone()).into();
        let g: Diagram = Generator::new("g", y.clone(), z.clone()).into();
        assert_eq!((&f >> &g).unwrap().slice().to_string(), "f >> g");
        let h: Diagram = Generator::new("h", z, w.clone()).into();
        assert_eq!((&f | &h).slice().to_string(), "Id(x) @ h >> f @ Id(w)");
    }

    type Unit = ();

    macro_rules! properties {
        ($D:ty) => {
            paste! {
                mod [<$D:snake:lower _rewrite_properties>] {
                    use super::*;
                    use proptest::prelude::*;
                    proptest! {
                        #[test]
                        fn interchange_preserves_shape(
                            d in strategies::diagrams::<$D>(),
                            i in 0_usize..8,
                            j in 0_usize..8,
                        ) {
                            if i < d.len() && j < d.len() {
                                if let Ok(e) = d.interchange(i, j, false) {
                                    prop_assert!(e.check_rep().is_ok());
                                    prop_assert_eq!(e.dom(), d.dom());
                                    prop_assert_eq!(e.cod(), d.cod());
                                    let mut before: Vec<String> =
                                        d.boxes().iter().map(ToString::to_string).collect();
                                    let mut after: Vec<String> =
                                        e.boxes().iter().map(ToString::to_string).collect();
                                    before.sort();
                                    after.sort();
                                    prop_assert_eq!(before, after);
                                }
                            } else {
                                prop_assert!(d.interchange(i, j, false).is_err());
                            }
                        }

                        #[test]
                        fn normalize_steps_are_well_formed(d in strategies::diagrams::<$D>()) {
                            for step in d.normalize(false).take(20) {
                                prop_assert!(step.check_rep().is_ok());
                                prop_assert_eq!(step.dom(), d.dom());
                                prop_assert_eq!(step.cod(), d.cod());
                            }
                        }

                        #[test]
                        fn normal_form_idempotent(d in strategies::diagrams::<$D>()) {
                            if let Ok(nf) = d.normal_form(false) {
                                prop_assert_eq!(nf.normal_form(false).unwrap(), nf);
                            }
                        }

                        #[test]
                        fn normal_form_idempotent_left(d in strategies::diagrams::<$D>()) {
                            if let Ok(nf) = d.normal_form(true) {
                                prop_assert_eq!(nf.normal_form(true).unwrap(), nf);
                            }
                        }

                        #[test]
                        fn slice_layers_at_offset_zero(d in strategies::diagrams::<$D>()) {
                            let sliced = d.slice();
                            prop_assert!(sliced.offsets().iter().all(|&off| off == 0));
                            prop_assert!(sliced.check_rep().is_ok());
                            prop_assert_eq!(sliced.dom(), d.dom());
                            prop_assert_eq!(sliced.cod(), d.cod());
                            prop_assert_eq!(d.depth(), sliced.len());
                            prop_assert!(d.depth() <= d.len());
                        }

                        #[test]
                        fn flatten_slice_normalizes_like_the_diagram(
                            d in strategies::diagrams::<$D>()
                        ) {
                            let flat = d.slice().flatten().unwrap();
                            prop_assert!(flat.check_rep().is_ok());
                            prop_assert_eq!(flat.dom(), d.dom());
                            prop_assert_eq!(flat.cod(), d.cod());
                            if let (Ok(a), Ok(b)) = (flat.normal_form(false), d.normal_form(false)) {
                                prop_assert_eq!(a, b);
                            }
                        }
                    }
                }
            }
        };
    }

    properties!(Unit);
    properties!(i64);
}
