macro_rules! impl_arith(
    ($type:ident, $operation:ident, $method:ident, $impl:ident, true) => {
        impl<D: Clone> $operation for $type<D> {
            type Output = Result<$type<D>, Error>;
            fn $method(self, other: $type<D>) -> Self::Output {
                self.$impl(&other)
            }
        }
        impl<D: Clone> $operation<&$type<D>> for $type<D> {
            type Output = Result<$type<D>, Error>;
            fn $method(self, other: &$type<D>) -> Self::Output {
                self.$impl(other)
            }
        }
        impl<D: Clone> $operation<$type<D>> for &$type<D> {
            type Output = Result<$type<D>, Error>;
            fn $method(self, other: $type<D>) -> Self::Output {
                self.$impl(&other)
            }
        }
        impl<D: Clone> $operation<&$type<D>> for &$type<D> {
            type Output = Result<$type<D>, Error>;
            fn $method(self, other: &$type<D>) -> Self::Output {
                self.$impl(other)
            }
        }
    };
    ($type:ident, $operation:ident, $method:ident, $impl:ident, false) => {
        impl<D: Clone> $operation for $type<D> {
            type Output = $type<D>;
            fn $method(self, other: $type<D>) -> Self::Output {
                self.$impl(&other)
            }
        }
        impl<D: Clone> $operation<&$type<D>> for $type<D> {
            type Output = $type<D>;
            fn $method(self, other: &$type<D>) -> Self::Output {
                self.$impl(other)
            }
        }
        impl<D: Clone> $operation<$type<D>> for &$type<D> {
            type Output = $type<D>;
            fn $method(self, other: $type<D>) -> Self::Output {
                self.$impl(&other)
            }
        }
        impl<D: Clone> $operation<&$type<D>> for &$type<D> {
            type Output = $type<D>;
            fn $method(self, other: &$type<D>) -> Self::Output {
                self.$impl(other)
            }
        }
    };
    // Same as the `false` arm, for types without a payload parameter.
    ($type:ident, $operation:ident, $method:ident, $impl:ident, simple) => {
        impl $operation for $type {
            type Output = $type;
            fn $method(self, other: $type) -> Self::Output {
                self.$impl(&other)
            }
        }
        impl $operation<&$type> for $type {
            type Output = $type;
            fn $method(self, other: &$type) -> Self::Output {
                self.$impl(other)
            }
        }
        impl $operation<$type> for &$type {
            type Output = $type;
            fn $method(self, other: $type) -> Self::Output {
                self.$impl(&other)
            }
        }
        impl $operation<&$type> for &$type {
            type Output = $type;
            fn $method(self, other: &$type) -> Self::Output {
                self.$impl(other)
            }
        }
    };
);

pub(crate) use impl_arith;
