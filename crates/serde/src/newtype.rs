use starkcall_common::Felt;

/// Conversion between a felt newtype and its inner [Felt], used by the
/// `serde_with` adapters in this crate.
pub trait NewType<T> {
    fn into_inner(self) -> T;
    fn from_inner(inner: T) -> Self;
}

impl NewType<Felt> for Felt {
    fn into_inner(self) -> Felt {
        self
    }

    fn from_inner(inner: Felt) -> Self {
        inner
    }
}

macro_rules! newtype {
    ($target:ty: $inner:ty $(,)?) => {
        impl NewType<$inner> for $target {
            fn into_inner(self) -> $inner {
                self.0
            }

            fn from_inner(inner: $inner) -> Self {
                Self(inner)
            }
        }
    };
    ($head:ty: $head_inner:ty, $($tail:ty: $tail_inner:ty),+ $(,)?) => {
        newtype!($head: $head_inner);
        newtype!($($tail: $tail_inner),+);
    };
}

newtype!(
    starkcall_common::CallParam: Felt,
    starkcall_common::TransactionSignatureElem: Felt,
);
