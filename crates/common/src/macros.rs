/// Generates felt newtype-wrappers and the `macro_prelude` module.
///
/// Note that this is a single-use macro as it generates a module.
///
/// Usage:
///     `felt_newtypes!([x1, x2, ..])`
/// where `x` is the set of `Felt` wrapper types.
macro_rules! felt_newtypes {
    ([$($felt:ident),* $(,)?]) => {
        $(crate::macros::felt_newtypes!(@define_felt $felt);)*

        pub mod macro_prelude {
            pub use super::felt;

            $(crate::macros::felt_newtypes!(@generate_felt_macro $felt);)*
            $(crate::macros::felt_newtypes!(@generate_use $felt);)*
        }
    };

    (@define_felt $target:ident) => {
        #[derive(Copy, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, PartialOrd, Ord)]
        pub struct $target(pub crate::Felt);

        #[allow(unused)]
        impl $target {
            pub const ZERO: Self = Self(crate::Felt::ZERO);

            pub fn as_inner(&self) -> &crate::Felt {
                &self.0
            }
        }

        impl From<crate::Felt> for $target {
            fn from(felt: crate::Felt) -> Self {
                Self(felt)
            }
        }

        $crate::macros::fmt::thin_debug!($target);
        $crate::macros::fmt::thin_display!($target);
    };

    (@generate_use $target:ident) => {
        paste::paste! {
            pub use [<$target:snake>];
        }
    };

    (@generate_felt_macro $target:ident) => {
        paste::paste! {
            #[macro_export]
            macro_rules! [<$target:snake>] {
                ($hex:expr) => {
                    $crate::$target($crate::felt!($hex))
                };
            }
        }
    };
}
pub(super) use felt_newtypes;

pub(super) mod fmt {

    /// Adds a thin display implementation which uses the inner fields Display.
    macro_rules! thin_display {
        ($target:ty) => {
            impl std::fmt::Display for $target {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    std::fmt::Display::fmt(&self.0, f)
                }
            }
        };
    }

    /// Adds a thin Debug implementation, which skips `X(Felt(debug))` as `X(debug)`.
    macro_rules! thin_debug {
        ($target:ty) => {
            impl std::fmt::Debug for $target {
                fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(fmt, "{}({})", stringify!($target), self.0)
                }
            }
        };
    }

    pub(crate) use {thin_debug, thin_display};
}

/// Creates a [Felt](crate::Felt) from a hex string literal verified at compile time.
#[macro_export]
macro_rules! felt {
    ($hex:expr) => {{
        // This forces const evaluation of the macro call. Without this the invocation will only be evaluated
        // at runtime.
        const CONST_FELT: $crate::Felt = match $crate::Felt::from_hex_str($hex) {
            Ok(f) => f,
            Err($crate::FeltParseError::Empty) => panic!("Empty hex literal"),
            Err($crate::FeltParseError::InvalidCharacter { .. }) => panic!("Invalid hex digit"),
            Err($crate::FeltParseError::Overflow) => panic!("Felt overflow"),
        };
        CONST_FELT
    }};
}
