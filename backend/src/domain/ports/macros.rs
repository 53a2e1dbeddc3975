//! Helper macro generating port error enums.
//!
//! Each variant gets a snake_case constructor taking `impl Into<_>` fields.
//! Variants prefixed with `[unavailable]` mark the backend as unreachable;
//! the generated `From` impl reports those as `ServiceUnavailable` and every
//! other variant as an internal error.

macro_rules! define_port_error {
    (@flag unavailable) => { true };
    (@flag) => { false };

    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $([$flag:ident])?
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// True when the backend could not be reached at all.
            #[must_use]
            pub fn is_unavailable(&self) -> bool {
                match self {
                    $( Self::$variant { .. } => define_port_error!(@flag $($flag)?), )*
                }
            }
        }

        impl ::core::convert::From<$name> for $crate::domain::Error {
            fn from(error: $name) -> Self {
                if error.is_unavailable() {
                    Self::service_unavailable(error.to_string())
                } else {
                    Self::internal(error.to_string())
                }
            }
        }
    };
}

pub(crate) use define_port_error;
