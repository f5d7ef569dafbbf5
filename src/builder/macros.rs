//! Macros for declaring phase enums.

/// Declare a fieldless enum and implement [`State`](crate::core::State) and
/// `Display` for it. Variant names double as state names.
///
/// # Example
///
/// ```
/// use fumble::state_enum;
/// use fumble::core::State;
///
/// state_enum! {
///     #[derive(Copy, Eq)]
///     pub enum Blink {
///         Open,
///         Closed,
///         Asleep,
///     }
///     final: [Asleep]
/// }
///
/// assert_eq!(Blink::Closed.to_string(), "Closed");
/// assert!(Blink::Asleep.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}
