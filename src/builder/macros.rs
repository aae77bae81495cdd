//! Macros for ergonomic state machine construction.

/// Generate State trait implementation for simple enums.
///
/// Variants listed under `condition:` become condition states.
///
/// # Example
///
/// ```
/// use statehost::core::State;
/// use statehost::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Closed,
///         CheckLock,
///         Open,
///         Locked,
///     }
///     condition: [CheckLock]
/// }
///
/// assert!(Door::CheckLock.is_condition());
/// assert_eq!(Door::Open.name(), "Open");
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

        $(condition: [$($condition:ident),* $(,)?])?
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

            fn is_condition(&self) -> bool {
                match self {
                    $($(Self::$condition => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
