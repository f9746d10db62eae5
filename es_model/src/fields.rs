use std::hash::Hash;

/// How a field reacts to the `add` / `remove` flag of a modifier child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergePolicy {
    /// A single string or number.
    Scalar,
    /// A boolean that is set by the child's presence alone.
    Flag,
    /// An ordered list of strings, duplicates allowed.
    List,
    /// A key to value mapping keyed by the child's first argument.
    Map,
    /// Multi-paragraph text, where repeated children append.
    Text,
    /// An ordered list of nested objects, with the same repeat rule as text.
    Sequence,
    /// A value built from the child's whole subtree, replaced as a unit.
    Composite,
}

/// The closed set of child names an entity kind understands.
pub trait FieldKey: Copy + Eq + Hash + 'static {
    fn from_key(name: &str) -> Option<Self>;

    /// The child node name that selects this field.
    fn key(self) -> &'static str;

    fn policy(self) -> MergePolicy;
}

/// Declares a field-key enum together with its name table and merge policies.
macro_rules! field_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $key:literal => $policy:ident,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];
        }

        impl $crate::FieldKey for $name {
            fn from_key(name: &str) -> Option<Self> {
                match name {
                    $($key => Some(Self::$variant),)*
                    _ => None,
                }
            }

            fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)*
                }
            }

            fn policy(self) -> $crate::MergePolicy {
                match self {
                    $(Self::$variant => $crate::MergePolicy::$policy,)*
                }
            }
        }
    };
}
