//! Operator predicate library.
//!
//! Each criterion type has its own operator enum and a pure `evaluate`
//! function mapping `(value, operator, match_value)` to a boolean. Operand
//! shapes an operator cannot work with evaluate to `false`; nothing in here
//! returns an error.

/// Declare an operator enum together with its wire names.
///
/// Extra string literals after `|` are accepted as aliases when parsing.
macro_rules! operator_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every operator in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Get the wire name of this operator
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Parse a wire name (or one of its aliases)
            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $($wire $(| $alias)* => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod array;
pub mod boolean;
pub mod date;
pub mod geo;
pub mod map;
pub mod number;
pub mod object;
pub mod set;
pub mod string;

pub use array::ArrayOperator;
pub use boolean::BooleanOperator;
pub use date::DateOperator;
pub use geo::GeoOperator;
pub use map::MapOperator;
pub use number::NumberOperator;
pub use object::ObjectOperator;
pub use set::SetOperator;
pub use string::StringOperator;

/// Criterion types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CriterionType {
    Array,
    Boolean,
    Custom,
    Date,
    Geo,
    Map,
    Number,
    Object,
    Set,
    String,
}

impl CriterionType {
    pub const ALL: &'static [CriterionType] = &[
        CriterionType::Array,
        CriterionType::Boolean,
        CriterionType::Custom,
        CriterionType::Date,
        CriterionType::Geo,
        CriterionType::Map,
        CriterionType::Number,
        CriterionType::Object,
        CriterionType::Set,
        CriterionType::String,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionType::Array => "ARRAY",
            CriterionType::Boolean => "BOOLEAN",
            CriterionType::Custom => "CUSTOM",
            CriterionType::Date => "DATE",
            CriterionType::Geo => "GEO",
            CriterionType::Map => "MAP",
            CriterionType::Number => "NUMBER",
            CriterionType::Object => "OBJECT",
            CriterionType::Set => "SET",
            CriterionType::String => "STRING",
        }
    }

    /// Parse a type name; `TEXT` is accepted for `STRING`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ARRAY" => Some(CriterionType::Array),
            "BOOLEAN" => Some(CriterionType::Boolean),
            "CUSTOM" => Some(CriterionType::Custom),
            "DATE" => Some(CriterionType::Date),
            "GEO" => Some(CriterionType::Geo),
            "MAP" => Some(CriterionType::Map),
            "NUMBER" => Some(CriterionType::Number),
            "OBJECT" => Some(CriterionType::Object),
            "SET" => Some(CriterionType::Set),
            "STRING" | "TEXT" => Some(CriterionType::String),
            _ => None,
        }
    }

    /// Wire names of the operators this type accepts
    pub fn operator_names(&self) -> Vec<&'static str> {
        fn names<T: Copy>(all: &[T], name: fn(&T) -> &'static str) -> Vec<&'static str> {
            all.iter().map(name).collect()
        }
        match self {
            CriterionType::Array => names(ArrayOperator::ALL, ArrayOperator::as_str),
            CriterionType::Boolean => names(BooleanOperator::ALL, BooleanOperator::as_str),
            CriterionType::Custom => vec![],
            CriterionType::Date => names(DateOperator::ALL, DateOperator::as_str),
            CriterionType::Geo => names(GeoOperator::ALL, GeoOperator::as_str),
            CriterionType::Map => names(MapOperator::ALL, MapOperator::as_str),
            CriterionType::Number => names(NumberOperator::ALL, NumberOperator::as_str),
            CriterionType::Object => names(ObjectOperator::ALL, ObjectOperator::as_str),
            CriterionType::Set => names(SetOperator::ALL, SetOperator::as_str),
            CriterionType::String => names(StringOperator::ALL, StringOperator::as_str),
        }
    }

    /// Whether values of this type are normalized unless told otherwise
    pub fn normalizes_by_default(&self) -> bool {
        matches!(
            self,
            CriterionType::Array
                | CriterionType::Map
                | CriterionType::Object
                | CriterionType::Set
                | CriterionType::String
        )
    }

    /// Whether an array value is tested element by element unless told otherwise
    pub fn matches_in_array_by_default(&self) -> bool {
        matches!(
            self,
            CriterionType::Boolean
                | CriterionType::Date
                | CriterionType::Number
                | CriterionType::String
        )
    }
}

impl std::fmt::Display for CriterionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare a collection size against a numeric match value
pub(crate) fn compare_size(
    size: usize,
    match_value: &crate::value::Value,
    cmp: fn(f64, f64) -> bool,
) -> bool {
    match match_value.as_f64() {
        Some(n) => cmp(size as f64, n),
        None => false,
    }
}
