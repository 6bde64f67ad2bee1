pub mod ids;
pub mod name;
pub mod value;

pub use ids::{SelectorName, VariableName};
pub use name::{Name, Path, PathElement};
pub use value::{PropertyType, Value, format_double};
