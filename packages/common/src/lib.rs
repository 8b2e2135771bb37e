pub mod error;
pub mod filesystem;
pub mod text_fields;
pub mod variables;
pub mod visitor;

pub use error::*;
pub use filesystem::*;
pub use text_fields::text_fields;
pub use variables::*;
pub use visitor::*;
