pub mod config;
pub mod encoding;
pub mod errors;
pub mod registry;
pub mod schema;
pub mod signing;
pub mod types;

pub use registry::{TypeDefinition, TypedSchemaRegistry};
pub use types::bounty;
pub use types::typed_data;
