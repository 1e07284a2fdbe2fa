//! Banner configuration: rate tables, activity windows, validation and the
//! registry of published banners.

pub mod registry;
pub mod types;
pub mod validation;

pub use registry::*;
pub use types::*;
pub use validation::*;
