//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod schema;
pub mod tool;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::register_tool;
pub use schema::{ParameterBuilder, ToolParameters, ToolSignature};
pub use tool::{FnTool, Tool};
pub use validation::{apply_defaults, validate_arguments};
