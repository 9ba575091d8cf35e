pub mod errors;
pub mod output;
pub mod paths;
pub mod validation;

pub use errors::*;
pub use output::*;
pub use paths::*;
pub use validation::*;
