pub mod aws;
pub mod cert;
pub mod cli;
pub mod rebind;
pub mod utils;

pub use cli::{args, commands};
pub use utils::errors;
