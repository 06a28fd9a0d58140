mod application;
pub mod data;
mod input;
mod report;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use input::InputError;
pub use runtime_config::{InputSource, RuntimeConfig};
