pub mod environment;
mod error;

pub use environment::{EnvSource, ProcessEnv};
pub use error::{GeneratorError, GeneratorResult};
