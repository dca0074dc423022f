pub mod loader;
pub mod pipeline;
