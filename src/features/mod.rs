pub mod audio;
pub mod enrich;
pub mod errors;
pub mod gemini;
pub mod parser;
pub mod quiz;
pub mod relay;
pub mod study;
