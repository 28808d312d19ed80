pub mod quiz;
pub mod relay;
pub mod study;
