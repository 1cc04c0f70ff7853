//! Bridge surface between a UI process and the local PLR pipeline.
pub mod bridge;
pub mod picker;
pub mod serve;
