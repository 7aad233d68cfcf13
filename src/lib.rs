pub mod api;
pub mod ast;
pub mod builder;
pub mod constants;
pub mod definitions;
pub mod error;
pub mod exercise;
pub mod json;
pub mod logging;
pub mod model;
pub mod parser;
pub mod plan;
pub mod platform;
pub mod sport;

pub use api::{compile, compile_steps, compile_yaml};
pub use ast::{StepBody, StepEntry};
pub use error::*;
pub use model::*;
pub use parser::{parse_detail, parse_step_name};
