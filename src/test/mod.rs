//! Shared fixtures for unit tests
//!
//! Factories build small, fully linked trees through [`crate::ast::AstBuilder`], and
//! [`TemplateFrontEnd`] stands in for the parser when exercising clone-by-reparse.

mod factories;

pub use factories::*;
pub use front_end::TemplateFrontEnd;
