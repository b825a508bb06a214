// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]

//! # privir
//!
//! Compiler core for privacy-annotated smart-contract source: the tree representation,
//! the nominal type system with its privacy-label layer, canonical instance targets for
//! dataflow facts, and the source generator.
//!
//! Every data type in the source language carries an owner label (`@all`, `@me`,
//! `@tee`, or a named owner such as `@x` in `mapping(address!x => uint@x)`). Later
//! passes of the compiler decorate the tree, reason about which values may flow to
//! which owners, and finally render the tree either as annotated source (for
//! diagnostics and structural cloning) or as plain source for the target platform.
//!
//! ## Features
//!
//! - **Arena tree** - nodes addressed by stable [`ast::NodeId`] handles, with parent
//!   links, exhaustive child enumeration and in-place rewriting
//! - **Typed construction** - [`ast::AstBuilder`] resolves operator symbols, keywords
//!   and reserved identifiers while building
//! - **Type system** - implicit conversion and type combination over
//!   [`types::TypeName`], label combination against an external
//!   [`types::PartitionOracle`]
//! - **Instance targets** - [`ast::InstanceTarget`] canonicalizes location expressions
//!   into hashable keys for read/modify sets
//! - **Generator** - exact source output in two dialects, plus clone-by-reparse
//!   through a [`codegen::FrontEnd`]
//!
//! ## Quick Start
//!
//! ```rust
//! use privir::prelude::*;
//!
//! let mut ast = Ast::default();
//! let mut b = AstBuilder::new(&mut ast);
//! let decl = b.variable_declaration(&[], AnnotatedTypeName::uint_all(), "x", None)?;
//! let one = b.number(1);
//! let two = b.number(2);
//! let sum = b.binary(one, "+", two)?;
//! let stmt = b.var_decl_statement(decl, Some(sum));
//!
//! assert_eq!(render(&ast, stmt)?, "uint x = 1 + 2;");
//! # Ok::<(), privir::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber. Rewrites that splice
//! or drop statements, implicit constructor synthesis and clone epochs are logged at
//! `debug`; compiler warnings issued against a node are logged at `warn`.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use privir::prelude::*;
///
/// let mut ast = Ast::new(Config::testing());
/// let stmt = AstBuilder::new(&mut ast).break_stmt();
/// assert_eq!(render(&ast, stmt)?, "break;");
/// # Ok::<(), privir::Error>(())
/// ```
pub mod prelude;

/// Tree nodes, traversal, rewriting and construction
pub mod ast;

/// Source generation and clone-by-reparse
pub mod codegen;

/// Compiler configuration
pub mod config;

/// Data types, implicit conversion and privacy labels
pub mod types;

/// `privir` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `privir` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use privir::{ast::{Ast, AstBuilder}, Error};
///
/// let mut ast = Ast::default();
/// match AstBuilder::new(&mut ast).identifier("pv__tmp") {
///     Err(Error::ReservedIdentifier { name, .. }) => assert_eq!(name, "pv__tmp"),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub use error::Error;

pub use config::Config;
