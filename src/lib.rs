//! Twin Schemas
//!
//! Domain model and validation engine for digital-twin device descriptions.
//! A decoded [`Model`] is checked for structural soundness, reference
//! integrity and state reachability before downstream tools (code
//! generators, simulators, CI gates) are allowed to trust it.
//!
//! ## Features
//!
//! - **Identifier Grammar**: `dtmi:segment(:segment)*;major(.minor)*`
//! - **Error Accumulation**: every defect is reported in one pass
//! - **Reference Integrity**: triggers, completion events and emitted events resolve
//! - **Reachability**: every state is reachable from the initial state
//! - **Analysis**: element statistics and unused events/schemas
//!
//! ## Architecture
//!
//! ```text
//! JSON ──loader──▶ Model ──validation──▶ Ok(Model) ──▶ analysis / consumers
//!                                   └──▶ Err(Defects)
//! ```

pub mod analysis;
pub mod config;
pub mod dtmi;
pub mod error;
pub mod graph;
pub mod loader;
pub mod model;
pub mod validation;

pub use analysis::{analyze, find_unused, ModelStatistics, UnusedElements};
pub use config::{OutputFormat, TwinConfig, ValidationConfig};
pub use dtmi::{Dtmi, DtmiCheck};
pub use error::{Result, TwinError};
pub use graph::StateGraph;
pub use model::Model;
pub use validation::{validate, Defect, DefectKind, Defects, ElementKind, ValidationResult, Validator};
