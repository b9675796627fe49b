//! Model Validation
//!
//! Runs the structural, reference and reachability checks over a model and
//! accumulates every defect. No check is skipped because an earlier one
//! failed; the outcome only branches on "no defects" vs "some defects" at
//! the very end.
//!
//! ```no_run
//! use twin_schemas::{loader, validation};
//!
//! let model = loader::from_file("thermostat.json").unwrap();
//! match validation::validate(model) {
//!     Ok(model) => println!("{} is valid", model.id),
//!     Err(defects) => eprint!("{}", defects),
//! }
//! ```

pub mod diagnostics;
pub mod reachability;
pub mod references;
pub mod structural;

pub use diagnostics::{Defect, DefectKind, Defects, ElementKind};
pub use reachability::{check_reachability, unreachable_states};
pub use references::{check_references, duplicate_names};
pub use structural::check_structure;

use tracing::debug;

use crate::config::ValidationConfig;
use crate::model::Model;

/// Validation outcome: the untouched model, or every defect found
pub type ValidationResult = std::result::Result<Model, Defects>;

/// Validation orchestrator
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Collect every defect in the model
    pub fn check(&self, model: &Model) -> Defects {
        let mut defects = Defects::new();

        let structural = check_structure(model, &self.config.expected_context);
        debug!(model = %model.id, count = structural.len(), "structural check");
        defects.merge(structural);

        let references = check_references(model, &self.config);
        debug!(model = %model.id, count = references.len(), "reference check");
        defects.merge(references);

        if let Some(machine) = &model.state_machine {
            let reachability = check_reachability(machine);
            debug!(model = %model.id, count = reachability.len(), "reachability check");
            defects.merge(reachability);
        }

        defects
    }

    /// Hand the model back if it has no defects
    pub fn validate(&self, model: Model) -> ValidationResult {
        let defects = self.check(&model);

        if defects.is_empty() {
            debug!(model = %model.id, "model is valid");
            Ok(model)
        } else {
            debug!(model = %model.id, defects = defects.len(), "model has defects");
            Err(defects)
        }
    }
}

/// Validate with the default configuration
pub fn validate(model: Model) -> ValidationResult {
    Validator::default().validate(model)
}
