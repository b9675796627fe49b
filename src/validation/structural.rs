//! Structural checks on the model root

use crate::dtmi::{self, DtmiCheck};
use crate::model::{Model, INTERFACE_KIND};

use super::diagnostics::{Defect, Defects};

/// Check context, identifier, kind and mandatory text fields.
///
/// Each check contributes independently; none of them stops the others.
pub fn check_structure(model: &Model, expected_context: &str) -> Defects {
    let mut defects = Defects::new();

    if model.context != expected_context {
        defects.push(Defect::InvalidContext {
            expected: expected_context.to_string(),
            actual: model.context.clone(),
        });
    }

    if let DtmiCheck::Invalid(reason) = dtmi::check(&model.id) {
        defects.push(Defect::InvalidDtmi {
            id: model.id.clone(),
            reason,
        });
    }

    if model.display_name.is_empty() {
        defects.push(Defect::missing_field("displayName"));
    }

    if model.description.is_empty() {
        defects.push(Defect::missing_field("description"));
    }

    if model.kind != INTERFACE_KIND {
        defects.push(Defect::InvalidFieldValue {
            field: "@type".to_string(),
            expected: format!("'{}'", INTERFACE_KIND),
            actual: model.kind.clone(),
        });
    }

    defects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CONTEXT;
    use crate::validation::DefectKind;

    #[test]
    fn test_well_formed_root_has_no_defects() {
        let model = Model::new("dtmi:com:example:Pump;1", "Pump", "Water pump");
        assert!(check_structure(&model, CONTEXT).is_empty());
    }

    #[test]
    fn test_every_root_defect_is_reported() {
        let mut model = Model::new("dtmi:123bad;1", "", "");
        model.context = "dtmi:other:context;2".to_string();
        model.kind = "Component".to_string();

        let defects = check_structure(&model, CONTEXT);
        let kinds: Vec<_> = defects.iter().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                DefectKind::InvalidContext,
                DefectKind::InvalidDtmi,
                DefectKind::MissingRequiredField,
                DefectKind::MissingRequiredField,
                DefectKind::InvalidFieldValue,
            ]
        );
    }

    #[test]
    fn test_whitespace_text_counts_as_present() {
        let model = Model::new("dtmi:com:example:Fan;1", "   ", "\t");
        assert!(check_structure(&model, CONTEXT).is_empty());
    }

    #[test]
    fn test_context_defect_names_both_values() {
        let mut model = Model::new("dtmi:com:example:Pump;1", "Pump", "Water pump");
        model.context = "wrong".to_string();

        let defects = check_structure(&model, CONTEXT);
        assert_eq!(
            defects.all(),
            &[Defect::InvalidContext {
                expected: CONTEXT.to_string(),
                actual: "wrong".to_string(),
            }]
        );
    }
}
