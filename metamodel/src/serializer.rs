//! JSON dump of a built metamodel.

use serde::Serialize;

use crate::error::Result;
use crate::metamodel::MetaModel;
use crate::specification::SpecificationSummary;
use crate::validation::ValidationFailures;

#[derive(Serialize)]
struct MetaModelDump<'a> {
    version: u64,
    specifications: Vec<SpecificationSummary<'a>>,
    validation_failures: &'a ValidationFailures,
}

/// Serializes every specification with its members, parameters and facets
/// (kind, precedence, source, payload), plus the validation failures.
///
/// # Errors
///
/// Returns [`MetaModelError::Json`](crate::MetaModelError::Json) if
/// serialization fails.
pub fn to_json(metamodel: &MetaModel) -> Result<String> {
    let dump = MetaModelDump {
        version: metamodel.version(),
        specifications: metamodel
            .specifications()
            .iter()
            .map(|spec| spec.summary())
            .collect(),
        validation_failures: metamodel.validation_failures(),
    };
    Ok(serde_json::to_string_pretty(&dump)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetaModelConfig;
    use crate::descriptor::{MethodDescriptor, TypeDescriptor, TypeRegistry, ValueType};
    use crate::specification::SpecificationLoader;

    #[test]
    fn dump_lists_members_and_facets() {
        let registry = TypeRegistry::new().with(
            TypeDescriptor::new("demo.Customer")
                .with_method(MethodDescriptor::new("getName", ValueType::String)),
        );
        let metamodel = SpecificationLoader::new(MetaModelConfig::default()).load(&registry);
        let json = to_json(&metamodel).unwrap_or_default();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();

        let spec = &parsed["specifications"][0];
        assert_eq!(spec["logical_type"], "demo.Customer");
        assert_eq!(spec["members"][0]["id"], "name");
        assert_eq!(spec["members"][0]["feature_type"], "property");
        let kinds: Vec<&str> = spec["members"][0]["facets"]
            .as_array()
            .map(|facets| facets.iter().filter_map(|f| f["kind"].as_str()).collect())
            .unwrap_or_default();
        assert!(kinds.contains(&"property-accessor"));
        assert!(kinds.contains(&"mandatory"));
    }
}
