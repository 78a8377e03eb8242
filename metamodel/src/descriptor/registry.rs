//! The set of domain types known to the metamodel.

use std::collections::{BTreeMap, HashSet};
use std::mem;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MethodDescriptor, TypeDescriptor};
use crate::error::{MetaModelError, Result};

/// On-disk layout of a descriptor file: a list of `[[type]]` tables.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DescriptorFile {
    #[serde(default, rename = "type")]
    types: Vec<TypeDescriptor>,
}

/// Registered type descriptors, keyed by type name.
///
/// Discovery order is the lexical order of type names, so metamodel builds are
/// deterministic regardless of registration order.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, returning the one it replaces.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        self.types.insert(descriptor.type_name.clone(), descriptor)
    }

    /// Registers a descriptor, builder style.
    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Registers every `[[type]]` table of a TOML descriptor document.
    ///
    /// # Errors
    ///
    /// Returns [`MetaModelError::Descriptor`] if the document does not parse.
    pub fn register_toml_str(&mut self, source: &str) -> Result<usize> {
        let file: DescriptorFile =
            toml::from_str(source).map_err(|e| MetaModelError::Descriptor(e.to_string()))?;
        Ok(self.register_all(file.types))
    }

    /// Registers every entry of a JSON descriptor document (`{"type": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns [`MetaModelError::Descriptor`] if the document does not parse.
    pub fn register_json_str(&mut self, source: &str) -> Result<usize> {
        let file: DescriptorFile = serde_json::from_str(source)
            .map_err(|e| MetaModelError::Descriptor(e.to_string()))?;
        Ok(self.register_all(file.types))
    }

    /// Registers a descriptor file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or does not parse.
    pub fn register_file(&mut self, path: &Path) -> Result<usize> {
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => self.register_toml_str(&source),
            Some("json") => self.register_json_str(&source),
            _ => Err(MetaModelError::Descriptor(format!(
                "unsupported descriptor file: {}",
                path.display()
            ))),
        }
    }

    fn register_all(&mut self, types: Vec<TypeDescriptor>) -> usize {
        let count = types.len();
        for descriptor in types {
            if let Some(previous) = self.register(descriptor) {
                debug!(type_name = %previous.type_name, "descriptor re-registered");
            }
        }
        count
    }

    /// Looks up a descriptor by type name.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    /// All registered descriptors in discovery order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All methods visible on a type: its own, then those of its super type
    /// chain, then those of its interfaces.
    ///
    /// Each method name appears once. The first declaration wins, and
    /// annotations of kinds it does not declare itself are inherited from
    /// the declarations it overrides. Unregistered super types and
    /// interfaces are skipped.
    #[must_use]
    pub fn resolved_methods(&self, type_name: &str) -> Vec<MethodDescriptor> {
        let mut visited = HashSet::new();
        let mut resolved: Vec<MethodDescriptor> = Vec::new();
        self.collect_methods(type_name, &mut visited, &mut resolved);
        resolved
    }

    fn collect_methods(
        &self,
        type_name: &str,
        visited: &mut HashSet<String>,
        resolved: &mut Vec<MethodDescriptor>,
    ) {
        if !visited.insert(type_name.to_owned()) {
            return;
        }
        let Some(descriptor) = self.get(type_name) else {
            debug!(type_name, "supertype not registered; skipping");
            return;
        };
        for method in &descriptor.methods {
            match resolved.iter_mut().find(|m| m.name == method.name) {
                Some(overriding) => inherit_annotations(overriding, method),
                None => resolved.push(method.clone()),
            }
        }
        if let Some(super_type) = &descriptor.super_type {
            self.collect_methods(super_type, visited, resolved);
        }
        for interface in &descriptor.interfaces {
            self.collect_methods(interface, visited, resolved);
        }
    }
}

fn inherit_annotations(overriding: &mut MethodDescriptor, overridden: &MethodDescriptor) {
    for annotation in &overridden.annotations {
        let declared = overriding
            .annotations
            .iter()
            .any(|a| mem::discriminant(a) == mem::discriminant(annotation));
        if !declared {
            overriding.annotations.push(annotation.clone());
        }
    }
}
