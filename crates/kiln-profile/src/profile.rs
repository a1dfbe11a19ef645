//! Target profile: everything that differs between fuzzed engines.

use std::collections::BTreeMap;

use kiln_codegen::builder::ProgramBuilder;
use kiln_codegen::generator::CodeGenerator;
use kiln_codegen::registry::GeneratorRegistry;
use kiln_ir::types::ValueType;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown code generator: {name}")]
    UnknownGenerator { name: String },

    #[error("Profile leaves no selectable code generator")]
    EmptyRegistry,
}

/// Language version the target parses. Ordered oldest to newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcmaVersion {
    Es5,
    Es6,
    Es2017,
    Es2020,
}

/// Immutable description of one fuzzing target.
///
/// Built once at startup and shared read-only by every synthesis run.
#[derive(Debug, Clone)]
pub struct Profile {
    pub process_arguments: Vec<String>,
    pub process_env: BTreeMap<String, String>,
    pub code_prefix: String,
    pub code_suffix: String,
    pub ecma_version: EcmaVersion,
    /// Snippets that must crash the target; used by the startup self-test.
    pub crash_tests: Vec<String>,
    pub additional_code_generators: Vec<(CodeGenerator, u32)>,
    pub disabled_code_generators: Vec<String>,
    /// Globals the target exposes, by name.
    pub additional_builtins: BTreeMap<String, ValueType>,
}

impl Profile {
    /// Layer this profile over `base`: disables first, then additions.
    ///
    /// `base` is not modified. Disabling a name `base` does not contain is a
    /// configuration error, as is ending up with nothing selectable.
    pub fn build_registry(
        &self,
        base: &GeneratorRegistry,
    ) -> Result<GeneratorRegistry, ProfileError> {
        if let Some(name) = self
            .disabled_code_generators
            .iter()
            .find(|name| !base.contains(name))
        {
            return Err(ProfileError::UnknownGenerator { name: name.clone() });
        }

        let mut registry = base.clone();
        registry.disable_by_name(self.disabled_code_generators.iter().map(String::as_str));
        registry.add_generators(self.additional_code_generators.iter().cloned());

        if registry.total_weight() == 0 {
            return Err(ProfileError::EmptyRegistry);
        }

        tracing::debug!(
            generators = registry.len(),
            total_weight = registry.total_weight(),
            disabled = self.disabled_code_generators.len(),
            added = self.additional_code_generators.len(),
            "built generator registry"
        );
        Ok(registry)
    }

    /// Surround a program body with the profile's boilerplate.
    ///
    /// Plain concatenation: nothing is inserted between the parts.
    pub fn wrap(&self, body: &str) -> String {
        let mut script =
            String::with_capacity(self.code_prefix.len() + body.len() + self.code_suffix.len());
        script.push_str(&self.code_prefix);
        script.push_str(body);
        script.push_str(&self.code_suffix);
        script
    }

    /// A fresh builder that knows this target's builtins.
    pub fn builder(&self) -> ProgramBuilder {
        ProgramBuilder::new(self.additional_builtins.clone())
    }
}
