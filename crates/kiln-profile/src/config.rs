//! JSON profile configuration.
//!
//! Generators cannot be serialized, so the configuration names them and the
//! names are resolved against [`known_generators`] when the profile is built.

use std::collections::BTreeMap;

use kiln_codegen::generator::CodeGenerator;
use kiln_codegen::generators::base_generators;
use kiln_ir::types::ValueType;
use serde::{Deserialize, Serialize};

use crate::profile::{EcmaVersion, Profile, ProfileError};
use crate::profiles::target_generators;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorWeight {
    pub name: String,
    pub weight: u32,
}

/// Serialized form of a [`Profile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub process_arguments: Vec<String>,
    #[serde(default)]
    pub process_env: BTreeMap<String, String>,
    #[serde(default)]
    pub code_prefix: String,
    #[serde(default)]
    pub code_suffix: String,
    pub ecma_version: EcmaVersion,
    #[serde(default)]
    pub crash_tests: Vec<String>,
    #[serde(default)]
    pub additional_code_generators: Vec<GeneratorWeight>,
    #[serde(default)]
    pub disabled_code_generators: Vec<String>,
    #[serde(default)]
    pub additional_builtins: BTreeMap<String, ValueType>,
}

/// Every generator a configuration may refer to by name.
pub fn known_generators() -> Vec<CodeGenerator> {
    base_generators()
        .into_iter()
        .map(|(generator, _)| generator)
        .chain(target_generators())
        .collect()
}

impl ProfileConfig {
    /// Resolve generator names against `catalog`.
    pub fn into_profile(self, catalog: &[CodeGenerator]) -> Result<Profile, ProfileError> {
        let additional_code_generators = self
            .additional_code_generators
            .into_iter()
            .map(|entry| {
                catalog
                    .iter()
                    .find(|g| g.name() == entry.name)
                    .map(|g| (g.clone(), entry.weight))
                    .ok_or(ProfileError::UnknownGenerator { name: entry.name })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Profile {
            process_arguments: self.process_arguments,
            process_env: self.process_env,
            code_prefix: self.code_prefix,
            code_suffix: self.code_suffix,
            ecma_version: self.ecma_version,
            crash_tests: self.crash_tests,
            additional_code_generators,
            disabled_code_generators: self.disabled_code_generators,
            additional_builtins: self.additional_builtins,
        })
    }
}

/// Parse a JSON profile, resolving generator names against the known
/// generators.
pub fn parse_profile(json: &str) -> Result<Profile, ProfileError> {
    let config: ProfileConfig = serde_json::from_str(json)?;
    config.into_profile(&known_generators())
}
