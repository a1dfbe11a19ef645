pub mod v8;

use kiln_codegen::generator::CodeGenerator;

use crate::profile::Profile;

/// Built-in profile by target name.
pub fn profile_by_name(name: &str) -> Option<Profile> {
    match name {
        "v8" => Some(v8::v8_profile()),
        _ => None,
    }
}

/// Target-specific generators that profile configuration may refer to by
/// name, in addition to the base catalog.
pub fn target_generators() -> Vec<CodeGenerator> {
    vec![v8::force_turbofan_generator()]
}
