use rand_chacha::ChaCha8Rng;

use crate::generator::CodeGenerator;
use crate::weighted::{SelectError, WeightedList};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("No generator can be selected: {0}")]
    Unselectable(#[from] SelectError),
}

/// Active generators with their selection weights. Names are unique.
///
/// Edited once at configuration time, then only read during synthesis runs,
/// so a single registry can be shared across workers.
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: WeightedList<CodeGenerator>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self {
            generators: WeightedList::new(),
        }
    }

    /// Add a generator. A generator with the same name is replaced in place
    /// (last write wins).
    pub fn add(&mut self, generator: CodeGenerator, weight: u32) {
        let name = generator.name().to_string();
        let replaced = self
            .generators
            .replace_where(|g| g.name() == name, generator.clone(), weight);
        if !replaced {
            self.generators.push(generator, weight);
        }
    }

    pub fn add_generators(&mut self, generators: impl IntoIterator<Item = (CodeGenerator, u32)>) {
        for (generator, weight) in generators {
            self.add(generator, weight);
        }
    }

    /// Remove a generator by name. Unknown names are ignored.
    pub fn disable(&mut self, name: &str) -> bool {
        self.generators.remove_where(|g| g.name() == name) > 0
    }

    pub fn disable_by_name<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.disable(name);
        }
    }

    /// Pick one generator with probability proportional to its weight.
    pub fn select(&self, rng: &mut ChaCha8Rng) -> Result<&CodeGenerator, RegistryError> {
        Ok(self.generators.select(rng)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&CodeGenerator> {
        self.generators
            .iter()
            .map(|(g, _)| g)
            .find(|g| g.name() == name)
    }

    pub fn weight(&self, name: &str) -> Option<u32> {
        self.generators
            .iter()
            .find(|(g, _)| g.name() == name)
            .map(|(_, w)| w)
    }

    pub fn names(&self) -> Vec<&str> {
        self.generators.iter().map(|(g, _)| g.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.generators.total_weight()
    }
}
