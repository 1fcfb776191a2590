//! Model catalog: the fixed set of model names and iteration checkpoints
//!
//! Every model shares the same checkpoint list. Files follow a fixed naming
//! convention relative to the models directory:
//!
//! - base mesh: `{model}.ply`
//! - checkpoint mesh: `{model}_model_{iteration}.ply`

use bevy::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

/// Model names shipped with the reconstruction demo
pub const DEFAULT_MODEL_NAMES: [&str; 4] = ["dolphin", "cat", "deer", "hand"];

/// Optimization iterations that were checkpointed for every model
pub const DEFAULT_ITERATIONS: [u32; 25] = [
    0, 5, 10, 20, 30, 40, 50, 60, 80, 100, 130, 160, 190, 220, 250, 300, 400, 500, 600, 800, 1000,
    1250, 1500, 1750, 2000,
];

/// Errors raised when building a catalog from user input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no model names")]
    NoModels,

    #[error("catalog has no iteration checkpoints")]
    NoIterations,

    #[error("model name at position {0} is empty")]
    EmptyName(usize),

    #[error("model name '{0}' is listed more than once")]
    DuplicateName(String),
}

/// Resource listing the models and checkpoints the viewer works with
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    names: Vec<String>,
    iterations: Vec<u32>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            names: DEFAULT_MODEL_NAMES.iter().map(|n| n.to_string()).collect(),
            iterations: DEFAULT_ITERATIONS.to_vec(),
        }
    }
}

impl ModelCatalog {
    /// Build a catalog, rejecting empty lists, empty names and duplicates.
    /// Surrounding whitespace is stripped from names, since they become
    /// file names.
    pub fn new(names: Vec<String>, iterations: Vec<u32>) -> Result<Self, CatalogError> {
        let names: Vec<String> = names.iter().map(|n| n.trim().to_string()).collect();
        if names.is_empty() {
            return Err(CatalogError::NoModels);
        }
        if iterations.is_empty() {
            return Err(CatalogError::NoIterations);
        }

        let mut seen = HashSet::new();
        for (index, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(CatalogError::EmptyName(index));
            }
            if !seen.insert(name.as_str()) {
                return Err(CatalogError::DuplicateName(name.clone()));
            }
        }

        Ok(Self { names, iterations })
    }

    /// Model names in display order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Checkpoint numbers in display order
    pub fn iterations(&self) -> &[u32] {
        &self.iterations
    }

    /// First model in the catalog, used when nothing else was requested
    pub fn default_model(&self) -> &str {
        // `new` and `default` both guarantee at least one name
        &self.names[0]
    }

    pub fn contains(&self, model: &str) -> bool {
        self.names.iter().any(|n| n == model)
    }

    /// Number of selectable steps (one per checkpoint)
    pub fn step_count(&self) -> usize {
        self.iterations.len()
    }

    /// Checkpoint number shown for a 1-based step
    pub fn iteration_at(&self, step: usize) -> Option<u32> {
        step.checked_sub(1)
            .and_then(|index| self.iterations.get(index))
            .copied()
    }

    /// Relative path of a model's base mesh
    pub fn base_path(model: &str) -> String {
        format!("{model}.ply")
    }

    /// Relative path of a model's mesh at one checkpoint
    pub fn iteration_path(model: &str, iteration: u32) -> String {
        format!("{model}_model_{iteration}.ply")
    }

    /// All paths for one model: the base mesh followed by every checkpoint
    /// in catalog order.
    pub fn paths_for(&self, model: &str) -> Vec<String> {
        std::iter::once(Self::base_path(model))
            .chain(
                self.iterations
                    .iter()
                    .map(|&iteration| Self::iteration_path(model, iteration)),
            )
            .collect()
    }

    /// Total number of files the catalog refers to
    pub fn file_count(&self) -> usize {
        self.names.len() * (1 + self.iterations.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_names_are_trimmed_before_use() {
        let catalog = ModelCatalog::new(names(&["dolphin", " cat "]), vec![0, 5]).unwrap();
        assert_eq!(catalog.names(), &names(&["dolphin", "cat"]));
        assert!(catalog.contains("cat"));
        assert_eq!(
            catalog.paths_for("cat"),
            names(&["cat.ply", "cat_model_0.ply", "cat_model_5.ply"])
        );

        assert_eq!(
            ModelCatalog::new(names(&["cat", " cat"]), vec![0]),
            Err(CatalogError::DuplicateName("cat".to_string()))
        );
        assert_eq!(
            ModelCatalog::new(names(&["cat", "  "]), vec![0]),
            Err(CatalogError::EmptyName(1))
        );
    }

    #[test]
    fn test_default_catalog() {
        let catalog = ModelCatalog::default();
        assert_eq!(catalog.names().len(), 4);
        assert_eq!(catalog.default_model(), "dolphin");
        assert_eq!(catalog.step_count(), 25);
        assert_eq!(catalog.iterations().last(), Some(&2000));
        assert_eq!(catalog.file_count(), 4 * 26);
    }

    #[test]
    fn test_paths_follow_naming_convention() {
        let catalog = ModelCatalog::new(names(&["dolphin", "cat"]), vec![0, 5, 10]).unwrap();
        let paths = catalog.paths_for("cat");
        assert_eq!(
            paths,
            vec![
                "cat.ply",
                "cat_model_0.ply",
                "cat_model_5.ply",
                "cat_model_10.ply"
            ]
        );
        assert_eq!(paths.len(), 1 + catalog.step_count());
    }

    #[test]
    fn test_iteration_at_is_one_based() {
        let catalog = ModelCatalog::new(names(&["dolphin"]), vec![0, 5, 10]).unwrap();
        assert_eq!(catalog.iteration_at(0), None);
        assert_eq!(catalog.iteration_at(1), Some(0));
        assert_eq!(catalog.iteration_at(3), Some(10));
        assert_eq!(catalog.iteration_at(4), None);
    }

    #[test]
    fn test_rejects_invalid_catalogs() {
        assert_eq!(
            ModelCatalog::new(Vec::new(), vec![0]),
            Err(CatalogError::NoModels)
        );
        assert_eq!(
            ModelCatalog::new(names(&["cat"]), Vec::new()),
            Err(CatalogError::NoIterations)
        );
        assert_eq!(
            ModelCatalog::new(names(&["cat", " "]), vec![0]),
            Err(CatalogError::EmptyName(1))
        );
        assert_eq!(
            ModelCatalog::new(names(&["cat", "deer", "cat"]), vec![0]),
            Err(CatalogError::DuplicateName("cat".to_string()))
        );
    }

    #[test]
    fn test_contains() {
        let catalog = ModelCatalog::default();
        assert!(catalog.contains("hand"));
        assert!(!catalog.contains("horse"));
    }
}
