//! Iterview checkpoint viewer library
//!
//! This library loads a fixed catalog of PLY meshes (one base mesh plus one
//! mesh per training checkpoint, for every model) and lets the user switch
//! models and scrub through checkpoints next to the base mesh.

pub mod lib {
    pub mod asset_loaders;
    pub mod catalog;
    pub mod model_assets;
    pub mod selection;
    pub mod settings;
}

pub mod app {
    pub mod cli;
    pub mod systems;
    pub mod ui;
}

// Re-export commonly used types from lib modules
pub use app::systems::ViewerSystemsPlugin;
pub use app::ui::IterviewUiPlugin;
pub use lib::asset_loaders::{AssetLoadersPlugin, PlyLoader};
pub use lib::catalog::{self, ModelCatalog};
pub use lib::model_assets::{ModelAssets, ModelAssetsPlugin, ViewerState};
pub use lib::selection::{self, SelectionController, SelectionPlugin};
pub use lib::settings::{self, Settings};
