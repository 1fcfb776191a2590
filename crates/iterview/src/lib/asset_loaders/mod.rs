//! Custom Bevy asset loaders for mesh file formats.
//!
//! Bevy has no PLY support out of the box, so this module provides an
//! [`AssetLoader`](bevy::asset::AssetLoader) for it:
//!
//! - **PLY** (ASCII and binary) via [`ply_loader::PlyLoader`]
//!
//! # Usage
//!
//! Add [`AssetLoadersPlugin`] to your Bevy app. After that the asset server
//! will transparently load `.ply` files into [`Mesh`](bevy::mesh::Mesh) assets:
//!
//! ```ignore
//! app.add_plugins(AssetLoadersPlugin);
//!
//! // Later, in a system:
//! let handle: Handle<Mesh> = asset_server.load("dolphin.ply");
//! ```

pub mod ply_loader;

use bevy::prelude::*;

pub use ply_loader::{decode_ply, PlyGeometry, PlyLoader, PlyLoaderError, PlyLoaderSettings};

/// Plugin that registers all custom asset loaders.
pub struct AssetLoadersPlugin;

impl Plugin for AssetLoadersPlugin {
    fn build(&self, app: &mut App) {
        app.register_asset_loader(PlyLoader);
        info!("Registered custom asset loaders: PLY");
    }
}
