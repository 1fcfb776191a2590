//! Up-front loading of every model mesh in the catalog
//!
//! At startup every base and checkpoint mesh of every model is requested from
//! the [`AssetServer`] at once. Bevy loads them concurrently on its IO task
//! pool; [`track_model_loads`] polls the handles each frame, spawns a hidden
//! scene entity for each mesh that finishes, and once all of them are in
//! place inserts the [`ModelAssets`] resource and moves the app to
//! [`ViewerState::Ready`].
//!
//! A single failed file fails the whole load. There is no partial result and
//! no retry.

use bevy::asset::LoadState;
use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use super::catalog::ModelCatalog;

/// Position of a model's base mesh (left of the origin)
pub const BASE_MESH_POSITION: Vec3 = Vec3::new(-0.5, -0.5, 0.0);

/// Position of a model's checkpoint meshes (right of the origin)
pub const ITERATION_MESH_POSITION: Vec3 = Vec3::new(0.5, -0.5, 0.0);

/// Lifecycle of the viewer as a whole
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewerState {
    /// Mesh files are still being fetched and decoded
    #[default]
    Loading,
    /// Every mesh is in the scene and the user can interact
    Ready,
    /// At least one file failed; nothing is shown
    Failed,
}

/// Plugin that loads every catalog mesh and builds [`ModelAssets`]
pub struct ModelAssetsPlugin;

impl Plugin for ModelAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ViewerState>()
            .add_systems(Startup, request_model_loads)
            .add_systems(
                Update,
                track_model_loads.run_if(in_state(ViewerState::Loading)),
            )
            .add_systems(OnEnter(ViewerState::Failed), exit_on_load_failure);
    }
}

/// Marker and identity for a mesh entity spawned from a catalog file
#[derive(Component, Debug, Clone)]
pub struct LoadedMesh {
    /// Model the mesh belongs to
    pub model: String,
    /// 0 for the base mesh, k for the k-th checkpoint
    pub index: usize,
    /// Source path relative to the models directory
    pub path: String,
}

/// Material shared by every model mesh
#[derive(Resource, Clone)]
pub struct ModelMaterial(pub Handle<StandardMaterial>);

/// Per-model mesh entities in `[base, iter_1, ..., iter_N]` order
#[derive(Resource, Debug, Default, Clone)]
pub struct ModelAssets {
    order: Vec<String>,
    meshes: HashMap<String, Vec<Entity>>,
}

impl ModelAssets {
    /// Register the ordered mesh entities of one model
    pub fn insert(&mut self, model: impl Into<String>, meshes: Vec<Entity>) {
        let model = model.into();
        if !self.meshes.contains_key(&model) {
            self.order.push(model.clone());
        }
        self.meshes.insert(model, meshes);
    }

    /// Mesh entities of a model, base mesh first
    pub fn get(&self, model: &str) -> Option<&[Entity]> {
        self.meshes.get(model).map(Vec::as_slice)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.meshes.contains_key(model)
    }

    /// Model names in the order they were registered
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entity])> {
        self.order
            .iter()
            .filter_map(|name| Some((name.as_str(), self.get(name)?)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Errors produced when the aggregate load cannot yield [`ModelAssets`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelLoadError {
    #[error("{} model file(s) failed to load{}", .0.len(), first_failure(.0))]
    Failed(Vec<FailedLoad>),

    #[error("model loading is not finished ({loaded}/{total} meshes loaded)")]
    Incomplete { loaded: usize, total: usize },
}

fn first_failure(failures: &[FailedLoad]) -> String {
    failures
        .first()
        .map(|failure| format!("; first failure: {failure}"))
        .unwrap_or_default()
}

/// One file that could not be fetched or decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLoad {
    pub path: String,
    pub reason: String,
}

impl std::fmt::Display for FailedLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Position of one requested mesh: model index in the catalog, then mesh
/// index within the model (0 = base).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub model: usize,
    pub index: usize,
}

/// A requested mesh that has not resolved yet
#[derive(Debug, Clone)]
pub struct PendingMesh {
    pub slot: SlotId,
    pub model: String,
    pub path: String,
    pub handle: Handle<Mesh>,
}

/// Aggregate state of the load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Pending { loaded: usize, total: usize },
    Complete,
    Failed,
}

struct MeshRequest {
    path: String,
    handle: Handle<Mesh>,
    entity: Option<Entity>,
}

struct ModelRequests {
    name: String,
    requests: Vec<MeshRequest>,
}

/// Resource tracking every outstanding mesh request.
///
/// Slots are fixed when the requests are issued, so the resulting
/// [`ModelAssets`] order never depends on completion order.
#[derive(Resource, Default)]
pub struct ModelLoadTracker {
    models: Vec<ModelRequests>,
    failures: Vec<FailedLoad>,
}

impl ModelLoadTracker {
    /// Issue one request per catalog file. `request` starts the load and
    /// returns its handle.
    pub fn new(catalog: &ModelCatalog, mut request: impl FnMut(&str) -> Handle<Mesh>) -> Self {
        let models = catalog
            .names()
            .iter()
            .map(|name| ModelRequests {
                name: name.clone(),
                requests: catalog
                    .paths_for(name)
                    .into_iter()
                    .map(|path| MeshRequest {
                        handle: request(&path),
                        path,
                        entity: None,
                    })
                    .collect(),
            })
            .collect();

        Self {
            models,
            failures: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.models.iter().map(|m| m.requests.len()).sum()
    }

    pub fn loaded(&self) -> usize {
        self.models
            .iter()
            .flat_map(|m| &m.requests)
            .filter(|r| r.entity.is_some())
            .count()
    }

    /// Loading progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.loaded() as f32 / total as f32
        }
    }

    pub fn failures(&self) -> &[FailedLoad] {
        &self.failures
    }

    /// Requests that have neither resolved nor failed
    pub fn pending(&self) -> Vec<PendingMesh> {
        let failed: Vec<&str> = self.failures.iter().map(|f| f.path.as_str()).collect();

        self.models
            .iter()
            .enumerate()
            .flat_map(|(model_index, model)| {
                model
                    .requests
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.entity.is_none())
                    .map(move |(index, r)| PendingMesh {
                        slot: SlotId {
                            model: model_index,
                            index,
                        },
                        model: model.name.clone(),
                        path: r.path.clone(),
                        handle: r.handle.clone(),
                    })
            })
            .filter(|p| !failed.contains(&p.path.as_str()))
            .collect()
    }

    /// Record the scene entity created for a finished load
    pub fn resolve(&mut self, slot: SlotId, entity: Entity) {
        if let Some(request) = self
            .models
            .get_mut(slot.model)
            .and_then(|m| m.requests.get_mut(slot.index))
        {
            request.entity = Some(entity);
        }
    }

    /// Record a load that failed
    pub fn fail(&mut self, slot: SlotId, reason: impl Into<String>) {
        if let Some(request) = self
            .models
            .get(slot.model)
            .and_then(|m| m.requests.get(slot.index))
        {
            self.failures.push(FailedLoad {
                path: request.path.clone(),
                reason: reason.into(),
            });
        }
    }

    pub fn outcome(&self) -> LoadOutcome {
        if !self.failures.is_empty() {
            return LoadOutcome::Failed;
        }
        let (loaded, total) = (self.loaded(), self.total());
        if loaded == total {
            LoadOutcome::Complete
        } else {
            LoadOutcome::Pending { loaded, total }
        }
    }

    /// Turn the finished requests into [`ModelAssets`], failing if any load
    /// failed or is still outstanding.
    pub fn take_assets(&mut self) -> Result<ModelAssets, ModelLoadError> {
        if !self.failures.is_empty() {
            return Err(ModelLoadError::Failed(self.failures.clone()));
        }
        let (loaded, total) = (self.loaded(), self.total());
        if loaded != total {
            return Err(ModelLoadError::Incomplete { loaded, total });
        }

        let mut assets = ModelAssets::default();
        for model in std::mem::take(&mut self.models) {
            let meshes = model.requests.iter().filter_map(|r| r.entity).collect();
            assets.insert(model.name, meshes);
        }
        Ok(assets)
    }
}

/// Material used for every model mesh: light grey and glossy
fn model_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb_u8(0xAA, 0xAA, 0xAA),
        perceptual_roughness: 0.2,
        metallic: 0.0,
        reflectance: 0.1,
        ..default()
    }
}

/// Startup system that requests every catalog file at once
pub fn request_model_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    catalog: Res<ModelCatalog>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let tracker = ModelLoadTracker::new(&catalog, |path| asset_server.load(path.to_string()));

    info!(
        "Requested {} meshes for {} models ({} checkpoints each)",
        tracker.total(),
        catalog.names().len(),
        catalog.step_count()
    );

    commands.insert_resource(tracker);
    commands.insert_resource(ModelMaterial(materials.add(model_material())));
}

/// System that spawns entities for finished loads and resolves the aggregate
pub fn track_model_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tracker: Option<ResMut<ModelLoadTracker>>,
    material: Option<Res<ModelMaterial>>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    let (Some(mut tracker), Some(material)) = (tracker, material) else {
        return;
    };

    for pending in tracker.pending() {
        match asset_server.load_state(pending.handle.id()) {
            LoadState::Loaded => {
                let entity = spawn_loaded_mesh(&mut commands, &pending, material.0.clone());
                tracker.resolve(pending.slot, entity);
                debug!("Loaded {} (entity {:?})", pending.path, entity);
            }
            LoadState::Failed(err) => {
                error!("Failed to load {}: {}", pending.path, err);
                tracker.fail(pending.slot, err.to_string());
            }
            _ => {}
        }
    }

    match tracker.outcome() {
        LoadOutcome::Pending { .. } => {}
        LoadOutcome::Complete => match tracker.take_assets() {
            Ok(assets) => {
                info!(
                    "All {} models loaded ({} meshes)",
                    assets.len(),
                    assets.iter().map(|(_, m)| m.len()).sum::<usize>()
                );
                commands.insert_resource(assets);
                next_state.set(ViewerState::Ready);
            }
            Err(e) => {
                error!("{}", e);
                next_state.set(ViewerState::Failed);
            }
        },
        LoadOutcome::Failed => {
            error!(
                "Model loading aborted: {} file(s) failed",
                tracker.failures().len()
            );
            next_state.set(ViewerState::Failed);
        }
    }
}

fn spawn_loaded_mesh(
    commands: &mut Commands,
    pending: &PendingMesh,
    material: Handle<StandardMaterial>,
) -> Entity {
    let position = if pending.slot.index == 0 {
        BASE_MESH_POSITION
    } else {
        ITERATION_MESH_POSITION
    };

    commands
        .spawn((
            Mesh3d(pending.handle.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(position),
            Visibility::Hidden,
            LoadedMesh {
                model: pending.model.clone(),
                index: pending.slot.index,
                path: pending.path.clone(),
            },
            Name::new(pending.path.clone()),
        ))
        .id()
}

/// Any failed file is fatal: close the viewer with an error code
fn exit_on_load_failure(tracker: Option<Res<ModelLoadTracker>>, mut exit: MessageWriter<AppExit>) {
    if let Some(tracker) = tracker {
        for failure in tracker.failures() {
            error!("  {}", failure);
        }
    }
    error!("Viewer cannot start without every model file");
    exit.write(AppExit::error());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> ModelCatalog {
        ModelCatalog::new(vec!["dolphin".into(), "cat".into()], vec![0, 5, 10]).unwrap()
    }

    #[test]
    fn test_requests_every_catalog_file() {
        let mut requested = Vec::new();
        let tracker = ModelLoadTracker::new(&small_catalog(), |path| {
            requested.push(path.to_string());
            Handle::default()
        });

        assert_eq!(tracker.total(), 8);
        assert_eq!(tracker.loaded(), 0);
        assert_eq!(requested[0], "dolphin.ply");
        assert_eq!(requested[3], "dolphin_model_10.ply");
        assert_eq!(requested[4], "cat.ply");
        assert_eq!(
            tracker.outcome(),
            LoadOutcome::Pending {
                loaded: 0,
                total: 8
            }
        );
    }

    #[test]
    fn test_assets_keep_catalog_order_despite_completion_order() {
        let mut world = World::new();
        let mut tracker = ModelLoadTracker::new(&small_catalog(), |_| Handle::default());

        // Resolve in reverse to mimic out-of-order completion
        let mut pending = tracker.pending();
        pending.reverse();
        let mut expected: HashMap<SlotId, Entity> = HashMap::new();
        for p in pending {
            let entity = world.spawn_empty().id();
            expected.insert(p.slot, entity);
            tracker.resolve(p.slot, entity);
        }

        assert_eq!(tracker.outcome(), LoadOutcome::Complete);
        let assets = tracker.take_assets().unwrap();
        assert_eq!(assets.names(), &["dolphin".to_string(), "cat".to_string()]);

        for (model_index, name) in ["dolphin", "cat"].iter().enumerate() {
            let meshes = assets.get(name).unwrap();
            assert_eq!(meshes.len(), 4);
            for (index, entity) in meshes.iter().enumerate() {
                let slot = SlotId {
                    model: model_index,
                    index,
                };
                assert_eq!(*entity, expected[&slot]);
            }
        }
    }

    #[test]
    fn test_single_failure_fails_the_aggregate() {
        let mut world = World::new();
        let mut tracker = ModelLoadTracker::new(&small_catalog(), |_| Handle::default());

        for p in tracker.pending().into_iter().skip(1) {
            tracker.resolve(p.slot, world.spawn_empty().id());
        }
        tracker.fail(SlotId { model: 0, index: 0 }, "file not found");

        assert_eq!(tracker.outcome(), LoadOutcome::Failed);
        assert!(tracker.pending().is_empty());
        match tracker.take_assets() {
            Err(ModelLoadError::Failed(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].path, "dolphin.ply");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_spawned_meshes_start_hidden_at_their_slot_position() {
        use bevy::ecs::system::RunSystemOnce;

        let mut world = World::new();
        let base = PendingMesh {
            slot: SlotId { model: 1, index: 0 },
            model: "cat".to_string(),
            path: "cat.ply".to_string(),
            handle: Handle::default(),
        };
        let checkpoint = PendingMesh {
            slot: SlotId { model: 1, index: 2 },
            model: "cat".to_string(),
            path: "cat_model_5.ply".to_string(),
            handle: Handle::default(),
        };

        let [base_entity, checkpoint_entity] = world
            .run_system_once(move |mut commands: Commands| {
                [&base, &checkpoint]
                    .map(|pending| spawn_loaded_mesh(&mut commands, pending, Handle::default()))
            })
            .unwrap();

        for entity in [base_entity, checkpoint_entity] {
            assert_eq!(world.get::<Visibility>(entity), Some(&Visibility::Hidden));
        }
        assert_eq!(
            world.get::<Transform>(base_entity).unwrap().translation,
            BASE_MESH_POSITION
        );
        assert_eq!(
            world.get::<Transform>(checkpoint_entity).unwrap().translation,
            ITERATION_MESH_POSITION
        );

        let identity = world.get::<LoadedMesh>(checkpoint_entity).unwrap();
        assert_eq!(identity.model, "cat");
        assert_eq!(identity.index, 2);
        assert_eq!(identity.path, "cat_model_5.ply");
    }

    #[test]
    fn test_failed_error_message() {
        let failed = ModelLoadError::Failed(vec![FailedLoad {
            path: "cat.ply".to_string(),
            reason: "file not found".to_string(),
        }]);
        assert_eq!(
            failed.to_string(),
            "1 model file(s) failed to load; first failure: cat.ply: file not found"
        );

        let empty = ModelLoadError::Failed(Vec::new());
        assert_eq!(empty.to_string(), "0 model file(s) failed to load");
    }

    #[test]
    fn test_incomplete_load_yields_no_assets() {
        let mut world = World::new();
        let mut tracker = ModelLoadTracker::new(&small_catalog(), |_| Handle::default());
        let first = tracker.pending()[0].slot;
        tracker.resolve(first, world.spawn_empty().id());

        assert!((tracker.progress() - 1.0 / 8.0).abs() < f32::EPSILON);
        assert_eq!(
            tracker.take_assets().unwrap_err(),
            ModelLoadError::Incomplete {
                loaded: 1,
                total: 8
            }
        );
    }
}
