//! Model and checkpoint selection
//!
//! [`SelectionController`] is the state machine behind the viewer: it knows
//! which model is active and which checkpoint step is shown, and it flips
//! mesh visibility so that only the active model's base mesh and its current
//! checkpoint mesh are ever visible.
//!
//! UI widgets, keyboard shortcuts and playback never touch visibility
//! directly. They send [`SwitchModelRequest`] / [`ChangeStepRequest`]
//! messages that [`apply_selection_requests`] feeds through the controller.

pub mod playback;
pub mod step_control;

use bevy::prelude::*;
use thiserror::Error;

use super::catalog::ModelCatalog;
use super::model_assets::{LoadedMesh, ModelAssets, ViewerState};

pub use playback::{PlaybackPlugin, PlaybackState};
pub use step_control::StepControl;

/// Plugin for model/step selection
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionController>()
            .init_resource::<InitialModel>()
            .add_message::<SwitchModelRequest>()
            .add_message::<ChangeStepRequest>()
            .configure_sets(Update, (SelectionSet::Input, SelectionSet::Apply).chain())
            .add_plugins(PlaybackPlugin)
            .add_systems(OnEnter(ViewerState::Ready), activate_initial_model)
            .add_systems(
                Update,
                apply_selection_requests
                    .in_set(SelectionSet::Apply)
                    .run_if(in_state(ViewerState::Ready)),
            );
    }
}

/// Ordering for systems that produce selection requests and the system that
/// applies them, so every request lands in the same frame it was made.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionSet {
    Input,
    Apply,
}

/// Request to make another model active (the "Load" button)
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SwitchModelRequest(pub String);

/// Request to show another checkpoint step of the active model (1-based)
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeStepRequest(pub usize);

/// Model to activate once loading finishes; `None` means the first one
#[derive(Resource, Debug, Clone, Default)]
pub struct InitialModel(pub Option<String>);

/// Rejected selection input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error("step {step} is outside 1..={max}")]
    StepOutOfRange { step: usize, max: usize },

    #[error("no model is active yet")]
    NoActiveModel,

    #[error("model '{model}' has {found} meshes, expected {expected}")]
    MeshCountMismatch {
        model: String,
        found: usize,
        expected: usize,
    },
}

/// Sink for visibility changes, so the controller works the same on a
/// Bevy query and on plain data.
pub trait MeshVisibility {
    fn set_visible(&mut self, mesh: Entity, visible: bool);
}

impl<'w, 's> MeshVisibility for Query<'w, 's, &mut Visibility, With<LoadedMesh>> {
    fn set_visible(&mut self, mesh: Entity, visible: bool) {
        match self.get_mut(mesh) {
            Ok(mut visibility) => {
                *visibility = if visible {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                };
            }
            Err(e) => warn!("Cannot change visibility of {:?}: {}", mesh, e),
        }
    }
}

/// Active model and 1-based checkpoint step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub model: String,
    pub step: usize,
}

/// Resource driving which meshes are visible
#[derive(Resource, Debug, Clone)]
pub struct SelectionController {
    iterations: Vec<u32>,
    state: Option<SelectionState>,
    step_control: StepControl,
}

impl FromWorld for SelectionController {
    fn from_world(world: &mut World) -> Self {
        let catalog = world
            .get_resource::<ModelCatalog>()
            .cloned()
            .unwrap_or_default();
        Self::new(catalog.iterations().to_vec())
    }
}

impl SelectionController {
    pub fn new(iterations: Vec<u32>) -> Self {
        let step_control = StepControl::new(iterations.len());
        Self {
            iterations,
            state: None,
            step_control,
        }
    }

    pub fn state(&self) -> Option<&SelectionState> {
        self.state.as_ref()
    }

    pub fn active_model(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.model.as_str())
    }

    pub fn step(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.step)
    }

    /// Number of checkpoint steps (N)
    pub fn step_count(&self) -> usize {
        self.iterations.len()
    }

    pub fn step_control(&self) -> &StepControl {
        &self.step_control
    }

    /// Checkpoint number of the current step
    pub fn current_iteration(&self) -> Option<u32> {
        let step = self.step()?;
        self.iterations.get(step - 1).copied()
    }

    /// Readout text for the step control, e.g. `iter #250`
    pub fn label(&self) -> Option<String> {
        self.current_iteration()
            .map(|iteration| format!("iter #{iteration}"))
    }

    /// Make `model` the active model.
    ///
    /// The outgoing model's meshes are hidden first, then the step control
    /// is reset to `[1, N]` at step 1, then the new model's base mesh and
    /// step-1 mesh are shown. Invalid input changes nothing.
    pub fn switch_model(
        &mut self,
        model: &str,
        assets: &ModelAssets,
        visibility: &mut impl MeshVisibility,
    ) -> Result<(), SelectionError> {
        let incoming = self.meshes_of(model, assets)?;

        if let Some(outgoing) = self.active_model().and_then(|m| assets.get(m)) {
            for &mesh in outgoing {
                visibility.set_visible(mesh, false);
            }
        }

        let steps = self.step_count();
        self.step_control.reset(steps);

        for (index, &mesh) in incoming.iter().enumerate() {
            visibility.set_visible(mesh, index <= 1);
        }

        self.state = Some(SelectionState {
            model: model.to_string(),
            step: 1,
        });
        Ok(())
    }

    /// Show checkpoint `step` of the active model and hide its other
    /// checkpoints. The base mesh is left as it is.
    pub fn change_step(
        &mut self,
        step: usize,
        assets: &ModelAssets,
        visibility: &mut impl MeshVisibility,
    ) -> Result<(), SelectionError> {
        let model = self
            .active_model()
            .ok_or(SelectionError::NoActiveModel)?
            .to_string();

        let max = self.step_count();
        if !(1..=max).contains(&step) {
            return Err(SelectionError::StepOutOfRange { step, max });
        }

        let meshes = self.meshes_of(&model, assets)?;

        visibility.set_visible(meshes[step], true);
        for (index, &mesh) in meshes.iter().enumerate().skip(1) {
            if index != step {
                visibility.set_visible(mesh, false);
            }
        }

        self.step_control.set(step);
        if let Some(state) = self.state.as_mut() {
            state.step = step;
        }
        Ok(())
    }

    fn meshes_of<'a>(
        &self,
        model: &str,
        assets: &'a ModelAssets,
    ) -> Result<&'a [Entity], SelectionError> {
        let meshes = assets
            .get(model)
            .ok_or_else(|| SelectionError::UnknownModel(model.to_string()))?;

        let expected = 1 + self.step_count();
        if meshes.len() != expected {
            return Err(SelectionError::MeshCountMismatch {
                model: model.to_string(),
                found: meshes.len(),
                expected,
            });
        }
        Ok(meshes)
    }
}

/// Implicit first "switch model" once every mesh is in the scene
pub fn activate_initial_model(
    initial: Res<InitialModel>,
    catalog: Res<ModelCatalog>,
    assets: Res<ModelAssets>,
    mut controller: ResMut<SelectionController>,
    mut visibility: Query<&mut Visibility, With<LoadedMesh>>,
) {
    let model = initial
        .0
        .clone()
        .unwrap_or_else(|| catalog.default_model().to_string());

    match controller.switch_model(&model, &assets, &mut visibility) {
        Ok(()) => info!("Showing model '{}' at {}", model, label_or_blank(&controller)),
        Err(e) => error!("Cannot show initial model: {}", e),
    }
}

/// System that applies queued selection requests: model switches first,
/// then step changes.
///
/// Step requests are computed from the step shown when they were made. If a
/// switch lands in the same run they refer to the outgoing model, so they are
/// dropped and the new model stays at step 1.
pub fn apply_selection_requests(
    mut switch_requests: MessageReader<SwitchModelRequest>,
    mut step_requests: MessageReader<ChangeStepRequest>,
    assets: Res<ModelAssets>,
    mut controller: ResMut<SelectionController>,
    mut visibility: Query<&mut Visibility, With<LoadedMesh>>,
) {
    let mut switched = false;
    for SwitchModelRequest(model) in switch_requests.read() {
        match controller.switch_model(model, &assets, &mut visibility) {
            Ok(()) => {
                info!("Switched to model '{}'", model);
                switched = true;
            }
            Err(e) => warn!("Ignoring model switch: {}", e),
        }
    }

    if switched {
        let stale = step_requests.read().count();
        if stale > 0 {
            debug!("Dropped {} step request(s) made before the model switch", stale);
        }
        return;
    }

    for ChangeStepRequest(step) in step_requests.read() {
        if controller.step() == Some(*step) {
            continue;
        }
        match controller.change_step(*step, &assets, &mut visibility) {
            Ok(()) => debug!("Step {} ({})", step, label_or_blank(&controller)),
            Err(e) => warn!("Ignoring step change: {}", e),
        }
    }
}

fn label_or_blank(controller: &SelectionController) -> String {
    controller.label().unwrap_or_default()
}
