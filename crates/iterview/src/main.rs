use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use iterview::{
    AssetLoadersPlugin, IterviewUiPlugin, ModelAssetsPlugin, SelectionPlugin, Settings,
    ViewerSystemsPlugin,
};

use iterview::app::cli::Args;
use iterview::app::systems::{OrbitCamera, OrbitConfig};
use iterview::lib::selection::InitialModel;
use iterview::lib::settings::{resolve_models_dir, settings_path};

fn main() -> AppExit {
    // Parse command line arguments
    let args = Args::parse_args();

    let Some(models_dir) = resolve_models_dir(&args.path) else {
        eprintln!(
            "Error: models directory '{}' does not exist",
            args.path.display()
        );
        std::process::exit(1);
    };

    let (settings, settings_found) = match Settings::load_from_dir(&models_dir) {
        Ok(Some(settings)) => (settings, true),
        Ok(None) => (Settings::default(), false),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = match settings.catalog(args.names.clone(), args.iterations.clone()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: invalid model catalog: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(model) = &args.model {
        if !catalog.contains(model) {
            eprintln!(
                "Error: unknown model '{}' (available: {})",
                model,
                catalog.names().join(", ")
            );
            std::process::exit(1);
        }
    }

    let orbit = OrbitCamera::from_settings(settings.camera.as_ref());
    let playback = settings.playback_state();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Iterview".to_string(),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: models_dir.to_string_lossy().into_owned(),
                ..default()
            }),
    );

    // Bevy's LogPlugin is installed from here on
    if settings_found {
        info!("Loaded settings from {}", settings_path(&models_dir).display());
    }

    if args.verbose {
        info!("Models directory: {}", models_dir.display());
        info!(
            "Catalog: {} models x {} checkpoints ({} files)",
            catalog.names().len(),
            catalog.step_count(),
            catalog.file_count()
        );
        info!("Orbit: {:?}", orbit);
        info!(
            "Playback: interval {}s, loop {}",
            playback.interval, playback.loop_enabled
        );
    }

    if args.diagnostics {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_plugins(LogDiagnosticsPlugin::default());
    }

    // The catalog must be present before SelectionPlugin builds its controller
    app.insert_resource(catalog)
        .insert_resource(InitialModel(args.model.clone()))
        .insert_resource(playback)
        .insert_resource(OrbitConfig(orbit))
        .add_plugins(AssetLoadersPlugin)
        .add_plugins(ModelAssetsPlugin)
        .add_plugins(SelectionPlugin)
        .add_plugins(ViewerSystemsPlugin)
        .add_plugins(IterviewUiPlugin)
        .run()
}
