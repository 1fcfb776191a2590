use clap::{arg, Command};
use iterview::lib::asset_loaders::{decode_ply, PlyGeometry};
use iterview::lib::settings::{resolve_models_dir, settings_path, Settings};
use log::{error, info};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let matches = Command::new("ply_info")
        .version("1.0")
        .author("Iterview PLY Info Tool")
        .about("Check that every catalog mesh exists and decodes, and print its stats")
        .arg(arg!([MODELS_DIR] "Directory holding the model PLY files").default_value("models"))
        .arg(arg!(--model <NAME> "Only check this model"))
        .get_matches();

    let dir_arg = matches
        .get_one::<String>("MODELS_DIR")
        .map(String::as_str)
        .unwrap_or("models");
    let only_model = matches.get_one::<String>("model");

    let Some(models_dir) = resolve_models_dir(Path::new(dir_arg)) else {
        eprintln!("Error: Directory '{}' does not exist", dir_arg);
        std::process::exit(1);
    };

    let settings = match Settings::load_from_dir(&models_dir)? {
        Some(settings) => {
            info!("Loaded settings from {}", settings_path(&models_dir).display());
            settings
        }
        None => Settings::default(),
    };
    let catalog = settings.catalog(None, None)?;

    if let Some(model) = only_model {
        if !catalog.contains(model) {
            eprintln!("Error: Unknown model '{}'", model);
            std::process::exit(1);
        }
    }

    println!("PLY Catalog Information:");
    println!("========================");
    println!("Directory: {}", models_dir.display());
    println!(
        "Models: {} | Checkpoints per model: {}",
        catalog.names().len(),
        catalog.step_count()
    );

    let mut checked = 0usize;
    let mut failed = 0usize;

    for model in catalog.names() {
        if only_model.is_some_and(|m| m != model) {
            continue;
        }

        println!("\n{}", model);
        for relative in catalog.paths_for(model) {
            checked += 1;
            let path = models_dir.join(&relative);
            match inspect(&path) {
                Ok(geometry) => print_geometry(&relative, &geometry),
                Err(e) => {
                    failed += 1;
                    error!("{}: {}", path.display(), e);
                    println!("  {:<28} FAILED: {}", relative, e);
                }
            }
        }
    }

    println!("\nChecked {} files, {} failed", checked, failed);
    if failed > 0 {
        std::process::exit(1);
    }

    info!("All {} files decoded", checked);
    Ok(())
}

fn inspect(path: &Path) -> Result<PlyGeometry, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    Ok(decode_ply(&bytes)?)
}

fn print_geometry(name: &str, geometry: &PlyGeometry) {
    let kind = if geometry.is_point_cloud() {
        "points".to_string()
    } else {
        format!("{} triangles", geometry.triangle_count())
    };

    match geometry.bounds() {
        Some((min, max)) => println!(
            "  {:<28} {:>8} vertices, {:>16}, size [{:.3}, {:.3}, {:.3}]",
            name,
            geometry.vertex_count(),
            kind,
            max[0] - min[0],
            max[1] - min[1],
            max[2] - min[2]
        ),
        None => println!(
            "  {:<28} {:>8} vertices, {:>16}",
            name,
            geometry.vertex_count(),
            kind
        ),
    }
}
