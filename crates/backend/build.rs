use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Каталог профиля сборки (target/debug или target/release)
///
/// OUT_DIR обычно выглядит как target/debug/build/backend-xxx/out
fn profile_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    let profile = env::var("PROFILE").ok()?;
    Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../seed");

    let Some(target_dir) = profile_dir() else {
        println!("cargo:warning=Target profile directory not found, config.toml not copied");
        return;
    };

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");

    // config.toml и seed-файлы кладутся рядом с exe: load_config и resolve_path ищут там
    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        let dest_config = target_dir.join("config.toml");
        match fs::copy(&source_config, &dest_config) {
            Ok(_) => println!("cargo:warning=Copied config.toml to {:?}", dest_config),
            Err(e) => println!("cargo:warning=Failed to copy config.toml: {}", e),
        }
    } else {
        println!(
            "cargo:warning=config.toml not found at {:?}, using default config",
            source_config
        );
    }

    let seed_dir = workspace_root.join("seed");
    let Ok(entries) = fs::read_dir(&seed_dir) else {
        return;
    };
    let dest_seed = target_dir.join("seed");
    if let Err(e) = fs::create_dir_all(&dest_seed) {
        println!("cargo:warning=Cannot create {:?}: {}", dest_seed, e);
        return;
    }
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            if let Err(e) = fs::copy(&path, dest_seed.join(entry.file_name())) {
                println!("cargo:warning=Failed to copy seed {:?}: {}", path, e);
            }
        }
    }
}
