use std::env;
use std::fs;
use std::path::PathBuf;

/// Кладет config.toml из корня workspace рядом с собранным бинарем,
/// чтобы поиск конфигурации "рядом с исполняемым файлом" в
/// shared/config.rs находил его и при запуске вне cargo.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    // crates/backend -> crates -> корень workspace
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let Some(workspace_root) = manifest_dir.ancestors().nth(2) else {
        return;
    };
    let source = workspace_root.join("config.toml");
    if !source.exists() {
        println!(
            "cargo:warning=config.toml not found at {:?}, embedded default will be used",
            source
        );
        return;
    }

    // OUT_DIR: target/<profile>/build/backend-*/out -> поднимаемся до target/<profile>
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let profile = env::var("PROFILE").expect("PROFILE is set by cargo");
    let Some(target_dir) = out_dir.ancestors().find(|p| p.ends_with(&profile)) else {
        return;
    };

    if let Err(e) = fs::copy(&source, target_dir.join("config.toml")) {
        println!("cargo:warning=Failed to copy config.toml: {}", e);
    }
}
