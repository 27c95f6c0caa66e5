use std::path::{Path, PathBuf};

/// Nearest `VERSION` file at or above `dir`.
fn find_version_file(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|p| p.join("VERSION"))
        .find(|candidate| candidate.is_file())
}

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
    let version_file =
        find_version_file(&manifest_dir).expect("no VERSION file above the app manifest");
    let version = std::fs::read_to_string(&version_file)
        .expect("failed to read VERSION")
        .trim()
        .to_owned();

    // The bundle version lives in tauri.conf.json; keep it in step.
    let conf = std::fs::read_to_string(manifest_dir.join("tauri.conf.json"))
        .expect("failed to read tauri.conf.json");
    if !conf.contains(&format!("\"version\": \"{version}\"")) {
        println!("cargo:warning=tauri.conf.json version differs from VERSION ({version})");
    }

    println!("cargo:rustc-env=PULLTRAY_VERSION={version}");
    println!("cargo:rerun-if-changed={}", version_file.display());
    println!("cargo:rerun-if-changed=tauri.conf.json");

    tauri_build::build()
}
