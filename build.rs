// Bakes a fallback vault root into the crate. `find_vault_root` honors it
// only when the default catalog file exists in that directory, so a build
// from a checkout without the catalog never points at the manifest dir.
use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=ARCHETYPE_VAULT_ROOT_HINT");

    let hint = env::var("ARCHETYPE_VAULT_ROOT_HINT")
        .ok()
        .or_else(|| env::var("CARGO_MANIFEST_DIR").ok());

    if let Some(raw_hint) = hint {
        let candidate = PathBuf::from(raw_hint);
        let canonical = candidate.canonicalize().unwrap_or(candidate);

        println!(
            "cargo:rustc-env=ARCHETYPE_VAULT_ROOT_HINT={}",
            canonical.display()
        );
    }
}
