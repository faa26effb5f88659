#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const CLI: &str = env!("CARGO_BIN_EXE_archetype-vault");

/// Scratch vault: a catalog file and a docs directory under one temp root.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("failed to allocate fixture dir")?;
        fs::create_dir(dir.path().join("docs"))?;
        Ok(Self { dir })
    }

    pub fn with_catalog(catalog: &Value) -> Result<Self> {
        let fixture = Self::new()?;
        fixture.write_catalog_text(&serde_json::to_string_pretty(catalog)?)?;
        Ok(fixture)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("vault.json")
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.dir.path().join("docs")
    }

    pub fn write_catalog_text(&self, text: &str) -> Result<()> {
        fs::write(self.catalog_path(), text)
            .with_context(|| format!("writing {}", self.catalog_path().display()))
    }

    pub fn write_doc(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.docs_dir().join(file_name);
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// CLI invocation pointed at this fixture, isolated from the caller's env.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::new(CLI);
        cmd.current_dir(self.dir.path())
            .env_remove("ARCHETYPE_VAULT_ROOT")
            .env_remove("ARCHETYPE_VAULT_DOC_EXT")
            .env("ARCHETYPE_VAULT_CATALOG", self.catalog_path())
            .env("ARCHETYPE_VAULT_DOCS", self.docs_dir())
            .env("RUST_LOG", "off");
        cmd
    }
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Run a command that is expected to fail and return its output.
pub fn run_failing(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        bail!(
            "command {:?} unexpectedly succeeded\nstdout: {}",
            cmd,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(output)
}

pub fn remove_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o000);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

/// Permission bits do not stop root, so permission-based tests skip there.
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
