//! Terminal front end for the archetype vault.
//!
//! Lists archetypes, prints a record card, writes an archetype's document to
//! disk, or strictly checks a catalog file. Paths default to the
//! `ARCHETYPE_VAULT_*` environment and can be overridden per invocation.

use anyhow::{Context, Result, bail};
use archetype_vault::{
    ArchetypeCatalog, ArchetypeVault, Attachment, AttachmentError, VaultConfig, render,
};
use std::env;
use std::error::Error;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_NO_DOCUMENT: i32 = 2;

fn main() {
    init_tracing();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<i32> {
    let cli = Cli::parse(env::args_os().skip(1))?;
    match &cli.command {
        Command::Help => {
            print!("{}", usage());
            Ok(0)
        }
        Command::Check => check(&cli.config()?),
        Command::Browse(browse) => serve(cli.config()?, browse),
    }
}

fn check(config: &VaultConfig) -> Result<i32> {
    let catalog = ArchetypeCatalog::from_path(&config.catalog_path)?;
    println!(
        "{} archetypes in {}",
        catalog.len(),
        config.catalog_path.display()
    );
    Ok(0)
}

fn serve(config: VaultConfig, browse: &Browse) -> Result<i32> {
    let vault = ArchetypeVault::open(config)?;
    if let Some(diagnostic) = vault.diagnostic() {
        eprintln!("{}", error_chain(diagnostic));
        return Ok(1);
    }

    match browse {
        Browse::List => {
            for name in vault.all_names() {
                println!("{name}");
            }
            Ok(0)
        }
        Browse::Show { name, json } => {
            let Some(record) = vault.record(name) else {
                eprintln!("unknown archetype: {name}");
                return Ok(1);
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(record)?);
            } else {
                print!("{}", render::record_card(record));
            }
            Ok(0)
        }
        Browse::Fetch { name, out } => fetch(&vault, name, out.clone()),
    }
}

fn fetch(vault: &ArchetypeVault, name: &str, out: Option<PathBuf>) -> Result<i32> {
    match vault.attachment(name) {
        Ok(Attachment::Found(bytes)) => {
            let target = match out {
                Some(path) => path,
                None => PathBuf::from(vault.attachments().file_name(name)?),
            };
            fs::write(&target, &bytes)
                .with_context(|| format!("writing document to {}", target.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), target.display());
            Ok(0)
        }
        Ok(Attachment::NotFound) => {
            eprintln!("no document for this archetype");
            Ok(EXIT_NO_DOCUMENT)
        }
        Err(err @ AttachmentError::ReadError { .. }) => {
            eprintln!("document exists but is unreadable: {}", error_chain(&err));
            Ok(1)
        }
        Err(err) => Err(err.into()),
    }
}

/// Render an error and its sources the way `{:#}` renders an anyhow chain.
fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Check,
    Browse(Browse),
}

/// Commands that read through an opened vault.
#[derive(Debug, PartialEq, Eq)]
enum Browse {
    List,
    Show { name: String, json: bool },
    Fetch { name: String, out: Option<PathBuf> },
}

#[derive(Debug)]
struct Cli {
    catalog: Option<PathBuf>,
    docs: Option<PathBuf>,
    ext: Option<String>,
    command: Command,
}

impl Cli {
    fn parse(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut args = args.into_iter();
        let mut catalog: Option<PathBuf> = None;
        let mut docs: Option<PathBuf> = None;
        let mut ext: Option<String> = None;
        let mut out: Option<PathBuf> = None;
        let mut json = false;
        let mut help = false;
        let mut positionals: Vec<String> = Vec::new();

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--catalog" => catalog = Some(PathBuf::from(next_value(&mut args, "--catalog")?)),
                "--docs" => docs = Some(PathBuf::from(next_value(&mut args, "--docs")?)),
                "--ext" => ext = Some(next_value(&mut args, "--ext")?),
                "--out" => out = Some(PathBuf::from(next_value(&mut args, "--out")?)),
                "--json" => json = true,
                "--help" | "-h" => help = true,
                other if other.starts_with('-') => bail!("unknown flag: {other}"),
                other => positionals.push(other.to_string()),
            }
        }

        if help {
            return Ok(Cli {
                catalog,
                docs,
                ext,
                command: Command::Help,
            });
        }

        let mut positionals = positionals.into_iter();
        let Some(command) = positionals.next() else {
            bail!("missing command\n{}", usage());
        };
        let mut name = || {
            positionals
                .next()
                .ok_or_else(|| anyhow::anyhow!("{command} requires an archetype name"))
        };
        let command = match command.as_str() {
            "list" => Command::Browse(Browse::List),
            "check" => Command::Check,
            "show" => Command::Browse(Browse::Show { name: name()?, json }),
            "fetch" => Command::Browse(Browse::Fetch { name: name()?, out }),
            other => bail!("unknown command: {other}\n{}", usage()),
        };
        if let Some(extra) = positionals.next() {
            bail!("unexpected argument: {extra}");
        }

        Ok(Cli {
            catalog,
            docs,
            ext,
            command,
        })
    }

    /// Environment-derived config with command-line overrides applied.
    fn config(&self) -> Result<VaultConfig> {
        let mut config = VaultConfig::from_env();
        if let Some(path) = &self.catalog {
            config.catalog_path = path.clone();
        }
        if let Some(dir) = &self.docs {
            config.attachment_dir = dir.clone();
        }
        if let Some(ext) = &self.ext {
            config.attachment_extension = ext.clone();
        }
        config.validate()
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: archetype-vault [--catalog PATH] [--docs DIR] [--ext EXT] <command>\n\
\n\
Commands:\n\
  list                   Print archetype names in catalog order.\n\
  show NAME [--json]     Print the archetype card (or the record as JSON).\n\
  fetch NAME [--out P]   Write the archetype document to P (default ./NAME.EXT).\n\
  check                  Strictly validate the catalog and print its size.\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli> {
        Cli::parse(args.iter().map(OsString::from))
    }

    #[test]
    fn parses_global_flags_and_show() {
        let cli = parse(&["--catalog", "vault.json", "show", "Guardian", "--json"]).unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("vault.json")));
        assert_eq!(
            cli.command,
            Command::Browse(Browse::Show {
                name: "Guardian".into(),
                json: true
            })
        );
    }

    #[test]
    fn fetch_takes_out_path() {
        let cli = parse(&["fetch", "Guardian", "--out", "/tmp/g.pdf"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Browse(Browse::Fetch {
                name: "Guardian".into(),
                out: Some(PathBuf::from("/tmp/g.pdf"))
            })
        );
    }

    #[test]
    fn help_flag_short_circuits_parsing() {
        assert_eq!(parse(&["--help"]).unwrap().command, Command::Help);
        assert_eq!(parse(&["-h"]).unwrap().command, Command::Help);
        // A missing name or command does not matter once help is requested.
        assert_eq!(parse(&["show", "--help"]).unwrap().command, Command::Help);
        assert_eq!(parse(&["check"]).unwrap().command, Command::Check);
    }

    #[test]
    fn rejects_missing_name_and_unknown_flags() {
        assert!(parse(&["show"]).is_err());
        assert!(parse(&["list", "--verbose"]).is_err());
        assert!(parse(&[]).is_err());
        assert!(parse(&["list", "extra"]).is_err());
        assert!(parse(&["--ext"]).is_err());
    }

    #[test]
    fn error_chain_includes_sources() {
        let err = ArchetypeCatalog::from_slice(b"[]").unwrap_err();
        let text = error_chain(&err);
        assert!(text.contains("is malformed"));
        assert!(text.contains("not a JSON object of archetype records"));
    }
}
