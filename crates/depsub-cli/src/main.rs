//! depsub — command-line adapter for the dependency injection transform.
//!
//! Reads each source file (or stdin as `-`), rewrites `dep.injectable`
//! marker sites, and prints the result to stdout or rewrites the file in
//! place. Host test pipelines invoke this once per source file.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use depsub_transform::{Lang, TransformOptions, Transformer};
use std::io::Read;
use std::path::Path;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Command::new("depsub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dependency-substitution source transform for JS/TS")
        .arg(
            Arg::new("files")
                .required(true)
                .num_args(1..)
                .help("Source files to transform, or - for stdin"),
        )
        .arg(
            Arg::new("registry")
                .long("registry")
                .default_value("dep")
                .help("Registry identifier the marker call hangs off"),
        )
        .arg(
            Arg::new("in-place")
                .long("in-place")
                .action(ArgAction::SetTrue)
                .help("Rewrite files instead of printing to stdout"),
        );

    let matches = cli.get_matches();
    let registry = matches.get_one::<String>("registry").unwrap();
    let in_place = matches.get_flag("in-place");

    for file in matches.get_many::<String>("files").unwrap() {
        if file == "-" {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("reading stdin")?;
            let output = transformer_for(registry, Lang::TypeScript)
                .transform(&source)
                .context("transforming stdin")?;
            print!("{output}");
            continue;
        }

        let path = Path::new(file);
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let output = transformer_for(registry, lang_for(path))
            .transform(&source)
            .with_context(|| format!("transforming {}", path.display()))?;

        if in_place {
            if output != source {
                std::fs::write(path, &output)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
        } else {
            print!("{output}");
        }
    }

    Ok(())
}

fn transformer_for(registry: &str, lang: Lang) -> Transformer {
    Transformer::new(
        TransformOptions::new()
            .with_registry_ident(registry)
            .with_lang(lang),
    )
}

fn lang_for(path: &Path) -> Lang {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(Lang::from_extension)
        .unwrap_or_default()
}
