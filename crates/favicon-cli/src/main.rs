//! `favicon-partial`: one-shot favicon build
//!
//! Runs a single compilation with the favicon plugin and writes the result
//! to the output directory. Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use favicon_host::{AssetSource, CompilationError, Compiler};
use favicon_plugin::{CommandGenerator, FaviconsPartialPlugin, PluginConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let config = Arg::new("config")
        .long("config")
        .short('c')
        .value_parser(value_parser!(PathBuf))
        .help("Plugin options file (.json, .yaml, .yml or .toml)");

    Command::new("favicon-partial")
        .version(favicon_plugin::VERSION)
        .about("Generate favicons and an HTML partial referencing them")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("build")
                .about("Run one compilation and write its assets")
                .arg(config.clone())
                .arg(
                    Arg::new("logo")
                        .long("logo")
                        .value_parser(value_parser!(PathBuf))
                        .required_unless_present("config")
                        .help("Logo path, overrides logoPath from the config file"),
                )
                .arg(
                    Arg::new("context")
                        .long("context")
                        .value_parser(value_parser!(PathBuf))
                        .help("Project root relative paths resolve against [default: current dir]"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Output root [default: <context>/dist]"),
                )
                .arg(
                    Arg::new("generator")
                        .long("generator")
                        .short('g')
                        .required(true)
                        .help("Favicon generator program"),
                )
                .arg(
                    Arg::new("generator-arg")
                        .long("generator-arg")
                        .action(ArgAction::Append)
                        .allow_hyphen_values(true)
                        .help("Argument passed to the generator (repeatable)"),
                )
                .arg(
                    Arg::new("timeout-ms")
                        .long("timeout-ms")
                        .value_parser(value_parser!(u64))
                        .help("Fail if the generator takes longer than this"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail on colliding output paths instead of overwriting"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Print the resolved plugin options as JSON")
                .arg(config.required(true)),
        )
}

fn load_config(path: Option<&PathBuf>) -> Result<PluginConfig> {
    match path {
        Some(path) => PluginConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Ok(PluginConfig::default()),
    }
}

/// Config file overlaid with `build` flags
fn resolve_config(args: &ArgMatches) -> Result<PluginConfig> {
    let mut config = load_config(args.get_one::<PathBuf>("config"))?;

    if let Some(logo) = args.get_one::<PathBuf>("logo") {
        config.logo_path.clone_from(logo);
    }
    if let Some(ms) = args.get_one::<u64>("timeout-ms") {
        config = config.with_generation_timeout(Duration::from_millis(*ms));
    }
    if args.get_flag("strict") {
        config = config.with_strict_output_paths(true);
    }
    Ok(config)
}

fn command_generator(args: &ArgMatches, context: &Path) -> Result<CommandGenerator> {
    let program = args
        .get_one::<String>("generator")
        .context("--generator is required")?;
    let extra = args
        .get_many::<String>("generator-arg")
        .into_iter()
        .flatten()
        .cloned();

    Ok(CommandGenerator::new(program.clone())
        .args(extra)
        .with_working_dir(context))
}

async fn build(args: &ArgMatches) -> Result<()> {
    let context = match args.get_one::<PathBuf>("context") {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let output = args
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| context.join("dist"));

    let config = resolve_config(args)?;
    let generator = command_generator(args, &context)?;
    let plugin = FaviconsPartialPlugin::new(config, Arc::new(generator))
        .context("invalid plugin options")?;

    let compiler = Compiler::new(&context, &output).with_plugin(&plugin);
    let compilation = match compiler.run().await {
        Ok(compilation) => compilation,
        Err(err @ CompilationError::Failed { .. }) => {
            for hook in err.errors() {
                eprintln!("error: {hook}");
            }
            bail!(err);
        }
        Err(err) => bail!(err),
    };

    let written = compiler
        .emit(&compilation)
        .await
        .with_context(|| format!("failed to write assets to {}", output.display()))?;

    let sources: Vec<AssetSource> = compilation
        .assets()
        .snapshot()
        .into_iter()
        .map(|(_, source)| source)
        .collect();
    for line in written_lines(&sources, &written) {
        println!("{line}");
    }
    tracing::info!(
        assets = written.len(),
        bytes = compilation.assets().total_size(),
        output = %output.display(),
        "build finished"
    );
    Ok(())
}

/// One `<short digest>  <path>` line per written file
///
/// `Compiler::emit` writes in table order, so `sources` and `written` line up.
fn written_lines(sources: &[AssetSource], written: &[PathBuf]) -> Vec<String> {
    sources
        .iter()
        .zip(written)
        .map(|(source, path)| format!("{}  {}", source.hash().short(), path.display()))
        .collect()
}

fn print_config(args: &ArgMatches) -> Result<()> {
    let config = load_config(args.get_one::<PathBuf>("config"))?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("build", args)) => build(args).await,
        Some(("config", args)) => print_config(args),
        _ => unreachable!("subcommand_required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn written_lines_prefix_paths_with_digest() {
        let sources = vec![AssetSource::raw(vec![1u8, 2, 3]), AssetSource::raw("<link>")];
        let written = vec![
            PathBuf::from("dist/assets/icon-32.png"),
            PathBuf::from("dist/favicons.partial.html"),
        ];

        let lines = written_lines(&sources, &written);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("{}  dist/assets/icon-32.png", sources[0].hash().short())
        );
        assert!(lines[1].ends_with("  dist/favicons.partial.html"));
        assert_ne!(lines[0][..16], lines[1][..16]);
    }

    #[test]
    fn build_collects_generator_args_and_overrides() {
        let matches = cli()
            .try_get_matches_from([
                "favicon-partial",
                "build",
                "--logo",
                "icon.svg",
                "--generator",
                "node",
                "--generator-arg",
                "scripts/favicons.js",
                "--generator-arg",
                "--quiet",
                "--timeout-ms",
                "2500",
                "--strict",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();

        let config = resolve_config(args).unwrap();
        assert_eq!(config.logo_path, PathBuf::from("icon.svg"));
        assert_eq!(config.generation_timeout(), Some(Duration::from_millis(2500)));
        assert!(config.strict_output_paths);

        let generator = command_generator(args, Path::new("/project")).unwrap();
        assert_eq!(generator.program(), "node");
    }

    #[test]
    fn build_requires_logo_or_config() {
        let err = cli()
            .try_get_matches_from(["favicon-partial", "build", "--generator", "node"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn config_command_requires_file() {
        assert!(cli()
            .try_get_matches_from(["favicon-partial", "config"])
            .is_err());
    }
}
