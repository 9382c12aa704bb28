//! bootcraft - Main entry point
//!
//! Exit codes: 0 on success, 1 on any resolution or generation error,
//! 2 on invalid usage.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bootcraft::cli::{Cli, Commands};
use bootcraft::config_file::BuildConfig;
use bootcraft::engine::{containerfile, export};
use bootcraft::logic::resolver::{self, PackageResolution};
use bootcraft::package_utils::parse_package_list;
use bootcraft::{DesktopSelection, InstallMode, PackageSet, PackageStore, SetKind};

/// Initialize tracing; logs go to stderr so generated output stays on stdout
fn init_logging(verbose: bool) {
    let default_level = if verbose { "bootcraft=debug" } else { "bootcraft=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    debug!("CLI arguments parsed");

    if let Err(e) = run(cli) {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Generate {
            blueprint,
            output,
            batch,
        }) => cmd_generate(&cli.store, blueprint, output.as_deref(), *batch),
        Some(Commands::Validate { blueprint }) => cmd_validate(&cli.store, blueprint),
        Some(Commands::Init {
            path,
            image_type,
            window_manager,
            desktop_environment,
            force,
        }) => {
            let mut config = BuildConfig::new(image_type.clone());
            config.desktop.window_manager = window_manager.clone();
            config.desktop.desktop_environment = desktop_environment.clone();
            cmd_init(path, &config, *force)
        }
        None if cli.has_flag_action() => run_flags(&cli),
        None => Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "nothing to do: pass --list-wms, --list-des, --wm, --de, --extra, --export or a subcommand",
            )
            .exit(),
    }
}

#[derive(Serialize)]
struct SetSummary<'a> {
    name: &'a str,
    description: &'a str,
    homepage: Option<&'a str>,
    categories: Vec<&'a str>,
    packages: usize,
}

fn summarize(sets: &[PackageSet]) -> Vec<SetSummary<'_>> {
    sets.iter()
        .map(|s| SetSummary {
            name: &s.name,
            description: &s.description,
            homepage: s.homepage.as_deref(),
            categories: s.categories.iter().map(|c| c.name.as_str()).collect(),
            packages: s.package_count(),
        })
        .collect()
}

fn print_sets(kind: SetKind, sets: &[PackageSet]) {
    if sets.is_empty() {
        println!("No {} sets available", kind);
        return;
    }
    let width = sets.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for set in sets {
        println!("{:<width$}  {}", set.name, set.description, width = width);
    }
}

fn print_resolution(resolution: &PackageResolution) {
    for category in resolution.packages.categories() {
        println!("{}: {}", category.name, category.packages.join(" "));
    }
    if !resolution.removals.is_empty() {
        println!("remove: {}", resolution.removals.join(" "));
    }
}

/// Print JSON sections as one document: a lone section is printed bare,
/// several are keyed in one object.
fn print_json(sections: Vec<(String, serde_json::Value)>) -> Result<()> {
    let value = match <[_; 1]>::try_from(sections) {
        Ok([(_, value)]) => value,
        Err(sections) => serde_json::Value::Object(sections.into_iter().collect()),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Handle the flag surface: listings, ad-hoc resolution, export
fn run_flags(cli: &Cli) -> Result<()> {
    let store = PackageStore::open(&cli.store)?;
    let mut json_sections = Vec::new();

    for (requested, kind) in [
        (cli.list_wms, SetKind::WindowManager),
        (cli.list_des, SetKind::DesktopEnvironment),
    ] {
        if !requested {
            continue;
        }
        let sets = store
            .list(kind)
            .with_context(|| format!("Failed to list {} sets", kind))?;
        if cli.json {
            let key = kind.dir_name().replace('-', "_");
            json_sections.push((key, serde_json::to_value(summarize(&sets))?));
        } else {
            print_sets(kind, &sets);
        }
    }

    let listing_only = cli.wm.is_none() && cli.de.is_none() && cli.extra.is_none() && !cli.export;
    if (cli.list_wms || cli.list_des) && listing_only {
        return if cli.json { print_json(json_sections) } else { Ok(()) };
    }

    let desktop = DesktopSelection {
        window_manager: cli.wm.clone(),
        desktop_environment: cli.de.clone(),
        include_common: !cli.no_common,
    };
    let extra = cli.extra.as_deref().map(parse_package_list).unwrap_or_default();
    let modules: Vec<_> = resolver::extra_packages_module(extra).into_iter().collect();

    let resolution = resolver::resolve_packages(&store, &desktop, &modules)?;

    if cli.export {
        let Some(output_dir) = cli.output_dir.as_deref() else {
            bail!("--export requires --output-dir");
        };
        let written = export::export(&resolution, output_dir)
            .with_context(|| format!("Failed to export lists to {}", output_dir.display()))?;
        eprintln!("✓ Exported {} files to {}", written.len(), output_dir.display());
    } else if cli.json {
        json_sections.push(("resolution".to_string(), serde_json::to_value(&resolution)?));
    } else {
        print_resolution(&resolution);
    }

    if cli.json && !json_sections.is_empty() {
        print_json(json_sections)?;
    }
    Ok(())
}

fn cmd_generate(store: &Path, blueprint: &Path, output: Option<&Path>, batch: bool) -> Result<()> {
    info!("Generating Containerfile from {}", blueprint.display());

    let mut config = BuildConfig::load_from_file(blueprint)?;
    if batch {
        config.image.install_mode = InstallMode::Batched;
    }
    let store = PackageStore::open(store)?;
    let plan = resolver::resolve(&config, &store)?;
    let text = containerfile::generate(&plan);

    match output {
        Some(path) => {
            containerfile::write_containerfile(path, &text)?;
            eprintln!(
                "✓ Wrote {} ({} packages, {} profile)",
                path.display(),
                plan.resolution.packages.len(),
                plan.profile
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_validate(store: &Path, blueprint: &Path) -> Result<()> {
    let config = BuildConfig::load_from_file(blueprint)?;
    let store = PackageStore::open(store)?;
    let plan = resolver::resolve(&config, &store)?;

    println!(
        "✓ Blueprint is valid: {} profile, {} packages in {} categories, {} removals, {} modules",
        plan.profile,
        plan.resolution.packages.len(),
        plan.resolution.packages.categories().len(),
        plan.resolution.removals.len(),
        config.modules.len()
    );
    Ok(())
}

fn cmd_init(path: &Path, config: &BuildConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config.validate()?;
    config.save_to_file(path)?;
    println!("✓ Wrote blueprint to {}", path.display());
    Ok(())
}
