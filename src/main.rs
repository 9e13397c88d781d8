//! solar-sizer entry point: CLI wiring and config-driven session construction.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use solar_sizer::config::AppConfig;
use solar_sizer::devices::{Classifier, DevicePatch};
use solar_sizer::io::{export_breakdown_csv, export_devices_csv, import_devices_csv};
use solar_sizer::reporting::{DeviceTable, ProductionComparison, SizingReport, breakdown_lines};
use solar_sizer::session::Session;
use solar_sizer::store::{JsonFileStore, StateStore};
use solar_sizer::system::SystemConfigPatch;

use cli::{Cli, Commands};

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolves the application config: `--config` file, then `--preset`, then
/// built-in defaults.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = if let Some(path) = &cli.config {
        AppConfig::from_toml_file(path)?
    } else if let Some(name) = &cli.preset {
        AppConfig::from_preset(name)?
    } else {
        AppConfig::default()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration:\n  {}", lines.join("\n  "));
    }
    Ok(config)
}

/// Recomputes a stale result after an edit; an emptied inventory keeps it
/// stale.
fn refresh<S: StateStore>(session: &mut Session<S>) {
    match session.refresh_results() {
        Ok(Some((result, _))) => {
            println!(
                "Results updated: {} panels, {:.2} kW inverter",
                result.panels_count, result.inverter_size_kw
            );
        }
        Ok(None) => {}
        Err(e) => warn!("Previous results are out of date: {e}"),
    }
}

fn print_inventory<S: StateStore>(session: &Session<S>) {
    println!("{}", DeviceTable(session.devices()));
    if session.devices().is_empty() {
        return;
    }
    let summary = session.summary();
    println!();
    println!("Daily consumption:  {:.2} kWh", summary.total_wh / 1000.0);
    println!("Largest load:       {:.0} W", summary.max_load_w);
    println!("System:             {}", session.config().system_type);
    if session.results().is_none() && session.state().results.is_some() {
        println!("Last sizing result is out of date; run `calculate` again.");
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let state_path = cli.state.clone().unwrap_or_else(|| config.storage.path.clone());
    let mut session = Session::open(
        JsonFileStore::new(state_path),
        Classifier::from_config(&config.classifier),
        config.system.clone(),
    );

    match cli.command {
        Commands::Add(args) => {
            session.add_device(args.into_draft())?;
            let index = session.devices().len() - 1;
            println!("Added device #{index}: {}", session.devices()[index].name());
        }
        Commands::Edit { index, fields } => {
            let patch = fields.into_patch();
            if patch == DevicePatch::default() {
                bail!("nothing to change; pass at least one of --name, --wattage, --hours, --count");
            }
            session.update_device(index, &patch)?;
            println!("Updated device #{index}");
            refresh(&mut session);
        }
        Commands::Remove { index } => {
            session.remove_device(index)?;
            println!("Removed device #{index}");
            refresh(&mut session);
        }
        Commands::List => print_inventory(&session),
        Commands::Configure(args) => {
            let patch = SystemConfigPatch::from(args);
            if !patch.is_empty() {
                session.update_config(&patch)?;
                refresh(&mut session);
            }
            print!(
                "{}",
                toml::to_string(session.config()).context("failed to render configuration")?
            );
        }
        Commands::Calculate { breakdown_out } => {
            let (result, _) = session.calculate()?;
            println!("{}", SizingReport::new(&result, session.config()));
            println!();
            println!("{}", ProductionComparison::new(&result, session.config()));
            println!();
            for line in breakdown_lines(&result) {
                println!("{line}");
            }
            if let Some(path) = breakdown_out {
                export_breakdown_csv(&result, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Breakdown written to {}", path.display());
            }
        }
        Commands::Import { path } => {
            let drafts = import_devices_csv(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let (added, _) = session
                .import_devices(drafts)
                .with_context(|| format!("rejected {}", path.display()))?;
            println!("Imported {added} devices from {}", path.display());
            refresh(&mut session);
        }
        Commands::Export { path } => {
            export_devices_csv(session.devices(), &path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Exported {} devices to {}",
                session.devices().len(),
                path.display()
            );
        }
        Commands::Reset => {
            session.reset();
            println!("Inventory and results cleared");
        }
        #[cfg(feature = "api")]
        Commands::Serve { port } => {
            use std::net::SocketAddr;

            let addr = SocketAddr::from(([127, 0, 0, 1], port));
            let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
            rt.block_on(solar_sizer::api::serve(solar_sizer::api::shared(session), addr))
                .with_context(|| format!("API server on {addr} failed"))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(feature = "api")]
    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    #[cfg(not(feature = "api"))]
    let default_level = "warn";
    init_tracing(default_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
