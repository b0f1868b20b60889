use clap::{Parser, Subcommand, ValueEnum};
use dut_harness::config::ConfigLoader;
use dut_harness::docs::{self, BuildOutcome};
use dut_harness::logging::init_tracing;
use dut_harness::port::available_consoles;
use dut_harness::scenario::catalog;
use dut_harness::{ScenarioParams, ScenarioReport, ScenarioRunner, SessionProvider};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "dut-harness",
    version,
    about = "Drive two BLE boards over their serial shells and check connection workflows."
)]
struct Cli {
    /// Configuration file (defaults to the usual search path)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog scenarios
    List,
    /// List serial consoles visible on this host
    Ports,
    /// Run one scenario, or `all`, against the configured boards
    Run {
        scenario: String,
        /// Serial console of the peripheral board
        #[arg(long)]
        dut1: Option<String>,
        /// Serial console of the central board
        #[arg(long)]
        dut2: Option<String>,
        #[arg(long, default_value_t = 1)]
        repeat: usize,
        /// Print reports as JSON instead of one summary line each
        #[arg(long)]
        json: bool,
    },
    /// SDK manual configuration
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },
}

#[derive(Subcommand, Debug)]
enum DocsAction {
    /// Print a manual's configuration record
    Show {
        manual: String,
        /// SDK tree holding the VERSION file
        #[arg(long)]
        sdk_root: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = RenderFormat::Toml)]
        format: RenderFormat,
    },
    /// Run the build-finished hook
    Finish {
        #[arg(long)]
        srcdir: PathBuf,
        #[arg(long)]
        outdir: PathBuf,
        /// The build failed; nothing is copied
        #[arg(long)]
        failed: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RenderFormat {
    Toml,
    Json,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    init_tracing(&loader.config().logging)?;
    let mut config = loader.into_config();

    match cli.command {
        Command::List => {
            for scenario in catalog::all(&ScenarioParams::from(&config.scenario)) {
                println!("{:<20} {}", scenario.name, scenario.description);
            }
        }
        Command::Ports => {
            for console in available_consoles()? {
                println!(
                    "{:<20} {:<14} {}",
                    console.port_name,
                    console.kind,
                    console.product.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Run {
            scenario,
            dut1,
            dut2,
            repeat,
            json,
        } => {
            if dut1.is_some() {
                config.duts.dut1.port = dut1;
            }
            if dut2.is_some() {
                config.duts.dut2.port = dut2;
            }
            let params = ScenarioParams::from(&config.scenario);
            let scenarios = if scenario == "all" {
                catalog::all(&params)
            } else {
                vec![catalog::find(&scenario, &params)?]
            };

            let mut provider = SessionProvider::from_config(config);
            let mut reports: Vec<ScenarioReport> = Vec::new();
            {
                let mut runner = ScenarioRunner::new(provider.acquire()?);
                for scenario in &scenarios {
                    reports.extend(runner.run_repeated(scenario, repeat.max(1)));
                }
            }
            provider.teardown()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", report.summary());
                }
            }

            let failed = reports.iter().filter(|r| !r.passed()).count();
            info!(total = reports.len(), failed, "run complete");
            if failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Docs { action } => match action {
            DocsAction::Show {
                manual,
                sdk_root,
                format,
            } => {
                let manual = docs::by_name(&manual, sdk_root.as_deref())?;
                let rendered = match format {
                    RenderFormat::Toml => manual.to_toml()?,
                    RenderFormat::Json => manual.to_json()?,
                };
                println!("{rendered}");
            }
            DocsAction::Finish {
                srcdir,
                outdir,
                failed,
            } => {
                let outcome = if failed {
                    BuildOutcome::Failed("reported by caller".to_string())
                } else {
                    BuildOutcome::Succeeded
                };
                match docs::on_build_finished(&srcdir, &outdir, &outcome)? {
                    Some(summary) => println!(
                        "copied {} files and {} directories into {}",
                        summary.files,
                        summary.dirs,
                        summary.destination.display()
                    ),
                    None => println!("nothing copied"),
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
