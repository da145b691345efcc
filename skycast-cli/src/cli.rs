use clap::{Args, Parser, Subcommand};
use skycast_core::{CityTable, Config, RngSource, Synthesizer, WeatherRequest};
use tracing::debug;

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skycast",
    version,
    about = "Simulated weather reports, generated locally"
)]
pub struct Cli {
    /// Log debug details to stderr (RUST_LOG overrides this).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Without a subcommand, shows the default city.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show simulated weather for a city.
    Show(ShowArgs),

    /// List the preset cities.
    Cities,

    /// Pick cities interactively, one report per pick.
    Browse {
        /// Fixed seed for reproducible reports.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Choose the default city and an optional fixed seed.
    Configure,
}

#[derive(Debug, Default, Args)]
pub struct ShowArgs {
    /// City name (exact, case-sensitive). Defaults to the configured city.
    pub city: Option<String>,

    /// Local date/time to simulate, e.g. "2024-07-15 14:30"; if absent, means "now".
    #[arg(long)]
    pub at: Option<String>,

    /// Fixed seed for reproducible reports.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let cities = config.city_table()?;
        let synth = Synthesizer::new(&cities);

        match self.command.unwrap_or(Command::Show(ShowArgs::default())) {
            Command::Show(args) => {
                let request = resolve_request(&args, &config, &cities)?;
                let mut rng = RngSource::with_optional_seed(args.seed.or(config.seed));
                let report = synth.report(&request, &mut rng);
                debug!(?report, "report ready");

                if args.json {
                    println!("{}", render::report_json(&report)?);
                } else {
                    println!("{}", render::report_text(&report));
                }
            }
            Command::Cities => {
                println!("{}", render::city_list(&cities));
            }
            Command::Browse { seed } => {
                let mut rng = RngSource::with_optional_seed(seed.or(config.seed));
                interactive::browse(&synth, &mut rng)?;
            }
            Command::Configure => {
                interactive::configure(config, &cities)?;
            }
        }

        Ok(())
    }
}

/// Validated request for `show`; unknown cities fall back silently to default geography.
fn resolve_request(
    args: &ShowArgs,
    config: &Config,
    cities: &CityTable,
) -> anyhow::Result<WeatherRequest> {
    let city = args.city.as_deref().unwrap_or(config.default_city());
    let request = WeatherRequest::parse(city, args.at.as_deref())?;

    if !cities.contains(&request.city) {
        debug!(city = %request.city, "city not in table, using equator/UTC geography");
    }

    Ok(request)
}
