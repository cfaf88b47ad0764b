//! spaces: command-line front end for the Spaces map and API.

use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use spaces_api_client::models::Sorting;
use spaces_core::error::exit_codes;
use spaces_geo::Location;
use spaces_telemetry::{LogFormat, TelemetryConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

mod commands;
mod output;

use commands::{geo, health, nearby, spaces, Context};

/// Spaces map math and API client
#[derive(Parser)]
#[command(name = "spaces")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (defaults to .spaces.toml, spaces.toml or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overriding the configuration file
    #[arg(long, global = true, env = "SPACES_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Recent,
    Popularity,
}

impl From<SortArg> for Sorting {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Recent => Sorting::Recent,
            SortArg::Popularity => Sorting::Popularity,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the map viewport around a point
    Viewport {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Radius in meters
        #[arg(short, long, allow_negative_numbers = true)]
        radius: f64,
        /// Width:height ratio (defaults to map.aspect_ratio)
        #[arg(short, long)]
        aspect: Option<f64>,
    },

    /// Build a geofence circle polygon
    Circle {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Radius in meters
        #[arg(short, long)]
        radius: f64,
        /// Vertex count (defaults to map.circle_steps)
        #[arg(short, long)]
        steps: Option<usize>,
        /// Print a GeoJSON Feature
        #[arg(long)]
        geojson: bool,
    },

    /// Great-circle distance between two "<lon>,<lat>" points
    Distance {
        #[arg(allow_hyphen_values = true)]
        from: Location,
        #[arg(allow_hyphen_values = true)]
        to: Location,
    },

    /// Fetch nearby spaces and the address of a location
    Nearby {
        /// "<lon>,<lat>"
        #[arg(short, long, allow_hyphen_values = true)]
        location: Location,
        /// Search radius in meters (defaults to nearby.search_radius_m)
        #[arg(short, long)]
        radius: Option<f64>,
        /// Result cap (defaults to nearby.result_cap)
        #[arg(long)]
        count: Option<u32>,
    },

    /// Show a space
    Space { id: Uuid },

    /// List the top-level threads of a space
    Threads {
        space_id: Uuid,
        #[arg(short, long, value_enum, default_value = "recent")]
        sort: SortArg,
        #[arg(long, default_value = "0")]
        offset: u32,
        #[arg(short = 'n', long, default_value = "10")]
        count: u32,
    },

    /// Check API health
    Health,

    /// Check a new space against the server's constraints without sending it
    ValidateSpace {
        #[arg(long)]
        name: String,
        /// Theme colour, e.g. "#69701e"
        #[arg(long)]
        color: String,
        /// Radius in meters
        #[arg(short, long, allow_negative_numbers = true)]
        radius: f64,
        /// "<lon>,<lat>"
        #[arg(short, long, allow_hyphen_values = true)]
        location: Location,
    },

    /// Validate and create a space (requires SPACES_ID_TOKEN)
    CreateSpace {
        #[arg(long)]
        name: String,
        #[arg(long)]
        color: String,
        #[arg(short, long)]
        radius: f64,
        #[arg(short, long, allow_hyphen_values = true)]
        location: Location,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig {
        log_level: if cli.verbose { "debug" } else { "warn" }.to_string(),
        format: match cli.format {
            OutputFormat::Json => LogFormat::Json,
            OutputFormat::Text => LogFormat::Compact,
        },
        ..TelemetryConfig::default()
    };
    if let Err(e) = spaces_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let ctx = match Context::load(cli.config.as_deref(), cli.format, cli.api_url) {
        Ok(ctx) => ctx,
        Err(e) => {
            output::report_error(&e, cli.format == OutputFormat::Json);
            return ExitCode::from(exit_codes::CONFIG_ERROR as u8);
        }
    };

    let result = match cli.command {
        Commands::Viewport { lat, lon, radius, aspect } => {
            geo::viewport(&ctx, Location::new(lat, lon), radius, aspect)
        }

        Commands::Circle { lat, lon, radius, steps, geojson } => {
            geo::circle(&ctx, Location::new(lat, lon), radius, steps, geojson)
        }

        Commands::Distance { from, to } => geo::distance(&ctx, from, to),

        Commands::Nearby { location, radius, count } => {
            nearby::run(&ctx, location, radius, count).await
        }

        Commands::Space { id } => spaces::show(&ctx, id).await,

        Commands::Threads { space_id, sort, offset, count } => {
            spaces::threads(&ctx, space_id, sort.into(), offset, count).await
        }

        Commands::Health => health::run(&ctx).await,

        Commands::ValidateSpace { name, color, radius, location } => {
            spaces::validate(&ctx, &spaces::new_space(name, color, radius, location))
        }

        Commands::CreateSpace { name, color, radius, location } => {
            spaces::create(&ctx, &spaces::new_space(name, color, radius, location)).await
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
