use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Temperature unit for display (defaults to the configured unit)
    #[arg(short, long, value_enum, global = true)]
    pub unit: Option<UnitArg>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Current conditions, marker severity and active alerts
    Now(LocationArgs),

    /// Daily forecast summaries
    Forecast {
        #[command(flatten)]
        location: LocationArgs,

        /// Number of days to show
        #[arg(short, long, default_value_t = 5)]
        days: usize,
    },

    /// Look up places by name
    Search {
        /// Free-text place name, e.g. "Pune" or "Paris, FR"
        query: String,
    },

    /// Keep the display refreshed until Ctrl-C
    Watch {
        #[command(flatten)]
        location: LocationArgs,

        /// Refresh interval in seconds; 0 disables polling
        #[arg(short, long)]
        interval_secs: Option<u64>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Place name, resolved through geocoding
    #[arg(short, long, conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitArg {
    /// Celsius
    C,
    /// Fahrenheit
    F,
}
