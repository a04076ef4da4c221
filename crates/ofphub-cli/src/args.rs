use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use ofphub_core::OfpFormat;

/// Fetch flight plans and CDM departure timings from the terminal
///
/// ofphub downloads the latest operational flight plan of a pilot and the
/// CDM ground-movement timings of a departing flight, the same way a
/// simulator plugin polls them in the background.
#[derive(Parser)]
#[command(version, about, name = "ofphub")]
pub struct Args {
    /// CDM server list overriding
    /// $XDG_CONFIG_HOME/ofphub/cdm_cfg.json
    #[arg(long, global = true)]
    pub cdm_config: Option<PathBuf>,

    /// Fallback CDM server list. Defaults to the built-in list
    #[arg(long, global = true)]
    pub default_cdm_config: Option<PathBuf>,

    /// Do not load any CDM servers
    #[arg(long, global = true)]
    pub no_cdm: bool,

    /// Timeout for each download, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a pilot's latest flight plan
    Ofp(OfpArgs),
    /// Fetch CDM timings for a departing flight
    Cdm(CdmArgs),
    /// Keep fetching and print whenever the data changes
    #[command(alias = "w")]
    Watch(WatchArgs),
    /// List the configured CDM servers
    Servers,
    /// List the names of the exported fields
    Fields,
}

#[derive(ClapArgs)]
pub struct OfpArgs {
    /// Pilot ID at the flight planning service
    pub pilot_id: String,

    /// Output format to request
    #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,
}

#[derive(ClapArgs)]
pub struct CdmArgs {
    /// ICAO code of the departure airport
    pub airport: String,

    /// Callsign of the flight
    pub callsign: String,
}

#[derive(ClapArgs)]
pub struct WatchArgs {
    /// Pilot ID whose flight plan is watched
    #[arg(short, long)]
    pub pilot_id: Option<String>,

    /// Departure airport whose CDM data is watched
    #[arg(short, long, requires = "callsign")]
    pub airport: Option<String>,

    /// Callsign of the watched flight
    #[arg(short, long, requires = "airport")]
    pub callsign: Option<String>,

    /// Seconds between fetches
    #[arg(short, long, default_value_t = 60, value_name = "SECS")]
    pub interval: u64,

    /// Number of fetch cycles before exiting
    #[arg(short = 'n', long, default_value_t = 1)]
    pub cycles: u32,
}

/// Command-line representation of [`OfpFormat`]
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// JSON output
    Json,
    /// Legacy XML output
    Xml,
}

impl From<FormatArg> for OfpFormat {
    fn from(val: FormatArg) -> Self {
        match val {
            FormatArg::Json => OfpFormat::Json,
            FormatArg::Xml => OfpFormat::Xml,
        }
    }
}
