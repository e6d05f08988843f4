use clap::Parser;
use legacy_date::{FCS_DATE, Zone};

/// Countdown to First Customer Shipment, with a tour of the Date API.
#[derive(Parser)]
#[command(name = "fcs", version, about = "Days left until First Customer Shipment")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Zone for constructing and printing dates: `local`, `utc` or an offset like `-08:00`.
    #[arg(short, long, default_value = "local")]
    pub zone: Zone,

    /// Pin "today" to a date string or a millisecond count instead of the clock.
    #[arg(short, long)]
    pub today: Option<String>,

    /// The countdown target.
    #[arg(short, long, default_value = FCS_DATE)]
    pub fcs: String,
}
