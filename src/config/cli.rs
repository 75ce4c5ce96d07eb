use crate::domain::model::{CustomerId, ServiceDay};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pool-route")]
#[command(about = "Plan and run the daily pool-cleaning route")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "pool-route.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the ordered stops for today (or a given weekday)
    Route {
        /// Weekday to plan for, Monday through Friday
        #[arg(long, value_parser = parse_day)]
        day: Option<ServiceDay>,

        /// Skip fetching turn-by-turn directions
        #[arg(long)]
        no_directions: bool,

        /// Print the route as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage the customer roster
    #[command(subcommand)]
    Clients(ClientsCommand),

    /// Mark a stop as started
    Start {
        #[arg(value_parser = parse_id)]
        id: CustomerId,
    },

    /// Finish a stop and email the service report
    Finish {
        #[arg(value_parser = parse_id)]
        id: CustomerId,

        #[arg(long, default_value = "")]
        notes: String,

        /// Photo to attach to the report
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClientsCommand {
    /// List every customer
    List,

    /// Geocode an address and add the customer
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_parser = parse_day)]
        day: ServiceDay,
    },

    /// Activate or deactivate a customer
    SetActive {
        #[arg(value_parser = parse_id)]
        id: CustomerId,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
}

fn parse_day(value: &str) -> Result<ServiceDay, String> {
    value.parse().map_err(|e: crate::utils::error::RouteError| e.to_string())
}

fn parse_id(value: &str) -> Result<CustomerId, String> {
    value
        .parse::<u64>()
        .map(CustomerId)
        .map_err(|_| format!("'{}' is not a customer id", value))
}
