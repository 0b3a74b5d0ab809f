//! Command-line interface - argument parsing and command handlers.
//!
//! Handlers call into [`crate::core`] and return the text to print, so they can be tested
//! without capturing stdout. With `--json` every handler emits the boundary shapes
//! (`RoomTypeView`, `AdjustmentView`, ...) instead of the human-readable table.

use crate::{
    config::{database::DEFAULT_DATABASE_URL, seed::DEFAULT_CONFIG_PATH},
    core::{
        hotel::{self, HotelView},
        ledger::{self, AdjustmentView},
        money::Money,
        resolver::{self, RatePoint},
        room_type::{self, RoomTypeView},
        validation,
    },
    errors::Result,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use serde::Serialize;
/// Hotel room rate ledger
#[derive(Debug, Parser)]
#[command(name = "rate-ledger", version, about)]
pub struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Catalog seed file
    #[arg(long, env = "RATE_LEDGER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Skip seeding from the catalog file
    #[arg(long)]
    pub no_seed: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all hotels
    Hotels,
    /// Show a hotel with the effective rate of each room type
    Hotel {
        /// Hotel ID
        id: i64,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        at: Option<String>,
    },
    /// Create a hotel
    AddHotel {
        /// Hotel name
        #[arg(long)]
        name: String,
        /// Hotel location
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Create a room type
    AddRoomType {
        /// Owning hotel ID
        #[arg(long)]
        hotel: i64,
        /// Room type name
        #[arg(long)]
        name: String,
        /// Base rate, e.g. 150.00
        #[arg(long)]
        base_rate: String,
    },
    /// Append a rate adjustment to a room type's ledger
    Adjust {
        /// Room type ID
        #[arg(long)]
        room_type: i64,
        /// Signed amount, e.g. 20.00 or -5.00
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// First date the adjustment applies (YYYY-MM-DD)
        #[arg(long)]
        effective_date: String,
        /// Why the rate changed
        #[arg(long)]
        reason: String,
    },
    /// Show a room type's adjustments in the order they were recorded
    History {
        /// Room type ID
        #[arg(long)]
        room_type: i64,
    },
    /// Resolve a room type's effective rate
    Rate {
        /// Room type ID
        #[arg(long)]
        room_type: i64,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        at: Option<String>,
    },
    /// Show every rate a room type has had, by effective date
    Timeline {
        /// Room type ID
        #[arg(long)]
        room_type: i64,
    },
}

/// Runs one command and returns its output.
pub async fn run(db: &DatabaseConnection, command: Command, json: bool) -> Result<String> {
    match command {
        Command::Hotels => {
            let hotels = hotel::list_hotels(db).await?;
            if json {
                return to_json(&hotels);
            }
            let mut out = String::new();
            for hotel in &hotels {
                out.push_str(&format!(
                    "#{} {} ({}) [{}]\n",
                    hotel.id, hotel.name, hotel.location, hotel.status
                ));
            }
            if hotels.is_empty() {
                out.push_str("No hotels.\n");
            }
            Ok(out)
        }
        Command::Hotel { id, at } => {
            let reference = parse_reference(at.as_deref())?;
            let view = hotel::hotel_view(db, id, reference).await?;
            if json {
                return to_json(&view);
            }
            Ok(format_hotel(&view))
        }
        Command::AddHotel { name, location } => {
            let created = hotel::create_hotel(db, &name, &location).await?;
            if json {
                return to_json(&created);
            }
            Ok(format!("Created hotel #{} {}\n", created.id, created.name))
        }
        Command::AddRoomType {
            hotel,
            name,
            base_rate,
        } => {
            let base_rate: Money = base_rate.parse()?;
            let created = room_type::create_room_type(db, hotel, &name, base_rate).await?;
            let view = room_type::build_view(created, Vec::new(), resolver::today())?;
            if json {
                return to_json(&view);
            }
            Ok(format!(
                "Created room type #{} {} at {}\n",
                view.id, view.name, view.base_rate
            ))
        }
        Command::Adjust {
            room_type,
            amount,
            effective_date,
            reason,
        } => {
            let stored =
                ledger::append_raw(db, room_type, &amount, &effective_date, &reason).await?;
            let view = room_type::room_type_view(db, room_type, None).await?;
            if json {
                return to_json(&view);
            }
            let recorded = AdjustmentView::from(stored);
            Ok(format!(
                "Recorded {}\nEffective rate today: {}\n",
                format_adjustment(&recorded),
                view.effective_rate
            ))
        }
        Command::History { room_type } => {
            let entries: Vec<AdjustmentView> = ledger::history(db, room_type)
                .await?
                .into_iter()
                .map(AdjustmentView::from)
                .collect();
            if json {
                return to_json(&entries);
            }
            if entries.is_empty() {
                return Ok("No adjustments.\n".to_string());
            }
            let mut out = String::new();
            for entry in &entries {
                out.push_str(&format_adjustment(entry));
                out.push('\n');
            }
            Ok(out)
        }
        Command::Rate { room_type, at } => {
            let reference = parse_reference(at.as_deref())?;
            let view = room_type::room_type_view(db, room_type, reference).await?;
            if json {
                return to_json(&view);
            }
            Ok(format_room_type(&view))
        }
        Command::Timeline { room_type } => {
            let timeline = room_type::rate_timeline(db, room_type).await?;
            if json {
                return to_json(&timeline);
            }
            Ok(format_timeline(&timeline))
        }
    }
}

fn parse_reference(at: Option<&str>) -> Result<Option<NaiveDate>> {
    at.map(validation::parse_date).transpose()
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

fn format_adjustment(entry: &AdjustmentView) -> String {
    let sign = if entry.adjustment_amount.is_negative() {
        ""
    } else {
        "+"
    };
    format!(
        "#{} {sign}{} from {} ({}) recorded {}",
        entry.id,
        entry.adjustment_amount,
        entry.effective_date,
        entry.reason,
        entry.created_at.format("%Y-%m-%d %H:%M:%S")
    )
}

fn format_room_type(view: &RoomTypeView) -> String {
    format!(
        "#{} {}: base {} -> effective {} on {}\n",
        view.id, view.name, view.base_rate, view.effective_rate, view.reference_date
    )
}

fn format_hotel(view: &HotelView) -> String {
    let mut out = format!(
        "#{} {} ({}) [{}]\n",
        view.id, view.name, view.location, view.status
    );
    for room_type in &view.room_types {
        out.push_str("  ");
        out.push_str(&format_room_type(room_type));
    }
    out
}

fn format_timeline(timeline: &[RatePoint]) -> String {
    if timeline.is_empty() {
        return "No adjustments; base rate applies at every date.\n".to_string();
    }
    let mut out = String::new();
    for point in timeline {
        out.push_str(&format!(
            "from {}: {} (delta {}, adjustments {:?})\n",
            point.effective_from, point.rate, point.delta, point.applied
        ));
    }
    out
}
