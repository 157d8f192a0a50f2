//! Command implementations for CTRE CLI.
//!
//! Provides subcommands for converting the state sales export to JSON,
//! inspecting its headers and running the linked-views dashboard from the
//! terminal.

use clap::Subcommand;
use ctre_sales::convert::ConvertFilter;

pub mod convert;
pub mod render;
pub mod summarize;

#[derive(Subcommand)]
pub enum Command {
    /// Convert a sales CSV export to a filtered JSON array
    Convert {
        /// Path to the CSV export
        #[arg(short, long)]
        input: String,

        /// Output path; defaults to filtered_data[_town][_start_end].json.
        /// A `.gz` suffix writes gzip.
        #[arg(short, long)]
        output: Option<String>,

        /// First list year to keep (inclusive)
        #[arg(long)]
        start_year: Option<i32>,

        /// Last list year to keep (inclusive)
        #[arg(long)]
        end_year: Option<i32>,

        /// Only keep sales in this town (case-insensitive)
        #[arg(long)]
        town: Option<String>,

        /// Only keep this property type (case-insensitive)
        #[arg(long)]
        property_type: Option<String>,
    },

    /// Print the header row of a sales CSV export
    Headers {
        /// Path to the CSV export
        #[arg(short, long)]
        input: String,
    },

    /// Load a source into the dashboard and print every view
    Summarize(summarize::SummarizeArgs),
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Convert {
            input,
            output,
            start_year,
            end_year,
            town,
            property_type,
        } => {
            let filter = ConvertFilter {
                start_year,
                end_year,
                town,
                property_type,
            };
            convert::run_convert(&input, output.as_deref(), &filter)
        }
        Command::Headers { input } => convert::run_headers(&input),
        Command::Summarize(args) => summarize::run_summarize(args).await,
    }
}
