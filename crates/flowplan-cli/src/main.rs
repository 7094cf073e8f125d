mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use flowplan_core::view::{SortDirection, SortField};

#[derive(Parser)]
#[command(
    name = "flowplan",
    version,
    about = "Supply-chain assignment planning from spreadsheet data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a spreadsheet (xlsx or csv) and show its columns and preview
    Parse {
        /// Path to the spreadsheet file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write all decoded rows to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Run an optimization round and reconcile the returned plan
    Optimize {
        /// Sites spreadsheet (factory locations and capacities)
        #[arg(long, value_name = "FILE")]
        sites: PathBuf,

        /// Markets spreadsheet (market locations and demands)
        #[arg(long, value_name = "FILE")]
        markets: PathBuf,

        /// Transport spreadsheet (per-unit shipping costs)
        #[arg(long, value_name = "FILE")]
        transport: PathBuf,

        /// Optimization service endpoint
        #[arg(long, default_value = flowplan_core::solver::http::DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = flowplan_core::solver::http::DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Save the reconciled plan as JSON
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Write the result rows as a CSV artifact
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,

        /// Filter displayed rows by factory or market substring
        #[arg(long)]
        search: Option<String>,

        /// Column to sort the displayed rows by
        #[arg(long, value_enum, value_name = "FIELD")]
        sort_by: Option<SortColumn>,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },
    /// Render a previously saved plan without calling the service
    Report {
        /// Path to a plan JSON file written by `optimize --out`
        plan_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the result rows as a CSV artifact
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,

        /// Filter displayed rows by factory or market substring
        #[arg(long)]
        search: Option<String>,

        /// Column to sort the displayed rows by
        #[arg(long, value_enum, value_name = "FIELD")]
        sort_by: Option<SortColumn>,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortColumn {
    Factory,
    Market,
    Quantity,
    Cost,
}

impl SortColumn {
    fn as_sort(self, desc: bool) -> (SortField, SortDirection) {
        let field = match self {
            SortColumn::Factory => SortField::Factory,
            SortColumn::Market => SortField::Market,
            SortColumn::Quantity => SortField::Quantity,
            SortColumn::Cost => SortField::Cost,
        };
        let direction = if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        (field, direction)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            out,
        } => commands::parse::run(input_file, &output, out),
        Commands::Optimize {
            sites,
            markets,
            transport,
            endpoint,
            timeout,
            output,
            out,
            export,
            search,
            sort_by,
            desc,
        } => commands::optimize::run(commands::optimize::OptimizeArgs {
            sites,
            markets,
            transport,
            endpoint,
            timeout,
            output,
            out,
            export,
            search,
            sort: sort_by.map(|c| c.as_sort(desc)),
        }),
        Commands::Report {
            plan_file,
            output,
            export,
            search,
            sort_by,
            desc,
        } => commands::report::run(
            plan_file,
            &output,
            export,
            search,
            sort_by.map(|c| c.as_sort(desc)),
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
