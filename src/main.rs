use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(
    name = "propdep",
    version,
    about = "Estimate tax depreciation for an investment property"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Year-by-year depreciation schedule over 40 years
    Calculate(cmd::calculate::CalculateCommand),
    /// Key figures, method comparison and tax savings
    Summary(cmd::summary::SummaryCommand),
    /// Rental cash flow including depreciation tax savings
    Cashflow(cmd::cashflow::CashflowCommand),
    /// Check a request for problems without calculating
    Validate(cmd::validate::ValidateCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calculate(cmd) => cmd.exec(),
        Command::Summary(cmd) => cmd.exec(),
        Command::Cashflow(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
