use clap::Parser;

use stockbill_cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    stockbill_observability::init_with(&cli.log_config());
    stockbill_cli::run(cli)
}
