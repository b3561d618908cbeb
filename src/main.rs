use clap::Parser;
use firesave::cli::Cli;
use firesave::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbosity());

    if let Err(e) = cli.run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
