use clap::Parser;
use lox_drv::{run, Cli};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    std::process::exit(run(cli));
}
