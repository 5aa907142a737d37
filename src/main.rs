use clap::Parser;
use flowc::cli::run;
use flowc::frontend::ToyFrontend;
use flowc::Cli;
use std::sync::Arc;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let code = run(cli, Arc::new(ToyFrontend), &mut stderr);
    std::process::exit(code);
}
