use std::process::ExitCode;

use clap::Parser;
use tagscript::cli::{self, CliArgs};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    cli::init_tracing(args.debug);

    let mut stdin = std::io::stdin().lock();
    match cli::run(&args, &mut stdin) {
        Ok(output) => {
            println!("{}", output.text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("tagscript: {e}");
            ExitCode::FAILURE
        }
    }
}
