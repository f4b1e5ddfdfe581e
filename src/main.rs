//! listicles - schematized lists stored as markdown files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = listicles::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
