//! taskdeps - Infer task dependencies from planning checklists

use std::process::ExitCode;

fn main() -> ExitCode {
    match taskdeps::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
