use std::process::ExitCode;

fn main() -> ExitCode {
    match dgounpack::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(dgounpack::cli::exit_code(&e))
        }
    }
}
