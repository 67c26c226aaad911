use std::process::ExitCode;

fn main() -> ExitCode {
    match spread::runner::run_with_args() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("spread: {e}");
            ExitCode::FAILURE
        }
    }
}
