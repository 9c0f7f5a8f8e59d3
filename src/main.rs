use std::process::ExitCode;

fn main() -> ExitCode {
    match compass_data::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
