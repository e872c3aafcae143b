use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Delegate to the runner; individual game failures never reach here.
    match game_load_tester::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
