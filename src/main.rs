use crate::core::system::System;
use std::process::ExitCode;

mod core;
mod interface;
mod model;
mod platform;
mod utils;

#[tokio::main]
async fn main() -> ExitCode {
    let mut system = match System::initialize() {
        Ok(system) => system,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let result = system.run().await;
    system.terminate().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
