mod args;
mod cmd;
mod exec;
mod session;

use std::process::ExitCode;

use colored::Colorize;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let result = tokio::select! {
        result = cmd::run() => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", "Interrupted".bold());
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);
            ExitCode::FAILURE
        }
    }
}

/// One bold headline, then whatever helps the operator recover.
fn report(error: &anyhow::Error) {
    match error.downcast_ref::<jumpto::Error>() {
        Some(error) => {
            eprintln!("{}", error.to_string().bold());
            for line in error.remediation() {
                eprintln!("{line}");
            }
        }
        None => eprintln!("{}", format!("{error:#}").bold()),
    }
}
