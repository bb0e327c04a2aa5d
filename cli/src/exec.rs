use std::process::Command;

use anyhow::Context;
use anyhow::Result;
use jumpto::action::OutboundCommand;
use tracing::info;

/// Replaces the current process with `command`. Only returns on failure.
#[cfg(unix)]
pub fn replace_process(command: &OutboundCommand) -> Result<()> {
    use std::os::unix::process::CommandExt;

    info!(%command, "handing over");
    let error = Command::new(&command.program).args(&command.args).exec();
    Err(error).with_context(|| format!("unable to run {}", command.program))
}

/// Runs `command` to completion and exits with its status.
#[cfg(not(unix))]
pub fn replace_process(command: &OutboundCommand) -> Result<()> {
    info!(%command, "handing over");
    let status = Command::new(&command.program)
        .args(&command.args)
        .status()
        .with_context(|| format!("unable to run {}", command.program))?;
    std::process::exit(status.code().unwrap_or(1));
}
