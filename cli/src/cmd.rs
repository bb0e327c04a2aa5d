mod console;
mod resolve;
mod scp;
mod ssh;
mod tunnel;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use colored::Colorize;
use enum_dispatch::enum_dispatch;
use jumpto::action::OutboundCommand;
use tracing::debug;

use crate::args::AuthArgs;
use crate::args::FleetArgs;
use crate::args::GlobalArgs;
use crate::exec;
use crate::session::Session;

/// Jump to a single fleet machine by a short name
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    #[clap(flatten)]
    global_args: GlobalArgs,

    #[clap(flatten)]
    fleet_args: FleetArgs,

    #[clap(flatten)]
    auth_args: AuthArgs,
}

/// Subcommands must implement [`Run`] to be executed at runtime. A returned
/// command replaces the process.
#[enum_dispatch]
pub trait Run {
    async fn run(&self, session: &Session) -> Result<Option<OutboundCommand>>;
}

#[enum_dispatch(Run)]
#[derive(Debug, Subcommand)]
enum Command {
    Ssh(ssh::SshArgs),
    AppConsole(console::AppConsoleArgs),
    AppDbconsole(console::AppDbconsoleArgs),
    Rabbitmq(tunnel::RabbitmqArgs),
    SidekiqMonitoring(tunnel::SidekiqMonitoringArgs),
    ScpPush(scp::ScpPushArgs),
    ScpPull(scp::ScpPullArgs),
    Resolve(resolve::ResolveArgs),
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let guard = cli.global_args.init_tracing()?;

    let config = cli.global_args.load_config()?;
    let (environment, hosting) = cli.fleet_args.scope()?;
    debug!(%environment, ?hosting, "fleet scope");
    let session = Session::new(environment, hosting, &cli.auth_args, &config);

    let Some(command) = cli.command.run(&session).await? else {
        return Ok(());
    };

    if let Some(notice) = &command.notice {
        eprintln!("{}", notice.bold());
    }
    if cli.global_args.dry_run {
        println!("{command}");
        return Ok(());
    }

    // Flush the log file before the process is replaced.
    drop(guard);
    exec::replace_process(&command)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("jumpto").chain(args.iter().copied()))
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[rustfmt::skip::attributes(case)]
    #[rstest]
    #[case(&["ssh", "-e", "staging", "backend:2"])]
    #[case(&["-e", "staging", "ssh", "-p", "8080", "aws/backend"])]
    #[case(&["ssh", "-e", "staging", "backend", "--", "-A", "-v"])]
    #[case(&["app-console", "-e", "integration", "whitehall"])]
    #[case(&["app-dbconsole", "-e", "integration", "backend/publisher:1"])]
    #[case(&["rabbitmq", "-e", "production"])]
    #[case(&["sidekiq-monitoring", "-e", "production"])]
    #[case(&["scp-push", "-e", "ci", "backend", "a.txt", "b.txt", "/tmp/"])]
    #[case(&["scp-pull", "-e", "ci", "backend", "/var/log/x", ".", "--", "-r"])]
    #[case(&["resolve", "--json", "--app", "-e", "staging", "whitehall"])]
    #[case(&["app-console", "-e", "integration", "whitehall", "--", "-A"])]
    #[case(&["app-dbconsole", "-e", "integration", "whitehall", "--", "-A"])]
    #[case(&["rabbitmq", "-e", "production", "--", "-A"])]
    #[case(&["sidekiq-monitoring", "-e", "production", "backend/sidekiq-monitoring", "--", "-A"])]
    fn parses(#[case] args: &[&str]) {
        parse(args).unwrap();
    }

    #[rustfmt::skip::attributes(case)]
    #[rstest]
    #[case(&["scp-push", "-e", "ci", "backend", "only-one-path"])]
    #[case(&["ssh", "-p", "not-a-port", "backend"])]
    #[case(&["teleport", "backend"])]
    fn rejects(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[rustfmt::skip::attributes(case)]
    #[rstest]
    #[case(&["rabbitmq", "-e", "production", "--", "-A"],                 "rabbitmq", &["-A"])]
    #[case(&["rabbitmq", "-e", "production", "aws/rabbitmq:2"],           "aws/rabbitmq:2", &[])]
    #[case(&["rabbitmq", "-e", "production", "rabbitmq", "--", "-A", "-v"], "rabbitmq", &["-A", "-v"])]
    fn rabbitmq_target_survives_passthrough(
        #[case] args: &[&str],
        #[case] target: &str,
        #[case] ssh_args: &[&str],
    ) {
        let Command::Rabbitmq(rabbitmq) = parse(args).unwrap().command else {
            panic!("expected the rabbitmq subcommand");
        };
        assert_eq!(rabbitmq.target, target);
        assert_eq!(rabbitmq.ssh_args, ssh_args);
    }

    #[test]
    fn sidekiq_monitoring_defaults_its_target() {
        let cli = parse(&["sidekiq-monitoring", "-e", "production", "--", "-A"]).unwrap();
        let Command::SidekiqMonitoring(sidekiq) = cli.command else {
            panic!("expected the sidekiq-monitoring subcommand");
        };
        assert_eq!(sidekiq.target, "sidekiq-monitoring");
        assert_eq!(sidekiq.ssh_args, ["-A"]);
    }
}
