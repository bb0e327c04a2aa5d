use std::any::Any;
use std::fs::OpenOptions;
use std::io::IsTerminal;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Args;
use jumpto::config;
use jumpto::config::Config;
use jumpto::util::dirs;
use tracing::debug;
use tracing_appender::non_blocking;
use tracing_glog::Glog;
use tracing_glog::GlogFields;
use tracing_glog::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

const HEADING: Option<&str> = Some("Global Options");

const VERBOSE_FILTER: &str = "jumpto=debug,jumpto_cli=debug";

/// Global arguments that apply to every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Show debug output of the resolution steps
    #[clap(short = 'v', long, help_heading = HEADING, global = true)]
    pub verbose: bool,

    /// Filter directive for stderr logs
    #[clap(long, env = "RUST_LOG", default_value = "error", help_heading = HEADING, global = true)]
    pub log_level: String,

    /// Filter directive for log file
    #[clap(long, default_value = VERBOSE_FILTER, help_heading = HEADING, global = true)]
    pub file_level: String,

    /// Data directory
    #[clap(long, env = "JUMPTO_DATA_DIR", help_heading = HEADING, global = true)]
    pub data_dir: Option<Utf8PathBuf>,

    /// Config file
    #[clap(long, env = "JUMPTO_CONFIG", help_heading = HEADING, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Print the outbound command instead of running it
    #[clap(long, help_heading = HEADING, global = true)]
    pub dry_run: bool,
}

/// Guard holder for [`tracing`] things that need to live until the end of the
/// program.
#[derive(Debug, Default)]
pub struct TracingGuard {
    #[allow(dead_code)]
    guards: Vec<Box<dyn Any>>,
}

impl GlobalArgs {
    /// Filter directive for stderr, taking `--verbose` into account.
    pub fn stderr_filter(&self) -> &str {
        if self.verbose {
            VERBOSE_FILTER
        } else {
            &self.log_level
        }
    }

    /// Initializes all [`tracing`] config.
    pub fn init_tracing(&self) -> Result<TracingGuard> {
        let mut guard = TracingGuard::default();

        let stderr_filter = EnvFilter::builder().parse_lossy(self.stderr_filter());
        let stderr_layer = tracing_subscriber::fmt::layer()
            .event_format(Glog::default().with_timer(LocalTime::default()))
            .fmt_fields(GlogFields::default())
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .with_filter(stderr_filter);

        let file_layer = match self.data_dir() {
            Some(data_dir) => {
                std::fs::create_dir_all(&data_dir)
                    .with_context(|| format!("unable to create data dir {data_dir}"))?;
                let log_file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(data_dir.join("last.log"))
                    .context("unable to create log file")?;
                let (file_writer, file_writer_guard) = non_blocking(log_file);
                guard.guards.push(Box::new(file_writer_guard));
                let file_filter = EnvFilter::builder().parse_lossy(&self.file_level);
                let layer = tracing_subscriber::fmt::layer()
                    .event_format(Glog::default().with_timer(LocalTime::default()))
                    .fmt_fields(GlogFields::default())
                    .with_ansi(false)
                    .with_writer(file_writer)
                    .with_filter(file_filter);
                Some(layer)
            }
            None => None,
        };

        let subscriber = Registry::default().with(stderr_layer).with(file_layer);
        tracing::subscriber::set_global_default(subscriber)?;

        debug!("Initialized tracing");

        Ok(guard)
    }

    /// `--data-dir`, else the platform data directory.
    pub fn data_dir(&self) -> Option<Utf8PathBuf> {
        self.data_dir.clone().or_else(|| {
            dirs::data_dir(config::APP_NAME).and_then(|dir| Utf8PathBuf::try_from(dir).ok())
        })
    }

    /// Loads `--config`, else the default config file if there is one.
    pub fn load_config(&self) -> Result<Config> {
        match self.config.clone().or_else(config::default_path) {
            Some(path) => Config::load(&path),
            None => Ok(Config::default()),
        }
    }
}
