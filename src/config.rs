//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;

use crate::alert::{AlertDispatcher, BellAlert, CommandAlert, FanoutAlert, LogAlert};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "timer-board")]
#[command(about = "A local timer board service with persisted countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the timer store
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Key the timer collection is stored under
    #[arg(long, env = "TIMER_STORAGE_KEY", default_value = "timers")]
    pub storage_key: String,

    /// Keep timers in memory only; nothing is written to disk
    #[arg(long)]
    pub in_memory: bool,

    /// Tick interval in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Ring the terminal bell when a timer completes
    #[arg(long)]
    pub bell: bool,

    /// Shell command to run when a timer completes (gets TIMER_ID and TIMER_TITLE)
    #[arg(long)]
    pub alert_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Build the completion alert chain: always a log line, plus any enabled extras
    pub fn alert_dispatcher(&self) -> Arc<dyn AlertDispatcher> {
        let mut extras: Vec<Arc<dyn AlertDispatcher>> = Vec::new();
        if self.bell {
            extras.push(Arc::new(BellAlert::stdout()));
        }
        if let Some(command) = &self.alert_command {
            extras.push(Arc::new(CommandAlert::new(command.clone())));
        }

        if extras.is_empty() {
            return Arc::new(LogAlert);
        }
        extras.insert(0, Arc::new(LogAlert));
        Arc::new(FanoutAlert::new(extras))
    }
}
