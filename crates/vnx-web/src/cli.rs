use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Sets the level of tracing
    #[arg(long, default_value = "INFO", ignore_case = true)]
    pub trace: TraceLevel,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl TraceLevel {
    /// The equivalent `env_logger` filter directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            TraceLevel::DEBUG => "debug",
            TraceLevel::INFO => "info",
            TraceLevel::WARN => "warn",
            TraceLevel::ERROR => "error",
        }
    }
}
