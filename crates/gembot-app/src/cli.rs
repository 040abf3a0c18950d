use clap::Parser;

/// Gembot — a web chat UI for the Gemini API.
#[derive(Parser, Debug)]
#[command(name = "gembot", version, about)]
pub struct Args {
    /// Address to bind the web server to.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the web server to.
    #[arg(short, long, default_value_t = 7860)]
    pub port: u16,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
