use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "checkout-cli")]
#[command(about = "Interactive point-of-sale console for a small product catalog")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path (dotenv format)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Filter directive for the tracing subscriber.
    pub fn log_filter(&self, configured: &str) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            configured.to_lowercase()
        }
    }

    /// Builds the subscriber filter from `--verbose` or the configured level; `RUST_LOG` is not consulted.
    pub fn env_filter(&self, configured: &str) -> EnvFilter {
        EnvFilter::new(self.log_filter(configured))
    }
}
