use clap::Parser;
use std::path::PathBuf;

/// Proteus - schema-driven mock server for authored API definitions
#[derive(Parser, Debug, Clone)]
#[command(name = "proteus", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PROTEUS_CONFIG", default_value = "proteus.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "PROTEUS_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "PROTEUS_PORT")]
    pub port: Option<u16>,

    /// Seed for reproducible mock bodies
    #[arg(long, env = "PROTEUS_SEED")]
    pub seed: Option<u64>,

    /// Maximum schema nesting depth
    #[arg(long, env = "PROTEUS_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Always generate random strings, even where an example is recorded
    #[arg(long, env = "PROTEUS_NO_RECORDED_EXAMPLES")]
    pub no_recorded_examples: bool,

    /// Disable live reload of configuration files
    #[arg(long, env = "PROTEUS_NO_WATCH")]
    pub no_watch: bool,
}
