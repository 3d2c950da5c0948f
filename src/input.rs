//! Provides a means to read, parse and hold configuration options for runs.
use clap::Parser;
use serde_derive::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "subprobe",
    version = env!("CARGO_PKG_VERSION"),
    max_term_width = 120,
)]
/// Bulk HTTP/HTTPS reachability checker with CDN fingerprinting.
/// Probes every host in the input file over both schemes, classifies the
/// fronting CDN from DNS and header evidence, and writes a grouped report
/// of working endpoints.
pub struct Opts {
    /// File of hostnames to probe, one per line. Lines starting with '#'
    /// are treated as comments.
    pub host_file: PathBuf,

    /// Number of concurrent workers. The host list is split into this many
    /// contiguous shards, one worker each.
    #[arg(short, long, default_value = "50")]
    pub workers: usize,

    /// Connect timeout per probe, in milliseconds.
    #[arg(long, default_value = "2000")]
    pub connect_timeout: u64,

    /// Overall timeout per probe, in milliseconds.
    #[arg(short, long, default_value = "3000")]
    pub timeout: u64,

    /// Path the grouped report of working hosts is written to.
    #[arg(short, long, default_value = "working_hosts.txt")]
    pub output: PathBuf,

    /// A comma-delimited list or file of DNS resolvers used for the
    /// canonical-name lookups.
    #[arg(long)]
    pub resolver: Option<String>,

    /// Greppable mode. Suppresses all console chatter; only the report file
    /// is produced.
    #[arg(short, long)]
    pub greppable: bool,

    /// Accessible mode. Turns off features which negatively affect screen
    /// readers, such as the in-place progress line.
    #[arg(long)]
    pub accessible: bool,

    /// Hide the banner.
    #[arg(long)]
    pub no_banner: bool,

    /// Whether to ignore the configuration file or not.
    #[arg(short, long)]
    pub no_config: bool,

    /// Custom path to config file.
    #[arg(short, long, value_parser)]
    pub config_path: Option<PathBuf>,
}

impl Opts {
    /// Parses command-line arguments. Usage errors print clap's message and
    /// exit with code 1.
    #[must_use]
    pub fn read() -> Self {
        Opts::try_parse().unwrap_or_else(|e| {
            let _ = e.print();
            std::process::exit(1);
        })
    }

    /// Merges values found within the user configuration file into the
    /// command-line arguments.
    pub fn merge(&mut self, config: &Config) {
        if !self.no_config {
            self.merge_required(config);
            self.merge_optional(config);
        }
    }

    fn merge_required(&mut self, config: &Config) {
        macro_rules! merge_required {
            ($($field: ident),+) => {
                $(
                    if let Some(e) = &config.$field {
                        self.$field = e.clone();
                    }
                )+
            }
        }

        merge_required!(workers, connect_timeout, timeout, output, greppable, accessible);
    }

    fn merge_optional(&mut self, config: &Config) {
        macro_rules! merge_optional {
            ($($field: ident),+) => {
                $(
                    if config.$field.is_some() {
                        self.$field = config.$field.clone();
                    }
                )+
            }
        }

        merge_optional!(resolver);
    }
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            host_file: PathBuf::new(),
            workers: 50,
            connect_timeout: 2_000,
            timeout: 3_000,
            output: PathBuf::from("working_hosts.txt"),
            resolver: None,
            greppable: false,
            accessible: false,
            no_banner: false,
            no_config: true,
            config_path: None,
        }
    }
}

/// Struct used to deserialize the options specified within our config file.
/// These are merged with the command-line arguments to produce the final
/// Opts struct.
#[derive(Debug, Deserialize)]
pub struct Config {
    workers: Option<usize>,
    connect_timeout: Option<u64>,
    timeout: Option<u64>,
    output: Option<PathBuf>,
    resolver: Option<String>,
    greppable: Option<bool>,
    accessible: Option<bool>,
}

impl Config {
    /// Reads the configuration file with TOML format and parses it into a
    /// Config struct.
    ///
    /// # Format
    ///
    /// workers = 100
    /// timeout = 5000
    /// output = "report.txt"
    /// greppable = true
    #[must_use]
    pub fn read(custom_config_path: Option<PathBuf>) -> Self {
        let mut content = String::new();
        let config_path = custom_config_path.unwrap_or_else(default_config_path);
        if config_path.exists() {
            content = fs::read_to_string(config_path).unwrap_or_default();
        }

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                println!("Found {e} in configuration file.\nAborting scan.\n");
                std::process::exit(1);
            }
        }
    }
}

/// Constructs default path to config toml
#[must_use]
pub fn default_config_path() -> PathBuf {
    let Some(mut config_path) = dirs::home_dir() else {
        panic!("Could not infer config file path.");
    };
    config_path.push(".subprobe.toml");
    config_path
}
