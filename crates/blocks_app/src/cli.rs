use std::path::PathBuf;

use blocks_core::{ConvertOptions, DEFAULT_MAX_LIST_DEPTH};
use blocks_engine::{ImportRequest, BATCH_SIZE};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "html2blocks",
    version,
    about = "Convert a web page into document blocks and append them to a page"
)]
pub struct Cli {
    /// Page to fetch and convert
    pub url: String,

    /// Id of the page or block receiving the converted blocks
    #[arg(short, long)]
    pub container: String,

    /// API token for the block store (also read from .env)
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base for relative links and images (default: the fetched URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Deepest list nesting kept; deeper items are flattened
    #[arg(long, default_value_t = DEFAULT_MAX_LIST_DEPTH)]
    pub max_list_depth: usize,

    /// Fail on the first unresolvable URL instead of skipping the element
    #[arg(long)]
    pub strict: bool,

    /// Blocks sent per append request
    #[arg(long, default_value_t = BATCH_SIZE)]
    pub batch_size: usize,

    /// Write request bodies to DIR instead of calling the API
    #[arg(long, value_name = "DIR")]
    pub dry_run: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    pub fn import_request(&self) -> ImportRequest {
        let mut request = ImportRequest::new(self.url.clone(), self.container.clone());
        request.base_url = self.base_url.clone();
        request.batch_size = self.batch_size;
        request.options = ConvertOptions {
            max_list_depth: self.max_list_depth,
            strict_urls: self.strict,
            ..ConvertOptions::default()
        };
        request
    }
}
