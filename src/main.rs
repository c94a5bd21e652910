use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use cachetrace::cache::{replay, Cache};
use cachetrace::config::Config;
use cachetrace::store::{set_store, store};
use cachetrace::types::{CacheError, Value};
use cachetrace::utils::setup_logging;

#[derive(Parser)]
#[command(name = "cachetrace", about = "Instrumented cache over a key-value store")]
struct Cli {
    /// YAML config file; without one the store runs in-memory
    #[arg(short, long, default_value = "cachetrace.yaml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a value and print the generated key
    Store {
        value: String,
        /// Store the argument's raw bytes instead of parsing it
        #[arg(long)]
        bytes: bool,
    },
    /// Print the raw value stored under a key
    Get { key: String },
    /// Print the value under a key decoded as UTF-8
    GetStr { key: String },
    /// Print the value under a key parsed as an integer
    GetInt { key: String },
    /// Print the recorded call history of an instrumented method
    Replay { method: Method },
    /// Clear every key in the store
    Flush,
}

#[derive(Clone, ValueEnum)]
enum Method {
    Store,
    GetStr,
    GetInt,
}

impl Method {
    fn qualname(&self) -> &'static str {
        match self {
            Method::Store => Cache::STORE_METHOD,
            Method::GetStr => Cache::GET_STR_METHOD,
            Method::GetInt => Cache::GET_INT_METHOD,
        }
    }
}

// integers first, then floats, everything else is a string
fn parse_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Str(raw.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if Path::new(&cli.config).exists() {
        Config::read(&cli.config)?
    } else {
        Config::empty()
    };
    setup_logging(config.debug);

    if let Some(store_config) = &config.store {
        info!("Using {} store", store_config.backend);
        set_store(&store_config.backend, &store_config.url).await?;
    }
    let cache = Cache::new(store());

    if let Err(e) = run(cli.command, &cache).await {
        error!("{}: {}", e.error_code(), e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, cache: &Cache) -> Result<(), CacheError> {
    match command {
        Command::Store { value, bytes } => {
            let value = if bytes {
                Value::Bytes(value.into_bytes())
            } else {
                parse_value(&value)
            };
            println!("{}", cache.store(value).await?);
        }
        Command::Get { key } => match cache.get(&key).await? {
            Some(raw) => println!("{}", String::from_utf8_lossy(&raw)),
            None => println!("(nil)"),
        },
        Command::GetStr { key } => match cache.get_str(&key).await? {
            Some(text) => println!("{}", text),
            None => println!("(nil)"),
        },
        Command::GetInt { key } => match cache.get_int(&key).await? {
            Some(value) => println!("{}", value),
            None => println!("(nil)"),
        },
        Command::Replay { method } => {
            print!("{}", replay(&store(), method.qualname()).await?);
        }
        Command::Flush => {
            cache.flush().await?;
            info!("Store flushed");
        }
    }

    Ok(())
}
