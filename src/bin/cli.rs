//! flatcoll CLI
//!
//! Drives both containers from the command line and reports how their
//! capacity evolves. Set `RUST_LOG=flatcoll=trace` to watch every probe.

use clap::{Parser, Subcommand};
use flatcoll::{Array, BlobSet, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// flatcoll CLI
#[derive(Parser, Debug)]
#[command(name = "flatcoll-cli")]
#[command(about = "Exercise flatcoll's growable array and blob hash set")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append integers to an array, pop some, and print it sorted
    Array {
        /// Initial capacity in elements
        #[arg(short, long, default_value = "8")]
        capacity: usize,

        /// Keep capacity when the array empties out
        #[arg(long)]
        no_shrink: bool,

        /// Number of elements to pop after appending
        #[arg(short, long, default_value = "0")]
        pop: usize,

        /// Values to append
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Insert words into a set, remove some, and print the members
    Set {
        /// Initial capacity in slots
        #[arg(short, long, default_value = "16")]
        capacity: usize,

        /// Words to remove after inserting
        #[arg(short, long)]
        remove: Vec<String>,

        /// Words to insert
        words: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flatcoll=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    tracing::info!("flatcoll v{}", flatcoll::VERSION);

    let outcome = match args.command {
        Commands::Array {
            capacity,
            no_shrink,
            pop,
            values,
        } => {
            let config = Config::builder()
                .array_capacity(capacity)
                .shrink_arrays(!no_shrink)
                .build();
            run_array(&config, &values, pop)
        }
        Commands::Set {
            capacity,
            remove,
            words,
        } => {
            let config = Config::builder().set_capacity(capacity).build();
            run_set(&config, &words, &remove)
        }
    };

    if let Err(e) = outcome {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

fn run_array(config: &Config, values: &[i64], pops: usize) -> flatcoll::Result<()> {
    let mut array = Array::<i64>::with_config(config)?;
    array.extend_from_slice(values)?;
    println!("appended {} -> len={} capacity={}", values.len(), array.len(), array.capacity());

    for _ in 0..pops {
        let value = array.pop()?;
        println!("popped {} -> len={} capacity={}", value, array.len(), array.capacity());
    }

    array.sort()?;
    let sorted = array
        .as_raw()
        .render(|bytes, f| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(bytes);
            write!(f, "{}", i64::from_ne_bytes(raw))
        })
        .to_string();
    println!("sorted: {}", sorted);
    Ok(())
}

fn run_set(config: &Config, words: &[String], removals: &[String]) -> flatcoll::Result<()> {
    let mut set = BlobSet::with_config(config)?;
    for word in words {
        let inserted = set.insert(word.as_bytes())?;
        println!(
            "insert {:?}: {} -> len={} capacity={}",
            word,
            if inserted { "inserted" } else { "already present" },
            set.len(),
            set.capacity()
        );
    }

    for word in removals {
        let removed = set.remove(word.as_bytes());
        println!(
            "remove {:?}: {} -> len={} capacity={}",
            word,
            if removed { "removed" } else { "not found" },
            set.len(),
            set.capacity()
        );
    }

    let members: Vec<_> = set.iter().map(String::from_utf8_lossy).collect();
    println!("members: {:?}", members);
    Ok(())
}
