//! Directory tree CLI
//!
//! Loads a directory lazily and prints listings, searches and size reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dir_tree::prelude::*;

/// Walk, search and measure directory trees
#[derive(Parser, Debug)]
#[command(name = "dir-tree", version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Include entries whose name starts with '.'
    #[arg(long, global = true)]
    hidden: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long, global = true)]
    follow_links: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every entry in the chosen order
    Walk {
        /// Directory to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Traversal order
        #[arg(short, long, value_enum, default_value_t = Order::Pre)]
        order: Order,
    },

    /// Draw the directory hierarchy
    Tree {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show total size, file and directory counts
    Du {
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the total size of every directory, deepest first
    Sizes {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Find entries by name and/or extension
    Find {
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Substring the name must contain
        #[arg(short, long)]
        name: Option<String>,

        /// File extension, without the dot
        #[arg(short, long)]
        ext: Option<String>,

        /// Stop at the first match
        #[arg(long)]
        first: bool,
    },

    /// Print entries grouped by depth
    Levels {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Order {
    /// Parent before children
    Pre,
    /// Children before parent
    Post,
    /// Level by level
    Bfs,
}

impl From<Order> for TraversalOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Pre => TraversalOrder::PreOrder,
            Order::Post => TraversalOrder::PostOrder,
            Order::Bfs => TraversalOrder::BreadthFirst,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_root(source: &FsChildren, path: &Path) -> Result<FsEntry> {
    let root = FsEntry::open_root(path, source.follows_links())
        .with_context(|| format!("Failed to load {}", path.display()))?;
    log::debug!("Loaded root {} ({})", root.path.display(), root.kind);
    Ok(root)
}

/// Format file size in human-readable format
fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = FsChildren::new()
        .include_hidden(cli.hidden)
        .follow_links(cli.follow_links);
    let tree = source.into_traversal();

    match cli.command {
        Command::Walk { path, order } => {
            let root = load_root(&source, &path)?;
            let order = TraversalOrder::from(order);
            log::info!("Walking {} in {}", path.display(), order);

            for entry in listing(&tree, &root, order) {
                println!("{}", entry.relative_to(&root.path).display());
            }
        }
        Command::Tree { path } => {
            let root = load_root(&source, &path)?;
            if let Some(rendered) = render_tree(&tree, &root) {
                println!("{rendered}");
            }
        }
        Command::Du { path, json } => {
            let root = load_root(&source, &path)?;
            let usage = disk_usage(&tree, &root).unwrap_or_default();

            if json {
                println!("{}", serde_json::to_string_pretty(&usage)?);
            } else {
                println!("Total size: {}", format_size(usage.bytes));
                println!("Files: {}", usage.files);
                println!("Directories: {}", usage.directories);
            }
        }
        Command::Sizes { path } => {
            let root = load_root(&source, &path)?;
            for dir in directory_sizes(&tree, &root) {
                println!(
                    "{:>12}  {}",
                    format_size(dir.bytes),
                    dir.entry.relative_to(&root.path).display()
                );
            }
        }
        Command::Find {
            path,
            name,
            ext,
            first,
        } => {
            let root = load_root(&source, &path)?;
            let query = Query {
                name,
                extension: ext,
            };
            let found = find(&tree, &root, &query, first);
            log::info!("{} matches under {}", found.len(), path.display());

            for entry in found {
                println!("{}", entry.path.display());
            }
        }
        Command::Levels { path } => {
            let root = load_root(&source, &path)?;
            for (depth, level) in levels(&tree, &root).iter().enumerate() {
                let names: Vec<String> = level.iter().map(ToString::to_string).collect();
                println!("{depth}: {}", names.join("  "));
            }
        }
    }

    Ok(())
}
