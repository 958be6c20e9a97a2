//! `gyred` — demo driver for the gyre consistent-hashing distributor.
//!
//! Registers a set of nodes, resolves a batch of sample keys, and prints
//! how the key space is divided. Optionally removes a node afterwards and
//! reports how many keys actually moved — the point of consistent hashing
//! is that this number stays small.
//!
//! # Usage
//!
//! ```text
//! gyred -n cache-1 -n cache-2 -n cache-3            # three nodes, 1000 keys
//! gyred -c gyre.toml --keys 10000                   # nodes from config
//! gyred -n a -n b -n c --remove b                   # show movement on removal
//! gyred -n a -n b --virtual-nodes 128               # smoother distribution
//! ```

mod config;
mod telemetry;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gyre_ring::{Distributor, Node};
use tracing::info;

use config::CliConfig;

#[derive(Parser)]
#[command(
    name = "gyred",
    version,
    about = "Consistent-hashing key distributor demo"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node name to register. Can be given multiple times; merged with the
    /// `nodes` list from the config file.
    #[arg(short, long = "node")]
    nodes: Vec<String>,

    /// Number of sample keys to distribute.
    #[arg(short, long, default_value_t = 1000)]
    keys: usize,

    /// Override the virtual-replica count per node.
    #[arg(long)]
    virtual_nodes: Option<usize>,

    /// After distributing, remove this node and report key movement.
    #[arg(long)]
    remove: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    telemetry::init(&config.log.level);

    let mut names: Vec<String> = config.nodes.clone();
    for name in &cli.nodes {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    if names.is_empty() {
        bail!("no nodes given; use --node or a config file with a `nodes` list");
    }

    let virtual_nodes = cli.virtual_nodes.unwrap_or_else(|| config.virtual_nodes());
    let dist = Distributor::with_virtual_nodes(virtual_nodes)?;

    for name in &names {
        dist.add_node(Node::new(name.clone()));
    }
    info!(
        nodes = dist.node_count(),
        replicas = dist.vnode_count(),
        "ring populated"
    );

    let keys: Vec<String> = (0..cli.keys).map(|i| format!("key-{i:05}")).collect();
    let mut owners: BTreeMap<String, Node> = BTreeMap::new();
    for key in &keys {
        let owner = dist.get_node(key).context("ring unexpectedly empty")?;
        owners.insert(key.clone(), owner);
    }

    println!(
        "{} keys across {} nodes ({} virtual replicas each):",
        keys.len(),
        names.len(),
        virtual_nodes
    );
    print_distribution(&owners, keys.len());

    if let Some(name) = cli.remove {
        let node = Node::new(name.clone());
        if !dist.contains(&node) {
            bail!("cannot remove {name}: not a registered node");
        }
        dist.remove_node(&node);

        let mut moved = 0usize;
        let mut after: BTreeMap<String, Node> = BTreeMap::new();
        for key in &keys {
            let owner = match dist.get_node(key) {
                Some(owner) => owner,
                None => bail!("ring drained; nothing left to show"),
            };
            if owners[key] != owner {
                moved += 1;
            }
            after.insert(key.clone(), owner);
        }

        println!();
        println!(
            "removed {name}: {moved}/{} keys moved ({:.1}%)",
            keys.len(),
            100.0 * moved as f64 / keys.len() as f64
        );
        print_distribution(&after, keys.len());
    }

    Ok(())
}

/// Print a per-node key count summary, sorted by node name.
fn print_distribution(owners: &BTreeMap<String, Node>, total: usize) {
    let mut counts: BTreeMap<&Node, usize> = BTreeMap::new();
    for owner in owners.values() {
        *counts.entry(owner).or_default() += 1;
    }

    for (node, count) in counts {
        println!(
            "  {node:<20} {count:>6} keys ({:>5.1}%)",
            100.0 * count as f64 / total as f64
        );
    }
}
