//! Ring Settlement - Binary Entry Point
//!
//! Reads a TOML ring description, evaluates it and prints the fills,
//! ring hash and transfer list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ring_settlement::types::encode_transfers;
use ring_settlement::types::rate::{format_rate_opt, ratio};
use ring_settlement::{RingFile, SettlementConfig, Unbounded};

#[derive(Parser)]
#[command(name = "ring-settle")]
#[command(about = "Compute fills and transfers for a ring of orders", long_about = None)]
struct Cli {
    /// Ring description (TOML)
    #[arg(value_name = "FILE")]
    ring: PathBuf,

    /// Override the ring file's wallet split percentage
    #[arg(long, value_name = "PERCENT")]
    wallet_split: Option<u8>,

    /// Print the SSZ-encoded transfer list as hex
    #[arg(long)]
    encode: bool,

    #[arg(long, env = "RING_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(&cli.log_level)?;

    info!("Loading ring from: {:?}", cli.ring);
    let file = RingFile::load(&cli.ring).context("Failed to load ring file")?;

    let config = match cli.wallet_split {
        Some(pct) => SettlementConfig::new(pct).context("Invalid --wallet-split")?,
        None => file.settlement,
    };

    let mut ring = file.into_ring().context("Failed to build ring")?;
    ring.check_orders_valid();
    ring.update_hash();

    let fills = ring
        .calculate_fill_amount_and_fee(&Unbounded)
        .context("Failed to calculate fills")?;
    let transfers = ring
        .transfer_items(&fills, config.wallet_split_percentage)
        .context("Failed to plan transfers")?;

    println!("Ring hash:   0x{}", ring.hash_hex().unwrap_or_default());
    println!("Ring size:   {}", ring.len());
    println!("Cycle rate:  {}", format_rate_opt(fills.rate.as_decimal()));
    println!("Pivot:       {}", fills.pivot);
    println!();

    println!(
        "{:>5} {:>20} {:>20} {:>20} {:>20} {:>12}",
        "order", "fill_amount_s", "fill_amount_b", "split_s", "lrc_fee", "rate"
    );
    for (index, (order, fill)) in ring.orders().iter().zip(fills.iter()).enumerate() {
        println!(
            "{:>5} {:>20} {:>20} {:>20} {:>20} {:>12}",
            index,
            fill.fill_amount_s,
            fill.fill_amount_b,
            fill.split_s,
            fill.fill_amount_lrc_fee,
            format_rate_opt(ratio(order.amount_s, order.amount_b)),
        );
    }
    println!();

    println!("Transfers ({}):", transfers.len());
    for item in &transfers {
        println!(
            "  {} 0x{} -> 0x{} token 0x{}",
            item.amount,
            hex::encode(item.from),
            hex::encode(item.to),
            hex::encode(item.token),
        );
    }

    if cli.encode {
        let bytes = encode_transfers(&transfers).context("Failed to encode transfers")?;
        println!();
        println!("Encoded: 0x{}", hex::encode(bytes));
    }

    Ok(())
}

fn setup_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("Invalid log level")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .context("Failed to initialize tracing")?;
    Ok(())
}
