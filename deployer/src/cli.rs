use clap::Parser;
use consensus_core::network::NetworkType;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "bridgechain")]
#[command(about = "Generates genesis and network configuration for a new bridgechain", long_about = None)]
pub struct Args {
    /// Path to a TOML deploy configuration ([deploy] and [params] tables)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Core checkout containing the base network templates
    #[arg(long)]
    pub core_path: Option<PathBuf>,

    /// Output directory for the generated network (defaults to ./<name>)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Replace the destination if it already exists
    #[arg(long)]
    pub overwrite: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Bridgechain name
    #[arg(long)]
    pub name: Option<String>,

    /// Base network (mainnet, testnet, devnet)
    #[arg(short, long)]
    pub network: Option<NetworkType>,

    #[arg(long)]
    pub token: Option<String>,

    #[arg(long)]
    pub symbol: Option<String>,

    #[arg(long)]
    pub explorer: Option<String>,

    /// Address prefix byte
    #[arg(long)]
    pub pub_key_hash: Option<u8>,

    /// WIF prefix byte
    #[arg(long)]
    pub wif: Option<u8>,

    /// Number of forging delegates
    #[arg(long)]
    pub forgers: Option<u32>,

    /// Block time in seconds
    #[arg(long)]
    pub block_time: Option<u32>,

    #[arg(long)]
    pub transactions_per_block: Option<u32>,

    #[arg(long)]
    pub vendor_field_length: Option<u32>,

    /// Network epoch (e.g. 2019-01-01T00:00:00.000Z)
    #[arg(long)]
    pub epoch: Option<String>,

    /// Total premine in the smallest token unit (decimal digits)
    #[arg(long)]
    pub premine: Option<String>,

    /// Height at which block rewards start
    #[arg(long)]
    pub reward_height: Option<u64>,

    #[arg(long)]
    pub reward_per_block: Option<u64>,

    #[arg(long)]
    pub fee_transfer: Option<u64>,

    #[arg(long)]
    pub fee_second_signature: Option<u64>,

    #[arg(long)]
    pub fee_delegate_registration: Option<u64>,

    #[arg(long)]
    pub fee_vote: Option<u64>,

    #[arg(long)]
    pub fee_multi_signature: Option<u64>,

    #[arg(long)]
    pub fee_ipfs: Option<u64>,

    #[arg(long)]
    pub fee_multi_payment: Option<u64>,

    #[arg(long)]
    pub fee_delegate_resignation: Option<u64>,

    /// Enable dynamic fees in the transaction pool
    #[arg(long, conflicts_with = "no_dynamic_fees")]
    pub dynamic_fees: bool,

    /// Disable dynamic fees in the transaction pool
    #[arg(long)]
    pub no_dynamic_fees: bool,

    #[arg(long)]
    pub min_fee_pool: Option<u64>,

    #[arg(long)]
    pub min_fee_broadcast: Option<u64>,

    #[arg(long)]
    pub addon_bytes_transfer: Option<u64>,

    #[arg(long)]
    pub addon_bytes_second_signature: Option<u64>,

    #[arg(long)]
    pub addon_bytes_delegate_registration: Option<u64>,

    #[arg(long)]
    pub addon_bytes_vote: Option<u64>,

    #[arg(long)]
    pub addon_bytes_multi_signature: Option<u64>,

    #[arg(long)]
    pub addon_bytes_ipfs: Option<u64>,

    #[arg(long)]
    pub addon_bytes_multi_payment: Option<u64>,

    #[arg(long)]
    pub addon_bytes_delegate_resignation: Option<u64>,

    /// P2P listen port
    #[arg(long)]
    pub p2p_port: Option<u16>,

    /// Public API port
    #[arg(long)]
    pub api_port: Option<u16>,

    #[arg(long)]
    pub webhook_port: Option<u16>,

    #[arg(long)]
    pub json_rpc_port: Option<u16>,

    #[arg(long)]
    pub db_host: Option<String>,

    #[arg(long)]
    pub db_port: Option<u16>,

    #[arg(long)]
    pub db_username: Option<String>,

    #[arg(long)]
    pub db_password: Option<String>,

    #[arg(long)]
    pub db_name: Option<String>,

    /// Seed peer IPs (comma-separated)
    #[arg(long)]
    pub peers: Option<String>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "bridgechain",
            "--core-path",
            "/opt/core",
            "--network",
            "devnet",
            "--forgers",
            "25",
            "--premine",
            "1000",
            "--no-dynamic-fees",
            "--peers",
            "10.0.0.1, 10.0.0.2",
        ])
        .unwrap();
        assert_eq!(args.core_path, Some(PathBuf::from("/opt/core")));
        assert_eq!(args.network, Some(NetworkType::Devnet));
        assert_eq!(args.forgers, Some(25));
        assert_eq!(args.premine.as_deref(), Some("1000"));
        assert!(args.no_dynamic_fees);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_conflicting_dynamic_fee_flags() {
        assert!(Args::try_parse_from(["bridgechain", "--dynamic-fees", "--no-dynamic-fees"]).is_err());
    }

    #[test]
    fn test_unknown_network_is_rejected() {
        assert!(Args::try_parse_from(["bridgechain", "--network", "moonnet"]).is_err());
    }
}
