//! User interface utilities for console output

use crate::config::DeployConfig;
use crate::deployer::DeploySummary;

/// ANSI color codes for terminal output
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
}

/// Print startup banner
pub fn print_banner(version: &str, name: &str) {
    println!();
    println!("{}╔══════════════════════════════════════════════════════════════╗{}", colors::BRIGHT_CYAN, colors::RESET);
    println!("{}║{}                                                              {}║{}", colors::BRIGHT_CYAN, colors::RESET, colors::BRIGHT_CYAN, colors::RESET);
    println!("{}║{}          {}BRIDGECHAIN DEPLOYER v{:<10}{}                    {}║{}",
        colors::BRIGHT_CYAN, colors::RESET, colors::BOLD, version, colors::RESET, colors::BRIGHT_CYAN, colors::RESET);
    println!("{}║{}                                                              {}║{}", colors::BRIGHT_CYAN, colors::RESET, colors::BRIGHT_CYAN, colors::RESET);
    println!("{}║{}  Chain: {}{:<52}{}  {}║{}",
        colors::BRIGHT_CYAN, colors::RESET, colors::BRIGHT_GREEN, name, colors::RESET, colors::BRIGHT_CYAN, colors::RESET);
    println!("{}║{}                                                              {}║{}", colors::BRIGHT_CYAN, colors::RESET, colors::BRIGHT_CYAN, colors::RESET);
    println!("{}╚══════════════════════════════════════════════════════════════╝{}", colors::BRIGHT_CYAN, colors::RESET);
    println!();
}

/// Print status line with icon and color
pub fn print_status(icon: &str, message: &str, status: StatusType) {
    let color = match status {
        StatusType::Success => colors::BRIGHT_GREEN,
        StatusType::Warning => colors::BRIGHT_YELLOW,
        StatusType::Error => colors::BRIGHT_RED,
    };

    println!("{}[{}]{} {}{}{}", color, icon, colors::RESET, color, message, colors::RESET);
}

/// Status types for colored output
#[derive(Debug, Clone, Copy)]
pub enum StatusType {
    Success,
    Warning,
    Error,
}

/// Print a section header
pub fn print_section(title: &str) {
    println!();
    println!("{}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{}", colors::DIM, colors::RESET);
    println!("{}  {}{}{}", colors::BRIGHT_CYAN, colors::BOLD, title, colors::RESET);
    println!("{}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{}", colors::DIM, colors::RESET);
    println!();
}

/// Print key-value pair in a formatted way
pub fn print_kv(key: &str, value: &str) {
    println!("  {}{}:{}{} {}{}{}",
        colors::BRIGHT_WHITE, key, colors::RESET, colors::DIM,
        colors::BRIGHT_CYAN, value, colors::RESET);
}

/// Print configuration summary. Database credentials are left out.
pub fn print_config_summary(config: &DeployConfig) {
    let params = &config.params;
    print_section("Configuration");

    print_kv("Base Network", &params.network.to_string());
    print_kv("Core Path", &config.core_path.display().to_string());
    print_kv("Destination", &config.destination.display().to_string());
    print_kv("Overwrite", if config.overwrite { "Yes" } else { "No" });
    print_kv("Token", &format!("{} ({})", params.token, params.symbol));
    print_kv("Forgers", &params.forgers.to_string());
    print_kv("Block Time", &format!("{}s", params.block_time));
    print_kv("Premine", &params.total_premine.to_string());
    print_kv("Rewards", &format!("{} from height {}", params.reward_per_block, params.reward_height));
    print_kv("Dynamic Fees", if params.dynamic_fees.enabled { "Enabled" } else { "Disabled" });
    print_kv("P2P Port", &params.bindings.p2p_port.to_string());
    print_kv("API Port", &params.bindings.api_port.to_string());
}

/// Print the result of a successful run
pub fn print_deploy_summary(summary: &DeploySummary) {
    print_section("Genesis");

    print_kv("Nethash", &summary.nethash);
    print_kv("Block Id", &summary.block_id);
    print_kv("Genesis Address", &summary.genesis_address);
    print_kv("Delegates", &summary.delegates.to_string());
    print_kv("Transactions", &summary.transactions.to_string());

    print_section("Artifacts");
    for path in &summary.artifacts {
        let shown = path.strip_prefix(&summary.destination).unwrap_or(path);
        println!("  {}[✓]{} {}", colors::BRIGHT_GREEN, colors::RESET, shown.display());
    }
    println!();
}
