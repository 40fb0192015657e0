use deployer::{cli, ui, DeployConfig, Deployer};
use std::process;
use tracing::{error, info};

fn main() {
    // Parse command line arguments
    let args = cli::parse_args();

    // Initialize logging
    init_logging(&args);

    // Load configuration, flags override the config file
    let config = match DeployConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            ui::print_status("✗", &format!("Invalid configuration: {}", e), ui::StatusType::Error);
            error!("Invalid configuration: {}", e);
            process::exit(e.exit_code());
        }
    };

    ui::print_banner(env!("CARGO_PKG_VERSION"), &config.params.name);
    ui::print_config_summary(&config);

    let deployer = Deployer::new(config);
    match deployer.run() {
        Ok(summary) => {
            ui::print_deploy_summary(&summary);
            ui::print_status("✓", &format!("Bridgechain written to {}", summary.destination.display()), ui::StatusType::Success);
            ui::print_status("!", "delegates.json and genesisWallet.json hold secrets, keep them private", ui::StatusType::Warning);
            info!(nethash = %summary.nethash, "bridgechain deployed");
        }
        Err(e) => {
            ui::print_status("✗", &format!("Deploy failed: {}", e), ui::StatusType::Error);
            error!("Deploy failed: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn init_logging(args: &cli::Args) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
