pub mod address;
pub mod errors;
pub mod identity;
pub mod keys;
pub mod signer;
pub mod tx_builder;

pub use address::Address;
pub use errors::WalletError;
pub use identity::{derive_identities, GenesisIdentities, Wallet};
pub use keys::Keys;
pub use signer::Signer;
pub use tx_builder::TxBuilder;
