//! Genesis identities: one genesis wallet plus one wallet per forging
//! delegate, each behind its own freshly generated secret phrase.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::address::Address;
use crate::errors::{WalletError, WalletResult};
use crate::keys::{generate_passphrase, Keys};

/// A secret phrase together with everything derived from it.
///
/// Address and public key are pure functions of the phrase and the network's
/// address prefix.
#[derive(Clone)]
pub struct Wallet {
    passphrase: String,
    keys: Keys,
    address: String,
}

impl Wallet {
    pub fn from_passphrase(passphrase: impl Into<String>, pub_key_hash: u8) -> WalletResult<Self> {
        let passphrase = passphrase.into();
        let keys = Keys::from_passphrase(&passphrase)?;
        let address = Address::from_public_key(keys.public_key(), pub_key_hash);
        Ok(Self { passphrase, keys, address })
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> String {
        self.keys.public_key_hex()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("public_key", &self.public_key())
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Source of fresh secret phrases
pub trait PhraseSource {
    fn next_phrase(&mut self) -> WalletResult<String>;
}

/// Phrases from the operating system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsPhraseSource;

impl PhraseSource for OsPhraseSource {
    fn next_phrase(&mut self) -> WalletResult<String> {
        generate_passphrase()
    }
}

#[derive(Debug, Clone)]
pub struct GenesisIdentities {
    pub genesis: Wallet,
    pub delegates: Vec<Wallet>,
}

/// Generates the genesis wallet and `forgers` delegate wallets from the OS
/// CSPRNG.
pub fn derive_identities(forgers: u32, pub_key_hash: u8) -> WalletResult<GenesisIdentities> {
    derive_identities_with(&mut OsPhraseSource, forgers, pub_key_hash)
}

/// Same as [`derive_identities`] with an explicit phrase source. A repeated
/// phrase means the source is not producing fresh entropy and is fatal.
pub fn derive_identities_with<S: PhraseSource>(source: &mut S, forgers: u32, pub_key_hash: u8) -> WalletResult<GenesisIdentities> {
    let mut seen = HashSet::with_capacity(forgers as usize + 1);
    let mut next_wallet = || -> WalletResult<Wallet> {
        let phrase = source.next_phrase()?;
        if !seen.insert(phrase.clone()) {
            return Err(WalletError::Entropy("phrase source repeated a secret phrase".to_string()));
        }
        Wallet::from_passphrase(phrase, pub_key_hash)
    };

    let genesis = next_wallet()?;
    let delegates = (0..forgers).map(|_| next_wallet()).collect::<WalletResult<Vec<_>>>()?;
    debug!(delegates = delegates.len(), "generated genesis and delegate wallets");
    Ok(GenesisIdentities { genesis, delegates })
}
