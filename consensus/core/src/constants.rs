/// Block version used by the genesis block
pub const BLOCK_VERSION: u32 = 0;

/// Transaction serialization version
pub const TRANSACTION_VERSION: u8 = 2;

/// Marker byte that opens every serialized transaction
pub const TRANSACTION_HEADER: u8 = 0xff;

/// Type group of the core transaction types
pub const CORE_TYPE_GROUP: u32 = 1;

/// Height of the genesis block
pub const GENESIS_HEIGHT: u32 = 1;

/// Genesis block timestamp, in seconds since the network epoch
pub const GENESIS_TIMESTAMP: u32 = 0;

/// Upper bound of a serialized block, in bytes
pub const MAX_BLOCK_BYTES: u64 = 2_097_152;

/// Payload bytes budgeted per transaction slot (integer division intended)
pub const PAYLOAD_BYTES_PER_TRANSACTION: u64 = MAX_BLOCK_BYTES / 50;

/// Length of a compressed secp256k1 public key
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// Length of a decoded address: prefix byte + RIPEMD-160 digest
pub const ADDRESS_LENGTH: usize = 21;

/// Vote asset marker for adding a vote
pub const VOTE_ADD: u8 = 0x01;

/// Vote asset marker for removing a vote
pub const VOTE_REMOVE: u8 = 0x00;
