use ctk_core::{Address, Result};
use sha3::{Digest, Keccak256};

/// Identity used to authorize state-changing calls.
///
/// The gateway sends the digest of every call alongside the signature this
/// returns; key custody stays outside this crate.
pub trait Signer: Send + Sync {
    fn address(&self) -> Address;

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>>;
}

/// Account held unlocked by the gateway node itself. Produces an empty
/// signature; the node signs on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayAccount {
    address: Address,
}

impl GatewayAccount {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Signer for GatewayAccount {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_digest(&self, _digest: &[u8; 32]) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Keccak-256 over arbitrary bytes.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}
