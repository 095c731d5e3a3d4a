use rand::rngs::OsRng;
use rand::RngCore;

const TOKEN_BYTES: usize = 20;

/// Mints an opaque bearer token: 20 bytes from the OS CSPRNG, hex-encoded.
pub fn generate() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}
