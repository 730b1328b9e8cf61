//! SHA-512 checksums of release artifacts.

use std::io::{self, Read, Seek};

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use relpub_schema::Checksum;
use sha2::{Digest, Sha512};

use super::artifact::with_rewind;

/// Compute the checksum of everything `reader` yields.
///
/// The reader is consumed once in fixed-size chunks and rewound to the
/// start afterwards, even if reading fails.
pub fn checksum<R: Read + Seek>(reader: &mut R) -> io::Result<Checksum> {
    with_rewind(reader, |r| {
        let digest = sha512(r)?.finalize();
        Ok(Checksum::new(encode(&digest)))
    })
}

/// Feed `reader` into a fresh SHA-512 state and return the state
/// unfinalized, so it can be used as an Ed25519ph prehash.
pub fn sha512<R: Read>(reader: &mut R) -> io::Result<Sha512> {
    let mut hasher = Sha512::new();
    io::copy(reader, &mut hasher)?;
    Ok(hasher)
}

/// Padding-free standard base64, the encoding of checksums and signatures.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::testing::SyntheticArtifact;
    use std::io::Cursor;

    #[test]
    fn checksum_of_empty_input() {
        let mut cursor = Cursor::new(Vec::new());
        let sum = checksum(&mut cursor).unwrap();
        // SHA-512("") in unpadded base64
        assert_eq!(
            sum.as_str(),
            "z4PhNX7vuL3xVChQ1m2AB9Yg5AULVxXcg/SpIdNs6c5H0NE8XYXysP+DGNKHfuwvY7kxvUdBeoGlODJ6+SfaPg"
        );
    }

    #[test]
    fn checksum_is_stable_and_restores_position() {
        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let mut cursor = Cursor::new(data);

        let first = checksum(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 0);
        let second = checksum(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 0);

        assert_eq!(first, second);
        // 64-byte digest -> 86 base64 chars without padding
        assert_eq!(first.as_str().len(), 86);
        assert!(!first.as_str().ends_with('='));
    }

    #[test]
    fn large_input_is_hashed_in_small_reads() {
        const LEN: u64 = 100 * 1024 * 1024;
        let mut artifact = SyntheticArtifact::new(LEN);
        let stats = artifact.stats();

        checksum(&mut artifact).unwrap();

        assert_eq!(stats.bytes(), LEN);
        assert!(stats.largest() <= 64 * 1024, "read {} bytes at once", stats.largest());
        assert_eq!(artifact.stream_position().unwrap(), 0);
    }

    #[test]
    fn last_byte_changes_checksum() {
        let mut a = Cursor::new(b"abcdef".to_vec());
        let mut b = Cursor::new(b"abcdeg".to_vec());
        assert_ne!(checksum(&mut a).unwrap(), checksum(&mut b).unwrap());
    }
}
