//! Legacy address encoding
//!
//! Base58Check: payload prefixed with the network version bytes and sealed
//! with the first four bytes of its double-SHA256. The version bytes come
//! from the selected network's [`Base58Prefixes`], so a testnet address does
//! not decode on mainnet.

use crate::chain::Base58Prefixes;
use crate::crypto::double_sha256;
use thiserror::Error;

/// Errors from decoding an address string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid base58 encoding")]
    BadBase58,
    #[error("checksum mismatch")]
    BadChecksum,
    #[error("payload length is wrong for an address")]
    BadLength,
    #[error("version byte does not belong to this network")]
    WrongNetwork,
}

/// The two legacy address kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    /// Pay to the hash of a public key.
    PubkeyHash,
    /// Pay to the hash of a redeem script.
    ScriptHash,
}

/// Encode `prefix || payload || checksum` in base58.
pub fn encode_check(prefix: &[u8], payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(prefix.len() + payload.len() + 4);
    data.extend_from_slice(prefix);
    data.extend_from_slice(payload);
    let checksum = double_sha256(&data);
    data.extend_from_slice(&checksum.as_bytes()[..4]);
    bs58::encode(data).into_string()
}

/// Decode a base58check string, returning the version-prefixed payload with
/// the checksum verified and stripped.
pub fn decode_check(encoded: &str) -> Result<Vec<u8>, AddressError> {
    let data = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| AddressError::BadBase58)?;
    if data.len() < 4 {
        return Err(AddressError::BadLength);
    }
    let (payload, checksum) = data.split_at(data.len() - 4);
    let expected = double_sha256(payload);
    if checksum != &expected.as_bytes()[..4] {
        return Err(AddressError::BadChecksum);
    }
    Ok(payload.to_vec())
}

/// Render a 20-byte hash as an address on the given network.
pub fn encode_address(prefixes: &Base58Prefixes, kind: AddressType, hash: &[u8; 20]) -> String {
    let version = match kind {
        AddressType::PubkeyHash => prefixes.pubkey_address,
        AddressType::ScriptHash => prefixes.script_address,
    };
    encode_check(&[version], hash)
}

/// Parse an address, checking it belongs to the given network.
pub fn decode_address(
    prefixes: &Base58Prefixes,
    address: &str,
) -> Result<(AddressType, [u8; 20]), AddressError> {
    let payload = decode_check(address)?;
    if payload.len() != 21 {
        return Err(AddressError::BadLength);
    }
    let kind = if payload[0] == prefixes.pubkey_address {
        AddressType::PubkeyHash
    } else if payload[0] == prefixes.script_address {
        AddressType::ScriptHash
    } else {
        return Err(AddressError::WrongNetwork);
    };
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);
    Ok((kind, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{for_network, Network};

    fn prefixes(network: Network) -> Base58Prefixes {
        for_network(network).base58_prefixes
    }

    #[test]
    fn test_address_roundtrip() {
        let main = prefixes(Network::Main);
        let hash = [0x5a; 20];
        for kind in [AddressType::PubkeyHash, AddressType::ScriptHash] {
            let address = encode_address(&main, kind, &hash);
            assert_eq!(decode_address(&main, &address).unwrap(), (kind, hash));
        }
    }

    #[test]
    fn test_main_pubkey_addresses_start_with_one() {
        // Version byte zero maps to the base58 digit '1'.
        let main = prefixes(Network::Main);
        let address = encode_address(&main, AddressType::PubkeyHash, &[0x11; 20]);
        assert!(address.starts_with('1'));
    }

    #[test]
    fn test_corruption_is_detected() {
        let main = prefixes(Network::Main);
        let address = encode_address(&main, AddressType::PubkeyHash, &[0x22; 20]);

        let mut corrupted = address.clone().into_bytes();
        let last = corrupted.len() - 1;
        corrupted[last] = if corrupted[last] == b'2' { b'3' } else { b'2' };
        let corrupted = String::from_utf8(corrupted).unwrap();
        assert!(matches!(
            decode_address(&main, &corrupted),
            Err(AddressError::BadChecksum | AddressError::BadBase58)
        ));

        assert_eq!(
            decode_address(&main, "not+base58"),
            Err(AddressError::BadBase58)
        );
    }

    #[test]
    fn test_network_prefixes_do_not_cross() {
        let main = prefixes(Network::Main);
        let test = prefixes(Network::Test);
        let address = encode_address(&test, AddressType::PubkeyHash, &[0x33; 20]);
        assert_eq!(
            decode_address(&main, &address),
            Err(AddressError::WrongNetwork)
        );
        assert!(decode_address(&test, &address).is_ok());
    }

    #[test]
    fn test_extended_key_prefix_roundtrip() {
        let main = prefixes(Network::Main);
        let payload = [0xcd; 74];
        let encoded = encode_check(&main.ext_public_key, &payload);
        let decoded = decode_check(&encoded).unwrap();
        assert_eq!(&decoded[..4], &main.ext_public_key);
        assert_eq!(&decoded[4..], &payload);
    }
}
