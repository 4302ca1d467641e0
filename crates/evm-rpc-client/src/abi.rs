//! Fixed-shape ABI codec
//!
//! The locker surface is a handful of functions with static argument lists
//! and (at most) one dynamic `bytes32[]` return, so this codec covers
//! exactly that: 4-byte selector plus 32-byte words. Anything that does not
//! match the declared shape is a `MalformedResponse`, never a coercion.

use lockboard_core::{Address, GatewayError, LockId, TokenUnits};

/// One ABI word
pub type Word = [u8; 32];

/// Encode a call: selector followed by statically encoded argument words.
pub fn encode_call(selector: [u8; 4], args: &[Word]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 32 * args.len());
    out.extend_from_slice(&selector);
    for word in args {
        out.extend_from_slice(word);
    }
    out
}

/// Left-pad a 20-byte address into a word.
pub fn word_from_address(addr: &Address) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&addr.to_bytes());
    word
}

/// Big-endian uint word from a u128 amount.
pub fn word_from_amount(amount: TokenUnits) -> Word {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&amount.to_be_bytes());
    word
}

pub fn word_from_lock_id(lock_id: &LockId) -> Word {
    lock_id.to_bytes()
}

/// Decode a `0x…` hex string into raw bytes.
pub fn decode_hex(data: &str) -> Result<Vec<u8>, GatewayError> {
    let body = data
        .strip_prefix("0x")
        .ok_or_else(|| GatewayError::MalformedResponse {
            message: format!("expected 0x-prefixed hex, got {:.20}", data),
        })?;

    hex::decode(body).map_err(|e| GatewayError::MalformedResponse {
        message: format!("invalid hex in response: {}", e),
    })
}

/// Split return data into words. Ragged lengths are malformed.
pub fn decode_words(data: &[u8]) -> Result<Vec<Word>, GatewayError> {
    if data.len() % 32 != 0 {
        return Err(GatewayError::MalformedResponse {
            message: format!("return data length {} is not word-aligned", data.len()),
        });
    }

    Ok(data
        .chunks_exact(32)
        .map(|chunk| {
            let mut word = [0u8; 32];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

/// Require an exact word count (static tuple returns).
pub fn expect_words(data: &[u8], count: usize) -> Result<Vec<Word>, GatewayError> {
    let words = decode_words(data)?;
    if words.len() != count {
        return Err(GatewayError::MalformedResponse {
            message: format!("expected {} words, got {}", count, words.len()),
        });
    }
    Ok(words)
}

/// Address from a word: the 12 pad bytes must be zero.
pub fn address_from_word(word: &Word) -> Result<Address, GatewayError> {
    if word[..12].iter().any(|&b| b != 0) {
        return Err(GatewayError::MalformedResponse {
            message: "address word has nonzero padding".to_string(),
        });
    }

    Address::parse(&format!("0x{}", hex::encode(&word[12..]))).map_err(|e| {
        GatewayError::MalformedResponse {
            message: format!("invalid address in response: {}", e),
        }
    })
}

/// Amount from a uint256 word. Values above u128 are out of the supported
/// range and reported as malformed rather than truncated.
pub fn amount_from_word(word: &Word) -> Result<TokenUnits, GatewayError> {
    if word[..16].iter().any(|&b| b != 0) {
        return Err(GatewayError::MalformedResponse {
            message: "uint256 value exceeds supported range".to_string(),
        });
    }

    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(TokenUnits::from_be_bytes(low))
}

/// u64 from a uint256 word (timestamps, counters).
pub fn u64_from_word(word: &Word) -> Result<u64, GatewayError> {
    if word[..24].iter().any(|&b| b != 0) {
        return Err(GatewayError::MalformedResponse {
            message: "uint value exceeds u64 range".to_string(),
        });
    }

    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(low))
}

/// Strict Solidity bool: 31 zero bytes then 0 or 1.
pub fn bool_from_word(word: &Word) -> Result<bool, GatewayError> {
    if word[..31].iter().any(|&b| b != 0) || word[31] > 1 {
        return Err(GatewayError::MalformedResponse {
            message: "boolean word is not canonical".to_string(),
        });
    }
    Ok(word[31] == 1)
}

pub fn lock_id_from_word(word: &Word) -> LockId {
    LockId::from_bytes(word)
}

/// Decode a dynamic `bytes32[]` return: offset word, length word, then the
/// elements.
pub fn decode_lock_id_array(data: &[u8]) -> Result<Vec<LockId>, GatewayError> {
    let words = decode_words(data)?;
    if words.len() < 2 {
        return Err(GatewayError::MalformedResponse {
            message: format!(
                "dynamic array needs offset and length words, got {}",
                words.len()
            ),
        });
    }

    let offset = u64_from_word(&words[0])? as usize;
    if offset % 32 != 0 || offset / 32 >= words.len() {
        return Err(GatewayError::MalformedResponse {
            message: format!("dynamic array offset {} out of range", offset),
        });
    }

    let length_index = offset / 32;
    let length = u64_from_word(&words[length_index])? as usize;
    let first = length_index + 1;

    if words.len() < first + length {
        return Err(GatewayError::MalformedResponse {
            message: format!(
                "dynamic array claims {} elements but data holds {}",
                length,
                words.len() - first
            ),
        });
    }

    Ok(words[first..first + length]
        .iter()
        .map(lock_id_from_word)
        .collect())
}

/// Parse a JSON-RPC quantity (`0x…` hex number).
pub fn quantity_from_hex(value: &str) -> Result<u64, GatewayError> {
    let body = value
        .strip_prefix("0x")
        .ok_or_else(|| GatewayError::MalformedResponse {
            message: format!("expected hex quantity, got {:.20}", value),
        })?;

    u64::from_str_radix(body, 16).map_err(|e| GatewayError::MalformedResponse {
        message: format!("invalid hex quantity {:.20}: {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_with_tail(tail: &[u8]) -> Word {
        let mut word = [0u8; 32];
        word[32 - tail.len()..].copy_from_slice(tail);
        word
    }

    #[test]
    fn test_encode_call_layout() {
        let addr = Address::parse("0x00000000000000000000000000000000000000aa").unwrap();
        let data = encode_call([0x09, 0x5e, 0xa7, 0xb3], &[word_from_address(&addr)]);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(data[35], 0xaa);
    }

    #[test]
    fn test_amount_word_roundtrip() {
        let amount: TokenUnits = 1_500_000_000_000_000_000;
        let word = word_from_amount(amount);
        assert_eq!(amount_from_word(&word).unwrap(), amount);
    }

    #[test]
    fn test_amount_overflow_is_malformed() {
        let mut word = [0u8; 32];
        word[0] = 1; // beyond u128
        let err = amount_from_word(&word).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse { .. }));
    }

    #[test]
    fn test_bool_word_strict() {
        assert!(!bool_from_word(&[0u8; 32]).unwrap());
        assert!(bool_from_word(&word_with_tail(&[1])).unwrap());
        assert!(bool_from_word(&word_with_tail(&[2])).is_err());

        let mut dirty = [0u8; 32];
        dirty[0] = 0xff;
        assert!(bool_from_word(&dirty).is_err());
    }

    #[test]
    fn test_expect_words_short_tuple() {
        let data = vec![0u8; 3 * 32];
        let err = expect_words(&data, 7).unwrap_err();
        assert!(err.to_string().contains("expected 7 words, got 3"));
    }

    #[test]
    fn test_ragged_data_is_malformed() {
        let data = vec![0u8; 33];
        assert!(decode_words(&data).is_err());
    }

    #[test]
    fn test_decode_lock_id_array() {
        // offset 0x20, length 2, then two ids
        let mut data = Vec::new();
        data.extend_from_slice(&word_with_tail(&[0x20]));
        data.extend_from_slice(&word_with_tail(&[2]));
        data.extend_from_slice(&word_with_tail(&[0x01]));
        data.extend_from_slice(&word_with_tail(&[0x02]));

        let ids = decode_lock_id_array(&data).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids[0].as_str().ends_with("01"));
        assert!(ids[1].as_str().ends_with("02"));
    }

    #[test]
    fn test_decode_lock_id_array_truncated() {
        // claims 3 elements, provides 1
        let mut data = Vec::new();
        data.extend_from_slice(&word_with_tail(&[0x20]));
        data.extend_from_slice(&word_with_tail(&[3]));
        data.extend_from_slice(&word_with_tail(&[0x01]));

        let err = decode_lock_id_array(&data).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse { .. }));
    }

    #[test]
    fn test_quantity_from_hex() {
        assert_eq!(quantity_from_hex("0x0").unwrap(), 0);
        assert_eq!(quantity_from_hex("0x68b2a9f1").unwrap(), 0x68b2a9f1);
        assert!(quantity_from_hex("1234").is_err());
    }
}
