//! 25-word mnemonic encoding of a 32-byte key seed.
//!
//! The first 24 words carry the seed as little-endian 11-bit groups drawn
//! from the BIP-39 English list. The final word is a checksum: the first
//! 11-bit group of the first two bytes of SHA-512/256(seed).

use bip39::Language;
use sha2::{Digest, Sha512_256};

use crate::blockchain::wallet::{WalletError, WalletResult};

/// Number of words in a key mnemonic.
pub const MNEMONIC_WORDS: usize = 25;

const KEY_LEN: usize = 32;
const BITS_PER_WORD: u32 = 11;
const WORD_MASK: u32 = 0x7ff;

/// Encode a seed as a 25-word mnemonic.
pub fn from_key(seed: &[u8; KEY_LEN]) -> String {
    let words = Language::English.word_list();
    let mut phrase: Vec<&str> = to_u11(seed).into_iter().map(|i| words[i as usize]).collect();
    phrase.push(words[checksum_index(seed) as usize]);
    phrase.join(" ")
}

/// Recover the 32-byte seed from a 25-word mnemonic.
pub fn to_key(phrase: &str) -> WalletResult<[u8; KEY_LEN]> {
    let words: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
    if words.len() != MNEMONIC_WORDS {
        return Err(WalletError::MnemonicLength(words.len()));
    }

    let mut indices = Vec::with_capacity(MNEMONIC_WORDS);
    for (position, word) in words.iter().enumerate() {
        let index = Language::English
            .find_word(word)
            .ok_or(WalletError::UnknownWord { position: position + 1 })?;
        indices.push(index as u32);
    }

    let checksum_word = indices.pop().unwrap_or_default();
    let mut bytes = from_u11(&indices);

    // 24 words carry 264 bits; the last byte is padding and must be zero.
    if bytes.len() != KEY_LEN + 1 || bytes[KEY_LEN] != 0 {
        return Err(WalletError::MnemonicPadding);
    }
    bytes.truncate(KEY_LEN);

    let mut seed = [0u8; KEY_LEN];
    seed.copy_from_slice(&bytes);

    if checksum_index(&seed) != checksum_word {
        return Err(WalletError::MnemonicChecksum);
    }
    Ok(seed)
}

fn checksum_index(seed: &[u8; KEY_LEN]) -> u32 {
    let digest = Sha512_256::digest(seed);
    to_u11(&digest[..2])[0]
}

fn to_u11(bytes: &[u8]) -> Vec<u32> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / BITS_PER_WORD as usize + 1);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &b in bytes {
        buffer |= (b as u32) << bits;
        bits += 8;
        if bits >= BITS_PER_WORD {
            out.push(buffer & WORD_MASK);
            buffer >>= BITS_PER_WORD;
            bits -= BITS_PER_WORD;
        }
    }
    if bits != 0 {
        out.push(buffer & WORD_MASK);
    }
    out
}

fn from_u11(groups: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len() * BITS_PER_WORD as usize / 8 + 1);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &g in groups {
        buffer |= g << bits;
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}
