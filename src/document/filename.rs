use chrono::NaiveDateTime;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use uuid::Uuid;

use super::docx::DOCX_EXTENSION;

static SUFFIXES: OnceLock<SuffixGenerator> = OnceLock::new();

/// `translation_YYYYMMDD_HHMMSS_<8 hex>.docx`
pub fn generate_document_name(now: &NaiveDateTime) -> String {
    let suffix = SUFFIXES.get_or_init(SuffixGenerator::new).next_suffix();
    format!(
        "translation_{}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        suffix,
        DOCX_EXTENSION
    )
}

/// Filename without its extension
pub fn document_id(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
}

/// Keyed permutation of a sequence counter.
///
/// The keys are random per instance and never leave it. Every step of
/// `permute` is a bijection on `u32`, so the first 2^32 suffixes of one
/// generator never repeat.
struct SuffixGenerator {
    pre_xor: u32,
    /// Always odd
    multiplier: u32,
    post_xor: u32,
    sequence: AtomicU32,
}

impl SuffixGenerator {
    fn new() -> Self {
        // The low 32 bits of a v4 uuid carry no version or variant bits
        let key = || Uuid::new_v4().as_u128() as u32;
        Self {
            pre_xor: key(),
            multiplier: key() | 1,
            post_xor: key(),
            sequence: AtomicU32::new(0),
        }
    }

    fn next_suffix(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{:08x}", self.permute(seq))
    }

    fn permute(&self, seq: u32) -> u32 {
        mix32((seq ^ self.pre_xor).wrapping_mul(self.multiplier)) ^ self.post_xor
    }
}

/// murmur3 finalizer
fn mix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
