use arrayref::array_ref;
use chrono::Utc;

use crate::{
    error::{RaffleError, Result},
    state::Ticket,
};

pub const ENTROPY_LEN: usize = 32;

/// Source of raw random bytes for winner draws.
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8; ENTROPY_LEN]) -> Result<()>;
}

/// Entropy from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8; ENTROPY_LEN]) -> Result<()> {
        getrandom::getrandom(buf).map_err(|e| RaffleError::Entropy(e.to_string()))
    }
}

/// Picks the content of one ticket, each with probability `1/n`.
/// An empty slice yields the empty string.
pub fn select_winner(tickets: &[Ticket], entropy: &dyn EntropySource) -> Result<String> {
    if tickets.is_empty() {
        return Ok(String::new());
    }
    let index = draw_index(tickets.len() as u64, entropy)?;
    Ok(tickets[index as usize].content.clone())
}

/// Maps fresh entropy onto `0..range` by rejection sampling. Rejected values are
/// discarded and a new block is drawn, so every index is equally likely.
pub fn draw_index(range: u64, entropy: &dyn EntropySource) -> Result<u64> {
    if range == 0 {
        return Err(RaffleError::Entropy("cannot draw from an empty range".to_string()));
    }

    // If range is a power of 2, a mask is already unbiased
    if range.is_power_of_two() {
        return Ok(next_word(entropy)? & (range - 1));
    }

    // Largest multiple of range that fits in u64
    let threshold = u64::MAX - (u64::MAX % range);
    loop {
        let value = next_word(entropy)?;
        if value < threshold {
            return Ok(value % range);
        }
    }
}

/// Draws one 32-byte block and folds it into a single word.
fn next_word(entropy: &dyn EntropySource) -> Result<u64> {
    let mut data = [0u8; ENTROPY_LEN];
    entropy.fill(&mut data)?;

    let chunk1 = u64::from_le_bytes(*array_ref![data, 0, 8]);
    let chunk2 = u64::from_le_bytes(*array_ref![data, 8, 8]);
    let chunk3 = u64::from_le_bytes(*array_ref![data, 16, 8]);
    let chunk4 = u64::from_le_bytes(*array_ref![data, 24, 8]);
    let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;

    let mut mixed = mix(chunk1, timestamp);
    mixed = mix(mixed, chunk2);
    mixed = mix(mixed, chunk3);
    Ok(mix(mixed, chunk4))
}

/// splitmix64 finaliser over `a + b`.
fn mix(a: u64, b: u64) -> u64 {
    let mut z = a.wrapping_add(b);

    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
