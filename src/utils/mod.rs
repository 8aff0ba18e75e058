pub mod time_parser;

use std::fmt::Display;

use tracing::warn;

/// 短码与会话 ID 的字符空间
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 拒绝采样上界：62 * 4，超出的字节丢弃以保证均匀分布
const REJECTION_BOUND: u8 = 248;

/// Generate a random alphanumeric code of exactly `length` characters.
///
/// Characters come from the OS CSPRNG. If the OS source fails the call
/// logs a warning and falls back to the thread-local PRNG; it never fails.
pub fn generate_random_code(length: usize) -> String {
    code_from_source(length, getrandom::fill)
}

pub(crate) fn code_from_source<F, E>(length: usize, mut fill: F) -> String
where
    F: FnMut(&mut [u8]) -> Result<(), E>,
    E: Display,
{
    let mut code = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while code.len() < length {
        if let Err(e) = fill(&mut buf) {
            warn!("Secure random source failed, using fallback generator: {}", e);
            return fallback_code(length);
        }

        for &byte in buf.iter().filter(|b| **b < REJECTION_BOUND) {
            code.push(ALPHABET[(byte % 62) as usize] as char);
            if code.len() == length {
                break;
            }
        }
    }

    code
}

fn fallback_code(length: usize) -> String {
    std::iter::repeat_with(|| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
        .take(length)
        .collect()
}
