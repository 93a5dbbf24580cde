//! Benchmark workloads for the Bril runtime.
//!
//! - [`array_profile`]: a deterministic mix of array requests shaped like
//!   the allocations compiled benchmark programs make
//! - [`float_samples`]: deterministic floats across many magnitudes
//! - [`run_profile`]: allocate and free one profile against an allocator

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bril_rt_alloc::{AllocError, ArrayAllocator, Backend};

/// Element widths compiled programs use: bool, int/float/pointer, and a
/// few wider struct-like records.
pub const ELEMENT_WIDTHS: [i64; 5] = [1, 8, 8, 16, 24];

fn lcg(state: u64) -> u64 {
    state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// Generate `n` `(length, element_width)` requests.
///
/// Most arrays are short; roughly one in sixteen is up to 64K elements
/// long, and one in eight is empty.
pub fn array_profile(seed: u64, n: usize) -> Vec<(i64, i64)> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = lcg(state);
            let bits = state >> 33;
            let width = ELEMENT_WIDTHS[(bits % ELEMENT_WIDTHS.len() as u64) as usize];
            let length = match bits % 16 {
                0 => (bits >> 4) % 65_536,
                1 | 2 => 0,
                _ => (bits >> 4) % 64,
            };
            (length as i64, width)
        })
        .collect()
}

/// Generate `n` floats spread over `1e-20..1e25` in both signs.
pub fn float_samples(seed: u64, n: usize) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = lcg(state);
            let mantissa = (state >> 11) as f64 / (1u64 << 53) as f64;
            let exponent = ((state >> 3) % 46) as i32 - 20;
            let sign = if state & 1 == 0 { 1.0 } else { -1.0 };
            sign * mantissa * 10f64.powi(exponent)
        })
        .collect()
}

/// Allocate every request in `profile`, then free them in reverse order.
///
/// Returns the number of element bytes handed out.
pub fn run_profile<B: Backend>(
    alloc: &ArrayAllocator<B>,
    profile: &[(i64, i64)],
) -> Result<u64, AllocError> {
    let mut live = Vec::with_capacity(profile.len());
    let mut bytes = 0u64;
    for &(length, width) in profile {
        live.push(alloc.allocate_buffer(length, width)?);
        bytes += (length * width) as u64;
    }
    while let Some(buf) = live.pop() {
        buf.free()?;
    }
    Ok(bytes)
}
