//! Fragment generators.
//!
//! Both generators are pure: no I/O, deterministic output order.

use crate::domain::FragmentStrategy;
use crate::error::AppError;

/// Resolve a strategy to its concrete fragment list.
pub fn fragments_for(strategy: &FragmentStrategy) -> Result<Vec<String>, AppError> {
    match strategy {
        FragmentStrategy::Product { outer, inner } => Ok(product(outer, inner)),
        FragmentStrategy::Stepped { start, step } => stepped(*start, *step),
        FragmentStrategy::List { values } => Ok(values.clone()),
    }
}

/// Cartesian product `outer × inner`, outer-major.
///
/// Duplicates in `inner` are kept, so the same fragment can be emitted more than once.
pub fn product(outer: &[char], inner: &[char]) -> Vec<String> {
    let mut out = Vec::with_capacity(outer.len() * inner.len());
    for &first in outer {
        for &second in inner {
            let mut fragment = String::with_capacity(2);
            fragment.push(first);
            fragment.push(second);
            out.push(fragment);
        }
    }
    out
}

/// Single-letter fragments from `start`, moving `step` code points at a time.
///
/// The band is `A..=Z` for an uppercase start and `a..=z` for a lowercase one.
/// The last value inside the band is included; generation stops once the next value
/// would leave it (above the top for positive steps, below the bottom for negative).
pub fn stepped(start: char, step: i32) -> Result<Vec<String>, AppError> {
    if step == 0 {
        return Err(AppError::config("Stepped fragments need a non-zero step."));
    }
    let (lo, hi) = if start.is_ascii_uppercase() {
        ('A' as i32, 'Z' as i32)
    } else if start.is_ascii_lowercase() {
        ('a' as i32, 'z' as i32)
    } else {
        return Err(AppError::config(format!(
            "Stepped fragments must start at an ASCII letter, got {start:?}."
        )));
    };

    let mut out = Vec::new();
    let mut code = start as i32;
    loop {
        // `code` stays inside lo..=hi, so it is always a valid ASCII letter.
        out.push(char::from(code as u8).to_string());
        let Some(next) = code.checked_add(step) else {
            break;
        };
        if next > hi || next < lo {
            break;
        }
        code = next;
    }
    Ok(out)
}
