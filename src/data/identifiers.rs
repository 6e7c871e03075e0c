//! Identifier canonicalization and run-wide dedup.

use std::collections::HashSet;

use crate::domain::Cnpj;

/// Left-pad 11–13 digit identifiers to 14 digits.
///
/// Returns `None` for degenerate values (`"0"`, `"00"`, empty). Other lengths are
/// passed through unchanged.
pub fn canonicalize(raw: &str) -> Option<Cnpj> {
    let raw = raw.trim();
    let padding = match raw.len() {
        13 => 1,
        12 => 2,
        11 => 3,
        _ => 0,
    };
    if matches!(raw, "" | "0" | "00") {
        return None;
    }
    let mut canonical = "0".repeat(padding);
    canonical.push_str(raw);
    Some(Cnpj::from_canonical(canonical))
}

/// What happened to one raw identifier offered to the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Queued(Cnpj),
    Duplicate(Cnpj),
    Degenerate,
}

/// First-seen-ordered set of canonical identifiers awaiting lookup.
///
/// An identifier is admitted at most once per run, however many sources list it.
#[derive(Debug, Clone, Default)]
pub struct IdentifierQueue {
    seen: HashSet<Cnpj>,
    order: Vec<Cnpj>,
    duplicates: usize,
    degenerate: usize,
}

impl IdentifierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, raw: &str) -> Admission {
        let Some(cnpj) = canonicalize(raw) else {
            self.degenerate += 1;
            return Admission::Degenerate;
        };
        if !self.seen.insert(cnpj.clone()) {
            self.duplicates += 1;
            return Admission::Duplicate(cnpj);
        }
        self.order.push(cnpj.clone());
        Admission::Queued(cnpj)
    }

    pub fn identifiers(&self) -> &[Cnpj] {
        &self.order
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn degenerate(&self) -> usize {
        self.degenerate
    }
}
