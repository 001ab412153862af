//! Canonical bill status derivation from the event timeline.
//!
//! Classification looks only at the most recent event and matches its
//! free-text name against an ordered keyword table. The Sejm process is
//! assumed monotonic, so "last event wins" is the policy here — a known
//! limitation, since a later-dated clerical correction would override a
//! higher-signal stage. Reproduced deliberately; do not "fix" by scoring
//! earlier events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stages::Event;

/// The single current-state label assigned to a bill.
///
/// Variants are listed in legislative progression order. The pre-Sejm
/// states (`CoCreation` through `Consultation`) are assigned elsewhere in
/// the system (RCL-sourced drafts) and are never produced by [`classify`],
/// which only sees bills already in the Sejm pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    CoCreation,
    Preconsultation,
    Draft,
    Consultation,
    Submitted,
    FirstReading,
    Committee,
    SecondReading,
    ThirdReading,
    Senate,
    Presidential,
    Published,
    Rejected,
}

impl BillStatus {
    /// Stable snake_case wire form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::CoCreation => "co_creation",
            BillStatus::Preconsultation => "preconsultation",
            BillStatus::Draft => "draft",
            BillStatus::Consultation => "consultation",
            BillStatus::Submitted => "submitted",
            BillStatus::FirstReading => "first_reading",
            BillStatus::Committee => "committee",
            BillStatus::SecondReading => "second_reading",
            BillStatus::ThirdReading => "third_reading",
            BillStatus::Senate => "senate",
            BillStatus::Presidential => "presidential",
            BillStatus::Published => "published",
            BillStatus::Rejected => "rejected",
        }
    }

    /// Polish display label for list views and bill cards.
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::CoCreation => "Współtworzenie",
            BillStatus::Preconsultation => "Prekonsultacje",
            BillStatus::Draft => "Projekt",
            BillStatus::Consultation => "Konsultacje",
            BillStatus::Submitted => "Złożony w Sejmie",
            BillStatus::FirstReading => "I czytanie",
            BillStatus::Committee => "Prace w komisjach",
            BillStatus::SecondReading => "II czytanie",
            BillStatus::ThirdReading => "III czytanie",
            BillStatus::Senate => "Senat",
            BillStatus::Presidential => "U Prezydenta",
            BillStatus::Published => "Opublikowana",
            BillStatus::Rejected => "Odrzucony",
        }
    }

    fn all() -> &'static [BillStatus] {
        &[
            BillStatus::CoCreation,
            BillStatus::Preconsultation,
            BillStatus::Draft,
            BillStatus::Consultation,
            BillStatus::Submitted,
            BillStatus::FirstReading,
            BillStatus::Committee,
            BillStatus::SecondReading,
            BillStatus::ThirdReading,
            BillStatus::Senate,
            BillStatus::Presidential,
            BillStatus::Published,
            BillStatus::Rejected,
        ]
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bill status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for BillStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BillStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Ordered classification rules: outer slice is OR across alternatives,
/// inner slice is AND across required substrings. Evaluated top to bottom,
/// first match wins, so order is load-bearing — "iii czytanie" and
/// "ii czytanie" MUST be tried before "i czytanie", which matches inside
/// both of them.
///
/// Keywords are lowercase Polish stems matched by plain substring against
/// the lowercased event name. No diacritic folding: the list was tuned
/// against the exact forms the Sejm API emits.
const RULES: &[(&[&[&str]], BillStatus)] = &[
    (&[&["odrzuc"], &["wycof"]], BillStatus::Rejected),
    (
        &[&["publikacja"], &["dziennik ustaw"], &["ogłosz"]],
        BillStatus::Published,
    ),
    (&[&["prezydent"], &["podpis"]], BillStatus::Presidential),
    (
        &[&["stanowisko senatu"], &["przekazan", "senat"]],
        BillStatus::Senate,
    ),
    (
        &[&["iii czytanie"], &["trzecie czytanie"], &["głosowanie"]],
        BillStatus::ThirdReading,
    ),
    (
        &[&["ii czytanie"], &["drugie czytanie"]],
        BillStatus::SecondReading,
    ),
    (&[&["komisj"], &["sprawozdanie"]], BillStatus::Committee),
    (
        &[&["i czytanie"], &["pierwsze czytanie"], &["skierowano do"]],
        BillStatus::FirstReading,
    ),
];

/// Derive the canonical status from a chronologically sorted event list.
///
/// Only the last (most recent) event is inspected; an empty list and an
/// unrecognised event name both fall back to [`BillStatus::Submitted`].
/// Never fails.
pub fn classify(sorted_events: &[Event]) -> BillStatus {
    let Some(last) = sorted_events.last() else {
        return BillStatus::Submitted;
    };
    let text = last.event_type.to_lowercase();
    for (alternatives, status) in RULES {
        let hit = alternatives
            .iter()
            .any(|required| required.iter().all(|needle| text.contains(needle)));
        if hit {
            return *status;
        }
    }
    BillStatus::Submitted
}
