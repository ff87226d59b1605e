// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alert identifiers: `EMRG_<YYYYmmdd>_<HHMMSS>`, with `_2`, `_3`, ... appended
//! when several alerts are raised within the same second.

use std::sync::Mutex;

use chrono::NaiveDateTime;

#[derive(Debug, Default)]
pub struct AlertIdGenerator {
    last: Mutex<Option<(String, u32)>>,
}

impl AlertIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after `last_id`, the most recent id already recorded, so an
    /// alert raised in the same second gets the next suffix.
    ///
    /// Ids that are not in `EMRG_<date>_<time>[_<n>]` form are ignored.
    pub fn after(last_id: &str) -> Self {
        Self {
            last: Mutex::new(parse(last_id)),
        }
    }

    /// Next id for an alert raised at `at`. Unique as long as the clock does not
    /// step backwards.
    pub fn next(&self, at: NaiveDateTime) -> String {
        let base = format!("EMRG_{}", at.format("%Y%m%d_%H%M%S"));
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let seq = match last.as_ref() {
            Some((prev, seq)) if *prev == base => seq + 1,
            _ => 1,
        };
        *last = Some((base.clone(), seq));

        if seq == 1 { base } else { format!("{base}_{seq}") }
    }
}

/// Split an id into its second-resolution base and same-second sequence.
fn parse(id: &str) -> Option<(String, u32)> {
    const BASE_LEN: usize = "EMRG_YYYYmmdd_HHMMSS".len();

    let base = id.get(..BASE_LEN)?;
    let stamp = base.strip_prefix("EMRG_")?;
    let well_formed = stamp
        .char_indices()
        .all(|(i, c)| if i == 8 { c == '_' } else { c.is_ascii_digit() });
    if !well_formed {
        return None;
    }
    let seq = match &id[BASE_LEN..] {
        "" => 1,
        rest => rest.strip_prefix('_')?.parse().ok().filter(|n| *n >= 2)?,
    };
    Some((base.to_string(), seq))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(15, 9, sec)
            .unwrap()
    }

    #[test]
    fn id_encodes_the_timestamp() {
        assert_eq!(AlertIdGenerator::new().next(at(26)), "EMRG_20260314_150926");
    }

    #[test]
    fn same_second_gets_a_suffix() {
        let ids = AlertIdGenerator::new();
        assert_eq!(ids.next(at(1)), "EMRG_20260314_150901");
        assert_eq!(ids.next(at(1)), "EMRG_20260314_150901_2");
        assert_eq!(ids.next(at(1)), "EMRG_20260314_150901_3");
        assert_eq!(ids.next(at(2)), "EMRG_20260314_150902");
    }

    #[test]
    fn concurrent_callers_never_collide() {
        let ids = std::sync::Arc::new(AlertIdGenerator::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || ids.next(at(5)))
            })
            .collect();
        let mut seen: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn resumes_after_a_recorded_id() {
        let ids = AlertIdGenerator::after("EMRG_20260314_150901");
        assert_eq!(ids.next(at(1)), "EMRG_20260314_150901_2");

        let ids = AlertIdGenerator::after("EMRG_20260314_150901_4");
        assert_eq!(ids.next(at(1)), "EMRG_20260314_150901_5");
        assert_eq!(ids.next(at(2)), "EMRG_20260314_150902");
    }

    #[test]
    fn foreign_ids_do_not_seed() {
        for id in ["", "EMRG_", "CASE_20260314_150901", "EMRG_20260314_150901_x", "EMRG_2026031a_150901"] {
            assert_eq!(parse(id), None, "{id}");
        }
        assert_eq!(AlertIdGenerator::after("junk").next(at(1)), "EMRG_20260314_150901");
    }
}
