//! Sheet naming
//!
//! Excel sheet names are at most 31 characters, may not contain
//! `/ \ [ ] * ? :`, may not start or end with `'`, and must be unique
//! ignoring case.

use std::collections::HashSet;

use super::{MAX_SHEET_NAME_LEN, ROOT_SHEET, SUMMARY_SHEET};

const FORBIDDEN: [char; 7] = ['/', '\\', '[', ']', '*', '?', ':'];
const ELLIPSIS: &str = "...";

/// Make a folder name usable as a sheet name
///
/// Forbidden characters become `_`. Names longer than 31 characters keep
/// their first 28 characters followed by `...`.
#[must_use]
pub fn sanitize_sheet_name(name: &str) -> String {
    if name.is_empty() {
        return ROOT_SHEET.to_string();
    }

    let mut cleaned: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();

    if cleaned.starts_with('\'') {
        cleaned.replace_range(..1, "_");
    }
    if cleaned.ends_with('\'') {
        cleaned.pop();
        cleaned.push('_');
    }

    truncate_with_ellipsis(&cleaned, MAX_SHEET_NAME_LEN)
}

fn truncate_with_ellipsis(name: &str, limit: usize) -> String {
    if name.chars().count() <= limit {
        return name.to_string();
    }
    let keep = limit - ELLIPSIS.len();
    let mut out: String = name.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Hands out unique sanitized sheet names
#[derive(Debug)]
pub struct SheetNamer {
    taken: HashSet<String>,
}

impl Default for SheetNamer {
    fn default() -> Self {
        let mut taken = HashSet::new();
        taken.insert(SUMMARY_SHEET.to_lowercase());
        Self { taken }
    }
}

impl SheetNamer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize `folder` and disambiguate it against names already issued
    pub fn name_for(&mut self, folder: &str) -> String {
        let base = sanitize_sheet_name(folder);
        if self.taken.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!(" ({n})");
            let room = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let stem: String = base.chars().take(room).collect();
            let candidate = format!("{stem}{suffix}");
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}
