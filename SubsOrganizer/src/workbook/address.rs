//! Spreadsheet column addresses (`A`, `I`, `XFD`, `I2`)

use crate::error::{Error, Result};

/// Last column Excel supports (`XFD`)
const MAX_COLUMN: u32 = 16_384;

/// Zero-based column index from an address such as `"I2"` or `"i"`
///
/// Only the letters are considered; digits and other characters are ignored.
///
/// # Errors
/// Returns [`Error::UnresolvableColumnAddress`] if there are no letters or the
/// column lies beyond `XFD`.
pub fn column_index(address: &str) -> Result<u16> {
    let unresolvable = || Error::UnresolvableColumnAddress(address.to_string());

    let mut number: u32 = 0;
    let mut letters = 0usize;
    for c in address.chars().filter(char::is_ascii_alphabetic) {
        let digit = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(unresolvable)?;
        letters += 1;
    }

    if letters == 0 || number > MAX_COLUMN {
        return Err(unresolvable());
    }
    u16::try_from(number - 1).map_err(|_| unresolvable())
}

/// Column letters for a zero-based index: `0` → `A`, `8` → `I`, `26` → `AA`
#[must_use]
pub fn column_letter(index: u16) -> String {
    let mut n = u32::from(index) + 1;
    let mut letters: Vec<char> = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.extend(char::from_u32(u32::from('A') + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("I2").unwrap(), 8);
        assert_eq!(column_index("i").unwrap(), 8);
        assert_eq!(column_index("AA10").unwrap(), 26);
        assert_eq!(column_index("$XFD$1").unwrap(), 16_383);
    }

    #[test]
    fn test_unresolvable() {
        assert!(matches!(column_index("42"), Err(Error::UnresolvableColumnAddress(_))));
        assert!(matches!(column_index(""), Err(Error::UnresolvableColumnAddress(_))));
        assert!(matches!(column_index("XFE"), Err(Error::UnresolvableColumnAddress(_))));
        assert!(matches!(
            column_index("ZZZZZZZZZZZZZZ"),
            Err(Error::UnresolvableColumnAddress(_))
        ));
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(8), "I");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(16_383), "XFD");
        for idx in [0, 3, 51, 702, 16_383] {
            assert_eq!(column_index(&column_letter(idx)).unwrap(), idx);
        }
    }
}
