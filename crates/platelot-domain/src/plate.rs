//! Plate text normalization
//!
//! OCR output is reduced to ASCII letters and digits before it is used as a
//! ledger key. Case is preserved and there is no length limit.

/// Drop every character outside `[A-Za-z0-9]`
pub fn normalize_plate(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_spaces() {
        assert_eq!(normalize_plate("A B-12!"), "AB12");
        assert_eq!(normalize_plate("  KA 01\nAB 1234 \u{c}"), "KA01AB1234");
    }

    #[test]
    fn test_preserves_case() {
        assert_eq!(normalize_plate("abC-9"), "abC9");
    }

    #[test]
    fn test_drops_non_ascii_alphanumerics() {
        assert_eq!(normalize_plate("熊本130ら1122"), "1301122");
        assert_eq!(normalize_plate("ÄB١2"), "B2");
    }

    #[test]
    fn test_empty_and_all_noise() {
        assert_eq!(normalize_plate(""), "");
        assert_eq!(normalize_plate("-- !! --"), "");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["A B-12!", "", "x_y_z", "ok", "\t7 7 7\n", "ß∂ƒ-42"] {
            let once = normalize_plate(raw);
            assert_eq!(normalize_plate(&once), once);
        }
    }
}
