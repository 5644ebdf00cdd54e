//! Text folding used for column names and free-text period cells.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Decompose (NFKD) and drop combining marks: `"Período"` -> `"Periodo"`.
pub fn strip_diacritics(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Canonical token for a column name: no diacritics, lowercase, ASCII
/// letters and digits only. `"Período_ND"` and `"periodo nd"` both become
/// `"periodond"`.
pub fn normalize_name(name: &str) -> String {
    strip_diacritics(name)
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Folding for free-text period cells. Keeps the separators that carry
/// meaning in typed periods (`/`, `.`, `-`, space) alongside letters and
/// digits.
pub fn normalize_free_text(text: &str) -> String {
    strip_diacritics(text)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '-' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("Alocação"), "Alocacao");
        assert_eq!(strip_diacritics("Área"), "Area");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Período ND"), "periodond");
        assert_eq!(normalize_name("Periodo_Fechamento"), "periodofechamento");
        assert_eq!(normalize_name("  Período (Alocação) "), "periodoalocacao");
        assert_eq!(normalize_name("Analistas EIC²"), "analistaseic2");
    }

    #[test]
    fn test_normalize_free_text() {
        assert_eq!(normalize_free_text("Março/25"), "marco/25");
        assert_eq!(normalize_free_text("SET. 2025!"), "set. 2025");
        assert_eq!(normalize_free_text("  Out-24 "), "  out-24 ");
    }
}
