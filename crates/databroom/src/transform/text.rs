//! Text rewriting shared by the name and value operations.

use unicode_normalization::UnicodeNormalization;

/// Strip diacritics: compatibility decomposition, then drop every non-ASCII residue.
///
/// `"Año"` becomes `"Ano"`, `"Ærø"` becomes `"r"`.
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Lowercase and replace each space with an underscore.
pub fn standardize_text(text: &str) -> String {
    text.to_lowercase().replace(' ', "_")
}
