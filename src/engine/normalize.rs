/// Map a learner's expression to the canonical form used for comparison.
///
/// Case-folds, drops every whitespace character and rewrites the display
/// glyphs `×` and `÷` (and the ratio colon) to their ASCII operators. Nothing
/// else is rewritten: terms are never reordered or simplified.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| !ch.is_whitespace())
        .map(canonical_glyph)
        .collect()
}

fn canonical_glyph(ch: char) -> char {
    match ch {
        '×' => '*',
        '÷' | ':' => '/',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(normalize("X+Y=600"), normalize("x + y = 600"));
        assert_eq!(normalize("  3X = y\t"), "3x=y");
    }

    #[test]
    fn test_glyph_substitution() {
        assert_eq!(normalize("7×x=y"), "7*x=y");
        assert_eq!(normalize("x÷2=y"), "x/2=y");
        assert_eq!(normalize("x:y=7:6"), "x/y=7/6");
    }

    #[test]
    fn test_cjk_whitespace_is_stripped() {
        // Ideographic space, as produced by Chinese input methods
        assert_eq!(normalize("x\u{3000}+\u{3000}y"), "x+y");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n "), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "X+Y=600",
            "7 × X = Y",
            "(x+9)/(y+24)=8÷7",
            "x:y = 13:6",
            "頭等 和 普通等",
            "İSTANBUL",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_no_reordering() {
        assert_ne!(normalize("x+y=600"), normalize("y+x=600"));
    }
}
