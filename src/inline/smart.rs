//! Smart punctuation replacements.

pub const LEFT_DOUBLE_QUOTE: &str = "\u{201C}";
pub const RIGHT_DOUBLE_QUOTE: &str = "\u{201D}";
pub const LEFT_SINGLE_QUOTE: &str = "\u{2018}";
pub const RIGHT_SINGLE_QUOTE: &str = "\u{2019}";
pub const ELLIPSIS: &str = "\u{2026}";
pub const EM_DASH: &str = "\u{2014}";
pub const EN_DASH: &str = "\u{2013}";

/// Render a run of `n >= 2` hyphens as dashes.
///
/// Runs divisible by three become em dashes and even runs become en dashes.
/// Other runs mix the two, em dashes first, using as few en dashes as
/// possible.
pub fn dashes(out: &mut Vec<u8>, n: usize) {
    let (em, en) = if n % 3 == 0 {
        (n / 3, 0)
    } else if n % 2 == 0 {
        (0, n / 2)
    } else if n % 3 == 2 {
        ((n - 2) / 3, 1)
    } else {
        ((n - 4) / 3, 2)
    };
    for _ in 0..em {
        out.extend_from_slice(EM_DASH.as_bytes());
    }
    for _ in 0..en {
        out.extend_from_slice(EN_DASH.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(n: usize) -> String {
        let mut out = Vec::new();
        dashes(&mut out, n);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_dash_runs() {
        assert_eq!(render(2), "–");
        assert_eq!(render(3), "—");
        assert_eq!(render(4), "––");
        assert_eq!(render(5), "—–");
        assert_eq!(render(6), "——");
        assert_eq!(render(7), "—––");
        assert_eq!(render(10), "–––––");
        assert_eq!(render(11), "———–");
    }
}
