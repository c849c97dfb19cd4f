use std::borrow::Cow;

// Resolved value list of a token span
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Values {
    // Inclusive, zero-padded to `width` characters
    Numeric { start: u64, end: u64, width: usize },
    // Inclusive, by character code
    Letter { start: u8, end: u8 },
    List(Vec<String>),
}

impl Values {
    // Classification order: numeric range, letter range, pipe list, literal
    pub fn classify(content: &str) -> Self {
        if let Some(v) = Self::numeric(content) {
            return v;
        }
        if let Some(v) = Self::letter(content) {
            return v;
        }
        if content.contains('|') {
            return Self::List(content.split('|').map(|s| s.trim().to_string()).collect());
        }
        Self::List(vec![content.to_string()])
    }

    fn numeric(content: &str) -> Option<Self> {
        let (start, end) = content.split_once('-')?;
        let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !is_number(start) || !is_number(end) {
            return None;
        }
        // Literals beyond u64 fall through to the next rule
        let width = start.len();
        let (start, end) = (start.parse().ok()?, end.parse().ok()?);
        Some(Self::Numeric { start, end, width })
    }

    fn letter(content: &str) -> Option<Self> {
        match content.as_bytes() {
            &[s, b'-', e] if s.is_ascii_alphabetic() && e.is_ascii_alphabetic() => {
                Some(Self::Letter { start: s, end: e })
            }
            _ => None,
        }
    }

    // Saturates at usize::MAX for ranges wider than the address space
    pub fn len(&self) -> usize {
        match *self {
            Self::Numeric { start, end, .. } => match end.checked_sub(start) {
                Some(d) => {
                    usize::try_from(d).ok().and_then(|d| d.checked_add(1)).unwrap_or(usize::MAX)
                }
                None => 0,
            },
            Self::Letter { start, end } => (end as usize + 1).saturating_sub(start as usize),
            Self::List(ref l) => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<Cow<'_, str>> {
        if i >= self.len() {
            return None;
        }
        let v = match self {
            Self::Numeric { start, width, .. } => {
                Cow::Owned(format!("{:0width$}", start + i as u64, width = *width))
            }
            Self::Letter { start, .. } => Cow::Owned(char::from(start + i as u8).to_string()),
            Self::List(l) => Cow::Borrowed(l[i].as_str()),
        };
        Some(v)
    }

    pub fn iter(&self) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        (0..self.len()).map_while(|i| self.get(i))
    }
}

#[cfg(test)]
mod values_tests {
    use test_case::test_case;

    use super::Values;

    fn collect(content: &str) -> Vec<String> {
        Values::classify(content).iter().map(|v| v.into_owned()).collect()
    }

    #[test_case("01-05", &["01", "02", "03", "04", "05"]; "padded")]
    #[test_case("1-3", &["1", "2", "3"]; "unpadded")]
    #[test_case("8-11", &["8", "9", "10", "11"]; "grows past width")]
    #[test_case("098-101", &["098", "099", "100", "101"]; "three wide")]
    #[test_case("7-7", &["7"]; "single")]
    #[test_case("5-1", &[]; "reversed")]
    fn test_numeric_range(content: &str, exp: &[&str]) {
        assert_eq!(collect(content), exp);
    }

    #[test]
    fn test_numeric_pads_to_start_width() {
        let vals = collect("5-20");
        assert_eq!(vals.len(), 16);
        assert_eq!(vals[0], "5");
        assert_eq!(vals[15], "20");

        let vals = collect("05-2");
        assert!(vals.is_empty());
    }

    #[test_case("A-C", &["A", "B", "C"]; "upper")]
    #[test_case("x-z", &["x", "y", "z"]; "lower")]
    #[test_case("Y-b", &["Y", "Z", "[", "\\", "]", "^", "_", "`", "a", "b"]; "by char code")]
    #[test_case("C-A", &[]; "reversed")]
    fn test_letter_range(content: &str, exp: &[&str]) {
        assert_eq!(collect(content), exp);
    }

    #[test_case("x|y|z", &["x", "y", "z"]; "list")]
    #[test_case(" red | green |blue ", &["red", "green", "blue"]; "trimmed")]
    #[test_case("a||b", &["a", "", "b"]; "empty entry")]
    #[test_case("1-2|3", &["1-2", "3"]; "range inside list")]
    fn test_list(content: &str, exp: &[&str]) {
        assert_eq!(collect(content), exp);
    }

    #[test_case("hello"; "word")]
    #[test_case(" spaced "; "not trimmed")]
    #[test_case("AB-C"; "not a letter range")]
    #[test_case("1-"; "open range")]
    #[test_case("-1-2"; "signed")]
    #[test_case("1-2-3"; "three parts")]
    #[test_case("99999999999999999999-1"; "beyond u64")]
    fn test_literal(content: &str) {
        assert_eq!(collect(content), vec![content.to_string()]);
    }

    #[test]
    fn test_len_without_materializing() {
        let v = Values::classify("0-18446744073709551615");
        assert_eq!(v.len(), usize::MAX);
        assert_eq!(v.get(3).as_deref(), Some("3"));
        assert_eq!(Values::classify("a-z").len(), 26);
        assert!(Values::classify("z-a").is_empty());
    }
}
