// Token span
//------------------------------------------------------------------------------

// A `{content}` expression inside a template. `index` is the byte offset of the opening
// brace in the input template and is never recomputed once substitution starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub full: String,
    pub content: String,
    pub index: usize,
}

impl TokenSpan {
    pub fn end(&self) -> usize {
        self.index + self.full.len()
    }
}

// Scans left to right for `{...}` spans. The first `}` after a `{` closes the span, an
// empty `{}` is not a span and the content may itself contain `{`.
pub fn tokenize(template: &str) -> Vec<TokenSpan> {
    let bytes = template.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }

        match template[i + 1..].find('}') {
            Some(0) => i += 1,
            Some(len) => {
                let end = i + 1 + len;
                spans.push(TokenSpan {
                    full: template[i..=end].to_string(),
                    content: template[i + 1..end].to_string(),
                    index: i,
                });
                i = end + 1;
            }
            // No closing brace anywhere after this point
            None => break,
        }
    }

    spans
}
