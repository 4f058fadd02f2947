use crate::error::Result;
use std::path::Path;

/// Read access to the text of one source file.
#[derive(Debug, Clone)]
pub struct TextAccess {
    text: String,
    line_starts: Vec<usize>,
}

impl TextAccess {
    pub fn from_string(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_string(String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line, without its terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        Some(self.text[start..end].trim_end_matches('\r'))
    }

    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_one_based() {
        let text = TextAccess::from_string("package foo;\r\nclass A {}\n");
        assert_eq!(text.line_count(), 3);
        assert_eq!(text.line(1), Some("package foo;"));
        assert_eq!(text.line(2), Some("class A {}"));
        assert_eq!(text.line(3), Some(""));
        assert_eq!(text.line(0), None);
        assert_eq!(text.line(4), None);
    }
}
