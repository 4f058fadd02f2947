use serde::{Deserialize, Serialize};
use std::fmt;

/// A source range with 1-based, inclusive line and column bounds.
///
/// A point location has identical start and end.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParseLocation {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl ParseLocation {
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    pub fn point(line: usize, col: usize) -> Self {
        Self::new(line, col, line, col)
    }

    pub fn is_point(&self) -> bool {
        self.start_line == self.end_line && self.start_col == self.end_col
    }

    pub fn is_valid(&self) -> bool {
        self.start_line > 0
            && self.start_col > 0
            && (self.start_line, self.start_col) <= (self.end_line, self.end_col)
    }

    pub fn start(&self) -> ParseLocation {
        Self::point(self.start_line, self.start_col)
    }

    pub fn end(&self) -> ParseLocation {
        Self::point(self.end_line, self.end_col)
    }

    /// True if `other` lies completely inside this range.
    pub fn contains(&self, other: &ParseLocation) -> bool {
        (self.start_line, self.start_col) <= (other.start_line, other.start_col)
            && (other.end_line, other.end_col) <= (self.end_line, self.end_col)
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}:{} {}:{}>",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}
