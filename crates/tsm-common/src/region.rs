//! Line/column source regions.
//!
//! Entities record where they were declared so editors can navigate to them.
//! Regions are informational: they take part in an entity's interning
//! fingerprint, but nothing in the model interprets them.

use crate::string_pool::StringPool;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A position in a source file (1-indexed line and column).
///
/// `TextLocation::EMPTY` (line 0) marks "no location".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct TextLocation {
    /// 1-indexed line number
    pub line: u32,
    /// 1-indexed column
    pub column: u32,
}

impl TextLocation {
    pub const EMPTY: TextLocation = TextLocation { line: 0, column: 0 };

    pub fn new(line: u32, column: u32) -> Self {
        TextLocation { line, column }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// A span in a source file: file name plus begin/end locations.
///
/// An end location of `TextLocation::EMPTY` means the region only marks its
/// begin position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DomRegion {
    file_name: Option<Arc<str>>,
    begin: TextLocation,
    end: TextLocation,
}

impl DomRegion {
    /// The region of entities without source (e.g. loaded from metadata).
    pub const EMPTY: DomRegion = DomRegion {
        file_name: None,
        begin: TextLocation::EMPTY,
        end: TextLocation::EMPTY,
    };

    pub fn new(file_name: Option<Arc<str>>, begin: TextLocation, end: TextLocation) -> Self {
        DomRegion {
            file_name,
            begin,
            end,
        }
    }

    /// A region spanning `begin_line:begin_column` to `end_line:end_column`.
    pub fn span(
        file_name: &str,
        begin_line: u32,
        begin_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        DomRegion {
            file_name: Some(Arc::from(file_name)),
            begin: TextLocation::new(begin_line, begin_column),
            end: TextLocation::new(end_line, end_column),
        }
    }

    /// A region marking a single position.
    pub fn at(file_name: &str, line: u32, column: u32) -> Self {
        DomRegion {
            file_name: Some(Arc::from(file_name)),
            begin: TextLocation::new(line, column),
            end: TextLocation::EMPTY,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn begin(&self) -> TextLocation {
        self.begin
    }

    pub fn end(&self) -> TextLocation {
        self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin.is_empty()
    }

    /// Check whether a location falls inside this region.
    ///
    /// Regions without an end only contain their begin line from the begin
    /// column onwards.
    pub fn contains(&self, location: TextLocation) -> bool {
        if self.is_empty() || location < self.begin {
            return false;
        }
        if self.end.is_empty() {
            return location.line == self.begin.line;
        }
        location <= self.end
    }

    /// Replace the file name with its pooled instance.
    ///
    /// Every entity declared in a file carries the same file name, so this
    /// collapses thousands of copies into one.
    pub fn pool_file_name(&mut self, pool: &StringPool) {
        if let Some(name) = &self.file_name {
            self.file_name = Some(pool.intern_arc(name));
        }
    }
}

impl fmt::Display for DomRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[no region]");
        }
        let file = self.file_name().unwrap_or("<unknown>");
        if self.end.is_empty() {
            write!(f, "{file}{}", self.begin)
        } else {
            write!(f, "{file}{}-{}", self.begin, self.end)
        }
    }
}

#[cfg(test)]
#[path = "../tests/region_tests.rs"]
mod tests;
