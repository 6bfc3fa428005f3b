//! Thin layer over [`apollo_parser`]: source text bookkeeping and syntax errors.
//!
//! Parsing itself is done by `apollo-parser`.
//! The `schema` and `executable` modules convert its concrete syntax tree
//! into the data structures used during execution.

use crate::diagnostic::Diagnostic;
use crate::diagnostic::DiagnosticList;
use crate::response::GraphQLLocation;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;
use apollo_parser::SyntaxNode;
use std::path::Path;
use std::path::PathBuf;

/// A parsed source file, kept around to turn byte offsets into line and column numbers
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    source_text: String,
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: impl AsRef<Path>, source_text: impl Into<String>) -> Self {
        let source_text = source_text.into();
        let mut line_starts = vec![0];
        let bytes = source_text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' => {
                    // \r\n counts as one line terminator
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i + 1)
                }
                _ => {}
            }
            i += 1;
        }
        Self {
            path: path.as_ref().to_owned(),
            source_text,
            line_starts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Convert a byte offset to a 1-based line and column.
    /// Columns count Unicode scalar values, like [`str::chars`].
    pub fn location(&self, offset: usize) -> Option<GraphQLLocation> {
        if offset > self.source_text.len() {
            return None;
        }
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = self.source_text.get(line_start..offset)?.chars().count();
        Some(GraphQLLocation {
            line: line_index + 1,
            column: column + 1,
        })
    }

    pub(crate) fn node_location(&self, node: &SyntaxNode) -> Option<GraphQLLocation> {
        self.location(usize::from(node.text_range().start()))
    }
}

/// Run `apollo-parser` and collect its syntax errors.
///
/// The returned document is usable even when there are errors:
/// nodes that failed to parse are missing from the tree.
pub(crate) fn parse_document(
    source: &SourceFile,
    diagnostics: &mut DiagnosticList,
) -> cst::Document {
    let tree = apollo_parser::Parser::new(source.source_text()).parse();
    for error in tree.errors() {
        diagnostics.push(Diagnostic::new(
            format!("syntax error: {}", error.message()),
            source.location(error.index()),
        ));
    }
    tree.document()
}

pub(crate) fn location_of(source: &SourceFile, node: &impl CstNode) -> Option<GraphQLLocation> {
    source.node_location(node.syntax())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_column() {
        let source = SourceFile::new("query.graphql", "{\n  a\r\n  bé c\n}");
        assert_eq!(
            source.location(0),
            Some(GraphQLLocation { line: 1, column: 1 })
        );
        assert_eq!(
            source.location(4),
            Some(GraphQLLocation { line: 2, column: 3 })
        );
        // `c` after a two-byte character
        assert_eq!(
            source.location(13),
            Some(GraphQLLocation { line: 3, column: 6 })
        );
        assert_eq!(source.location(100), None);
    }
}
