//! YAML parsing: tree-sitter CST in, spanned tagged-union tree out, plus
//! offset/position conversion and position-based node lookup.

use std::path::{Path, PathBuf};

use tree_sitter::{Language, Node, Parser};

use crate::error::Error;
use crate::types::{Position, Range};

/// Byte-offset span into the source text a node was parsed from.
pub type ByteSpan = std::ops::Range<usize>;

/// A parsed YAML document. `text` and `root` must stay paired — node spans
/// are byte offsets into this exact `text`.
pub struct ParsedDocument {
    /// Document identity: the path the text came from.
    pub path: PathBuf,
    /// Root node of the first document in the stream; `None` when the
    /// stream is empty (distinct from a parse failure, which is an error).
    pub root: Option<YamlNode>,
    /// The raw source the tree was parsed from.
    pub text: String,
}

/// A YAML syntax-tree node. Walks are plain pattern matches; there is no
/// dynamic type probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlNode {
    /// A scalar leaf: plain, quoted, block, or alias.
    Scalar(ScalarNode),
    /// A mapping of key/value pairs.
    Mapping(MappingNode),
    /// A sequence of nodes.
    Sequence(SequenceNode),
}

/// A scalar leaf with its unquoted value and raw-token span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarNode {
    /// Byte span of the raw token, quotes included for quoted scalars.
    pub span: ByteSpan,
    /// Scalar text with surrounding quotes stripped.
    pub value: String,
}

/// A mapping node and its key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingNode {
    /// The mapping's entries in source order.
    pub pairs: Vec<PairNode>,
    /// Byte span of the whole mapping.
    pub span: ByteSpan,
}

/// One key/value entry of a mapping. Either side may be absent in
/// structurally odd documents; extraction walks skip such pairs rather than
/// erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairNode {
    /// The key node, when present and representable.
    pub key: Option<YamlNode>,
    /// The value node, when present and representable.
    pub value: Option<YamlNode>,
}

/// A sequence node and its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceNode {
    /// The sequence elements in source order.
    pub items: Vec<YamlNode>,
    /// Byte span of the whole sequence.
    pub span: ByteSpan,
}

/// Parse YAML text into a spanned tree.
///
/// Malformed YAML is non-fatal for callers: the service layer treats a
/// parse failure as "no references found". Multi-document streams keep the
/// first document.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the grammar cannot be loaded or the text
/// contains a syntax error. An empty stream is `Ok` with `root: None`.
pub fn parse(text: &str, path: &Path) -> Result<ParsedDocument, Error> {
    let mut parser = Parser::new();
    let language: Language = tree_sitter_yaml::LANGUAGE.into();
    parser.set_language(&language).map_err(|e| Error::ParseFailed {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let tree = parser.parse(text, None).ok_or_else(|| Error::ParseFailed {
        file: path.to_path_buf(),
        reason: "tree-sitter returned no tree".to_string(),
    })?;

    if tree.root_node().has_error() {
        return Err(Error::ParseFailed {
            file: path.to_path_buf(),
            reason: "YAML syntax error".to_string(),
        });
    }

    Ok(ParsedDocument {
        path: path.to_path_buf(),
        root: convert_node(tree.root_node(), text),
        text: text.to_string(),
    })
}

/// Convert a byte offset into a zero-based line/character position.
///
/// Scans from the start of `text` counting newlines; `character` advances by
/// UTF-16 code units so columns match editor coordinates.
pub fn offset_to_position(offset: usize, text: &str) -> Position {
    let mut line = 0u32;
    let mut character = 0u32;

    for (idx, ch) in text.char_indices() {
        if idx >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            character = 0;
        } else {
            character += ch.len_utf16() as u32;
        }
    }

    Position { line, character }
}

/// Convert a position back into a byte offset. Inverse of
/// [`offset_to_position`] for offsets on character boundaries; positions
/// past the end of a line or of the text clamp.
pub fn position_to_offset(position: Position, text: &str) -> usize {
    let mut line_start = 0usize;

    if position.line > 0 {
        let mut line = 0u32;
        let mut found = false;
        for (idx, ch) in text.char_indices() {
            if ch == '\n' {
                line += 1;
                if line == position.line {
                    line_start = idx + 1;
                    found = true;
                    break;
                }
            }
        }
        if !found {
            return text.len();
        }
    }

    let mut units = 0u32;
    for (idx, ch) in text[line_start..].char_indices() {
        if units >= position.character || ch == '\n' {
            return line_start + idx;
        }
        units += ch.len_utf16() as u32;
    }

    text.len()
}

/// Build a [`Range`] from a pair of byte offsets into `text`.
pub fn range_from_offsets(start: usize, end: usize, text: &str) -> Range {
    Range {
        start: offset_to_position(start, text),
        end: offset_to_position(end, text),
    }
}

/// Find the scalar under a position. Descends maps into their pairs (key
/// then value) and sequences into their items.
pub fn find_scalar_at_position<'a>(
    document: &'a ParsedDocument,
    position: Position,
) -> Option<&'a ScalarNode> {
    let offset = position_to_offset(position, &document.text);
    document
        .root
        .as_ref()
        .and_then(|root| find_scalar_at_offset(root, offset))
}

/// Find the scalar whose closed span `[start, end]` contains `offset`.
/// When adjacent token boundaries make two scalars eligible, the later one
/// in document order wins.
pub fn find_scalar_at_offset(root: &YamlNode, offset: usize) -> Option<&ScalarNode> {
    let mut found = None;
    collect_scalar_at_offset(root, offset, &mut found);
    found
}

fn collect_scalar_at_offset<'a>(
    node: &'a YamlNode,
    offset: usize,
    found: &mut Option<&'a ScalarNode>,
) {
    match node {
        YamlNode::Scalar(scalar) => {
            if scalar.span.start <= offset && offset <= scalar.span.end {
                *found = Some(scalar);
            }
        },
        YamlNode::Mapping(mapping) => {
            for pair in &mapping.pairs {
                if let Some(key) = &pair.key {
                    collect_scalar_at_offset(key, offset, found);
                }
                if let Some(value) = &pair.value {
                    collect_scalar_at_offset(value, offset, found);
                }
            }
        },
        YamlNode::Sequence(sequence) => {
            for item in &sequence.items {
                collect_scalar_at_offset(item, offset, found);
            }
        },
    }
}

// ── CST conversion ─────────────────────────────────────────────────────

/// Convert a tree-sitter node into the tagged-union tree. Wrapper kinds
/// (stream, document, block/flow node, sequence item) pass through to their
/// first representable child; unrepresentable kinds yield `None`.
fn convert_node(node: Node<'_>, source: &str) -> Option<YamlNode> {
    match node.kind() {
        "stream" | "document" | "block_node" | "flow_node" | "block_sequence_item" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if let Some(converted) = convert_node(child, source) {
                    return Some(converted);
                }
            }
            None
        },
        "block_mapping" | "flow_mapping" => Some(YamlNode::Mapping(convert_mapping(node, source))),
        "block_sequence" | "flow_sequence" => {
            Some(YamlNode::Sequence(convert_sequence(node, source)))
        },
        "plain_scalar" | "single_quote_scalar" | "double_quote_scalar" | "block_scalar"
        | "alias" => Some(YamlNode::Scalar(convert_scalar(node, source))),
        _ => None,
    }
}

fn convert_mapping(node: Node<'_>, source: &str) -> MappingNode {
    let mut pairs = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        if child.kind() != "block_mapping_pair" && child.kind() != "flow_pair" {
            continue;
        }
        pairs.push(PairNode {
            key: child
                .child_by_field_name("key")
                .and_then(|key| convert_node(key, source)),
            value: child
                .child_by_field_name("value")
                .and_then(|value| convert_node(value, source)),
        });
    }

    MappingNode {
        pairs,
        span: node.byte_range(),
    }
}

fn convert_sequence(node: Node<'_>, source: &str) -> SequenceNode {
    let mut items = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        if let Some(converted) = convert_node(child, source) {
            items.push(converted);
        }
    }

    SequenceNode {
        items,
        span: node.byte_range(),
    }
}

fn convert_scalar(node: Node<'_>, source: &str) -> ScalarNode {
    let raw = node.utf8_text(source.as_bytes()).unwrap_or_default();
    let value = match node.kind() {
        "single_quote_scalar" => strip_quotes(raw, '\'').replace("''", "'"),
        "double_quote_scalar" => strip_quotes(raw, '"').replace("\\\"", "\"").replace("\\\\", "\\"),
        _ => raw.to_string(),
    };

    ScalarNode {
        span: node.byte_range(),
        value,
    }
}

/// Strip one matching surrounding quote pair, if present.
fn strip_quotes(raw: &str, quote: char) -> String {
    let trimmed = raw
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .unwrap_or(raw);
    trimmed.to_string()
}
