//! Extraction of directive comments from source text.
//!
//! `syn` drops ordinary comments, so directive blocks are located in the raw file text:
//!
//! ```text
//! /* go-swagify
//! @@path: /users/{id}
//! summary: A single user
//! */
//! ```

use crate::directive::{DirectiveBlock, DirectiveKind, DirectiveRecord, MARKER};
use crate::warnings::Warnings;
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@(?P<kind>[a-zA-Z]+): *(?P<identifier>.+)$").expect("directive header pattern")
});

/// Extracts every directive block found in `source`.
///
/// Block comments that do not start with the marker are ignored. A marked comment with a
/// missing header or an unknown directive type is reported and skipped.
pub fn extract_blocks(source: &str, origin: &Path, warnings: &mut Warnings) -> Vec<DirectiveBlock> {
    let mut blocks = Vec::new();

    for body in block_comments(source) {
        let mut lines = body.lines().map(clean_line).filter(|l| !l.is_empty());
        if lines.next() != Some(MARKER) {
            continue;
        }

        let Some(header) = lines.next() else {
            warnings.add(format!(
                "[Warning] {}: bad directive header: <empty>",
                origin.display()
            ));
            continue;
        };
        let Some(captures) = HEADER_RE.captures(header) else {
            warnings.add(format!(
                "[Warning] {}: bad directive header: {}",
                origin.display(),
                header
            ));
            continue;
        };

        let Some(kind) = DirectiveKind::parse(&captures["kind"]) else {
            warnings.add(format!(
                "[Warning] {}: unknown directive type: @@{}",
                origin.display(),
                &captures["kind"]
            ));
            continue;
        };

        let identifier = captures["identifier"].trim().to_string();
        debug!("Found @@{} {} in {}", kind, identifier, origin.display());
        blocks.push(DirectiveBlock::new(
            kind,
            identifier,
            lines.map(str::to_string).collect(),
        ));
    }

    blocks
}

/// Bodies of the block comments in `source`, in source order.
///
/// String, raw string and char literals and `//` line comments are skipped, so a `/*` inside
/// them does not open a comment. Block comments nest as they do in Rust; a nested comment stays
/// part of its outer body. Scanning stops at an unterminated comment.
fn block_comments(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut bodies = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = source[i..].find('\n').map_or(bytes.len(), |n| i + n + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i + 2;
                let Some(end) = block_comment_end(bytes, start) else {
                    break;
                };
                bodies.push(&source[start..end]);
                i = end + 2;
            }
            b'"' => i = string_end(bytes, i + 1),
            b'r' if raw_string_allowed(bytes, i) => {
                i = raw_string_end(bytes, i + 1).unwrap_or(i + 1);
            }
            b'\'' => i = char_literal_end(source, i),
            _ => i += 1,
        }
    }

    bodies
}

/// Offset of the `*/` closing a block comment whose body starts at `start`.
fn block_comment_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1;
    let mut i = start;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    None
}

/// Offset just past the closing quote of a string whose contents start at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Whether the `r` at `i` can start a raw string (`r"`, `r#"`, `br"`) rather than end an identifier.
fn raw_string_allowed(bytes: &[u8], i: usize) -> bool {
    match i.checked_sub(1).map(|p| bytes[p]) {
        None => true,
        Some(b'b') => i < 2 || !is_ident_byte(bytes[i - 2]),
        Some(prev) => !is_ident_byte(prev),
    }
}

/// Offset just past a raw string whose hashes start at `start`, or `None` when the `r` is not
/// followed by `#*"`.
fn raw_string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let hashes = bytes[start..].iter().take_while(|&&b| b == b'#').count();
    let open = start + hashes;
    if bytes.get(open) != Some(&b'"') {
        return None;
    }

    let mut i = open + 1;
    while i < bytes.len() {
        if bytes[i] == b'"'
            && bytes.len() - (i + 1) >= hashes
            && bytes[i + 1..i + 1 + hashes].iter().all(|&b| b == b'#')
        {
            return Some(i + 1 + hashes);
        }
        i += 1;
    }
    Some(bytes.len())
}

/// Offset just past a char literal at `i`. A lifetime such as `'a` only consumes its quote.
fn char_literal_end(source: &str, i: usize) -> usize {
    let bytes = source.as_bytes();
    if bytes.get(i + 1) == Some(&b'\\') {
        let from = (i + 3).min(bytes.len());
        return bytes[from..]
            .iter()
            .position(|&b| b == b'\'')
            .map_or(bytes.len(), |n| from + n + 1);
    }

    match source[i + 1..].chars().next() {
        Some(c) if bytes.get(i + 1 + c.len_utf8()) == Some(&b'\'') => i + 2 + c.len_utf8(),
        _ => i + 1,
    }
}

/// Trims a comment line and strips a leading `*` decoration.
fn clean_line(line: &str) -> &str {
    let line = line.trim();
    if line == "*" {
        return "";
    }
    line.strip_prefix("* ").map(str::trim).unwrap_or(line)
}

/// All directive blocks of a run, grouped by type and identifier.
#[derive(Debug, Default)]
pub struct DirectiveIndex {
    blocks: BTreeMap<DirectiveKind, BTreeMap<String, DirectiveBlock>>,
}

impl DirectiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a block. A block with an already known `(type, identifier)` replaces the earlier one.
    pub fn insert(&mut self, block: DirectiveBlock, warnings: &mut Warnings) {
        let by_identifier = self.blocks.entry(block.kind).or_default();
        if by_identifier.contains_key(&block.identifier) {
            warnings.add(format!(
                "[Warning] @@{}: duplicate identifier {}, keeping the last definition",
                block.kind, block.identifier
            ));
        }
        by_identifier.insert(block.identifier.clone(), block);
    }

    pub fn extend(&mut self, blocks: Vec<DirectiveBlock>, warnings: &mut Warnings) {
        for block in blocks {
            self.insert(block, warnings);
        }
    }

    /// Blocks of one type in identifier order.
    pub fn blocks(&self, kind: DirectiveKind) -> impl Iterator<Item = &DirectiveBlock> {
        self.blocks.get(&kind).into_iter().flat_map(|m| m.values())
    }

    pub fn identifiers(&self, kind: DirectiveKind) -> impl Iterator<Item = &str> {
        self.blocks(kind).map(|b| b.identifier.as_str())
    }

    /// Parses the blocks of one type into records.
    pub fn records(&self, kind: DirectiveKind, warnings: &mut Warnings) -> Vec<DirectiveRecord> {
        self.blocks(kind)
            .map(|block| DirectiveRecord::parse(block, warnings))
            .collect()
    }

    pub fn count(&self, kind: DirectiveKind) -> usize {
        self.blocks.get(&kind).map_or(0, BTreeMap::len)
    }

    pub fn len(&self) -> usize {
        self.blocks.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> (Vec<DirectiveBlock>, Warnings) {
        let mut warnings = Warnings::new();
        let blocks = extract_blocks(source, Path::new("src/lib.rs"), &mut warnings);
        (blocks, warnings)
    }

    #[test]
    fn test_extract_single_block() {
        let source = r#"
            /* go-swagify
            @@path: /users/{id}
            summary: A single user

            parameters.ref: userId
            */
            pub fn get_user() {}
        "#;

        let (blocks, warnings) = extract(source);

        assert!(warnings.is_empty());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, DirectiveKind::Path);
        assert_eq!(blocks[0].identifier, "/users/{id}");
        assert_eq!(
            blocks[0].lines,
            vec!["summary: A single user".to_string(), "parameters.ref: userId".to_string()]
        );
    }

    #[test]
    fn test_ignores_unmarked_comments() {
        let source = r#"
            /* just a comment
            @@path: /nope
            */
            /* go-swagify
            @@struct: User
            */
        "#;

        let (blocks, warnings) = extract(source);

        assert!(warnings.is_empty());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, DirectiveKind::Struct);
        assert!(blocks[0].lines.is_empty());
    }

    #[test]
    fn test_strips_star_decoration() {
        let source = "/* go-swagify\n * @@schema: User\n * description: A user\n *\n */";

        let (blocks, _) = extract(source);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].identifier, "User");
        assert_eq!(blocks[0].lines, vec!["description: A user".to_string()]);
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let source = "/* go-swagify\n@@widget: thing\nkey: value\n*/";

        let (blocks, warnings) = extract(source);

        assert!(blocks.is_empty());
        assert_eq!(warnings.count_matching("unknown directive type: @@widget"), 1);
    }

    #[test]
    fn test_bad_header_is_reported() {
        let source = "/* go-swagify\nsummary: missing header\n*/\n/* go-swagify\n*/";

        let (blocks, warnings) = extract(source);

        assert!(blocks.is_empty());
        assert_eq!(warnings.count_matching("bad directive header"), 2);
    }

    #[test]
    fn test_unterminated_comment_stops_scan() {
        let (blocks, warnings) = extract("/* go-swagify\n@@path: /x\n");

        assert!(blocks.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_wildcard_route_does_not_open_comment() {
        let source = r#"
            pub fn router() -> Router {
                Router::new().route("/assets/*path", get(serve))
            }

            /* go-swagify
            @@path: /health
            summary: Liveness
            */
        "#;

        let (blocks, warnings) = extract(source);

        assert!(warnings.is_empty());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, DirectiveKind::Path);
        assert_eq!(blocks[0].identifier, "/health");
        assert_eq!(blocks[0].lines, vec!["summary: Liveness".to_string()]);
    }

    #[test]
    fn test_literals_and_line_comments_are_skipped() {
        let source = r###"
            // see /* the docs
            const GLOB: &str = r#"static/*"#;
            const CLOSE: &str = "*/ \" /*";
            const STAR: char = '*';
            const SLASH: char = '/';
            const QUOTE: char = '\'';
            fn first<'a>(items: &'a [&'a str]) -> &'a str { items[0] }

            /* go-swagify
            @@schema: Asset
            description: A static file
            */
        "###;

        let (blocks, warnings) = extract(source);

        assert!(warnings.is_empty());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].identifier, "Asset");
        assert_eq!(blocks[0].lines, vec!["description: A static file".to_string()]);
    }

    #[test]
    fn test_nested_comment_stays_in_outer_block() {
        let source = "/* go-swagify\n@@schema: Page\n/* note */\ndescription: One page\n*/\n\
                      /* go-swagify\n@@schema: Item\n*/";

        let (blocks, _) = extract(source);

        assert_eq!(
            blocks.iter().map(|b| b.identifier.as_str()).collect::<Vec<_>>(),
            vec!["Page", "Item"]
        );
        assert_eq!(
            blocks[0].lines,
            vec!["/* note */".to_string(), "description: One page".to_string()]
        );
    }

    #[test]
    fn test_index_duplicate_keeps_last() {
        let mut warnings = Warnings::new();
        let mut index = DirectiveIndex::new();
        index.insert(
            DirectiveBlock::new(DirectiveKind::Path, "/a", vec!["summary: one".into()]),
            &mut warnings,
        );
        index.insert(
            DirectiveBlock::new(DirectiveKind::Path, "/a", vec!["summary: two".into()]),
            &mut warnings,
        );

        assert_eq!(index.count(DirectiveKind::Path), 1);
        assert_eq!(warnings.count_matching("duplicate identifier /a"), 1);

        let records = index.records(DirectiveKind::Path, &mut warnings);
        assert_eq!(records[0].get("summary"), Some("two"));
    }

    #[test]
    fn test_index_groups_by_kind() {
        let mut warnings = Warnings::new();
        let mut index = DirectiveIndex::new();
        index.extend(
            vec![
                DirectiveBlock::new(DirectiveKind::Schema, "B", vec![]),
                DirectiveBlock::new(DirectiveKind::Schema, "A", vec![]),
                DirectiveBlock::new(DirectiveKind::Parameter, "A", vec![]),
            ],
            &mut warnings,
        );

        assert!(warnings.is_empty());
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.identifiers(DirectiveKind::Schema).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(index.count(DirectiveKind::Operation), 0);
    }
}
