//! Document tree back to KeyValues text.
//!
//! Output follows the layout Steam writes for `.acf` files:
//!
//! ```text
//! "AppState"
//! {
//! 	"appid"		"570"
//! }
//! ```

use std::fmt::{self, Write};

use crate::node::{Block, Node};

/// Serializes `block` with Steam's default layout.
pub fn serialize(block: &Block) -> String {
    Serializer::default().serialize(block)
}

/// Configurable KeyValues writer.
///
/// Indent and separator must consist of whitespace for the output to decode.
#[derive(Debug, Clone)]
pub struct Serializer {
    indent: String,
    separator: String,
}

impl Default for Serializer {
    fn default() -> Self {
        Self {
            indent: "\t".into(),
            separator: "\t\t".into(),
        }
    }
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the string written once per nesting level.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the string written between a key and its string value.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn serialize(&self, block: &Block) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write(&mut out, block);
        out
    }

    pub fn write<W: Write>(&self, out: &mut W, block: &Block) -> fmt::Result {
        // One entry iterator per open block; the stack height is the depth.
        let mut stack = vec![block.entries().iter()];
        loop {
            let depth = stack.len().saturating_sub(1);
            let Some(entries) = stack.last_mut() else {
                return Ok(());
            };
            let Some((key, node)) = entries.next() else {
                stack.pop();
                if depth > 0 {
                    self.write_indent(out, depth - 1)?;
                    out.write_str("}\n")?;
                }
                continue;
            };

            self.write_indent(out, depth)?;
            write_quoted(out, key)?;
            match node {
                Node::Leaf(value) => {
                    out.write_str(&self.separator)?;
                    write_quoted(out, value)?;
                    out.write_char('\n')?;
                }
                Node::Block(child) => {
                    out.write_char('\n')?;
                    self.write_indent(out, depth)?;
                    out.write_str("{\n")?;
                    stack.push(child.entries().iter());
                }
            }
        }
    }

    fn write_indent<W: Write>(&self, out: &mut W, depth: usize) -> fmt::Result {
        if self.indent.is_empty() {
            return Ok(());
        }
        for _ in 0..depth {
            out.write_str(&self.indent)?;
        }
        Ok(())
    }
}

fn write_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.write_char('\\')?;
        }
        out.write_char(c)?;
    }
    out.write_char('"')
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Serializer::default().write(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Block {
        let user: Block = [("language", "english")].into_iter().collect();
        let state: Block = [
            ("appid", Node::from("570")),
            ("name", Node::from("Dota 2")),
            ("UserConfig", Node::Block(user)),
        ]
        .into_iter()
        .collect();
        [("AppState", state)].into_iter().collect()
    }

    #[test]
    fn steam_layout() {
        assert_eq!(
            serialize(&sample()),
            "\"AppState\"\n{\n\t\"appid\"\t\t\"570\"\n\t\"name\"\t\t\"Dota 2\"\n\t\"UserConfig\"\n\t{\n\t\t\"language\"\t\t\"english\"\n\t}\n}\n"
        );
    }

    #[test]
    fn empty_block() {
        let root: Block = [("empty", Block::new())].into_iter().collect();
        assert_eq!(serialize(&root), "\"empty\"\n{\n}\n");
        assert_eq!(serialize(&Block::new()), "");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        let root: Block = [("pa\"th", "C:\\Steam \"x\"")].into_iter().collect();
        assert_eq!(
            serialize(&root),
            "\"pa\\\"th\"\t\t\"C:\\\\Steam \\\"x\\\"\"\n"
        );
    }

    #[test]
    fn custom_indent_and_separator() {
        let out = Serializer::new().indent("  ").separator(" ").serialize(&sample());
        assert!(out.contains("\n  \"appid\" \"570\"\n"));
        assert!(out.contains("\n    \"language\" \"english\"\n"));
    }

    #[test]
    fn deep_tree_encodes_without_recursion() {
        let depth = 200_000;
        let text = format!("{}{}", "\"k\" {".repeat(depth), "}".repeat(depth));
        let root = crate::decode(&text).unwrap();

        let encoded = Serializer::new().indent("").serialize(&root);
        assert!(encoded.starts_with("\"k\"\n{\n\"k\"\n{\n"));
        assert!(encoded.ends_with("}\n}\n"));
        assert_eq!(encoded.matches('{').count(), depth);
        assert_eq!(crate::decode(&encoded).unwrap(), root);
    }

    #[test]
    fn display_matches_serialize() {
        let root = sample();
        assert_eq!(root.to_string(), serialize(&root));
    }
}
