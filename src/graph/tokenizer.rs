//! Lexical tokenization of function bodies using tree-sitter grammars.
//!
//! The builder needs a token stream classified into identifiers, string
//! literals, comments, and everything else. Tree-sitter's error-tolerant
//! parsing provides exactly that for body fragments: string and comment
//! subtrees are emitted as single atomic tokens (never descended into), and
//! remaining leaves classify by node kind. Tokens the grammar classifies as
//! string or comment never produce call edges; that is the authoritative
//! rule, including for multi-line comments.

use anyhow::{anyhow, Result};

use crate::lang::Language;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier-like token (identifier, type_identifier, field_identifier)
    Identifier,
    /// Entire string/character literal, emitted as one token
    StringLiteral,
    /// Entire comment, emitted as one token
    Comment,
    /// Punctuation, keywords, operators, literals
    Other,
}

/// One lexical token from a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Verbatim token text
    pub text: String,
    /// Row within the tokenized source (0-indexed)
    pub row: usize,
    /// Column within the row (0-indexed, bytes)
    pub col: usize,
}

/// Tokenizer for one language, reusing a single tree-sitter parser.
pub struct Tokenizer {
    parser: tree_sitter::Parser,
}

impl Tokenizer {
    /// Create a tokenizer for the given language.
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        let grammar = match language {
            Language::C => tree_sitter_c::language(),
            Language::Java => tree_sitter_java::language(),
            Language::Python => tree_sitter_python::language(),
        };
        parser.set_language(&grammar)?;
        Ok(Self { parser })
    }

    /// Tokenize source text into a classified lexical stream.
    ///
    /// Body fragments outside their enclosing context (e.g. a bare Java
    /// method) parse with ERROR nodes; the leaves still lex correctly, which
    /// is all the builder needs.
    ///
    /// # Guarantees
    /// - Pure function: same input → same output
    /// - Whitespace is not represented; adjacent tokens are adjacent entries
    pub fn tokenize(&mut self, source: &str) -> Result<Vec<Token>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| anyhow!("tokenizer produced no parse tree"))?;

        let mut tokens = Vec::new();
        collect_tokens(&tree.root_node(), source.as_bytes(), &mut tokens);
        Ok(tokens)
    }
}

/// Classify node kinds that are emitted whole, without descending.
fn atomic_kind(kind: &str) -> Option<TokenKind> {
    match kind {
        // C, Python, Java comments
        "comment" | "line_comment" | "block_comment" => Some(TokenKind::Comment),
        // C/Java string and char literals; Python strings (including
        // f-strings, whose interpolations are swallowed deliberately);
        // C #include <...> paths
        "string_literal"
        | "raw_string_literal"
        | "char_literal"
        | "character_literal"
        | "string"
        | "concatenated_string"
        | "text_block"
        | "system_lib_string" => Some(TokenKind::StringLiteral),
        _ => None,
    }
}

/// Walk the tree and emit tokens in document order.
fn collect_tokens(node: &tree_sitter::Node, source: &[u8], tokens: &mut Vec<Token>) {
    let kind = node.kind();

    if let Some(token_kind) = atomic_kind(kind) {
        push_token(node, source, token_kind, tokens);
        return;
    }

    if node.child_count() == 0 {
        let token_kind = if kind.ends_with("identifier") {
            TokenKind::Identifier
        } else {
            TokenKind::Other
        };
        push_token(node, source, token_kind, tokens);
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(&child, source, tokens);
    }
}

fn push_token(
    node: &tree_sitter::Node,
    source: &[u8],
    kind: TokenKind,
    tokens: &mut Vec<Token>,
) {
    let start = node.start_byte() as usize;
    let end = (node.end_byte() as usize).min(source.len());
    if start >= end {
        return; // zero-width node (e.g. missing token inserted by recovery)
    }
    let text = String::from_utf8_lossy(&source[start..end]).to_string();
    tokens.push(Token {
        kind,
        text,
        row: node.start_position().row,
        col: node.start_position().column,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(tokenizer: &mut Tokenizer, source: &str) -> Vec<(TokenKind, String)> {
        tokenizer
            .tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_c_identifiers_and_calls() {
        let mut tokenizer = Tokenizer::new(Language::C).unwrap();
        let tokens = tokenizer
            .tokenize("int main(void) {\n    helper();\n    return 0;\n}\n")
            .unwrap();

        let idents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.as_str())
            .collect();
        assert!(idents.contains(&"main"));
        assert!(idents.contains(&"helper"));

        // helper is immediately followed by the call delimiter
        let pos = tokens.iter().position(|t| t.text == "helper").unwrap();
        assert_eq!(tokens[pos + 1].text, "(");
    }

    #[test]
    fn test_c_strings_are_atomic() {
        let mut tokenizer = Tokenizer::new(Language::C).unwrap();
        let tokens = kinds_of(
            &mut tokenizer,
            "void f(void) { puts(\"calls helper() inside\"); }\n",
        );

        assert!(tokens
            .iter()
            .any(|(k, t)| *k == TokenKind::StringLiteral && t.contains("helper()")));
        // The name inside the string never surfaces as an identifier
        assert!(!tokens
            .iter()
            .any(|(k, t)| *k == TokenKind::Identifier && t == "helper"));
    }

    #[test]
    fn test_c_comments_are_atomic() {
        let mut tokenizer = Tokenizer::new(Language::C).unwrap();
        let tokens = kinds_of(
            &mut tokenizer,
            "void f(void) {\n    /* calls cleanup() on\n       multiple lines */\n    int x = 1;\n}\n",
        );

        assert!(tokens
            .iter()
            .any(|(k, t)| *k == TokenKind::Comment && t.contains("cleanup()")));
        assert!(!tokens
            .iter()
            .any(|(k, t)| *k == TokenKind::Identifier && t == "cleanup"));
    }

    #[test]
    fn test_python_fragment() {
        let mut tokenizer = Tokenizer::new(Language::Python).unwrap();
        let tokens = tokenizer
            .tokenize("def process(data):\n    # validate(data) is disabled\n    return transform(data)\n")
            .unwrap();

        let idents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.as_str())
            .collect();
        assert!(idents.contains(&"process"));
        assert!(idents.contains(&"transform"));
        // validate only appears inside a comment token
        assert!(!idents.contains(&"validate"));
    }

    #[test]
    fn test_java_fragment_tokenizes_despite_errors() {
        let mut tokenizer = Tokenizer::new(Language::Java).unwrap();
        // A bare method is not a valid compilation unit; leaves still lex
        let tokens = tokenizer
            .tokenize("public int size() {\n    return count();\n}\n")
            .unwrap();

        let idents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.as_str())
            .collect();
        assert!(idents.contains(&"count"));
    }

    #[test]
    fn test_rows_are_relative_to_input() {
        let mut tokenizer = Tokenizer::new(Language::C).unwrap();
        let tokens = tokenizer
            .tokenize("void f(void) {\n    g();\n}\n")
            .unwrap();

        let g = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Identifier && t.text == "g")
            .unwrap();
        assert_eq!(g.row, 1);
        assert_eq!(g.col, 4);
    }
}
