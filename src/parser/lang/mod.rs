use tree_sitter::Parser;

mod java;

pub struct JavaParser {
    parser: Parser,
}
