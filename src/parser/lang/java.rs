use super::JavaParser;
use crate::{
    ClassKind, ClassUnit, DocComment, Error, FieldUnit, JavaFile, LanguageParser, MethodUnit,
    ParameterUnit, Result,
};
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::debug;
use tree_sitter::{Node, Parser};

impl LanguageParser for JavaParser {
    fn parse_file(&mut self, file_path: &Path) -> Result<JavaFile> {
        if !file_path.is_file() {
            return Err(Error::FileNotFound(file_path.to_path_buf()));
        }
        let source_code = fs::read_to_string(file_path).map_err(Error::Io)?;
        self.parse_source(file_path, source_code)
    }

    fn parse_source(&mut self, file_path: &Path, source_code: String) -> Result<JavaFile> {
        let tree = self
            .parse(source_code.as_bytes(), None)
            .ok_or_else(|| Error::TreeSitter("Failed to parse source code".to_string()))?;
        let root_node = tree.root_node();
        if root_node.has_error() {
            // Files are parsed while being edited; keep whatever declarations survived.
            debug!("{} contains syntax errors", file_path.display());
        }

        let mut file_unit = JavaFile::new(file_path.to_path_buf(), String::new());
        let mut cursor = root_node.walk();
        for child in root_node.named_children(&mut cursor) {
            if let Some(kind) = class_kind(child.kind()) {
                file_unit
                    .classes
                    .push(parse_class(child, kind, &source_code));
            }
        }
        file_unit.source = source_code;

        Ok(file_unit)
    }
}

impl JavaParser {
    pub fn try_new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| Error::TreeSitter(e.to_string()))?;
        Ok(Self { parser })
    }
}

fn class_kind(kind: &str) -> Option<ClassKind> {
    match kind {
        "class_declaration" => Some(ClassKind::Class),
        "interface_declaration" => Some(ClassKind::Interface),
        "enum_declaration" => Some(ClassKind::Enum),
        "record_declaration" => Some(ClassKind::Record),
        "annotation_type_declaration" => Some(ClassKind::Annotation),
        _ => None,
    }
}

// Parse a type declaration and everything declared in its body
fn parse_class(node: Node, kind: ClassKind, source_code: &str) -> ClassUnit {
    let (doc, commented) = extract_documentation(node, source_code);
    let name = node
        .child_by_field_name("name")
        .and_then(|n| get_node_text(n, source_code))
        .unwrap_or_else(|| "unknown".to_string());

    let mut class_unit = ClassUnit {
        name,
        kind,
        doc,
        commented,
        range: node.start_byte()..node.end_byte(),
        fields: Vec::new(),
        constructors: Vec::new(),
        methods: Vec::new(),
        classes: Vec::new(),
    };

    if let Some(body) = node.child_by_field_name("body") {
        parse_members(body, source_code, &mut class_unit);
    }

    class_unit
}

fn parse_members(body: Node, source_code: &str, class_unit: &mut ClassUnit) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "field_declaration" | "constant_declaration" => {
                class_unit
                    .fields
                    .extend(parse_fields(member, source_code));
            }
            "method_declaration" | "annotation_type_element_declaration" => {
                class_unit
                    .methods
                    .push(parse_method(member, source_code, false));
            }
            "constructor_declaration" | "compact_constructor_declaration" => {
                class_unit
                    .constructors
                    .push(parse_method(member, source_code, true));
            }
            // Enum members live one level further down, after the constants
            "enum_body_declarations" => parse_members(member, source_code, class_unit),
            other => {
                if let Some(kind) = class_kind(other) {
                    class_unit
                        .classes
                        .push(parse_class(member, kind, source_code));
                }
            }
        }
    }
}

// One unit per declarator: `int a, b;` declares two fields
fn parse_fields(node: Node, source_code: &str) -> Vec<FieldUnit> {
    let (doc, commented) = extract_documentation(node, source_code);
    let field_type = node
        .child_by_field_name("type")
        .and_then(|n| get_node_text(n, source_code))
        .unwrap_or_default();

    let mut cursor = node.walk();
    node.children_by_field_name("declarator", &mut cursor)
        .filter_map(|declarator| {
            declarator
                .child_by_field_name("name")
                .and_then(|n| get_node_text(n, source_code))
        })
        .map(|name| FieldUnit {
            name,
            field_type: field_type.clone(),
            doc: doc.clone(),
            commented,
            start: node.start_byte(),
        })
        .collect()
}

fn parse_method(node: Node, source_code: &str, is_constructor: bool) -> MethodUnit {
    let (doc, commented) = extract_documentation(node, source_code);
    let name = node
        .child_by_field_name("name")
        .and_then(|n| get_node_text(n, source_code))
        .unwrap_or_else(|| "unknown".to_string());

    let return_type = if is_constructor {
        None
    } else {
        node.child_by_field_name("type")
            .and_then(|n| get_node_text(n, source_code))
            .map(|ty| {
                // Legacy `int values()[]` keeps the dimensions after the parameter list
                match node
                    .child_by_field_name("dimensions")
                    .and_then(|d| get_node_text(d, source_code))
                {
                    Some(dimensions) => format!("{}{}", ty, dimensions),
                    None => ty,
                }
            })
    };

    let parameters = node
        .child_by_field_name("parameters")
        .map(|list| parse_parameters(list, source_code))
        .unwrap_or_default();

    let body_node = node.child_by_field_name("body");
    let body = body_node.and_then(|b| get_node_text(b, source_code));
    let returned = body_node.and_then(|b| first_return_expression(b, source_code));

    MethodUnit {
        name,
        is_constructor,
        parameters,
        return_type,
        body,
        returned,
        doc,
        commented,
        start: node.start_byte(),
    }
}

fn parse_parameters(list: Node, source_code: &str) -> Vec<ParameterUnit> {
    let mut parameters = Vec::new();
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        match param.kind() {
            "formal_parameter" => {
                let name = param
                    .child_by_field_name("name")
                    .and_then(|n| get_node_text(n, source_code));
                let parameter_type = param
                    .child_by_field_name("type")
                    .and_then(|n| get_node_text(n, source_code));
                if let (Some(name), Some(parameter_type)) = (name, parameter_type) {
                    parameters.push(ParameterUnit {
                        name,
                        parameter_type,
                    });
                }
            }
            "spread_parameter" => {
                // `String... names`: the name sits in a variable_declarator
                let mut name = None;
                let mut parameter_type = None;
                let mut spread_cursor = param.walk();
                for child in param.named_children(&mut spread_cursor) {
                    match child.kind() {
                        "modifiers" => {}
                        "variable_declarator" => {
                            name = child
                                .child_by_field_name("name")
                                .and_then(|n| get_node_text(n, source_code));
                        }
                        _ if parameter_type.is_none() => {
                            parameter_type = get_node_text(child, source_code);
                        }
                        _ => {}
                    }
                }
                if let (Some(name), Some(parameter_type)) = (name, parameter_type) {
                    parameters.push(ParameterUnit {
                        name,
                        parameter_type: format!("{}...", parameter_type),
                    });
                }
            }
            _ => {}
        }
    }
    parameters
}

// The expression of the first return statement, in source order.
// Lambdas and anonymous class bodies return from something else and are skipped.
fn first_return_expression(node: Node, source_code: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "return_statement" => {
                let mut inner = child.walk();
                let expression = child
                    .named_children(&mut inner)
                    .find(|n| !n.kind().ends_with("comment"))?;
                let text: String = get_node_text(expression, source_code)?
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                return (!text.is_empty()).then_some(text);
            }
            "lambda_expression" | "class_body" => {}
            _ => {
                if let Some(found) = first_return_expression(child, source_code) {
                    return Some(found);
                }
            }
        }
    }
    None
}

// Helper function to get the text of a node
fn get_node_text(node: Node, source_code: &str) -> Option<String> {
    node.utf8_text(source_code.as_bytes())
        .ok()
        .map(String::from)
}

// Find the comment directly preceding a declaration.
//
// Returns the Javadoc comment, if that is what precedes it, and whether any comment at all
// precedes it. Only whitespace may separate the comment from the declaration.
fn extract_documentation(node: Node, source_code: &str) -> (Option<DocComment>, bool) {
    let Some(sibling) = node.prev_sibling() else {
        return (None, false);
    };
    if sibling.kind() != "block_comment" && sibling.kind() != "line_comment" {
        return (None, false);
    }
    let gap = source_code
        .get(sibling.end_byte()..node.start_byte())
        .unwrap_or_default();
    if !gap.chars().all(char::is_whitespace) {
        return (None, false);
    }

    let doc = match get_node_text(sibling, source_code) {
        Some(text) if sibling.kind() == "block_comment" && text.starts_with("/**") => {
            Some(DocComment {
                text,
                range: sibling.start_byte()..sibling.end_byte(),
            })
        }
        _ => None,
    };
    (doc, true)
}

impl Deref for JavaParser {
    type Target = Parser;

    fn deref(&self) -> &Self::Target {
        &self.parser
    }
}

impl DerefMut for JavaParser {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.parser
    }
}
