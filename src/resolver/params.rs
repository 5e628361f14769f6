use super::scrub;
use crate::ParameterUnit;
use crate::template::{Tag, is_decoration, line_prefix, strip_markup, substitute};

/// Plain description derived from the Fields template for a field or parameter called `name`.
///
/// Empty when the Fields template is disabled.
pub fn field_description(fields_template: Option<&str>, name: &str) -> String {
    fields_template
        .map(|template| {
            let rendered = substitute(template, Tag::Instance, name);
            let rendered = substitute(&rendered, Tag::ClassName, name);
            strip_markup(&scrub(&rendered))
        })
        .unwrap_or_default()
}

/// Expands the first `<params>` into one `@param name: description` entry per parameter.
///
/// The first entry takes the tag's place. Every further entry goes on its own line, led by the
/// decoration of the tag's line. Without parameters the tag is removed, along with its line
/// if nothing but decoration remains.
pub fn expand_params(template: &str, params: &[ParameterUnit], fields_template: Option<&str>) -> String {
    let marker = Tag::Params.marker();
    let Some(pos) = template.find(marker) else {
        return template.to_string();
    };
    let line_start = template[..pos].rfind('\n').map_or(0, |i| i + 1);
    let line_end = template[pos..].find('\n').map_or(template.len(), |i| pos + i);
    let line = &template[line_start..line_end];
    let newline = if line.ends_with('\r') { "\r\n" } else { "\n" };

    if params.is_empty() {
        let mut stripped = line.to_string();
        stripped.replace_range(pos - line_start..pos - line_start + marker.len(), "");
        if is_decoration(stripped.trim_end_matches('\r')) {
            // drop the line together with its line break
            let (cut_start, cut_end) = if line_end < template.len() {
                (line_start, line_end + 1)
            } else {
                (line_start.saturating_sub(1), line_end)
            };
            let mut out = template.to_string();
            out.replace_range(cut_start..cut_end, "");
            return out;
        }
        let mut out = template.to_string();
        out.replace_range(line_start..line_end, &stripped);
        return out;
    }

    let continuation = line_prefix(line);
    let entries = params
        .iter()
        .map(|param| {
            let description = field_description(fields_template, &param.name);
            if description.is_empty() {
                format!("@param {}:", param.name)
            } else {
                format!("@param {}: {}", param.name, description)
            }
        })
        .collect::<Vec<_>>();
    let expanded = entries.join(&format!("{newline}{continuation}"));

    let mut out = template.to_string();
    out.replace_range(pos..pos + marker.len(), &expanded);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(names: &[&str]) -> Vec<ParameterUnit> {
        names
            .iter()
            .map(|name| ParameterUnit {
                name: name.to_string(),
                parameter_type: "String".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_one_line_per_parameter_with_continuation() {
        let template = "/**\n * Builds it\n *\n * <params>\n */";
        let fields = "/**\n * the <instance>\n */";
        assert_eq!(
            expand_params(template, &params(&["name", "age"]), Some(fields)),
            "/**\n * Builds it\n *\n * @param name: the name\n * @param age: the age\n */"
        );
    }

    #[test]
    fn test_disabled_fields_template_leaves_descriptions_empty() {
        let template = "/**\n * <params>\n */";
        assert_eq!(
            expand_params(template, &params(&["value"]), None),
            "/**\n * @param value:\n */"
        );
    }

    #[test]
    fn test_zero_parameters_drop_the_line() {
        let template = "/**\n * Runs\n * <params>\n */";
        assert_eq!(expand_params(template, &[], None), "/**\n * Runs\n */");
        let trailing = "/**\n * Runs <params>\n */";
        assert_eq!(expand_params(trailing, &[], None), "/**\n * Runs \n */");
    }

    #[test]
    fn test_only_first_occurrence_expands() {
        let template = "/** <params> <params> */";
        assert_eq!(
            expand_params(template, &params(&["a"]), None),
            "/** @param a: <params> */"
        );
    }

    #[test]
    fn test_crlf_templates_keep_their_line_endings() {
        let template = "/**\r\n * <params>\r\n */";
        assert_eq!(
            expand_params(template, &params(&["a", "b"]), None),
            "/**\r\n * @param a:\r\n * @param b:\r\n */"
        );
    }

    #[test]
    fn test_field_description_round_trips() {
        assert_eq!(field_description(Some("/**\n * <instance>\n */"), "count"), "count");
        assert_eq!(
            field_description(Some("/**\n * {@code <instance>} value\n */"), "count"),
            "{@code count} value"
        );
        assert_eq!(field_description(None, "count"), "");
    }
}
