//! Fast, independent preamble detection: `$version`, `namespace`, `use`
//! statements, without running the full IDL parser.

use serde::{Deserialize, Serialize};
use smithy_position::{Document, Span};

/// `$version`, `namespace`, and `use` statements detected up front, plus the
/// operation input/output suffix overrides. Used for auto-import insertion
/// and quick preamble-aware completion before a full parse is available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preamble {
    pub version: Option<PreambleItem>,
    pub namespace: Option<PreambleItem>,
    pub imports: Vec<PreambleItem>,
    pub operation_input_suffix: String,
    pub operation_output_suffix: String,
    /// Whether at least one blank line separates the preamble from the body.
    pub separated_from_body: bool,
    /// Whether the `use` imports are blank-separated from `namespace`.
    pub imports_separated_from_namespace: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreambleItem {
    pub value: String,
    pub span: Span,
}

const DEFAULT_INPUT_SUFFIX: &str = "Input";
const DEFAULT_OUTPUT_SUFFIX: &str = "Output";

/// Detects the preamble of `document`'s text. Tolerates leading/trailing
/// comments, leading whitespace, a missing namespace, imports that aren't
/// valid shape ids, and `$version` not being the first non-comment line.
pub fn preamble(document: &Document) -> Preamble {
    let text = document.copy_text();
    preamble_of(&text)
}

/// A keyword line matched against one of the preamble's recognized
/// productions: `key<ws>value` where `value` runs to end of line (`use`,
/// `namespace`) or `key<ws>:<ws>"value"` (the `$`-prefixed control statements).
struct Line<'a> {
    text: &'a str,
    abs_start: usize,
}

fn parse_quoted_control(line: &Line<'_>, keyword: &str) -> Option<(String, Span)> {
    let rest = line.text.strip_prefix(keyword)?;
    let colon_idx = rest.find(':')?;
    let after_colon = &rest[colon_idx + 1..];
    let ws = after_colon.len() - after_colon.trim_start().len();
    let quote_rel = colon_idx + 1 + ws;
    if rest.as_bytes().get(quote_rel) != Some(&b'"') {
        return None;
    }
    let after_quote = &rest[quote_rel + 1..];
    let end_rel = after_quote.find('"')?;
    let value = after_quote[..end_rel].to_string();

    let rest_abs_start = line.abs_start + keyword.len();
    let value_abs_start = rest_abs_start + quote_rel + 1;
    let value_abs_end = value_abs_start + end_rel;
    Some((value, Span::new(value_abs_start, value_abs_end)))
}

fn parse_bareword_statement(line: &Line<'_>, keyword: &str) -> Option<(String, Span)> {
    let rest = line.text.strip_prefix(keyword)?;
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let id = rest.trim();
    if id.is_empty() {
        return None;
    }
    let leading_ws = rest.len() - rest.trim_start().len();
    let rest_abs_start = line.abs_start + keyword.len();
    let id_abs_start = rest_abs_start + leading_ws;
    let id_abs_end = id_abs_start + id.len();
    Some((id.to_string(), Span::new(id_abs_start, id_abs_end)))
}

fn preamble_of(text: &str) -> Preamble {
    let mut version = None;
    let mut namespace = None;
    let mut imports = Vec::new();
    let mut operation_input_suffix = DEFAULT_INPUT_SUFFIX.to_string();
    let mut operation_output_suffix = DEFAULT_OUTPUT_SUFFIX.to_string();
    let mut imports_separated_from_namespace = false;
    let mut saw_blank_since_last_item = false;

    let mut offset = 0usize;
    for raw_line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();

        let trimmed_end = raw_line.trim_end_matches(['\n', '\r']);
        let content = trimmed_end.trim_start();
        let leading_ws = trimmed_end.len() - content.len();
        let line = Line { text: content, abs_start: line_start + leading_ws };

        if content.is_empty() {
            saw_blank_since_last_item = true;
            continue;
        }
        if content.starts_with("//") {
            continue;
        }

        if version.is_none() {
            if let Some((value, span)) = parse_quoted_control(&line, "$version") {
                version = Some(PreambleItem { value, span });
                saw_blank_since_last_item = false;
                continue;
            }
        }
        if let Some((value, _)) = parse_quoted_control(&line, "$operationInputSuffix") {
            operation_input_suffix = value;
            saw_blank_since_last_item = false;
            continue;
        }
        if let Some((value, _)) = parse_quoted_control(&line, "$operationOutputSuffix") {
            operation_output_suffix = value;
            saw_blank_since_last_item = false;
            continue;
        }
        if namespace.is_none() {
            if let Some((value, span)) = parse_bareword_statement(&line, "namespace") {
                namespace = Some(PreambleItem { value, span });
                saw_blank_since_last_item = false;
                continue;
            }
        }
        if let Some((value, span)) = parse_bareword_statement(&line, "use") {
            if saw_blank_since_last_item && namespace.is_some() && imports.is_empty() {
                imports_separated_from_namespace = true;
            }
            imports.push(PreambleItem { value, span });
            saw_blank_since_last_item = false;
            continue;
        }

        return Preamble {
            version,
            namespace,
            imports,
            operation_input_suffix,
            operation_output_suffix,
            separated_from_body: saw_blank_since_last_item,
            imports_separated_from_namespace,
        };
    }

    Preamble {
        version,
        namespace,
        imports,
        operation_input_suffix,
        operation_output_suffix,
        separated_from_body: true,
        imports_separated_from_namespace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_a_preamble() {
        let text = "$version: \"2\"\nnamespace com.foo\nstructure Foo {\n    bar: String\n}\n";
        let p = preamble_of(text);
        assert_eq!(p.version.as_ref().map(|v| v.value.as_str()), Some("2"));
        assert_eq!(p.namespace.as_ref().map(|v| v.value.as_str()), Some("com.foo"));
        assert!(p.imports.is_empty());
    }

    #[test]
    fn tolerates_leading_comment_and_missing_namespace() {
        let text = "// generated file\n$version: \"2.0\"\nuse com.foo#Bar\n\nstructure Foo {}\n";
        let p = preamble_of(text);
        assert_eq!(p.version.as_ref().map(|v| v.value.as_str()), Some("2.0"));
        assert!(p.namespace.is_none());
        assert_eq!(p.imports.len(), 1);
        assert_eq!(p.imports[0].value, "com.foo#Bar");
        assert!(p.separated_from_body);
    }

    #[test]
    fn operation_suffix_overrides_are_detected() {
        let text = "$operationInputSuffix: \"Req\"\n$operationOutputSuffix: \"Resp\"\nnamespace com.foo\n";
        let p = preamble_of(text);
        assert_eq!(p.operation_input_suffix, "Req");
        assert_eq!(p.operation_output_suffix, "Resp");
    }

    #[test]
    fn defaults_when_absent() {
        let p = preamble_of("namespace com.foo\n");
        assert_eq!(p.operation_input_suffix, "Input");
        assert_eq!(p.operation_output_suffix, "Output");
    }

    #[test]
    fn version_span_points_at_the_quoted_text() {
        let text = "$version: \"2\"\n";
        let p = preamble_of(text);
        let item = p.version.unwrap();
        assert_eq!(&text[item.span.start..item.span.end], "2");
    }
}
