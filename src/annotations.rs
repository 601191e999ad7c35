//! Dependency annotations in source comments.
//!
//! A block declares what it needs inside `/** ... */` doc comments of its
//! dependency-bearing files (`.js` by default):
//!
//! ```js
//! /**
//!  * @bemaker link
//!  * @bemaker icon
//!  */
//! ```
//!
//! Every occurrence of `@<tag>` yields the rest of its line, trimmed, in
//! document order. Duplicates are kept here; blocks deduplicate when they
//! merge requirements. Line (`//`) and plain block (`/* */`) comments are not
//! scanned.

use regex::Regex;

/// Default annotation tag
pub const DEFAULT_TAG: &str = "bemaker";

/// Extracts values of one annotation tag
#[derive(Debug, Clone)]
pub struct AnnotationExtractor {
    tag: String,
    doc_comment: Regex,
    pattern: Regex,
}

impl AnnotationExtractor {
    /// Build an extractor for `tag` (a leading `@` is accepted and dropped)
    pub fn new(tag: &str) -> Result<Self, regex::Error> {
        let tag = tag.trim_start_matches('@');
        let doc_comment = Regex::new(r"(?s)/\*\*(.*?)\*/")?;
        let pattern = Regex::new(&format!(
            r"(?m)(?:^|[\s*])@{}(?:[ \t]+([^\r\n]*))?[ \t]*$",
            regex::escape(tag)
        ))?;
        Ok(Self {
            tag: tag.to_string(),
            doc_comment,
            pattern,
        })
    }

    /// The tag this extractor looks for
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// All tag values in `content`, in document order
    #[must_use]
    pub fn extract(&self, content: &str) -> Vec<String> {
        let mut values = Vec::new();

        for comment in self.doc_comment.captures_iter(content) {
            let Some(body) = comment.get(1) else {
                continue;
            };
            for line in body.as_str().lines() {
                let line = line.trim_start().trim_start_matches('*');
                for capture in self.pattern.captures_iter(line) {
                    let value = capture.get(1).map_or("", |m| m.as_str()).trim();
                    if !value.is_empty() {
                        values.push(value.to_string());
                    }
                }
            }
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_values_in_document_order() {
        let source = r#"
/**
 * Page block
 * @bemaker header
 * @bemaker footer
 */
function page() {}

/** @bemaker link */
"#;
        let extractor = AnnotationExtractor::new(DEFAULT_TAG).unwrap();
        assert_eq!(extractor.extract(source), vec!["header", "footer", "link"]);
    }

    #[test]
    fn test_keeps_duplicates() {
        let source = "/**\n * @bemaker link\n * @bemaker link\n */";
        assert_eq!(AnnotationExtractor::new(DEFAULT_TAG).unwrap().extract(source), vec!["link", "link"]);
    }

    #[test]
    fn test_ignores_other_tags_and_comment_styles() {
        let source = r#"
// @bemaker line-comment
/* @bemaker plain-block */
/**
 * @param name
 * @bemakerish nope
 * @bemaker
 * @bemaker real
 */
"#;
        assert_eq!(AnnotationExtractor::new(DEFAULT_TAG).unwrap().extract(source), vec!["real"]);
    }

    #[test]
    fn test_custom_tag() {
        let source = "/**\n * @requires menu\n * @bemaker ignored\n */";
        let extractor = AnnotationExtractor::new("@requires").unwrap();
        assert_eq!(extractor.tag(), "requires");
        assert_eq!(extractor.extract(source), vec!["menu"]);
    }

    #[test]
    fn test_tag_with_regex_metacharacters() {
        let source = "/** @deps.v2 grid */";
        let extractor = AnnotationExtractor::new("deps.v2").unwrap();
        assert_eq!(extractor.extract(source), vec!["grid"]);
        assert!(extractor.extract("/** @depsXv2 grid */").is_empty());
    }

    #[test]
    fn test_crlf_content() {
        let source = "/**\r\n * @bemaker a\r\n * @bemaker b\r\n */";
        assert_eq!(AnnotationExtractor::new(DEFAULT_TAG).unwrap().extract(source), vec!["a", "b"]);
    }
}
