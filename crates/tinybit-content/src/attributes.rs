//! Markup attribute rewriting.

use regex::Regex;

use tinybit_core::error::AppError;
use tinybit_core::result::AppResult;

/// Forces a specific value for an attribute on every occurrence of an
/// element.
///
/// When the element already carries the attribute, its value is replaced
/// in place (the quote style is kept). When it does not, the attribute is
/// inserted right after the element name. Other elements are untouched.
pub fn force_element_attribute(
    content: &str,
    element: &str,
    attribute: &str,
    value: &str,
) -> AppResult<String> {
    let tag_pattern = format!("<{}([^>]*)>", regex::escape(element));
    let tag_re = Regex::new(&tag_pattern)
        .map_err(|e| AppError::validation(format!("Invalid element pattern: {e}")))?;

    let attr_pattern = format!(
        r#"(<{}[^>]+{}=["'])([^"']+)"#,
        regex::escape(element),
        regex::escape(attribute)
    );
    let attr_re = Regex::new(&attr_pattern)
        .map_err(|e| AppError::validation(format!("Invalid attribute pattern: {e}")))?;

    let open_tag = format!("<{element} ");
    let forced_tag = format!("<{element} {attribute}=\"{value}\" ");

    let result = tag_re.replace_all(content, |tag: &regex::Captures<'_>| {
        let full = &tag[0];
        if attr_re.is_match(full) {
            attr_re
                .replace_all(full, |attr: &regex::Captures<'_>| {
                    format!("{}{}", &attr[1], value)
                })
                .into_owned()
        } else {
            full.replace(&open_tag, &forced_tag)
        }
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_attribute_when_missing() {
        let content = r#"<p><img src="https://example.com/photo.jpg" alt="A photo" width="1000" height="750" class="align size-full"></p>"#;

        let out = force_element_attribute(content, "img", "loading", "eager").unwrap();

        assert_eq!(
            out,
            r#"<p><img loading="eager" src="https://example.com/photo.jpg" alt="A photo" width="1000" height="750" class="align size-full"></p>"#
        );
    }

    #[test]
    fn test_overrides_existing_attribute_value() {
        let content = r#"<p><img src="https://example.com/photo.jpg" loading="lazy" alt="A photo" width="1000" height="750" class="align size-full"></p>"#;

        let out = force_element_attribute(content, "img", "loading", "eager").unwrap();

        assert_eq!(
            out,
            r#"<p><img src="https://example.com/photo.jpg" loading="eager" alt="A photo" width="1000" height="750" class="align size-full"></p>"#
        );
    }

    #[test]
    fn test_keeps_single_quote_style() {
        let content = "<img src='a.jpg' loading='lazy'>";

        let out = force_element_attribute(content, "img", "loading", "eager").unwrap();

        assert_eq!(out, "<img src='a.jpg' loading='eager'>");
    }

    #[test]
    fn test_forces_every_occurrence_of_the_element() {
        let content = r#"<img src="a.jpg"> text <img src="b.jpg" loading="lazy">"#;

        let out = force_element_attribute(content, "img", "loading", "eager").unwrap();

        assert_eq!(
            out,
            r#"<img loading="eager" src="a.jpg"> text <img src="b.jpg" loading="eager">"#
        );
    }

    #[test]
    fn test_other_elements_are_untouched() {
        let content = r#"<iframe src="a.html"></iframe><img src="a.jpg">"#;

        let out = force_element_attribute(content, "img", "loading", "eager").unwrap();

        assert_eq!(
            out,
            r#"<iframe src="a.html"></iframe><img loading="eager" src="a.jpg">"#
        );
    }

    #[test]
    fn test_bare_element_without_attributes_is_left_alone() {
        let out = force_element_attribute("<img>", "img", "loading", "eager").unwrap();

        assert_eq!(out, "<img>");
    }
}
