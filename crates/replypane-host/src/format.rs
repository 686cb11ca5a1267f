//! Shaping delivered text for the host.

use replypane_types::DeliveryFormat;

use crate::adapter::WriteMode;
use crate::item::CoercionType;

/// Inserted between a prepended reply and the existing body.
pub const PREPEND_SEPARATOR: &str = "\n\n---\n\n";

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Plain text as an HTML fragment: escaped, line breaks as `<br>`.
pub fn text_to_html(text: &str) -> String {
    escape_html(&text.replace("\r\n", "\n")).replace('\n', "<br>")
}

/// Build the data and coercion type handed to the host for one write.
pub fn delivery_payload(
    text: &str,
    mode: WriteMode,
    format: DeliveryFormat,
) -> (String, CoercionType) {
    let raw = match mode {
        WriteMode::Prepend => format!("{text}{PREPEND_SEPARATOR}"),
        WriteMode::Replace | WriteMode::InsertAtSelection => text.to_owned(),
    };
    match format {
        DeliveryFormat::Text => (raw, CoercionType::Text),
        DeliveryFormat::Html => (text_to_html(&raw), CoercionType::Html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_appends_separator() {
        let (data, coercion) = delivery_payload("Hello", WriteMode::Prepend, DeliveryFormat::Text);
        assert_eq!(data, "Hello\n\n---\n\n");
        assert_eq!(coercion, CoercionType::Text);
    }

    #[test]
    fn replace_is_verbatim() {
        let (data, _) = delivery_payload("a <b>", WriteMode::Replace, DeliveryFormat::Text);
        assert_eq!(data, "a <b>");
    }

    #[test]
    fn html_escapes_and_breaks_lines() {
        let (data, coercion) =
            delivery_payload("Hi & bye\r\n<ok>", WriteMode::Replace, DeliveryFormat::Html);
        assert_eq!(data, "Hi &amp; bye<br>&lt;ok&gt;");
        assert_eq!(coercion, CoercionType::Html);
    }

    #[test]
    fn html_prepend_separator_is_rendered() {
        let (data, _) = delivery_payload("x", WriteMode::Prepend, DeliveryFormat::Html);
        assert_eq!(data, "x<br><br>---<br><br>");
    }
}
