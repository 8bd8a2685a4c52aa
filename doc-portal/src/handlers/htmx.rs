//! Response headers understood by HTMX on the portal pages.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");
pub const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");

/// Browser event that `portal.js` turns into a blocking `alert`.
pub const SHOW_MESSAGE_EVENT: &str = "showMessage";

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// `HX-Trigger` value that raises [`SHOW_MESSAGE_EVENT`] with `message`.
pub fn show_message(message: &str) -> HeaderValue {
    let json = serde_json::json!({ SHOW_MESSAGE_EVENT: message }).to_string();
    HeaderValue::from_str(&escape_non_ascii(&json))
        .unwrap_or_else(|_| HeaderValue::from_static(r#"{"showMessage":""}"#))
}

/// Header values must be visible ASCII; backend messages are not.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if (c as u32) < 0x7f {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
