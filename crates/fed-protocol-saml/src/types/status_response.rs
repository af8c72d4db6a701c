//! Inbound status responses.
//!
//! Only the root element is inspected: its name, its `InResponseTo`
//! attribute and the top-level `StatusCode`. Comments and the XML
//! declaration are skipped so markup inside them is never mistaken for the
//! message itself.

use super::STATUS_SUCCESS;

/// Root-level view of a status response sent by the IDP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    /// Local name of the root element, e.g. `Response` or `LogoutResponse`.
    pub element: String,
    /// ID of the request this message answers.
    pub in_response_to: Option<String>,
    /// Value of the top-level `StatusCode`.
    pub status_code: Option<String>,
}

impl StatusResponse {
    /// Reads the root element of `xml`.
    ///
    /// Returns `None` when the document has no root element.
    #[must_use]
    pub fn parse(xml: &str) -> Option<Self> {
        let xml = strip_comments(xml);
        let root = root_start_tag(&xml)?;

        let name = root
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .filter(|name| !name.is_empty())?;
        let element = name.rsplit(':').next().unwrap_or(name).to_string();

        let status_code = xml
            .find("<samlp:StatusCode")
            .or_else(|| xml.find("<StatusCode"))
            .and_then(|pos| {
                let end = xml[pos..].find('>')?;
                attribute(&xml[pos..pos + end], "Value")
            });

        Some(Self {
            element,
            in_response_to: attribute(root, "InResponseTo"),
            status_code,
        })
    }

    /// Returns true for a `LogoutResponse` root.
    #[must_use]
    pub fn is_logout_response(&self) -> bool {
        self.element == "LogoutResponse"
    }

    /// Returns true for an authentication `Response` root.
    #[must_use]
    pub fn is_authn_response(&self) -> bool {
        self.element == "Response"
    }

    /// Returns true if the top-level status is `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code.as_deref() == Some(STATUS_SUCCESS)
    }
}

fn strip_comments(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start..].find("-->") {
            Some(end) => rest = &rest[start + end + 3..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Contents of the first start tag, without `<` and `>`.
fn root_start_tag(xml: &str) -> Option<&str> {
    let mut rest = xml.trim_start();
    while rest.starts_with("<?") {
        let end = rest.find("?>")?;
        rest = rest[end + 2..].trim_start();
    }
    let body = rest.strip_prefix('<')?;
    let end = body.find('>')?;
    Some(&body[..end])
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let pattern = format!(" {name}=\"");
    let start = tag.find(&pattern)? + pattern.len();
    let len = tag[start..].find('"')?;
    Some(tag[start..start + len].to_string())
}
