use url::Url;

use crate::ConvertError;

/// Schemes a text run may link to. Anything else stays plain text.
const LINKABLE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Schemes an external image may be fetched from.
const IMAGE_SCHEMES: &[&str] = &["http", "https"];

pub fn parse_base(base: &str) -> Result<Url, ConvertError> {
    Url::parse(base.trim()).map_err(|err| ConvertError::BaseUrl {
        base: base.to_string(),
        message: err.to_string(),
    })
}

/// Resolves a `href`/`src` reference to an absolute URL string.
///
/// Absolute http(s) references are validated and returned unchanged; all
/// other references are joined onto `base`.
pub fn resolve_reference(reference: &str, base: &Url) -> Result<String, ConvertError> {
    let trimmed = reference.trim();
    let failure = |message: String| ConvertError::Resolution {
        reference: trimmed.to_string(),
        base: base.to_string(),
        message,
    };

    if is_absolute_http(trimmed) {
        return Url::parse(trimmed)
            .map(|_| trimmed.to_string())
            .map_err(|err| failure(err.to_string()));
    }
    base.join(trimmed)
        .map(String::from)
        .map_err(|err| failure(err.to_string()))
}

/// Resolves a link target, dropping targets a document store cannot open
/// (`javascript:`, `data:` and other non-web schemes).
pub(crate) fn resolve_link(href: &str, base: &Url) -> Result<Option<String>, ConvertError> {
    let resolved = resolve_reference(href, base)?;
    let linkable = Url::parse(&resolved)
        .map(|url| LINKABLE_SCHEMES.contains(&url.scheme()))
        .unwrap_or(false);
    Ok(linkable.then_some(resolved))
}

/// Scheme of a resolved image URL when the store cannot fetch it.
pub(crate) fn unsupported_image_scheme(resolved: &str) -> Option<String> {
    let scheme = match Url::parse(resolved) {
        Ok(url) => url.scheme().to_string(),
        Err(_) => return Some(String::new()),
    };
    (!IMAGE_SCHEMES.contains(&scheme.as_str())).then_some(scheme)
}

pub(crate) fn is_data_uri(reference: &str) -> bool {
    starts_with_ignore_case(reference.trim(), "data:")
}

fn is_absolute_http(reference: &str) -> bool {
    starts_with_ignore_case(reference, "http://") || starts_with_ignore_case(reference, "https://")
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
