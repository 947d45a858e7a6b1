//! Path assembly and URI construction.
//!
//! Joins the configured base path, the endpoint path, and the per-call
//! sub-path into one absolute path with exactly one `/` between segments,
//! substituting positional `{}` placeholders in the sub-path, and builds
//! the final URI through the `url` crate.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::{FailureCode, Scheme};

/// Characters percent-encoded inside a substituted path parameter. A
/// parameter always stays within its own segment, so `/` encodes too.
const PATH_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Strip leading and trailing path separators from a segment.
#[must_use]
pub fn strip_separators(segment: &str) -> &str {
    segment.trim_matches('/')
}

/// Substitute positional `{}` placeholders in a sub-path template, in order.
///
/// Each parameter is percent-encoded so that reserved characters like `#`
/// or `?` read as path text instead of starting a fragment or query.
/// Surplus parameters are ignored; a template referencing more parameters
/// than supplied fails with [`FailureCode::MalformedSubPath`].
fn substitute(template: &str, params: &[String]) -> Result<String, FailureCode> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut params = params.iter();

    while let Some(pos) = rest.find("{}") {
        let (before, after) = rest.split_at(pos);
        out.push_str(before);
        let param = params.next().ok_or(FailureCode::MalformedSubPath)?;
        out.extend(utf8_percent_encode(param, PATH_PARAM));
        rest = after.get(2..).unwrap_or_default();
    }
    out.push_str(rest);

    Ok(out)
}

/// Join base path, endpoint path, and parametrized sub-path into an
/// absolute path.
///
/// Each segment is stripped of leading and trailing separators; an empty
/// segment contributes nothing. The result carries a leading `/` when any
/// segment is present.
pub fn assemble_path(
    base_path: &str,
    endpoint_path: &str,
    sub_path: &str,
    sub_path_params: &[String],
) -> Result<String, FailureCode> {
    let mut path = String::new();
    append_segment(&mut path, base_path);
    append_segment(&mut path, endpoint_path);

    let stripped_sub = strip_separators(sub_path);
    if !stripped_sub.is_empty() {
        let substituted = substitute(stripped_sub, sub_path_params)?;
        append_segment(&mut path, &substituted);
    }

    Ok(path)
}

fn append_segment(path: &mut String, segment: &str) {
    let stripped = strip_separators(segment);
    if !stripped.is_empty() {
        path.push('/');
        path.push_str(stripped);
    }
}

/// Build the request URI from its components.
///
/// Fails with [`FailureCode::CannotCreateUri`] when the components do not
/// form a syntactically valid URI.
pub fn build_uri(
    scheme: Scheme,
    host: &str,
    port: u16,
    path: &str,
    query: &str,
) -> Result<Url, FailureCode> {
    let raw = format!("{scheme}://{host}:{port}{path}{query}");
    let url = Url::parse(&raw).map_err(|_| FailureCode::CannotCreateUri)?;

    // A URL that parsed but swallowed the host (e.g. empty host) is not
    // a usable request target.
    if url.host_str().is_none_or(str::is_empty) {
        return Err(FailureCode::CannotCreateUri);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn strips_leading_and_trailing_separators() {
        assert_eq!(strip_separators("//api/v1//"), "api/v1");
        assert_eq!(strip_separators("api"), "api");
        assert_eq!(strip_separators("///"), "");
        assert_eq!(strip_separators(""), "");
    }

    #[test]
    fn assembles_with_single_separators() {
        let path = assemble_path("/api/", "/users/", "/active/", &[]).expect("path");
        assert_eq!(path, "/api/users/active");
    }

    #[test]
    fn empty_segments_contribute_nothing() {
        assert_eq!(assemble_path("", "users", "", &[]).expect("path"), "/users");
        assert_eq!(assemble_path("api", "", "", &[]).expect("path"), "/api");
        assert_eq!(assemble_path("", "", "", &[]).expect("path"), "");
    }

    #[test]
    fn substitutes_positional_parameters_in_order() {
        let path = assemble_path("api", "users", "{}/posts/{}", &params(&["42", "7"]))
            .expect("path");
        assert_eq!(path, "/api/users/42/posts/7");
    }

    #[test]
    fn reserved_characters_in_parameters_are_percent_encoded() {
        let path =
            assemble_path("api", "users", "{}", &params(&["a#b"])).expect("path");
        assert_eq!(path, "/api/users/a%23b");

        let path =
            assemble_path("api", "users", "{}", &params(&["a?x=1"])).expect("path");
        assert_eq!(path, "/api/users/a%3Fx%3D1");

        // A parameter fills exactly one segment
        let path = assemble_path("api", "users", "{}", &params(&["a/b"])).expect("path");
        assert_eq!(path, "/api/users/a%2Fb");
    }

    #[test]
    fn encoded_parameters_stay_in_the_path_of_the_built_uri() {
        let path = assemble_path("api", "users", "{}", &params(&["a#b"])).expect("path");
        let url = build_uri(Scheme::Http, "example.org", 80, &path, "?q=1").expect("uri");
        assert_eq!(url.path(), "/api/users/a%23b");
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("q=1"));
    }

    #[test]
    fn surplus_parameters_are_ignored() {
        let path =
            assemble_path("api", "users", "{}", &params(&["42", "unused"])).expect("path");
        assert_eq!(path, "/api/users/42");
    }

    #[test]
    fn missing_parameters_fail_with_malformed_sub_path() {
        let err = assemble_path("api", "users", "{}/posts/{}", &params(&["42"]))
            .expect_err("should fail");
        assert_eq!(err, FailureCode::MalformedSubPath);
    }

    #[test]
    fn builds_uri_with_port_and_query() {
        let url = build_uri(Scheme::Https, "example.org", 8443, "/api/users", "?q=1")
            .expect("uri");
        assert_eq!(url.as_str(), "https://example.org:8443/api/users?q=1");
    }

    #[test]
    fn default_port_is_elided_by_url_normalization() {
        let url = build_uri(Scheme::Http, "example.org", 80, "/api", "").expect("uri");
        assert_eq!(url.as_str(), "http://example.org/api");
    }

    #[test]
    fn invalid_host_fails_with_cannot_create_uri() {
        let err = build_uri(Scheme::Http, "exa mple.org", 80, "/api", "")
            .expect_err("should fail");
        assert_eq!(err, FailureCode::CannotCreateUri);

        let err = build_uri(Scheme::Http, "", 80, "/api", "").expect_err("should fail");
        assert_eq!(err, FailureCode::CannotCreateUri);
    }
}
