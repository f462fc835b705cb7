use percent_encoding::percent_decode_str;

/// Percent-decodes a request path. Invalid UTF-8 sequences are replaced rather than rejected.
pub(crate) fn percent_decode_request_path(val: &str) -> String {
    percent_decode_str(val).decode_utf8_lossy().into_owned()
}

/// Checks that `rest`, the part of a path following a prefix match, starts on a segment boundary.
pub(crate) fn is_segment_boundary(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with('/')
}
