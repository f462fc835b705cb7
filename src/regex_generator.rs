use crate::Error;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PARAM_NAME_RE: Regex = Regex::new(r"^\w+$").unwrap();
}

// One or more word characters or hyphens, never a slash.
const PARAM_VALUE_RE: &str = r"([\w-]+)";

/// Compiles `path` into a regex that matches the whole path, tolerating one trailing slash.
pub(crate) fn generate_exact_match_regex(path: &str) -> crate::Result<(Regex, Vec<String>)> {
    let (body, params) = translate(path)?;

    let re_str = if body.is_empty() {
        String::from("^/$")
    } else {
        format!("^{}/?$", body)
    };

    compile(path, &re_str).map(|re| (re, params))
}

/// Compiles `path` into a regex that matches `path` at the start of a candidate.
///
/// The regex is not anchored at the end. Callers check that the match stops on a segment boundary.
pub(crate) fn generate_prefix_match_regex(path: &str) -> crate::Result<(Regex, Vec<String>)> {
    let (body, params) = translate(path)?;
    compile(path, &format!("^{}", body)).map(|re| (re, params))
}

fn compile(path: &str, re_str: &str) -> crate::Result<Regex> {
    Regex::new(re_str).map_err(|e| Error::invalid_pattern(path, e.to_string()))
}

fn translate(path: &str) -> crate::Result<(String, Vec<String>)> {
    if !path.starts_with('/') {
        return Err(Error::invalid_pattern(path, "a route pattern must start with '/'"));
    }

    let trimmed = path.trim_end_matches('/');
    let mut body = String::with_capacity(trimmed.len() + 16);
    let mut params: Vec<String> = Vec::new();

    for segment in trimmed.split('/').skip(1) {
        body.push('/');

        match segment.strip_prefix(':') {
            Some(name) => {
                if !PARAM_NAME_RE.is_match(name) {
                    return Err(Error::invalid_pattern(
                        path,
                        format!("{:?} is not a valid parameter name", segment),
                    ));
                }
                if params.iter().any(|p| p == name) {
                    return Err(Error::DuplicateParam {
                        pattern: path.to_owned(),
                        name: name.to_owned(),
                    });
                }
                params.push(name.to_owned());
                body.push_str(PARAM_VALUE_RE);
            }
            None => body.push_str(&regex::escape(segment)),
        }
    }

    Ok((body, params))
}
