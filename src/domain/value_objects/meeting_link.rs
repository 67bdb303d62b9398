use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeetingLinkError {
    #[error("Please provide a valid meeting link")]
    MissingCallId,
    #[error("Invalid meeting id")]
    InvalidCallId,
}

const MAX_CALL_ID_LEN: usize = 64;

/// Call ids are ASCII letters, digits, `-` and `_`.
pub fn validate_call_id(call_id: &str) -> Result<&str, MeetingLinkError> {
    let well_formed = !call_id.is_empty()
        && call_id.len() <= MAX_CALL_ID_LEN
        && call_id
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_');

    if well_formed {
        Ok(call_id)
    } else {
        Err(MeetingLinkError::InvalidCallId)
    }
}

/// Derives a call id from a pasted meeting URL or a raw id.
///
/// The id is the final `/`-separated path segment. Query strings, fragments
/// and trailing slashes are ignored. Anything that is not a well-formed call
/// id, such as `https:` or `..`, is rejected.
pub fn parse_call_id(input: &str) -> Result<String, MeetingLinkError> {
    let trimmed = input.trim();
    let without_fragment = trimmed.split('#').next().unwrap_or_default();
    let path = without_fragment.split('?').next().unwrap_or_default();

    let call_id = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(str::trim)
        .unwrap_or_default();

    validate_call_id(call_id)
        .map(str::to_string)
        .map_err(|_| MeetingLinkError::MissingCallId)
}

pub fn meeting_path(call_id: &str) -> String {
    format!("/meeting/{}", call_id)
}
