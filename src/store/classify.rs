//! Transport failure classification.
//!
//! The Qdrant client surfaces failures as gRPC statuses, hyper connect
//! errors and server messages. This is the one place that turns them into a
//! [`StoreFailure`]; callers never inspect messages themselves.

use thiserror::Error;

/// A vector store failure, tagged by what the operator should do about it.
///
/// Every variant keeps the original transport text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreFailure {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Unknown(String),
}

impl StoreFailure {
    /// Original transport text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m) | Self::Unreachable(m) | Self::AlreadyExists(m) | Self::Unknown(m) => m,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreFailure>;

const UNAUTHORIZED_MARKERS: &[&str] = &[
    "unauthorized",
    "unauthenticated",
    "permission denied",
    "permissiondenied",
    "invalid api key",
    "invalid api-key",
    "403 forbidden",
    "valid authentication credentials",
];

// Includes tonic's descriptions for `Code::Unavailable` and
// `Code::DeadlineExceeded` and the hyper connector messages behind them.
const UNREACHABLE_MARKERS: &[&str] = &[
    "econnrefused",
    "etimedout",
    "connection refused",
    "timed out",
    "deadline exceeded",
    "deadlineexceeded",
    "deadline expired",
    "deadline has elapsed",
    "tcp connect error",
    "dns error",
    "service is currently unavailable",
    "status: unavailable",
];

const ALREADY_EXISTS_MARKERS: &[&str] = &["already exists"];

/// Drop backtick-quoted spans. Qdrant quotes collection names that way and a
/// name must never decide the classification.
fn strip_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quoted = false;
    for c in text.chars() {
        if c == '`' {
            quoted = !quoted;
        } else if !quoted {
            out.push(c);
        }
    }
    out
}

/// Classify raw transport error text.
///
/// Matching is case-insensitive and ignores backtick-quoted names.
/// Already-exists wins over auth markers, which win over connectivity markers.
#[must_use]
pub fn classify_failure(text: &str) -> StoreFailure {
    let lowered = strip_quoted(text).to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    if has(ALREADY_EXISTS_MARKERS) {
        StoreFailure::AlreadyExists(text.to_string())
    } else if has(UNAUTHORIZED_MARKERS) {
        StoreFailure::Unauthorized(text.to_string())
    } else if has(UNREACHABLE_MARKERS) {
        StoreFailure::Unreachable(text.to_string())
    } else {
        StoreFailure::Unknown(text.to_string())
    }
}

/// Classify a gRPC response by its status code name (`tonic::Code` in
/// `Debug` form), falling back to [`classify_failure`] on `text` for codes
/// that say nothing on their own.
///
/// Qdrant reports a duplicate create as `InvalidArgument`, so that case is
/// still found through the text.
#[must_use]
pub fn classify_status(code: &str, text: &str) -> StoreFailure {
    match code {
        "Unauthenticated" | "PermissionDenied" => StoreFailure::Unauthorized(text.to_string()),
        "Unavailable" | "DeadlineExceeded" => StoreFailure::Unreachable(text.to_string()),
        "AlreadyExists" => StoreFailure::AlreadyExists(text.to_string()),
        _ => classify_failure(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized() {
        assert!(matches!(
            classify_failure("Request failed: unauthorized"),
            StoreFailure::Unauthorized(_)
        ));
        assert!(matches!(
            classify_failure(
                "Error in the response: The request does not have valid authentication credentials Unauthenticated"
            ),
            StoreFailure::Unauthorized(_)
        ));
        assert!(matches!(
            classify_failure("Invalid api-key"),
            StoreFailure::Unauthorized(_)
        ));
    }

    #[test]
    fn test_unreachable() {
        assert!(matches!(
            classify_failure("connect ECONNREFUSED 127.0.0.1:6333"),
            StoreFailure::Unreachable(_)
        ));
        assert!(matches!(
            classify_failure("connect ETIMEDOUT 10.0.0.1:6333"),
            StoreFailure::Unreachable(_)
        ));
        assert!(matches!(
            classify_failure(
                "Error in the response: The service is currently unavailable tcp connect error: Connection refused (os error 111)"
            ),
            StoreFailure::Unreachable(_)
        ));
    }

    #[test]
    fn test_already_exists() {
        let failure = classify_failure("Wrong input: Collection `docs` already exists!");
        assert_eq!(
            failure,
            StoreFailure::AlreadyExists("Wrong input: Collection `docs` already exists!".into())
        );
    }

    #[test]
    fn test_unknown_preserves_text_verbatim() {
        let failure = classify_failure("Bad request: vector size 0 is invalid");
        assert_eq!(
            failure,
            StoreFailure::Unknown("Bad request: vector size 0 is invalid".into())
        );
        assert_eq!(failure.message(), "Bad request: vector size 0 is invalid");
    }

    #[test]
    fn test_auth_beats_connectivity() {
        // A rejected key reported through a timed-out retry is still an auth problem.
        assert!(matches!(
            classify_failure("unauthorized after request timed out"),
            StoreFailure::Unauthorized(_)
        ));
    }

    #[test]
    fn test_already_exists_ignores_collection_name() {
        for name in ["project-deadlines", "unavailable-items", "forbidden-lore", "unauthorized-notes"] {
            let text = format!("Wrong input: Collection `{name}` already exists!");
            assert_eq!(classify_failure(&text), StoreFailure::AlreadyExists(text.clone()), "{name}");
        }
    }

    #[test]
    fn test_not_found_with_marker_like_name_is_unknown() {
        let text = "Not found: Collection `forbidden-lore` doesn't exist!";
        assert_eq!(classify_failure(text), StoreFailure::Unknown(text.into()));

        let text = "Not found: Collection `service-unavailable` doesn't exist!";
        assert_eq!(classify_failure(text), StoreFailure::Unknown(text.into()));
    }

    #[test]
    fn test_bare_words_are_not_markers() {
        assert!(matches!(classify_failure("deadline"), StoreFailure::Unknown(_)));
        assert!(matches!(classify_failure("forbidden"), StoreFailure::Unknown(_)));
        assert!(matches!(classify_failure("unavailable"), StoreFailure::Unknown(_)));

        assert!(matches!(classify_failure("HTTP 403 Forbidden"), StoreFailure::Unauthorized(_)));
        assert!(matches!(
            classify_failure("status: Unavailable, message: \"connection reset\""),
            StoreFailure::Unreachable(_)
        ));
        assert!(matches!(classify_failure("deadline exceeded"), StoreFailure::Unreachable(_)));
    }

    #[test]
    fn test_classify_status_uses_code() {
        let text = "Error in the response: Some requested entity already exists project-deadlines";
        assert_eq!(
            classify_status("Unauthenticated", "bad key"),
            StoreFailure::Unauthorized("bad key".into())
        );
        assert!(matches!(classify_status("PermissionDenied", "x"), StoreFailure::Unauthorized(_)));
        assert!(matches!(classify_status("Unavailable", "x"), StoreFailure::Unreachable(_)));
        assert!(matches!(classify_status("DeadlineExceeded", "x"), StoreFailure::Unreachable(_)));
        assert_eq!(classify_status("AlreadyExists", text), StoreFailure::AlreadyExists(text.into()));
    }

    #[test]
    fn test_classify_status_falls_back_to_text() {
        let race = "Error in the response: Client specified an invalid argument Wrong input: Collection `project-deadlines` already exists!";
        assert_eq!(classify_status("InvalidArgument", race), StoreFailure::AlreadyExists(race.into()));

        let missing = "Error in the response: Some requested entity was not found Not found: Collection `forbidden-lore` doesn't exist!";
        assert_eq!(classify_status("NotFound", missing), StoreFailure::Unknown(missing.into()));
    }
}
