use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;

static TMDB_API_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{32}$").unwrap());

// SOURCE: https://stackoverflow.com/a/3809435
static TMDB_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}(\.[a-zA-Z0-9()]{1,6})?(:\d+)?\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$").unwrap()
});

/// TMDB v3 API key, sent as the `api_key` query parameter
#[nutype(
    derive(Clone, Debug, Deserialize, Display, Serialize, AsRef, Deref, PartialEq),
    sanitize(trim, lowercase),
    validate(not_empty, regex = TMDB_API_KEY_REGEX)
)]
pub struct ApiKey(String);

#[nutype(
    derive(Clone, Debug, Default, Deserialize, Display, Serialize, AsRef, Deref, PartialEq),
    default = "https://api.themoviedb.org/3",
    sanitize(trim),
    validate(not_empty, regex = TMDB_URL_REGEX)
)]
pub struct TmdbUrl(String);

#[cfg(test)]
mod api_key_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_valid_api_key() {
        let valid = "0123456789abcdef0123456789abcdef";
        let result = ApiKey::try_new(valid).unwrap();
        assert_eq!(valid, result.into_inner());
    }

    #[test]
    fn test_api_key_is_trimmed_and_lowercased() {
        let result = ApiKey::try_new("  0123456789ABCDEF0123456789ABCDEF ").unwrap();
        assert_eq!("0123456789abcdef0123456789abcdef", result.into_inner());
    }

    #[test]
    fn test_invalid_api_key_empty() {
        let expected = Err(ApiKeyError::NotEmptyViolated);
        let result = ApiKey::try_new("");
        assert_eq!(expected, result);
    }

    #[test]
    fn test_invalid_api_key_regex() {
        let expected = Err(ApiKeyError::RegexViolated);

        let result = ApiKey::try_new("The sun set behind the grain silo.");
        assert_eq!(expected, result);

        let result = ApiKey::try_new("0123456789abcdef");
        assert_eq!(expected, result);

        let result = ApiKey::try_new("0123456789abcdef0123456789abcdeg");
        assert_eq!(expected, result);
    }
}
