use regex::Regex;
use std::fmt;

/// Redacts channel API keys from text before it reaches a log line.
///
/// Keys travel as `api_key=...` query/form parameters and occasionally come
/// back echoed in JSON error bodies.
#[derive(Clone)]
pub struct SecretScrubber {
    key_param_pattern: Regex,
    key_json_pattern: Regex,
}

impl SecretScrubber {
    /// Create a new secret scrubber
    pub fn new() -> Self {
        Self {
            // api_key=ABC123 / write_key=... in URLs and form bodies
            key_param_pattern: Regex::new(r"(?i)\b((?:api|read|write)_?key)=([^&\s]+)")
                .expect("key parameter pattern is valid"),
            // "api_key": "ABC123" in JSON
            key_json_pattern: Regex::new(
                r#"(?i)"((?:api|read|write)_?key)"\s*:\s*"[^"]*""#,
            )
            .expect("key json pattern is valid"),
        }
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = self
            .key_param_pattern
            .replace_all(message, "$1=[REDACTED]");
        self.key_json_pattern
            .replace_all(&scrubbed, r#""$1": "[REDACTED]""#)
            .to_string()
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_query_parameter() {
        let scrubber = SecretScrubber::new();
        let message = "GET https://api.thingspeak.com/channels/1/feeds.json?api_key=LU6Z7ZBGVF0H49OX&results=30";
        let scrubbed = scrubber.scrub_message(message);

        assert!(!scrubbed.contains("LU6Z7ZBGVF0H49OX"));
        assert!(scrubbed.contains("api_key=[REDACTED]&results=30"));
    }

    #[test]
    fn test_scrub_form_body() {
        let scrubber = SecretScrubber::new();
        let scrubbed = scrubber.scrub_message("api_key=3UGWIIJ540HY5GMT&field1=A1&field2=Ana");

        assert!(!scrubbed.contains("3UGWIIJ540HY5GMT"));
        assert!(scrubbed.contains("field1=A1"));
    }

    #[test]
    fn test_scrub_json_field() {
        let scrubber = SecretScrubber::new();
        let scrubbed = scrubber.scrub_message(r#"{"status":"401","write_key": "YE5B61469RDB8F80"}"#);

        assert!(!scrubbed.contains("YE5B61469RDB8F80"));
        assert!(scrubbed.contains(r#""write_key": "[REDACTED]""#));
    }

    #[test]
    fn test_no_secrets_unchanged() {
        let scrubber = SecretScrubber::new();
        let message = "channel feed fetched records=12";
        assert_eq!(scrubber.scrub_message(message), message);
    }
}
