// User-friendly error messages
//
// Turns client failures into actionable messages for the operator at the
// console. The library itself returns plain `ClientError`s; only the CLI
// decorates them.

use crate::client::ClientError;
use crate::protocol::DeviceConfig;
use std::time::Duration;

/// Format a connection failure with helpful suggestions
pub fn connection_refused_error(address: &str) -> String {
    format!(
        "Could not connect to CharacterWorks at {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • CharacterWorks is not running\n\
        • The HTTP remote control server is disabled\n\
        • Wrong host or port\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Enable the HTTP server in CharacterWorks and note its port\n\n\
        2. Check the configured target:\n\
           \x1b[36mcat ~/.characterworks/config.toml\x1b[0m\n\n\
        3. Check the port is reachable:\n\
           \x1b[36mcurl -X POST -d '{{\"action\":\"list_motions\"}}' http://{}/\x1b[0m",
        address, address
    )
}

/// Format a timeout with helpful suggestions
pub fn timeout_error(address: &str, timeout: Duration) -> String {
    format!(
        "CharacterWorks at {} did not answer within {:?}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • The device is busy rendering or loading a project\n\
        • A firewall is dropping packets\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Re-run the command once the device is idle\n\n\
        2. Raise the deadline in ~/.characterworks/config.toml:\n\
           \x1b[36m[client]\n\
           timeout_seconds = 30\x1b[0m",
        address, timeout
    )
}

/// Format a response that did not match the expected shape
pub fn validation_error(details: &str) -> String {
    format!(
        "CharacterWorks returned an unexpected response\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • The CharacterWorks version speaks a different API revision\n\
        • The command was sent to the wrong port\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        Re-run without --validate to inspect the raw response",
        details
    )
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(error: &str) -> String {
    format!(
        "Failed to parse config file\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat ~/.characterworks/config.toml\x1b[0m\n\n\
        2. Common mistakes:\n\
           • Missing quotes around the host\n\
           • Port written as a string\n\
           • Keys outside the [device] or [client] tables",
        error
    )
}

/// Pick the operator message for a failed call
pub fn describe_client_error(error: &ClientError, target: &DeviceConfig) -> String {
    let address = format!("{}:{}", target.host, target.port);
    match error {
        ClientError::Transport { .. } => {
            format!("{}\n\n\x1b[1;33mDetails:\x1b[0m {}", connection_refused_error(&address), error)
        }
        ClientError::Timeout { timeout, .. } => timeout_error(&address, *timeout),
        ClientError::Validation(errors) => validation_error(&errors.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BoxError;

    fn target() -> DeviceConfig {
        DeviceConfig::new("127.0.0.1", 7000)
    }

    #[test]
    fn test_connection_refused_has_helpful_message() {
        let cause: BoxError = "connection refused".into();
        let err = ClientError::Transport {
            url: target().endpoint(),
            source: cause,
        };
        let msg = describe_client_error(&err, &target());
        assert!(msg.contains("127.0.0.1:7000"));
        assert!(msg.contains("config.toml"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_timeout_mentions_deadline() {
        let err = ClientError::Timeout {
            url: target().endpoint(),
            timeout: Duration::from_secs(10),
        };
        let msg = describe_client_error(&err, &target());
        assert!(msg.contains("10s"));
        assert!(msg.contains("timeout_seconds"));
    }

    #[test]
    fn test_status_error_passes_through() {
        let err = ClientError::Status {
            status: 404,
            status_text: "Not Found".to_string(),
            body: "Not found".to_string(),
        };
        assert_eq!(
            describe_client_error(&err, &target()),
            "HTTP 404 Not Found: Not found"
        );
    }
}
