use std::io;

/// Errors from guide acquisition, resolution and output.
///
/// `Fetch`, `Decompress` and `Parse` abort a guide run. `MalformedTimestamp`
/// and `ChannelNotFound` are expected per-record outcomes that callers count
/// and skip. `Io` and `Serde` come from the output sinks.
#[derive(thiserror::Error, Debug)]
pub enum EpgError {
    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("fetch failed for {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    #[error("decompress failed for {source_name}: {message}")]
    Decompress {
        source_name: String,
        message: String,
    },

    #[error("invalid xmltv document from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_timestamp_quotes_input() {
        let err = EpgError::MalformedTimestamp("2025110".into());
        assert_eq!(err.to_string(), "malformed timestamp: \"2025110\"");
    }

    #[test]
    fn channel_not_found_displays_request() {
        let err = EpgError::ChannelNotFound("Sony SAB".into());
        assert_eq!(err.to_string(), "channel not found: Sony SAB");
    }

    #[test]
    fn source_errors_name_the_source() {
        let fetch = EpgError::Fetch {
            source_name: "jio".into(),
            message: "connection refused".into(),
        };
        assert_eq!(fetch.to_string(), "fetch failed for jio: connection refused");

        let decompress = EpgError::Decompress {
            source_name: "tata".into(),
            message: "invalid gzip header".into(),
        };
        assert_eq!(
            decompress.to_string(),
            "decompress failed for tata: invalid gzip header"
        );

        let parse = EpgError::Parse {
            source_name: "uk".into(),
            message: "unexpected end of stream".into(),
        };
        assert_eq!(
            parse.to_string(),
            "invalid xmltv document from uk: unexpected end of stream"
        );
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err: EpgError = io_err.into();
        assert!(matches!(err, EpgError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EpgError>();
    }
}
