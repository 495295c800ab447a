// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use coin_tracker_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn unavailable() {
        let err = CoreError::Unavailable;
        assert_eq!(
            err.to_string(),
            "Data unavailable: remote source unreachable and no cached copy"
        );
    }

    #[test]
    fn not_found() {
        let err = CoreError::NotFound("dogecoin".into());
        assert_eq!(err.to_string(), "Coin not found: dogecoin");
    }

    #[test]
    fn not_found_empty_id() {
        let err = CoreError::NotFound(String::new());
        assert_eq!(err.to_string(), "Coin not found: ");
    }

    #[test]
    fn remote_failure() {
        let err = CoreError::RemoteFailure("HTTP 503".into());
        assert_eq!(err.to_string(), "Remote source failure: HTTP 503");
    }

    #[test]
    fn invalid_credentials() {
        let err = CoreError::InvalidCredentials;
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn invalid_credentials_names_no_field() {
        // The message must not hint at whether the email or the
        // password was wrong
        let display = CoreError::InvalidCredentials.to_string();
        assert!(!display.to_lowercase().contains("email"));
        assert!(!display.to_lowercase().contains("password"));
    }

    #[test]
    fn user_exists() {
        let err = CoreError::UserExists("ada@example.com".into());
        assert_eq!(err.to_string(), "User already exists: ada@example.com");
    }

    #[test]
    fn storage_corrupt() {
        let err = CoreError::StorageCorrupt("bad header".into());
        assert_eq!(err.to_string(), "Local store corrupted: bad header");
    }

    #[test]
    fn storage_corrupt_empty_message() {
        let err = CoreError::StorageCorrupt(String::new());
        assert_eq!(err.to_string(), "Local store corrupted: ");
    }
}

// ── Debug trait ─────────────────────────────────────────────────────

mod debug_trait {
    use super::*;

    #[test]
    fn all_variants_are_debug() {
        // Ensure Debug is derived and doesn't panic
        let variants: Vec<CoreError> = vec![
            CoreError::Unavailable,
            CoreError::NotFound("test".into()),
            CoreError::RemoteFailure("test".into()),
            CoreError::InvalidCredentials,
            CoreError::UserExists("test".into()),
            CoreError::StorageCorrupt("test".into()),
        ];

        for variant in &variants {
            let debug = format!("{:?}", variant);
            assert!(!debug.is_empty());
        }
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_io_error_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        match &core_err {
            CoreError::StorageCorrupt(msg) => assert!(msg.contains("file not found")),
            other => panic!("Expected StorageCorrupt, got {:?}", other),
        }
    }

    #[test]
    fn from_io_error_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let core_err: CoreError = io_err.into();
        match &core_err {
            CoreError::StorageCorrupt(msg) => assert!(msg.contains("access denied")),
            other => panic!("Expected StorageCorrupt, got {:?}", other),
        }
    }

    #[test]
    fn from_io_error_preserves_message() {
        let msg = "custom IO error with special chars: ąść";
        let io_err = std::io::Error::other(msg);
        let core_err: CoreError = io_err.into();
        match &core_err {
            CoreError::StorageCorrupt(m) => assert!(m.contains(msg)),
            other => panic!("Expected StorageCorrupt, got {:?}", other),
        }
    }

    #[test]
    fn from_bincode_error() {
        // Trigger a real bincode deserialization error
        let bad_data: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];
        let result: Result<String, _> = bincode::deserialize(bad_data);
        let bincode_err = result.unwrap_err();
        let core_err: CoreError = bincode_err.into();
        match &core_err {
            CoreError::StorageCorrupt(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected StorageCorrupt, got {:?}", other),
        }
    }

    #[test]
    fn from_serde_json_error() {
        // Trigger a real serde_json error
        let result: Result<String, _> = serde_json::from_str("{{invalid json");
        let json_err = result.unwrap_err();
        let core_err: CoreError = json_err.into();
        match &core_err {
            CoreError::RemoteFailure(msg) => {
                assert!(!msg.is_empty());
                // serde_json errors include line/column info
            }
            other => panic!("Expected RemoteFailure, got {:?}", other),
        }
    }

    #[test]
    fn from_serde_json_error_eof() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("");
        let json_err = result.unwrap_err();
        let core_err: CoreError = json_err.into();
        match &core_err {
            CoreError::RemoteFailure(msg) => assert!(msg.contains("EOF")),
            other => panic!("Expected RemoteFailure, got {:?}", other),
        }
    }

    #[test]
    fn from_reqwest_error() {
        // A request builder error is the one reqwest failure we can
        // produce without touching the network
        let reqwest_err = reqwest::Client::new()
            .get("this is not a url")
            .build()
            .unwrap_err();
        let core_err: CoreError = reqwest_err.into();
        match &core_err {
            CoreError::RemoteFailure(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected RemoteFailure, got {:?}", other),
        }
    }
}

// ── Error is std::error::Error ──────────────────────────────────────

mod std_error {
    use super::*;

    #[test]
    fn core_error_implements_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(CoreError::NotFound("test".into()));
        // Should compile and Display should work
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn core_error_implements_send() {
        fn assert_send<T: Send>() {}
        assert_send::<CoreError>();
    }

    #[test]
    fn core_error_implements_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<CoreError>();
    }
}

// ── Edge cases ──────────────────────────────────────────────────────

mod edge_cases {
    use super::*;

    #[test]
    fn very_long_error_message() {
        let long_msg = "x".repeat(10_000);
        let err = CoreError::RemoteFailure(long_msg.clone());
        assert_eq!(
            err.to_string(),
            format!("Remote source failure: {}", long_msg)
        );
    }

    #[test]
    fn unicode_in_error_message() {
        let err = CoreError::NotFound("比特币".into());
        assert_eq!(err.to_string(), "Coin not found: 比特币");
    }

    #[test]
    fn newlines_in_error_message() {
        let err = CoreError::StorageCorrupt("line1\nline2\nline3".into());
        let display = err.to_string();
        assert!(display.contains("line1\nline2\nline3"));
    }

    #[test]
    fn user_exists_with_plus_addressing() {
        let err = CoreError::UserExists("ada+coins@example.com".into());
        let display = err.to_string();
        assert!(display.contains("ada+coins@example.com"));
    }
}
