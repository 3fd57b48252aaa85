//! Tests for the service state and its shared handle.

use super::*;

fn info(ip: &str) -> IpInfo {
    IpInfo {
        ip: ip.to_string(),
        asn: "AS12345".to_string(),
        as_name: "Example Networks".to_string(),
        as_domain: "example.net".to_string(),
        country_code: "US".to_string(),
        country: "United States".to_string(),
        continent_code: "NA".to_string(),
        continent: "North America".to_string(),
    }
}

mod transitions {
    use super::*;

    #[test]
    fn starts_updating_without_info() {
        let state = ServiceState::new();

        assert_eq!(state.status, Status::Updating);
        assert!(state.info.is_none());
        assert_eq!(state, ServiceState::default());
    }

    #[test]
    fn failure_before_any_success_keeps_info_absent() {
        let mut state = ServiceState::new();

        state.begin_update();
        state.fail();

        assert_eq!(state.status, Status::Error);
        assert!(state.info.is_none());
    }

    #[test]
    fn success_sets_ready_with_info() {
        let mut state = ServiceState::new();

        state.begin_update();
        state.complete(info("203.0.113.10"));

        assert_eq!(state.status, Status::Ready);
        assert_eq!(state.info, Some(info("203.0.113.10")));
    }

    #[test]
    fn failure_after_success_retains_info() {
        let mut state = ServiceState::new();
        state.complete(info("203.0.113.10"));

        state.begin_update();
        assert_eq!(state.status, Status::Updating);
        assert_eq!(state.info, Some(info("203.0.113.10")));

        state.fail();
        assert_eq!(state.status, Status::Error);
        assert_eq!(state.info, Some(info("203.0.113.10")));
    }

    #[test]
    fn info_is_absent_iff_no_success_for_mixed_sequences() {
        // true = success, false = failure
        let sequences: &[&[bool]] = &[
            &[],
            &[false],
            &[false, false, false],
            &[true],
            &[false, true],
            &[true, false, false],
            &[false, true, false, true, false],
        ];

        for sequence in sequences {
            let mut state = ServiceState::new();
            for (i, &ok) in sequence.iter().enumerate() {
                state.begin_update();
                if ok {
                    state.complete(info(&format!("198.51.100.{i}")));
                } else {
                    state.fail();
                }
            }

            let any_success = sequence.iter().any(|&ok| ok);
            assert_eq!(state.info.is_some(), any_success, "sequence {sequence:?}");
        }
    }
}

mod encoding {
    use super::*;

    #[test]
    fn ready_state_has_full_info_object() {
        let mut state = ServiceState::new();
        state.complete(info("203.0.113.10"));

        let value: serde_json::Value = serde_json::from_slice(&state.to_json().unwrap()).unwrap();

        assert_eq!(value["status"], "ready");
        assert_eq!(value["info"]["ip"], "203.0.113.10");
        assert_eq!(value["info"]["asn"], "AS12345");
        assert_eq!(value["info"]["continent"], "North America");
    }

    #[test]
    fn updating_state_without_info_encodes_null() {
        let json = ServiceState::new().to_json().unwrap();

        assert_eq!(json, br#"{"status":"updating","info":null}"#);
    }

    #[test]
    fn error_state_keeps_stale_info() {
        let mut state = ServiceState::new();
        state.complete(info("203.0.113.10"));
        state.fail();

        let value: serde_json::Value = serde_json::from_slice(&state.to_json().unwrap()).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["info"]["ip"], "203.0.113.10");
    }

    #[test]
    fn decodes_what_it_encodes() {
        let mut state = ServiceState::new();
        state.complete(info("2001:db8::1"));

        let decoded = ServiceState::from_json(&state.to_json().unwrap()).unwrap();

        assert_eq!(decoded, state);
    }

    #[test]
    fn decode_rejects_unknown_status() {
        let result = ServiceState::from_json(br#"{"status":"stale","info":null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn status_display_matches_wire_name() {
        assert_eq!(Status::Updating.to_string(), "updating");
        assert_eq!(Status::Ready.to_string(), "ready");
        assert_eq!(Status::Error.to_string(), "error");
    }
}

mod handle {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = StateHandle::new();
        let other = handle.clone();

        handle.complete(info("203.0.113.10"));

        assert_eq!(other.snapshot().status, Status::Ready);
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let handle = StateHandle::new();
        handle.complete(info("203.0.113.10"));
        let before = handle.snapshot();

        handle.begin_update();
        handle.fail();

        assert_eq!(before.status, Status::Ready);
        assert_eq!(handle.snapshot().status, Status::Error);
    }

    #[tokio::test]
    async fn subscribers_see_each_transition() {
        let handle = StateHandle::new();
        let mut rx = handle.subscribe();

        handle.begin_update();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status, Status::Updating);

        handle.complete(info("203.0.113.10"));
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.status, Status::Ready);
        assert_eq!(seen.info.unwrap().ip, "203.0.113.10");
    }

    #[test]
    fn writes_without_subscribers_are_kept() {
        let handle = StateHandle::new();

        handle.complete(info("203.0.113.10"));

        assert_eq!(handle.snapshot().info.unwrap().ip, "203.0.113.10");
    }
}
