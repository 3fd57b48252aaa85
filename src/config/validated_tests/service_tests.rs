//! Tests for `ServiceConfig` validation.

use super::*;

mod token {
    use super::*;

    #[test]
    fn missing_token_returns_error() {
        let result = ServiceConfig::from_raw(&cli(&["service"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired { field: "token", .. })
        ));
    }

    #[test]
    fn blank_token_returns_error() {
        let result = ServiceConfig::from_raw(&cli(&["service", "--token", "   "]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired { field: "token", .. })
        ));
    }

    #[test]
    fn token_is_trimmed() {
        let config = ServiceConfig::from_raw(&cli(&["service", "--token", " abc "]), None).unwrap();

        assert_eq!(config.token, "abc");
    }

    #[test]
    fn token_not_shown_in_display() {
        let config = ServiceConfig::from_raw(&cli(&["service", "--token", "hunter2"]), None).unwrap();

        assert!(!config.to_string().contains("hunter2"));
    }
}

mod defaults {
    use super::*;

    #[test]
    fn only_token_given() {
        let config = ServiceConfig::from_raw(&cli(&["service", "-t", "secret"]), None).unwrap();

        assert_eq!(config.endpoint.as_str(), "https://api.ipinfo.io/lite/me");
        assert_eq!(config.lookup_timeout, Duration::from_secs(5));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.watch_interval, Duration::from_secs(3));
        assert_eq!(config.route_program, "ip");
        assert_eq!(config.route_args, vec!["route", "show"]);
        assert_eq!(
            config.target,
            PublishTarget::Socket {
                path: PathBuf::from("/tmp/extip.sock")
            }
        );
        assert!(!config.verbose);
    }

    #[test]
    fn kv_target_defaults() {
        let config =
            ServiceConfig::from_raw(&cli(&["service", "-t", "secret", "--publish", "kv"]), None)
                .unwrap();

        assert_eq!(
            config.target,
            PublishTarget::Kv {
                url: "redis://127.0.0.1/".to_string(),
                key: "external_ip_info".to_string(),
            }
        );
    }
}

mod durations {
    use super::*;

    #[test]
    fn zero_refresh_interval_rejected() {
        let result = ServiceConfig::from_raw(
            &cli(&["service", "-t", "x", "--refresh-interval", "0"]),
            None,
        );

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "refresh_interval",
                ..
            })
        ));
    }

    #[test]
    fn zero_lookup_timeout_rejected() {
        let result = ServiceConfig::from_raw(
            &cli(&["service", "-t", "x", "--lookup-timeout", "0"]),
            None,
        );

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "lookup_timeout",
                ..
            })
        ));
    }

    #[test]
    fn zero_watch_interval_rejected() {
        let result = ServiceConfig::from_raw(
            &cli(&["service", "-t", "x", "--watch-interval", "0"]),
            None,
        );

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "watch_interval",
                ..
            })
        ));
    }

    #[test]
    fn watch_equal_to_refresh_rejected() {
        let result = ServiceConfig::from_raw(
            &cli(&[
                "service",
                "-t",
                "x",
                "--refresh-interval",
                "10",
                "--watch-interval",
                "10",
            ]),
            None,
        );

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "watch_interval",
                ..
            })
        ));
    }

    #[test]
    fn watch_longer_than_default_refresh_rejected() {
        let result = ServiceConfig::from_raw(
            &cli(&["service", "-t", "x", "--watch-interval", "90"]),
            None,
        );

        assert!(matches!(result, Err(ConfigError::InvalidDuration { .. })));
    }

    #[test]
    fn watch_just_below_refresh_accepted() {
        let config = ServiceConfig::from_raw(
            &cli(&[
                "service",
                "-t",
                "x",
                "--refresh-interval",
                "10",
                "--watch-interval",
                "9",
            ]),
            None,
        )
        .unwrap();

        assert_eq!(config.watch_interval, Duration::from_secs(9));
    }
}

mod urls {
    use super::*;

    #[test]
    fn invalid_endpoint_rejected() {
        let result =
            ServiceConfig::from_raw(&cli(&["service", "-t", "x", "--endpoint", "not a url"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let result = ServiceConfig::from_raw(
            &cli(&["service", "-t", "x", "--endpoint", "ftp://example.com/me"]),
            None,
        );

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn invalid_kv_scheme_rejected() {
        let result = ServiceConfig::from_raw(
            &cli(&[
                "service",
                "-t",
                "x",
                "--publish",
                "kv",
                "--kv-url",
                "http://127.0.0.1/",
            ]),
            None,
        );

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn kv_url_ignored_for_socket_target() {
        let config = ServiceConfig::from_raw(
            &cli(&["service", "-t", "x", "--kv-url", "http://127.0.0.1/"]),
            None,
        )
        .unwrap();

        assert!(matches!(config.target, PublishTarget::Socket { .. }));
    }

    #[test]
    fn empty_kv_key_rejected() {
        let result = ServiceConfig::from_raw(
            &cli(&["service", "-t", "x", "--publish", "kv", "--kv-key", " "]),
            None,
        );

        assert!(matches!(
            result,
            Err(ConfigError::EmptyValue { field: "kv_key" })
        ));
    }
}

mod route_command {
    use super::*;

    #[test]
    fn split_on_whitespace() {
        let toml = toml(
            r#"
            [service]
            route_command = "  ip  -4 route   show table main "
        "#,
        );

        let config = ServiceConfig::from_raw(&cli(&["service", "-t", "x"]), Some(&toml)).unwrap();

        assert_eq!(config.route_program, "ip");
        assert_eq!(config.route_args, vec!["-4", "route", "show", "table", "main"]);
    }

    #[test]
    fn blank_command_rejected() {
        let toml = toml(
            r#"
            [service]
            route_command = "   "
        "#,
        );

        let result = ServiceConfig::from_raw(&cli(&["service", "-t", "x"]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::EmptyValue {
                field: "route_command"
            })
        ));
    }
}

mod publish_target {
    use super::*;

    #[test]
    fn unknown_toml_target_rejected() {
        let toml = toml(
            r#"
            [publish]
            target = "carrier-pigeon"
        "#,
        );

        let result = ServiceConfig::from_raw(&cli(&["service", "-t", "x"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidTarget { .. })));
    }

    #[test]
    fn toml_target_is_case_insensitive() {
        let toml = toml(
            r#"
            [publish]
            target = "KV"
        "#,
        );

        let config = ServiceConfig::from_raw(&cli(&["service", "-t", "x"]), Some(&toml)).unwrap();

        assert!(matches!(config.target, PublishTarget::Kv { .. }));
    }
}
