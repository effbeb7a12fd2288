//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn empty_config_parses_to_defaults() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.store.profile_file.is_none());
        assert!(config.backend.timeout_secs.is_none());
        assert!(config.filter.include.is_empty());
        assert!(config.filter.exclude.is_empty());
        assert!(!config.filter.exclude_wireless);
    }

    #[test]
    fn full_config_parses() {
        let config = TomlConfig::parse(
            r#"
            [store]
            profile_file = "D:/profiles/record.json"

            [backend]
            timeout_secs = 10

            [filter]
            include = ["^Ethernet"]
            exclude = ["^vEthernet", "^Bluetooth"]
            exclude_wireless = true
        "#,
        )
        .unwrap();

        assert_eq!(
            config.store.profile_file.as_deref(),
            Some("D:/profiles/record.json")
        );
        assert_eq!(config.backend.timeout_secs, Some(10));
        assert_eq!(config.filter.include, vec!["^Ethernet"]);
        assert_eq!(config.filter.exclude.len(), 2);
        assert!(config.filter.exclude_wireless);
    }

    #[test]
    fn partial_sections_are_allowed() {
        let config = TomlConfig::parse(
            r#"
            [backend]
            timeout_secs = 5
        "#,
        )
        .unwrap();

        assert_eq!(config.backend.timeout_secs, Some(5));
        assert!(config.store.profile_file.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = TomlConfig::parse(
            r#"
            [store]
            profile_flie = "typo.json"
        "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(TomlConfig::parse("[webhook]\nurl = \"x\"").is_err());
    }

    #[test]
    fn invalid_toml_reports_a_parse_error() {
        let result = TomlConfig::parse("[store\nprofile_file = ");
        assert!(result.is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_is_valid_toml() {
        let template = default_config_template();
        let config = TomlConfig::parse(&template).unwrap();

        // Everything in the template is commented out.
        assert!(config.store.profile_file.is_none());
        assert!(config.backend.timeout_secs.is_none());
    }

    #[test]
    fn default_template_documents_every_section() {
        let template = default_config_template();

        assert!(template.contains("[store]"));
        assert!(template.contains("[backend]"));
        assert!(template.contains("[filter]"));
    }
}
