//! Tests for validated configuration.

use std::path::Path;
use std::time::Duration;

use crate::network::AdapterDescriptor;
use crate::network::filter::AdapterFilter;

use super::ConfigError;
use super::cli::Cli;
use super::defaults;
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["ipswitch"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

fn wired(name: &str) -> AdapterDescriptor {
    AdapterDescriptor::new(name, name, "Test NIC", 1, false)
}

fn wireless(name: &str) -> AdapterDescriptor {
    AdapterDescriptor::new(name, name, "Test WLAN", 2, true)
}

mod precedence {
    use super::*;

    #[test]
    fn defaults_apply_without_cli_or_toml() {
        let config = ValidatedConfig::from_raw(&cli(&["list"]), None).unwrap();

        assert_eq!(config.profile_file, defaults::profile_path());
        assert_eq!(config.timeout, defaults::command_timeout());
        assert!(config.filter.is_empty());
        assert!(!config.verbose);
    }

    #[test]
    fn cli_profile_file_overrides_toml() {
        let cli = cli(&["list", "--profile-file", "cli.json"]);
        let toml = toml(
            r#"
            [store]
            profile_file = "toml.json"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.profile_file, Path::new("cli.json"));
    }

    #[test]
    fn toml_profile_file_beats_default() {
        let toml = toml(
            r#"
            [store]
            profile_file = "toml.json"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml)).unwrap();

        assert_eq!(config.profile_file, Path::new("toml.json"));
    }

    #[test]
    fn cli_timeout_overrides_toml() {
        let cli = cli(&["list", "--timeout", "5"]);
        let toml = toml(
            r#"
            [backend]
            timeout_secs = 60
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["list", "--timeout", "0"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "timeout",
                ..
            })
        ));
    }

    #[test]
    fn verbose_comes_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["list", "--verbose"]), None).unwrap();
        assert!(config.verbose);
    }
}

mod filters {
    use super::*;

    #[test]
    fn cli_include_patterns_replace_toml_patterns() {
        let cli = cli(&["list", "--include", "^Wi-Fi"]);
        let toml = toml(
            r#"
            [filter]
            include = ["^Ethernet"]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert!(config.filter.matches(&wired("Wi-Fi")));
        assert!(!config.filter.matches(&wired("Ethernet0")));
    }

    #[test]
    fn toml_exclude_patterns_apply_when_cli_has_none() {
        let toml = toml(
            r#"
            [filter]
            exclude = ["^vEthernet"]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml)).unwrap();

        assert!(!config.filter.matches(&wired("vEthernet (WSL)")));
        assert!(config.filter.matches(&wired("Ethernet0")));
    }

    #[test]
    fn wired_only_excludes_wireless_adapters() {
        let config =
            ValidatedConfig::from_raw(&cli(&["list", "--wired-only"]), None).unwrap();

        assert!(config.filter.matches(&wired("Ethernet0")));
        assert!(!config.filter.matches(&wireless("Wi-Fi")));
    }

    #[test]
    fn toml_exclude_wireless_works_like_wired_only() {
        let toml = toml(
            r#"
            [filter]
            exclude_wireless = true
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml)).unwrap();

        assert!(!config.filter.matches(&wireless("Wi-Fi")));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["list", "--include", "["]), None);

        assert!(matches!(result, Err(ConfigError::InvalidRegex { .. })));
    }

    #[test]
    fn non_list_commands_still_honor_toml_filters() {
        // Patterns from TOML are compiled regardless of subcommand so a
        // broken config file fails fast, not only on `list`.
        let toml = toml(
            r#"
            [filter]
            exclude = ["^Bluetooth"]
        "#,
        );

        let config =
            ValidatedConfig::from_raw(&cli(&["show", "Ethernet0"]), Some(&toml)).unwrap();

        assert!(!config.filter.matches(&wired("Bluetooth Network")));
    }
}

mod config_file {
    use super::*;
    use super::super::validated::write_default_config;
    use tempfile::TempDir;

    #[test]
    fn load_reads_the_toml_file_named_on_the_cli() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipswitch.toml");
        std::fs::write(&path, "[backend]\ntimeout_secs = 7\n").unwrap();

        let cli = cli(&["list", "--config", path.to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn load_fails_for_a_missing_config_file() {
        let cli = cli(&["list", "--config", "/no/such/ipswitch.toml"]);

        assert!(matches!(
            ValidatedConfig::load(&cli),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn written_default_config_loads_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipswitch.toml");

        write_default_config(&path).unwrap();

        let cli = cli(&["list", "--config", path.to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();
        assert_eq!(config.timeout, defaults::command_timeout());
    }
}
