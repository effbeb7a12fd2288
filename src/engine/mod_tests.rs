//! Tests for engine orchestration and backend call sequencing.

use super::*;

use crate::network::mock::{BackendCall, MockBackend};
use crate::network::{BackendError, DhcpState};

fn adapter(name: &str) -> AdapterDescriptor {
    AdapterDescriptor::new(name, name, "Test NIC", 4, false)
}

fn static_config(address: &str, subnet: &str) -> AdapterIpConfig {
    AdapterIpConfig {
        address: address.to_string(),
        subnet_mask: subnet.to_string(),
        gateway: "192.168.1.1".to_string(),
        dns_servers: vec!["8.8.8.8".to_string()],
        dhcp: DhcpState::Disabled,
    }
}

#[test]
fn list_adapters_passes_backend_results_through() {
    let backend = MockBackend::with_adapters(vec![adapter("Ethernet0"), adapter("Wi-Fi")]);
    let engine = ConfigurationEngine::new(backend);

    let list = engine.list_adapters();

    assert_eq!(list.adapters.len(), 2);
    assert!(list.warning.is_none());
}

#[test]
fn list_adapters_degrades_to_empty_with_warning() {
    let backend = MockBackend::new().failing_enumerate(BackendError::Unavailable {
        context: "powershell missing".to_string(),
    });
    let engine = ConfigurationEngine::new(backend);

    let list = engine.list_adapters();

    assert!(list.adapters.is_empty());
    let warning = list.warning.expect("degraded listing must carry a reason");
    assert!(warning.contains("powershell missing"));
}

#[test]
fn get_config_normalizes_prefix_notation_to_dotted_mask() {
    let backend =
        MockBackend::new().with_config("Ethernet0", static_config("192.168.1.50", "24"));
    let engine = ConfigurationEngine::new(backend);

    let report = engine.get_config("Ethernet0");

    assert_eq!(report.config.subnet_mask, "255.255.255.0");
    assert!(report.warning.is_none());
}

#[test]
fn get_config_maps_missing_subnet_to_sentinel() {
    let backend = MockBackend::new().with_config("Ethernet0", static_config("169.254.3.7", ""));
    let engine = ConfigurationEngine::new(backend);

    let report = engine.get_config("Ethernet0");

    assert_eq!(report.config.subnet_mask, SENTINEL_MASK);
    assert!(report.warning.is_none(), "an absent subnet is not an error");
}

#[test]
fn get_config_flags_garbage_subnet_and_keeps_going() {
    let backend =
        MockBackend::new().with_config("Ethernet0", static_config("192.168.1.50", "junk"));
    let engine = ConfigurationEngine::new(backend);

    let report = engine.get_config("Ethernet0");

    assert_eq!(report.config.subnet_mask, SENTINEL_MASK);
    assert!(report.warning.is_some());
}

#[test]
fn get_config_on_unknown_adapter_reports_unconfigured() {
    let engine = ConfigurationEngine::new(MockBackend::new());

    let report = engine.get_config("ghost");

    assert!(!report.config.has_address());
    assert!(report.warning.expect("must surface the reason").contains("ghost"));
}

#[test]
fn apply_static_clears_before_applying() {
    let engine = ConfigurationEngine::new(MockBackend::new());
    let spec = SubnetSpec::Prefix(16);

    let outcome = engine.apply_static(
        "Ethernet0",
        "192.168.1.50",
        &spec,
        Some("192.168.1.1"),
        &["8.8.8.8".to_string()],
    );

    assert!(outcome.success, "{}", outcome.detail);
    assert!(outcome.detail.contains("192.168.1.50/16"));

    let calls = engine.backend().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], BackendCall::ClearConfig("Ethernet0".to_string()));
    match &calls[1] {
        BackendCall::ApplyStatic(name, assignment) => {
            assert_eq!(name, "Ethernet0");
            assert_eq!(assignment.subnet_mask, "255.255.0.0");
            assert_eq!(assignment.prefix_length, 16);
            assert_eq!(assignment.gateway.as_deref(), Some("192.168.1.1"));
        }
        other => panic!("expected ApplyStatic, got {other:?}"),
    }
}

#[test]
fn apply_static_accepts_dotted_mask_input() {
    let engine = ConfigurationEngine::new(MockBackend::new());
    let spec = SubnetSpec::Mask("255.255.255.0".to_string());

    let outcome = engine.apply_static("Ethernet0", "10.0.0.2", &spec, None, &[]);

    assert!(outcome.success);
    match &engine.backend().calls()[1] {
        BackendCall::ApplyStatic(_, assignment) => {
            assert_eq!(assignment.prefix_length, 24);
            assert!(assignment.gateway.is_none());
            assert!(assignment.dns_servers.is_empty());
        }
        other => panic!("expected ApplyStatic, got {other:?}"),
    }
}

#[test]
fn apply_static_rejects_bad_address_without_touching_backend() {
    let engine = ConfigurationEngine::new(MockBackend::new());
    let spec = SubnetSpec::Prefix(24);

    let outcome = engine.apply_static("Ethernet0", "999.1.1.1", &spec, None, &[]);

    assert!(!outcome.success);
    assert!(outcome.detail.contains("999.1.1.1"));
    assert!(
        engine.backend().calls().is_empty(),
        "validation failures must not clear the adapter"
    );
}

#[test]
fn apply_static_rejects_bad_gateway_and_dns() {
    let engine = ConfigurationEngine::new(MockBackend::new());
    let spec = SubnetSpec::Prefix(24);

    let bad_gateway = engine.apply_static("Ethernet0", "10.0.0.2", &spec, Some("router"), &[]);
    assert!(!bad_gateway.success);

    let bad_dns = engine.apply_static(
        "Ethernet0",
        "10.0.0.2",
        &spec,
        None,
        &["dns.example".to_string()],
    );
    assert!(!bad_dns.success);

    assert!(engine.backend().calls().is_empty());
}

#[test]
fn apply_static_stops_when_the_clear_fails() {
    let backend = MockBackend::new().failing_mutation(BackendError::CommandFailed {
        detail: "netsh exploded".to_string(),
    });
    let engine = ConfigurationEngine::new(backend);

    let outcome = engine.apply_static(
        "Ethernet0",
        "10.0.0.2",
        &SubnetSpec::Prefix(24),
        None,
        &[],
    );

    assert!(!outcome.success);
    assert!(outcome.detail.contains("Clearing previous configuration"));
    assert_eq!(
        engine.backend().calls(),
        vec![BackendCall::ClearConfig("Ethernet0".to_string())],
        "apply must not run after a failed clear"
    );
}

#[test]
fn apply_static_failure_after_successful_clear_becomes_failed_outcome() {
    let backend = MockBackend::new()
        .passing_mutation()
        .failing_mutation(BackendError::CommandFailed {
            detail: "object already exists".to_string(),
        });
    let engine = ConfigurationEngine::new(backend);

    let outcome = engine.apply_static(
        "Ethernet0",
        "10.0.0.2",
        &SubnetSpec::Prefix(24),
        None,
        &[],
    );

    assert!(!outcome.success);
    assert!(outcome.detail.contains("Static configuration failed"));
    assert_eq!(engine.backend().calls().len(), 2, "both calls were issued");
}

#[test]
fn enable_dhcp_clears_first() {
    let engine = ConfigurationEngine::new(MockBackend::new());

    let outcome = engine.enable_dhcp("Wi-Fi");

    assert!(outcome.success);
    assert_eq!(
        engine.backend().calls(),
        vec![
            BackendCall::ClearConfig("Wi-Fi".to_string()),
            BackendCall::EnableDhcp("Wi-Fi".to_string()),
        ]
    );
}

#[test]
fn enable_dhcp_surfaces_adapter_not_found() {
    let backend = MockBackend::new().failing_mutation(BackendError::AdapterNotFound {
        name: "Ethernet7".to_string(),
    });
    let engine = ConfigurationEngine::new(backend);

    let outcome = engine.enable_dhcp("Ethernet7");

    assert!(!outcome.success);
    assert!(outcome.detail.contains("Ethernet7"));
}

#[test]
fn clear_config_is_a_single_backend_call() {
    let engine = ConfigurationEngine::new(MockBackend::new());

    let outcome = engine.clear_config("Ethernet0");

    assert!(outcome.success);
    assert_eq!(
        engine.backend().calls(),
        vec![BackendCall::ClearConfig("Ethernet0".to_string())]
    );
}

#[test]
fn outcome_display_marks_failures() {
    let ok = Outcome::succeeded("Ethernet0", "DHCP enabled");
    let bad = Outcome::failed("Ethernet0", "no such adapter");

    assert_eq!(ok.to_string(), "Ethernet0: DHCP enabled");
    assert!(bad.to_string().contains("FAILED"));
}
