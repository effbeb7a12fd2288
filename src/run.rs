//! Command execution logic.
//!
//! This module dispatches parsed commands against the configuration engine
//! and the profile store. Handlers are generic over the backend so the whole
//! dispatch path is testable without touching the OS.

use std::net::Ipv4Addr;

use thiserror::Error;

use ipswitch::config::{Command, ProfileAction, ValidatedConfig};
use ipswitch::engine::{ConfigReport, ConfigurationEngine, Outcome};
use ipswitch::network::platform;
use ipswitch::network::{AdapterBackend, AdapterDescriptor, BackendError};
use ipswitch::profile::{IpProfile, LoadOutcome, ProfileError, ProfileStore};
use ipswitch::subnet::{SubnetError, SubnetSpec};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// How many DNS servers a rendered configuration shows.
///
/// All entries stay in the data model; only the presentation is capped.
const DNS_DISPLAY_LIMIT: usize = 2;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The OS backend could not be created.
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// An adapter operation ran and failed.
    #[error("{0}")]
    Operation(String),

    /// A subnet argument could not be parsed.
    #[error("{0}")]
    Subnet(#[from] SubnetError),

    /// A CLI address argument is not IPv4.
    #[error("Invalid {field} '{value}': not an IPv4 address")]
    InvalidAddress {
        /// Which argument was malformed.
        field: &'static str,
        /// The offending input.
        value: String,
    },

    /// The requested profile does not exist.
    #[error("No profile saved for address '{address}'")]
    ProfileNotFound {
        /// The address that was looked up.
        address: String,
    },

    /// The profile store could not be written.
    #[error("{0}")]
    ProfileSave(#[from] ProfileError),
}

/// Executes a parsed command against the live platform backend.
///
/// # Errors
///
/// Returns a [`RunError`] when the backend cannot be created, an adapter
/// operation fails, or the profile store cannot be written.
///
/// # Coverage Note
///
/// Excluded from coverage because it binds to the platform backend; the
/// generic [`dispatch`] underneath carries the logic and the tests.
#[cfg(not(tarpaulin_include))]
pub fn execute(command: &Command, config: ValidatedConfig) -> Result<(), RunError> {
    let (mut store, outcome) = ProfileStore::open(&config.profile_file);
    log_load_outcome(&store, &outcome);

    // Profile bookkeeping works even where no backend exists.
    if let Command::Profile { action } = command {
        if !action_needs_backend(action) {
            let no_engine = None::<&ConfigurationEngine<platform::PlatformBackend>>;
            return run_profile_action(action, no_engine, &mut store);
        }
    }

    let backend = platform::default_backend(config.timeout)?;
    let engine = ConfigurationEngine::new(backend);
    dispatch(command, &config, &engine, &mut store)
}

fn log_load_outcome(store: &ProfileStore, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded(count) => {
            tracing::debug!("Loaded {count} profile(s) from {}", store.path().display());
        }
        LoadOutcome::Created => {
            tracing::debug!("Created profile store at {}", store.path().display());
        }
        LoadOutcome::Unreadable { reason } => {
            tracing::warn!("Profile store unreadable ({reason}), starting empty");
        }
    }
}

const fn action_needs_backend(action: &ProfileAction) -> bool {
    matches!(action, ProfileAction::Apply { .. })
}

/// Dispatches one command against an engine and a store.
fn dispatch<B: AdapterBackend>(
    command: &Command,
    config: &ValidatedConfig,
    engine: &ConfigurationEngine<B>,
    store: &mut ProfileStore,
) -> Result<(), RunError> {
    match command {
        Command::List { .. } => run_list(engine, config),
        Command::Show { adapter } => run_show(engine, adapter),
        Command::Set {
            adapter,
            address,
            mask,
            prefix,
            gateway,
            dns,
        } => {
            let spec = SubnetSpec::resolve(mask.as_deref(), prefix.as_deref())?;
            finish(engine.apply_static(adapter, address, &spec, gateway.as_deref(), dns))
        }
        Command::Dhcp { adapter } => finish(engine.enable_dhcp(adapter)),
        Command::Clear { adapter } => finish(engine.clear_config(adapter)),
        Command::Profile { action } => run_profile_action(action, Some(engine), store),
        // Handled in main before dispatch.
        Command::Init { .. } => Ok(()),
    }
}

fn run_list<B: AdapterBackend>(
    engine: &ConfigurationEngine<B>,
    config: &ValidatedConfig,
) -> Result<(), RunError> {
    let list = engine.list_adapters();
    let adapters = config.filter.apply(list.adapters);

    if let Some(warning) = list.warning {
        eprintln!("Warning: {warning}");
    }

    if adapters.is_empty() {
        println!("No adapters found.");
        return Ok(());
    }

    for adapter in &adapters {
        println!("{}", render_adapter_row(adapter));
    }
    Ok(())
}

fn run_show<B: AdapterBackend>(
    engine: &ConfigurationEngine<B>,
    adapter: &str,
) -> Result<(), RunError> {
    let report = engine.get_config(adapter);

    if let Some(ref warning) = report.warning {
        eprintln!("Warning: {warning}");
    }
    print!("{}", render_config(&report));
    Ok(())
}

fn run_profile_action<B: AdapterBackend>(
    action: &ProfileAction,
    engine: Option<&ConfigurationEngine<B>>,
    store: &mut ProfileStore,
) -> Result<(), RunError> {
    match action {
        ProfileAction::List => {
            if store.is_empty() {
                println!("No profiles saved.");
                return Ok(());
            }
            for profile in store.iter() {
                println!("{}", render_profile_row(profile));
            }
            Ok(())
        }
        ProfileAction::Show { address } => {
            let profile = store
                .get(address)
                .ok_or_else(|| RunError::ProfileNotFound {
                    address: address.clone(),
                })?;
            print!("{}", render_profile(profile));
            Ok(())
        }
        ProfileAction::Add {
            address,
            mask,
            prefix,
            gateway,
            dns,
        } => {
            let profile = build_profile(address, mask.as_deref(), prefix.as_deref(), gateway.as_deref(), dns)?;
            let replaced = store.add(profile);
            store.save()?;

            if replaced.is_some() {
                println!("Profile for {address} replaced.");
            } else {
                println!("Profile for {address} saved.");
            }
            Ok(())
        }
        ProfileAction::Delete { address } => {
            if store.delete(address) {
                store.save()?;
                println!("Profile for {address} deleted.");
            } else {
                println!("No profile saved for {address}.");
            }
            Ok(())
        }
        ProfileAction::Apply { adapter, address } => {
            let engine = engine.expect("apply requires a backend");
            let profile = store
                .get(address)
                .ok_or_else(|| RunError::ProfileNotFound {
                    address: address.clone(),
                })?;

            let spec = SubnetSpec::Mask(profile.subnet_mask.clone());
            let gateway = (!profile.gateway.is_empty()).then_some(profile.gateway.as_str());
            finish(engine.apply_static(
                adapter,
                &profile.address,
                &spec,
                gateway,
                &profile.dns_servers,
            ))
        }
    }
}

/// Turns an engine outcome into process output and an exit decision.
fn finish(outcome: Outcome) -> Result<(), RunError> {
    if outcome.success {
        println!("{outcome}");
        Ok(())
    } else {
        Err(RunError::Operation(outcome.to_string()))
    }
}

/// Validates profile inputs and builds the durable shape.
fn build_profile(
    address: &str,
    mask: Option<&str>,
    prefix: Option<&str>,
    gateway: Option<&str>,
    dns: &[String],
) -> Result<IpProfile, RunError> {
    validate_ipv4("address", address)?;
    if let Some(gw) = gateway {
        validate_ipv4("gateway", gw)?;
    }
    for server in dns {
        validate_ipv4("DNS server", server)?;
    }

    let spec = SubnetSpec::resolve(mask, prefix)?;
    let (subnet_mask, _) = spec.normalize()?;

    Ok(IpProfile {
        address: address.to_string(),
        subnet_mask,
        gateway: gateway.unwrap_or_default().to_string(),
        dns_servers: dns.to_vec(),
    })
}

fn validate_ipv4(field: &'static str, value: &str) -> Result<(), RunError> {
    value
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| RunError::InvalidAddress {
            field,
            value: value.to_string(),
        })
}

// Rendering is kept in pure functions so the output format is testable.

fn render_adapter_row(adapter: &AdapterDescriptor) -> String {
    format!(
        "{:<28} {:<10} {}",
        adapter.label(),
        adapter.name,
        adapter.description
    )
}

fn render_config(report: &ConfigReport) -> String {
    let config = &report.config;
    let mut out = String::new();

    out.push_str(&format!("Adapter:     {}\n", report.adapter));
    if config.has_address() {
        out.push_str(&format!("Address:     {}\n", config.address));
    } else {
        out.push_str("Address:     (none)\n");
    }
    out.push_str(&format!("Subnet mask: {}\n", config.subnet_mask));
    if !config.gateway.is_empty() {
        out.push_str(&format!("Gateway:     {}\n", config.gateway));
    }
    for server in config.dns_servers.iter().take(DNS_DISPLAY_LIMIT) {
        out.push_str(&format!("DNS:         {server}\n"));
    }
    out.push_str(&format!("DHCP:        {}\n", config.dhcp));

    out
}

fn render_profile_row(profile: &IpProfile) -> String {
    format!("{:<16} mask {}", profile.address, profile.subnet_mask)
}

fn render_profile(profile: &IpProfile) -> String {
    let mut out = String::new();

    out.push_str(&format!("Address:     {}\n", profile.address));
    out.push_str(&format!("Subnet mask: {}\n", profile.subnet_mask));
    if !profile.gateway.is_empty() {
        out.push_str(&format!("Gateway:     {}\n", profile.gateway));
    }
    for server in profile.dns_servers.iter().take(DNS_DISPLAY_LIMIT) {
        out.push_str(&format!("DNS:         {server}\n"));
    }

    out
}
