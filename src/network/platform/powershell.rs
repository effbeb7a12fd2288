//! PowerShell script construction and output parsing.
//!
//! Everything here is pure string/JSON work, compiled and tested on all
//! platforms; only the process runner in `windows.rs` is Windows-only.
//!
//! # Command injection
//!
//! Scripts are built exclusively from structured parameters. Every
//! user-controlled value passes through [`quote`], which renders a
//! PowerShell single-quoted literal (no interpolation, `'` doubled).
//! Callers never concatenate raw strings into a script.

use serde::Deserialize;
use serde_json::Value;

use crate::network::{
    AdapterDescriptor, AdapterIpConfig, BackendError, DhcpState, StaticAssignment,
};

/// Exit code emitted by scripts when the named adapter does not exist.
///
/// Distinguishes "check the adapter name" from every other failure, which
/// surfaces through stderr and a generic non-zero status.
pub const EXIT_ADAPTER_NOT_FOUND: i32 = 3;

/// Renders a value as a PowerShell single-quoted string literal.
///
/// Single-quoted literals are inert in PowerShell: no variable expansion,
/// no subexpressions. The only character needing escape is `'` itself,
/// which is doubled.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Guard emitted at the top of every per-adapter script: resolves the
/// adapter and bails with [`EXIT_ADAPTER_NOT_FOUND`] if it is missing.
fn adapter_guard(alias: &str) -> String {
    format!(
        "$name = {q}\n\
         $adapter = Get-NetAdapter -Name $name -ErrorAction SilentlyContinue\n\
         if (-not $adapter) {{ exit {EXIT_ADAPTER_NOT_FOUND} }}\n",
        q = quote(alias),
    )
}

/// Script listing active adapters as JSON.
#[must_use]
pub fn enumerate_script() -> String {
    "Get-NetAdapter \
     | Where-Object { $_.Status -eq 'Up' } \
     | Select-Object Name, InterfaceIndex, InterfaceAlias, InterfaceDescription, PnpDeviceID \
     | ConvertTo-Json"
        .to_string()
}

/// Script reading one adapter's IPv4 configuration as a JSON object.
///
/// The default-route query targets the adapter being read, so the reported
/// gateway always belongs to this adapter.
#[must_use]
pub fn read_config_script(alias: &str) -> String {
    format!(
        "{guard}\
         $config = Get-NetIPAddress -InterfaceAlias $name -AddressFamily IPv4 -ErrorAction SilentlyContinue\n\
         $gateway = Get-NetRoute -InterfaceAlias $name -AddressFamily IPv4 -DestinationPrefix '0.0.0.0/0' -ErrorAction SilentlyContinue\n\
         $dns = Get-DnsClientServerAddress -InterfaceAlias $name -AddressFamily IPv4 -ErrorAction SilentlyContinue\n\
         $iface = Get-NetIPInterface -InterfaceAlias $name -AddressFamily IPv4 -ErrorAction SilentlyContinue\n\
         [PSCustomObject]@{{\n\
             InterfaceAlias = $name\n\
             IPv4Address = $config.IPAddress\n\
             IPv4DefaultGateway = $gateway.NextHop\n\
             SubnetMask = $config.PrefixLength\n\
             DNSServer = $dns.ServerAddresses\n\
             DHCPEnabled = if ($iface.Dhcp -eq 1) {{ 'Enabled' }} elseif ($iface) {{ 'Disabled' }} else {{ $null }}\n\
         }} | ConvertTo-Json",
        guard = adapter_guard(alias),
    )
}

/// Script retracting all IPv4 configuration from an adapter.
///
/// Every removal step tolerates already-clear state, so the script is
/// idempotent as the backend contract requires.
#[must_use]
pub fn clear_script(alias: &str) -> String {
    format!(
        "{guard}\
         Set-NetIPInterface -InterfaceAlias $name -AddressFamily IPv4 -Dhcp Disabled -ErrorAction Stop\n\
         Remove-NetIPAddress -InterfaceAlias $name -AddressFamily IPv4 -Confirm:$false -ErrorAction SilentlyContinue\n\
         Remove-NetRoute -InterfaceAlias $name -AddressFamily IPv4 -DestinationPrefix '0.0.0.0/0' -Confirm:$false -ErrorAction SilentlyContinue\n\
         Set-DnsClientServerAddress -InterfaceAlias $name -ResetServerAddresses -ErrorAction Stop",
        guard = adapter_guard(alias),
    )
}

/// Script writing a static assignment to an adapter.
#[must_use]
pub fn apply_static_script(alias: &str, assignment: &StaticAssignment) -> String {
    let mut script = format!(
        "{guard}\
         New-NetIPAddress -InterfaceAlias $name -AddressFamily IPv4 \
         -IPAddress {address} -PrefixLength {prefix}",
        guard = adapter_guard(alias),
        address = quote(&assignment.address),
        prefix = assignment.prefix_length,
    );

    if let Some(gateway) = &assignment.gateway {
        script.push_str(&format!(" -DefaultGateway {}", quote(gateway)));
    }
    script.push_str(" -ErrorAction Stop | Out-Null\n");

    if assignment.dns_servers.is_empty() {
        script.push_str(
            "Set-DnsClientServerAddress -InterfaceAlias $name -ResetServerAddresses -ErrorAction Stop",
        );
    } else {
        let servers: Vec<String> = assignment.dns_servers.iter().map(|s| quote(s)).collect();
        script.push_str(&format!(
            "Set-DnsClientServerAddress -InterfaceAlias $name -ServerAddresses ({}) -ErrorAction Stop",
            servers.join(","),
        ));
    }

    script
}

/// Script re-enabling DHCP on an adapter.
#[must_use]
pub fn enable_dhcp_script(alias: &str) -> String {
    format!(
        "{guard}\
         Set-NetIPInterface -InterfaceAlias $name -AddressFamily IPv4 -Dhcp Enabled -ErrorAction Stop\n\
         Set-DnsClientServerAddress -InterfaceAlias $name -ResetServerAddresses -ErrorAction Stop",
        guard = adapter_guard(alias),
    )
}

// ============================================================================
// Output parsing
// ============================================================================

/// One adapter as serialized by `Get-NetAdapter | ConvertTo-Json`.
#[derive(Debug, Deserialize)]
struct RawAdapter {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "InterfaceIndex", default)]
    interface_index: u32,
    #[serde(rename = "InterfaceAlias", default)]
    interface_alias: Option<String>,
    #[serde(rename = "InterfaceDescription", default)]
    interface_description: Option<String>,
    #[serde(rename = "PnpDeviceID", default)]
    pnp_device_id: Option<String>,
}

/// `ConvertTo-Json` collapses a one-element pipeline to a bare object,
/// so the adapter list arrives as either a single object or an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

/// Returns true if the device identifiers point at a wireless adapter.
///
/// PnP identifier heuristic first (`netwlan`, `mswifi` device classes),
/// then the interface description as a fallback.
#[must_use]
pub fn is_wireless_device(pnp_device_id: &str, description: &str) -> bool {
    let pnp = pnp_device_id.to_lowercase();
    if pnp.contains("netwlan") || pnp.contains("mswifi") {
        return true;
    }

    let description = description.to_lowercase();
    description.contains("wireless") || description.contains("wi-fi") || description.contains("802.11")
}

/// Parses the enumeration output into adapter descriptors.
///
/// Empty output means no adapter matched the `Up` filter, which is a valid
/// empty listing rather than an error.
///
/// # Errors
///
/// Returns [`BackendError::MalformedOutput`] if the JSON does not match the
/// expected shape.
pub fn parse_adapter_list(output: &str) -> Result<Vec<AdapterDescriptor>, BackendError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let raw: OneOrMany<RawAdapter> =
        serde_json::from_str(trimmed).map_err(|e| BackendError::MalformedOutput {
            message: format!("adapter list: {e}"),
        })?;

    Ok(raw
        .into_vec()
        .into_iter()
        .map(|adapter| {
            let description = adapter.interface_description.unwrap_or_default();
            let is_wireless = is_wireless_device(
                adapter.pnp_device_id.as_deref().unwrap_or_default(),
                &description,
            );
            AdapterDescriptor {
                alias: adapter.interface_alias.unwrap_or_else(|| adapter.name.clone()),
                name: adapter.name,
                description,
                index: adapter.interface_index,
                is_wireless,
            }
        })
        .collect())
}

/// One adapter's configuration as serialized by the read script.
///
/// Fields stay as raw JSON values: PowerShell collapses one-element arrays
/// to scalars and reports the prefix length as a number, so each field is
/// decoded leniently below.
#[derive(Debug, Deserialize)]
struct RawIpConfig {
    #[serde(rename = "IPv4Address", default)]
    address: Value,
    #[serde(rename = "SubnetMask", default)]
    subnet_mask: Value,
    #[serde(rename = "IPv4DefaultGateway", default)]
    gateway: Value,
    #[serde(rename = "DNSServer", default)]
    dns: Value,
    #[serde(rename = "DHCPEnabled", default)]
    dhcp: Value,
}

/// Extracts a scalar string from a value that may be a string, a number,
/// or an array of either (first element wins).
fn first_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(first_scalar),
        _ => None,
    }
}

/// Extracts a string list from a value that may be a scalar or an array.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(first_scalar).collect(),
        other => first_scalar(other).into_iter().collect(),
    }
}

/// Parses the read-config output into an [`AdapterIpConfig`].
///
/// The `subnet_mask` field is passed through as reported (a prefix-length
/// string); the engine converts it to dotted-decimal.
///
/// # Errors
///
/// Returns [`BackendError::MalformedOutput`] if the JSON does not match the
/// expected shape.
pub fn parse_ip_config(output: &str) -> Result<AdapterIpConfig, BackendError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(AdapterIpConfig::unconfigured());
    }

    let raw: RawIpConfig =
        serde_json::from_str(trimmed).map_err(|e| BackendError::MalformedOutput {
            message: format!("adapter config: {e}"),
        })?;

    let dhcp = match first_scalar(&raw.dhcp).as_deref() {
        Some("Enabled") => DhcpState::Enabled,
        Some("Disabled") => DhcpState::Disabled,
        _ => DhcpState::Unknown,
    };

    Ok(AdapterIpConfig {
        address: first_scalar(&raw.address).unwrap_or_default(),
        subnet_mask: first_scalar(&raw.subnet_mask).unwrap_or_default(),
        gateway: first_scalar(&raw.gateway).unwrap_or_default(),
        dns_servers: string_list(&raw.dns),
        dhcp,
    })
}
