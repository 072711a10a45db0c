// crates/cse-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for cse-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use cse_config::ConfigError;
use cse_config::CseConfig;
use cse_config::ValidationPolicy;

/// Returns a complete document with every required field filled.
///
/// Two vCenter cells and two templates keep sequence handling honest.
pub fn filled_yaml() -> String {
    String::from(
        r"amqp:
  host: amqp.example.com
  port: 5672
  username: cse-amqp
  password: amqp-secret
vcd:
  host: vcd.example.com
  port: 443
  username: administrator
  password: vcd-secret
  api_version: '29.0'
vcs:
- name: vc1
  username: cse_user@vsphere.local
  password: vc1-secret
  verify: true
- name: vc2
  username: backup@vsphere.local
  password: vc2-secret
service:
  listeners: 10
  enforce_authorization: true
broker:
  org: engineering
  vdc: engineering-vdc
  catalog: cse
  network: cse-net
  ip_allocation_mode: pool
  storage_profile: ssd
  default_template: photon-v2
  templates:
  - name: photon-v2
    catalog_item: photon-custom-hw11-2.0-304b817-k8s
    source_ova: https://bits.example.com/photon/photon-custom-hw11-2.0-304b817.ova
    source_ova_name: photon-custom-hw11-2.0-304b817.ova
    sha256_ova: cb51e4b6d899c3588f961e73282709a0d054bb421787e140a1d80c24d4fd89e1
    temp_vapp: csetemp
    cpu: 2
    mem: 2048
    admin_password: photon-admin-pw
  - name: ubuntu-16.04
    catalog_item: ubuntu-16.04-server-cloudimg-amd64-k8s
    source_ova: https://cloud.example.com/ubuntu/ubuntu-16.04-server-cloudimg-amd64.ova
    source_ova_name: ubuntu-16.04-server-cloudimg-amd64.ova
    sha256_ova: 3c90f7a9348efa3e492f1c8bb38f9b696e8aed017b65dde2c8e30d389b8c9d93
    temp_vapp: ubuntutemp
    cleanup: false
    cpu: 4
    mem: 4096
    admin_password: ubuntu-admin-pw
    description: Ubuntu 16.04 with Kubernetes
",
    )
}

/// Loads a YAML string under the default validation policy.
pub fn load(text: &str) -> Result<CseConfig, ConfigError> {
    CseConfig::from_yaml_str(text, &ValidationPolicy::default())
}

/// Loads a YAML string under the permissive validation policy.
pub fn load_permissive(text: &str) -> Result<CseConfig, ConfigError> {
    CseConfig::from_yaml_str(text, &ValidationPolicy::permissive())
}
