// crates/cse-config/src/examples.rs
// ============================================================================
// Module: Config Samples
// Description: Canonical sample configuration payloads.
// Purpose: Deterministic samples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical sample for CSE configuration. The output is deterministic and
//! kept in sync with schema and docs: it parses cleanly, and validating it
//! reports exactly the placeholder-marked fields the operator must fill in.

/// Returns the canonical sample `config.yaml` configuration.
///
/// Hosts, credentials, and guest admin passwords carry the `CHANGE_ME`
/// placeholder; every other field shows a realistic working value.
#[must_use]
pub fn config_yaml_sample() -> String {
    String::from(
        r"# config.yaml
# Sample CSE server configuration.
# Replace every CHANGE_ME value before starting the server.

amqp:
  host: CHANGE_ME
  port: 5672
  prefix: vcd
  username: CHANGE_ME
  password: CHANGE_ME
  exchange: cse-ext
  routing_key: cse
  ssl: false
  ssl_accept_all: false
  vhost: /

vcd:
  host: CHANGE_ME
  port: 443
  username: CHANGE_ME
  password: CHANGE_ME
  api_version: '29.0'
  verify: false
  log: false

vcs:
- name: vc1
  username: CHANGE_ME
  password: CHANGE_ME
  verify: false

service:
  listeners: 5
  enforce_authorization: false

broker:
  org: engineering
  vdc: engineering-vdc
  catalog: cse
  network: cse-net
  ip_allocation_mode: pool
  storage_profile: '*'
  default_template: photon-v2
  templates:
  - name: photon-v2
    catalog_item: photon-custom-hw11-2.0-304b817-k8s
    source_ova: https://bits.example.com/photon/photon-custom-hw11-2.0-304b817.ova
    source_ova_name: photon-custom-hw11-2.0-304b817.ova
    sha256_ova: cb51e4b6d899c3588f961e73282709a0d054bb421787e140a1d80c24d4fd89e1
    temp_vapp: csetemp
    cleanup: true
    cpu: 2
    mem: 2048
    admin_password: CHANGE_ME
    description: PhotonOS v2 with Kubernetes
",
    )
}
