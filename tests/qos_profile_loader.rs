// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named QoS profile resolution from on-disk XML/YAML documents
//! (SPEC_FULL.md §A.3), exercising `QosProfileLoader::load`'s
//! extension-based format detection against real files rather than
//! in-memory strings.

#![cfg(feature = "qos-loaders")]

use hdds::qos::{Durability, History, QosProfileLoader, Reliability};
use std::io::Write;

#[test]
fn loads_default_profile_from_yaml_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("create temp file");
    writeln!(
        file,
        "default_profile: sensor_reliable\nprofiles:\n  sensor_reliable:\n    reliability: RELIABLE\n    durability: TRANSIENT_LOCAL\n    history:\n      kind: KEEP_LAST\n      depth: 20\n"
    )
    .unwrap();

    let qos = QosProfileLoader::load(file.path(), None).expect("load default profile");
    assert_eq!(qos.reliability, Reliability::Reliable);
    assert_eq!(qos.durability, Durability::TransientLocal);
    assert_eq!(qos.history, History::KeepLast(20));
}

#[test]
fn loads_named_profile_from_xml_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".xml")
        .tempfile()
        .expect("create temp file");
    writeln!(
        file,
        r#"<qos_profiles>
  <qos_profile name="telemetry_fast">
    <qos>
      <reliability><kind>BEST_EFFORT</kind></reliability>
      <durability><kind>VOLATILE</kind></durability>
    </qos>
  </qos_profile>
  <qos_profile name="sensor_reliable" is_default="true">
    <qos>
      <reliability><kind>RELIABLE</kind></reliability>
      <durability><kind>TRANSIENT_LOCAL</kind></durability>
    </qos>
  </qos_profile>
</qos_profiles>"#
    )
    .unwrap();

    let named = QosProfileLoader::load(file.path(), Some("telemetry_fast"))
        .expect("load named profile");
    assert_eq!(named.reliability, Reliability::BestEffort);

    let default = QosProfileLoader::load(file.path(), None).expect("load default profile");
    assert_eq!(default.reliability, Reliability::Reliable);
    assert_eq!(default.durability, Durability::TransientLocal);
}

#[test]
fn unknown_profile_name_is_an_error() {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("create temp file");
    writeln!(file, "profiles:\n  only_one:\n    reliability: RELIABLE\n").unwrap();

    assert!(QosProfileLoader::load(file.path(), Some("missing")).is_err());
}
