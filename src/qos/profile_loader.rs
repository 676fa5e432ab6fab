// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named QoS profile loading from XML or YAML documents.
//!
//! Ambient configuration plumbing (SPEC_FULL.md §A.3), not a protocol
//! feature: real DDS deployments ship named `UniQos` presets in either
//! format and resolve them by name at entity-creation time rather than
//! building policies up in code. Generalizes the teacher's
//! `dds::qos::loaders::{FastDdsLoader, YamlLoader, ProfileLoader}` trio
//! (XML via `roxmltree`, YAML via `serde`/`serde_yaml`) onto this
//! crate's `UniQos` aggregate, collapsed into one module since there is
//! only one target record to build instead of per-vendor dialects.

use super::{
    DestinationOrder, Durability, EntityFactory, GroupData, History, LatencyBudget, Lifespan,
    Liveliness, LivelinessKind, Ownership, OwnershipStrength, Partition, Presentation,
    PresentationAccessScope, ReaderDataLifecycle, Reliability, ResourceLimits, TimeBasedFilter,
    TopicData, TransportPriority, UniQos, UserData, WriterDataLifecycle,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Errors raised while locating or parsing a profile document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    Io(String),
    Xml(String),
    Yaml(String),
    UnknownFormat,
    ProfileNotFound(String),
    InvalidValue { field: &'static str, got: String },
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::Io(msg) => write!(f, "failed to read profile document: {msg}"),
            ProfileError::Xml(msg) => write!(f, "failed to parse XML profile document: {msg}"),
            ProfileError::Yaml(msg) => write!(f, "failed to parse YAML profile document: {msg}"),
            ProfileError::UnknownFormat => {
                write!(f, "could not detect profile document format")
            }
            ProfileError::ProfileNotFound(name) => write!(f, "profile '{name}' not found"),
            ProfileError::InvalidValue { field, got } => {
                write!(f, "invalid value for {field}: '{got}'")
            }
        }
    }
}

impl std::error::Error for ProfileError {}

/// Supported profile document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Xml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from a file extension (`.xml` vs `.yaml`/`.yml`).
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("xml") => Some(ConfigFormat::Xml),
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    /// Fall back to content sniffing when the extension is missing or
    /// unrecognized.
    pub fn from_content(content: &str) -> Option<Self> {
        let trimmed = content.trim_start();
        if trimmed.starts_with("<?xml") || trimmed.starts_with('<') {
            Some(ConfigFormat::Xml)
        } else if trimmed.starts_with("profiles:") || trimmed.contains("\nprofiles:") {
            Some(ConfigFormat::Yaml)
        } else {
            None
        }
    }
}

fn parse_duration(sec: Option<&str>, nanosec: Option<&str>) -> Duration {
    match (sec, nanosec) {
        (Some("DURATION_INFINITY"), _) | (_, Some("DURATION_INFINITY")) => Duration::MAX,
        (Some(s), Some(ns)) => {
            Duration::new(s.parse().unwrap_or(0), ns.parse().unwrap_or(0))
        }
        (Some(s), None) => Duration::from_secs(s.parse().unwrap_or(0)),
        _ => Duration::ZERO,
    }
}

/// Root YAML document: named profiles plus an optional default.
#[derive(Debug, Deserialize)]
pub struct YamlQosDocument {
    #[serde(default)]
    pub profiles: HashMap<String, YamlQosProfile>,
    #[serde(default)]
    pub default_profile: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlQosProfile {
    pub reliability: Option<String>,
    pub durability: Option<String>,
    pub history: Option<YamlHistory>,
    pub liveliness: Option<YamlLiveliness>,
    pub ownership: Option<String>,
    pub ownership_strength: Option<i32>,
    pub destination_order: Option<String>,
    pub presentation: Option<YamlPresentation>,
    pub deadline_ms: Option<u64>,
    pub lifespan_ms: Option<u64>,
    pub latency_budget_us: Option<u64>,
    pub time_based_filter_ms: Option<u64>,
    pub partition: Option<Vec<String>>,
    pub user_data: Option<String>,
    pub group_data: Option<String>,
    pub topic_data: Option<String>,
    pub resource_limits: Option<YamlResourceLimits>,
    pub writer_autodispose_unregistered_instances: Option<bool>,
    pub reader_autopurge_nowriter_samples_delay_ms: Option<u64>,
    pub reader_autopurge_disposed_samples_delay_ms: Option<u64>,
    pub entity_factory_autoenable: Option<bool>,
    pub transport_priority: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct YamlHistory {
    pub kind: String,
    #[serde(default = "default_history_depth")]
    pub depth: u32,
}

fn default_history_depth() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct YamlLiveliness {
    pub kind: String,
    #[serde(default)]
    pub lease_duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlPresentation {
    pub access_scope: String,
    pub coherent_access: bool,
    pub ordered_access: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlResourceLimits {
    pub max_samples: i32,
    pub max_instances: i32,
    pub max_samples_per_instance: i32,
}

fn resource_limits_from_yaml(limits: &YamlResourceLimits) -> ResourceLimits {
    let to_usize = |v: i32| if v < 0 { usize::MAX } else { v as usize };
    ResourceLimits {
        max_samples: to_usize(limits.max_samples),
        max_instances: to_usize(limits.max_instances),
        max_samples_per_instance: to_usize(limits.max_samples_per_instance),
        ..ResourceLimits::default()
    }
}

fn profile_to_qos(profile: &YamlQosProfile) -> Result<UniQos, ProfileError> {
    let mut qos = UniQos::default();

    if let Some(rel) = &profile.reliability {
        qos.reliability = match rel.to_uppercase().as_str() {
            "RELIABLE" => Reliability::Reliable,
            "BEST_EFFORT" => Reliability::BestEffort,
            other => {
                return Err(ProfileError::InvalidValue {
                    field: "reliability",
                    got: other.to_string(),
                })
            }
        };
    }

    if let Some(dur) = &profile.durability {
        qos.durability = match dur.to_uppercase().as_str() {
            "VOLATILE" => Durability::Volatile,
            "TRANSIENT_LOCAL" | "TRANSIENT" => Durability::TransientLocal,
            "PERSISTENT" => Durability::Persistent,
            other => {
                return Err(ProfileError::InvalidValue {
                    field: "durability",
                    got: other.to_string(),
                })
            }
        };
    }

    if let Some(hist) = &profile.history {
        qos.history = match hist.kind.to_uppercase().as_str() {
            "KEEP_LAST" => History::KeepLast(hist.depth),
            "KEEP_ALL" => History::KeepAll,
            other => {
                return Err(ProfileError::InvalidValue {
                    field: "history.kind",
                    got: other.to_string(),
                })
            }
        };
    }

    if let Some(liv) = &profile.liveliness {
        let kind = match liv.kind.to_uppercase().as_str() {
            "AUTOMATIC" => LivelinessKind::Automatic,
            "MANUAL_BY_PARTICIPANT" => LivelinessKind::ManualByParticipant,
            "MANUAL_BY_TOPIC" => LivelinessKind::ManualByTopic,
            other => {
                return Err(ProfileError::InvalidValue {
                    field: "liveliness.kind",
                    got: other.to_string(),
                })
            }
        };
        let lease = liv
            .lease_duration_ms
            .map(Duration::from_millis)
            .unwrap_or(Duration::MAX);
        qos.liveliness = Liveliness::new(kind, lease);
    }

    if let Some(own) = &profile.ownership {
        qos.ownership = match own.to_uppercase().as_str() {
            "SHARED" => Ownership::shared(),
            "EXCLUSIVE" => Ownership::exclusive(),
            other => {
                return Err(ProfileError::InvalidValue {
                    field: "ownership",
                    got: other.to_string(),
                })
            }
        };
    }
    if let Some(strength) = profile.ownership_strength {
        qos.ownership_strength = OwnershipStrength::new(strength);
    }

    if let Some(order) = &profile.destination_order {
        qos.destination_order = match order.to_uppercase().as_str() {
            "BY_RECEPTION_TIMESTAMP" => DestinationOrder::by_reception_timestamp(),
            "BY_SOURCE_TIMESTAMP" => DestinationOrder::by_source_timestamp(),
            other => {
                return Err(ProfileError::InvalidValue {
                    field: "destination_order",
                    got: other.to_string(),
                })
            }
        };
    }

    if let Some(pres) = &profile.presentation {
        let access_scope = match pres.access_scope.to_uppercase().as_str() {
            "INSTANCE" => PresentationAccessScope::Instance,
            "TOPIC" => PresentationAccessScope::Topic,
            "GROUP" => PresentationAccessScope::Group,
            other => {
                return Err(ProfileError::InvalidValue {
                    field: "presentation.access_scope",
                    got: other.to_string(),
                })
            }
        };
        qos.presentation = Presentation::new(access_scope, pres.coherent_access, pres.ordered_access);
    }

    if let Some(ms) = profile.deadline_ms {
        qos.deadline = super::Deadline::from_millis(ms);
    }
    if let Some(ms) = profile.lifespan_ms {
        qos.lifespan = Lifespan::from_millis(ms);
    }
    if let Some(us) = profile.latency_budget_us {
        qos.latency_budget = LatencyBudget::new(Duration::from_micros(us));
    }
    if let Some(ms) = profile.time_based_filter_ms {
        qos.time_based_filter = TimeBasedFilter::from_millis(ms);
    }
    if let Some(names) = &profile.partition {
        if !names.is_empty() {
            qos.partition = Partition::new(names.clone());
        }
    }
    if let Some(data) = &profile.user_data {
        qos.user_data = UserData::new(data.as_bytes().to_vec());
    }
    if let Some(data) = &profile.group_data {
        qos.group_data = GroupData::new(data.as_bytes().to_vec());
    }
    if let Some(data) = &profile.topic_data {
        qos.topic_data = TopicData::new(data.as_bytes().to_vec());
    }
    if let Some(limits) = &profile.resource_limits {
        qos.resource_limits = resource_limits_from_yaml(limits);
    }
    if let Some(auto_dispose) = profile.writer_autodispose_unregistered_instances {
        qos.writer_data_lifecycle = if auto_dispose {
            WriterDataLifecycle::auto_dispose()
        } else {
            WriterDataLifecycle::manual_dispose()
        };
    }
    let nowriter_us = profile
        .reader_autopurge_nowriter_samples_delay_ms
        .map(|ms| (ms as i64) * 1000);
    let disposed_us = profile
        .reader_autopurge_disposed_samples_delay_ms
        .map(|ms| (ms as i64) * 1000);
    if nowriter_us.is_some() || disposed_us.is_some() {
        qos.reader_data_lifecycle = ReaderDataLifecycle::new(
            nowriter_us.unwrap_or(i64::MAX),
            disposed_us.unwrap_or(i64::MAX),
        );
    }
    if let Some(auto_enable) = profile.entity_factory_autoenable {
        qos.entity_factory = if auto_enable {
            EntityFactory::auto_enable()
        } else {
            EntityFactory::manual_enable()
        };
    }
    if let Some(priority) = profile.transport_priority {
        qos.transport_priority = TransportPriority::new(priority);
    }

    Ok(qos)
}

/// Resolves named `UniQos` profiles out of XML or YAML documents.
pub struct QosProfileLoader;

impl QosProfileLoader {
    pub fn parse_yaml(content: &str) -> Result<YamlQosDocument, ProfileError> {
        serde_yaml::from_str(content).map_err(|e| ProfileError::Yaml(e.to_string()))
    }

    pub fn yaml_profile(doc: &YamlQosDocument, name: &str) -> Result<UniQos, ProfileError> {
        let profile = doc
            .profiles
            .get(name)
            .ok_or_else(|| ProfileError::ProfileNotFound(name.to_string()))?;
        profile_to_qos(profile)
    }

    pub fn yaml_default_profile(doc: &YamlQosDocument) -> Result<UniQos, ProfileError> {
        if let Some(name) = &doc.default_profile {
            Self::yaml_profile(doc, name)
        } else if let Some((_, profile)) = doc.profiles.iter().next() {
            profile_to_qos(profile)
        } else {
            Ok(UniQos::default())
        }
    }

    /// Parse every `<qos_profile name="...">` element into a name-keyed
    /// map, returning the name of whichever profile carries
    /// `is_default="true"` (the first profile if none is marked).
    pub fn parse_xml(content: &str) -> Result<(HashMap<String, UniQos>, Option<String>), ProfileError> {
        let doc = roxmltree::Document::parse(content).map_err(|e| ProfileError::Xml(e.to_string()))?;
        let mut profiles = HashMap::new();
        let mut default_name = None;

        for node in doc.descendants().filter(|n| n.tag_name().name() == "qos_profile") {
            let name = node
                .attribute("name")
                .ok_or_else(|| ProfileError::Xml("<qos_profile> missing name attribute".into()))?
                .to_string();
            if node.attribute("is_default") == Some("true") {
                default_name = Some(name.clone());
            }
            let qos = Self::extract_xml_qos(&node)?;
            profiles.insert(name, qos);
        }
        if default_name.is_none() {
            default_name = profiles.keys().next().cloned();
        }
        Ok((profiles, default_name))
    }

    fn extract_xml_qos(profile: &roxmltree::Node) -> Result<UniQos, ProfileError> {
        let mut qos = UniQos::default();
        let Some(qos_elem) = profile.descendants().find(|n| n.tag_name().name() == "qos") else {
            return Ok(qos);
        };

        let child_text = |parent: &roxmltree::Node, tag: &str| -> Option<String> {
            parent
                .descendants()
                .find(|n| n.tag_name().name() == tag)
                .and_then(|n| n.text())
                .map(|t| t.trim().to_string())
        };

        if let Some(rel) = qos_elem.descendants().find(|n| n.tag_name().name() == "reliability") {
            if let Some(kind) = child_text(&rel, "kind") {
                qos.reliability = match kind.as_str() {
                    "RELIABLE" => Reliability::Reliable,
                    "BEST_EFFORT" => Reliability::BestEffort,
                    other => {
                        return Err(ProfileError::InvalidValue {
                            field: "reliability.kind",
                            got: other.to_string(),
                        })
                    }
                };
            }
        }

        if let Some(dur) = qos_elem.descendants().find(|n| n.tag_name().name() == "durability") {
            if let Some(kind) = child_text(&dur, "kind") {
                qos.durability = match kind.as_str() {
                    "VOLATILE" => Durability::Volatile,
                    "TRANSIENT_LOCAL" | "TRANSIENT" => Durability::TransientLocal,
                    "PERSISTENT" => Durability::Persistent,
                    other => {
                        return Err(ProfileError::InvalidValue {
                            field: "durability.kind",
                            got: other.to_string(),
                        })
                    }
                };
            }
        }

        if let Some(hist) = qos_elem.descendants().find(|n| n.tag_name().name() == "history") {
            if let Some(kind) = child_text(&hist, "kind") {
                let depth: u32 = child_text(&hist, "depth").and_then(|d| d.parse().ok()).unwrap_or(1);
                qos.history = match kind.as_str() {
                    "KEEP_LAST" => History::KeepLast(depth),
                    "KEEP_ALL" => History::KeepAll,
                    other => {
                        return Err(ProfileError::InvalidValue {
                            field: "history.kind",
                            got: other.to_string(),
                        })
                    }
                };
            }
        }

        if let Some(liv) = qos_elem.descendants().find(|n| n.tag_name().name() == "liveliness") {
            if let Some(kind) = child_text(&liv, "kind") {
                let lease_node = liv.descendants().find(|n| n.tag_name().name() == "lease_duration");
                let lease = lease_node
                    .map(|n| parse_duration(child_text(&n, "sec").as_deref(), child_text(&n, "nanosec").as_deref()))
                    .unwrap_or(Duration::MAX);
                qos.liveliness = Liveliness::new(
                    match kind.as_str() {
                        "AUTOMATIC" => LivelinessKind::Automatic,
                        "MANUAL_BY_PARTICIPANT" => LivelinessKind::ManualByParticipant,
                        "MANUAL_BY_TOPIC" => LivelinessKind::ManualByTopic,
                        other => {
                            return Err(ProfileError::InvalidValue {
                                field: "liveliness.kind",
                                got: other.to_string(),
                            })
                        }
                    },
                    lease,
                );
            }
        }

        if let Some(own) = qos_elem.descendants().find(|n| n.tag_name().name() == "ownership") {
            if let Some(kind) = child_text(&own, "kind") {
                qos.ownership = match kind.as_str() {
                    "SHARED" => Ownership::shared(),
                    "EXCLUSIVE" => Ownership::exclusive(),
                    other => {
                        return Err(ProfileError::InvalidValue {
                            field: "ownership.kind",
                            got: other.to_string(),
                        })
                    }
                };
            }
        }
        if let Some(strength) = qos_elem
            .descendants()
            .find(|n| n.tag_name().name() == "ownershipStrength")
            .and_then(|n| child_text(&n, "value"))
            .and_then(|v| v.parse::<i32>().ok())
        {
            qos.ownership_strength = OwnershipStrength::new(strength);
        }

        if let Some(order) = qos_elem.descendants().find(|n| n.tag_name().name() == "destination_order") {
            if let Some(kind) = child_text(&order, "kind") {
                qos.destination_order = match kind.as_str() {
                    "BY_RECEPTION_TIMESTAMP" => DestinationOrder::by_reception_timestamp(),
                    "BY_SOURCE_TIMESTAMP" => DestinationOrder::by_source_timestamp(),
                    other => {
                        return Err(ProfileError::InvalidValue {
                            field: "destination_order.kind",
                            got: other.to_string(),
                        })
                    }
                };
            }
        }

        if let Some(deadline) = qos_elem.descendants().find(|n| n.tag_name().name() == "deadline") {
            if let Some(period) = deadline.descendants().find(|n| n.tag_name().name() == "period") {
                let d = parse_duration(child_text(&period, "sec").as_deref(), child_text(&period, "nanosec").as_deref());
                qos.deadline = super::Deadline::new(d);
            }
        }

        if let Some(lifespan) = qos_elem.descendants().find(|n| n.tag_name().name() == "lifespan") {
            if let Some(duration) = lifespan.descendants().find(|n| n.tag_name().name() == "duration") {
                let d = parse_duration(child_text(&duration, "sec").as_deref(), child_text(&duration, "nanosec").as_deref());
                qos.lifespan = Lifespan::new(d);
            }
        }

        if let Some(latency) = qos_elem.descendants().find(|n| n.tag_name().name() == "latencyBudget") {
            if let Some(duration) = latency.descendants().find(|n| n.tag_name().name() == "duration") {
                let d = parse_duration(child_text(&duration, "sec").as_deref(), child_text(&duration, "nanosec").as_deref());
                qos.latency_budget = LatencyBudget::new(d);
            }
        }

        if let Some(tbf) = qos_elem.descendants().find(|n| n.tag_name().name() == "timeBasedFilter") {
            if let Some(min_sep) = tbf.descendants().find(|n| n.tag_name().name() == "minimum_separation") {
                let d = parse_duration(child_text(&min_sep, "sec").as_deref(), child_text(&min_sep, "nanosec").as_deref());
                qos.time_based_filter = TimeBasedFilter::new(d);
            }
        }

        if let Some(partition) = qos_elem.descendants().find(|n| n.tag_name().name() == "partition") {
            let names: Vec<String> = partition
                .descendants()
                .filter(|n| n.tag_name().name() == "name")
                .filter_map(|n| n.text())
                .map(|t| t.trim().to_string())
                .collect();
            if !names.is_empty() {
                qos.partition = Partition::new(names);
            }
        }

        if let Some(priority) = qos_elem
            .descendants()
            .find(|n| n.tag_name().name() == "transport_priority")
            .and_then(|n| child_text(&n, "value"))
            .and_then(|v| v.parse::<i32>().ok())
        {
            qos.transport_priority = TransportPriority::new(priority);
        }

        Ok(qos)
    }

    /// Load and resolve a profile from file, auto-detecting XML vs YAML
    /// from the extension, falling back to content sniffing.
    pub fn load<P: AsRef<Path>>(path: P, profile_name: Option<&str>) -> Result<UniQos, ProfileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ProfileError::Io(e.to_string()))?;
        let format = ConfigFormat::from_extension(path)
            .or_else(|| ConfigFormat::from_content(&content))
            .ok_or(ProfileError::UnknownFormat)?;
        Self::load_str(&content, format, profile_name)
    }

    pub fn load_str(content: &str, format: ConfigFormat, profile_name: Option<&str>) -> Result<UniQos, ProfileError> {
        match format {
            ConfigFormat::Yaml => {
                let doc = Self::parse_yaml(content)?;
                match profile_name {
                    Some(name) => Self::yaml_profile(&doc, name),
                    None => Self::yaml_default_profile(&doc),
                }
            }
            ConfigFormat::Xml => {
                let (profiles, default_name) = Self::parse_xml(content)?;
                let name = profile_name
                    .map(str::to_string)
                    .or(default_name)
                    .ok_or(ProfileError::UnknownFormat)?;
                profiles
                    .get(&name)
                    .cloned()
                    .ok_or(ProfileError::ProfileNotFound(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_minimal_profile_resolves() {
        let yaml = "profiles:\n  reliable_sensor:\n    reliability: RELIABLE\n    durability: TRANSIENT_LOCAL\n";
        let doc = QosProfileLoader::parse_yaml(yaml).unwrap();
        let qos = QosProfileLoader::yaml_profile(&doc, "reliable_sensor").unwrap();
        assert_eq!(qos.reliability, Reliability::Reliable);
        assert_eq!(qos.durability, Durability::TransientLocal);
    }

    #[test]
    fn yaml_default_profile_falls_back_to_first_entry() {
        let yaml = "profiles:\n  only_one:\n    reliability: RELIABLE\n";
        let doc = QosProfileLoader::parse_yaml(yaml).unwrap();
        let qos = QosProfileLoader::yaml_default_profile(&doc).unwrap();
        assert_eq!(qos.reliability, Reliability::Reliable);
    }

    #[test]
    fn yaml_unknown_profile_is_an_error() {
        let yaml = "profiles:\n  a: {}\n";
        let doc = QosProfileLoader::parse_yaml(yaml).unwrap();
        assert_eq!(
            QosProfileLoader::yaml_profile(&doc, "b"),
            Err(ProfileError::ProfileNotFound("b".to_string()))
        );
    }

    #[test]
    fn yaml_resource_limits_and_history_round_trip() {
        let yaml = "profiles:\n  bounded:\n    history:\n      kind: KEEP_LAST\n      depth: 8\n    resource_limits:\n      max_samples: 100\n      max_instances: 10\n      max_samples_per_instance: 10\n";
        let doc = QosProfileLoader::parse_yaml(yaml).unwrap();
        let qos = QosProfileLoader::yaml_profile(&doc, "bounded").unwrap();
        assert_eq!(qos.history, History::KeepLast(8));
        assert_eq!(qos.resource_limits.max_samples, 100);
    }

    #[test]
    fn xml_profile_resolves_named_entry() {
        let xml = r#"
            <qos_profiles>
              <qos_profile name="reliable_sensor" is_default="true">
                <qos>
                  <reliability><kind>RELIABLE</kind></reliability>
                  <durability><kind>TRANSIENT_LOCAL</kind></durability>
                  <history><kind>KEEP_LAST</kind><depth>50</depth></history>
                </qos>
              </qos_profile>
            </qos_profiles>
        "#;
        let (profiles, default_name) = QosProfileLoader::parse_xml(xml).unwrap();
        assert_eq!(default_name.as_deref(), Some("reliable_sensor"));
        let qos = &profiles["reliable_sensor"];
        assert_eq!(qos.reliability, Reliability::Reliable);
        assert_eq!(qos.history, History::KeepLast(50));
    }

    #[test]
    fn format_detection_prefers_extension_then_content() {
        assert_eq!(
            ConfigFormat::from_extension(Path::new("profiles.xml")),
            Some(ConfigFormat::Xml)
        );
        assert_eq!(
            ConfigFormat::from_extension(Path::new("profiles.yaml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_content("profiles:\n  a: {}"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_content("<qos_profiles/>"), Some(ConfigFormat::Xml));
    }

    #[test]
    fn load_str_dispatches_on_format() {
        let yaml = "profiles:\n  p:\n    reliability: RELIABLE\n";
        let qos = QosProfileLoader::load_str(yaml, ConfigFormat::Yaml, Some("p")).unwrap();
        assert_eq!(qos.reliability, Reliability::Reliable);
    }
}
