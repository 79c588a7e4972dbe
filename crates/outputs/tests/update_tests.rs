//! Purpose: Integration tests for partial output updates.
//! Responsibilities: Verify merge semantics, default demotion, preconfiguration locks,
//! type-change clearing and the Logstash guards on the merged view.
//! Non-scope: Does not cover creation-time checks (see `create_tests.rs`).
//! Invariants/Assumptions: Every test runs against fresh in-memory adapters.

mod common;

use common::*;
use fleet_outputs::models::ShipperConfig;

async fn preconfigured(h: &Harness, id: &str, allow_edit: Vec<OutputField>, is_default: bool) -> Output {
    h.service
        .create(
            NewOutput {
                is_preconfigured: true,
                is_default,
                allow_edit,
                ..elasticsearch_output("preconfigured", &["http://es:9200"])
            },
            CreateOptions {
                from_preconfiguration: true,
                ..CreateOptions::with_id(id)
            },
        )
        .await
        .expect("create preconfigured output")
}

#[tokio::test]
async fn test_update_merges_present_fields_only() {
    let h = Harness::new();
    let output = h
        .create(
            "es",
            NewOutput {
                proxy_id: Some("proxy-1".to_string()),
                ..elasticsearch_output("before", &["http://es:9200"])
            },
        )
        .await;

    h.service
        .update(
            &output.id,
            OutputPatch {
                name: Some("after".to_string()),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();

    let updated = h.service.get(&output.id).await.unwrap();
    assert_eq!(updated.name, "after");
    assert_eq!(updated.hosts, output.hosts);
    assert_eq!(updated.proxy_id.as_deref(), Some("proxy-1"));
}

#[tokio::test]
async fn test_update_clears_field() {
    let h = Harness::new();
    let output = h
        .create(
            "es",
            NewOutput {
                proxy_id: Some("proxy-1".to_string()),
                ..elasticsearch_output("es", &["http://es:9200"])
            },
        )
        .await;

    h.service
        .update(
            "es",
            OutputPatch {
                proxy_id: Patch::Clear,
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(h.service.get(&output.id).await.unwrap().proxy_id, None);
}

#[tokio::test]
async fn test_update_missing_output_is_not_found() {
    let h = Harness::new();

    let err = h
        .service
        .update("ghost", OutputPatch::is_default(true), UpdateOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_update_to_default_demotes_previous() {
    let h = Harness::new();
    let first = h
        .create(
            "first",
            NewOutput {
                is_default: true,
                is_default_monitoring: true,
                ..elasticsearch_output("first", &["http://a:9200"])
            },
        )
        .await;
    let second = h
        .create("second", elasticsearch_output("second", &["http://b:9200"]))
        .await;

    h.service
        .update(
            &second.id,
            OutputPatch {
                is_default: Some(true),
                is_default_monitoring: Some(true),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();

    let (defaults, monitoring) = h.default_ids().await;
    assert_eq!(defaults, vec![second.id.clone()]);
    assert_eq!(monitoring, vec![second.id]);
    let first = h.service.get(&first.id).await.unwrap();
    assert!(!first.is_default);
    assert!(!first.is_default_monitoring);
}

#[tokio::test]
async fn test_update_default_on_current_default_keeps_it() {
    let h = Harness::new();
    let output = h
        .create(
            "es",
            NewOutput {
                is_default: true,
                ..elasticsearch_output("es", &["http://es:9200"])
            },
        )
        .await;

    h.service
        .update(&output.id, OutputPatch::is_default(true), UpdateOptions::default())
        .await
        .unwrap();

    assert!(h.service.get(&output.id).await.unwrap().is_default);
}

#[tokio::test]
async fn test_update_normalises_elasticsearch_hosts() {
    let h = Harness::new();
    let output = h.create("es", elasticsearch_output("es", &["http://es:9200"])).await;

    h.service
        .update(
            &output.id,
            OutputPatch {
                hosts: Some(vec!["https://cloud.example.com/".to_string()]),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(
        h.service.get(&output.id).await.unwrap().hosts,
        vec!["https://cloud.example.com:443".to_string()]
    );
}

#[tokio::test]
async fn test_preconfigured_field_locked_at_runtime() {
    let h = Harness::new();
    let output = preconfigured(&h, "locked", Vec::new(), false).await;

    let err = h
        .service
        .update(
            "locked",
            OutputPatch {
                name: Some("renamed".to_string()),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "Preconfigured output {} name cannot be updated outside of the config file.",
            output.id
        )
    );
    assert_eq!(err.status_code(), 403);
    assert_eq!(h.service.get("locked").await.unwrap().name, "preconfigured");
}

#[tokio::test]
async fn test_preconfigured_allow_edit_permits_listed_fields() {
    let h = Harness::new();
    preconfigured(&h, "editable", vec![OutputField::Name], false).await;

    h.service
        .update(
            "editable",
            OutputPatch {
                name: Some("renamed".to_string()),
                hosts: Some(vec!["http://es:9200".to_string()]),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(h.service.get("editable").await.unwrap().name, "renamed");
}

#[tokio::test]
async fn test_preconfiguration_bypasses_lock() {
    let h = Harness::new();
    preconfigured(&h, "locked", Vec::new(), false).await;

    h.service
        .update(
            "locked",
            OutputPatch {
                name: Some("from config".to_string()),
                ..OutputPatch::default()
            },
            UpdateOptions {
                from_preconfiguration: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(h.service.get("locked").await.unwrap().name, "from config");
}

#[tokio::test]
async fn test_runtime_default_cannot_demote_locked_preconfigured_default() {
    let h = Harness::new();
    preconfigured(&h, "pre-default", Vec::new(), true).await;

    let err = h
        .service
        .create(
            NewOutput {
                is_default: true,
                ..elasticsearch_output("runtime", &["http://es:9200"])
            },
            CreateOptions::with_id("runtime"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, OutputError::Unauthorized(_)));
    assert!(h.service.get("pre-default").await.unwrap().is_default);
    assert!(h.service.get("runtime").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_elasticsearch_to_logstash_rejected_for_fleet_server() {
    let h = Harness::with_policies(vec![fleet_server_policy("fs")]);
    let output = h
        .create(
            "es",
            NewOutput {
                is_default: true,
                ..elasticsearch_output("es", &["http://es:9200"])
            },
        )
        .await;

    let err = h
        .service
        .update(
            &output.id,
            OutputPatch {
                output_type: Some(OutputType::Logstash),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, OutputError::InvalidOutput(_)));
    assert!(err.to_string().contains("Fleet Server fs"));
    assert_eq!(
        h.service.get(&output.id).await.unwrap().output_type,
        OutputType::Elasticsearch
    );
}

#[tokio::test]
async fn test_elasticsearch_to_logstash_requires_encryption() {
    let h = Harness::without_encryption();
    let output = h.create("es", elasticsearch_output("es", &["http://es:9200"])).await;

    let err = h
        .service
        .update(
            &output.id,
            OutputPatch {
                output_type: Some(OutputType::Logstash),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, OutputError::EncryptionRequired(_)));
}

#[tokio::test]
async fn test_logstash_update_rejected_when_apm_uses_it() {
    let h = Harness::new();
    let output = h.create("ls", logstash_output("ls", &["logstash:5044"])).await;
    h.policies
        .insert(apm_policy("apm").with_data_output(output.id.clone()))
        .await;

    let err = h
        .service
        .update(
            &output.id,
            OutputPatch {
                name: Some("renamed".to_string()),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Logstash output cannot be used with APM integration."
    );
}

#[tokio::test]
async fn test_switch_to_logstash_clears_ca_fields() {
    let h = Harness::new();
    let output = h
        .create(
            "es",
            NewOutput {
                ca_sha256: Some("abc".to_string()),
                ca_trusted_fingerprint: Some("def".to_string()),
                ..elasticsearch_output("es", &["http://es:9200"])
            },
        )
        .await;

    h.service
        .update(
            &output.id,
            OutputPatch {
                output_type: Some(OutputType::Logstash),
                hosts: Some(vec!["logstash:5044".to_string()]),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();

    let updated = h.service.get(&output.id).await.unwrap();
    assert_eq!(updated.output_type, OutputType::Logstash);
    assert_eq!(updated.ca_sha256, None);
    assert_eq!(updated.ca_trusted_fingerprint, None);
    assert_eq!(updated.hosts, vec!["logstash:5044".to_string()]);
}

#[tokio::test]
async fn test_switch_to_elasticsearch_clears_ssl() {
    let h = Harness::new();
    let output = h.create("ls", logstash_output("ls", &["logstash:5044"])).await;

    h.service
        .update(
            &output.id,
            OutputPatch {
                output_type: Some(OutputType::Elasticsearch),
                hosts: Some(vec!["https://es.example.com".to_string()]),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();

    let updated = h.service.get(&output.id).await.unwrap();
    assert_eq!(updated.ssl, None);
    assert_eq!(updated.hosts, vec!["https://es.example.com:443".to_string()]);
}

#[tokio::test]
async fn test_logstash_becoming_default_pins_fleet_server_policies() {
    let h = Harness::with_policies(vec![fleet_server_policy("fs")]);
    let es = h
        .create(
            "es",
            NewOutput {
                is_default: true,
                ..elasticsearch_output("es", &["http://es:9200"])
            },
        )
        .await;
    let ls = h.create("ls", logstash_output("ls", &["logstash:5044"])).await;

    h.service
        .update(&ls.id, OutputPatch::is_default(true), UpdateOptions::default())
        .await
        .unwrap();

    assert_eq!(
        h.policies.get("fs").await.unwrap().data_output_id,
        Some(es.id.clone())
    );
    let (defaults, _) = h.default_ids().await;
    assert_eq!(defaults, vec![ls.id]);
}

#[tokio::test]
async fn test_update_rejects_invalid_config_yaml() {
    let h = Harness::new();
    let output = h.create("es", elasticsearch_output("es", &["http://es:9200"])).await;

    let err = h
        .service
        .update(
            &output.id,
            OutputPatch {
                config_yaml: Patch::Set("a: [".to_string()),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, OutputError::InvalidConfigYaml(_)));
}

#[tokio::test]
async fn test_shipper_kept_when_stored_config_enables_it() {
    let h = Harness::new();
    let output = h
        .create(
            "es",
            NewOutput {
                config_yaml: Some("shipper:\n  enabled: true\n".to_string()),
                ..elasticsearch_output("es", &["http://es:9200"])
            },
        )
        .await;
    let shipper = ShipperConfig {
        loadbalance: Some(true),
        ..ShipperConfig::default()
    };

    h.service
        .update(
            &output.id,
            OutputPatch {
                shipper: Patch::Set(shipper.clone()),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(h.service.get(&output.id).await.unwrap().shipper, Some(shipper.clone()));

    h.service
        .update(
            &output.id,
            OutputPatch {
                config_yaml: Patch::Clear,
                shipper: Patch::Set(shipper),
                ..OutputPatch::default()
            },
            UpdateOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(h.service.get(&output.id).await.unwrap().shipper, None);
}

#[tokio::test]
async fn test_update_is_audited() {
    let h = Harness::new();
    let output = h.create("es", elasticsearch_output("es", &["http://es:9200"])).await;

    h.service
        .update(&output.id, OutputPatch::is_default(true), UpdateOptions::default())
        .await
        .unwrap();

    assert_eq!(h.audit.ids_for(AuditAction::Update), vec![output.id]);
}
