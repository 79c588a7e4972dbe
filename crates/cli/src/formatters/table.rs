//! Table formatter implementation.
//!
//! Responsibilities:
//! - Format outputs, policies and reports as tab-separated tables.
//!
//! Does NOT handle:
//! - Other output formats.

use anyhow::Result;
use fleet_outputs::{AgentPolicy, Output, PreconfigurationReport};

use super::Formatter;
use super::common::format_missing;

/// Table formatter.
pub struct TableFormatter;

fn flags(output: &Output) -> String {
    let mut flags = Vec::new();
    if output.is_default {
        flags.push("default");
    }
    if output.is_default_monitoring {
        flags.push("monitoring");
    }
    if output.is_preconfigured {
        flags.push("preconfigured");
    }
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(",")
    }
}

impl Formatter for TableFormatter {
    fn format_outputs(&self, outputs: &[Output]) -> Result<String> {
        if outputs.is_empty() {
            return Ok("No outputs found.".to_string());
        }

        let mut output = String::from("ID\tName\tType\tHosts\tFlags\n");
        for o in outputs {
            output.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                o.id,
                o.name,
                o.output_type,
                o.hosts.join(","),
                flags(o)
            ));
        }
        Ok(output)
    }

    fn format_output(&self, o: &Output) -> Result<String> {
        let allow_edit = o
            .allow_edit
            .iter()
            .map(|field| field.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut output = String::new();
        output.push_str(&format!("ID: {}\n", o.id));
        output.push_str(&format!("Name: {}\n", o.name));
        output.push_str(&format!("Type: {}\n", o.output_type));
        output.push_str(&format!("Hosts: {}\n", o.hosts.join(", ")));
        output.push_str(&format!("Default: {}\n", o.is_default));
        output.push_str(&format!("Default monitoring: {}\n", o.is_default_monitoring));
        output.push_str(&format!("Preconfigured: {}\n", o.is_preconfigured));
        if o.is_preconfigured {
            output.push_str(&format!(
                "Allow edit: {}\n",
                if allow_edit.is_empty() { "-" } else { &allow_edit }
            ));
        }
        output.push_str(&format!("CA sha256: {}\n", format_missing(o.ca_sha256.as_deref())));
        output.push_str(&format!(
            "CA trusted fingerprint: {}\n",
            format_missing(o.ca_trusted_fingerprint.as_deref())
        ));
        output.push_str(&format!("Proxy: {}\n", format_missing(o.proxy_id.as_deref())));
        output.push_str(&format!(
            "SSL: {}\n",
            if o.ssl.is_some() { "configured" } else { "N/A" }
        ));
        output.push_str(&format!(
            "Shipper: {}\n",
            if o.shipper.is_some() { "configured" } else { "N/A" }
        ));
        if let Some(yaml) = &o.config_yaml {
            output.push_str("Config YAML:\n");
            for line in yaml.lines() {
                output.push_str(&format!("  {line}\n"));
            }
        }
        Ok(output)
    }

    fn format_deleted(&self, id: &str) -> Result<String> {
        Ok(format!("Deleted output {id}"))
    }

    fn format_policies(&self, policies: &[AgentPolicy]) -> Result<String> {
        if policies.is_empty() {
            return Ok("No agent policies found.".to_string());
        }

        let mut output = String::from("ID\tName\tData Output\tMonitoring Output\tPackages\tManaged\tRevision\n");
        for p in policies {
            output.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                p.id,
                p.name,
                p.data_output_id.as_deref().unwrap_or("(default)"),
                p.monitoring_output_id.as_deref().unwrap_or("(default)"),
                if p.package_policies.is_empty() {
                    "-".to_string()
                } else {
                    p.package_policies.join(",")
                },
                p.is_managed,
                p.revision
            ));
        }
        Ok(output)
    }

    fn format_preconfiguration_report(&self, report: &PreconfigurationReport) -> Result<String> {
        let rows = [
            ("Created", &report.created),
            ("Updated", &report.updated),
            ("Unchanged", &report.unchanged),
            ("Deleted", &report.deleted),
            ("Unmarked", &report.unmarked),
        ];

        let mut output = String::from("Action\tCount\tIDs\n");
        for (label, ids) in rows {
            output.push_str(&format!(
                "{}\t{}\t{}\n",
                label,
                ids.len(),
                if ids.is_empty() {
                    "-".to_string()
                } else {
                    ids.join(",")
                }
            ));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_have_messages() {
        assert_eq!(TableFormatter.format_outputs(&[]).unwrap(), "No outputs found.");
        assert_eq!(
            TableFormatter.format_policies(&[]).unwrap(),
            "No agent policies found."
        );
    }

    #[test]
    fn test_policy_without_output_follows_default() {
        let policy = AgentPolicy::new("p1", "Policy").with_package("fleet_server");
        let table = TableFormatter.format_policies(&[policy]).unwrap();
        assert!(table.contains("p1\tPolicy\t(default)\t(default)\tfleet_server\tfalse\t1"));
    }

    #[test]
    fn test_report_lists_ids() {
        let report = PreconfigurationReport {
            created: vec!["a".to_string(), "b".to_string()],
            ..PreconfigurationReport::default()
        };
        let table = TableFormatter.format_preconfiguration_report(&report).unwrap();
        assert!(table.contains("Created\t2\ta,b"));
        assert!(table.contains("Deleted\t0\t-"));
    }
}
