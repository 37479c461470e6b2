//! Integration tests for CLI commands
//!
//! Everything here runs offline; cluster commands are exercised only up to
//! the point where they would need a connection.

use std::process::Command;

const VPA: &str = "k8s_autoscaling_k8s_io_vertical_pod_autoscaler_v1";
const INFRASTRUCTURE: &str = "k8s_config_openshift_io_infrastructure_v1";

/// Helper to run k8sform command
fn k8sform(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_k8sform"))
        .args(args)
        .env_remove("K8SFORM_CONFIG")
        .env_remove("K8SFORM_OFFLINE")
        .output()
        .expect("Failed to execute k8sform")
}

fn fixture(name: &str) -> String {
    format!("{}/../../fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod catalog_command {
    use super::*;

    #[test]
    fn test_catalog_lists_builtin_types() {
        let output = k8sform(&["catalog"]);
        assert!(output.status.success());

        let out = stdout(&output);
        assert!(out.contains(VPA));
        assert!(out.contains("k8s_cert_manager_io_certificate_v1"));
        assert!(out.contains(INFRASTRUCTURE));
        assert!(out.contains("k8s_config_openshift_io_o_auth_v1"));
    }

    #[test]
    fn test_catalog_json_with_extra_crds() {
        let output = k8sform(&["catalog", "--json", "--crd", &fixture("crds")]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let json: serde_json::Value =
            serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 5);

        let widget = entries
            .iter()
            .find(|e| e["resource"] == "k8s_example_com_widget_v1")
            .unwrap();
        assert_eq!(widget["data_source"], "k8s_example_com_widget_v1_manifest");
        assert_eq!(widget["api_version"], "example.com/v1");
        assert_eq!(widget["namespaced"], true);
    }

    #[test]
    fn test_missing_crd_path() {
        let output = k8sform(&["catalog", "--crd", &fixture("does-not-exist.yaml")]);
        assert_eq!(output.status.code(), Some(5));
    }
}

mod schema_command {
    use super::*;

    #[test]
    fn test_resource_schema() {
        let output = k8sform(&["schema", VPA]);
        assert!(output.status.success());

        let out = stdout(&output);
        assert!(out.contains(&format!("resource \"{}\"", VPA)));
        assert!(out.contains("update_mode (string, optional) one of: Off, Initial, Recreate, Auto"));
        assert!(out.contains("deletion_propagation"));
    }

    #[test]
    fn test_data_source_schema_json() {
        let output = k8sform(&["schema", &format!("{}_manifest", VPA), "--json"]);
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        let names: Vec<_> = json["attributes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"yaml".to_string()));
        assert!(!names.contains(&"field_manager".to_string()));
    }

    #[test]
    fn test_full_schema_json() {
        let output = k8sform(&["schema", "--json"]);
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["resources"].as_object().unwrap().len(), 4);
        assert_eq!(json["data_sources"].as_object().unwrap().len(), 4);
        assert!(json["provider"]["attributes"].is_array());
    }

    #[test]
    fn test_unknown_type_suggests() {
        let output = k8sform(&["schema", "k8s_cert_manager_io_certificate_v2"]);
        assert_eq!(output.status.code(), Some(3));
        assert!(stderr(&output).contains("k8s_cert_manager_io_certificate_v1"));
    }
}

mod manifest_command {
    use super::*;

    #[test]
    fn test_manifest_renders_yaml() {
        let output = k8sform(&[
            "manifest",
            &format!("{}_manifest", VPA),
            "-f",
            &fixture("vpa.yaml"),
        ]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let out = stdout(&output);
        assert!(out.starts_with("apiVersion: autoscaling.k8s.io/v1\nkind: VerticalPodAutoscaler\n"));
        assert!(out.contains("updateMode: Auto"));
        assert!(out.contains("minReplicas: 2"));

        let parsed: serde_json::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed["metadata"]["namespace"], "apps");
        assert_eq!(parsed["metadata"]["labels"]["app.kubernetes.io/name"], "web");
        assert_eq!(parsed["spec"]["targetRef"]["apiVersion"], "apps/v1");
    }

    #[test]
    fn test_manifest_accepts_resource_name() {
        let output = k8sform(&["manifest", INFRASTRUCTURE, "-f", &fixture("infrastructure.yaml")]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let out = stdout(&output);
        assert!(out.contains("kind: Infrastructure"));
        assert!(out.contains("type: BareMetal"));
        assert!(!out.contains("namespace:"));
    }

    #[test]
    fn test_cluster_scoped_manifest_snapshot() {
        let output = k8sform(&[
            "manifest",
            &format!("{}_manifest", INFRASTRUCTURE),
            "-f",
            &fixture("infrastructure.yaml"),
        ]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        insta::assert_snapshot!(stdout(&output), @r"
        apiVersion: config.openshift.io/v1
        kind: Infrastructure
        metadata:
          name: cluster
        spec:
          platformSpec:
            type: BareMetal
        ");
    }

    #[test]
    fn test_manifest_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vpa.yaml");
        let output = k8sform(&[
            "manifest",
            VPA,
            "-f",
            &fixture("vpa.yaml"),
            "-o",
            path.to_str().unwrap(),
        ]);
        assert!(output.status.success());
        assert!(std::fs::read_to_string(&path).unwrap().contains("kind: VerticalPodAutoscaler"));
    }

    #[test]
    fn test_manifest_rejects_invalid_enum() {
        let output = k8sform(&["manifest", VPA, "-f", &fixture("vpa-bad-enum.yaml")]);
        assert_eq!(output.status.code(), Some(2));
        assert!(output.stdout.is_empty());
        assert!(stderr(&output).contains("value must be one of"));
    }
}

mod validate_command {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let output = k8sform(&["validate", VPA, "-f", &fixture("vpa.yaml")]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("is a valid"));
    }

    #[test]
    fn test_validate_invalid_enum() {
        let output = k8sform(&["validate", VPA, "-f", &fixture("vpa-bad-enum.yaml")]);
        assert_eq!(output.status.code(), Some(2));

        let err = stderr(&output);
        assert!(err.contains("Invalid Attribute Value"));
        assert!(err.contains("spec.update_policy.update_mode"));
        assert!(err.contains("\"Sometimes\""));
    }

    #[test]
    fn test_validate_json_output_with_errors() {
        let output = k8sform(&["validate", VPA, "-f", &fixture("vpa-bad-enum.yaml"), "--json"]);
        assert_eq!(output.status.code(), Some(2));

        let json: serde_json::Value =
            serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
        let diagnostics = json.as_array().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0]["severity"], "error");
        assert_eq!(diagnostics[0]["summary"], "Invalid Attribute Value");
    }

    #[test]
    fn test_validate_missing_file() {
        let output = k8sform(&["validate", VPA, "-f", &fixture("nope.yaml")]);
        assert_eq!(output.status.code(), Some(5));
    }
}

mod cluster_commands {
    use super::*;

    #[test]
    fn test_plan_offline_shows_desired_object() {
        let output = k8sform(&["plan", VPA, "-f", &fixture("vpa.yaml"), "--offline"]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let out = stdout(&output);
        assert!(out.contains("create"));
        assert!(out.contains("apps/web"));
        assert!(out.contains("+ kind: VerticalPodAutoscaler"));
    }

    #[test]
    fn test_read_offline_is_a_single_diagnostic() {
        let output = k8sform(&["read", VPA, "apps/web", "--offline"]);
        assert_eq!(output.status.code(), Some(6));

        let err = stderr(&output);
        assert!(err.contains("Unable to manage VerticalPodAutoscaler"));
        assert!(err.contains("Provider is offline"));
    }

    #[test]
    fn test_apply_offline_from_config_file() {
        let output = k8sform(&[
            "apply",
            VPA,
            "-f",
            &fixture("vpa.yaml"),
            "--config",
            &fixture("provider.yaml"),
        ]);
        assert_eq!(output.status.code(), Some(6));
        assert!(stderr(&output).contains("Provider is offline"));
    }

    #[test]
    fn test_import_rejects_malformed_id() {
        let output = k8sform(&["import", VPA, "web", "--offline"]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("Error parsing ID"));

        let output = k8sform(&["import", INFRASTRUCTURE, "default/cluster", "--offline"]);
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_delete_requires_a_target() {
        let output = k8sform(&["delete", VPA, "--offline"]);
        assert!(!output.status.success());
    }

    #[test]
    fn test_delete_rejects_unknown_propagation() {
        let output = k8sform(&["delete", VPA, "apps/web", "--propagation", "Eventually"]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("Background"));
    }
}

mod examples_commands {
    use super::*;

    #[test]
    fn test_generate_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();

        let output = k8sform(&["check-examples", out]);
        assert_eq!(output.status.code(), Some(4));

        let output = k8sform(&["generate", "--out", out]);
        assert!(output.status.success());
        assert!(
            dir.path()
                .join("resources")
                .join(VPA)
                .join("resource.tf")
                .is_file()
        );

        let output = k8sform(&["check-examples", out]);
        assert!(output.status.success(), "stdout: {}", stdout(&output));
    }

    #[test]
    fn test_checked_in_demos_are_current() {
        let demos = format!("{}/../../demos", env!("CARGO_MANIFEST_DIR"));
        let output = k8sform(&["check-examples", &demos]);
        assert!(output.status.success(), "stdout: {}", stdout(&output));
    }
}
