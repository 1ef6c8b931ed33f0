//! CLI integration tests for the fluent-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("fluent-schema"))
}

// Helper to create a temp file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const PERSON: &str = r#"{
    "type": "object",
    "properties": {
        "name": { "type": "string" },
        "age": { "oneOf": [{ "type": "integer" }, { "type": "null" }] },
        "email": { "type": "string", "format": "email" }
    },
    "required": ["name", "email"]
}"#;

mod validate_command {
    use super::*;

    #[test]
    fn valid_payload() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);
        let payload = write_temp_file(
            &dir,
            "payload.json",
            r#"{"name":"Ada","age":null,"email":"ada@example.com"}"#,
        );

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid"));
    }

    #[test]
    fn invalid_payload_exit_code_one() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);
        let payload = write_temp_file(
            &dir,
            "payload.json",
            r#"{"name":1,"email":"ada@example.com"}"#,
        );

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("/name"))
            .stderr(predicate::str::contains("string"));
    }

    #[test]
    fn json_output() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name":"Ada"}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--json",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains("email"));
    }

    #[test]
    fn strict_rejects_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);
        let payload = write_temp_file(
            &dir,
            "payload.json",
            r#"{"name":"Ada","email":"ada@example.com","extra":1}"#,
        );

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .success();

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--strict",
                "true",
            ])
            .assert()
            .code(1);
    }

    #[test]
    fn formats_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name":"Ada","email":"nope"}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--formats",
                "false",
            ])
            .assert()
            .success();
    }

    #[test]
    fn missing_payload_exit_code_three() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);

        cmd()
            .args([
                "validate",
                "/nonexistent/payload.json",
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn broken_schema_exit_code_two() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", "{ nope");
        let payload = write_temp_file(&dir, "payload.json", "{}");

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(2);
    }
}

mod compose_commands {
    use super::*;

    #[test]
    fn pick_fields() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);

        cmd()
            .args([
                "pick",
                schema.to_str().unwrap(),
                "--field",
                "name",
                "--field",
                "age",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""required":["name"]"#))
            .stdout(predicate::str::contains("email").not());
    }

    #[test]
    fn pick_keeps_closed_schema_closed() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "closed.json",
            r#"{"type":"object","properties":{"a":{"type":"string"},"b":{"type":"integer"}},"required":["a"],"additionalProperties":false,"title":"User"}"#,
        );
        let picked = dir.path().join("picked.json");

        cmd()
            .args([
                "pick",
                schema.to_str().unwrap(),
                "--field",
                "a",
                "--output",
                picked.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&picked).unwrap();
        assert!(content.contains(r#""additionalProperties":false"#));
        assert!(content.contains(r#""title":"User""#));

        let payload = write_temp_file(&dir, "payload.json", r#"{"a":"x","zzz":1}"#);
        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                picked.to_str().unwrap(),
            ])
            .assert()
            .code(1);
    }

    #[test]
    fn extend_other_root_keywords_win() {
        let dir = TempDir::new().unwrap();
        let base = write_temp_file(
            &dir,
            "base.json",
            r#"{"type":"object","properties":{"a":{"type":"string"}},"required":["a"],"additionalProperties":false,"title":"Base"}"#,
        );
        let other = write_temp_file(
            &dir,
            "other.json",
            r#"{"type":"object","properties":{"b":{"type":"string"}},"required":[],"title":"Other"}"#,
        );

        cmd()
            .args(["extend", base.to_str().unwrap(), other.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""additionalProperties":false"#))
            .stdout(predicate::str::contains(r#""title":"Other""#))
            .stdout(predicate::str::contains("Base").not());
    }

    #[test]
    fn pick_unknown_field_fails() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);

        cmd()
            .args(["pick", schema.to_str().unwrap(), "--field", "nope"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown field"));
    }

    #[test]
    fn omit_fields() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON);

        cmd()
            .args(["omit", schema.to_str().unwrap(), "-f", "email"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""required":["name"]"#))
            .stdout(predicate::str::contains(r#""age""#));
    }

    #[test]
    fn extend_other_wins() {
        let dir = TempDir::new().unwrap();
        let base = write_temp_file(&dir, "base.json", PERSON);
        let other = write_temp_file(
            &dir,
            "other.json",
            r#"{"type":"object","properties":{"name":{"type":"integer"},"id":{"type":"string"}},"required":["id"]}"#,
        );

        cmd()
            .args(["extend", base.to_str().unwrap(), other.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""name":{"type":"integer"}"#))
            .stdout(predicate::str::contains(
                r#""required":["id","name","email"]"#,
            ));
    }

    #[test]
    fn extend_rejects_non_object_schema() {
        let dir = TempDir::new().unwrap();
        let base = write_temp_file(&dir, "base.json", PERSON);
        let other = write_temp_file(&dir, "other.json", r#"{"type":"string"}"#);

        cmd()
            .args(["extend", base.to_str().unwrap(), other.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("not an object schema"));
    }

    #[test]
    fn one_of_to_output_file() {
        let dir = TempDir::new().unwrap();
        let a = write_temp_file(
            &dir,
            "a.json",
            r#"{"type":"object","properties":{"kind":{"const":"email"}},"required":["kind"]}"#,
        );
        let b = write_temp_file(
            &dir,
            "b.json",
            r#"{"type":"object","properties":{"kind":{"const":"webhook"}},"required":["kind"]}"#,
        );
        let output = dir.path().join("combined.json");

        cmd()
            .args([
                "one-of",
                a.to_str().unwrap(),
                b.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
                "--pretty",
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        let combined: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(combined["oneOf"].as_array().unwrap().len(), 2);
        assert_eq!(
            combined["oneOf"][1]["properties"]["kind"]["const"],
            "webhook"
        );
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn clean_schema_passes() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "person.json", PERSON);

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 files checked, all passed"));
    }

    #[test]
    fn missing_required_property_fails() {
        let dir = TempDir::new().unwrap();
        write_temp_file(
            &dir,
            "bad.json",
            r#"{"type":"object","properties":{},"required":["ghost"]}"#,
        );

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E002"));
    }

    #[test]
    fn warnings_fail_only_in_strict_mode() {
        let dir = TempDir::new().unwrap();
        write_temp_file(
            &dir,
            "union.json",
            r#"{"type":"object","properties":{"a":{"type":["string","null"]}}}"#,
        );

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .success();

        cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--strict"])
            .assert()
            .code(1);
    }

    #[test]
    fn json_format() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "person.json", PERSON);

        cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""files_checked": 1"#));
    }

    #[test]
    fn missing_path() {
        cmd()
            .args(["lint", "/nonexistent/dir"])
            .assert()
            .code(2);
    }
}
