use super::*;

use std::collections::HashMap;

fn target() -> WindowTarget {
    WindowTarget::new("Report.docx - Word", "OpusApp", "WINWORD.EXE").with_pid(4120)
}

#[test]
fn test_parse_empty_and_array() {
    assert!(parse_helper_output("").unwrap().is_empty());
    assert!(parse_helper_output("  \n").unwrap().is_empty());
    assert!(parse_helper_output("[]").unwrap().is_empty());

    let elements = parse_helper_output(
        r#"[{"type":"Button","name":"Save","x":10,"y":20.6,"width":80,"height":24},
            {"type":"Button","name":"Ghost","x":0,"y":0,"width":0,"height":0}]"#,
    )
    .unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].name, "Save");
    assert!(elements[0].is_enabled);
}

#[test]
fn test_parse_wrapped_object() {
    let elements = parse_helper_output(
        r#"{"elements":[{"type":"Edit","name":"Search","x":5,"y":5,"width":200,"height":30,"isEnabled":false,
            "automationId":"search-box"}]}"#,
    )
    .unwrap();
    assert_eq!(elements[0].element_type, "Edit");
    assert_eq!(elements[0].automation_id.as_deref(), Some("search-box"));
    assert!(!elements[0].is_enabled);

    assert!(parse_helper_output("{}").unwrap().is_empty());
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(parse_helper_output("Traceback (most recent call last):").is_err());
    assert!(parse_helper_output("42").is_err());
}

#[test]
fn test_substitute_placeholders() {
    let t = target();
    assert_eq!(substitute("--window={window}", &t), "--window=Report.docx - Word");
    assert_eq!(substitute("{class}:{process}:{pid}", &t), "OpusApp:WINWORD.EXE:4120");
    assert_eq!(substitute("{pid}", &WindowTarget::default()), "");
}

#[test]
fn test_all_from_config() {
    let mut helpers = HashMap::new();
    for name in ["shell", "accessibility", "browser", "bogus"] {
        helpers.insert(
            name.to_string(),
            HelperConfig {
                program: PathBuf::from("/usr/bin/true"),
                args: Vec::new(),
                timeout_ms: (name == "shell").then_some(900),
            },
        );
    }
    let config = DiscoveryConfig {
        helpers,
        ..Default::default()
    };

    let sources = HelperSource::all_from_config(&config);
    let kinds: Vec<SourceKind> = sources.iter().map(|s| s.kind()).collect();
    assert_eq!(kinds, vec![SourceKind::Accessibility, SourceKind::Shell]);
    assert_eq!(sources[1].timeout, Duration::from_millis(900));
    assert_eq!(sources[0].timeout, config.helper_timeout());
}

#[cfg(unix)]
mod process {
    use super::*;

    fn sh(kind: SourceKind, script: &str, timeout: Duration) -> HelperSource {
        HelperSource::new(kind, "sh", vec!["-c".to_string(), script.to_string()], timeout)
    }

    #[tokio::test]
    async fn test_runs_helper_with_placeholders() {
        let script = r#"printf '[{"type":"Button","name":"%s","x":1,"y":2,"width":3,"height":4}]' "$0""#;
        let source = HelperSource::new(
            SourceKind::Accessibility,
            "sh",
            vec!["-c".to_string(), script.to_string(), "{process}".to_string()],
            Duration::from_secs(5),
        );

        let elements = source.run(&target()).await.unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name, "WINWORD.EXE");
    }

    #[tokio::test]
    async fn test_failures_yield_no_elements() {
        let t = target();
        let failing = sh(SourceKind::Shell, "echo boom >&2; exit 3", Duration::from_secs(5));
        assert!(failing.run(&t).await.unwrap().is_empty());

        let garbage = sh(SourceKind::Shell, "echo not-json", Duration::from_secs(5));
        assert!(garbage.run(&t).await.unwrap().is_empty());

        let slow = sh(SourceKind::Shell, "sleep 5; echo []", Duration::from_millis(100));
        assert!(slow.run(&t).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = HelperSource::new(
            SourceKind::Shell,
            dir.path().join("no-such-helper"),
            Vec::new(),
            Duration::from_secs(1),
        );
        let err = source.run(&target()).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Helper(_)));
    }
}
