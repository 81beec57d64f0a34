//! Property tests for `Nyo.toml` resolution.

use proptest::prelude::*;

use nyo::error::{ConfigError, Violation};
use nyo::project::ConfigResolver;

const SERVICE_FIELDS: &[&str] = &["path", "use", "prepare", "nodes", "tools"];
const DATABASE_FIELDS: &[&str] = &["type", "name", "username", "password"];

fn ident() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,10}")
        .unwrap()
        .prop_filter("not a reserved or top-level key", |s| {
            s != "database" && s != "name"
        })
}

fn text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ./_-]{1,20}")
        .unwrap()
        .prop_filter("not blank", |s| !s.trim().is_empty())
}

fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| format!("{:?}", i)).collect();
    format!("[{}]", quoted.join(", "))
}

fn service_lines(
    path: &str,
    runtime: &str,
    prepare: &[String],
    nodes: &[String],
    tools: &[String],
) -> Vec<(&'static str, String)> {
    vec![
        ("path", format!("path = {:?}", path)),
        ("use", format!("use = {:?}", runtime)),
        ("prepare", format!("prepare = {}", quoted_list(prepare))),
        ("nodes", format!("nodes = {}", quoted_list(nodes))),
        ("tools", format!("tools = {}", quoted_list(tools))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a well-formed service resolves to `{name}-{section}` with every field as written.
    #[test]
    fn property_service_fields_round_trip(
        project in ident(),
        section in ident(),
        path in text(),
        runtime in text(),
        prepare in proptest::collection::vec(text(), 0..4),
        nodes in proptest::collection::vec(ident(), 0..4),
        tools in proptest::collection::vec(text(), 0..4),
    ) {
        let body: Vec<String> = service_lines(&path, &runtime, &prepare, &nodes, &tools)
            .into_iter()
            .map(|(_, line)| line)
            .collect();
        let doc = format!("name = {:?}\n\n[{}]\n{}\n", project, section, body.join("\n"));

        let resolved = ConfigResolver::default().resolve(doc.as_bytes()).unwrap();

        prop_assert_eq!(resolved.services.len(), 1);
        let service = &resolved.services[0];
        prop_assert_eq!(&service.name, &format!("{}-{}", project, section));
        prop_assert_eq!(&service.path, &path);
        prop_assert_eq!(&service.runtime, &runtime);
        prop_assert_eq!(&service.prepare, &prepare);
        prop_assert_eq!(&service.nodes, &nodes);
        prop_assert_eq!(&service.tools, &tools);
    }

    /// PROPERTY: dropping any one service field names exactly that field.
    #[test]
    fn property_missing_service_field_is_named(
        section in ident(),
        missing in 0..SERVICE_FIELDS.len(),
    ) {
        let lines = service_lines(
            "./app",
            "bun",
            &["bun install".to_string()],
            &["server1".to_string()],
            &[],
        );
        let body: Vec<String> = lines
            .into_iter()
            .filter(|(field, _)| *field != SERVICE_FIELDS[missing])
            .map(|(_, line)| line)
            .collect();
        let doc = format!("name = \"p\"\n[{}]\n{}\n", section, body.join("\n"));

        let err = ConfigResolver::default().resolve(doc.as_bytes()).unwrap_err();
        let violations = err.violations();
        prop_assert_eq!(violations.len(), 1);
        match &violations[0] {
            Violation::MissingServiceField { section: s, field } => {
                prop_assert_eq!(s, &section);
                prop_assert_eq!(*field, SERVICE_FIELDS[missing]);
            }
            other => prop_assert!(false, "unexpected violation: {other}"),
        }
    }

    /// PROPERTY: dropping any one database field names exactly that field.
    #[test]
    fn property_missing_database_field_is_named(missing in 0..DATABASE_FIELDS.len()) {
        let lines = [
            ("type", "type = \"postgres\""),
            ("name", "name = \"db\""),
            ("username", "username = \"u\""),
            ("password", "password = \"p\""),
        ];
        let body: Vec<&str> = lines
            .iter()
            .filter(|(field, _)| *field != DATABASE_FIELDS[missing])
            .map(|(_, line)| *line)
            .collect();
        let doc = format!("name = \"p\"\n[database]\n{}\n", body.join("\n"));

        let err = ConfigResolver::default().resolve(doc.as_bytes()).unwrap_err();
        match err.violations() {
            [Violation::MissingDatabaseField { field, .. }] => {
                prop_assert_eq!(*field, DATABASE_FIELDS[missing]);
            }
            other => prop_assert!(false, "unexpected violations: {other:?}"),
        }
    }

    /// PROPERTY: without a project name the error is always the project-name error.
    #[test]
    fn property_missing_name_wins(sections in proptest::collection::vec(ident(), 0..4)) {
        let mut doc = String::new();
        for section in &sections {
            doc.push_str(&format!("[{}]\npath = 1\n", section));
        }
        // duplicate table headers are a parse error, which is a different input class
        prop_assume!(toml::from_str::<toml::Table>(&doc).is_ok());

        let err = ConfigResolver::default().resolve(doc.as_bytes()).unwrap_err();
        prop_assert!(matches!(err, ConfigError::MissingProjectName));
    }

    /// PROPERTY: resolution is a pure function of the input bytes.
    #[test]
    fn property_resolution_is_deterministic(input in proptest::collection::vec(any::<u8>(), 0..256)) {
        let resolver = ConfigResolver::default();
        let first = resolver.resolve(&input).map_err(|e| e.to_string());
        let second = resolver.resolve(&input).map_err(|e| e.to_string());
        prop_assert_eq!(first, second);
    }
}
