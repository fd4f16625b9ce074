/// Tests for config module
#[cfg(test)]
mod tests {
    use crate::cli::{CliArgs, Command};
    use crate::config::*;
    use crate::error::NotifierError;
    use crate::notifier::{DEFAULT_ENVIRONMENT, DEFAULT_TEST_NAME};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args_with_config(file: &NamedTempFile) -> CliArgs {
        CliArgs {
            config: Some(file.path().to_path_buf()),
            token: None,
            channel: None,
            user: None,
            test_name: None,
            environment: None,
            dashboards: vec![],
            graphs: vec![],
            dry_run: false,
            command: Command::Message { text: "hi".to_string() },
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    const FILE: &str = r#"
channel = "C-FILE"
user = "ci-bot"
test_name = "Checkout flow"

[dashboards]
overview = "https://grafana.example/d/abc"

[graphs]
latency = "https://grafana.example/render/d-solo/abc?panelId=2"
"#;

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = config_file("");
        let settings = resolve_with_env(&args_with_config(&file), env(&[])).unwrap();

        assert_eq!(settings.token, None);
        assert_eq!(settings.channel, None);
        assert_eq!(settings.message.test_name, DEFAULT_TEST_NAME);
        assert_eq!(settings.message.environment, DEFAULT_ENVIRONMENT);
        assert!(settings.message.links.dashboards.is_empty());
    }

    #[test]
    fn test_file_values_loaded() {
        let file = config_file(FILE);
        let settings = resolve_with_env(&args_with_config(&file), env(&[])).unwrap();

        assert_eq!(settings.channel.as_deref(), Some("C-FILE"));
        assert_eq!(settings.user.as_deref(), Some("ci-bot"));
        assert_eq!(settings.message.test_name, "Checkout flow");
        assert_eq!(settings.message.environment, DEFAULT_ENVIRONMENT);
        assert_eq!(settings.message.links.dashboards["overview"], "https://grafana.example/d/abc");
        assert_eq!(settings.message.links.graphs.len(), 1);
    }

    #[test]
    fn test_camel_case_key_aliases_accepted() {
        let file = config_file(
            r#"
slackChannelID = "C-LEGACY"

[dashboardUrls]
main = "https://grafana.example/d/main"
"#,
        );
        let settings = resolve_with_env(&args_with_config(&file), env(&[])).unwrap();

        assert_eq!(settings.channel.as_deref(), Some("C-LEGACY"));
        assert_eq!(settings.message.links.dashboards["main"], "https://grafana.example/d/main");
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = config_file(FILE);
        let settings = resolve_with_env(
            &args_with_config(&file),
            env(&[
                (ENV_TOKEN, "xoxb-env"),
                (ENV_CHANNEL, "C-ENV"),
                (ENV_ENVIRONMENT, "production"),
                (ENV_DASHBOARD_URLS, r#"{"db": "https://grafana.example/d/db"}"#),
            ]),
        )
        .unwrap();

        assert_eq!(settings.token.as_deref(), Some("xoxb-env"));
        assert_eq!(settings.channel.as_deref(), Some("C-ENV"));
        assert_eq!(settings.message.environment, "production");
        let names: Vec<&str> = settings.message.links.dashboards.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["db", "overview"]);
    }

    #[test]
    fn test_blank_environment_values_ignored() {
        let file = config_file(FILE);
        let settings = resolve_with_env(&args_with_config(&file), env(&[(ENV_CHANNEL, "  ")])).unwrap();
        assert_eq!(settings.channel.as_deref(), Some("C-FILE"));
    }

    #[test]
    fn test_cli_overrides_environment() {
        let file = config_file(FILE);
        let mut args = args_with_config(&file);
        args.token = Some("xoxb-cli".to_string());
        args.channel = Some("C-CLI".to_string());
        args.test_name = Some("Smoke".to_string());
        args.dashboards = vec!["overview=https://grafana.example/d/override".to_string()];

        let settings =
            resolve_with_env(&args, env(&[(ENV_TOKEN, "xoxb-env"), (ENV_CHANNEL, "C-ENV")])).unwrap();

        assert_eq!(settings.token.as_deref(), Some("xoxb-cli"));
        assert_eq!(settings.channel.as_deref(), Some("C-CLI"));
        assert_eq!(settings.message.test_name, "Smoke");
        assert_eq!(settings.message.links.dashboards["overview"], "https://grafana.example/d/override");
    }

    #[test]
    fn test_invalid_link_json_is_configuration_error() {
        let file = config_file("");
        let err = resolve_with_env(&args_with_config(&file), env(&[(ENV_GRAPH_URLS, "[1, 2]")])).unwrap_err();
        assert!(matches!(err, NotifierError::Configuration(ref m) if m.contains(ENV_GRAPH_URLS)));
    }

    #[test]
    fn test_unknown_file_key_is_configuration_error() {
        let file = config_file("chanel = \"typo\"\n");
        let err = resolve_with_env(&args_with_config(&file), env(&[])).unwrap_err();
        assert!(matches!(err, NotifierError::Configuration(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let file = config_file("");
        let mut args = args_with_config(&file);
        args.config = Some(file.path().with_extension("does-not-exist"));

        let err = resolve_with_env(&args, env(&[])).unwrap_err();
        assert!(matches!(err, NotifierError::Io(_)));
    }

    #[test]
    fn test_empty_links_dropped() {
        let file = config_file("[dashboards]\nempty = \"\"\nok = \"https://grafana.example/d/ok\"\n");
        let settings = resolve_with_env(&args_with_config(&file), env(&[])).unwrap();

        assert_eq!(settings.message.links.dashboards.len(), 1);
        assert!(settings.message.links.dashboards.contains_key("ok"));
    }

    #[test]
    fn test_parse_link_pairs() {
        let pairs = vec!["a=https://x/?q=1".to_string(), " b = https://y ".to_string()];
        let links = parse_link_pairs(&pairs).unwrap();

        assert_eq!(links["a"], "https://x/?q=1");
        assert_eq!(links["b"], "https://y");
        assert!(parse_link_pairs(&["no-equals".to_string()]).is_err());
    }
}
