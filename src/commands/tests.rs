//! Tests for command implementations.

use super::check::check_template;
use super::convert::cmd_convert;
use super::dispatch;
use super::format::run_format;
use crate::cli::{CheckArgs, Command, ConvertArgs, FormatArgs};
use crate::config::Config;
use crate::error::FormatError;
use crate::test_support::{CHAT_TEMPLATE, DirGuard, Workspace, create_workspace};
use serial_test::serial;
use std::fs;

fn format_args(ws: &Workspace) -> FormatArgs {
    FormatArgs {
        prompts: ws.prompts.clone(),
        template: ws.template.clone(),
        output: Some(ws.prefix("batch")),
        placeholder: None,
        vars: Vec::new(),
    }
}

#[test]
fn test_format_writes_pair() {
    let ws = create_workspace(CHAT_TEMPLATE, "Design a logo\nWrite a tagline\n");

    let outcome = run_format(format_args(&ws), Config::default()).unwrap();

    assert_eq!(outcome.record_count, 2);
    assert_eq!(ws.output_entries(), vec!["batch.json", "batch.jsonl"]);
}

#[test]
fn test_format_with_custom_placeholder_and_vars() {
    let ws = create_workspace(
        r#"{"brand_challenge": "{{CHALLENGE}}", "brief": {"objective": "Solve {{CHALLENGE}} for {{client}}"}}"#,
        "Develop messaging for a B2B SaaS product\n",
    );
    let mut args = format_args(&ws);
    args.placeholder = Some("CHALLENGE".to_string());
    args.vars = vec![("client".to_string(), "Acme".to_string())];

    let outcome = run_format(args, Config::default()).unwrap();

    let jsonl = fs::read_to_string(outcome.jsonl_path).unwrap();
    assert_eq!(
        jsonl,
        "{\"brand_challenge\":\"Develop messaging for a B2B SaaS product\",\"brief\":{\"objective\":\"Solve Develop messaging for a B2B SaaS product for Acme\"}}\n"
    );
}

#[test]
fn test_format_rejects_reserved_var() {
    let ws = create_workspace(CHAT_TEMPLATE, "a\n");
    let mut args = format_args(&ws);
    args.vars = vec![("timestamp".to_string(), "now".to_string())];

    let err = run_format(args, Config::default()).unwrap_err();

    assert!(matches!(err, FormatError::UserError(_)));
    assert!(ws.output_entries().is_empty());
}

#[test]
#[serial]
fn test_format_default_prefix_uses_output_dir() {
    let ws = create_workspace(CHAT_TEMPLATE, "a\n");
    let _guard = DirGuard::new(ws.dir.path());
    let mut args = format_args(&ws);
    args.output = None;

    let outcome = run_format(args, Config::default()).unwrap();

    assert!(outcome.json_path.ends_with("outputs/prompts_template.json"));
    assert!(ws.dir.path().join("outputs").join("prompts_template.jsonl").exists());
}

#[test]
fn test_convert_matches_format_jsonl() {
    let ws = create_workspace(CHAT_TEMPLATE, "a\nb\n");
    let outcome = run_format(format_args(&ws), Config::default()).unwrap();
    let converted = ws.dir.path().join("converted.jsonl");

    cmd_convert(ConvertArgs {
        input: outcome.json_path.clone(),
        output: Some(converted.clone()),
    })
    .unwrap();

    assert_eq!(fs::read(converted).unwrap(), fs::read(outcome.jsonl_path).unwrap());
}

#[test]
fn test_check_reports_tokens_and_unbound() {
    let ws = create_workspace(
        r#"{"id": "t_{{timestamp}}", "c": "{{prompt}} {{brand}} {{audience}}"}"#,
        "",
    );
    let mut config = Config::default();
    config.variables.insert("brand".to_string(), "Acme".to_string());

    let report = check_template(
        CheckArgs {
            template: ws.template.clone(),
            placeholder: None,
        },
        config,
    )
    .unwrap();

    assert_eq!(report.prompt_token, "prompt");
    assert_eq!(report.tokens, vec!["audience", "brand", "prompt", "timestamp"]);
    assert_eq!(report.unbound, vec!["audience"]);
}

#[test]
fn test_check_rejects_template_without_prompt() {
    let ws = create_workspace(r#"{"c": "static"}"#, "");

    let err = check_template(
        CheckArgs {
            template: ws.template.clone(),
            placeholder: None,
        },
        Config::default(),
    )
    .unwrap_err();

    assert!(matches!(err, FormatError::Validation(_)));
}

#[test]
fn test_dispatch_with_missing_config_fails() {
    let ws = create_workspace(CHAT_TEMPLATE, "a\n");
    let missing = ws.dir.path().join("missing.yaml");

    let err = dispatch(Command::Format(format_args(&ws)), Some(missing.as_path())).unwrap_err();

    assert!(matches!(err, FormatError::UserError(_)));
    assert!(ws.output_entries().is_empty());
}

#[test]
fn test_dispatch_with_explicit_config() {
    let ws = create_workspace(r#"{"c": "{{CHALLENGE}}"}"#, "a\n");
    let config_path = ws.dir.path().join("custom.yaml");
    fs::write(&config_path, "prompt_token: CHALLENGE\n").unwrap();

    dispatch(Command::Format(format_args(&ws)), Some(config_path.as_path())).unwrap();

    assert_eq!(ws.output_entries(), vec!["batch.json", "batch.jsonl"]);
}
