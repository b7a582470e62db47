use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use beseech::Session;
use clap::{Parser, Subcommand};
use serde_json::Value;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Schema-driven terminal prompting",
    long_about = "Runs a property schema as an interactive prompt sequence and emits the collected answers as JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prompt for every property in a JSON schema and print the answers.
    Ask {
        /// Path to the schema JSON (flat name→spec map or nested `properties` tree).
        #[arg(long, value_name = "SPEC")]
        schema: PathBuf,
        /// Pre-seeded answers that skip prompting, as NAME=VALUE pairs.
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
        /// Pretty-print the resulting JSON object.
        #[arg(long)]
        pretty: bool,
    },
    /// Ask one or more yes/no questions; exit status reflects the aggregate answer.
    Confirm {
        /// Messages to confirm, asked in order.
        #[arg(required = true)]
        messages: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Ask {
            schema,
            set,
            pretty,
        } => run_ask(schema, set, pretty),
        Command::Confirm { messages } => run_confirm(messages),
    };
    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_ask(schema_path: PathBuf, set: Vec<String>, pretty: bool) -> CliResult<ExitCode> {
    let contents = fs::read_to_string(&schema_path)?;
    let schema: Value = serde_json::from_str(&contents)?;

    let mut session = Session::standard();
    for pair in &set {
        let (name, value) = parse_override(pair)?;
        session.set_override(name, value);
    }
    session.start();

    let result = session.get(schema)?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", rendered);
    Ok(ExitCode::SUCCESS)
}

fn run_confirm(messages: Vec<String>) -> CliResult<ExitCode> {
    let mut session = Session::standard();
    session.start();
    let all_affirmative = session.confirm(messages)?;
    println!("{}", if all_affirmative { "yes" } else { "no" });
    Ok(if all_affirmative {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn parse_override(pair: &str) -> Result<(String, String), String> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!(
            "override '{}' is not in NAME=VALUE form",
            pair
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use serde_json::json;

    #[test]
    fn parse_override_splits_on_first_equals() {
        assert_eq!(
            parse_override("name=a=b").unwrap(),
            ("name".into(), "a=b".into())
        );
        assert!(parse_override("no-equals").is_err());
        assert!(parse_override("=value").is_err());
    }

    #[test]
    fn ask_runs_a_nested_schema_over_piped_stdin() -> CliResult<()> {
        let dir = assert_fs::TempDir::new()?;
        let schema_path = dir.path().join("schema.json");
        fs::write(
            &schema_path,
            json!({
                "properties": {
                    "url": { "required": true },
                    "auth": {
                        "properties": {
                            "username": { "required": true }
                        }
                    }
                }
            })
            .to_string(),
        )?;

        let mut cmd = Command::cargo_bin("beseech")?;
        let assert = cmd
            .arg("ask")
            .arg("--schema")
            .arg(&schema_path)
            .write_stdin("example.org\namy\n")
            .assert()
            .success();

        // Prompts and the result share stdout; the JSON object starts at the
        // first brace.
        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        let json_start = stdout.find('{').expect("result JSON in stdout");
        let result: Value = serde_json::from_str(&stdout[json_start..])?;
        assert_eq!(result["url"], "example.org");
        assert_eq!(result["auth"]["username"], "amy");
        Ok(())
    }

    #[test]
    fn ask_honors_overrides_without_reading_input() -> CliResult<()> {
        let dir = assert_fs::TempDir::new()?;
        let schema_path = dir.path().join("schema.json");
        fs::write(
            &schema_path,
            json!({ "token": { "required": true } }).to_string(),
        )?;

        let mut cmd = Command::cargo_bin("beseech")?;
        let assert = cmd
            .arg("ask")
            .arg("--schema")
            .arg(&schema_path)
            .arg("--set")
            .arg("token=sealed")
            .write_stdin("")
            .assert()
            .success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        assert!(stdout.contains("\"token\":\"sealed\""));
        Ok(())
    }

    #[test]
    fn confirm_exits_nonzero_on_a_negative_answer() -> CliResult<()> {
        let mut cmd = Command::cargo_bin("beseech")?;
        cmd.arg("confirm")
            .arg("proceed?")
            .write_stdin("n\n")
            .assert()
            .failure();
        Ok(())
    }
}
