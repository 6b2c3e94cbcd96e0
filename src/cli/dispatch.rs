// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use std::path::Path;

use console::style;
use serde_json::Value;

use crate::config::{RkConfig, DEFAULT_NAMESPACE};
use crate::engine::{Bundle, ValidationEngine};
use crate::error::{ConfigError, RepositoryError, Result, ResultExt, RkError};
use crate::repository::RuleRepository;
use crate::rules::{parse_rule_set, ValidationResult};

use super::args::{CheckArgs, Cli, Commands, InitArgs, OutputFormat, RulesAction, ValidateArgs};

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        RkConfig::load_from(config_path)?
    } else {
        RkConfig::load()?
    };

    if !config.output.color {
        console::set_colors_enabled(false);
    }

    // Dispatch to the appropriate command handler
    match &cli.command {
        Commands::Validate(args) => run_validate(&cli, &config, args),
        Commands::Check(args) => run_check(&cli, &config, args),
        Commands::Rules(args) => run_rules(&cli, &config, &args.action),
        Commands::Init(args) => run_init(args),
        Commands::Version => run_version(),
    }
}

/// Run the validate command.
fn run_validate(cli: &Cli, config: &RkConfig, args: &ValidateArgs) -> Result<()> {
    tracing::debug!("Running validate command with args: {:?}", args);

    let engine = ValidationEngine::from_config(config, bundle())?;

    let mut results = Vec::with_capacity(args.records.len());
    for path in &args.records {
        let record = read_record(path)?;
        let result = match (&args.rules, &args.kind) {
            (Some(identifier), _) => engine.validate_json(Some(&record), identifier)?,
            (None, Some(kind)) => engine.validate_json_as(Some(&record), kind)?,
            (None, None) => {
                return Err(RkError::WithContext {
                    context: "validate".to_string(),
                    message: "either --rules or --kind is required".to_string(),
                })
            }
        };
        results.push((path.display().to_string(), result));
    }

    print_results(&results, cli.format);

    let count = results.iter().filter(|(_, r)| !r.is_valid()).count();
    if count > 0 {
        Err(RkError::Invalid { count })
    } else {
        Ok(())
    }
}

/// Rule documents shipped with rk, under the default bundled namespace.
fn bundle() -> Bundle {
    use crate::config::default::example_rules;

    Bundle::new().with_document(
        format!("{}user-validation.yml", DEFAULT_NAMESPACE),
        example_rules().as_bytes(),
    )
}

/// Read a record file. `.json` files are parsed as JSON, everything else as YAML.
fn read_record(path: &Path) -> Result<Value> {
    let record_error = |message: String| RkError::Record {
        path: path.to_path_buf(),
        message,
    };

    let content = std::fs::read_to_string(path).map_err(|e| record_error(e.to_string()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&content).map_err(|e| record_error(e.to_string()))
    } else {
        serde_yaml::from_str(&content).map_err(|e| record_error(e.to_string()))
    }
}

fn print_results(results: &[(String, ValidationResult)], format: Option<OutputFormat>) {
    match format {
        Some(OutputFormat::Json) => {
            let json: Vec<Value> = results
                .iter()
                .map(|(label, result)| result.to_json_value(label))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
        _ => {
            for (label, result) in results {
                result.print(label, format);
            }
        }
    }
}

/// Run the check command.
fn run_check(cli: &Cli, config: &RkConfig, args: &CheckArgs) -> Result<()> {
    tracing::debug!("Running check command with args: {:?}", args);

    let engine = ValidationEngine::from_config(config, bundle())?;
    let rule_set = engine.load_rule_set(&args.id)?;

    match cli.format {
        Some(OutputFormat::Json) => {
            let json = serde_json::json!({
                "identifier": rule_set.identifier(),
                "rules": rule_set.iter().map(|rule| serde_json::json!({
                    "field": rule.field.as_str(),
                    "type": rule.kind.as_str(),
                    "message": rule.message,
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
        _ => {
            println!(
                "{} {} ({} rules)",
                style("✓").green().bold(),
                style(rule_set.identifier()).cyan(),
                rule_set.len()
            );
            for rule in rule_set.iter() {
                println!("  {} {}", style("-").dim(), rule.describe());
            }
        }
    }

    Ok(())
}

/// Run the rules command.
fn run_rules(cli: &Cli, config: &RkConfig, action: &RulesAction) -> Result<()> {
    tracing::debug!("Running rules command: {:?}", action);

    let repository = RuleRepository::from_config(config, bundle())?;

    // A bundled location is backed by a directory that vanishes on exit.
    let action_name = match action {
        RulesAction::Save { .. } => Some("save"),
        RulesAction::Delete { .. } => Some("delete"),
        _ => None,
    };
    if let Some(action_name) = action_name.filter(|_| repository.is_temporary()) {
        return Err(RepositoryError::Temporary {
            location: config.rules.location()?.to_string(),
            action: action_name.to_string(),
        }
        .into());
    }

    match action {
        RulesAction::List => {
            let names = repository.list()?;
            match cli.format {
                Some(OutputFormat::Json) => {
                    println!("{}", serde_json::to_string_pretty(&names).unwrap_or_default());
                }
                _ if names.is_empty() => {
                    println!("No rule documents in {}", repository.dir().display());
                }
                _ => {
                    for name in names {
                        println!("{}", name);
                    }
                }
            }
        }
        RulesAction::Show { name } => {
            print!("{}", repository.read(name)?);
        }
        RulesAction::Save { name, file } => {
            let content = std::fs::read_to_string(file)
                .context(format!("Failed to read {}", file.display()))?;
            let rule_set = parse_rule_set(name, content.as_bytes())?;
            repository.save(name, &content)?;
            println!(
                "{} Saved {} ({} rules)",
                style("✓").green(),
                name,
                rule_set.len()
            );
        }
        RulesAction::Delete { name, yes } => {
            if !yes {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete rule document {}?", name))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Aborted");
                    return Ok(());
                }
            }

            if repository.delete(name)? {
                println!("{} Deleted {}", style("✓").green(), name);
            } else {
                println!("{} {} does not exist", style("!").yellow(), name);
            }
        }
    }

    Ok(())
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("rk {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(branch) = crate::version::GIT_BRANCH {
        println!("git branch: {}", branch);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}

/// Run the init command.
fn run_init(args: &InitArgs) -> Result<()> {
    use crate::config::default::{example_config, example_rules};

    tracing::debug!("Running init command with args: {:?}", args);

    let config_path = Path::new("rk.toml");

    if config_path.exists() && !args.force {
        return Err(ConfigError::AlreadyExists {
            path: config_path.to_path_buf(),
        }
        .into());
    }

    std::fs::write(config_path, example_config()).context("Failed to write configuration")?;
    println!("✓ Created rk.toml");

    let rules_dir = Path::new("validation");
    let rules_path = rules_dir.join("user-validation.yml");
    if !rules_path.exists() {
        std::fs::create_dir_all(rules_dir).context("Failed to create rules directory")?;
        std::fs::write(&rules_path, example_rules()).context("Failed to write example rules")?;
        println!("✓ Created {}", rules_path.display());
    }

    Ok(())
}
