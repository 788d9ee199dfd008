//! Application service: build the configuration a device receives on join.

use anyhow::{Context, Result};
use fleetjoin_common::{Fleet, ManifestOption, OptionKind};
use serde_json::{Map, Number, Value};

use crate::application::ports::{FleetBackend, Interaction};
use crate::domain::provisioning::{ProvisioningConfig, VERSION_KEY};

/// Network setup happens out of band and is never asked for here.
const NETWORK_OPTION: &str = "network";

/// Fetch the manifest for the fleet's device type, ask the user for every
/// option except `network`, and merge the answers and `os_version` over the
/// backend-generated base configuration.
///
/// # Errors
///
/// Returns a backend error or a prompt error.
pub async fn build(
    backend: &impl FleetBackend,
    ui: &impl Interaction,
    fleet: &Fleet,
    os_version: &str,
) -> Result<ProvisioningConfig> {
    let manifest = backend.device_type_manifest(&fleet.device_type).await?;
    let options: Vec<&ManifestOption> = manifest
        .options
        .iter()
        .filter(|o| o.name != NETWORK_OPTION)
        .collect();

    let answers = collect_answers(ui, &options)?;

    let mut values = answers.clone();
    values.insert(VERSION_KEY.to_owned(), Value::String(os_version.to_owned()));
    let base = backend
        .generate_config(fleet, &values)
        .await
        .with_context(|| format!("generating config for fleet '{}'", fleet.slug))?;

    Ok(ProvisioningConfig::assemble(base, answers, os_version))
}

/// Ask one question per option, in manifest order.
///
/// # Errors
///
/// Returns the prompt error if the user cancels.
pub fn collect_answers(
    ui: &impl Interaction,
    options: &[&ManifestOption],
) -> Result<Map<String, Value>> {
    let mut answers = Map::new();
    for option in options {
        let value = ask_option(ui, option)?;
        answers.insert(option.name.clone(), value);
    }
    Ok(answers)
}

fn ask_option(ui: &impl Interaction, option: &ManifestOption) -> Result<Value> {
    let prompt = option.prompt();
    match option.kind {
        OptionKind::List if !option.choices.is_empty() => {
            let labels: Vec<String> = option.choices.iter().map(|c| c.label()).collect();
            let index = ui.select_one(prompt, &labels)?;
            let choice = option
                .choices
                .get(index)
                .with_context(|| format!("choice {index} out of range for '{}'", option.name))?;
            Ok(choice.value().clone())
        }
        OptionKind::Boolean | OptionKind::Checkbox => {
            let default = option.default.as_ref().and_then(Value::as_bool).unwrap_or(false);
            Ok(Value::Bool(ui.confirm(prompt, default)?))
        }
        OptionKind::Number => {
            let default = option.default.as_ref().map(default_text);
            let answer = ui.ask_text(prompt, default.as_deref(), &|s: &str| {
                parse_number(s).map(|_| ()).ok_or_else(|| "please enter a number".to_string())
            })?;
            parse_number(&answer)
                .map(Value::Number)
                .with_context(|| format!("'{answer}' is not a number"))
        }
        OptionKind::List | OptionKind::Text => {
            let default = option.default.as_ref().map(default_text);
            let answer = ui.ask_text(prompt, default.as_deref(), &|_: &str| Ok(()))?;
            Ok(Value::String(answer))
        }
    }
}

fn default_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
