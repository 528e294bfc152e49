use crate::config::{Config, ConfigError, CustomEntry, Meta, VariantConfig};
use crate::rules::{END_TOKEN, Rule, RuleTable, START_TOKEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    pub class_name: String,
    pub declarations: Vec<(String, String)>,
    pub break_points: Vec<String>,
}

// Walks the rule table in declaration order so output is independent of how
// the caller ordered their configuration. Within one rule, static variants
// come first (in the rule's own variant order), then custom entries in the
// order the configuration listed them.
pub fn resolve(table: &RuleTable, config: &Config) -> Result<Vec<ClassSpec>, ConfigError> {
    let meta = config.validated_meta()?;
    let mut specs = Vec::new();

    for rule in table.rules() {
        let Some(settings) = config.properties.get(&rule.name) else {
            continue;
        };

        for (suffix, value) in &rule.variants {
            match settings.variants.get(suffix) {
                Some(VariantConfig::Toggle(true)) => {
                    specs.push(static_spec(rule, meta, suffix, value, Vec::new()));
                }
                Some(VariantConfig::Detailed(detail)) => {
                    specs.push(static_spec(rule, meta, suffix, value, detail.break_points.clone()));
                }
                Some(VariantConfig::Toggle(false)) | None => {}
            }
        }

        if !rule.allow_custom {
            continue;
        }
        for entry in &settings.custom {
            // Static variants win a suffix collision.
            if rule.variant_value(&entry.suffix).is_some() {
                continue;
            }
            specs.push(custom_spec(rule, meta, entry));
        }
    }

    Ok(specs)
}

fn static_spec(
    rule: &Rule,
    meta: &Meta,
    suffix: &str,
    value: &str,
    break_points: Vec<String>,
) -> ClassSpec {
    let value = substitute_direction(value, meta);
    let declarations = rule
        .properties
        .iter()
        .map(|property| (substitute_direction(property, meta), value.clone()))
        .collect();
    ClassSpec {
        class_name: format!("{}-{}", rule.alias, suffix),
        declarations,
        break_points,
    }
}

fn custom_spec(rule: &Rule, meta: &Meta, entry: &CustomEntry) -> ClassSpec {
    let declarations = rule
        .properties
        .iter()
        .enumerate()
        .map(|(idx, property)| {
            // One value per property; a short values list repeats its last entry.
            let value = entry
                .values
                .get(idx)
                .or_else(|| entry.values.last())
                .map(|value| value.as_str())
                .unwrap_or("");
            (
                substitute_direction(property, meta),
                substitute_direction(value, meta),
            )
        })
        .collect();
    ClassSpec {
        class_name: format!("{}-{}", rule.alias, entry.suffix),
        declarations,
        break_points: entry.break_points.clone(),
    }
}

fn substitute_direction(text: &str, meta: &Meta) -> String {
    if !text.contains(START_TOKEN) && !text.contains(END_TOKEN) {
        return text.to_string();
    }
    text.replace(START_TOKEN, &meta.start)
        .replace(END_TOKEN, &meta.end)
}
