use crate::config::{
    Config, ConfigError, CustomEntry, PropertyConfig, VariantConfig, VariantDetail,
};
use crate::rules::{Rule, RuleTable};

// Rebuilds the minimal configuration that would generate the given class
// names. Reverse-building is best-effort over a bag of candidate strings:
// with `strict` off, anything the rule table cannot resolve is skipped;
// with it on, the first unresolvable token fails the whole call.
pub fn get_config(
    class_names: &[String],
    base: &Config,
    strict: bool,
    table: &RuleTable,
) -> Result<Config, ConfigError> {
    let mut config = Config {
        config: base.config.clone(),
        properties: Default::default(),
    };

    for class_name in class_names {
        if !apply_class(class_name, table, &mut config) && strict {
            return Err(ConfigError {
                message: format!("unable to resolve class name '{}'", class_name),
            });
        }
    }

    Ok(config)
}

fn apply_class(class_name: &str, table: &RuleTable, config: &mut Config) -> bool {
    let Some((alias, rest)) = class_name.split_once('-') else {
        return false;
    };
    let Some(rule) = table.lookup_alias(alias) else {
        return false;
    };
    let (suffix, break_point) = match rest.split_once("--") {
        Some((suffix, break_point)) => (suffix, Some(break_point)),
        None => (rest, None),
    };
    if suffix.is_empty() {
        return false;
    }

    if rule.variant_value(suffix).is_some() {
        apply_variant(rule, suffix, break_point, config);
        return true;
    }
    if rule.allow_custom {
        apply_custom(rule, suffix, break_point, config);
        return true;
    }
    false
}

fn apply_variant(rule: &Rule, suffix: &str, break_point: Option<&str>, config: &mut Config) {
    let settings = config
        .properties
        .entry(rule.name.clone())
        .or_insert_with(PropertyConfig::default);

    match break_point {
        None => {
            // Keep an existing breakpoint list; a plain toggle adds nothing
            // it does not already imply.
            settings
                .variants
                .entry(suffix.to_string())
                .or_insert(VariantConfig::Toggle(true));
        }
        Some(break_point) => {
            let detail = match settings.variants.get(suffix) {
                Some(VariantConfig::Detailed(detail)) => {
                    let mut detail = detail.clone();
                    if !detail.break_points.iter().any(|bp| bp == break_point) {
                        detail.break_points.push(break_point.to_string());
                    }
                    detail
                }
                _ => VariantDetail {
                    break_points: vec![break_point.to_string()],
                },
            };
            settings
                .variants
                .insert(suffix.to_string(), VariantConfig::Detailed(detail));
        }
    }
}

fn apply_custom(rule: &Rule, suffix: &str, break_point: Option<&str>, config: &mut Config) {
    let settings = config
        .properties
        .entry(rule.name.clone())
        .or_insert_with(PropertyConfig::default);

    if let Some(entry) = settings
        .custom
        .iter_mut()
        .find(|entry| entry.suffix == suffix)
    {
        // Re-encountering a suffix never duplicates the entry.
        if let Some(break_point) = break_point {
            if !entry.break_points.iter().any(|bp| bp == break_point) {
                entry.break_points.push(break_point.to_string());
            }
        }
        return;
    }

    settings.custom.push(CustomEntry {
        suffix: suffix.to_string(),
        values: vec![decode_value(rule, suffix)],
        break_points: break_point.map(|bp| vec![bp.to_string()]).unwrap_or_default(),
    });
}

// A custom suffix is the literal CSS value, except that color-valued rules
// written as bare hex shorthand get their `#` back (C-07f -> #07f).
fn decode_value(rule: &Rule, suffix: &str) -> String {
    if rule.color_value
        && matches!(suffix.len(), 3 | 6)
        && suffix.chars().all(|ch| ch.is_ascii_hexdigit())
    {
        return format!("#{}", suffix);
    }
    suffix.to_string()
}
