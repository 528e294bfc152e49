use crate::config::{Config, ConfigError, Meta};
use crate::resolver::{ClassSpec, resolve};
use crate::rules::{Rule, RuleTable, default_table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
    pub break_point: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    pub rules: Vec<Rule>,
}

pub fn create_css(config: &Config) -> Result<String, ConfigError> {
    create_css_with_options(config, &Options::default())
}

pub fn create_css_with_options(config: &Config, options: &Options) -> Result<String, ConfigError> {
    let table = merged_table(options);
    let meta = config.validated_meta()?;
    let specs = resolve(&table, config)?;

    let mut blocks = Vec::new();
    for spec in &specs {
        blocks.extend(render(spec, meta));
    }
    Ok(group(&blocks, meta))
}

fn merged_table(options: &Options) -> RuleTable {
    if options.rules.is_empty() {
        default_table().clone()
    } else {
        default_table().merged(&options.rules)
    }
}

// One base block, plus one clone per breakpoint with `--{bp}` appended to
// the class name. The namespace prefixes every selector.
pub fn render(spec: &ClassSpec, meta: &Meta) -> Vec<RuleBlock> {
    let mut blocks = Vec::with_capacity(1 + spec.break_points.len());
    blocks.push(RuleBlock {
        selector: selector_for(&spec.class_name, meta),
        declarations: spec.declarations.clone(),
        break_point: None,
    });
    for break_point in &spec.break_points {
        let class = format!("{}--{}", spec.class_name, break_point);
        blocks.push(RuleBlock {
            selector: selector_for(&class, meta),
            declarations: spec.declarations.clone(),
            break_point: Some(break_point.clone()),
        });
    }
    blocks
}

fn selector_for(class_name: &str, meta: &Meta) -> String {
    format!("{} .{}", meta.namespace, escape_class(class_name))
}

// Backslash-escape anything a class selector cannot carry verbatim.
pub fn escape_class(class_name: &str) -> String {
    let mut escaped = String::with_capacity(class_name.len());
    for ch in class_name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            escaped.push(ch);
        } else {
            escaped.push('\\');
            escaped.push(ch);
        }
    }
    escaped
}

// Base rules first, then one @media group per breakpoint in the order the
// configuration declared them. A breakpoint nothing targets is omitted, and
// a breakpoint the configuration does not define renders nothing.
pub fn group(blocks: &[RuleBlock], meta: &Meta) -> String {
    let mut lines = Vec::new();

    for block in blocks.iter().filter(|block| block.break_point.is_none()) {
        push_block_lines(&mut lines, block, "");
    }

    for (name, width) in &meta.break_points {
        let tagged: Vec<&RuleBlock> = blocks
            .iter()
            .filter(|block| block.break_point.as_deref() == Some(name.as_str()))
            .collect();
        if tagged.is_empty() {
            continue;
        }
        lines.push(format!("@media(min-width:{}) {{", width));
        for block in tagged {
            push_block_lines(&mut lines, block, "  ");
        }
        lines.push("}".to_string());
    }

    if lines.is_empty() {
        return String::new();
    }
    let mut css = lines.join("\n");
    css.push('\n');
    css
}

fn push_block_lines(lines: &mut Vec<String>, block: &RuleBlock, indent: &str) {
    lines.push(format!("{}{} {{", indent, block.selector));
    for (property, value) in &block.declarations {
        lines.push(format!("{}  {}: {};", indent, property, value));
    }
    lines.push(format!("{}}}", indent));
}

#[cfg(test)]
mod tests {
    use super::{Options, create_css, create_css_with_options, escape_class};
    use crate::config::{
        Config, CustomEntry, Meta, PropertyConfig, VariantConfig, VariantDetail, test_meta,
    };
    use crate::rules::Rule;
    use indexmap::IndexMap;

    fn default_config() -> Config {
        Config {
            config: Some(test_meta()),
            properties: IndexMap::new(),
        }
    }

    #[test]
    fn fails_if_no_configuration_is_provided() {
        let config = Config::default();
        assert!(create_css(&config).is_err());
    }

    #[test]
    fn fails_if_config_has_not_enough_info() {
        let config = Config {
            config: Some(Meta::default()),
            ..Config::default()
        };
        let err = create_css(&config).unwrap_err();
        assert_eq!(err.message, "missing required config info");
    }

    #[test]
    fn merges_extra_rules_passed_as_an_option() {
        let mut config = default_config();
        let mut variants = IndexMap::new();
        variants.insert("s".to_string(), VariantConfig::Toggle(true));
        config.properties.insert(
            "appearance".to_string(),
            PropertyConfig {
                custom: Vec::new(),
                variants,
            },
        );
        let options = Options {
            rules: vec![Rule::new(
                "appearance",
                "Ap",
                &["appearance"],
                &[("s", "searchfield")],
                false,
                false,
            )],
        };
        let result = create_css_with_options(&config, &options).unwrap();
        let expected = ["#atomic .Ap-s {", "  appearance: searchfield;", "}", ""].join("\n");
        assert_eq!(result, expected);
    }

    #[test]
    fn escapes_illegal_characters() {
        let mut config = default_config();
        config.properties.insert(
            "height".to_string(),
            PropertyConfig {
                custom: vec![CustomEntry {
                    suffix: "55%".to_string(),
                    values: vec!["55%".to_string()],
                    break_points: Vec::new(),
                }],
                variants: IndexMap::new(),
            },
        );
        let result = create_css(&config).unwrap();
        let expected = ["#atomic .H-55\\% {", "  height: 55%;", "}", ""].join("\n");
        assert_eq!(result, expected);
    }

    #[test]
    fn escape_leaves_legal_characters_alone() {
        assert_eq!(escape_class("D-ib"), "D-ib");
        assert_eq!(escape_class("M-100%"), "M-100\\%");
        assert_eq!(escape_class("Lh-1.2"), "Lh-1\\.2");
        assert_eq!(escape_class("W-1/2"), "W-1\\/2");
    }

    #[test]
    fn wraps_breakpoint_rules_in_media_queries() {
        let mut config = default_config();
        let mut variants = IndexMap::new();
        variants.insert(
            "b".to_string(),
            VariantConfig::Detailed(VariantDetail {
                break_points: vec!["sm".to_string(), "md".to_string()],
            }),
        );
        config.properties.insert(
            "display".to_string(),
            PropertyConfig {
                custom: Vec::new(),
                variants,
            },
        );
        config.properties.insert(
            "padding-end".to_string(),
            PropertyConfig {
                custom: vec![CustomEntry {
                    suffix: "foo".to_string(),
                    values: vec!["10px".to_string()],
                    break_points: vec!["sm".to_string(), "md".to_string(), "lg".to_string()],
                }],
                variants: IndexMap::new(),
            },
        );

        let result = create_css(&config).unwrap();
        let expected = [
            "#atomic .D-b {",
            "  display: block;",
            "}",
            "#atomic .Pend-foo {",
            "  padding-right: 10px;",
            "}",
            "@media(min-width:767px) {",
            "  #atomic .D-b--sm {",
            "    display: block;",
            "  }",
            "  #atomic .Pend-foo--sm {",
            "    padding-right: 10px;",
            "  }",
            "}",
            "@media(min-width:992px) {",
            "  #atomic .D-b--md {",
            "    display: block;",
            "  }",
            "  #atomic .Pend-foo--md {",
            "    padding-right: 10px;",
            "  }",
            "}",
            "@media(min-width:1200px) {",
            "  #atomic .Pend-foo--lg {",
            "    padding-right: 10px;",
            "  }",
            "}",
            "",
        ]
        .join("\n");
        assert_eq!(result, expected);
    }

    #[test]
    fn keeps_rule_table_order_regardless_of_config_order() {
        let mut config = default_config();
        config.properties.insert(
            "padding-end".to_string(),
            PropertyConfig {
                custom: vec![CustomEntry {
                    suffix: "foo".to_string(),
                    values: vec!["10px".to_string()],
                    break_points: Vec::new(),
                }],
                variants: IndexMap::new(),
            },
        );
        let mut variants = IndexMap::new();
        variants.insert("b".to_string(), VariantConfig::Toggle(true));
        config.properties.insert(
            "display".to_string(),
            PropertyConfig {
                custom: Vec::new(),
                variants,
            },
        );

        let result = create_css(&config).unwrap();
        let expected = [
            "#atomic .D-b {",
            "  display: block;",
            "}",
            "#atomic .Pend-foo {",
            "  padding-right: 10px;",
            "}",
            "",
        ]
        .join("\n");
        assert_eq!(result, expected);
    }

    #[test]
    fn skips_rules_explicitly_set_to_false() {
        let mut config = default_config();
        let mut variants = IndexMap::new();
        variants.insert("b".to_string(), VariantConfig::Toggle(false));
        variants.insert("ib".to_string(), VariantConfig::Toggle(true));
        config.properties.insert(
            "display".to_string(),
            PropertyConfig {
                custom: Vec::new(),
                variants,
            },
        );

        let result = create_css(&config).unwrap();
        let expected = ["#atomic .D-ib {", "  display: inline-block;", "}", ""].join("\n");
        assert_eq!(result, expected);
    }

    #[test]
    fn omits_breakpoints_the_config_does_not_define() {
        let mut config = default_config();
        config.properties.insert(
            "padding-end".to_string(),
            PropertyConfig {
                custom: vec![CustomEntry {
                    suffix: "foo".to_string(),
                    values: vec!["10px".to_string()],
                    break_points: vec!["xl".to_string()],
                }],
                variants: IndexMap::new(),
            },
        );
        let result = create_css(&config).unwrap();
        let expected = ["#atomic .Pend-foo {", "  padding-right: 10px;", "}", ""].join("\n");
        assert_eq!(result, expected);
    }

    #[test]
    fn empty_configuration_renders_nothing() {
        let result = create_css(&default_config()).unwrap();
        assert_eq!(result, "");
    }
}
