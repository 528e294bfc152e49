use std::sync::OnceLock;

pub const START_TOKEN: &str = "$START";
pub const END_TOKEN: &str = "$END";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub alias: String,
    pub properties: Vec<String>,
    pub variants: Vec<(String, String)>,
    pub allow_custom: bool,
    pub color_value: bool,
}

impl Rule {
    pub fn new(
        name: &str,
        alias: &str,
        properties: &[&str],
        variants: &[(&str, &str)],
        allow_custom: bool,
        color_value: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            alias: alias.to_string(),
            properties: properties.iter().map(|p| p.to_string()).collect(),
            variants: variants
                .iter()
                .map(|(suffix, value)| (suffix.to_string(), value.to_string()))
                .collect(),
            allow_custom,
            color_value,
        }
    }

    pub fn variant_value(&self, suffix: &str) -> Option<&str> {
        self.variants
            .iter()
            .find(|(name, _)| name == suffix)
            .map(|(_, value)| value.as_str())
    }

    pub fn directional(&self) -> bool {
        let has_token = |text: &str| text.contains(START_TOKEN) || text.contains(END_TOKEN);
        self.properties.iter().any(|property| has_token(property))
            || self.variants.iter().any(|(_, value)| has_token(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn lookup(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn lookup_alias(&self, alias: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.alias == alias)
    }

    // Extra rules override same-named defaults; new names append after the
    // default table so base ordering stays stable.
    pub fn merged(&self, extra: &[Rule]) -> RuleTable {
        let mut rules = self.rules.clone();
        for rule in extra {
            match rules.iter_mut().find(|existing| existing.name == rule.name) {
                Some(existing) => *existing = rule.clone(),
                None => rules.push(rule.clone()),
            }
        }
        RuleTable::new(rules)
    }
}

pub fn default_table() -> &'static RuleTable {
    static TABLE: OnceLock<RuleTable> = OnceLock::new();
    TABLE.get_or_init(|| RuleTable::new(default_rules()))
}

fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "background-clip",
            "Bgcp",
            &["background-clip"],
            &[("bb", "border-box"), ("cb", "content-box"), ("pb", "padding-box")],
            false,
            false,
        ),
        Rule::new("background-color", "Bgc", &["background-color"], &[], true, true),
        Rule::new(
            "background-origin",
            "Bgo",
            &["background-origin"],
            &[("bb", "border-box"), ("cb", "content-box"), ("pb", "padding-box")],
            false,
            false,
        ),
        Rule::new("border", "Bd", &["border"], &[], true, false),
        Rule::new("color", "C", &["color"], &[], true, true),
        Rule::new(
            "cursor",
            "Cur",
            &["cursor"],
            &[("a", "auto"), ("d", "default"), ("p", "pointer")],
            false,
            false,
        ),
        Rule::new(
            "display",
            "D",
            &["display"],
            &[
                ("n", "none"),
                ("b", "block"),
                ("ib", "inline-block"),
                ("i", "inline"),
                ("tb", "table"),
                ("tbr", "table-row"),
                ("tbc", "table-cell"),
            ],
            false,
            false,
        ),
        Rule::new(
            "float",
            "Fl",
            &["float"],
            &[("n", "none"), ("start", "$START"), ("end", "$END")],
            false,
            false,
        ),
        Rule::new("font-size", "Fz", &["font-size"], &[], true, false),
        Rule::new(
            "font-weight",
            "Fw",
            &["font-weight"],
            &[("n", "normal"), ("b", "bold"), ("br", "bolder"), ("lr", "lighter")],
            true,
            false,
        ),
        Rule::new("height", "H", &["height"], &[("a", "auto")], true, false),
        Rule::new("line-height", "Lh", &["line-height"], &[("n", "normal")], true, false),
        Rule::new("margin", "M", &["margin"], &[("a", "auto")], true, false),
        Rule::new("margin-top", "Mt", &["margin-top"], &[], true, false),
        Rule::new("margin-bottom", "Mb", &["margin-bottom"], &[], true, false),
        Rule::new("margin-start", "Mstart", &["margin-$START"], &[], true, false),
        Rule::new("margin-end", "Mend", &["margin-$END"], &[], true, false),
        Rule::new("opacity", "Op", &["opacity"], &[], true, false),
        Rule::new(
            "overflow-scrolling",
            "Ovs",
            &["-webkit-overflow-scrolling"],
            &[("a", "auto"), ("t", "touch")],
            false,
            false,
        ),
        Rule::new("padding", "P", &["padding"], &[], true, false),
        Rule::new("padding-top", "Pt", &["padding-top"], &[], true, false),
        Rule::new("padding-bottom", "Pb", &["padding-bottom"], &[], true, false),
        Rule::new("padding-start", "Pstart", &["padding-$START"], &[], true, false),
        Rule::new("padding-end", "Pend", &["padding-$END"], &[], true, false),
        Rule::new(
            "text-align",
            "Ta",
            &["text-align"],
            &[("c", "center"), ("j", "justify"), ("start", "$START"), ("end", "$END")],
            false,
            false,
        ),
        Rule::new(
            "user-select",
            "Us",
            &[
                "-webkit-user-select",
                "-moz-user-select",
                "-ms-user-select",
                "user-select",
            ],
            &[("n", "none"), ("a", "auto"), ("t", "text")],
            false,
            false,
        ),
        Rule::new(
            "visibility",
            "V",
            &["visibility"],
            &[("v", "visible"), ("h", "hidden"), ("c", "collapse")],
            false,
            false,
        ),
        Rule::new(
            "white-space",
            "Whs",
            &["white-space"],
            &[
                ("n", "normal"),
                ("p", "pre"),
                ("nw", "nowrap"),
                ("pw", "pre-wrap"),
                ("pl", "pre-line"),
            ],
            false,
            false,
        ),
        Rule::new("width", "W", &["width"], &[("a", "auto")], true, false),
        Rule::new("z-index", "Z", &["z-index"], &[("a", "auto")], true, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::{Rule, default_table};

    #[test]
    fn looks_up_by_name_and_alias() {
        let table = default_table();
        assert_eq!(table.lookup("display").map(|r| r.alias.as_str()), Some("D"));
        assert_eq!(
            table.lookup_alias("Pend").map(|r| r.name.as_str()),
            Some("padding-end")
        );
        assert!(table.lookup_alias("Fake").is_none());
    }

    #[test]
    fn aliases_are_unique() {
        let table = default_table();
        for rule in table.rules() {
            let count = table
                .rules()
                .iter()
                .filter(|other| other.alias == rule.alias)
                .count();
            assert_eq!(count, 1, "duplicate alias {}", rule.alias);
        }
    }

    #[test]
    fn directional_flag_follows_placeholder_tokens() {
        let table = default_table();
        assert!(table.lookup("padding-end").unwrap().directional());
        assert!(table.lookup("float").unwrap().directional());
        assert!(!table.lookup("display").unwrap().directional());
    }

    #[test]
    fn merged_overrides_and_appends() {
        let table = default_table();
        let extra = vec![
            Rule::new("display", "D", &["display"], &[("g", "grid")], false, false),
            Rule::new("order", "Or", &["order"], &[], true, false),
        ];
        let merged = table.merged(&extra);
        assert_eq!(
            merged.lookup("display").unwrap().variant_value("g"),
            Some("grid")
        );
        assert_eq!(merged.rules().len(), table.rules().len() + 1);
        assert_eq!(merged.rules().last().unwrap().name, "order");
    }
}
