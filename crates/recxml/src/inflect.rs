//! Naming transforms used to derive element names.
//!
//! Type names arrive as `CamelCase` (optionally module-qualified with `::`),
//! column names as `snake_case`. XML element names are lowercase and hyphenated,
//! with collections using the plural form of the item name.

use heck::{ToKebabCase, ToSnakeCase};
use once_cell::sync::Lazy;
use regex::Regex;

/// Words that have no distinct plural form.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
];

/// Irregular (singular, plural) pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
];

/// Ordered rule table: the first matching pattern wins.
type Rules = Vec<(Regex, &'static str)>;

fn compile(rules: &[(&str, &'static str)]) -> Rules {
    rules
        .iter()
        .map(|(pattern, replacement)| {
            let regex = Regex::new(&format!("(?i){}", pattern))
                .unwrap_or_else(|e| panic!("invalid inflection rule {}: {}", pattern, e));
            (regex, *replacement)
        })
        .collect()
}

static PLURALS: Lazy<Rules> = Lazy::new(|| {
    compile(&[
        ("(quiz)$", "${1}zes"),
        ("^(m|l)ouse$", "${1}ice"),
        ("(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        ("(x|ch|ss|sh)$", "${1}es"),
        ("([^aeiouy]|qu)y$", "${1}ies"),
        ("(hive)$", "${1}s"),
        ("(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        ("sis$", "ses"),
        ("([ti])um$", "${1}a"),
        ("(buffal|tomat)o$", "${1}oes"),
        ("(bu)s$", "${1}ses"),
        ("(alias|status)$", "${1}es"),
        ("(octop|vir)us$", "${1}i"),
        ("^(ax|test)is$", "${1}es"),
        ("s$", "s"),
        ("$", "s"),
    ])
});

static SINGULARS: Lazy<Rules> = Lazy::new(|| {
    compile(&[
        ("(database)s$", "${1}"),
        ("(quiz)zes$", "${1}"),
        ("(matr)ices$", "${1}ix"),
        ("(vert|ind)ices$", "${1}ex"),
        ("^(ox)en", "${1}"),
        ("(alias|status)(es)?$", "${1}"),
        ("(octop|vir)(us|i)$", "${1}us"),
        ("^(a)x[ie]s$", "${1}xis"),
        ("(cris|test)(is|es)$", "${1}is"),
        ("(shoe)s$", "${1}"),
        ("(o)es$", "${1}"),
        ("(bus)(es)?$", "${1}"),
        ("^(m|l)ice$", "${1}ouse"),
        ("(x|ch|ss|sh)es$", "${1}"),
        ("(m)ovies$", "${1}ovie"),
        ("([^aeiouy]|qu)ies$", "${1}y"),
        ("([lr])ves$", "${1}f"),
        ("(tive)s$", "${1}"),
        ("(hive)s$", "${1}"),
        ("([^f])ves$", "${1}fe"),
        ("((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$", "${1}sis"),
        ("([ti])a$", "${1}um"),
        ("(ss)$", "${1}"),
        ("s$", ""),
    ])
});

/// Splits `word` into its prefix and its last word, separated by `_` or `-`.
fn split_last_word(word: &str) -> (&str, &str) {
    match word.rfind(['_', '-']) {
        Some(pos) => word.split_at(pos + 1),
        None => ("", word),
    }
}

fn apply(word: &str, rules: &Rules, irregular: impl Fn(&str) -> Option<&'static str>) -> String {
    if word.is_empty() {
        return String::new();
    }

    let (prefix, last) = split_last_word(word);
    let lower = last.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some(replacement) = irregular(&lower) {
        return format!("{}{}", prefix, replacement);
    }

    for (regex, replacement) in rules.iter() {
        if regex.is_match(last) {
            return format!("{}{}", prefix, regex.replace(last, *replacement));
        }
    }
    word.to_string()
}

/// Returns the plural form of `word` (`comment` -> `comments`, `category` -> `categories`).
pub fn pluralize(word: &str) -> String {
    apply(word, &PLURALS, |w| {
        IRREGULAR
            .iter()
            .find(|(singular, plural)| *singular == w || *plural == w)
            .map(|(_, plural)| *plural)
    })
}

/// Returns the singular form of `word` (`comments` -> `comment`, `people` -> `person`).
pub fn singularize(word: &str) -> String {
    apply(word, &SINGULARS, |w| {
        IRREGULAR
            .iter()
            .find(|(singular, plural)| *plural == w || *singular == w)
            .map(|(singular, _)| *singular)
    })
}

/// Converts `CamelCase` to `snake_case`; `::` module separators become `/`.
pub fn underscore(word: &str) -> String {
    word.split("::")
        .map(|segment| segment.to_snake_case())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strips any module path: `Blog::Post` -> `Post`.
pub fn demodulize(word: &str) -> &str {
    match word.rfind("::") {
        Some(pos) => &word[pos + 2..],
        None => word,
    }
}

/// Lowercase, hyphenated form used for element names of columns and associations.
pub fn xml_name(word: &str) -> String {
    word.to_kebab_case()
}
