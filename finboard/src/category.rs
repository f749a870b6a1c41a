/// Label used when a transaction carries no category at all
pub const OTHER_CATEGORY: &str = "Other";

/// Turn a raw classifier code such as `FOOD_AND_DRINK` into `Food And Drink`.
///
/// Labels that are already human-readable (`food and drink`) normalize to the
/// same form, since words split on whitespace as well as underscores.
pub fn format_category_name(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return OTHER_CATEGORY.to_string();
    };

    let words: Vec<String> = raw
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect();

    if words.is_empty() {
        OTHER_CATEGORY.to_string()
    } else {
        words.join(" ")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// A category identity that compares equal under either representation.
///
/// Upstream classification sometimes hands back the raw code (`GENERAL_MERCHANDISE`)
/// and sometimes a human label (`General Merchandise`); both must land in the same
/// budget.
#[derive(Debug, Clone)]
pub struct CategoryKey {
    raw: String,
    display: String,
}

impl CategoryKey {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_lowercase(),
            display: format_category_name(Some(raw)),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display
    }

    /// True when `raw` names this category, comparing raw codes case-insensitively
    /// or formatted display names exactly.
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().to_lowercase() == self.raw || format_category_name(Some(raw)) == self.display
    }
}

impl PartialEq for CategoryKey {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw || self.display == other.display
    }
}

/// Colors for a category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagTheme {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

pub const TAG_PALETTE: [TagTheme; 8] = [
    TagTheme {
        background: "#e0f2fe",
        text: "#075985",
        border: "#7dd3fc",
    },
    TagTheme {
        background: "#dcfce7",
        text: "#166534",
        border: "#86efac",
    },
    TagTheme {
        background: "#fef3c7",
        text: "#92400e",
        border: "#fcd34d",
    },
    TagTheme {
        background: "#fce7f3",
        text: "#9d174d",
        border: "#f9a8d4",
    },
    TagTheme {
        background: "#ede9fe",
        text: "#5b21b6",
        border: "#c4b5fd",
    },
    TagTheme {
        background: "#ffedd5",
        text: "#9a3412",
        border: "#fdba74",
    },
    TagTheme {
        background: "#ccfbf1",
        text: "#115e59",
        border: "#5eead4",
    },
    TagTheme {
        background: "#f1f5f9",
        text: "#334155",
        border: "#cbd5e1",
    },
];

/// 32-bit polynomial rolling hash (`h * 31 + unit`) over the UTF-16 units of `s`
fn rolling_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Stable theme for a category name, independent of casing
pub fn tag_theme_for_category(name: &str) -> TagTheme {
    let hash = rolling_hash(&name.to_lowercase());
    let index = hash.unsigned_abs() as usize % TAG_PALETTE.len();
    TAG_PALETTE[index]
}
