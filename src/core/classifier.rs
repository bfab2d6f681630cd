//! Keyword classification of fund names into a category and sub-category.
//!
//! Rules are plain data evaluated top to bottom against the upper-cased name; the first rule
//! with any matching keyword decides the label.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FundCategory {
    Equity,
    Debt,
    Other,
}

impl FundCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundCategory::Equity => "Equity",
            FundCategory::Debt => "Debt",
            FundCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for FundCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any keyword found in the name selects `label`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<L: 'static> {
    pub keywords: &'static [&'static str],
    pub label: L,
}

impl<L: Copy> KeywordRule<L> {
    pub fn matches(&self, name_upper: &str) -> bool {
        self.keywords.iter().any(|k| name_upper.contains(k))
    }
}

/// Returns the label of the first matching rule, or `fallback`.
pub fn first_match<L: Copy>(rules: &[KeywordRule<L>], name_upper: &str, fallback: L) -> L {
    rules
        .iter()
        .find(|rule| rule.matches(name_upper))
        .map_or(fallback, |rule| rule.label)
}

pub const CATEGORY_RULES: &[KeywordRule<FundCategory>] = &[
    KeywordRule {
        keywords: &[
            "EQUITY",
            "BLUECHIP",
            "LARGECAP",
            "MIDCAP",
            "SMALLCAP",
            "MULTICAP",
            "FLEXICAP",
            "FOCUSED",
            "ELSS",
            "TAX SAVER",
            "INDEX",
            "VALUE",
            "CONTRA",
            "DIVIDEND",
            "SECTOR",
            "THEMATIC",
            "PHARMA",
            "TECHNOLOGY",
            "INFRASTRUCTURE",
        ],
        label: FundCategory::Equity,
    },
    KeywordRule {
        keywords: &[
            "DEBT",
            "BOND",
            "GILT",
            "LIQUID",
            "ULTRA SHORT",
            "SHORT TERM",
            "MEDIUM TERM",
            "LONG TERM",
            "CORPORATE BOND",
            "FIXED",
            "INCOME",
            "CREDIT RISK",
            "FLOATING RATE",
            "MONEY MARKET",
            "TREASURY",
            "PSU",
            "BANKING & PSU",
        ],
        label: FundCategory::Debt,
    },
];

pub const EQUITY_SUB_CATEGORY_RULES: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: &["LARGE CAP", "LARGECAP", "BLUECHIP", "TOP 100", "NIFTY 50"],
        label: "Large Cap",
    },
    KeywordRule {
        keywords: &["MID CAP", "MIDCAP", "MID-CAP"],
        label: "Mid Cap",
    },
    KeywordRule {
        keywords: &["SMALL CAP", "SMALLCAP", "SMALL-CAP"],
        label: "Small Cap",
    },
    KeywordRule {
        keywords: &["MULTI CAP", "MULTICAP", "MULTI-CAP"],
        label: "Multi Cap",
    },
    KeywordRule {
        keywords: &["FLEXI CAP", "FLEXICAP", "FLEXI-CAP"],
        label: "Flexi Cap",
    },
];

pub const DEBT_SUB_CATEGORY_RULES: &[KeywordRule<&str>] = &[
    KeywordRule {
        keywords: &["LIQUID", "OVERNIGHT"],
        label: "Liquid",
    },
    KeywordRule {
        keywords: &["ULTRA SHORT", "SHORT TERM"],
        label: "Short Term",
    },
    KeywordRule {
        keywords: &["MEDIUM TERM", "INTERMEDIATE"],
        label: "Medium Term",
    },
    KeywordRule {
        keywords: &["LONG TERM", "GILT"],
        label: "Long Term",
    },
];

pub fn classify(scheme_name: &str) -> (FundCategory, &'static str) {
    let name_upper = scheme_name.to_uppercase();
    let category = first_match(CATEGORY_RULES, &name_upper, FundCategory::Other);
    let sub_category = match category {
        FundCategory::Equity => first_match(EQUITY_SUB_CATEGORY_RULES, &name_upper, "Other Equity"),
        FundCategory::Debt => first_match(DEBT_SUB_CATEGORY_RULES, &name_upper, "Other Debt"),
        FundCategory::Other => "Other",
    };
    (category, sub_category)
}
