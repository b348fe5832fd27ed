use crate::models::NormalizedContext;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Anything that is not a word character or whitespace
static STRICT_REJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Word characters, whitespace, German and Spanish letters, the Greek blocks,
/// mathematical operators and a handful of ASCII operators survive
static EXTENDED_REJECT: Lazy<Regex> = Lazy::new(|| {
    let greek = "\u{0370}-\u{03FF}\u{1F00}-\u{1FFF}";
    let german = "ÄäÖöÜüß";
    let spanish = "ÁáÉéÍíÑñÓóÚúÜü";
    let math = "\u{2200}-\u{22FF}";
    let symbols = r"*+\-\^/\\=<>|@\&%";
    Regex::new(&format!(
        r"[^\w\s{greek}{german}{spanish}{math}{symbols}]"
    ))
    .unwrap()
});

/// Character allow-list applied during normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeVariant {
    /// Word characters and whitespace only
    #[default]
    Strict,
    /// Strict plus multilingual letters, Greek, math operators and `*+-^/\=<>|@&%`
    Extended,
}

impl NormalizeVariant {
    fn reject_pattern(&self) -> &'static Regex {
        match self {
            NormalizeVariant::Strict => &STRICT_REJECT,
            NormalizeVariant::Extended => &EXTENDED_REJECT,
        }
    }
}

impl FromStr for NormalizeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(NormalizeVariant::Strict),
            "extended" => Ok(NormalizeVariant::Extended),
            other => Err(format!(
                "unknown normalizer variant '{}' (expected 'strict' or 'extended')",
                other
            )),
        }
    }
}

impl fmt::Display for NormalizeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeVariant::Strict => f.write_str("strict"),
            NormalizeVariant::Extended => f.write_str("extended"),
        }
    }
}

/// Turn raw extracted text into QA context.
///
/// Steps, in order:
/// 1. lower-case
/// 2. collapse every whitespace run to a single space
/// 3. drop characters outside the variant's allow-list
/// 4. collapse the runs step 3 leaves behind (`"a , b"` -> `"a b"`)
///
/// Leading and trailing whitespace is collapsed, never trimmed. The result
/// may be empty.
pub fn normalize(text: &str, variant: NormalizeVariant) -> NormalizedContext {
    let lowered = text.to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(&lowered, " ");
    let filtered = variant.reject_pattern().replace_all(&collapsed, "");
    let recollapsed = WHITESPACE_RUN.replace_all(&filtered, " ");
    NormalizedContext::new(recollapsed.into_owned())
}
