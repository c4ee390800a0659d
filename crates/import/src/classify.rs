//! Rule-based category suggestion learned from previously categorized
//! transactions. No ML involved: merchant patterns are extracted from
//! descriptions and matched by decreasing specificity.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static LEADING_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z0-9]+(?:\s+[A-Z0-9]+)?)").expect("static regex"));
static KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]{3,}").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// The whole cleaned description.
    Exact,
    /// The first one or two tokens, usually the merchant name.
    StartsWith,
    /// The first token of three or more characters.
    Contains,
}

impl PatternKind {
    fn confidence(self) -> f32 {
        match self {
            PatternKind::Exact => 0.95,
            PatternKind::StartsWith => 0.75,
            PatternKind::Contains => 0.50,
        }
    }
}

/// Extracts match patterns from a description, most specific first.
pub fn merchant_patterns(description: &str) -> Vec<(String, PatternKind)> {
    let cleaned = description.trim().to_uppercase();
    if cleaned.is_empty() {
        return Vec::new();
    }

    let mut patterns = vec![(cleaned.clone(), PatternKind::Exact)];

    let mut merchant: Option<String> = None;
    if let Some(caps) = LEADING_TOKENS.captures(&cleaned) {
        let name = caps[1].trim().to_string();
        if !name.is_empty() && name != cleaned {
            merchant = Some(name.clone());
            patterns.push((name, PatternKind::StartsWith));
        }
    }

    if let Some(hit) = KEYWORD.find(&cleaned) {
        let keyword = hit.as_str().to_string();
        if keyword != cleaned && merchant.as_deref() != Some(keyword.as_str()) {
            patterns.push((keyword, PatternKind::Contains));
        }
    }

    patterns
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub category: String,
    pub confidence: f32,
}

/// In-memory pattern → category store. Seeded from the user's existing
/// categorized transactions at the start of an import; nothing is persisted.
#[derive(Debug, Default)]
pub struct Classifier {
    rules: HashMap<(String, PatternKind), HashMap<String, u32>>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Records that `description` was filed under `category`, strengthening
    /// every pattern the description yields.
    pub fn learn(&mut self, description: &str, category: &str) {
        let category = category.trim();
        if category.is_empty() {
            return;
        }
        for (pattern, kind) in merchant_patterns(description) {
            *self
                .rules
                .entry((pattern, kind))
                .or_default()
                .entry(category.to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn learn_many<'a, I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut learned = 0;
        for (description, category) in pairs {
            self.learn(description, category);
            learned += 1;
        }
        learned
    }

    /// Suggests a category for `description`, trying patterns in specificity
    /// order. Within a pattern the most frequently confirmed category wins;
    /// ties break lexicographically so suggestions are stable.
    pub fn suggest(&self, description: &str) -> Option<Suggestion> {
        for (pattern, kind) in merchant_patterns(description) {
            let Some(categories) = self.rules.get(&(pattern, kind)) else {
                continue;
            };
            let best = categories
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)));
            if let Some((category, _)) = best {
                return Some(Suggestion {
                    category: category.clone(),
                    confidence: kind.confidence(),
                });
            }
        }
        None
    }
}
