//! The category enumeration used to validate and expand aggregation requests.

use thiserror::Error;

use super::ValidationError;

/// Categories used when none are configured.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Music",
    "Grocery",
    "Clothing",
    "Home",
    "Books",
    "Outdoors",
    "Electrics",
    "Beauty",
];

/// Accepted spellings of the "every category" sentinel.
///
/// This is a literal list, not a case-insensitive match: `aLL` is not accepted.
pub const ALL_CATEGORY_SPELLINGS: [&str; 7] = ["All", "ALL", "AlL", "ALl", "alL", "aLl", "all"];

/// Errors raised while building a category set from configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Category list is empty")]
    Empty,
    #[error("Category names cannot be blank")]
    Blank,
    #[error("Duplicate category: {0}")]
    Duplicate(String),
    #[error("Category name is reserved: {0}")]
    Reserved(String),
    #[error("Invalid category list: {0}")]
    Malformed(String),
}

/// What an aggregation request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryScope {
    All,
    Single(String),
}

/// Validated, ordered set of canonical category names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    canonical: Vec<String>,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            canonical: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl CategorySet {
    /// Creates a category set, rejecting empty, blank, duplicate and reserved names.
    pub fn new<I, S>(categories: I) -> Result<Self, CategoryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut canonical: Vec<String> = Vec::new();
        for category in categories {
            let category = category.into().trim().to_string();
            if category.is_empty() {
                return Err(CategoryError::Blank);
            }
            if ALL_CATEGORY_SPELLINGS.contains(&category.as_str()) {
                return Err(CategoryError::Reserved(category));
            }
            if canonical.contains(&category) {
                return Err(CategoryError::Duplicate(category));
            }
            canonical.push(category);
        }

        if canonical.is_empty() {
            return Err(CategoryError::Empty);
        }
        Ok(Self { canonical })
    }

    /// Parses a configured category list.
    ///
    /// Accepts a JSON array of strings (`["Music", "Books"]`) or a comma-separated
    /// list (`Music, Books`).
    pub fn parse(raw: &str) -> Result<Self, CategoryError> {
        let raw = raw.trim();
        if raw.starts_with('[') {
            let categories: Vec<String> = serde_json::from_str(raw)
                .map_err(|e| CategoryError::Malformed(e.to_string()))?;
            return Self::new(categories);
        }
        Self::new(raw.split(',').filter(|c| !c.trim().is_empty()))
    }

    /// Canonical names in configuration order.
    pub fn canonical(&self) -> &[String] {
        &self.canonical
    }

    /// Every spelling a stored item may use: canonical names, then their lowercase forms.
    pub fn spellings(&self) -> Vec<String> {
        let mut spellings = self.canonical.clone();
        for category in &self.canonical {
            let lower = category.to_lowercase();
            if !spellings.contains(&lower) {
                spellings.push(lower);
            }
        }
        spellings
    }

    /// Returns true when `token` is a canonical name or its lowercase form.
    pub fn is_valid(&self, token: &str) -> bool {
        self.canonical
            .iter()
            .any(|c| c == token || c.to_lowercase() == token)
    }

    /// Resolves an aggregation token into a scope.
    pub fn resolve(&self, token: Option<&str>) -> Result<CategoryScope, ValidationError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::InvalidCategory)?;

        if ALL_CATEGORY_SPELLINGS.contains(&token) {
            return Ok(CategoryScope::All);
        }
        if self.is_valid(token) {
            return Ok(CategoryScope::Single(token.to_string()));
        }
        Err(ValidationError::InvalidCategory)
    }
}
