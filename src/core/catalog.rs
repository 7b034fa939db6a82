//! Free-tier model catalog and current-model selection.

use std::error::Error;
use std::fmt;

/// Models that are known to be usable without credits. Seeds the catalog at
/// startup and backs `--list-models` when the remote catalogue is unreachable.
pub const FREE_MODELS: &[&str] = &[
    "qwen/qwen3-235b-a22b:free",
    "ArliAI/QwQ-32B-RpR-v1",
    "Google/Gemma-2-9B",
    "Google/Gemma-3-12B",
    "Google/Gemma-3n-2B",
    "Google/Gemma-3-4B",
    "Google/Gemma-3n-4B",
    "Tencent/Hunyuan-A13B-Instruct",
    "Agentica/Deepcoder-14B-Preview",
];

pub const DEFAULT_MODEL: &str = "qwen/qwen3-235b-a22b:free";

/// Returned by [`ModelCatalog::set_model`] when the requested id is not in
/// the catalog. The current model is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNotAvailable {
    pub model: String,
}

impl fmt::Display for ModelNotAvailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model '{}' is not in the free-tier catalog.", self.model)
    }
}

impl Error for ModelNotAvailable {}

/// Ordered list of selectable model ids plus the active one.
///
/// Insertion order is display order. The current model is always a member of
/// the list; `replace` keeps the selection sticky across refreshes and falls
/// back to the first entry only when the selection disappeared.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<String>,
    current: String,
}

impl ModelCatalog {
    pub fn new() -> Self {
        ModelCatalog {
            models: FREE_MODELS.iter().map(|m| m.to_string()).collect(),
            current: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Switch to `model`, failing without side effects when it is unknown.
    pub fn set_model(&mut self, model: &str) -> Result<(), ModelNotAvailable> {
        if self.models.iter().any(|m| m == model) {
            self.current = model.to_string();
            Ok(())
        } else {
            Err(ModelNotAvailable {
                model: model.to_string(),
            })
        }
    }

    /// Snapshot copy of the catalog in display order.
    pub fn list(&self) -> Vec<String> {
        self.models.clone()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Replace the catalog with a freshly fetched list.
    ///
    /// Dedupes while preserving first-seen order and skips empty ids. An
    /// empty result leaves the catalog untouched so a failed refresh can
    /// never strand the user without any model. Returns `true` when the
    /// current model was absent from the new list and the selection fell
    /// back to the first entry, so the caller can surface a notice.
    pub fn replace<I>(&mut self, models: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for model in models {
            if model.trim().is_empty() {
                continue;
            }
            if !deduped.contains(&model) {
                deduped.push(model);
            }
        }

        if deduped.is_empty() {
            return false;
        }

        let lost_current = !deduped.contains(&self.current);
        self.models = deduped;
        if lost_current {
            self.current = self.models[0].clone();
        }
        lost_current
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_builtin_models_and_default_current() {
        let catalog = ModelCatalog::new();
        assert_eq!(catalog.list().len(), FREE_MODELS.len());
        assert_eq!(catalog.current(), DEFAULT_MODEL);
    }

    #[test]
    fn set_model_succeeds_only_for_members() {
        let mut catalog = ModelCatalog::new();
        assert!(catalog.set_model("Google/Gemma-2-9B").is_ok());
        assert_eq!(catalog.current(), "Google/Gemma-2-9B");

        let err = catalog.set_model("nope/unknown").unwrap_err();
        assert_eq!(err.model, "nope/unknown");
        // Failed switches leave the selection alone.
        assert_eq!(catalog.current(), "Google/Gemma-2-9B");
    }

    #[test]
    fn list_returns_an_independent_snapshot() {
        let catalog = ModelCatalog::new();
        let mut listed = catalog.list();
        listed.clear();
        assert_eq!(catalog.list().len(), FREE_MODELS.len());
    }

    #[test]
    fn replace_dedupes_and_keeps_surviving_current() {
        let mut catalog = ModelCatalog::new();
        // The built-in default is not in the new set, so this replace reports
        // a fallback; the next one must not.
        assert!(catalog.replace(vec!["x".to_string(), "y".to_string()]));
        catalog.set_model("y").unwrap();

        let changed = catalog.replace(vec!["x".to_string(), "x".to_string(), "y".to_string()]);
        assert!(!changed);
        assert_eq!(catalog.list(), vec!["x".to_string(), "y".to_string()]);
        assert_eq!(catalog.current(), "y");
    }

    #[test]
    fn replace_falls_back_to_first_when_current_disappears() {
        let mut catalog = ModelCatalog::new();
        let changed = catalog.replace(vec!["a".to_string(), "b".to_string()]);
        assert!(changed);
        assert_eq!(catalog.current(), "a");
    }

    #[test]
    fn replace_with_empty_or_blank_input_is_a_no_op() {
        let mut catalog = ModelCatalog::new();
        let before = catalog.list();

        assert!(!catalog.replace(Vec::new()));
        assert!(!catalog.replace(vec!["".to_string(), "   ".to_string()]));
        assert_eq!(catalog.list(), before);
        assert_eq!(catalog.current(), DEFAULT_MODEL);
    }

    #[test]
    fn catalog_never_empties_once_populated() {
        let mut catalog = ModelCatalog::new();
        catalog.replace(vec!["solo".to_string()]);
        catalog.replace(Vec::new());
        assert!(!catalog.is_empty());
        assert_eq!(catalog.current(), "solo");
    }
}
