use std::collections::HashMap;

use crate::manifest::RemoteFile;

/// How Changed files are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Ask the operator, pre-selecting files picked by the default selector.
    Interactive,
    /// Never ask; every Changed file is skipped.
    NonInteractive,
}

/// What the operator answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Indices into the changed list that should be overwritten.
    Chosen(Vec<usize>),
    Cancelled,
}

/// Errors a prompt implementation can report.
#[derive(Debug, thiserror::Error)]
#[error("prompt failed: {0}")]
pub struct PromptError(pub String);

/// Operator interaction over the Changed-file set.
pub trait ChangedFilePrompt {
    /// `defaults[i]` is the pre-selection for `changed[i]`.
    fn select(&self, changed: &[&RemoteFile], defaults: &[bool]) -> Result<Selection, PromptError>;
}

/// Errors that can occur while resolving Changed files.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("selection cancelled by operator")]
    Cancelled,

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("selection index {index} is out of range for {len} changed files")]
    InvalidSelection { index: usize, len: usize },
}

/// Per-path overwrite decisions for Changed files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolutions {
    overwrite: HashMap<String, bool>,
}

impl Resolutions {
    /// `None` for paths that never entered resolution.
    pub fn overwrite(&self, relative_path: &str) -> Option<bool> {
        self.overwrite.get(relative_path).copied()
    }

    pub fn approved(&self) -> impl Iterator<Item = &str> {
        self.overwrite
            .iter()
            .filter(|(_, overwrite)| **overwrite)
            .map(|(path, _)| path.as_str())
    }

    pub fn len(&self) -> usize {
        self.overwrite.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overwrite.is_empty()
    }

    fn decide(&mut self, relative_path: &str, overwrite: bool) {
        self.overwrite.insert(relative_path.to_owned(), overwrite);
    }
}

/// Pre-selects files whose name marks them as prompt or instruction documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocumentSelector {
    suffixes: Vec<String>,
}

impl PromptDocumentSelector {
    pub const DEFAULT_SUFFIXES: &'static [&'static str] = &[".prompt.md", ".instructions.md"];

    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn selects(&self, file: &RemoteFile) -> bool {
        let name = file.file_name().to_lowercase();
        self.suffixes
            .iter()
            .any(|suffix| name.ends_with(&suffix.to_lowercase()))
    }
}

impl Default for PromptDocumentSelector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SUFFIXES.iter().copied())
    }
}

/// Decide, for each Changed file, whether it gets overwritten.
///
/// An empty `changed` list resolves to nothing without touching the prompt.
pub fn resolve(
    changed: &[&RemoteFile],
    mode: ResolveMode,
    default_selector: &dyn Fn(&RemoteFile) -> bool,
    prompt: &dyn ChangedFilePrompt,
) -> Result<Resolutions, ResolveError> {
    let mut resolutions = Resolutions::default();

    if changed.is_empty() {
        return Ok(resolutions);
    }

    match mode {
        ResolveMode::NonInteractive => {
            for file in changed {
                resolutions.decide(&file.relative_path, false);
            }
        }
        ResolveMode::Interactive => {
            let defaults: Vec<bool> = changed.iter().map(|f| default_selector(*f)).collect();

            let chosen = match prompt.select(changed, &defaults)? {
                Selection::Cancelled => return Err(ResolveError::Cancelled),
                Selection::Chosen(indices) => indices,
            };

            let mut overwrite = vec![false; changed.len()];
            for index in chosen {
                let slot = overwrite.get_mut(index).ok_or(ResolveError::InvalidSelection {
                    index,
                    len: changed.len(),
                })?;
                *slot = true;
            }

            for (file, overwrite) in changed.iter().zip(overwrite) {
                resolutions.decide(&file.relative_path, overwrite);
            }
        }
    }

    tracing::info!(
        changed = changed.len(),
        overwrite = resolutions.approved().count(),
        ?mode,
        "resolved changed files"
    );

    Ok(resolutions)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records every call and answers with a fixed selection.
    struct RecordingPrompt {
        answer: Selection,
        calls: RefCell<Vec<Vec<bool>>>,
    }

    impl RecordingPrompt {
        fn answering(answer: Selection) -> Self {
            Self {
                answer,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChangedFilePrompt for RecordingPrompt {
        fn select(&self, _: &[&RemoteFile], defaults: &[bool]) -> Result<Selection, PromptError> {
            self.calls.borrow_mut().push(defaults.to_vec());
            Ok(self.answer.clone())
        }
    }

    fn never(_: &RemoteFile) -> bool {
        false
    }

    #[test]
    fn empty_changed_set_never_prompts() {
        let prompt = RecordingPrompt::answering(Selection::Cancelled);
        let resolutions = resolve(&[], ResolveMode::Interactive, &never, &prompt).unwrap();
        assert!(resolutions.is_empty());
        assert!(prompt.calls.borrow().is_empty());
    }

    #[test]
    fn non_interactive_skips_everything_without_prompting() {
        let a = RemoteFile::new("a.md", "a");
        let b = RemoteFile::new("b.prompt.md", "b");
        let prompt = RecordingPrompt::answering(Selection::Chosen(vec![0, 1]));
        let always = |_: &RemoteFile| true;

        let resolutions =
            resolve(&[&a, &b], ResolveMode::NonInteractive, &always, &prompt).unwrap();

        assert_eq!(resolutions.overwrite("a.md"), Some(false));
        assert_eq!(resolutions.overwrite("b.prompt.md"), Some(false));
        assert_eq!(resolutions.approved().count(), 0);
        assert!(prompt.calls.borrow().is_empty());
    }

    #[test]
    fn interactive_passes_defaults_from_selector() {
        let a = RemoteFile::new("notes.md", "a");
        let b = RemoteFile::new("review.prompt.md", "b");
        let prompt = RecordingPrompt::answering(Selection::Chosen(vec![1]));
        let selector = PromptDocumentSelector::default();

        resolve(
            &[&a, &b],
            ResolveMode::Interactive,
            &|f| selector.selects(f),
            &prompt,
        )
        .unwrap();

        assert_eq!(prompt.calls.borrow().as_slice(), &[vec![false, true]]);
    }

    #[test]
    fn interactive_applies_operator_choice() {
        let a = RemoteFile::new("a.md", "a");
        let b = RemoteFile::new("b.md", "b");
        let prompt = RecordingPrompt::answering(Selection::Chosen(vec![0]));

        let resolutions = resolve(&[&a, &b], ResolveMode::Interactive, &never, &prompt).unwrap();

        assert_eq!(resolutions.overwrite("a.md"), Some(true));
        assert_eq!(resolutions.overwrite("b.md"), Some(false));
        assert_eq!(resolutions.len(), 2);
    }

    #[test]
    fn interactive_cancel_is_an_error() {
        let a = RemoteFile::new("a.md", "a");
        let prompt = RecordingPrompt::answering(Selection::Cancelled);

        let result = resolve(&[&a], ResolveMode::Interactive, &never, &prompt);
        assert!(matches!(result, Err(ResolveError::Cancelled)));
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let a = RemoteFile::new("a.md", "a");
        let prompt = RecordingPrompt::answering(Selection::Chosen(vec![3]));

        let result = resolve(&[&a], ResolveMode::Interactive, &never, &prompt);
        assert!(matches!(
            result,
            Err(ResolveError::InvalidSelection { index: 3, len: 1 })
        ));
    }

    #[test]
    fn selector_matches_prompt_and_instruction_documents() {
        let selector = PromptDocumentSelector::default();
        assert!(selector.selects(&RemoteFile::new("prompts/review.prompt.md", "")));
        assert!(selector.selects(&RemoteFile::new("rust.instructions.md", "")));
        assert!(selector.selects(&RemoteFile::new("Review.PROMPT.md", "")));
        assert!(!selector.selects(&RemoteFile::new("README.md", "")));
        assert!(!selector.selects(&RemoteFile::new("prompt.md.bak", "")));
    }

    #[test]
    fn selector_with_custom_suffixes() {
        let selector = PromptDocumentSelector::new([".mdc"]);
        assert!(selector.selects(&RemoteFile::new(".cursor/rules/style.mdc", "")));
        assert!(!selector.selects(&RemoteFile::new("review.prompt.md", "")));
    }
}
