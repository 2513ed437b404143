//! Picking the input and output roots
//!
//! Every provider answers a prompt with an optional directory. `None` means the
//! operator declined and nothing else must happen.

use std::collections::VecDeque;
use std::path::PathBuf;

use console::Term;

/// Prompt shown when asking for the input root
pub const INPUT_PROMPT: &str = "Select the root folder containing PSD files";

/// Prompt shown when asking for the output root
pub const OUTPUT_PROMPT: &str = "Select the destination folder for PNG files";

/// Capability to ask the operator for a directory
pub trait DirectorySelector {
    fn select_directory(&mut self, prompt: &str) -> Option<PathBuf>;
}

impl<S: DirectorySelector + ?Sized> DirectorySelector for Box<S> {
    fn select_directory(&mut self, prompt: &str) -> Option<PathBuf> {
        (**self).select_directory(prompt)
    }
}

/// Answers prompts, in order, from values supplied up front
#[derive(Debug, Clone, Default)]
pub struct PresetSelector {
    answers: VecDeque<Option<PathBuf>>,
}

impl PresetSelector {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<PathBuf>>,
    {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl DirectorySelector for PresetSelector {
    fn select_directory(&mut self, _prompt: &str) -> Option<PathBuf> {
        self.answers.pop_front().flatten()
    }
}

/// Asks on the terminal; an empty line declines
pub struct PromptSelector {
    term: Term,
}

impl PromptSelector {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for PromptSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectorySelector for PromptSelector {
    fn select_directory(&mut self, prompt: &str) -> Option<PathBuf> {
        if !self.term.is_term() {
            return None;
        }
        self.term.write_str(&format!("{}: ", prompt)).ok()?;
        let line = self.term.read_line().ok()?;
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some(PathBuf::from(line))
        }
    }
}

/// Native folder picker
#[cfg(feature = "gui")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogSelector;

#[cfg(feature = "gui")]
impl DirectorySelector for DialogSelector {
    fn select_directory(&mut self, prompt: &str) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(prompt).pick_folder()
    }
}

/// Uses explicit values where given and asks a fallback selector for the rest
pub struct ChainSelector {
    explicit: VecDeque<Option<PathBuf>>,
    fallback: Option<Box<dyn DirectorySelector>>,
}

impl ChainSelector {
    pub fn new<I>(explicit: I, fallback: Option<Box<dyn DirectorySelector>>) -> Self
    where
        I: IntoIterator<Item = Option<PathBuf>>,
    {
        Self {
            explicit: explicit.into_iter().collect(),
            fallback,
        }
    }
}

impl DirectorySelector for ChainSelector {
    fn select_directory(&mut self, prompt: &str) -> Option<PathBuf> {
        match self.explicit.pop_front().flatten() {
            Some(path) => Some(path),
            None => self
                .fallback
                .as_mut()
                .and_then(|selector| selector.select_directory(prompt)),
        }
    }
}
