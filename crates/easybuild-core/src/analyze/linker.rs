//! Link driver ranking.

use super::language::Language;

/// A candidate link driver with its authority over the whole program.
///
/// Ranking: assembly < C < C++ < explicit override. A linker with an empty
/// command is unranked and never wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linker {
    priority: i32,
    command: String,
}

impl Default for Linker {
    fn default() -> Self {
        Self {
            priority: -1,
            command: String::new(),
        }
    }
}

impl Linker {
    fn ranked(priority: i32, command: &str) -> Self {
        let command = command.trim();
        if command.is_empty() {
            return Self::default();
        }
        Self {
            priority,
            command: command.to_string(),
        }
    }

    pub fn for_asm(command: &str) -> Self {
        Self::ranked(1, command)
    }

    pub fn for_c(command: &str) -> Self {
        Self::ranked(2, command)
    }

    pub fn for_cpp(command: &str) -> Self {
        Self::ranked(3, command)
    }

    /// Explicit user override; outranks every language-derived linker.
    pub fn for_override(command: &str) -> Self {
        Self::ranked(4, command)
    }

    /// Linker derived from the language of a compiled file.
    pub fn for_language(language: Language, command: &str) -> Self {
        match language {
            Language::Asm => Self::for_asm(command),
            Language::C => Self::for_c(command),
            Language::Cpp => Self::for_cpp(command),
        }
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether this linker carries a usable command.
    pub fn is_ranked(&self) -> bool {
        self.priority >= 0 && !self.command.is_empty()
    }

    /// Keep whichever of `self` and `other` has the higher priority.
    ///
    /// Ties keep `self`, so the first linker observed at a rank wins.
    pub fn max(self, other: Linker) -> Linker {
        if other.priority > self.priority {
            other
        } else {
            self
        }
    }
}
