//! Terminal colour and emoji policy for report output.

use crate::aggregation::SentimentTone;
use crate::core::Priority;
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiMode {
    Auto,
    Always,
    Never,
}

impl EmojiMode {
    pub fn should_use_emoji(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
    pub emoji: EmojiMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            emoji: EmojiMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode, emoji: EmojiMode) -> Self {
        Self { color, emoji }
    }

    /// Honour NO_COLOR, CLICOLOR and CLICOLOR_FORCE.
    pub fn from_env() -> Self {
        Self::from_env_values(
            env::var("NO_COLOR").ok().as_deref(),
            env::var("CLICOLOR").ok().as_deref(),
            env::var("CLICOLOR_FORCE").ok().as_deref(),
        )
    }

    fn from_env_values(
        no_color: Option<&str>,
        clicolor: Option<&str>,
        clicolor_force: Option<&str>,
    ) -> Self {
        let mut config = Self::default();
        // per no-color.org, any value disables colour
        if no_color.is_some() || clicolor == Some("0") {
            config.color = ColorMode::Never;
        }
        if clicolor_force == Some("1") {
            config.color = ColorMode::Always;
        }
        config
    }

    /// ASCII-only output without colour or emoji
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            emoji: EmojiMode::Never,
        }
    }

    /// `--plain` wins over the environment.
    pub fn resolve(plain: bool) -> Self {
        if plain {
            Self::plain()
        } else {
            Self::from_env()
        }
    }
}

pub trait OutputFormatter {
    fn header(&self, text: &str) -> String;
    fn bold(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
    /// Colour by presentation priority
    fn priority(&self, text: &str, priority: Priority) -> String;
    fn tone(&self, text: &str, tone: SentimentTone) -> String;
    /// Emoji or bracketed ASCII marker for a priority
    fn marker(&self, priority: Priority) -> String;
}

pub struct ColoredFormatter {
    use_color: bool,
    use_emoji: bool,
}

impl ColoredFormatter {
    pub fn new(config: FormattingConfig) -> Self {
        let use_color = config.color.should_use_color();
        colored::control::set_override(use_color);
        Self {
            use_color,
            use_emoji: config.emoji.should_use_emoji(),
        }
    }

    fn paint(&self, text: &str, paint: impl FnOnce(&str) -> ColoredString) -> String {
        if self.use_color {
            paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    fn priority(&self, text: &str, priority: Priority) -> String {
        match priority {
            Priority::Critical => self.paint(text, |t| t.red().bold()),
            Priority::High => self.paint(text, |t| t.red()),
            Priority::Medium => self.paint(text, |t| t.yellow()),
            Priority::Low => self.paint(text, |t| t.green()),
        }
    }

    fn tone(&self, text: &str, tone: SentimentTone) -> String {
        match tone {
            SentimentTone::Positive => self.paint(text, |t| t.green()),
            SentimentTone::Neutral => text.to_string(),
            SentimentTone::Negative => self.paint(text, |t| t.red()),
        }
    }

    fn marker(&self, priority: Priority) -> String {
        let (emoji, fallback) = priority_marker(priority);
        if self.use_emoji {
            emoji.to_string()
        } else {
            fallback.to_string()
        }
    }
}

/// Emoji and ASCII fallback for a priority.
pub fn priority_marker(priority: Priority) -> (&'static str, &'static str) {
    match priority {
        Priority::Critical => ("🚨", "[CRITICAL]"),
        Priority::High => ("🔴", "[HIGH]"),
        Priority::Medium => ("🟡", "[MEDIUM]"),
        Priority::Low => ("🟢", "[LOW]"),
    }
}

fn detect_terminal() -> bool {
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}
