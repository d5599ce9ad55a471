use console::{Term, Key};
use std::io::{self, Write};
use crate::ui::ThemeManager;

/// Styled text output around the playfield: menus, messages and the score line.
pub struct Display {
    term: Term,
    theme_manager: ThemeManager,
    text_width: usize,
}

impl Display {
    pub fn new(theme_manager: ThemeManager, text_width: usize) -> io::Result<Self> {
        Ok(Self {
            term: Term::stdout(),
            theme_manager,
            text_width,
        })
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        self.term.clear_screen()
    }

    pub fn hide_cursor(&self) -> io::Result<()> {
        self.term.hide_cursor()
    }

    pub fn show_cursor(&self) -> io::Result<()> {
        self.term.show_cursor()
    }

    pub fn show_title(&self, title: &str) -> io::Result<()> {
        let styled_title = self.theme_manager.apply_style(&self.centered(title), "title");

        let border = "═".repeat(self.text_width);
        let styled_border = self.theme_manager.apply_style(&border, "separator");

        writeln!(io::stdout(), "{}", styled_border)?;
        writeln!(io::stdout(), "{}", styled_title)?;
        writeln!(io::stdout(), "{}", styled_border)?;
        writeln!(io::stdout())?;

        Ok(())
    }

    pub fn show_message(&self, message: &str, style: &str) -> io::Result<()> {
        let styled_message = self.theme_manager.apply_style(message, style);
        writeln!(io::stdout(), "{}", styled_message)?;
        Ok(())
    }

    pub fn show_error(&self, error: &str) -> io::Result<()> {
        self.show_message(&format!("❌ {}", error), "error")
    }

    /// Score line drawn under the playfield each frame.
    pub fn score_footer(&self, score_text: &str, hint: &str) -> String {
        format!(
            "{}  {}",
            self.theme_manager.apply_style(score_text, "score"),
            self.theme_manager.apply_style(hint, "hint")
        )
    }

    pub fn wait_for_key(&self) -> io::Result<Key> {
        self.term.read_key()
    }

    pub fn set_theme(&mut self, theme_name: &str) -> bool {
        self.theme_manager.set_theme(theme_name)
    }

    pub fn get_available_themes(&self) -> Vec<String> {
        self.theme_manager.list_themes()
    }

    fn centered(&self, text: &str) -> String {
        let len = text.chars().count();
        if len >= self.text_width {
            return text.to_string();
        }
        format!("{}{}", " ".repeat((self.text_width - len) / 2), text)
    }
}
