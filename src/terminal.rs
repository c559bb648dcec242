use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::Backend;
use ratatui::{backend::CrosstermBackend, Terminal as RatatuiTerminal};
use std::io::{self, Result, Stdout};

/// Thin wrapper so the app loop does not depend on the backend setup.
pub struct Terminal<B: Backend> {
    inner: RatatuiTerminal<B>,
}

impl<B: Backend> Terminal<B> {
    pub fn new(terminal: RatatuiTerminal<B>) -> Self {
        Self { inner: terminal }
    }

    /// Delegate to the inner terminal's draw method
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.inner.draw(f).map(|_| ())
    }
}

/// Terminal wrapper that handles setup and cleanup automatically
pub fn with_terminal<F, R>(f: F) -> anyhow::Result<R>
where
    F: FnOnce(Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<R>,
{
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let ratatui_terminal = RatatuiTerminal::new(backend)?;
    let terminal = Terminal::new(ratatui_terminal);

    // Run the function with the terminal
    let result = f(terminal);

    // Cleanup terminal state
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

    result
}
