use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::{error, info};

use super::{border_style, Component};
use crate::db;
use crate::update::{Command, Update};

pub enum TableListMsg {
    MoveUp,
    MoveDown,
    MoveTop,
    MoveBottom,
    SelectTable(String),
    Filter,
    FilterPush(char),
    FilterPop,
    FilterDone,
    Load,
    Loaded(Vec<String>),
    LoadFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Filter,
}

pub struct TableListComponent {
    db_path: PathBuf,
    tables: Vec<String>,
    selected: usize,
    focus: Focus,
    filter_query: String,
    error: Option<String>,
}

impl TableListComponent {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            tables: vec![],
            selected: 0,
            focus: Focus::List,
            filter_query: String::new(),
            error: None,
        }
    }

    /// Tables whose name contains the filter text, ignoring case.
    pub fn visible(&self) -> Vec<&str> {
        let needle = self.filter_query.to_lowercase();
        self.tables
            .iter()
            .filter(|t| t.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.visible().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn load(&self) -> Update<TableListMsg> {
        let path = self.db_path.clone();
        Command::spawn(move |tx| {
            let msg = match db::fetch_tables(&path) {
                Ok(tables) => {
                    info!("TableList: loaded {} table(s)", tables.len());
                    TableListMsg::Loaded(tables)
                }
                Err(e) => {
                    error!("TableList: load failed: {e:#}");
                    TableListMsg::LoadFailed(format!("{e:#}"))
                }
            };
            let _ = tx.send(msg.into());
        })
        .into()
    }
}

impl Component for TableListComponent {
    type Msg = TableListMsg;

    fn update(&mut self, msg: Self::Msg) -> Update<Self::Msg> {
        let len = self.visible().len();
        match msg {
            TableListMsg::Load => return self.load(),
            TableListMsg::Loaded(tables) => {
                self.tables = tables;
                self.selected = 0;
                self.error = None;
            }
            TableListMsg::LoadFailed(e) => self.error = Some(e),
            TableListMsg::MoveUp => self.selected = self.selected.saturating_sub(1),
            TableListMsg::MoveDown => {
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
            }
            TableListMsg::MoveTop => self.selected = 0,
            TableListMsg::MoveBottom => self.selected = len.saturating_sub(1),
            TableListMsg::Filter => self.focus = Focus::Filter,
            TableListMsg::FilterPush(c) => {
                self.filter_query.push(c);
                self.clamp_selection();
            }
            TableListMsg::FilterPop => {
                self.filter_query.pop();
                self.clamp_selection();
            }
            TableListMsg::FilterDone => self.focus = Focus::List,
            // Handled by the parent
            TableListMsg::SelectTable(_) => {}
        }
        Update::none()
    }

    fn handle_key(&self, key: KeyEvent) -> Update<Self::Msg> {
        use crossterm::event::KeyCode::*;

        match self.focus {
            Focus::List => match key.code {
                Up | Char('k') => TableListMsg::MoveUp.into(),
                Down | Char('j') => TableListMsg::MoveDown.into(),
                Char('g') | Home => TableListMsg::MoveTop.into(),
                Char('G') | End => TableListMsg::MoveBottom.into(),
                Char('/') => TableListMsg::Filter.into(),
                Char('r') => TableListMsg::Load.into(),
                Enter | Right | Char('l') => match self.selected_table() {
                    Some(t) => TableListMsg::SelectTable(t.to_string()).into(),
                    None => Update::none(),
                },
                _ => Update::none(),
            },
            Focus::Filter => match key.code {
                Enter | Esc => TableListMsg::FilterDone.into(),
                Char(c) => TableListMsg::FilterPush(c).into(),
                Backspace => TableListMsg::FilterPop.into(),
                _ => Update::none(),
            },
        }
    }

    fn draw(&self, f: &mut Frame, area: Rect, focused: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let visible = self.visible();
        let items: Vec<ListItem> = if let Some(e) = &self.error {
            vec![ListItem::new(Span::styled(
                format!("error: {e}"),
                Style::default().fg(Color::Red),
            ))]
        } else if visible.is_empty() {
            vec![ListItem::new("(no tables)")]
        } else {
            visible
                .iter()
                .map(|name| ListItem::new(Span::raw(format!("  {name}"))))
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Tables")
                    .borders(Borders::ALL)
                    .border_style(border_style(focused && self.focus == Focus::List)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        if !visible.is_empty() && self.error.is_none() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, chunks[0], &mut state);

        let filter_block = Block::default()
            .title("Filter")
            .borders(Borders::ALL)
            .border_style(border_style(focused && self.focus == Focus::Filter));
        let filter_text = if self.focus == Focus::Filter {
            format!("{}_", self.filter_query)
        } else {
            self.filter_query.clone()
        };
        f.render_widget(Paragraph::new(filter_text).block(filter_block), chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn loaded() -> TableListComponent {
        let mut list = TableListComponent::new(PathBuf::from("x.db"));
        let tables = ["doctors", "medical_records", "medications", "patients", "prescriptions"];
        let _ = list.update(TableListMsg::Loaded(tables.iter().map(|t| t.to_string()).collect()));
        list
    }

    #[test]
    fn filter_narrows_and_clamps_selection() {
        let mut list = loaded();
        let _ = list.update(TableListMsg::MoveBottom);
        assert_eq!(list.selected_table(), Some("prescriptions"));
        for c in "MED".chars() {
            let _ = list.update(TableListMsg::FilterPush(c));
        }
        assert_eq!(list.visible(), vec!["medical_records", "medications"]);
        assert_eq!(list.selected_table(), Some("medications"));
    }

    #[test]
    fn movement_stays_in_bounds() {
        let mut list = loaded();
        let _ = list.update(TableListMsg::MoveUp);
        assert_eq!(list.selected_table(), Some("doctors"));
        for _ in 0..10 {
            let _ = list.update(TableListMsg::MoveDown);
        }
        assert_eq!(list.selected_table(), Some("prescriptions"));
    }

    #[test]
    fn enter_selects_highlighted_table() {
        let mut list = loaded();
        let _ = list.update(TableListMsg::MoveDown);
        let update = list.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(matches!(update.msg, Some(TableListMsg::SelectTable(t)) if t == "medical_records"));
    }
}
