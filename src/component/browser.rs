use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{Component, TableComponent, TableListComponent, TableListMsg, TableMsg};
use crate::update::{MapMsg, Update};

pub enum BrowserMsg {
    /// The list wants to open a table
    SelectTable(String),
    /// The table view wants focus back on the list
    BackToList,
    List(TableListMsg),
    Table(TableMsg),
}

impl From<TableListMsg> for BrowserMsg {
    fn from(msg: TableListMsg) -> Self {
        match msg {
            TableListMsg::SelectTable(table) => BrowserMsg::SelectTable(table),
            m => BrowserMsg::List(m),
        }
    }
}
impl From<TableMsg> for BrowserMsg {
    fn from(msg: TableMsg) -> Self {
        match msg {
            TableMsg::BackToList => BrowserMsg::BackToList,
            m => BrowserMsg::Table(m),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFocus {
    List,
    Table,
}

/// Table list on the left, the selected table on the right.
pub struct BrowserComponent {
    list: TableListComponent,
    table: TableComponent,
    focus: BrowserFocus,
}

impl BrowserComponent {
    pub fn new(db_path: PathBuf, page_size: usize) -> Self {
        Self {
            list: TableListComponent::new(db_path.clone()),
            table: TableComponent::new(db_path, page_size),
            focus: BrowserFocus::List,
        }
    }

    pub fn focus(&self) -> BrowserFocus {
        self.focus
    }

    fn move_to_table(&mut self, table: String) -> Update<BrowserMsg> {
        self.focus = BrowserFocus::Table;
        self.table.update(TableMsg::Open(table)).map_auto()
    }

    fn move_to_list(&mut self) -> Update<BrowserMsg> {
        self.focus = BrowserFocus::List;
        Update::none()
    }
}

impl Component for BrowserComponent {
    type Msg = BrowserMsg;

    fn update(&mut self, msg: Self::Msg) -> Update<Self::Msg> {
        match msg {
            BrowserMsg::SelectTable(table) => self.move_to_table(table),
            BrowserMsg::BackToList => self.move_to_list(),
            BrowserMsg::List(m) => self.list.update(m).map_auto(),
            BrowserMsg::Table(m) => self.table.update(m).map_auto(),
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Update<Self::Msg> {
        match self.focus {
            BrowserFocus::List => self.list.handle_key(key).map_auto(),
            BrowserFocus::Table => self.table.handle_key(key).map_auto(),
        }
    }

    fn draw(&self, f: &mut Frame, area: Rect, focused: bool) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(20), Constraint::Percentage(80)])
            .split(area);

        self.list
            .draw(f, chunks[0], focused && self.focus == BrowserFocus::List);
        self.table
            .draw(f, chunks[1], focused && self.focus == BrowserFocus::Table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_a_table_moves_focus() {
        let mut browser = BrowserComponent::new(PathBuf::from("x.db"), 10);
        let update = browser.update(TableListMsg::SelectTable("patients".into()).into());
        assert!(update.msg.is_none());
        assert_eq!(browser.focus(), BrowserFocus::Table);
        let _ = browser.update(TableMsg::BackToList.into());
        assert_eq!(browser.focus(), BrowserFocus::List);
    }
}
