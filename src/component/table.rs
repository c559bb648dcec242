use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell as TuiCell, Paragraph, Row, Table as TuiTable, Tabs},
    Frame,
};
use tracing::{debug, error};

use super::{border_style, Component};
use crate::db::{self, Records, TableProperties};
use crate::update::{Command, Update};

pub enum TableMsg {
    FocusRecords,
    FocusProperties,
    BackToList,
    Open(String),
    NextPage,
    PrevPage,
    RecordsLoaded { table: String, records: Records },
    PropertiesLoaded { table: String, properties: TableProperties },
    LoadFailed { table: String, error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFocus {
    Records,
    Properties,
}

pub struct TableComponent {
    db_path: PathBuf,
    page_size: usize,
    table: Option<String>,
    focus: TableFocus,
    offset: usize,
    records: Option<Records>,
    properties: Option<TableProperties>,
    error: Option<String>,
}

impl TableComponent {
    pub fn new(db_path: PathBuf, page_size: usize) -> Self {
        Self {
            db_path,
            page_size: page_size.max(1),
            table: None,
            focus: TableFocus::Records,
            offset: 0,
            records: None,
            properties: None,
            error: None,
        }
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn focus(&self) -> TableFocus {
        self.focus
    }

    fn load_records(&self, table: String) -> Command {
        debug!("Table: loading {table} at offset {}", self.offset);
        let path = self.db_path.clone();
        let (limit, offset) = (self.page_size, self.offset);
        Command::spawn(move |tx| {
            let msg = match db::fetch_records(&path, &table, limit, offset) {
                Ok(records) => TableMsg::RecordsLoaded { table, records },
                Err(e) => {
                    error!("Table: load failed: {e:#}");
                    TableMsg::LoadFailed { table, error: format!("{e:#}") }
                }
            };
            let _ = tx.send(msg.into());
        })
    }

    fn load_properties(&self, table: String) -> Command {
        let path = self.db_path.clone();
        Command::spawn(move |tx| {
            let msg = match db::fetch_properties(&path, &table) {
                Ok(properties) => TableMsg::PropertiesLoaded { table, properties },
                Err(e) => {
                    error!("Table: properties failed: {e:#}");
                    TableMsg::LoadFailed { table, error: format!("{e:#}") }
                }
            };
            let _ = tx.send(msg.into());
        })
    }

    fn is_current(&self, table: &str) -> bool {
        self.table.as_deref() == Some(table)
    }

    fn draw_records(&self, f: &mut Frame, area: Rect, style: Style) {
        let title = format!("Records (from row {})", self.offset + 1);
        let block = Block::default().title(title).borders(Borders::ALL).border_style(style);
        let Some(recs) = &self.records else {
            f.render_widget(Paragraph::new("Loading records...").block(block), area);
            return;
        };
        f.render_widget(records_table(recs).block(block), area);
    }

    fn draw_properties(&self, f: &mut Frame, area: Rect, style: Style) {
        let block = Block::default().title("Properties").borders(Borders::ALL).border_style(style);
        let Some(props) = &self.properties else {
            f.render_widget(Paragraph::new("Loading properties...").block(block), area);
            return;
        };
        let header = Row::new(["name", "type", "nullable", "default", "key", "references"].map(|h| {
            TuiCell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }));
        let rows = props.columns.iter().map(|c| {
            let references = props
                .foreign_keys
                .iter()
                .find(|fk| fk.column == c.name)
                .map(|fk| format!("{}({})", fk.references_table, fk.references_column))
                .unwrap_or_default();
            Row::new(vec![
                c.name.clone(),
                c.data_type.clone(),
                if c.nullable { "YES" } else { "NO" }.to_string(),
                c.default.clone().unwrap_or_default(),
                if c.primary_key { "PK" } else { "" }.to_string(),
                references,
            ])
        });
        let widths = [
            Constraint::Length(18),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(4),
            Constraint::Min(20),
        ];
        f.render_widget(TuiTable::new(rows, widths).header(header).block(block), area);
    }
}

/// Render stringified rows with a bold header.
pub(crate) fn records_table(recs: &Records) -> TuiTable<'_> {
    let header = Row::new(recs.columns.iter().map(|c| {
        TuiCell::from(c.as_str()).style(Style::default().add_modifier(Modifier::BOLD))
    }));
    let rows = recs.rows.iter().map(|r| Row::new(r.iter().map(|v| v.as_str())));
    let widths: Vec<Constraint> = recs.columns.iter().map(|_| Constraint::Length(20)).collect();
    TuiTable::new(rows, widths).header(header)
}

impl Component for TableComponent {
    type Msg = TableMsg;

    fn update(&mut self, msg: Self::Msg) -> Update<Self::Msg> {
        match msg {
            TableMsg::FocusRecords => {
                self.focus = TableFocus::Records;
                Update::none()
            }
            TableMsg::FocusProperties => {
                self.focus = TableFocus::Properties;
                Update::none()
            }
            TableMsg::BackToList => TableMsg::BackToList.into(),
            TableMsg::Open(table) => {
                self.table = Some(table.clone());
                self.offset = 0;
                self.records = None;
                self.properties = None;
                self.error = None;
                Command::batch([self.load_records(table.clone()), self.load_properties(table)]).into()
            }
            TableMsg::NextPage => {
                let full_page = self
                    .records
                    .as_ref()
                    .is_some_and(|r| r.rows.len() >= self.page_size);
                match self.table.clone() {
                    Some(table) if full_page => {
                        self.offset += self.page_size;
                        self.load_records(table).into()
                    }
                    _ => Update::none(),
                }
            }
            TableMsg::PrevPage => match self.table.clone() {
                Some(table) if self.offset > 0 => {
                    self.offset = self.offset.saturating_sub(self.page_size);
                    self.load_records(table).into()
                }
                _ => Update::none(),
            },
            TableMsg::RecordsLoaded { table, records } => {
                if self.is_current(&table) {
                    self.records = Some(records);
                }
                Update::none()
            }
            TableMsg::PropertiesLoaded { table, properties } => {
                if self.is_current(&table) {
                    self.properties = Some(properties);
                }
                Update::none()
            }
            TableMsg::LoadFailed { table, error } => {
                if self.is_current(&table) {
                    self.error = Some(error);
                }
                Update::none()
            }
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Update<Self::Msg> {
        use crossterm::event::KeyCode::*;

        match key.code {
            Char('1') => TableMsg::FocusRecords.into(),
            Char('2') => TableMsg::FocusProperties.into(),
            Char('n') | PageDown => TableMsg::NextPage.into(),
            Char('p') | PageUp => TableMsg::PrevPage.into(),
            Tab | Esc | Left | Char('h') => TableMsg::BackToList.into(),
            _ => Update::none(),
        }
    }

    fn draw(&self, f: &mut Frame, area: Rect, focused: bool) {
        let Some(table) = &self.table else {
            let block = Block::default()
                .title("Table View")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White));
            let content = Paragraph::new(
                "No table selected\n\nSelect a table from the list on the left.",
            )
            .block(block);
            f.render_widget(content, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let selected_tab = match self.focus {
            TableFocus::Records => 0,
            TableFocus::Properties => 1,
        };
        let tabs_widget = Tabs::new(vec!["Records [1]", "Properties [2]"])
            .block(
                Block::default()
                    .title(table.as_str())
                    .borders(Borders::ALL)
                    .border_style(border_style(focused)),
            )
            .select(selected_tab)
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs_widget, chunks[0]);

        let content_style = border_style(focused);
        if let Some(e) = &self.error {
            let block = Block::default().title("Error").borders(Borders::ALL).border_style(content_style);
            f.render_widget(Paragraph::new(e.as_str()).block(block), chunks[1]);
            return;
        }
        match self.focus {
            TableFocus::Records => self.draw_records(f, chunks[1], content_style),
            TableFocus::Properties => self.draw_properties(f, chunks[1], content_style),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: usize) -> Records {
        Records {
            columns: vec!["id".into()],
            rows: (0..rows).map(|i| vec![i.to_string()]).collect(),
        }
    }

    #[test]
    fn paging_moves_by_page_size() {
        let mut view = TableComponent::new(PathBuf::from("x.db"), 2);
        let _ = view.update(TableMsg::Open("patients".into()));
        let _ = view.update(TableMsg::RecordsLoaded { table: "patients".into(), records: page(2) });
        assert!(matches!(view.update(TableMsg::NextPage).cmd, Command::Spawn(_)));
        assert_eq!(view.offset(), 2);
        let _ = view.update(TableMsg::RecordsLoaded { table: "patients".into(), records: page(1) });
        assert!(matches!(view.update(TableMsg::NextPage).cmd, Command::None));
        assert_eq!(view.offset(), 2);
        let _ = view.update(TableMsg::PrevPage);
        assert_eq!(view.offset(), 0);
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut view = TableComponent::new(PathBuf::from("x.db"), 10);
        let _ = view.update(TableMsg::Open("doctors".into()));
        let _ = view.update(TableMsg::RecordsLoaded { table: "patients".into(), records: page(3) });
        assert!(view.records.is_none());
    }

    #[test]
    fn open_loads_records_and_properties() {
        let mut view = TableComponent::new(PathBuf::from("x.db"), 10);
        let update = view.update(TableMsg::Open("doctors".into()));
        assert!(matches!(update.cmd, Command::Batch(ref cmds) if cmds.len() == 2));
        assert_eq!(view.table(), Some("doctors"));
        assert_eq!(view.focus(), TableFocus::Records);
    }
}
