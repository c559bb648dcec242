use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tracing::{error, info};

use super::{border_style, draw_bar_chart, Component};
use crate::chart::BarSeries;
use crate::db::{self, Stats};
use crate::update::{Command, Update};

pub enum OverviewMsg {
    Load,
    Loaded(Stats),
    LoadFailed(String),
}

/// Headline counts and patient demographics.
pub struct OverviewComponent {
    db_path: PathBuf,
    stats: Option<Stats>,
    error: Option<String>,
}

impl OverviewComponent {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            stats: None,
            error: None,
        }
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn load(&self) -> Update<OverviewMsg> {
        let path = self.db_path.clone();
        Command::spawn(move |tx| {
            let msg = match db::fetch_stats(&path) {
                Ok(stats) => {
                    info!("Overview: loaded stats for {} patients", stats.patients);
                    OverviewMsg::Loaded(stats)
                }
                Err(e) => {
                    error!("Overview: load failed: {e:#}");
                    OverviewMsg::LoadFailed(format!("{e:#}"))
                }
            };
            let _ = tx.send(msg.into());
        })
        .into()
    }

    fn draw_metric(f: &mut Frame, area: Rect, title: &str, value: i64) {
        let block = Block::default().title(title).borders(Borders::ALL);
        let text = Paragraph::new(value.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(block);
        f.render_widget(text, area);
    }
}

impl Component for OverviewComponent {
    type Msg = OverviewMsg;

    fn update(&mut self, msg: Self::Msg) -> Update<Self::Msg> {
        match msg {
            OverviewMsg::Load => self.load(),
            OverviewMsg::Loaded(stats) => {
                self.stats = Some(stats);
                self.error = None;
                Update::none()
            }
            OverviewMsg::LoadFailed(e) => {
                self.error = Some(e);
                Update::none()
            }
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Update<Self::Msg> {
        use crossterm::event::KeyCode::*;
        match key.code {
            Char('r') => OverviewMsg::Load.into(),
            _ => Update::none(),
        }
    }

    fn draw(&self, f: &mut Frame, area: Rect, focused: bool) {
        if let Some(e) = &self.error {
            let block = Block::default()
                .title("Database Overview")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red));
            let text = Paragraph::new(format!("Error loading dashboard: {e}\n\nPress r to retry."))
                .wrap(Wrap { trim: false })
                .block(block);
            f.render_widget(text, area);
            return;
        }
        let Some(stats) = &self.stats else {
            let block = Block::default()
                .title("Database Overview")
                .borders(Borders::ALL)
                .border_style(border_style(focused));
            f.render_widget(Paragraph::new("Loading statistics...").block(block), area);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        let metrics = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[0]);
        Self::draw_metric(f, metrics[0], "Total Patients", stats.patients);
        Self::draw_metric(f, metrics[1], "Medical Records", stats.records);
        Self::draw_metric(f, metrics[2], "Prescriptions", stats.prescriptions);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        let genders = BarSeries::new("Gender Distribution", stats.genders.clone());
        let blood = BarSeries::new("Blood Type Distribution", stats.blood_types.clone());
        draw_bar_chart(f, charts[0], &genders, focused);
        draw_bar_chart(f, charts[1], &blood, focused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_is_kept_until_next_success() {
        let mut overview = OverviewComponent::new(PathBuf::from("x.db"));
        let _ = overview.update(OverviewMsg::LoadFailed("no such table: patients".into()));
        assert_eq!(overview.error(), Some("no such table: patients"));
        let _ = overview.update(OverviewMsg::Loaded(Stats::default()));
        assert!(overview.error().is_none());
        assert!(overview.stats().is_some());
    }

    #[test]
    fn load_schedules_background_work() {
        let mut overview = OverviewComponent::new(PathBuf::from("x.db"));
        let update = overview.update(OverviewMsg::Load);
        assert!(update.msg.is_none());
        assert!(matches!(update.cmd, Command::Spawn(_)));
    }
}
