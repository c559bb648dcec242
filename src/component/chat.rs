use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tracing::{info, warn};

use super::table::records_table;
use super::{border_style, draw_bar_chart, Component};
use crate::agent::{Answer, QueryAgent, EXAMPLE_QUERIES};
use crate::chart::BarSeries;
use crate::db::Records;
use crate::update::{Command, Update};

const GREETING: &str =
    "Hello! I'm your Medical Database Assistant. How can I help you analyze the medical records today?";
const CLEARED: &str =
    "Chat history cleared. How can I help you analyze the medical records today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
}

impl ChatEntry {
    fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

pub enum ChatMsg {
    Input(char),
    Backspace,
    Submit,
    NextExample,
    Clear,
    Answered(Answer),
    Failed(String),
}

pub struct ChatComponent {
    agent: Arc<dyn QueryAgent>,
    input: String,
    history: Vec<ChatEntry>,
    pending: bool,
    result: Option<Records>,
    chart: Option<BarSeries>,
    next_example: usize,
}

impl ChatComponent {
    pub fn new(agent: Arc<dyn QueryAgent>) -> Self {
        Self {
            agent,
            input: String::new(),
            history: vec![ChatEntry::assistant(GREETING)],
            pending: false,
            result: None,
            chart: None,
            next_example: 0,
        }
    }

    pub fn history(&self) -> &[ChatEntry] {
        &self.history
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn chart(&self) -> Option<&BarSeries> {
        self.chart.as_ref()
    }

    fn submit(&mut self) -> Update<ChatMsg> {
        let question = self.input.trim().to_string();
        if question.is_empty() || self.pending {
            return Update::none();
        }
        self.input.clear();
        self.history.push(ChatEntry {
            role: Role::User,
            content: question.clone(),
        });
        self.pending = true;

        let agent = Arc::clone(&self.agent);
        Command::spawn(move |tx| {
            info!("Chat: asking agent");
            let msg = match agent.answer(&question) {
                Ok(answer) => ChatMsg::Answered(answer),
                Err(e) => {
                    warn!("Chat: agent failed: {e:#}");
                    ChatMsg::Failed(format!("{e:#}"))
                }
            };
            let _ = tx.send(msg.into());
        })
        .into()
    }

    fn on_answer(&mut self, answer: Answer) {
        self.pending = false;
        let mut content = answer.text;
        if let Some(sql) = &answer.sql {
            content.push_str(&format!("\nSQL: {sql}"));
        }
        self.history.push(ChatEntry::assistant(content));
        // Charting is best effort; an unchartable result just has no chart.
        self.chart = answer.records.as_ref().and_then(BarSeries::from_records);
        self.result = answer.records;
    }

    fn history_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        for entry in &self.history {
            let (who, color) = match entry.role {
                Role::User => ("you", Color::Green),
                Role::Assistant => ("assistant", Color::Cyan),
            };
            lines.push(Line::from(Span::styled(
                format!("{who}:"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.extend(entry.content.lines().map(|l| Line::from(format!("  {l}"))));
            lines.push(Line::from(""));
        }
        if self.pending {
            lines.push(Line::from(Span::styled(
                "assistant is thinking...",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines
    }

    fn draw_result(&self, f: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title("Result")
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        let Some(recs) = &self.result else {
            let mut text = vec![Line::from("Example queries (Tab to insert):"), Line::from("")];
            text.extend(EXAMPLE_QUERIES.iter().map(|q| Line::from(format!("• {q}"))));
            let hint = Paragraph::new(text).wrap(Wrap { trim: false }).block(block);
            f.render_widget(hint, area);
            return;
        };
        match &self.chart {
            Some(chart) => {
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(area);
                f.render_widget(records_table(recs).block(block), parts[0]);
                draw_bar_chart(f, parts[1], chart, focused);
            }
            None => f.render_widget(records_table(recs).block(block), area),
        }
    }
}

impl Component for ChatComponent {
    type Msg = ChatMsg;

    fn update(&mut self, msg: Self::Msg) -> Update<Self::Msg> {
        match msg {
            ChatMsg::Input(c) => self.input.push(c),
            ChatMsg::Backspace => {
                self.input.pop();
            }
            ChatMsg::Submit => return self.submit(),
            ChatMsg::NextExample => {
                self.input = EXAMPLE_QUERIES[self.next_example % EXAMPLE_QUERIES.len()].to_string();
                self.next_example += 1;
            }
            ChatMsg::Clear => {
                self.history = vec![ChatEntry::assistant(CLEARED)];
                self.result = None;
                self.chart = None;
            }
            ChatMsg::Answered(answer) => self.on_answer(answer),
            ChatMsg::Failed(e) => {
                self.pending = false;
                self.history
                    .push(ChatEntry::assistant(format!("Sorry, I encountered an error: {e}")));
            }
        }
        Update::none()
    }

    fn handle_key(&self, key: KeyEvent) -> Update<Self::Msg> {
        use crossterm::event::KeyCode::*;
        match key.code {
            Enter => ChatMsg::Submit.into(),
            Backspace => ChatMsg::Backspace.into(),
            Tab => ChatMsg::NextExample.into(),
            Esc => ChatMsg::Clear.into(),
            Char(c) => ChatMsg::Input(c).into(),
            _ => Update::none(),
        }
    }

    fn draw(&self, f: &mut Frame, area: Rect, focused: bool) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[0]);

        let lines = self.history_lines();
        let visible = cols[0].height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible) as u16;
        let history = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(Block::default().title("Conversation").borders(Borders::ALL));
        f.render_widget(history, cols[0]);

        self.draw_result(f, cols[1], false);

        let input = Paragraph::new(format!("{}_", self.input)).block(
            Block::default()
                .title("Ask (Enter to send, Tab for an example, Esc to clear)")
                .borders(Borders::ALL)
                .border_style(border_style(focused)),
        );
        f.render_widget(input, rows[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};

    struct Canned;

    impl QueryAgent for Canned {
        fn answer(&self, question: &str) -> Result<Answer> {
            if question == "fail" {
                return Err(anyhow!("boom"));
            }
            Ok(Answer {
                text: "2 rows".into(),
                sql: Some(question.into()),
                records: Some(Records {
                    columns: vec!["gender".into(), "count".into()],
                    rows: vec![vec!["Male".into(), "3".into()], vec!["Female".into(), "2".into()]],
                }),
            })
        }
    }

    fn typed(chat: &mut ChatComponent, text: &str) {
        for c in text.chars() {
            let _ = chat.update(ChatMsg::Input(c));
        }
    }

    #[test]
    fn submit_records_question_and_spawns() {
        let mut chat = ChatComponent::new(Arc::new(Canned));
        typed(&mut chat, "SELECT 1");
        let update = chat.update(ChatMsg::Submit);
        assert!(matches!(update.cmd, Command::Spawn(_)));
        assert_eq!(chat.input(), "");
        assert_eq!(chat.history().last().map(|e| e.role), Some(Role::User));

        // a second submit while waiting is ignored
        typed(&mut chat, "SELECT 2");
        assert!(matches!(chat.update(ChatMsg::Submit).cmd, Command::None));
    }

    #[test]
    fn chartable_answer_produces_chart() {
        let mut chat = ChatComponent::new(Arc::new(Canned));
        let answer = Canned.answer("SELECT gender, COUNT(*) FROM patients GROUP BY gender").unwrap();
        let _ = chat.update(ChatMsg::Answered(answer));
        assert_eq!(chat.chart().map(|c| c.bars.len()), Some(2));
        assert!(chat.history().last().unwrap().content.contains("SQL: SELECT gender"));
    }

    #[test]
    fn failure_is_reported_in_history() {
        let mut chat = ChatComponent::new(Arc::new(Canned));
        let _ = chat.update(ChatMsg::Failed("boom".into()));
        assert_eq!(
            chat.history().last().unwrap().content,
            "Sorry, I encountered an error: boom"
        );
    }

    #[test]
    fn clear_resets_history() {
        let mut chat = ChatComponent::new(Arc::new(Canned));
        typed(&mut chat, "x");
        let _ = chat.update(ChatMsg::Submit);
        let _ = chat.update(ChatMsg::Clear);
        assert_eq!(chat.history(), &[ChatEntry::assistant(CLEARED)]);
    }

    #[test]
    fn examples_cycle() {
        let mut chat = ChatComponent::new(Arc::new(Canned));
        let _ = chat.update(ChatMsg::NextExample);
        assert_eq!(chat.input(), EXAMPLE_QUERIES[0]);
        let _ = chat.update(ChatMsg::NextExample);
        assert_eq!(chat.input(), EXAMPLE_QUERIES[1]);
    }
}
