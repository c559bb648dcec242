use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::{
    BrowserComponent, BrowserMsg, ChatComponent, ChatMsg, Component, OverviewComponent,
    OverviewMsg, TableListMsg,
};
use crate::agent::QueryAgent;
use crate::update::{Command, MapMsg, Update};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Tables,
    Chat,
}

impl Screen {
    const ALL: [Screen; 3] = [Screen::Overview, Screen::Tables, Screen::Chat];

    fn title(self) -> &'static str {
        match self {
            Screen::Overview => "Overview [F1]",
            Screen::Tables => "Tables [F2]",
            Screen::Chat => "Chat [F3]",
        }
    }

    fn help(self) -> &'static str {
        match self {
            Screen::Overview => "r refresh · q quit",
            Screen::Tables => "j/k move · / filter · Enter open · 1/2 tabs · n/p page · Esc back · q quit",
            Screen::Chat => "Enter send · Tab example · Esc clear · Ctrl-C quit",
        }
    }
}

pub enum RootMsg {
    Quit,
    Show(Screen),
    Overview(OverviewMsg),
    Browser(BrowserMsg),
    Chat(ChatMsg),
}

impl From<OverviewMsg> for RootMsg {
    fn from(msg: OverviewMsg) -> Self {
        RootMsg::Overview(msg)
    }
}
impl From<BrowserMsg> for RootMsg {
    fn from(msg: BrowserMsg) -> Self {
        RootMsg::Browser(msg)
    }
}
impl From<ChatMsg> for RootMsg {
    fn from(msg: ChatMsg) -> Self {
        RootMsg::Chat(msg)
    }
}

pub struct RootComponent {
    screen: Screen,
    db_path: PathBuf,
    overview: OverviewComponent,
    browser: BrowserComponent,
    chat: ChatComponent,
}

impl RootComponent {
    pub fn new(db_path: PathBuf, page_size: usize, agent: Arc<dyn QueryAgent>) -> Self {
        Self {
            screen: Screen::Overview,
            overview: OverviewComponent::new(db_path.clone()),
            browser: BrowserComponent::new(db_path.clone(), page_size),
            chat: ChatComponent::new(agent),
            db_path,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Initial loads for the overview and the table list.
    pub fn init(&mut self) -> Update<RootMsg> {
        let overview = self.overview.update(OverviewMsg::Load);
        let tables = self.browser.update(TableListMsg::Load.into());
        Command::batch([overview.cmd, tables.cmd]).into()
    }
}

impl Component for RootComponent {
    type Msg = RootMsg;

    fn update(&mut self, msg: Self::Msg) -> Update<Self::Msg> {
        match msg {
            RootMsg::Quit => RootMsg::Quit.into(),
            RootMsg::Show(screen) => {
                self.screen = screen;
                Update::none()
            }
            RootMsg::Overview(m) => self.overview.update(m).map_auto(),
            RootMsg::Browser(m) => self.browser.update(m).map_auto(),
            RootMsg::Chat(m) => self.chat.update(m).map_auto(),
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Update<Self::Msg> {
        match key.code {
            KeyCode::F(1) => return RootMsg::Show(Screen::Overview).into(),
            KeyCode::F(2) => return RootMsg::Show(Screen::Tables).into(),
            KeyCode::F(3) => return RootMsg::Show(Screen::Chat).into(),
            KeyCode::Char('q') if self.screen != Screen::Chat => return RootMsg::Quit.into(),
            _ => {}
        }
        match self.screen {
            Screen::Overview => self.overview.handle_key(key).map_auto(),
            Screen::Tables => self.browser.handle_key(key).map_auto(),
            Screen::Chat => self.chat.handle_key(key).map_auto(),
        }
    }

    fn draw(&self, f: &mut Frame, area: Rect, focused: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let selected = Screen::ALL.iter().position(|s| *s == self.screen).unwrap_or(0);
        let tabs = Tabs::new(Screen::ALL.iter().map(|s| s.title()).collect::<Vec<_>>())
            .block(
                Block::default()
                    .title(format!("MediChat · {}", self.db_path.display()))
                    .borders(Borders::ALL),
            )
            .select(selected)
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, chunks[0]);

        match self.screen {
            Screen::Overview => self.overview.draw(f, chunks[1], focused),
            Screen::Tables => self.browser.draw(f, chunks[1], focused),
            Screen::Chat => self.chat.draw(f, chunks[1], focused),
        }

        let help = Paragraph::new(self.screen.help()).style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[2]);
    }
}
