use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{BarChart, Block, Borders, Paragraph},
    Frame,
};

use crate::chart::BarSeries;
use crate::update::Update;

mod browser;
mod chat;
mod overview;
mod root;
mod table;
mod tablelist;

pub use browser::{BrowserComponent, BrowserFocus, BrowserMsg};
pub use chat::{ChatComponent, ChatEntry, ChatMsg, Role};
pub use overview::{OverviewComponent, OverviewMsg};
pub use root::{RootComponent, RootMsg, Screen};
pub use table::{TableComponent, TableFocus, TableMsg};
pub use tablelist::{TableListComponent, TableListMsg};

pub trait Component {
    type Msg;

    /// Pure update (no IO). Return bubbled message (optional) + Command.
    fn update(&mut self, msg: Self::Msg) -> Update<Self::Msg>;

    /// Translate a key press into a message; state changes happen in `update`.
    fn handle_key(&self, key: KeyEvent) -> Update<Self::Msg>;

    /// Draw is side-effectful but only touches the frame.
    fn draw(&self, f: &mut Frame, area: Rect, focused: bool);
}

pub(crate) fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

pub(crate) fn draw_bar_chart(f: &mut Frame, area: Rect, series: &BarSeries, focused: bool) {
    let block = Block::default()
        .title(series.title.as_str())
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    if series.bars.is_empty() {
        f.render_widget(Paragraph::new("(no data)").block(block), area);
        return;
    }
    let data: Vec<(&str, u64)> = series.bars.iter().map(|(l, v)| (l.as_str(), *v)).collect();
    let inner_width = area.width.saturating_sub(2) as usize;
    let bar_width = (inner_width / data.len().max(1)).saturating_sub(1).clamp(3, 12) as u16;
    let chart = BarChart::default()
        .block(block)
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(chart, area);
}
