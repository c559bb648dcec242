use anyhow::Result;
use crossterm::event::KeyModifiers;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::Backend;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::Sender;
use std::time::Duration;
use tracing::info;

use crate::component::{
    BrowserMsg, ChatMsg, Component, OverviewMsg, RootComponent, RootMsg, TableListMsg, TableMsg,
};
use crate::terminal::Terminal;
use crate::update::{Command, MapMsg, Update};

pub enum AppMsg {
    Quit,
    Root(RootMsg),
}

impl From<RootMsg> for AppMsg {
    fn from(msg: RootMsg) -> Self {
        match msg {
            RootMsg::Quit => AppMsg::Quit,
            m => AppMsg::Root(m),
        }
    }
}

// Convenience: allow worker threads to post lower-level messages directly
impl From<OverviewMsg> for AppMsg {
    fn from(msg: OverviewMsg) -> Self {
        AppMsg::from(RootMsg::from(msg))
    }
}
impl From<BrowserMsg> for AppMsg {
    fn from(msg: BrowserMsg) -> Self {
        AppMsg::from(RootMsg::from(msg))
    }
}
impl From<TableListMsg> for AppMsg {
    fn from(msg: TableListMsg) -> Self {
        AppMsg::from(BrowserMsg::from(msg))
    }
}
impl From<TableMsg> for AppMsg {
    fn from(msg: TableMsg) -> Self {
        AppMsg::from(BrowserMsg::from(msg))
    }
}
impl From<ChatMsg> for AppMsg {
    fn from(msg: ChatMsg) -> Self {
        AppMsg::from(RootMsg::from(msg))
    }
}

pub struct App<B: Backend> {
    term: Terminal<B>,
    root: RootComponent,
    rx: Receiver<AppMsg>,
    tx: Sender<AppMsg>,
    should_quit: bool,
}

impl<B: Backend> App<B> {
    pub fn new(term: Terminal<B>, root: RootComponent) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        Self {
            term,
            root,
            rx,
            tx,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let init = self.root.init().map_auto();
        self.handle_update(init);
        while !self.should_quit {
            self.handle_async_messages();
            self.draw()?;
            self.handle_event()?;
        }
        info!("app: exiting");
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let root = &self.root;
        self.term.draw(|f| {
            let area = f.size();
            root.draw(f, area, true);
        })?;
        Ok(())
    }

    fn handle_event(&mut self) -> Result<()> {
        if !event::poll(Duration::from_millis(250))? {
            return Ok(());
        }

        let Event::Key(key) = event::read()? else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        let update = self.root.handle_key(key).map_auto();
        self.handle_update(update);

        Ok(())
    }

    fn handle_update(&mut self, update: Update<AppMsg>) {
        if let Some(msg) = update.msg {
            let u = self.handle_msg(msg);
            self.handle_update(u);
        }
        self.run_command(update.cmd);
    }

    fn handle_msg(&mut self, msg: AppMsg) -> Update<AppMsg> {
        match msg {
            AppMsg::Quit => {
                self.should_quit = true;
                Update::none()
            }
            AppMsg::Root(m) => self.root.update(m).map_auto(),
        }
    }

    fn handle_async_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_update(Update::msg(msg));
        }
    }

    fn run_command(&mut self, cmd: Command) {
        match cmd {
            Command::None => {}
            Command::Batch(list) => {
                for c in list {
                    self.run_command(c)
                }
            }
            Command::Spawn(task) => {
                let tx = self.tx.clone();
                std::thread::spawn(move || {
                    task(tx);
                });
            }
        }
    }
}

pub fn run_app<B: Backend>(terminal: Terminal<B>, root: RootComponent) -> Result<()> {
    let mut app = App::new(terminal, root);
    app.run()
}
