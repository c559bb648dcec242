use std::sync::mpsc::Sender;

use crate::app::AppMsg;
use crate::component::{BrowserMsg, ChatMsg, OverviewMsg, RootMsg, TableListMsg, TableMsg};

pub enum Command {
    None,
    Batch(Vec<Command>),
    Spawn(Box<dyn FnOnce(Sender<AppMsg>) + Send>), // runs on a worker thread and posts AppMsg
}

impl Command {
    pub fn batch(cmds: impl IntoIterator<Item = Command>) -> Self {
        let v = cmds
            .into_iter()
            .filter(|c| !matches!(c, Command::None))
            .collect::<Vec<_>>();
        if v.is_empty() {
            Command::None
        } else {
            Command::Batch(v)
        }
    }
    pub fn spawn(task: impl FnOnce(Sender<AppMsg>) + Send + 'static) -> Self {
        Command::Spawn(Box::new(task))
    }
}

pub struct Update<T> {
    pub msg: Option<T>,
    pub cmd: Command,
}

impl<T> Update<T> {
    pub fn none() -> Self {
        Self {
            msg: None,
            cmd: Command::None,
        }
    }
    pub fn cmd(cmd: Command) -> Self {
        Self { msg: None, cmd }
    }
    pub fn msg(msg: T) -> Self {
        Self {
            msg: Some(msg),
            cmd: Command::None,
        }
    }
}

impl<M> From<Command> for Update<M> {
    fn from(cmd: Command) -> Self {
        Update::cmd(cmd)
    }
}

// Message-specific From implementations to allow `msg.into()` ergonomics
impl From<OverviewMsg> for Update<OverviewMsg> {
    fn from(msg: OverviewMsg) -> Self {
        Update::msg(msg)
    }
}
impl From<TableListMsg> for Update<TableListMsg> {
    fn from(msg: TableListMsg) -> Self {
        Update::msg(msg)
    }
}
impl From<TableMsg> for Update<TableMsg> {
    fn from(msg: TableMsg) -> Self {
        Update::msg(msg)
    }
}
impl From<BrowserMsg> for Update<BrowserMsg> {
    fn from(msg: BrowserMsg) -> Self {
        Update::msg(msg)
    }
}
impl From<ChatMsg> for Update<ChatMsg> {
    fn from(msg: ChatMsg) -> Self {
        Update::msg(msg)
    }
}
impl From<RootMsg> for Update<RootMsg> {
    fn from(msg: RootMsg) -> Self {
        Update::msg(msg)
    }
}

pub trait MapMsg<M> {
    fn map_auto<ParentMsg>(self) -> Update<ParentMsg>
    where
        ParentMsg: From<M>;
}

impl<M> MapMsg<M> for Update<M> {
    fn map_auto<ParentMsg>(self) -> Update<ParentMsg>
    where
        ParentMsg: From<M>,
    {
        Update {
            msg: self.msg.map(ParentMsg::from),
            cmd: self.cmd,
        }
    }
}
