//! In-memory [`Engine`] for exercising the lifecycle without a daemon.

use std::cell::{Cell, RefCell};
use std::sync::mpsc;

use super::engine::Engine;
use super::stream::LogStream;
use super::types::{
    CancelToken, ContainerHandle, ContainerStatus, ContainerSummary, EngineError, LaunchConfig,
};

pub(crate) const FAKE_ID: &str = "fake0123456789";
pub(crate) const READY_LINE: &str = "Gene clusters are initialized for all 42 genomes";

pub(crate) struct FakeEngine {
    pub available: bool,
    pub containers: Vec<ContainerSummary>,
    pub fail_list: bool,
    pub fail_kill_of: Vec<String>,
    pub fail_pull: bool,
    pub fail_run: bool,
    /// Poll number (1-based) at which the ready line shows up. `None` means never.
    pub ready_on_poll: Option<usize>,
    /// Report the container as gone when logs are fetched.
    pub vanished: bool,
    pub attach_lines: Vec<String>,
    /// Cancel this token when logs are fetched, simulating Ctrl-C mid-wait.
    pub cancel_on_logs: Option<CancelToken>,
    /// Cancel this token inside `pull`, before it reports its result.
    pub cancel_on_pull: Option<CancelToken>,
    /// Cancel this token inside `kill`, simulating Ctrl-C during stale cleanup.
    pub cancel_on_kill: Option<CancelToken>,

    pub calls: RefCell<Vec<String>>,
    pub kills: RefCell<Vec<String>>,
    pub log_polls: Cell<usize>,
    pub launched: RefCell<Option<LaunchConfig>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            available: true,
            containers: Vec::new(),
            fail_list: false,
            fail_kill_of: Vec::new(),
            fail_pull: false,
            fail_run: false,
            ready_on_poll: Some(1),
            vanished: false,
            attach_lines: Vec::new(),
            cancel_on_logs: None,
            cancel_on_pull: None,
            cancel_on_kill: None,
            calls: RefCell::new(Vec::new()),
            kills: RefCell::new(Vec::new()),
            log_polls: Cell::new(0),
            launched: RefCell::new(None),
        }
    }

    pub fn running(id: &str, image: &str) -> ContainerSummary {
        ContainerSummary {
            id: id.into(),
            image: image.into(),
            names: vec![format!("name-{id}")],
            status: ContainerStatus::Running,
        }
    }

    pub fn stopped(id: &str, image: &str) -> ContainerSummary {
        ContainerSummary {
            status: ContainerStatus::Stopped,
            ..Self::running(id, image)
        }
    }

    pub fn called(&self, op: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == op)
    }

    pub fn kill_count(&self, id: &str) -> usize {
        self.kills.borrow().iter().filter(|k| *k == id).count()
    }

    fn record(&self, op: &str) {
        self.calls.borrow_mut().push(op.to_string());
    }
}

impl Engine for FakeEngine {
    fn ping(&self) -> Result<(), EngineError> {
        self.record("ping");
        if self.available {
            Ok(())
        } else {
            Err(EngineError::Unavailable("daemon down".into()))
        }
    }

    fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        self.record("list");
        if self.fail_list {
            return Err(EngineError::Failed {
                op: "ps",
                message: "listing failed".into(),
            });
        }
        Ok(self.containers.clone())
    }

    fn kill(&self, handle: &ContainerHandle) -> Result<(), EngineError> {
        self.record("kill");
        self.kills.borrow_mut().push(handle.id.clone());
        if let Some(token) = &self.cancel_on_kill {
            token.cancel();
        }
        if self.fail_kill_of.contains(&handle.id) {
            return Err(EngineError::Failed {
                op: "kill",
                message: "permission denied".into(),
            });
        }
        Ok(())
    }

    fn pull(&self, _image: &str) -> Result<(), EngineError> {
        self.record("pull");
        if let Some(token) = &self.cancel_on_pull {
            token.cancel();
        }
        if self.fail_pull {
            return Err(EngineError::Failed {
                op: "pull",
                message: "manifest unknown".into(),
            });
        }
        Ok(())
    }

    fn run(&self, launch: &LaunchConfig) -> Result<ContainerHandle, EngineError> {
        self.record("run");
        if self.fail_run {
            return Err(EngineError::Failed {
                op: "run",
                message: "port is already allocated".into(),
            });
        }
        *self.launched.borrow_mut() = Some(launch.clone());
        Ok(ContainerHandle::new(FAKE_ID))
    }

    fn logs(&self, handle: &ContainerHandle) -> Result<String, EngineError> {
        self.record("logs");
        let poll = self.log_polls.get() + 1;
        self.log_polls.set(poll);
        if let Some(token) = &self.cancel_on_logs {
            token.cancel();
        }
        if self.vanished {
            return Err(EngineError::NotFound(handle.id.clone()));
        }
        let mut text = String::from("Loading pan database...\n");
        if self.ready_on_poll.is_some_and(|n| poll >= n) {
            text.push_str(READY_LINE);
            text.push('\n');
        }
        Ok(text)
    }

    fn attach(
        &self,
        _handle: &ContainerHandle,
        cancel: CancelToken,
    ) -> Result<LogStream, EngineError> {
        self.record("attach");
        let (tx, rx) = mpsc::channel();
        for line in &self.attach_lines {
            let _ = tx.send(line.clone());
        }
        drop(tx);
        Ok(LogStream::from_receiver(rx, cancel))
    }
}
