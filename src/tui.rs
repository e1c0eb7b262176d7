//! # 终端用户界面模块
//!
//! 该模块提供基于终端的用户界面功能，使用 [ratatui](https://ratatui.rs/)
//! 和 [crossterm](https://crates.io/crates/crossterm) 库构建表单界面。
//!
//! ## 主要功能
//!
//! - **事件处理**: 键盘、鼠标、粘贴以及终端焦点变化的统一处理
//! - **异步架构**: 后台 tokio 任务读取 crossterm 事件，并按设定频率插入 `Tick` 与 `Render`
//! - **挂起与恢复**: `Ctrl-Z` 时离开备用屏幕并发送 SIGTSTP，继续运行后重新进入
//! - **测试支持**: `TestTui` 按脚本回放事件，脚本耗尽后返回 [`Event::Error`]
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   TuiEnum       │───▶│  Event Channel  │
//! │ (统一接口)       │    │  (mpsc 通道)     │
//! └─────────────────┘    └─────────────────┘
//!          │
//!          ├──────────────────────┐
//!          ▼                      ▼
//! ┌─────────────────┐    ┌─────────────────┐
//! │   Crossterm     │    │   TestBackend   │
//! │ (生产环境)       │    │  (测试环境)      │
//! └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## 事件类型
//!
//! - **键盘事件**: 只转发按下 (`Press`) 的按键
//! - **鼠标事件**: 表单用左键点击切换焦点
//! - **焦点事件**: 终端窗口失去焦点时，表单会让当前输入框失焦，使水印重新出现
//! - **应用事件**: `Init`、`Tick`、`Render`
//!
//! ## 使用示例
//!
//! ```rust
//! use crate::tui::{Event, Tui};
//!
//! let mut tui = Tui::new()?.paste(true).focus(true);
//! tui.enter()?;
//!
//! loop {
//!     match tui.next().await? {
//!         Event::FocusLost => {
//!             // 让当前输入框失焦
//!         }
//!         Event::Render => {
//!             // 渲染界面
//!         }
//!         _ => {}
//!     }
//! }
//!
//! tui.exit()?;
//! ```

use std::{
    io::{Stderr, stderr},
    ops::{Deref, DerefMut},
    time::Duration,
};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use futures::{FutureExt, StreamExt};
use ratatui::{
    Frame,
    backend::{CrosstermBackend, TestBackend},
    crossterm::{
        cursor,
        event::{
            DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
            EnableFocusChange, EnableMouseCapture, Event as CrosstermEvent, KeyEvent,
            KeyEventKind, MouseEvent,
        },
        terminal::{EnterAlternateScreen, LeaveAlternateScreen},
    },
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub enum Event {
    Init,
    /// Reading from the terminal failed
    Error,
    Tick,
    Render,
    /// The terminal window gained focus
    FocusGained,
    /// The terminal window lost focus
    FocusLost,
    Paste(String),
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl From<KeyCode> for Event {
    fn from(value: KeyCode) -> Self {
        Event::Key(KeyEvent::new(value, KeyModifiers::NONE))
    }
}
impl From<char> for Event {
    fn from(value: char) -> Self {
        Event::Key(KeyEvent::new(KeyCode::Char(value), KeyModifiers::NONE))
    }
}

/// 终端的统一接口
///
/// - `Crossterm`: 真实终端，事件来自后台任务
/// - `Test`: 内存终端，事件来自测试脚本，`enter`/`exit`/`suspend` 均为空操作
pub enum TuiEnum {
    Crossterm(Tui),
    #[allow(dead_code)]
    Test(TestTui),
}

impl From<Tui> for TuiEnum {
    fn from(tui: Tui) -> Self {
        TuiEnum::Crossterm(tui)
    }
}
impl From<TestTui> for TuiEnum {
    fn from(tui: TestTui) -> Self {
        TuiEnum::Test(tui)
    }
}
impl TuiEnum {
    pub fn enter(&mut self) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.enter(),
            TuiEnum::Test(_) => Ok(()),
        }
    }

    pub fn exit(&mut self) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.exit(),
            TuiEnum::Test(_) => Ok(()),
        }
    }

    /// Suspend the process; returns once it has been continued.
    pub fn suspend(&mut self) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => {
                tui.suspend()?;
                tui.resume()
            }
            TuiEnum::Test(_) => Ok(()),
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        match self {
            TuiEnum::Crossterm(tui) => tui.next().await,
            TuiEnum::Test(tui) => Ok(tui.events.pop_front().unwrap_or(Event::Error)),
        }
    }

    pub fn draw(&mut self, f: impl FnOnce(&mut Frame)) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.draw(f).map(|_| ()).map_err(Into::into),
            TuiEnum::Test(tui) => tui.draw(f).map(|_| ()).map_err(Into::into),
        }
    }
}

pub struct Tui {
    pub terminal: ratatui::Terminal<CrosstermBackend<Stderr>>,
    pub task: JoinHandle<()>,
    pub cancellation_token: CancellationToken,
    pub event_rx: UnboundedReceiver<Event>,
    pub event_tx: UnboundedSender<Event>,
    pub frame_rate: f64,
    pub tick_rate: f64,
    pub mouse: bool,
    pub paste: bool,
    /// Report terminal focus changes
    pub focus: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let tick_rate = 4.0;
        let frame_rate = 60.0;
        let terminal = ratatui::Terminal::new(CrosstermBackend::new(stderr()))?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancellation_token = CancellationToken::new();
        let task = tokio::spawn(async {});
        Ok(Self {
            terminal,
            task,
            cancellation_token,
            event_rx,
            event_tx,
            frame_rate,
            tick_rate,
            mouse: false,
            paste: false,
            focus: false,
        })
    }

    pub fn tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }

    pub fn paste(mut self, paste: bool) -> Self {
        self.paste = paste;
        self
    }

    pub fn focus(mut self, focus: bool) -> Self {
        self.focus = focus;
        self
    }

    /// Spawn the task forwarding terminal events, ticks and render requests.
    pub fn start(&mut self) {
        let tick_delay = std::time::Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = std::time::Duration::from_secs_f64(1.0 / self.frame_rate);
        self.cancel();
        self.cancellation_token = CancellationToken::new();
        let cancellation_token = self.cancellation_token.clone();
        let event_tx = self.event_tx.clone();
        self.task = tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            if event_tx.send(Event::Init).is_err() {
                return;
            }
            loop {
                let tick_delay = tick_interval.tick();
                let render_delay = render_interval.tick();
                let crossterm_event = reader.next().fuse();
                let event = tokio::select! {
                  _ = cancellation_token.cancelled() => {
                    break;
                  }
                  maybe_event = crossterm_event => {
                    match maybe_event {
                      Some(Ok(CrosstermEvent::Key(key))) => {
                        if key.kind != KeyEventKind::Press {
                          continue;
                        }
                        Event::Key(key)
                      },
                      Some(Ok(CrosstermEvent::Mouse(mouse))) => Event::Mouse(mouse),
                      Some(Ok(CrosstermEvent::Resize(x, y))) => Event::Resize(x, y),
                      Some(Ok(CrosstermEvent::FocusLost)) => Event::FocusLost,
                      Some(Ok(CrosstermEvent::FocusGained)) => Event::FocusGained,
                      Some(Ok(CrosstermEvent::Paste(s))) => Event::Paste(s),
                      Some(Err(_)) => Event::Error,
                      None => continue,
                    }
                  },
                  _ = tick_delay => Event::Tick,
                  _ = render_delay => Event::Render,
                };
                if event_tx.send(event).is_err() {
                    // receiver dropped, app is gone
                    break;
                }
            }
        });
    }

    /// Cancel the event task and wait (bounded) for it to finish.
    pub fn stop(&self) -> Result<()> {
        self.cancel();
        let mut counter = 0;
        while !self.task.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
            counter += 1;
            if counter > 50 {
                self.task.abort();
            }
            if counter > 100 {
                tracing::error!("Failed to abort task in 100 milliseconds for unknown reason");
                break;
            }
        }
        Ok(())
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnterAlternateScreen, cursor::Hide)?;
        if self.mouse {
            crossterm::execute!(std::io::stderr(), EnableMouseCapture)?;
        }
        if self.paste {
            crossterm::execute!(std::io::stderr(), EnableBracketedPaste)?;
        }
        if self.focus {
            crossterm::execute!(std::io::stderr(), EnableFocusChange)?;
        }
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop()?;
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            if self.focus {
                crossterm::execute!(std::io::stderr(), DisableFocusChange)?;
            }
            if self.paste {
                crossterm::execute!(std::io::stderr(), DisableBracketedPaste)?;
            }
            if self.mouse {
                crossterm::execute!(std::io::stderr(), DisableMouseCapture)?;
            }
            crossterm::execute!(std::io::stderr(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    /// Leave the terminal and stop the process (SIGTSTP, unix only).
    pub fn suspend(&mut self) -> Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::signal::SIGTSTP)?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.enter()?;
        Ok(())
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.event_rx
            .recv()
            .await
            .ok_or(color_eyre::eyre::eyre!("Unable to get event"))
    }
}

/// Put the terminal back into its normal state without a [`Tui`] at hand.
///
/// Used from the panic hook, where the event task may not be reachable.
pub fn restore() -> Result<()> {
    if crossterm::terminal::is_raw_mode_enabled()? {
        crossterm::execute!(
            std::io::stderr(),
            DisableFocusChange,
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            cursor::Show
        )?;
        crossterm::terminal::disable_raw_mode()?;
    }
    Ok(())
}

impl Deref for Tui {
    type Target = ratatui::Terminal<CrosstermBackend<Stderr>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            tracing::error!("Unable to restore terminal: {:?}", e);
        }
    }
}

/// In-memory terminal that replays a scripted list of events.
///
/// Once the script is exhausted it yields [`Event::Error`], which quits the app.
pub struct TestTui {
    pub terminal: ratatui::Terminal<TestBackend>,
    pub events: std::collections::VecDeque<Event>,
}

impl TestTui {
    #[cfg(test)]
    pub fn new<I: IntoIterator<Item = Event>>(events: I) -> Self {
        let terminal = ratatui::Terminal::new(TestBackend::new(80, 25)).unwrap();
        Self {
            terminal,
            events: events.into_iter().collect(),
        }
    }
}

impl Deref for TestTui {
    type Target = ratatui::Terminal<TestBackend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TestTui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

#[cfg(test)]
impl TuiEnum {
    pub fn backend(&self) -> &TestBackend {
        match self {
            TuiEnum::Crossterm(_) => panic!("Not a test backend"),
            TuiEnum::Test(tui) => tui.backend(),
        }
    }
}
