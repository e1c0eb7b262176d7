//! Pages own the components on screen and route events and actions to them.

use color_eyre::eyre::Result;
use ratatui::Frame;

use crate::{actions::Action, app::RootState, tui::Event};

pub(crate) mod form;

/// A full-screen page.
///
/// `handle_events` turns events into actions sent through [`RootState`];
/// `update` is the only place where the page changes its state.
pub(crate) trait Page {
    fn render(&self, frame: &mut Frame, app: &RootState);

    fn handle_events(&self, app: &RootState, event: &Event) -> Result<()>;

    fn update(&mut self, app: &RootState, action: Action) -> Result<()>;

    fn get_name(&self) -> String;

    fn init(&mut self, _app: &RootState) -> Result<()> {
        Ok(())
    }
}
