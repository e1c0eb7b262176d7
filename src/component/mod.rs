pub(crate) mod input;
pub(crate) mod style;

use color_eyre::eyre::Result;
use ratatui::{Frame, layout::Rect};

use crate::{actions::Action, app::RootState, tui::Event};

/// A widget owned by a page, driven through the page's event loop.
///
/// Components never change their own state in `handle_events`: they send
/// actions, and apply them in `update`.
pub(crate) trait Component {
    fn handle_events(&self, event: &Event, app: &RootState) -> Result<()>;

    fn update(&mut self, action: &Action, app: &RootState) -> Result<()>;

    fn draw(&self, frame: &mut Frame, area: &Rect, app: &RootState);
}
