use color_eyre::eyre::Result;
use crossterm::event::{KeyCode::Char, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};

use crate::{
    actions::{Action, ActionSender},
    component::style::StyleSheet,
    config::Config,
    page::{Page, form::FormSubmission},
    tui::{Event, TuiEnum},
};

/// State shared by every page and component.
pub struct RootState {
    pub should_quit: bool,
    action_tx: ActionSender,
    action_rx: UnboundedReceiver<Action>,
    input_mode: bool,

    pub config: Config,
    pub stylesheet: StyleSheet,
    pub submission: Option<FormSubmission>,
}

impl RootState {
    pub fn new(config: Config) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let stylesheet = StyleSheet::new(&config.styles);
        Self {
            should_quit: false,
            action_tx: action_tx.into(),
            action_rx,
            input_mode: false,
            config,
            stylesheet,
            submission: None,
        }
    }

    pub fn send_action<T: Into<Action>>(&self, action: T) {
        self.action_tx.send(action);
    }

    pub fn try_recv(&mut self) -> Option<Action> {
        self.action_rx.try_recv().ok()
    }

    /// Whether key strokes currently go to the focused input.
    pub fn input_mode(&self) -> bool {
        self.input_mode
    }

    /// Apply the application-wide part of an action.
    pub fn update(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SwitchInputMode(mode) => self.input_mode = *mode,
            Action::Submit(submission) => {
                info!(
                    form = %submission.title,
                    fields = submission.fields.len(),
                    "form submitted"
                );
                self.submission = Some(submission.clone());
                self.should_quit = true;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
impl RootState {
    pub(crate) fn flush_actions<P: Page + ?Sized>(&mut self, page: &mut P) {
        while let Some(action) = self.try_recv() {
            self.update(&action).unwrap();
            page.update(self, action).unwrap();
        }
    }

    pub(crate) fn handle_event_and_update<P: Page + ?Sized>(&mut self, page: &mut P, event: Event) {
        page.handle_events(self, &event).unwrap();
        self.flush_actions(page);
    }
}

pub struct App {
    page: Box<dyn Page>,
    state: RootState,
    tui: TuiEnum,
}

impl App {
    pub fn new(page: Box<dyn Page>, state: RootState, tui: TuiEnum) -> Self {
        Self { page, state, tui }
    }

    /// Run the event loop until the user quits or submits.
    ///
    /// Returns the submission, if the form was submitted.
    pub async fn run(&mut self) -> Result<Option<FormSubmission>> {
        self.tui.enter()?;
        self.page.init(&self.state)?;
        info!(
            page = %self.page.get_name(),
            data_dir = %self.state.config.config.data_dir.display(),
            "app started"
        );

        loop {
            let event = self.tui.next().await?;
            self.handle_event(event)?;

            while let Some(action) = self.state.try_recv() {
                self.perform_action(action)?;
            }

            if self.state.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        Ok(self.state.submission.take())
    }

    /// Handle application-wide events, and hand the rest to the page.
    fn handle_event(&self, event: Event) -> Result<()> {
        match &event {
            Event::Tick => self.state.send_action(Action::Tick),
            Event::Render | Event::Resize(_, _) => self.state.send_action(Action::Render),
            Event::Error => {
                warn!("terminal reported an error, quitting");
                self.state.send_action(Action::Quit)
            }
            Event::Init => {}
            Event::Key(key) if !self.state.input_mode() && key.code == Char('q') => {
                self.state.send_action(Action::Quit)
            }
            Event::Key(key)
                if key.code == Char('z') && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.state.send_action(Action::Suspend)
            }
            _ => self.page.handle_events(&self.state, &event)?,
        }
        Ok(())
    }

    /// The only place where the state of the application changes.
    fn perform_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Tick => {}
            Action::Render => self.tui.draw(|f| self.page.render(f, &self.state))?,
            Action::Suspend => {
                info!("suspending");
                self.tui.suspend()?;
                self.state.send_action(Action::Render);
            }
            action => {
                self.state.update(&action)?;
                self.page.update(&self.state, action)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crossterm::event::{KeyCode, KeyEvent};

    use super::*;
    use crate::{page::form::FormPage, tui::TestTui};

    fn get_app<I: IntoIterator<Item = Event>>(events: I) -> App {
        let config = Config::default();
        let page = FormPage::new(&config.form).unwrap();
        App::new(
            Box::new(page),
            RootState::new(config),
            TestTui::new(events).into(),
        )
    }

    fn chars(s: &str) -> Vec<Event> {
        s.chars().map(Event::from).collect()
    }

    #[tokio::test]
    async fn submit_form() {
        let mut events = vec![Event::Init, 'j'.into(), KeyCode::Enter.into()];
        events.extend(chars("q.org"));
        events.extend([KeyCode::Enter.into(), 's'.into()]);
        let mut app = get_app(events);

        let submission = app.run().await.unwrap().unwrap();
        assert_eq!(submission.fields[0].label, "Domain");
        assert_eq!(submission.fields[0].value, "q.org");
        assert_eq!(submission.fields[1].value, "");
    }

    #[tokio::test]
    async fn quit_without_submitting() {
        let mut app = get_app(['j'.into(), 'q'.into(), 's'.into()]);
        assert!(app.run().await.unwrap().is_none());
        assert!(app.state.should_quit);
    }

    #[tokio::test]
    async fn suspend_keeps_running() {
        let ctrl_z = Event::Key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL));
        let mut app = get_app([ctrl_z, 's'.into()]);
        assert!(app.run().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn renders_form() {
        let mut app = get_app([Event::Render, 'q'.into()]);
        app.run().await.unwrap();
        let text: String = app
            .tui
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Add mail provider"));
        assert!(text.contains("smtp.example.com"));
        assert!(text.contains("Move focus: j/k"));
    }
}
