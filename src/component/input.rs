use std::collections::BTreeSet;

use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tracing::debug;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    actions::{Action, CompAction},
    app::RootState,
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
    utils::key_events::KeyEvent,
    watermark::{
        DEFAULT_CLASS, InvalidTargetReason, Watermark, WatermarkError, WatermarkState,
        WatermarkTarget,
    },
};

#[derive(Clone, Debug)]
/// A text input Component
///
/// Set the focus state: send a [`InputComp::get_switch_mode_action()`] Action.
/// Switching to [`InputMode::Focused`] and back are the focus-gained and
/// focus-lost notifications of the input, which drive its watermark.
///
/// Get value: parse an action with [`InputComp::parse_submit_action`], or read
/// [`InputComp::content`].
pub(crate) struct InputComp {
    id: u64,
    input: Input,
    mode: InputMode,

    title: String,
    classes: BTreeSet<String>,
    watermark: Option<Watermark>,

    read_only: bool,
    disabled: bool,
    control_keys: InputCompCtrlKeys,
}

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputMode {
    #[default]
    Idle,
    Focused,
}

#[derive(Clone, Debug)]
pub(crate) struct InputCompCtrlKeys {
    enter_keys: Vec<KeyEvent>,
    submit_keys: Vec<KeyEvent>,
    exit_keys: Vec<KeyEvent>,
}

impl Default for InputCompCtrlKeys {
    fn default() -> Self {
        Self {
            enter_keys: vec![KeyCode::Enter.into()],
            submit_keys: vec![KeyCode::Enter.into()],
            exit_keys: vec![KeyCode::Esc.into()],
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum InputAction {
    SwitchMode(InputMode),
    HandleKey(KeyEvent),
    HandlePaste(String),
    Exit(),
    DirectExit(),
    SubmitExit(String),

    /// the event owner should pay attention to
    Submit(String),
}

impl InputComp {
    pub fn new<T: Into<String>, K: Into<String>>(
        id: u64,
        from: Option<T>,
        title: K,
        ctrl_keys: InputCompCtrlKeys,
    ) -> Self {
        Self {
            id,
            input: if let Some(from) = from {
                Input::new(from.into())
            } else {
                Input::default()
            },
            mode: InputMode::default(),
            title: title.into(),
            classes: BTreeSet::new(),
            watermark: None,
            read_only: false,
            disabled: false,
            control_keys: ctrl_keys,
        }
    }

    /// A read-only input can be focused but never edited.
    pub fn set_read_only(self, b: bool) -> Self {
        Self {
            read_only: b,
            ..self
        }
    }

    /// A disabled input never takes focus.
    pub fn set_disabled(self, b: bool) -> Self {
        Self {
            disabled: b,
            ..self
        }
    }

    pub fn bind_watermark(&mut self, watermark: Watermark) -> Result<(), WatermarkError> {
        if watermark.class() == DEFAULT_CLASS {
            crate::watermark::bind(self, watermark.text())
        } else {
            watermark.bind(self)
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// True while the input shows its watermark instead of real content.
    pub fn is_watermarked(&self) -> bool {
        self.watermark
            .as_ref()
            .is_some_and(|watermark| watermark.state(self) == WatermarkState::Watermarked)
    }

    /// The real content of the input; empty while the watermark shows.
    pub fn content(&self) -> &str {
        if self.is_watermarked() {
            ""
        } else {
            self.input.value()
        }
    }

    pub fn get_switch_mode_action(&self, mode: InputMode) -> Action {
        Action::Comp((CompAction::Input(InputAction::SwitchMode(mode)), self.id))
    }

    pub fn parse_submit_action(&self, action: &Action) -> Option<String> {
        match self.unwrap_action(action)? {
            InputAction::Submit(s) => Some(s),
            _ => None,
        }
    }

    fn get_action(&self, action: InputAction) -> Action {
        Action::Comp((CompAction::Input(action), self.id))
    }

    fn unwrap_action(&self, action: &Action) -> Option<InputAction> {
        match action {
            Action::Comp((CompAction::Input(action), id)) if *id == self.id => Some(action.clone()),
            _ => None,
        }
    }

    fn switch_mode(&mut self, mode: InputMode) {
        if self.disabled && mode == InputMode::Focused {
            debug!(field = %self.title, "disabled input refused focus");
            return;
        }
        let previous = std::mem::replace(&mut self.mode, mode.clone());
        let Some(watermark) = self.watermark.clone() else {
            return;
        };
        match (previous, mode) {
            (InputMode::Idle, InputMode::Focused) => {
                watermark.focus_gained(self);
            }
            (InputMode::Focused, InputMode::Idle) => {
                watermark.focus_lost(self);
            }
            _ => {}
        }
    }

    pub fn get_help_msg(&self, inputing: bool) -> HelpMsg {
        let mut msg = HelpMsg::default();
        if self.mode != InputMode::Focused || self.read_only {
            return msg;
        }
        if inputing {
            msg.push(HelpEntry::new(
                self.control_keys.exit_keys[0].clone(),
                "quit input",
            ));
            msg.push(HelpEntry::new(
                self.control_keys.submit_keys[0].clone(),
                "submit input",
            ));
        } else {
            msg.push(HelpEntry::new(
                self.control_keys.enter_keys[0].clone(),
                "Start input",
            ));
        }
        msg
    }
}

impl WatermarkTarget for InputComp {
    fn field_name(&self) -> &str {
        &self.title
    }

    fn value(&self) -> &str {
        self.input.value()
    }

    fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn bindable(&self) -> Result<(), InvalidTargetReason> {
        if self.read_only {
            Err(InvalidTargetReason::ReadOnly)
        } else if self.disabled {
            Err(InvalidTargetReason::NotFocusable)
        } else if self.watermark.is_some() {
            Err(InvalidTargetReason::AlreadyBound)
        } else {
            Ok(())
        }
    }

    fn attach_watermark(&mut self, watermark: Watermark) {
        self.watermark = Some(watermark);
    }
}

impl super::Component for InputComp {
    fn handle_events(&self, event: &Event, app: &RootState) -> Result<()> {
        if self.mode != InputMode::Focused || self.read_only {
            return Ok(());
        }
        if app.input_mode() {
            match event {
                Event::Key(key) => {
                    if self.control_keys.submit_keys.contains(&(*key).into()) {
                        app.send_action(self.get_action(InputAction::SubmitExit(
                            self.input.value().to_string(),
                        )))
                    } else if self.control_keys.exit_keys.contains(&(*key).into()) {
                        app.send_action(self.get_action(InputAction::DirectExit()))
                    } else {
                        app.send_action(self.get_action(InputAction::HandleKey((*key).into())))
                    }
                }
                Event::Paste(s) => {
                    app.send_action(self.get_action(InputAction::HandlePaste(s.clone())))
                }
                _ => (),
            }
        } else if let Event::Key(key) = event {
            if self.control_keys.enter_keys.contains(&(*key).into()) {
                app.send_action(Action::SwitchInputMode(true))
            }
        }
        Ok(())
    }

    fn update(&mut self, action: &Action, app: &RootState) -> Result<()> {
        let Some(action) = self.unwrap_action(action) else {
            return Ok(());
        };

        match action {
            InputAction::SwitchMode(input_mode) => {
                self.switch_mode(input_mode);
            }
            InputAction::HandleKey(key_event) => {
                self.input
                    .handle_event(&crossterm::event::Event::Key(key_event.into()));
            }
            InputAction::HandlePaste(string) => {
                string.chars().for_each(|c| {
                    self.input.handle(tui_input::InputRequest::InsertChar(c));
                });
            }
            InputAction::SubmitExit(string) => {
                app.send_action(self.get_action(InputAction::Submit(string)));
                app.send_action(self.get_action(InputAction::Exit()));
            }
            InputAction::DirectExit() => {
                self.input.reset();
                app.send_action(self.get_action(InputAction::Exit()));
            }
            InputAction::Exit() => {
                app.send_action(Action::SwitchInputMode(false));
            }
            InputAction::Submit(_) => (),
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame, area: &Rect, app: &RootState) {
        let width = area.width.max(3) - 3;
        let scroll = self.input.visual_scroll(width as usize);
        let typing = self.mode == InputMode::Focused && app.input_mode() && !self.read_only;

        let mut style = app.stylesheet.resolve(&self.classes);
        if self.disabled {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.mode == InputMode::Focused {
            style = style.patch(if typing { Color::Yellow } else { Color::Cyan });
        }

        let input_widget = Paragraph::new(self.input.value())
            .style(style)
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(self.title.as_str()),
            );
        frame.render_widget(input_widget, *area);

        if typing {
            // Ratatui hides the cursor unless it's explicitly set. Position the  cursor past the
            // end of the input text and one line down from the border to the input line
            let x = self.input.visual_cursor().max(scroll) - scroll + 1;
            frame.set_cursor_position((area.x + x as u16, area.y + 1))
        }
    }
}

#[cfg(test)]
impl InputComp {
    pub fn get_mode(&self) -> InputMode {
        self.mode.clone()
    }
    pub fn get_value(&self) -> &str {
        self.input.value()
    }
}

#[cfg(test)]
pub mod test {
    use ratatui::{Terminal, backend::TestBackend};

    use crate::{
        app::RootState,
        component::Component,
        config::Config,
        page::Page,
        utils::key_events::test_utils::{get_char_evt, get_key_evt},
        watermark::DEFAULT_CLASS,
    };

    use super::*;

    const WATERMARK: &str = "type here";

    struct TestInputPage {
        content: String,
        input: InputComp,
    }

    impl TestInputPage {
        fn new(watermark: bool) -> Self {
            let mut input = InputComp::new(1, None::<&str>, "Input Test", Default::default());
            if watermark {
                input.bind_watermark(Watermark::new(WATERMARK)).unwrap();
            }
            Self {
                content: Default::default(),
                input,
            }
        }
    }

    #[derive(Debug, Clone)]
    pub(crate) enum TestInputPageAction {
        SetFocus(bool),
    }

    impl Page for TestInputPage {
        fn render(&self, frame: &mut Frame, app: &RootState) {
            self.input.draw(frame, &frame.area(), app);
        }

        fn handle_events(&self, app: &RootState, event: &Event) -> Result<()> {
            if !app.input_mode() {
                if let Event::Key(key) = event {
                    match key.code {
                        KeyCode::Enter => {
                            app.send_action(Action::TestPage(TestInputPageAction::SetFocus(true)));
                        }
                        KeyCode::Esc => {
                            app.send_action(Action::TestPage(TestInputPageAction::SetFocus(false)));
                        }
                        _ => {}
                    }
                }
            };
            self.input.handle_events(event, app)?;
            Ok(())
        }

        fn update(&mut self, app: &RootState, action: Action) -> Result<()> {
            if let Action::TestPage(TestInputPageAction::SetFocus(focus)) = &action {
                app.send_action(self.input.get_switch_mode_action(if *focus {
                    InputMode::Focused
                } else {
                    InputMode::Idle
                }));
            };
            if let Some(text) = self.input.parse_submit_action(&action) {
                self.content = text;
            };
            self.input.update(&action, app)
        }

        fn get_name(&self) -> String {
            "Test Input Page".into()
        }
    }

    fn get_test_page(watermark: bool) -> (TestInputPage, RootState) {
        let mut app = RootState::new(Config::default());
        let mut page = TestInputPage::new(watermark);
        page.init(&app).unwrap();
        app.flush_actions(&mut page);
        (page, app)
    }

    fn run<P: Page>(app: &mut RootState, page: &mut P, events: &[Event]) {
        events
            .iter()
            .for_each(|e| app.handle_event_and_update(page, e.clone()));
    }

    #[test]
    fn test_input() {
        let (mut page, mut app) = get_test_page(false);

        run(
            &mut app,
            &mut page,
            &[
                get_key_evt(KeyCode::Enter),
                get_key_evt(KeyCode::Enter),
                get_char_evt('a'),
                get_char_evt('b'),
                get_key_evt(KeyCode::Enter),
            ],
        );
        assert_eq!(page.content, "ab");

        run(
            &mut app,
            &mut page,
            &[
                get_key_evt(KeyCode::Enter),
                get_key_evt(KeyCode::Left),
                get_char_evt('c'),
                get_key_evt(KeyCode::Enter),
            ],
        );
        assert_eq!(page.content, "acb")
    }

    #[test]
    fn test_input_paste() {
        let (mut page, mut app) = get_test_page(true);

        run(
            &mut app,
            &mut page,
            &[
                get_key_evt(KeyCode::Enter),
                get_key_evt(KeyCode::Enter),
                Event::Paste("ccc".into()),
                get_key_evt(KeyCode::Left),
                get_char_evt('a'),
                get_key_evt(KeyCode::Enter),
            ],
        );
        assert_eq!(page.content, "ccac");
        assert!(!page.input.is_watermarked());
    }

    #[test]
    fn test_input_quit() {
        let (mut page, mut app) = get_test_page(false);

        run(
            &mut app,
            &mut page,
            &[
                get_key_evt(KeyCode::Enter),
                get_key_evt(KeyCode::Enter),
                get_char_evt('a'),
                get_char_evt('b'),
                get_key_evt(KeyCode::Esc),
            ],
        );
        assert_eq!(page.content, "");
        assert_eq!(page.input.get_value(), "");
        assert!(!app.input_mode());
    }

    #[test]
    fn test_watermark_follows_focus() {
        let (mut page, mut app) = get_test_page(true);
        assert_eq!(page.input.get_value(), WATERMARK);
        assert!(page.input.has_class(DEFAULT_CLASS));
        assert!(page.input.is_watermarked());
        assert_eq!(page.input.content(), "");

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        assert_eq!(page.input.get_mode(), InputMode::Focused);
        assert_eq!(page.input.get_value(), "");
        assert!(!page.input.has_class(DEFAULT_CLASS));

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Esc));
        assert_eq!(page.input.get_mode(), InputMode::Idle);
        assert_eq!(page.input.get_value(), WATERMARK);
        assert!(page.input.is_watermarked());
    }

    #[test]
    fn test_watermark_keeps_content() {
        let (mut page, mut app) = get_test_page(true);

        run(
            &mut app,
            &mut page,
            &[
                get_key_evt(KeyCode::Enter),
                get_key_evt(KeyCode::Enter),
                get_char_evt('h'),
                get_char_evt('i'),
                get_key_evt(KeyCode::Enter),
                get_key_evt(KeyCode::Esc),
            ],
        );
        assert_eq!(page.input.get_value(), "hi");
        assert_eq!(page.input.content(), "hi");
        assert!(!page.input.has_class(DEFAULT_CLASS));

        // focusing again keeps the content
        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        assert_eq!(page.input.get_value(), "hi");
    }

    #[test]
    fn test_watermark_back_after_discard() {
        let (mut page, mut app) = get_test_page(true);

        run(
            &mut app,
            &mut page,
            &[
                get_key_evt(KeyCode::Enter),
                get_key_evt(KeyCode::Enter),
                get_char_evt('x'),
                get_key_evt(KeyCode::Esc),
                get_key_evt(KeyCode::Esc),
            ],
        );
        assert_eq!(page.input.get_value(), WATERMARK);
        assert!(page.input.is_watermarked());
    }

    #[test]
    fn test_repeated_switch_fires_once() {
        let (mut page, mut app) = get_test_page(true);
        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        page.input.set_value(WATERMARK);
        // already focused, so no second focus-gained
        app.send_action(page.input.get_switch_mode_action(InputMode::Focused));
        app.flush_actions(&mut page);
        assert_eq!(page.input.get_value(), WATERMARK);
        assert!(!page.input.is_watermarked());
    }

    #[test]
    fn test_bind_rejections() {
        let mut read_only =
            InputComp::new(2, Some("fixed"), "Server", Default::default()).set_read_only(true);
        assert!(matches!(
            read_only.bind_watermark(Watermark::new(WATERMARK)),
            Err(WatermarkError::InvalidTarget {
                reason: InvalidTargetReason::ReadOnly,
                ..
            })
        ));
        assert_eq!(read_only.get_value(), "fixed");

        let mut disabled =
            InputComp::new(3, None::<&str>, "Port", Default::default()).set_disabled(true);
        assert!(matches!(
            disabled.bind_watermark(Watermark::new(WATERMARK)),
            Err(WatermarkError::InvalidTarget {
                reason: InvalidTargetReason::NotFocusable,
                ..
            })
        ));

        let mut twice = InputComp::new(4, None::<&str>, "Twice", Default::default());
        twice.bind_watermark(Watermark::new(WATERMARK)).unwrap();
        assert!(twice.bind_watermark(Watermark::new("again")).is_err());
        assert_eq!(twice.get_value(), WATERMARK);
    }

    fn get_buffer_color(t: &Terminal<TestBackend>) -> Color {
        let cell = t
            .backend()
            .buffer()
            .content()
            .iter()
            .find(|&c| c.symbol() == "I")
            .unwrap();

        cell.fg
    }

    #[test]
    fn test_render() {
        let (mut page, mut app) = get_test_page(false);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| page.render(frame, &app)).unwrap();
        assert_eq!(get_buffer_color(&terminal), Color::Reset);

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        terminal.draw(|f| page.render(f, &app)).unwrap();
        assert_eq!(get_buffer_color(&terminal), Color::Cyan);

        run(
            &mut app,
            &mut page,
            &[
                get_key_evt(KeyCode::Enter),
                get_char_evt('a'),
                get_char_evt('b'),
            ],
        );
        terminal.draw(|f| page.render(f, &app)).unwrap();
        assert_eq!(get_buffer_color(&terminal), Color::Yellow);

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        terminal.draw(|f| page.render(f, &app)).unwrap();
        assert_eq!(get_buffer_color(&terminal), Color::Cyan);

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Esc));
        terminal.draw(|f| page.render(f, &app)).unwrap();
        assert_eq!(get_buffer_color(&terminal), Color::Reset);
    }

    #[test]
    fn test_render_watermark() {
        let (mut page, mut app) = get_test_page(true);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| page.render(frame, &app)).unwrap();
        assert_eq!(get_buffer_color(&terminal), Color::DarkGray);
        let text_cell = &terminal.backend().buffer()[(1, 1)];
        assert_eq!(text_cell.symbol(), "t");
        assert!(text_cell.modifier.contains(Modifier::ITALIC));

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        terminal.draw(|f| page.render(f, &app)).unwrap();
        assert_eq!(get_buffer_color(&terminal), Color::Cyan);
        assert_eq!(terminal.backend().buffer()[(1, 1)].symbol(), " ");

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Esc));
        terminal.draw(|f| page.render(f, &app)).unwrap();
        assert_eq!(get_buffer_color(&terminal), Color::DarkGray);
    }

    #[test]
    fn test_help_msg() {
        let (mut page, mut app) = get_test_page(true);
        fn get_help_msg(page: &TestInputPage, input: bool) -> String {
            page.input.get_help_msg(input).to_string()
        }
        assert_eq!(get_help_msg(&page, false), "");
        assert_eq!(get_help_msg(&page, true), "");
        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        assert_eq!(get_help_msg(&page, false), "Start input: enter");
        assert_eq!(
            get_help_msg(&page, true),
            "quit input: esc | submit input: enter"
        );
    }

    #[test]
    fn test_custom_watermark_class() {
        let mut input = InputComp::new(5, None::<&str>, "Custom", Default::default());
        input
            .bind_watermark(Watermark::new(WATERMARK).with_class("dimmed"))
            .unwrap();
        assert!(input.has_class("dimmed"));
        assert!(!input.has_class(DEFAULT_CLASS));
        assert!(input.is_watermarked());

        input.switch_mode(InputMode::Focused);
        assert_eq!(input.get_value(), "");
        assert!(!input.has_class("dimmed"));
        input.switch_mode(InputMode::Idle);
        assert_eq!(input.get_value(), WATERMARK);
        assert!(input.has_class("dimmed"));
    }
}
