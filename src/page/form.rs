use std::cell::RefCell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
};
use serde::Serialize;
use tracing::{debug, info};

use super::Page;
use crate::{
    actions::Action,
    app::RootState,
    component::{
        Component,
        input::{InputComp, InputMode},
    },
    config::FormConfig,
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
    watermark::{Watermark, WatermarkError},
};

/// Values of a submitted form; watermarked fields are reported empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormSubmission {
    pub title: String,
    pub fields: Vec<SubmittedField>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmittedField {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug)]
pub enum FormAction {
    /// Move focus to the input at this index, or to none
    Focus(Option<usize>),
    /// The terminal window gained (`true`) or lost focus
    TerminalFocus(bool),
}

impl From<FormAction> for Action {
    fn from(value: FormAction) -> Self {
        Action::Form(value)
    }
}

#[derive(Clone, Debug)]
pub struct FormPage {
    title: String,
    inputs: Vec<InputComp>,
    focused: Option<usize>,
    /// Where each input was last drawn, for mouse hit tests
    areas: RefCell<Vec<Rect>>,
}

fn unique_ids(n: usize) -> Vec<u64> {
    let mut ids = Vec::with_capacity(n);
    while ids.len() < n {
        let id = rand::random::<u64>();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

impl FormPage {
    /// Build the inputs and bind their watermarks.
    ///
    /// Fails if a watermark is configured on a field that cannot carry one.
    pub fn new(form: &FormConfig) -> Result<Self, WatermarkError> {
        let mut inputs = Vec::with_capacity(form.fields.len());
        for (field, id) in form.fields.iter().zip(unique_ids(form.fields.len())) {
            let mut input = InputComp::new(
                id,
                field.initial.as_deref(),
                field.label.as_str(),
                Default::default(),
            )
            .set_read_only(field.read_only)
            .set_disabled(field.disabled);
            if let Some(text) = &field.watermark {
                let watermark =
                    Watermark::new(text.as_str()).with_class(form.watermark_class.as_str());
                debug!(
                    field = %field.label,
                    text = watermark.text(),
                    class = watermark.class(),
                    "binding watermark"
                );
                input.bind_watermark(watermark)?;
            }
            inputs.push(input);
        }
        info!(title = %form.title, fields = inputs.len(), "form built");

        Ok(Self {
            title: form.title.clone(),
            inputs,
            focused: None,
            areas: RefCell::new(Vec::new()),
        })
    }

    /// The next input that can take focus, skipping disabled ones.
    fn next_focusable(&self, forward: bool, wrap: bool) -> Option<usize> {
        let n = self.inputs.len();
        let candidates: Box<dyn Iterator<Item = usize>> = match (self.focused, forward) {
            (None, true) => Box::new(0..n),
            (None, false) => Box::new((0..n).rev()),
            (Some(i), true) if wrap => Box::new((i + 1..n).chain(0..i)),
            (Some(i), true) => Box::new(i + 1..n),
            (Some(i), false) if wrap => Box::new((0..i).rev().chain((i + 1..n).rev())),
            (Some(i), false) => Box::new((0..i).rev()),
        };
        candidates
            .into_iter()
            .find(|&i| !self.inputs[i].is_disabled())
            .or(if wrap { self.focused } else { None })
    }

    /// The focusable input drawn at the given cell, if any.
    fn input_at(&self, column: u16, row: u16) -> Option<usize> {
        self.areas
            .borrow()
            .iter()
            .position(|area| area.contains(Position::new(column, row)))
            .filter(|&i| !self.inputs[i].is_disabled())
    }

    fn move_focus(&mut self, app: &RootState, target: Option<usize>) {
        if target == self.focused {
            return;
        }
        if let Some(old) = self.focused {
            app.send_action(self.inputs[old].get_switch_mode_action(InputMode::Idle));
        }
        if let Some(new) = target {
            app.send_action(self.inputs[new].get_switch_mode_action(InputMode::Focused));
        }
        self.focused = target;
    }

    pub fn submission(&self) -> FormSubmission {
        FormSubmission {
            title: self.title.clone(),
            fields: self
                .inputs
                .iter()
                .map(|input| SubmittedField {
                    label: input.title().to_string(),
                    value: input.content().to_string(),
                })
                .collect(),
        }
    }

    fn help_msg(&self, app: &RootState) -> HelpMsg {
        let focused_help = self
            .focused
            .map(|i| self.inputs[i].get_help_msg(app.input_mode()))
            .unwrap_or_default();
        if app.input_mode() {
            return focused_help;
        }
        let mut msg = HelpMsg::from(vec![
            HelpEntry::new_plain("j/k", "Move focus"),
            HelpEntry::new('s', "Submit"),
            HelpEntry::new('q', "Quit"),
        ]);
        msg.extend(&focused_help);
        msg
    }
}

impl Page for FormPage {
    fn render(&self, frame: &mut Frame, app: &RootState) {
        let area = frame.area();
        let block = Block::default()
            .title(self.title.as_str())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(3); self.inputs.len()];
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(3));
        let chunks = Layout::vertical(constraints).margin(1).split(inner);

        for (input, chunk) in self.inputs.iter().zip(chunks.iter()) {
            input.draw(frame, chunk, app);
        }
        *self.areas.borrow_mut() = chunks[..self.inputs.len()].to_vec();
        self.help_msg(app).render(frame, chunks[chunks.len() - 1]);
    }

    fn handle_events(&self, app: &RootState, event: &Event) -> Result<()> {
        match event {
            Event::FocusLost => app.send_action(FormAction::TerminalFocus(false)),
            Event::FocusGained => app.send_action(FormAction::TerminalFocus(true)),
            Event::Key(key) if !app.input_mode() => match key.code {
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                    app.send_action(FormAction::Focus(self.next_focusable(true, true)))
                }
                KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                    app.send_action(FormAction::Focus(self.next_focusable(false, true)))
                }
                KeyCode::Esc => app.send_action(FormAction::Focus(None)),
                KeyCode::Char('s') => app.send_action(Action::Submit(self.submission())),
                _ => {}
            },
            Event::Mouse(mouse)
                if !app.input_mode() && mouse.kind == MouseEventKind::Down(MouseButton::Left) =>
            {
                if let Some(i) = self.input_at(mouse.column, mouse.row) {
                    app.send_action(FormAction::Focus(Some(i)));
                }
            }
            _ => {}
        }
        for input in &self.inputs {
            input.handle_events(event, app)?;
        }
        Ok(())
    }

    fn update(&mut self, app: &RootState, action: Action) -> Result<()> {
        match &action {
            Action::Form(FormAction::Focus(target)) => self.move_focus(app, *target),
            Action::Form(FormAction::TerminalFocus(gained)) => {
                if let Some(i) = self.focused {
                    if !gained && app.input_mode() {
                        app.send_action(Action::SwitchInputMode(false));
                    }
                    let mode = if *gained {
                        InputMode::Focused
                    } else {
                        InputMode::Idle
                    };
                    app.send_action(self.inputs[i].get_switch_mode_action(mode));
                }
            }
            _ => {}
        }

        let mut committed = false;
        for input in self.inputs.iter_mut() {
            if let Some(value) = input.parse_submit_action(&action) {
                info!(field = input.title(), chars = value.chars().count(), "field committed");
                committed = true;
            }
            input.update(&action, app)?;
        }
        if committed {
            app.send_action(FormAction::Focus(self.next_focusable(true, false)));
        }
        Ok(())
    }

    fn get_name(&self) -> String {
        "Form".to_string()
    }
}
