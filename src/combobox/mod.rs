//! # Searchable Select
//!
//! A single-select combobox modelled as an explicit state machine.
//!
//! The widget is controlled: the host owns `value` and the option list, and
//! the widget only reports the value the user picked. Everything the widget
//! owns itself (open/closed, the filter query, the highlighted row, where
//! the panel sits) lives in [`Machine`], and every input event is folded
//! into it synchronously by [`transition`], a pure function. Rendering is a
//! read of the current state: [`Combobox::input_text`],
//! [`Combobox::panel`], [`Combobox::panel_position`].
//!
//! ```text
//!            focus / click / Enter / ArrowDown / typing
//!   Closed ─────────────────────────────────────────────▶ Open
//!     ▲                                                    │
//!     └──── Escape / pointer-down outside / selection ─────┘
//! ```

pub mod position;

use crate::model::{find_option, OptionValue, SelectOption};
pub use position::{Anchor, PanelPosition, ScrollOffset};

/// Keys the combobox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Discrete input events delivered by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ComboEvent {
    Focus,
    /// Click on the control itself.
    Click,
    KeyDown(Key),
    /// The text box content changed.
    Input(String),
    /// A pointer went down somewhere outside the control and its panel.
    PointerDownOutside,
    /// The pointer moved over the panel row at this index of the filtered
    /// list.
    HoverOption(usize),
    /// The panel row at this index of the filtered list was pressed.
    PressOption(usize),
    /// The control moved on screen (layout change or an ancestor scrolled).
    Reposition { anchor: Anchor, scroll: ScrollOffset },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComboState {
    #[default]
    Closed,
    Open,
}

/// The widget-owned part of the state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Machine {
    pub state: ComboState,
    pub query: String,
    /// Index into the filtered list. Meaningless while closed.
    pub highlighted: usize,
    pub anchor: Option<(Anchor, ScrollOffset)>,
}

/// What a transition asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Commit the filtered row at this index.
    Commit(usize),
}

/// Facts about the current props that transitions depend on.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub disabled: bool,
    /// Length of the filtered list for the machine's current query.
    pub filtered_len: usize,
}

fn open(mut m: Machine) -> Machine {
    m.state = ComboState::Open;
    m.query.clear();
    m.highlighted = 0;
    m
}

fn close(mut m: Machine) -> Machine {
    m.state = ComboState::Closed;
    m.query.clear();
    m.highlighted = 0;
    m
}

/// Fold one event into the machine.
///
/// `ctx.filtered_len` is evaluated against `m.query` before the event; an
/// `Input` event resets the highlight, so it never needs the new length.
pub fn transition(m: Machine, event: &ComboEvent, ctx: Context) -> (Machine, Effect) {
    use ComboState::{Closed, Open};

    match (m.state, event) {
        (_, ComboEvent::Reposition { anchor, scroll }) => {
            let mut m = m;
            m.anchor = Some((*anchor, *scroll));
            (m, Effect::None)
        }

        (Closed, ComboEvent::Focus | ComboEvent::Click)
        | (Closed, ComboEvent::KeyDown(Key::Enter | Key::ArrowDown)) => {
            if ctx.disabled {
                (m, Effect::None)
            } else {
                (open(m), Effect::None)
            }
        }
        (_, ComboEvent::Input(text)) => {
            if ctx.disabled {
                return (m, Effect::None);
            }
            let mut m = m;
            m.state = Open;
            m.query = text.clone();
            m.highlighted = 0;
            (m, Effect::None)
        }
        (Closed, _) => (m, Effect::None),

        (Open, ComboEvent::Focus | ComboEvent::Click) => (m, Effect::None),

        (Open, ComboEvent::KeyDown(Key::ArrowDown)) => {
            let mut m = m;
            let last = ctx.filtered_len.saturating_sub(1);
            m.highlighted = (m.highlighted + 1).min(last);
            (m, Effect::None)
        }
        (Open, ComboEvent::KeyDown(Key::ArrowUp)) => {
            let mut m = m;
            m.highlighted = m.highlighted.saturating_sub(1);
            (m, Effect::None)
        }
        (Open, ComboEvent::KeyDown(Key::Enter)) => {
            if m.highlighted < ctx.filtered_len {
                let index = m.highlighted;
                (close(m), Effect::Commit(index))
            } else {
                (m, Effect::None)
            }
        }
        (Open, ComboEvent::KeyDown(Key::Escape)) | (Open, ComboEvent::PointerDownOutside) => {
            (close(m), Effect::None)
        }

        (Open, ComboEvent::HoverOption(index)) => {
            let mut m = m;
            if *index < ctx.filtered_len {
                m.highlighted = *index;
            }
            (m, Effect::None)
        }
        (Open, ComboEvent::PressOption(index)) => {
            if *index < ctx.filtered_len {
                (close(m), Effect::Commit(*index))
            } else {
                (m, Effect::None)
            }
        }
    }
}

/// Options whose label or subtitle contains `query`, case-insensitively,
/// in their original order. A blank query matches everything.
pub fn filter_options<'a>(options: &'a [SelectOption], query: &str) -> Vec<&'a SelectOption> {
    if query.trim().is_empty() {
        return options.iter().collect();
    }
    let needle = query.to_lowercase();
    options
        .iter()
        .filter(|o| {
            o.label.to_lowercase().contains(&needle)
                || o
                    .subtitle
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Host-supplied props.
#[derive(Debug, Clone)]
pub struct ComboboxProps {
    pub options: Vec<SelectOption>,
    pub value: Option<OptionValue>,
    pub placeholder: String,
    pub disabled: bool,
    pub label: Option<String>,
    pub required: bool,
}

impl Default for ComboboxProps {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            value: None,
            placeholder: "Search or select...".to_string(),
            disabled: false,
            label: None,
            required: false,
        }
    }
}

/// One row of the open panel.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRow<'a> {
    pub option: &'a SelectOption,
    pub highlighted: bool,
    /// This row is the committed value.
    pub selected: bool,
}

/// What the open panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<'a> {
    Options(Vec<OptionRow<'a>>),
    /// Nothing matched; carries the query for the "No results for" row.
    NoResults(String),
}

impl Panel<'_> {
    /// Text of the placeholder row, if this is one.
    pub fn no_results_message(&self) -> Option<String> {
        match self {
            Panel::NoResults(query) => Some(format!("No results for \u{201C}{}\u{201D}", query)),
            Panel::Options(_) => None,
        }
    }
}

/// A searchable single-select control.
#[derive(Debug, Clone, Default)]
pub struct Combobox {
    props: ComboboxProps,
    machine: Machine,
}

impl Combobox {
    pub fn new(props: ComboboxProps) -> Self {
        Self {
            props,
            machine: Machine::default(),
        }
    }

    pub fn with_options(options: Vec<SelectOption>) -> Self {
        Self::new(ComboboxProps {
            options,
            ..ComboboxProps::default()
        })
    }

    pub fn props(&self) -> &ComboboxProps {
        &self.props
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn state(&self) -> ComboState {
        self.machine.state
    }

    pub fn is_open(&self) -> bool {
        self.machine.state == ComboState::Open
    }

    pub fn query(&self) -> &str {
        &self.machine.query
    }

    pub fn highlighted(&self) -> usize {
        self.machine.highlighted
    }

    /// The host committed a new value (or cleared it).
    pub fn set_value(&mut self, value: Option<OptionValue>) {
        self.props.value = value;
    }

    /// The host replaced the option list. A query that filtered the old
    /// list may now yield fewer rows, so the highlight is clamped.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.props.options = options;
        let len = self.filtered().len();
        self.machine.highlighted = self.machine.highlighted.min(len.saturating_sub(1));
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.props.disabled = disabled;
        if disabled {
            self.machine = close(std::mem::take(&mut self.machine));
        }
    }

    /// Options matching the current query.
    pub fn filtered(&self) -> Vec<&SelectOption> {
        filter_options(&self.props.options, &self.machine.query)
    }

    /// Handle one event. Returns the value to report through `onChange`,
    /// if the event committed a selection. The widget's own `value` is not
    /// touched; the host calls [`Combobox::set_value`].
    #[must_use = "a committed value must be forwarded to the host"]
    pub fn handle(&mut self, event: ComboEvent) -> Option<OptionValue> {
        let ctx = Context {
            disabled: self.props.disabled,
            filtered_len: self.filtered().len(),
        };
        let committed = match transition(self.machine.clone(), &event, ctx) {
            (next, Effect::Commit(index)) => {
                let value = self.filtered().get(index).map(|o| o.value.clone());
                self.machine = next;
                value
            }
            (next, Effect::None) => {
                self.machine = next;
                None
            }
        };
        if let Some(ref value) = committed {
            tracing::debug!(%value, "combobox selection committed");
        }
        committed
    }

    /// The option matching the current value, if any.
    pub fn selected(&self) -> Option<&SelectOption> {
        self.props
            .value
            .as_ref()
            .and_then(|v| find_option(&self.props.options, v))
    }

    /// Text shown in the input box: the live query while open, otherwise
    /// the selected label (empty for no or stale selection).
    pub fn input_text(&self) -> String {
        if self.is_open() {
            self.machine.query.clone()
        } else {
            self.selected()
                .map(|o| o.label.clone())
                .unwrap_or_default()
        }
    }

    /// Placeholder shown when the input text is empty.
    pub fn placeholder_text(&self) -> &str {
        if self.is_open() {
            "Type to filter..."
        } else if self.selected().is_some() {
            ""
        } else {
            &self.props.placeholder
        }
    }

    /// The label line above the control, with a required marker.
    pub fn label_text(&self) -> Option<String> {
        self.props.label.as_ref().map(|label| {
            if self.props.required {
                format!("{} *", label)
            } else {
                label.clone()
            }
        })
    }

    /// Panel contents, or `None` while closed.
    pub fn panel(&self) -> Option<Panel<'_>> {
        if !self.is_open() {
            return None;
        }
        let filtered = self.filtered();
        if filtered.is_empty() {
            return Some(Panel::NoResults(self.machine.query.clone()));
        }
        let value = self.props.value.as_ref();
        let rows = filtered
            .into_iter()
            .enumerate()
            .map(|(i, option)| OptionRow {
                option,
                highlighted: i == self.machine.highlighted,
                selected: value.is_some_and(|v| option.value.loosely_equals(v)),
            })
            .collect();
        Some(Panel::Options(rows))
    }

    /// Where to draw the panel, or `None` while closed or before the host
    /// reported the control's position.
    pub fn panel_position(&self) -> Option<PanelPosition> {
        if !self.is_open() {
            return None;
        }
        self.machine
            .anchor
            .map(|(anchor, scroll)| PanelPosition::below(anchor, scroll))
    }
}
