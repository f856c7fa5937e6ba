//! Radio-style toggle: a titled group of mutually exclusive options that
//! reports selection changes through an injected callback.
//!
//! ```
//! use std::sync::mpsc;
//! use meatstack_rs::models::StackMode;
//! use meatstack_rs::toggle::{stack_options, RadioToggleGroup};
//!
//! let (tx, rx) = mpsc::channel();
//! let mut group = RadioToggleGroup::new(
//!     "Choose stacking",
//!     "stack-option",
//!     stack_options(),
//!     StackMode::Stacked,
//!     move |mode: &StackMode| {
//!         let _ = tx.send(*mode);
//!     },
//! );
//! assert!(group.select(StackMode::Percentage));
//! assert_eq!(rx.try_recv().unwrap(), StackMode::Percentage);
//! ```

use std::fmt::{self, Display, Write};

use crate::models::StackMode;
use crate::viz::util::xml_escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOption<T> {
    pub value: T,
    pub text: String,
}

pub struct RadioToggleGroup<T> {
    title: String,
    name: String,
    options: Vec<ToggleOption<T>>,
    selected: T,
    on_change: Box<dyn FnMut(&T)>,
}

impl<T: fmt::Debug> fmt::Debug for RadioToggleGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadioToggleGroup")
            .field("title", &self.title)
            .field("name", &self.name)
            .field("options", &self.options)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + Display> RadioToggleGroup<T> {
    pub fn new(
        title: &str,
        name: &str,
        options: Vec<ToggleOption<T>>,
        selected: T,
        on_change: impl FnMut(&T) + 'static,
    ) -> Self {
        Self {
            title: title.to_string(),
            name: name.to_string(),
            options,
            selected,
            on_change: Box::new(on_change),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[ToggleOption<T>] {
        &self.options
    }

    pub fn selected(&self) -> &T {
        &self.selected
    }

    /// Pick `value`. Fires the callback and returns `true` only when the
    /// value is a known option different from the current one.
    pub fn select(&mut self, value: T) -> bool {
        if value == self.selected || !self.options.iter().any(|o| o.value == value) {
            return false;
        }
        self.selected = value;
        (self.on_change)(&self.selected);
        true
    }

    /// DOM id of the `i`-th radio input.
    pub fn input_id(&self, i: usize) -> String {
        format!("{}-{}", self.name, i + 1)
    }

    /// Title label followed by a button group of radio inputs and labels.
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, r#"<div class="label">{}</div>"#, xml_escape(&self.title));
        out.push_str("<div class=\"btn-group\">\n");
        for (i, opt) in self.options.iter().enumerate() {
            let id = self.input_id(i);
            let checked = if opt.value == self.selected {
                r#" checked="checked""#
            } else {
                ""
            };
            let _ = writeln!(
                out,
                r#"  <input type="radio" class="btn-check" name="{}" id="{id}" value="{}"{checked}>"#,
                xml_escape(&self.name),
                xml_escape(&opt.value.to_string()),
            );
            let _ = writeln!(
                out,
                r#"  <label class="btn" for="{id}">{}</label>"#,
                xml_escape(&opt.text)
            );
        }
        out.push_str("</div>\n");
        out
    }
}

/// The three stacking choices, in button order.
pub fn stack_options() -> Vec<ToggleOption<StackMode>> {
    StackMode::ALL
        .iter()
        .map(|m| ToggleOption {
            value: *m,
            text: m.title().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn group(log: Rc<RefCell<Vec<StackMode>>>) -> RadioToggleGroup<StackMode> {
        RadioToggleGroup::new(
            "Choose stacking",
            "stack-option",
            stack_options(),
            StackMode::Stacked,
            move |m: &StackMode| log.borrow_mut().push(*m),
        )
    }

    #[test]
    fn same_value_does_not_fire() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut g = group(log.clone());
        assert!(!g.select(StackMode::Stacked));
        assert!(g.select(StackMode::Separated));
        assert!(g.select(StackMode::Stacked));
        assert_eq!(*log.borrow(), vec![StackMode::Separated, StackMode::Stacked]);
    }

    #[test]
    fn html_marks_selected_option() {
        let g = group(Rc::new(RefCell::new(Vec::new())));
        let html = g.render_html();
        assert!(html.contains(r#"<div class="label">Choose stacking</div>"#));
        assert!(html.contains(r#"id="stack-option-1" value="stacked" checked="checked""#));
        assert!(html.contains(r#"id="stack-option-3" value="percentage">"#));
        assert!(html.contains(r#"<label class="btn" for="stack-option-2">Separated</label>"#));
        assert_eq!(html.matches("checked=").count(), 1);
    }

    #[test]
    fn unknown_option_is_ignored() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut g = RadioToggleGroup::new(
            "t",
            "n",
            vec![ToggleOption { value: 1, text: "one".into() }, ToggleOption { value: 2, text: "two".into() }],
            1,
            move |v: &i32| log.borrow_mut().push(*v),
        );
        assert!(!g.select(7));
        assert_eq!(*g.selected(), 1);
    }

    #[test]
    fn select_is_true_exactly_when_a_message_is_sent() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut g = RadioToggleGroup::new("t", "n", stack_options(), StackMode::Stacked, move |m: &StackMode| {
            let _ = tx.send(*m);
        });
        for (mode, changed) in [
            (StackMode::Percentage, true),
            (StackMode::Percentage, false),
            (StackMode::Separated, true),
        ] {
            assert_eq!(g.select(mode), changed);
            assert_eq!(rx.try_recv().ok(), changed.then_some(mode));
        }
    }
}
