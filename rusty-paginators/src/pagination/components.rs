//! Navigation buttons and their state derivation.

use std::collections::BTreeMap;

use twilight_model::channel::message::{
    EmojiReactionType,
    component::{ActionRow, Button, ButtonStyle, Component},
};

use crate::error::PaginatorError;

use super::page::Navigation;
use super::token::{PaginatorAction, build_custom_id};

/// Discord's limit of buttons in one action row.
pub const MAX_BUTTONS_PER_ROW: usize = 5;

/// The built-in paginator buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ButtonKey {
    First,
    Left,
    PageIndicator,
    Right,
    Last,
    Stop,
}

impl ButtonKey {
    pub const ALL: [Self; 6] = [
        Self::First,
        Self::Left,
        Self::PageIndicator,
        Self::Right,
        Self::Last,
        Self::Stop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::First => "FIRST",
            Self::Left => "LEFT",
            Self::PageIndicator => "PAGE_INDICATOR",
            Self::Right => "RIGHT",
            Self::Last => "LAST",
            Self::Stop => "STOP",
        }
    }

    fn default_button(self) -> PaginatorButton {
        let (label, position) = match self {
            Self::First => ("First", 0),
            Self::Left => ("Left", 1),
            Self::PageIndicator => ("Page N/A / N/A", 2),
            Self::Right => ("Right", 3),
            Self::Last => ("Last", 4),
            Self::Stop => ("Stop", 5),
        };

        let button = PaginatorButton::new(label).position(position);
        if self == Self::Stop {
            button.style(ButtonStyle::Danger)
        } else {
            button
        }
    }

    fn action(self, combine_switcher: bool) -> PaginatorAction {
        match self {
            Self::First => PaginatorAction::First,
            Self::Left => PaginatorAction::Previous,
            Self::PageIndicator if combine_switcher => PaginatorAction::OpenSwitcher,
            Self::PageIndicator => PaginatorAction::Jump,
            Self::Right => PaginatorAction::Next,
            Self::Last => PaginatorAction::Last,
            Self::Stop => PaginatorAction::Stop,
        }
    }
}

/// Appearance of one paginator button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorButton {
    pub label: Option<String>,
    pub emoji: Option<EmojiReactionType>,
    pub style: ButtonStyle,
    pub disabled: bool,
    pub position: Option<usize>,
    /// Only used by custom buttons; routed to `PaginatorHooks::on_custom_button`.
    pub custom_id: Option<String>,
}

impl PaginatorButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            emoji: None,
            style: ButtonStyle::Secondary,
            disabled: false,
            position: None,
            custom_id: None,
        }
    }

    pub fn emoji(mut self, emoji: EmojiReactionType) -> Self {
        self.emoji = Some(emoji);
        self
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    fn render(&self, custom_id: String, label: Option<String>, style: ButtonStyle, disabled: bool) -> Component {
        Component::Button(Button {
            id: None,
            custom_id: Some(custom_id),
            disabled,
            emoji: self.emoji.clone(),
            label,
            style,
            url: None,
            sku_id: None,
        })
    }
}

/// Ordering applied to the merged default and custom buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortButtonsOn {
    Position,
    Label,
    CustomId,
}

/// Configured buttons for a button or hybrid paginator.
#[derive(Debug, Clone)]
pub struct ButtonSet {
    buttons: BTreeMap<ButtonKey, Option<PaginatorButton>>,
    custom_buttons: Vec<PaginatorButton>,
    style_if_clickable: Option<ButtonStyle>,
    sort_on: Option<SortButtonsOn>,
    always_show_stop: bool,
    combine_switcher: bool,
}

impl Default for ButtonSet {
    fn default() -> Self {
        Self {
            buttons: ButtonKey::ALL
                .into_iter()
                .map(|key| (key, Some(key.default_button())))
                .collect(),
            custom_buttons: Vec::new(),
            style_if_clickable: Some(ButtonStyle::Success),
            sort_on: None,
            always_show_stop: false,
            combine_switcher: false,
        }
    }
}

struct Rendered {
    position: Option<usize>,
    label: Option<String>,
    custom_id: String,
    component: Component,
}

impl ButtonSet {
    /// Replace a default button; `None` removes it.
    pub fn customize(mut self, key: ButtonKey, button: Option<PaginatorButton>) -> Self {
        self.buttons.insert(key, button);
        self
    }

    pub fn style_if_clickable(mut self, style: Option<ButtonStyle>) -> Self {
        self.style_if_clickable = style;
        self
    }

    pub fn sort_buttons(mut self, sort_on: SortButtonsOn) -> Self {
        self.sort_on = Some(sort_on);
        self
    }

    pub fn always_show_stop_button(mut self, enabled: bool) -> Self {
        self.always_show_stop = enabled;
        self
    }

    pub fn combine_switcher_and_stop_button(mut self, enabled: bool) -> Self {
        self.combine_switcher = enabled;
        self
    }

    pub fn add_custom_button(&mut self, button: PaginatorButton) {
        self.custom_buttons.push(button);
    }

    /// Remove custom buttons by id, returning how many were removed.
    pub fn remove_custom_buttons(&mut self, custom_ids: &[&str]) -> usize {
        let before = self.custom_buttons.len();
        self.custom_buttons.retain(|button| {
            button
                .custom_id
                .as_deref()
                .is_none_or(|id| !custom_ids.contains(&id))
        });
        before - self.custom_buttons.len()
    }

    pub fn clear_custom_buttons(&mut self) {
        self.custom_buttons.clear();
    }

    pub fn custom_buttons(&self) -> &[PaginatorButton] {
        &self.custom_buttons
    }

    pub fn get(&self, key: ButtonKey) -> Option<&PaginatorButton> {
        self.buttons.get(&key).and_then(Option::as_ref)
    }

    pub fn combines_switcher(&self) -> bool {
        self.combine_switcher
    }

    pub fn validate(&self) -> Result<(), PaginatorError> {
        if self.always_show_stop && self.get(ButtonKey::Stop).is_none() {
            return Err(PaginatorError::RequiredButtonMissing {
                button: ButtonKey::Stop.name(),
                feature: "always_show_stop_button",
            });
        }

        if self.combine_switcher {
            for key in [ButtonKey::Stop, ButtonKey::PageIndicator] {
                if self.get(key).is_none() {
                    return Err(PaginatorError::RequiredButtonMissing {
                        button: key.name(),
                        feature: "combine_switcher_and_stop_button",
                    });
                }
            }
        }

        Ok(())
    }

    /// Derive the button rows for the current navigation state.
    ///
    /// `all_disabled` renders every button disabled, used after a stop.
    pub fn derive(&self, session: u64, nav: &Navigation, all_disabled: bool) -> Vec<Component> {
        let max_pages = nav.max_pages();

        if max_pages <= 1 {
            let Some(stop) = self.get(ButtonKey::Stop).filter(|_| self.always_show_stop) else {
                return Vec::new();
            };
            let custom_id = build_custom_id(session, &PaginatorAction::Stop);
            let stop = stop.render(custom_id, stop.label.clone(), stop.style, all_disabled);
            return into_rows(vec![stop]);
        }

        let mut rendered = Vec::new();
        for (key, button) in &self.buttons {
            let Some(button) = button else {
                continue;
            };
            if let Some(entry) = self.derive_default(*key, button, session, nav, all_disabled) {
                rendered.push(entry);
            }
        }

        for (index, button) in self.custom_buttons.iter().enumerate() {
            let id = button
                .custom_id
                .clone()
                .unwrap_or_else(|| format!("custom-{index}"));
            let custom_id = build_custom_id(session, &PaginatorAction::Custom(id));
            rendered.push(Rendered {
                position: button.position,
                label: button.label.clone(),
                component: button.render(
                    custom_id.clone(),
                    button.label.clone(),
                    button.style,
                    button.disabled || all_disabled,
                ),
                custom_id,
            });
        }

        match self.sort_on {
            Some(SortButtonsOn::Position) => {
                rendered.sort_by_key(|entry| entry.position.unwrap_or(usize::MAX));
            }
            Some(SortButtonsOn::Label) => {
                rendered.sort_by(|a, b| a.label.as_deref().unwrap_or("").cmp(b.label.as_deref().unwrap_or("")));
            }
            Some(SortButtonsOn::CustomId) => rendered.sort_by(|a, b| a.custom_id.cmp(&b.custom_id)),
            None => {}
        }

        into_rows(rendered.into_iter().map(|entry| entry.component).collect())
    }

    fn derive_default(
        &self,
        key: ButtonKey,
        button: &PaginatorButton,
        session: u64,
        nav: &Navigation,
        all_disabled: bool,
    ) -> Option<Rendered> {
        let max_pages = nav.max_pages();
        let base_label = button.label.clone().unwrap_or_default();

        let (label, disabled, clickable_style) = match key {
            ButtonKey::PageIndicator => (
                Some(nav.page_string()),
                button.disabled || max_pages <= 2,
                false,
            ),
            ButtonKey::Stop if self.combine_switcher => return None,
            ButtonKey::Stop => (button.label.clone(), false, false),
            ButtonKey::First | ButtonKey::Last if max_pages <= 2 => return None,
            ButtonKey::First => (
                Some(format!("1 {base_label}")),
                !nav.loop_pages() && nav.is_first(),
                true,
            ),
            ButtonKey::Last => (
                Some(format!("{base_label} {max_pages}")),
                !nav.loop_pages() && nav.is_last(),
                true,
            ),
            ButtonKey::Left => (button.label.clone(), !nav.loop_pages() && nav.is_first(), true),
            ButtonKey::Right => (button.label.clone(), !nav.loop_pages() && nav.is_last(), true),
        };

        let style = match self.style_if_clickable {
            Some(style) if clickable_style && !disabled => style,
            _ => button.style,
        };

        let custom_id = build_custom_id(session, &key.action(self.combine_switcher));
        Some(Rendered {
            position: button.position,
            label: label.clone(),
            component: button.render(custom_id.clone(), label, style, disabled || all_disabled),
            custom_id,
        })
    }

    /// Buttons of the ephemeral page switcher: "Switch Page" and "Stop".
    pub fn switcher_components(&self, session: u64) -> Vec<Component> {
        let mut buttons = Vec::new();
        if let Some(indicator) = self.get(ButtonKey::PageIndicator) {
            let custom_id = build_custom_id(session, &PaginatorAction::SwitcherJump);
            buttons.push(indicator.render(
                custom_id,
                Some("Switch Page".to_owned()),
                indicator.style,
                false,
            ));
        }
        if let Some(stop) = self.get(ButtonKey::Stop) {
            let custom_id = build_custom_id(session, &PaginatorAction::SwitcherStop);
            buttons.push(stop.render(custom_id, stop.label.clone(), stop.style, false));
        }

        into_rows(buttons)
    }
}

/// Pack components into action rows of at most five.
pub fn into_rows(components: Vec<Component>) -> Vec<Component> {
    components
        .chunks(MAX_BUTTONS_PER_ROW)
        .map(|chunk| {
            Component::ActionRow(ActionRow {
                id: None,
                components: chunk.to_vec(),
            })
        })
        .collect()
}

/// Copy of `components` with every button and select menu disabled, at any depth.
pub fn disable_all(components: &[Component]) -> Vec<Component> {
    components.iter().cloned().map(disable).collect()
}

fn disable(component: Component) -> Component {
    match component {
        Component::ActionRow(mut row) => {
            row.components = disable_all(&row.components);
            Component::ActionRow(row)
        }
        Component::Container(mut container) => {
            container.components = disable_all(&container.components);
            Component::Container(container)
        }
        Component::Section(mut section) => {
            section.components = disable_all(&section.components);
            section.accessory = Box::new(disable(*section.accessory));
            Component::Section(section)
        }
        Component::Button(mut button) => {
            if button.url.is_none() {
                button.disabled = true;
            }
            Component::Button(button)
        }
        Component::SelectMenu(mut menu) => {
            menu.disabled = true;
            Component::SelectMenu(menu)
        }
        other => other,
    }
}
