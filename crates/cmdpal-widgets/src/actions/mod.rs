#![forbid(unsafe_code)]

//! Host action graph.
//!
//! A host describes its commands as an [`ActionGraph`]: toolbars holding
//! actions, a menu bar whose top-level actions own (possibly nested)
//! submenus, and loose widgets that own actions directly. The same action
//! may appear in several places; its [`ActionId`] is what identifies it.
//!
//! [`aggregate`] flattens the graph into the order a command palette shows.

mod aggregate;

pub use aggregate::aggregate;

use bitflags::bitflags;
use cmdpal_core::keybinding::KeyBinding;

use crate::source::IconRef;

/// Stable identity of an action within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(usize);

impl ActionId {
    /// Raw value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Handle to a menu in an [`ActionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(usize);

/// Handle to a toolbar in an [`ActionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolbarId(usize);

/// Handle to an action-owning widget in an [`ActionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(usize);

bitflags! {
    /// Action attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActionFlags: u8 {
        /// Structural divider; never offered as a command.
        const SEPARATOR = 0b001;
        /// Present but currently unavailable.
        const DISABLED  = 0b010;
        /// Toggles a checked state when triggered.
        const CHECKABLE = 0b100;
    }
}

/// A host command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// User-visible label.
    pub label: String,
    /// Key binding, shown as shortcut text.
    pub shortcut: Option<KeyBinding>,
    /// Icon reference.
    pub icon: Option<IconRef>,
    /// Attributes.
    pub flags: ActionFlags,
    /// Submenu opened by this action, if any.
    pub submenu: Option<MenuId>,
}

impl Action {
    /// A plain action with a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shortcut: None,
            icon: None,
            flags: ActionFlags::empty(),
            submenu: None,
        }
    }

    /// A separator.
    #[must_use]
    pub fn separator() -> Self {
        let mut action = Self::new("");
        action.flags = ActionFlags::SEPARATOR;
        action
    }

    /// Set the key binding (builder).
    #[must_use]
    pub fn with_shortcut(mut self, shortcut: KeyBinding) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Set the icon (builder).
    #[must_use]
    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Add flags (builder).
    #[must_use]
    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Whether this is a separator.
    #[must_use]
    pub fn is_separator(&self) -> bool {
        self.flags.contains(ActionFlags::SEPARATOR)
    }
}

/// An ordered list of actions under a title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    /// Menu title.
    pub title: String,
    /// Actions in display order.
    pub actions: Vec<ActionId>,
}

/// A named, ordered action container (toolbar or widget).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionContainer {
    /// Container name.
    pub name: String,
    /// Actions in declaration order.
    pub actions: Vec<ActionId>,
}

/// All actions a host exposes and where they appear.
#[derive(Debug, Clone, Default)]
pub struct ActionGraph {
    actions: Vec<Action>,
    menus: Vec<Menu>,
    toolbars: Vec<ActionContainer>,
    menu_bar: Vec<ActionId>,
    widgets: Vec<ActionContainer>,
}

impl ActionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. It appears nowhere until placed.
    pub fn add(&mut self, action: Action) -> ActionId {
        self.actions.push(action);
        ActionId(self.actions.len() - 1)
    }

    /// Look up an action.
    #[must_use]
    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    /// Number of registered actions, placed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Find the first action whose binding matches `key`.
    #[must_use]
    pub fn find_shortcut(&self, key: &cmdpal_core::event::KeyEvent) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|a| a.shortcut.is_some_and(|s| s.matches(key)))
            .map(ActionId)
    }

    // --- Menus ---

    /// Create a detached menu.
    pub fn add_menu(&mut self, title: impl Into<String>) -> MenuId {
        self.menus.push(Menu {
            title: title.into(),
            actions: Vec::new(),
        });
        MenuId(self.menus.len() - 1)
    }

    /// Append `action` to `menu`. Returns `false` if `menu` is not in this
    /// graph.
    pub fn menu_push(&mut self, menu: MenuId, action: ActionId) -> bool {
        match self.menus.get_mut(menu.0) {
            Some(menu) => {
                menu.actions.push(action);
                true
            }
            None => false,
        }
    }

    /// Create an action that opens `menu`, titled after it.
    ///
    /// Returns `None` if `menu` is not in this graph.
    pub fn submenu_action(&mut self, menu: MenuId) -> Option<ActionId> {
        let title = self.menus.get(menu.0)?.title.clone();
        let mut action = Action::new(title);
        action.submenu = Some(menu);
        Some(self.add(action))
    }

    /// Make `action` open `menu`. Returns `false` if either handle is
    /// unknown.
    pub fn set_submenu(&mut self, action: ActionId, menu: MenuId) -> bool {
        if menu.0 >= self.menus.len() {
            return false;
        }
        match self.actions.get_mut(action.0) {
            Some(action) => {
                action.submenu = Some(menu);
                true
            }
            None => false,
        }
    }

    /// Create a menu and add its opening action to the menu bar.
    pub fn add_menu_bar_menu(&mut self, title: impl Into<String>) -> MenuId {
        let title = title.into();
        let mut action = Action::new(title.clone());
        let menu = self.add_menu(title);
        action.submenu = Some(menu);
        let action = self.add(action);
        self.menu_bar.push(action);
        menu
    }

    /// Append a top-level action to the menu bar.
    pub fn menu_bar_push(&mut self, action: ActionId) {
        self.menu_bar.push(action);
    }

    /// Look up a menu.
    #[must_use]
    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(id.0)
    }

    /// Top-level menu bar actions.
    #[must_use]
    pub fn menu_bar(&self) -> &[ActionId] {
        &self.menu_bar
    }

    // --- Toolbars and widgets ---

    /// Create a toolbar.
    pub fn add_toolbar(&mut self, name: impl Into<String>) -> ToolbarId {
        self.toolbars.push(ActionContainer {
            name: name.into(),
            actions: Vec::new(),
        });
        ToolbarId(self.toolbars.len() - 1)
    }

    /// Append `action` to `toolbar`. Returns `false` if `toolbar` is not in
    /// this graph.
    pub fn toolbar_push(&mut self, toolbar: ToolbarId, action: ActionId) -> bool {
        match self.toolbars.get_mut(toolbar.0) {
            Some(toolbar) => {
                toolbar.actions.push(action);
                true
            }
            None => false,
        }
    }

    /// Toolbars in declaration order.
    #[must_use]
    pub fn toolbars(&self) -> &[ActionContainer] {
        &self.toolbars
    }

    /// Register a widget that owns actions directly.
    pub fn add_widget(&mut self, name: impl Into<String>) -> WidgetId {
        self.widgets.push(ActionContainer {
            name: name.into(),
            actions: Vec::new(),
        });
        WidgetId(self.widgets.len() - 1)
    }

    /// Give `action` to `widget`. Returns `false` if `widget` is not in this
    /// graph.
    pub fn widget_push(&mut self, widget: WidgetId, action: ActionId) -> bool {
        match self.widgets.get_mut(widget.0) {
            Some(widget) => {
                widget.actions.push(action);
                true
            }
            None => false,
        }
    }

    /// Action-owning widgets in declaration order.
    #[must_use]
    pub fn widgets(&self) -> &[ActionContainer] {
        &self.widgets
    }
}
