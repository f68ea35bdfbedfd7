#![forbid(unsafe_code)]

//! The demo host: a text pad with a menu bar, a toolbar, and three command
//! palettes bound to shortcuts.
//!
//! | Shortcut     | Palette          | Source                              |
//! |--------------|------------------|-------------------------------------|
//! | Ctrl+P       | Choose quote     | fifteen quotes                      |
//! | Ctrl+Shift+P | Choose file      | directory snapshot, scoped to root  |
//! | Ctrl+Alt+P   | Choose commands  | every action in the host, flattened |
//!
//! A chosen quote or file is shown in the status line; a chosen command
//! runs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use cmdpal_core::event::{Event, KeyCode, KeyEvent, Modifiers};
use cmdpal_core::geometry::Size;
use cmdpal_core::keybinding::KeyBinding;
use cmdpal_core::text::pop_grapheme;
use cmdpal_widgets::actions::{Action, ActionFlags, ActionGraph, ActionId};
use cmdpal_widgets::command_palette::{Chosen, CommandPalette};
use cmdpal_widgets::layout::PaletteMetrics;
use cmdpal_widgets::source::{IconRef, ItemSource, Payload};
use cmdpal_widgets::sources::{ActionListSource, FileSystemSource, StringListSource};

/// Quotes offered by Choose quote.
pub const QUOTES: [&str; 15] = [
    "All you need is love.",
    "We all want to change the world.",
    "Here comes the sun.",
    "I get by with a little help from my friends.",
    "With a little help from my friends.",
    "Let it be.",
    "Come together, right now.",
    "I want to hold your hand.",
    "Help! I need somebody.",
    "Imagine all the people living life in peace.",
    "You say goodbye and I say hello.",
    "Yesterday, all my troubles seemed so far away.",
    "I am the walrus.",
    "Lucy in the sky with diamonds.",
    "Hey Jude, don't make it bad.",
];

/// Everything the host can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ChooseFile,
    ChooseQuote,
    ChooseCommands,
    Quit,
    Undo,
    Redo,
    Uppercase,
    Lowercase,
    ReverseLines,
    ClearPad,
    LineNumbers,
    WordCount,
}

impl Command {
    /// Whether the shortcut still fires while the palette has focus.
    #[must_use]
    pub const fn passes_palette_focus(self) -> bool {
        matches!(
            self,
            Self::ChooseFile | Self::ChooseQuote | Self::ChooseCommands | Self::Quit
        )
    }
}

/// Which surface receives typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Pad,
    Palette,
}

/// The editable text area, with snapshot undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPad {
    lines: Vec<String>,
    undo: Vec<Vec<String>>,
    redo: Vec<Vec<String>>,
    line_numbers: bool,
}

impl Default for TextPad {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            undo: Vec::new(),
            redo: Vec::new(),
            line_numbers: false,
        }
    }
}

impl TextPad {
    /// Current lines; never empty.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The whole text, newline-joined.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether line numbers are shown.
    #[must_use]
    pub fn line_numbers(&self) -> bool {
        self.line_numbers
    }

    fn edit(&mut self, f: impl FnOnce(&mut Vec<String>)) {
        let before = self.lines.clone();
        f(&mut self.lines);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if self.lines != before {
            self.undo.push(before);
            self.redo.clear();
        }
    }

    /// Append text at the end, splitting on newlines.
    pub fn insert(&mut self, text: &str) {
        self.edit(|lines| {
            let mut parts = text.split('\n');
            if let (Some(first), Some(last)) = (parts.next(), lines.last_mut()) {
                last.push_str(first);
            }
            lines.extend(parts.map(str::to_owned));
        });
    }

    fn backspace(&mut self) {
        self.edit(|lines| {
            let Some(last) = lines.last_mut() else {
                return;
            };
            if !pop_grapheme(last) && lines.len() > 1 {
                lines.pop();
            }
        });
    }

    fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        self.redo.push(std::mem::replace(&mut self.lines, previous));
        true
    }

    fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push(std::mem::replace(&mut self.lines, next));
        true
    }

    fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.split_whitespace().count()).sum()
    }
}

/// Host state: action graph, palette sources, palette, and text pad.
pub struct HostApp {
    graph: ActionGraph,
    commands: HashMap<ActionId, Command>,
    palette: CommandPalette,
    chosen: Rc<RefCell<Vec<Chosen>>>,
    quotes: Rc<StringListSource>,
    files: Option<Rc<FileSystemSource>>,
    actions: Rc<ActionListSource>,
    pad: TextPad,
    focus: Focus,
    status: String,
    size: Size,
    quit: bool,
}

impl HostApp {
    /// Build the host, reading `root` down to `depth` levels for the file
    /// palette. An unreadable root disables Choose file.
    pub fn new(root: &Path, depth: usize) -> Self {
        let (graph, commands) = build_actions();
        let actions = Rc::new(ActionListSource::from_graph(&graph));

        let (files, status) = match FileSystemSource::from_path(root, depth) {
            Ok(files) => (
                Some(Rc::new(files)),
                "Ctrl+P quote, Ctrl+Shift+P file, Ctrl+Alt+P commands, Ctrl+Q quit".to_string(),
            ),
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "file palette disabled");
                (None, format!("Cannot read {}: {err}", root.display()))
            }
        };

        let chosen = Rc::new(RefCell::new(Vec::new()));
        let mut palette = CommandPalette::new().with_metrics(PaletteMetrics::cells());
        let sink = Rc::clone(&chosen);
        palette.on_chosen(move |c: &Chosen| sink.borrow_mut().push(c.clone()));

        Self {
            graph,
            commands,
            palette,
            chosen,
            quotes: Rc::new(StringListSource::new(QUOTES)),
            files,
            actions,
            pad: TextPad::default(),
            focus: Focus::Pad,
            status,
            size: Size::ZERO,
            quit: false,
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn graph(&self) -> &ActionGraph {
        &self.graph
    }

    #[must_use]
    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    #[must_use]
    pub fn pad(&self) -> &TextPad {
        &self.pad
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Action bound to `command`.
    #[must_use]
    pub fn action_for(&self, command: Command) -> Option<ActionId> {
        self.commands
            .iter()
            .find_map(|(&id, &c)| (c == command).then_some(id))
    }

    /// The flattened command list offered by Choose commands.
    #[must_use]
    pub fn command_source(&self) -> &ActionListSource {
        &self.actions
    }

    // --- Input ---

    /// Route one event: palette first, then host shortcuts, then the pad.
    pub fn update(&mut self, event: &Event) {
        if !self.palette.handle_event(event) {
            match event {
                Event::Resize { width, height } => self.size = Size::new(*width, *height),
                Event::Key(key) if event.as_key_press().is_some() => self.on_key(key),
                Event::Paste(text) if self.focus == Focus::Pad => self.pad.insert(text),
                _ => {}
            }
        }
        self.dispatch_chosen();
        self.sync_focus();
    }

    fn on_key(&mut self, key: &KeyEvent) {
        if let Some(id) = self.graph.find_shortcut(key) {
            // The palette owns the keyboard; only its toggles and Quit get past it.
            let allowed = self.focus == Focus::Pad
                || self.commands.get(&id).is_some_and(|c| c.passes_palette_focus());
            if allowed {
                self.trigger(id);
            }
            return;
        }
        if self.focus != Focus::Pad {
            return;
        }
        match key.code {
            KeyCode::Char(c) if !key.ctrl() && !key.alt() => self.pad.insert(&c.to_string()),
            KeyCode::Enter => self.pad.insert("\n"),
            KeyCode::Tab => self.pad.insert("    "),
            KeyCode::Backspace => self.pad.backspace(),
            _ => {}
        }
    }

    fn dispatch_chosen(&mut self) {
        // Handlers may reopen the palette, so drain before handling.
        let picked: Vec<Chosen> = self.chosen.borrow_mut().drain(..).collect();
        for chosen in picked {
            self.on_chosen(&chosen);
        }
    }

    fn on_chosen(&mut self, chosen: &Chosen) {
        tracing::info!(source = chosen.source.get(), index = chosen.index, "entry chosen");
        match &chosen.payload {
            Payload::Row(row) if chosen.source == self.quotes.source_id() => {
                self.status = self.quotes.text(*row).unwrap_or_default().to_string();
            }
            Payload::Path(path) => self.status = format!("Chose file {}", path.display()),
            Payload::Action(id) => self.trigger(*id),
            Payload::Row(row) => self.status = format!("Chose row {row}"),
        }
    }

    fn sync_focus(&mut self) {
        if self.palette.take_focus_request() {
            self.focus = Focus::Palette;
        }
        if !self.palette.is_visible() {
            self.focus = Focus::Pad;
        }
    }

    // --- Commands ---

    /// Run the command behind action `id`. Disabled actions are ignored.
    pub fn trigger(&mut self, id: ActionId) {
        let Some(action) = self.graph.get(id) else {
            return;
        };
        if action.flags.contains(ActionFlags::DISABLED) {
            self.status = format!("{} is unavailable", action.label);
            return;
        }
        if let Some(&command) = self.commands.get(&id) {
            tracing::debug!(?command, "command triggered");
            self.run(command);
        }
        self.sync_focus();
    }

    fn run(&mut self, command: Command) {
        match command {
            Command::ChooseQuote => {
                let quotes: Rc<dyn ItemSource> = self.quotes.clone();
                self.palette.toggle(quotes, None);
            }
            Command::ChooseFile => match &self.files {
                Some(files) => {
                    let scope = files.root_scope();
                    let files: Rc<dyn ItemSource> = files.clone();
                    self.palette.toggle(files, Some(scope));
                }
                None => self.status = "No directory to choose from".to_string(),
            },
            Command::ChooseCommands => {
                let actions: Rc<dyn ItemSource> = self.actions.clone();
                self.palette.toggle(actions, None);
            }
            Command::Quit => self.quit = true,
            Command::Undo => {
                if !self.pad.undo() {
                    self.status = "Nothing to undo".to_string();
                }
            }
            Command::Redo => {
                if !self.pad.redo() {
                    self.status = "Nothing to redo".to_string();
                }
            }
            Command::Uppercase => self.pad.edit(|lines| {
                lines.iter_mut().for_each(|l| *l = l.to_uppercase());
            }),
            Command::Lowercase => self.pad.edit(|lines| {
                lines.iter_mut().for_each(|l| *l = l.to_lowercase());
            }),
            Command::ReverseLines => self.pad.edit(|lines| lines.reverse()),
            Command::ClearPad => self.pad.edit(Vec::clear),
            Command::LineNumbers => self.pad.line_numbers = !self.pad.line_numbers,
            Command::WordCount => self.status = format!("{} words", self.pad.word_count()),
        }
    }
}

/// The host's actions and where they appear.
///
/// File and Edit menus (Edit with a nested Transform submenu), a toolbar
/// sharing actions with the menus, and a text pad owning a few loose
/// actions of its own.
fn build_actions() -> (ActionGraph, HashMap<ActionId, Command>) {
    let mut g = ActionGraph::new();
    let mut commands = HashMap::new();
    let mut add = |g: &mut ActionGraph, action: Action, command: Command| {
        let id = g.add(action);
        commands.insert(id, command);
        id
    };
    let alt_ctrl = Modifiers::CTRL | Modifiers::ALT;

    let choose_file = add(
        &mut g,
        Action::new("Choose file")
            .with_shortcut(KeyBinding::new(KeyCode::Char('p'), Modifiers::CTRL | Modifiers::SHIFT))
            .with_icon(IconRef::new("folder")),
        Command::ChooseFile,
    );
    let choose_quote = add(
        &mut g,
        Action::new("Choose quote")
            .with_shortcut(KeyBinding::ctrl('p'))
            .with_icon(IconRef::new("quote")),
        Command::ChooseQuote,
    );
    let choose_commands = add(
        &mut g,
        Action::new("Choose commands")
            .with_shortcut(KeyBinding::new(KeyCode::Char('p'), alt_ctrl))
            .with_icon(IconRef::new("terminal")),
        Command::ChooseCommands,
    );
    let quit = add(
        &mut g,
        Action::new("Quit").with_shortcut(KeyBinding::ctrl('q')),
        Command::Quit,
    );
    let undo = add(
        &mut g,
        Action::new("Undo").with_shortcut(KeyBinding::ctrl('z')),
        Command::Undo,
    );
    let redo = add(
        &mut g,
        Action::new("Redo").with_shortcut(KeyBinding::ctrl('y')),
        Command::Redo,
    );
    let upper = add(&mut g, Action::new("Uppercase"), Command::Uppercase);
    let lower = add(&mut g, Action::new("Lowercase"), Command::Lowercase);
    let reverse = add(&mut g, Action::new("Reverse lines"), Command::ReverseLines);
    let clear = add(&mut g, Action::new("Clear pad"), Command::ClearPad);
    let numbers = add(
        &mut g,
        Action::new("Line numbers").with_flags(ActionFlags::CHECKABLE),
        Command::LineNumbers,
    );
    let words = add(&mut g, Action::new("Word count"), Command::WordCount);

    let toolbar = g.add_toolbar("main");
    for id in [choose_file, choose_quote, undo] {
        g.toolbar_push(toolbar, id);
    }

    let file = g.add_menu_bar_menu("File");
    let separator = g.add(Action::separator());
    for id in [choose_file, choose_quote, choose_commands, separator, quit] {
        g.menu_push(file, id);
    }

    let edit = g.add_menu_bar_menu("Edit");
    let transform = g.add_menu("Transform");
    let transform_action = g.submenu_action(transform);
    for id in [undo, redo].into_iter().chain(transform_action) {
        g.menu_push(edit, id);
    }
    for id in [upper, lower, reverse] {
        g.menu_push(transform, id);
    }

    let pad = g.add_widget("pad");
    for id in [undo, clear, numbers, words] {
        g.widget_push(pad, id);
    }

    (g, commands)
}
