use crate::{feeders, input::LineEditor, view};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    sync::Arc,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use vidmeta_common::ExtractionResult;
use vidmeta_view::{
    ExtractBackend, ExtractError, PageState, PendingRequest, Ticket, ViewController, ViewOptions,
};

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const PAGE_STEP: u16 = 5;

pub enum TuiMsg {
    Input(Event),
    Tick,
    Extracted {
        ticket: Ticket,
        outcome: Result<ExtractionResult, ExtractError>,
    },
    InputError(String),
}

/// What the event loop should do after a key.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Submit(PendingRequest),
    Reset,
    Quit,
}

/// UI state around the controller: caret, scroll and spinner.
pub struct App {
    view: ViewController<PageState>,
    editor: LineEditor,
    busy: u32,
    spin_idx: usize,
    scroll: u16,
    scroll_limit: u16,
    dirty: bool,
}

impl App {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            view: ViewController::new(PageState::default(), options),
            editor: LineEditor::default(),
            busy: 0,
            spin_idx: 0,
            scroll: 0,
            scroll_limit: u16::MAX,
            dirty: true,
        }
    }

    pub fn page(&self) -> &PageState {
        self.view.target()
    }

    pub fn cursor(&self) -> usize {
        self.editor.cursor()
    }

    /// Requests still waiting for an outcome, stale ones included.
    pub fn busy(&self) -> u32 {
        self.busy
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn spinner(&self) -> &'static str {
        if self.busy > 0 {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_scroll_limit(&mut self, limit: u16) {
        self.scroll_limit = limit;
        self.scroll = self.scroll.min(limit);
    }

    pub fn tick(&mut self) {
        if self.busy > 0 {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Paste(text) => {
                let page = self.view.target_mut();
                self.editor.insert_str(page.input_mut(), &text);
                self.dirty = true;
                Action::None
            }
            Event::Resize(..) => {
                self.dirty = true;
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        self.dirty = true;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c' | 'q') if ctrl => return Action::Quit,
            KeyCode::Char('l') if ctrl => return self.reset(),
            KeyCode::Esc => return self.reset(),
            KeyCode::Enter => return self.submit(),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1).min(self.scroll_limit),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE_STEP),
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(PAGE_STEP).min(self.scroll_limit)
            }
            KeyCode::Left => self.editor.left(self.view.target().input()),
            KeyCode::Right => self.editor.right(self.view.target().input()),
            KeyCode::Home => self.editor.home(),
            KeyCode::End => self.editor.end(self.view.target().input()),
            KeyCode::Backspace => self.editor.backspace(self.view.target_mut().input_mut()),
            KeyCode::Delete => self.editor.delete(self.view.target_mut().input_mut()),
            KeyCode::Char(ch) if !ctrl => {
                self.editor.insert(self.view.target_mut().input_mut(), ch)
            }
            _ => self.dirty = false,
        }
        Action::None
    }

    fn submit(&mut self) -> Action {
        let raw = self.view.target().input().to_string();
        let pending = self.view.begin(&raw);
        self.editor.clamp(self.view.target().input());
        match pending {
            Some(pending) => {
                self.scroll = 0;
                self.busy = self.busy.saturating_add(1);
                Action::Submit(pending)
            }
            None => Action::None,
        }
    }

    fn reset(&mut self) -> Action {
        self.view.reset();
        self.editor.home();
        self.scroll = 0;
        Action::Reset
    }

    /// Hand a backend outcome to the controller; stale tickets only stop the spinner.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<ExtractionResult, ExtractError>) {
        self.busy = self.busy.saturating_sub(1);
        if self.view.finish(ticket, outcome) {
            self.scroll = 0;
        }
        self.editor.clamp(self.view.target().input());
        self.dirty = true;
    }
}

struct TerminalSession {
    term: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let setup = || -> Result<Self> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
            let mut term = Terminal::new(CrosstermBackend::new(stdout))?;
            term.clear()?;
            Ok(Self { term })
        };
        setup().inspect_err(|_| {
            let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.term.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = self.term.show_cursor();
    }
}

/// Run the terminal page until the user quits.
pub async fn run(backend: Arc<dyn ExtractBackend>, options: ViewOptions) -> Result<()> {
    let mut session = TerminalSession::enter()?;
    let (tx, mut rx) = mpsc::channel::<TuiMsg>(256);
    let cancel = CancellationToken::new();
    let reader = feeders::spawn_feeders(tx.clone(), cancel.clone());

    let mut app = App::new(options);
    tracing::info!("tui.started");

    let result = loop {
        if app.take_dirty() {
            if let Err(err) = view::draw(&mut session.term, &mut app) {
                break Err(err);
            }
        }

        let Some(msg) = rx.recv().await else {
            break Ok(());
        };
        match msg {
            TuiMsg::Input(event) => match app.handle_event(event) {
                Action::Quit => break Ok(()),
                Action::Submit(pending) => {
                    spawn_extraction(backend.clone(), pending, tx.clone());
                }
                Action::Reset | Action::None => {}
            },
            TuiMsg::Tick => app.tick(),
            TuiMsg::Extracted { ticket, outcome } => app.complete(ticket, outcome),
            TuiMsg::InputError(err) => {
                tracing::error!(error = %err, "tui.input.failed");
                break Err(anyhow::anyhow!("terminal input failed: {err}"));
            }
        }
    };

    cancel.cancel();
    drop(rx);
    if reader.await.is_err() {
        tracing::warn!("tui.input_reader.panicked");
    }
    drop(session);
    tracing::info!("tui.stopped");
    result
}

fn spawn_extraction(
    backend: Arc<dyn ExtractBackend>,
    pending: PendingRequest,
    tx: mpsc::Sender<TuiMsg>,
) {
    tokio::spawn(async move {
        let outcome = backend.extract(&pending.url).await;
        let _ = tx
            .send(TuiMsg::Extracted {
                ticket: pending.ticket,
                outcome,
            })
            .await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidmeta_view::Slot;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, s: &str) {
        for ch in s.chars() {
            assert_eq!(app.handle_key(key(KeyCode::Char(ch))), Action::None);
        }
    }

    fn sample() -> ExtractionResult {
        ExtractionResult {
            title: "T".into(),
            thumbnail_url: "https://img/x.jpg".into(),
            video_id: "abc123".into(),
            description: "D".into(),
            duration_formatted: "00:03:45".into(),
            published_at: "2023-05-01".into(),
        }
    }

    #[test]
    fn enter_submits_trimmed_input_and_clears_the_box() {
        let mut app = App::new(ViewOptions::default());
        type_str(&mut app, "  https://youtu.be/abc123 ");

        let Action::Submit(pending) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected a submission");
        };
        assert_eq!(pending.url, "https://youtu.be/abc123");
        assert_eq!(app.page().input(), "");
        assert_eq!(app.cursor(), 0);
        assert_eq!(app.busy(), 1);
        assert_ne!(app.spinner(), " ");
    }

    #[test]
    fn blank_input_shows_validation_without_submitting() {
        let mut app = App::new(ViewOptions::default());
        type_str(&mut app, "   ");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::None);
        assert_eq!(app.busy(), 0);
        assert!(app.page().error_visible());
        assert_eq!(app.page().error_text(), "Please enter a valid YouTube URL.");
    }

    #[test]
    fn outcome_renders_and_stops_the_spinner() {
        let mut app = App::new(ViewOptions::default());
        type_str(&mut app, "https://youtu.be/abc123");
        let Action::Submit(pending) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected a submission");
        };
        app.complete(pending.ticket, Ok(sample()));
        assert_eq!(app.busy(), 0);
        assert_eq!(app.spinner(), " ");
        assert!(app.page().details_visible());
        assert_eq!(app.page().slot(Slot::Title), "T");
    }

    #[test]
    fn reset_discards_the_in_flight_outcome() {
        let mut app = App::new(ViewOptions::default());
        type_str(&mut app, "https://youtu.be/abc123");
        let Action::Submit(pending) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected a submission");
        };

        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::Reset);
        app.complete(pending.ticket, Ok(sample()));
        assert_eq!(app.busy(), 0);
        assert!(!app.page().details_visible());
        assert_eq!(app.page().slot(Slot::Title), "");
    }

    #[test]
    fn control_keys_quit_and_reset() {
        let mut app = App::new(ViewOptions::default());
        type_str(&mut app, "abc");
        assert_eq!(app.handle_key(ctrl('l')), Action::Reset);
        assert_eq!(app.page().input(), "");
        assert_eq!(app.handle_key(ctrl('c')), Action::Quit);
        assert_eq!(app.handle_key(ctrl('q')), Action::Quit);
    }

    #[test]
    fn paste_lands_at_the_caret() {
        let mut app = App::new(ViewOptions::default());
        type_str(&mut app, "ab");
        app.handle_key(key(KeyCode::Left));
        app.handle_event(Event::Paste("XY".into()));
        assert_eq!(app.page().input(), "aXYb");
        assert_eq!(app.cursor(), 3);
    }

    #[test]
    fn released_keys_are_ignored() {
        let mut app = App::new(ViewOptions::default());
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        assert_eq!(app.handle_event(Event::Key(release)), Action::None);
        assert_eq!(app.page().input(), "");
    }

    #[test]
    fn scrolling_stays_within_limits() {
        let mut app = App::new(ViewOptions::default());
        app.set_scroll_limit(6);
        app.handle_key(key(KeyCode::PageDown));
        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.scroll(), 6);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.scroll(), 5);
        app.handle_key(key(KeyCode::PageUp));
        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.scroll(), 0);
    }
}
