use crossterm::{
    cursor,
    event::{self, Event, EventStream},
    execute, queue, terminal,
};
use futures::{
    future::pending,
    stream::{self, BoxStream, Stream, StreamExt},
};
use std::{
    collections::VecDeque,
    io::{self, stdout, Write},
    pin::Pin,
    sync::{Arc, Mutex, Weak},
    task::{Context, Poll, Waker},
};

use crate::render::Frame;

// Re-exports for basic types.
pub use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

/// An event fired when a key is pressed.
#[derive(Clone, Debug)]
pub struct KeyEvent {
    /// A code indicating the key that was pressed.
    pub code: KeyCode,

    /// The modifiers that were active when the key was pressed.
    pub modifiers: KeyModifiers,

    /// Whether the key was pressed or released.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Creates a key press event for the given code, with no modifiers.
    pub fn press(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }
}

/// An event fired by the terminal.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum TerminalEvent {
    /// A key event, fired when a key is pressed.
    Key(KeyEvent),
}

struct TerminalEventsInner {
    pending: VecDeque<TerminalEvent>,
    waker: Option<Waker>,
}

/// A stream of terminal events, as returned to subscribing hooks.
pub struct TerminalEvents {
    inner: Arc<Mutex<TerminalEventsInner>>,
}

impl Stream for TerminalEvents {
    type Item = TerminalEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(event) = inner.pending.pop_front() {
            Poll::Ready(Some(event))
        } else {
            inner.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// Configuration for the mock terminal used by
/// [`ElementExt::mock_render_loop`](crate::ElementExt::mock_render_loop).
pub struct MockTerminalConfig {
    events: BoxStream<'static, TerminalEvent>,
}

impl MockTerminalConfig {
    /// Creates a mock terminal configuration which delivers the given stream of events.
    pub fn with_events<S>(events: S) -> Self
    where
        S: Stream<Item = TerminalEvent> + Send + 'static,
    {
        Self {
            events: events.boxed(),
        }
    }
}

impl Default for MockTerminalConfig {
    fn default() -> Self {
        Self::with_events(stream::empty())
    }
}

enum EventSource {
    Tty(Option<EventStream>),
    Mock(BoxStream<'static, TerminalEvent>),
}

pub(crate) struct Terminal {
    source: EventSource,
    raw_mode_enabled: bool,
    subscribers: Vec<Weak<Mutex<TerminalEventsInner>>>,
    received_ctrl_c: bool,
    last_frame_height: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        queue!(stdout(), cursor::Hide)?;
        Ok(Self {
            source: EventSource::Tty(None),
            raw_mode_enabled: false,
            subscribers: Vec::new(),
            received_ctrl_c: false,
            last_frame_height: 0,
        })
    }

    pub fn mock(config: MockTerminalConfig) -> Self {
        Self {
            source: EventSource::Mock(config.events),
            raw_mode_enabled: false,
            subscribers: Vec::new(),
            received_ctrl_c: false,
            last_frame_height: 0,
        }
    }

    pub fn received_ctrl_c(&self) -> bool {
        self.received_ctrl_c
    }

    /// Pumps events from the underlying source to the subscribers. Returns early if ctrl-c is
    /// received, and otherwise never completes.
    pub async fn wait(&mut self) {
        let Self {
            source,
            subscribers,
            received_ctrl_c,
            ..
        } = self;
        match source {
            EventSource::Tty(Some(event_stream)) => {
                while let Some(event) = event_stream.next().await {
                    let event = event.ok().and_then(|event| match event {
                        Event::Key(event) => Some(TerminalEvent::Key(KeyEvent {
                            code: event.code,
                            modifiers: event.modifiers,
                            kind: event.kind,
                        })),
                        _ => None,
                    });
                    if let Some(event) = event {
                        Self::deliver(subscribers, received_ctrl_c, event);
                    }
                    if *received_ctrl_c {
                        return;
                    }
                }
            }
            EventSource::Tty(None) => {}
            EventSource::Mock(events) => {
                while let Some(event) = events.next().await {
                    Self::deliver(subscribers, received_ctrl_c, event);
                    if *received_ctrl_c {
                        return;
                    }
                }
            }
        }
        pending().await
    }

    fn deliver(
        subscribers: &mut Vec<Weak<Mutex<TerminalEventsInner>>>,
        received_ctrl_c: &mut bool,
        event: TerminalEvent,
    ) {
        let TerminalEvent::Key(key) = &event;
        if key.code == KeyCode::Char('c')
            && key.kind == KeyEventKind::Press
            && key.modifiers == KeyModifiers::CONTROL
        {
            *received_ctrl_c = true;
            return;
        }
        subscribers.retain(|subscriber| {
            if let Some(subscriber) = subscriber.upgrade() {
                let mut subscriber = subscriber.lock().unwrap();
                subscriber.pending.push_back(event.clone());
                if let Some(waker) = subscriber.waker.take() {
                    waker.wake();
                }
                true
            } else {
                false
            }
        });
    }

    pub fn events(&mut self) -> io::Result<TerminalEvents> {
        if let EventSource::Tty(event_stream @ None) = &mut self.source {
            *event_stream = Some(EventStream::new());
            self.set_raw_mode_enabled(true)?;
        }
        let inner = Arc::new(Mutex::new(TerminalEventsInner {
            pending: VecDeque::new(),
            waker: None,
        }));
        self.subscribers.push(Arc::downgrade(&inner));
        Ok(TerminalEvents { inner })
    }

    /// Replaces the previously written frame with the given one.
    pub fn rewrite(&mut self, frame: &Frame) -> io::Result<()> {
        let mut dest = stdout();
        if self.last_frame_height > 0 {
            queue!(dest, cursor::MoveUp(self.last_frame_height))?;
        }
        queue!(
            dest,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )?;
        for line in frame.lines() {
            dest.write_all(line.as_bytes())?;
            dest.write_all(b"\r\n")?;
        }
        dest.flush()?;
        self.last_frame_height = frame.lines().len() as u16;
        Ok(())
    }

    fn set_raw_mode_enabled(&mut self, raw_mode_enabled: bool) -> io::Result<()> {
        if raw_mode_enabled != self.raw_mode_enabled {
            if raw_mode_enabled {
                terminal::enable_raw_mode()?;
            } else {
                terminal::disable_raw_mode()?;
            }
            self.raw_mode_enabled = raw_mode_enabled;
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.set_raw_mode_enabled(false);
        if matches!(self.source, EventSource::Tty(_)) {
            let _ = execute!(stdout(), cursor::Show);
        }
    }
}
