use crate::{
    component::{AnyComponentProps, Component, ComponentProps},
    render::{mock_render_loop, render, terminal_render_loop, Frame},
    terminal::{MockTerminalConfig, Terminal},
};
use futures::stream::Stream;
use std::{future::Future, io};

/// A description of a component to be instantiated, i.e. a component type paired with the props
/// for its next update.
#[derive(Clone)]
pub struct Element<T: Component> {
    /// The props to pass to the component on its next update.
    pub props: T::Props,
}

impl<T: Component> Element<T> {
    /// Creates a new element with the given props.
    pub fn new(props: T::Props) -> Self {
        Self { props }
    }
}

/// A type-erased [`Element`], suitable for heterogeneous lists of children.
#[derive(Clone)]
pub struct AnyElement {
    props: Box<dyn AnyComponentProps>,
}

impl AnyElement {
    pub(crate) fn into_props(self) -> Box<dyn AnyComponentProps> {
        self.props
    }
}

impl<T: Component> From<Element<T>> for AnyElement {
    fn from(e: Element<T>) -> Self {
        Self {
            props: Box::new(ComponentProps::<T>(e.props)),
        }
    }
}

/// Methods for rendering an element tree.
pub trait ElementExt: Into<AnyElement> + Sized {
    /// Performs a single update pass and returns the resulting [`Frame`].
    fn into_frame(self) -> Frame {
        render(self.into())
    }

    /// Performs a single update pass and returns the frame's text.
    fn into_string(self) -> String {
        self.into_frame().to_string()
    }

    /// Performs a single update pass and prints the frame to stdout.
    fn print(self) {
        print!("{}", self.into_frame());
    }

    /// Renders the element to the terminal, re-rendering whenever a hook signals a change, until
    /// a component calls [`exit`](crate::ComponentUpdater::exit) or the user presses ctrl-c.
    fn render_loop(self) -> impl Future<Output = io::Result<()>> + Send {
        let element = self.into();
        async move {
            let terminal = Terminal::new()?;
            terminal_render_loop(element, terminal).await
        }
    }

    /// Renders the element with a mock terminal, yielding one [`Frame`] per update pass. The
    /// stream ends once a component calls [`exit`](crate::ComponentUpdater::exit) or a ctrl-c key
    /// event is received from the mock event stream.
    ///
    /// This is the entry point for deterministic tests: feed key events in via
    /// [`MockTerminalConfig::with_events`] and observe the frames that come out.
    fn mock_render_loop(self, config: MockTerminalConfig) -> impl Stream<Item = Frame> + Send {
        mock_render_loop(self.into(), Terminal::mock(config))
    }
}

impl<T: Into<AnyElement>> ElementExt for T {}
