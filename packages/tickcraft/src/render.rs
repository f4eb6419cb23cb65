use crate::{
    component::{Components, InstantiatedComponent},
    terminal::{Terminal, TerminalEvents},
    AnyElement,
};
use futures::{future::select, pin_mut, stream, stream::Stream};
use std::{fmt, io, mem};

/// The output of an update pass: the lines of text emitted by the component tree, in render
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    /// Returns the lines of the frame, in render order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Passed to [`Component::update`](crate::Component::update) so that components can declare
/// their children and interact with the hosting render loop.
pub struct ComponentUpdater<'a> {
    children: &'a mut Components,
    terminal: Option<&'a mut Terminal>,
    should_exit: &'a mut bool,
}

impl<'a> ComponentUpdater<'a> {
    pub(crate) fn new(
        children: &'a mut Components,
        terminal: Option<&'a mut Terminal>,
        should_exit: &'a mut bool,
    ) -> Self {
        Self {
            children,
            terminal,
            should_exit,
        }
    }

    /// Requests that the hosting render loop terminate after the current update pass.
    pub fn exit(&mut self) {
        *self.should_exit = true;
    }

    pub(crate) fn terminal_events(&mut self) -> Option<TerminalEvents> {
        self.terminal.as_mut().and_then(|t| t.events().ok())
    }

    /// Declares the component's children for this update pass.
    ///
    /// Children are paired with the instances from the previous pass in order: when the component
    /// type at a given position is unchanged, the existing instance is kept and receives the new
    /// props, preserving its hooks. Otherwise the old instance is dropped, which cancels its
    /// timers and futures, and a fresh instance is mounted in its place. Instances left over at
    /// the end of the list are dropped the same way.
    pub fn update_children<I, T>(&mut self, children: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<AnyElement>,
    {
        let mut old = mem::take(&mut self.children.components).into_iter();
        let mut used_components = Vec::new();

        for child in children {
            let e: AnyElement = child.into();
            let props = e.into_props();
            let mut component = match old.next() {
                Some(mut component)
                    if component.component_type_id() == props.component_type_id() =>
                {
                    component.set_props(props);
                    component
                }
                _ => InstantiatedComponent::new(props),
            };
            component.update(self.terminal.as_deref_mut(), self.should_exit);
            used_components.push(component);
        }

        drop(old);
        self.children.components = used_components;
    }
}

/// Passed to [`Component::render`](crate::Component::render) to collect the component's lines.
pub struct ComponentRenderer<'a> {
    frame: &'a mut Frame,
}

impl ComponentRenderer<'_> {
    /// Appends a line of text to the frame.
    pub fn line<S: Into<String>>(&mut self, line: S) {
        self.frame.lines.push(line.into());
    }
}

struct Tree {
    root: InstantiatedComponent,
    should_exit: bool,
}

impl Tree {
    fn new(e: AnyElement) -> Self {
        Self {
            root: InstantiatedComponent::new(e.into_props()),
            should_exit: false,
        }
    }

    fn update(&mut self, terminal: Option<&mut Terminal>) {
        self.root.update(terminal, &mut self.should_exit);
    }

    fn draw(&mut self) -> Frame {
        let mut frame = Frame::default();
        self.root.render(&mut ComponentRenderer { frame: &mut frame });
        frame
    }
}

pub(crate) fn render(e: AnyElement) -> Frame {
    let mut tree = Tree::new(e);
    tree.update(None);
    tree.draw()
}

pub(crate) async fn terminal_render_loop(e: AnyElement, mut terminal: Terminal) -> io::Result<()> {
    let mut tree = Tree::new(e);
    loop {
        tree.update(Some(&mut terminal));
        let frame = tree.draw();
        terminal.rewrite(&frame)?;
        if tree.should_exit || terminal.received_ctrl_c() {
            return Ok(());
        }
        {
            let tree_wait = tree.root.wait();
            let terminal_wait = terminal.wait();
            pin_mut!(tree_wait, terminal_wait);
            select(tree_wait, terminal_wait).await;
        }
        if terminal.received_ctrl_c() {
            return Ok(());
        }
    }
}

pub(crate) fn mock_render_loop(
    e: AnyElement,
    terminal: Terminal,
) -> impl Stream<Item = Frame> + Send {
    let tree = Tree::new(e);
    stream::unfold(Some((tree, terminal, true)), |state| async move {
        let (mut tree, mut terminal, first_pass) = state?;
        if !first_pass {
            {
                let tree_wait = tree.root.wait();
                let terminal_wait = terminal.wait();
                pin_mut!(tree_wait, terminal_wait);
                select(tree_wait, terminal_wait).await;
            }
            if terminal.received_ctrl_c() {
                return None;
            }
        }
        tree.update(Some(&mut terminal));
        let frame = tree.draw();
        let done = tree.should_exit || terminal.received_ctrl_c();
        Some((frame, if done { None } else { Some((tree, terminal, false)) }))
    })
}
