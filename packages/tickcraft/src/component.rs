use crate::{
    hook::{AnyHook, Hook, Hooks},
    render::{ComponentRenderer, ComponentUpdater},
    terminal::Terminal,
};
use futures::future::poll_fn;
use std::{
    any::{Any, TypeId},
    pin::Pin,
    task::{Context, Poll},
};

pub(crate) struct ComponentProps<C: Component>(pub(crate) C::Props);

pub(crate) trait AnyComponentProps: Any + Send {
    fn new_component(&self) -> Box<dyn AnyComponent>;
    fn update_component(
        &self,
        component: &mut Box<dyn AnyComponent>,
        hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    );
    fn clone_impl(&self) -> Box<dyn AnyComponentProps>;
    fn component_type_id(&self) -> TypeId;
}

impl<C: Component> AnyComponentProps for ComponentProps<C> {
    fn new_component(&self) -> Box<dyn AnyComponent> {
        Box::new(C::new(&self.0))
    }

    fn update_component(
        &self,
        component: &mut Box<dyn AnyComponent>,
        hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    ) {
        component.update(&self.0, hooks, updater);
    }

    fn clone_impl(&self) -> Box<dyn AnyComponentProps> {
        Box::new(Self(self.0.clone()))
    }

    fn component_type_id(&self) -> TypeId {
        TypeId::of::<C>()
    }
}

impl Clone for Box<dyn AnyComponentProps> {
    fn clone(&self) -> Self {
        self.clone_impl()
    }
}

/// The trait implemented by all components.
///
/// A component owns whatever state its hooks register during its first update. It is re-updated
/// whenever one of its hooks signals a change, and it is dropped, together with all of its hooks,
/// when its parent stops rendering it.
pub trait Component: Any + Unpin + Send {
    /// The type of properties that the component accepts. Props are how parents configure their
    /// children on every update pass.
    type Props: Clone + Send;

    /// Creates a new instance of the component.
    fn new(props: &Self::Props) -> Self;

    /// Invoked on every update pass. This is where hooks are used and children are declared.
    fn update(
        &mut self,
        _props: &Self::Props,
        _hooks: Hooks<'_>,
        _updater: &mut ComponentUpdater<'_>,
    ) {
    }

    /// Invoked after every update pass to contribute lines to the frame.
    fn render(&self, _renderer: &mut ComponentRenderer<'_>) {}

    /// Called to determine if the component itself (excluding its hooks and children) has caused
    /// a change which requires a new update pass.
    fn poll_change(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        Poll::Pending
    }
}

pub(crate) trait AnyComponent: Any + Unpin + Send {
    fn update(&mut self, props: &dyn Any, hooks: Hooks<'_>, updater: &mut ComponentUpdater<'_>);
    fn render(&self, renderer: &mut ComponentRenderer<'_>);
    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()>;
}

impl<C: Any + Component> AnyComponent for C {
    fn update(&mut self, props: &dyn Any, hooks: Hooks<'_>, updater: &mut ComponentUpdater<'_>) {
        Component::update(
            self,
            props.downcast_ref().expect("we should be able to downcast"),
            hooks,
            updater,
        );
    }

    fn render(&self, renderer: &mut ComponentRenderer<'_>) {
        Component::render(self, renderer);
    }

    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        Component::poll_change(self, cx)
    }
}

pub(crate) struct InstantiatedComponent {
    component: Box<dyn AnyComponent>,
    props: Box<dyn AnyComponentProps>,
    hooks: Vec<Box<dyn AnyHook>>,
    first_update: bool,
    children: Components,
}

impl InstantiatedComponent {
    pub fn new(props: Box<dyn AnyComponentProps>) -> Self {
        Self {
            component: props.new_component(),
            props,
            hooks: Vec::new(),
            first_update: true,
            children: Components::default(),
        }
    }

    pub fn component_type_id(&self) -> TypeId {
        self.props.component_type_id()
    }

    pub fn set_props(&mut self, props: Box<dyn AnyComponentProps>) {
        self.props = props;
    }

    pub fn update(&mut self, terminal: Option<&mut Terminal>, should_exit: &mut bool) {
        let mut updater = ComponentUpdater::new(&mut self.children, terminal, should_exit);
        self.hooks.pre_component_update(&mut updater);
        self.props.update_component(
            &mut self.component,
            Hooks::new(&mut self.hooks, self.first_update),
            &mut updater,
        );
        self.hooks.post_component_update(&mut updater);
        self.first_update = false;
    }

    pub fn render(&self, renderer: &mut ComponentRenderer<'_>) {
        self.component.render(renderer);
        self.children.render(renderer);
    }

    pub async fn wait(&mut self) {
        let mut self_mut = Pin::new(self);
        poll_fn(|cx| self_mut.as_mut().poll_change(cx)).await;
    }

    fn poll_change(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let component_status = Pin::new(&mut *self.component).poll_change(cx);
        let hooks_status = Pin::new(&mut self.hooks).poll_change(cx);
        let children_status = Pin::new(&mut self.children).poll_change(cx);
        if component_status.is_ready() || hooks_status.is_ready() || children_status.is_ready() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

#[derive(Default)]
pub(crate) struct Components {
    pub components: Vec<InstantiatedComponent>,
}

impl Components {
    pub fn render(&self, renderer: &mut ComponentRenderer<'_>) {
        for component in self.components.iter() {
            component.render(renderer);
        }
    }

    pub fn poll_change(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut is_ready = false;
        for component in self.components.iter_mut() {
            if Pin::new(component).poll_change(cx).is_ready() {
                is_ready = true;
            }
        }
        if is_ready {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}
