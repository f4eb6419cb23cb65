use crate::{
    components::{Text, TextProps},
    hooks::{UseDeepEffect, UseFuture, UseRef, UseState, UseTerminalEvents},
    AnyElement, Component, ComponentUpdater, Element, Handler, Hooks, KeyCode, KeyEvent,
    KeyEventKind, TerminalEvent,
};
use async_io::Timer;
use std::time::Duration;

/// A structured value passed from [`Profile`] to [`ProfileCard`] as a prop.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    /// The display name.
    pub name: String,

    /// The roles granted to this identity.
    pub roles: Vec<String>,
}

/// The props which can be passed to a [`Profile`] component.
#[derive(Clone)]
pub struct ProfileProps {
    /// How often the profile re-renders on its own.
    pub period: Duration,

    /// Invoked whenever the card observes an identity whose contents differ from the previous
    /// one.
    pub on_identity_change: Handler<Identity>,
}

impl Default for ProfileProps {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(500),
            on_identity_change: Handler::default(),
        }
    }
}

/// A parent that rebuilds its child's prop on every pass.
///
/// `Profile` re-renders once per period and constructs a fresh [`Identity`] value for its
/// [`ProfileCard`] child every time. The identity's contents only change when the name is
/// edited, so the card's `renders` line climbs with every tick while its `updates` line moves
/// only on actual edits. An effect keyed on the prop's identity rather than its contents would
/// have fired every tick.
///
/// Key bindings:
///
/// - any character appends to the name, backspace deletes the last character
/// - escape exits the render loop
pub struct Profile;

impl Component for Profile {
    type Props = ProfileProps;

    fn new(_props: &Self::Props) -> Self {
        Self
    }

    fn update(
        &mut self,
        props: &Self::Props,
        mut hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    ) {
        let ticks = hooks.use_state(|| 0u64);
        let name = hooks.use_state(|| "ada".to_string());
        let should_exit = hooks.use_state(|| false);

        let period = props.period;
        hooks.use_future(async move {
            loop {
                Timer::after(period).await;
                ticks.set_with(|t| *t += 1);
            }
        });

        hooks.use_terminal_events(move |event| match event {
            TerminalEvent::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                match code {
                    KeyCode::Char(c) => name.set_with(|n| n.push(c)),
                    KeyCode::Backspace => name.set_with(|n| {
                        n.pop();
                    }),
                    KeyCode::Esc => should_exit.set(true),
                    _ => {}
                }
            }
            _ => {}
        });

        if should_exit.get() {
            updater.exit();
        }

        // a fresh value on every pass, equal to the previous one unless the name was edited
        let identity = Identity {
            name: name.read().clone(),
            roles: vec!["admin".to_string()],
        };

        updater.update_children([
            AnyElement::from(Element::<Text>::new(TextProps {
                content: format!("ticks => {}", ticks),
            })),
            Element::<ProfileCard>::new(ProfileCardProps {
                identity,
                on_identity_change: props.on_identity_change.clone(),
            })
            .into(),
        ]);
    }
}

/// The props which can be passed to a [`ProfileCard`] component.
#[derive(Clone)]
pub struct ProfileCardProps {
    /// The identity to display.
    pub identity: Identity,

    /// Invoked with the identity whenever its contents differ from the previous update's.
    pub on_identity_change: Handler<Identity>,
}

/// A child that reacts to the contents of its prop, not its identity.
///
/// The card counts its update passes in a [`Ref`](crate::hooks::Ref), so the bookkeeping itself
/// never causes a re-render, and runs a
/// [`use_deep_effect`](crate::hooks::UseDeepEffect::use_deep_effect) keyed on the full
/// [`Identity`] value. The effect fires once on mount and then only when a field of the identity
/// actually changes, no matter how many fresh-but-equal values the parent sends down.
pub struct ProfileCard;

impl Component for ProfileCard {
    type Props = ProfileCardProps;

    fn new(_props: &Self::Props) -> Self {
        Self
    }

    fn update(
        &mut self,
        props: &Self::Props,
        mut hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    ) {
        let updates = hooks.use_state(|| 0u64);
        let mut renders = hooks.use_ref(|| 0u64);
        renders.set_with(|r| *r += 1);

        {
            let identity = props.identity.clone();
            let on_identity_change = props.on_identity_change.clone();
            hooks.use_deep_effect(
                move || {
                    updates.set_with(|u| *u += 1);
                    on_identity_change(identity);
                },
                props.identity.clone(),
            );
        }

        updater.update_children([
            AnyElement::from(Element::<Text>::new(TextProps {
                content: format!(
                    "profile => {} [{}]",
                    props.identity.name,
                    props.identity.roles.join(", ")
                ),
            })),
            Element::<Text>::new(TextProps {
                content: format!("updates => {}", updates),
            })
            .into(),
            Element::<Text>::new(TextProps {
                content: format!("renders => {}", renders.get()),
            })
            .into(),
        ]);
    }
}
