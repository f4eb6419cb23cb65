use crate::{AnyElement, Component, ComponentUpdater, Hooks};

/// The props which can be passed to a [`Stack`] component.
#[derive(Clone, Default)]
pub struct StackProps {
    /// The children to display, in order, top to bottom.
    pub children: Vec<AnyElement>,
}

/// `Stack` displays its children vertically, in the order given.
///
/// Children are matched up with their instances from the previous update pass by position, so a
/// child that keeps its position and type across passes keeps its state. A child that disappears
/// from the list is dropped, along with its hooks and timers.
pub struct Stack;

impl Component for Stack {
    type Props = StackProps;

    fn new(_props: &Self::Props) -> Self {
        Self
    }

    fn update(
        &mut self,
        props: &Self::Props,
        _hooks: Hooks<'_>,
        updater: &mut ComponentUpdater<'_>,
    ) {
        updater.update_children(props.children.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use indoc::indoc;

    #[test]
    fn test_stack() {
        let e = Element::<Stack>::new(StackProps {
            children: vec![
                Element::<Text>::new(TextProps {
                    content: "first".into(),
                })
                .into(),
                Element::<Text>::new(TextProps {
                    content: "second".into(),
                })
                .into(),
            ],
        });
        assert_eq!(
            e.into_string(),
            indoc! {"
                first
                second
            "}
        );
    }

    #[test]
    fn test_empty_stack() {
        assert_eq!(
            Element::<Stack>::new(StackProps::default()).into_string(),
            ""
        );
    }
}
