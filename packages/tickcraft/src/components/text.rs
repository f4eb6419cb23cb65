use crate::{Component, ComponentRenderer, ComponentUpdater, Hooks};

/// The props which can be passed to a [`Text`] component.
#[derive(Clone, Default)]
pub struct TextProps {
    /// The text to display. Newlines produce multiple lines in the frame.
    pub content: String,
}

/// `Text` displays a piece of text.
///
/// # Example
///
/// ```
/// # use tickcraft::prelude::*;
/// assert_eq!(
///     Element::<Text>::new(TextProps {
///         content: "Hello, world!".into(),
///     })
///     .into_string(),
///     "Hello, world!\n",
/// );
/// ```
pub struct Text {
    content: String,
}

impl Component for Text {
    type Props = TextProps;

    fn new(props: &Self::Props) -> Self {
        Self {
            content: props.content.clone(),
        }
    }

    fn update(
        &mut self,
        props: &Self::Props,
        _hooks: Hooks<'_>,
        _updater: &mut ComponentUpdater<'_>,
    ) {
        self.content.clone_from(&props.content);
    }

    fn render(&self, renderer: &mut ComponentRenderer<'_>) {
        for line in self.content.split('\n') {
            renderer.line(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use indoc::indoc;

    #[test]
    fn test_text() {
        assert_eq!(
            Element::<Text>::new(TextProps {
                content: "foo".into(),
            })
            .into_string(),
            "foo\n"
        );

        assert_eq!(
            Element::<Text>::new(TextProps {
                content: "foo\nbar".into(),
            })
            .into_string(),
            indoc! {"
                foo
                bar
            "}
        );
    }
}
