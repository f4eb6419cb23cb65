use crate::{ComponentUpdater, Hook, Hooks};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

/// `UseDeepEffect` is a hook that runs a function whenever its dependencies change, comparing the
/// dependency values themselves rather than their identity or a hash.
///
/// The previous dependencies are kept by value and compared with [`PartialEq`]. For derived
/// implementations this is a recursive, field-by-field comparison, so a freshly constructed value
/// that is equal to the previous one does not re-run the effect. This is the right tool when a
/// parent rebuilds a structured prop on every update pass: an effect keyed on the prop's identity
/// would fire every pass, while this hook fires only when the contents actually differ.
pub trait UseDeepEffect: private::Sealed {
    /// Runs the given function on the component's first update and again on any update where
    /// `deps` compares unequal to the dependencies of the previous update.
    fn use_deep_effect<D, F>(&mut self, f: F, deps: D)
    where
        D: PartialEq + Send + Unpin + 'static,
        F: FnOnce() + Send + 'static;
}

impl UseDeepEffect for Hooks<'_> {
    fn use_deep_effect<D, F>(&mut self, f: F, deps: D)
    where
        D: PartialEq + Send + Unpin + 'static,
        F: FnOnce() + Send + 'static,
    {
        let hook = self.use_hook(|| UseDeepEffectImpl::<D> {
            deps: None,
            f: None,
        });
        let changed = match &hook.deps {
            Some(prev) => *prev != deps,
            None => true,
        };
        if changed {
            hook.deps = Some(deps);
            hook.f = Some(Box::new(f));
        }
    }
}

struct UseDeepEffectImpl<D> {
    deps: Option<D>,
    f: Option<Box<dyn FnOnce() + Send>>,
}

impl<D: Send + Unpin + 'static> Hook for UseDeepEffectImpl<D> {
    fn post_component_update(&mut self, _updater: &mut ComponentUpdater) {
        if let Some(f) = self.f.take() {
            f();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[derive(PartialEq)]
    struct Badge {
        name: String,
        tags: Vec<String>,
    }

    fn badge(name: &str, tags: &[&str]) -> Badge {
        Badge {
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn update_pass(
        hooks: &mut Vec<Box<dyn crate::hook::AnyHook>>,
        first: bool,
        runs: &Arc<AtomicUsize>,
        deps: Badge,
    ) {
        let mut children = crate::component::Components::default();
        let mut should_exit = false;
        let mut updater = ComponentUpdater::new(&mut children, None, &mut should_exit);
        hooks.pre_component_update(&mut updater);
        {
            let mut hooks = Hooks::new(hooks, first);
            let runs = runs.clone();
            hooks.use_deep_effect(
                move || {
                    runs.fetch_add(1, Ordering::SeqCst);
                },
                deps,
            );
        }
        hooks.post_component_update(&mut updater);
    }

    #[test]
    fn test_deep_effect_compares_by_value() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut hooks = Vec::new();

        // always fires on the first update
        update_pass(&mut hooks, true, &runs, badge("ada", &["admin"]));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // a freshly allocated but equal value does not fire
        update_pass(&mut hooks, false, &runs, badge("ada", &["admin"]));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        update_pass(&mut hooks, false, &runs, badge("ada", &["admin"]));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // a nested field change fires
        update_pass(&mut hooks, false, &runs, badge("ada", &["admin", "ops"]));
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        // changing back fires again; only the previous update's deps are remembered
        update_pass(&mut hooks, false, &runs, badge("ada", &["admin"]));
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }
}
