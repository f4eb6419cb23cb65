use crate::{ComponentUpdater, Hook, Hooks};
use std::hash::{DefaultHasher, Hash, Hasher};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

fn hash_deps<D: Hash>(deps: &D) -> u64 {
    let mut hasher = DefaultHasher::new();
    deps.hash(&mut hasher);
    hasher.finish()
}

/// `UseEffect` is a hook that runs a function whenever its dependencies change.
///
/// Change is detected by comparing a hash of the dependencies, so the dependencies only need to
/// implement [`Hash`], not be stored. The trade-off is that two distinct values can collide and
/// types such as floats cannot be dependencies. When the dependencies are values whose structural
/// equality matters, prefer [`use_deep_effect`](crate::hooks::UseDeepEffect::use_deep_effect),
/// which compares the values themselves.
///
/// Beware of keying an effect on a value the effect itself changes, directly or through a timer:
/// every change re-runs the effect, and an effect that re-arms a timer on every run resets the
/// period on every tick.
pub trait UseEffect: private::Sealed {
    /// Runs the given function on the component's first update and again on any update where the
    /// hash of `deps` differs from the previous update.
    fn use_effect<D, F>(&mut self, f: F, deps: D)
    where
        D: Hash,
        F: FnOnce() + Send + 'static;
}

impl UseEffect for Hooks<'_> {
    fn use_effect<D, F>(&mut self, f: F, deps: D)
    where
        D: Hash,
        F: FnOnce() + Send + 'static,
    {
        let deps_hash = hash_deps(&deps);
        let mut f = Some(f);
        let hook = {
            let f = &mut f;
            self.use_hook(move || UseEffectImpl {
                deps_hash,
                f: f.take().map(|f| Box::new(f) as Box<dyn FnOnce() + Send>),
            })
        };
        if hook.deps_hash != deps_hash {
            hook.deps_hash = deps_hash;
            if let Some(f) = f.take() {
                hook.f = Some(Box::new(f));
            }
        }
    }
}

struct UseEffectImpl {
    deps_hash: u64,
    f: Option<Box<dyn FnOnce() + Send>>,
}

impl Hook for UseEffectImpl {
    fn post_component_update(&mut self, _updater: &mut ComponentUpdater) {
        if let Some(f) = self.f.take() {
            f();
        }
    }
}
