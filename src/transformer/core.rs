//! Class transformer driving registered hooks.

use std::sync::Arc;

use dashmap::DashSet;
use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    config::TransformerConfig,
    hook::{Hook, HookResult, HookStatus},
    mapping::internal_name,
    transformer::{class::ClassNode, dispatch::apply, registry::HookRegistry, report::DispatchReport},
};

/// Applies the hooks of a [`HookRegistry`] to classes as they are loaded.
///
/// Every class is transformed at most once. The transformer records the names of the classes it
/// has patched; transforming one of them again leaves it untouched and reports every hook that
/// targets it as [`HookStatus::AlreadyApplied`].
///
/// The first call to [`Self::transform`] seals the registry.
///
/// # Thread Safety
///
/// `ClassTransformer` is [`Send`] and [`Sync`]. Different classes can be transformed from
/// different threads; each class is transformed start to finish on the calling thread.
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::bytecode::{opcodes::*, Instruction};
/// use bytehook::config::TransformerConfig;
/// use bytehook::hook::{Hook, HookStatus};
/// use bytehook::mapping::SymbolRef;
/// use bytehook::transformer::{ClassNode, ClassTransformer, HookRegistry, MethodAccessFlags, MethodNode};
///
/// let registry = HookRegistry::new(TransformerConfig::production());
/// registry.register(
///     Hook::new(
///         "tick",
///         SymbolRef::method("net/minecraft/client/Minecraft", "runTick", "func_71407_l", "()V"),
///     )
///     .insert(vec![Instruction::method(INVOKESTATIC, "a/Counter", "tick", "()V")]),
/// )?;
///
/// let transformer = ClassTransformer::new(registry);
/// let mut class = ClassNode::new("net.minecraft.client.Minecraft").with_method(MethodNode::new(
///     "func_71407_l",
///     "()V",
///     MethodAccessFlags::PUBLIC,
///     vec![Instruction::simple(RETURN)],
/// ));
///
/// let report = transformer.transform(&mut class).into_result()?;
/// assert!(report.is_modified());
///
/// let again = transformer.transform(&mut class);
/// assert_eq!(again.status("tick"), Some(&HookStatus::AlreadyApplied));
/// # Ok::<(), bytehook::Error>(())
/// ```
#[derive(Debug)]
pub struct ClassTransformer {
    registry: HookRegistry,
    transformed: DashSet<String>,
}

impl ClassTransformer {
    /// Creates a transformer over the hooks of `registry`.
    #[must_use]
    pub fn new(registry: HookRegistry) -> Self {
        ClassTransformer {
            registry,
            transformed: DashSet::new(),
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TransformerConfig {
        self.registry.config()
    }

    /// Returns `true` if `class_name`, in binary or internal form, was already transformed.
    #[must_use]
    pub fn is_transformed(&self, class_name: &str) -> bool {
        self.transformed.contains(&internal_name(class_name))
    }

    /// Applies every hook targeting `class` to its methods.
    ///
    /// Classes without hooks are returned untouched with an empty report and are not recorded
    /// as transformed. The report carries the internal name of the class, whichever form
    /// [`ClassNode::name`] holds.
    pub fn transform(&self, class: &mut ClassNode) -> DispatchReport {
        self.registry.seal();

        let class_name = internal_name(&class.name);
        let hooks = self.registry.hooks_for(&class_name);
        if hooks.is_empty() {
            return DispatchReport::new(class_name, Vec::new());
        }

        if !self.transformed.insert(class_name.clone()) {
            warn!(
                "{class_name} was already transformed, {} hook(s) not applied again",
                hooks.len()
            );
            let results = hooks
                .iter()
                .map(|hook| {
                    HookResult::new(
                        hook.name(),
                        hook.target().member_ref(self.config().mode),
                        HookStatus::AlreadyApplied,
                    )
                })
                .collect();
            return DispatchReport::new(class_name, results);
        }

        debug!("transforming {class_name} with {} hook(s)", hooks.len());
        let results = apply(
            &class_name,
            &mut class.methods,
            hooks.iter().map(Arc::as_ref),
            self.config(),
        );
        DispatchReport::new(class_name, results)
    }

    /// Transforms independent classes in parallel.
    ///
    /// Returns one report per class, in the order of `classes`.
    pub fn transform_all(&self, classes: &mut [ClassNode]) -> Vec<DispatchReport> {
        classes
            .par_iter_mut()
            .map(|class| self.transform(class))
            .collect()
    }

    /// Returns every registered hook, for diagnostics.
    #[must_use]
    pub fn hooks(&self) -> Vec<Arc<Hook>> {
        self.registry
            .target_classes()
            .iter()
            .flat_map(|class| self.registry.hooks_for(class))
            .collect()
    }
}
