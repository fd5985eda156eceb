//! Start-up registration of hooks.
//!
//! This module provides [`HookRegistry`], which validates hooks as they are registered and
//! indexes them by the class they patch.

use std::{
    cmp::Reverse,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock,
    },
};

use dashmap::{DashMap, DashSet};
use log::debug;

use crate::{
    config::TransformerConfig,
    hook::Hook,
    mapping::{internal_name, SymbolTable},
    Error, Result,
};

/// Registry of all hooks, indexed by target class.
///
/// Hooks are registered during start-up. Registration validates each hook and fails fast on
/// definition errors, so a broken hook stops start-up before any class is loaded. Once the first
/// class is transformed the registry is sealed and further registrations fail with
/// [`Error::RegistrationClosed`].
///
/// Hooks for the same class are kept sorted by priority, highest first, in registration order
/// within one priority.
///
/// Registration and sealing may race from different threads: a registration either completes
/// before [`Self::seal`] returns or fails with [`Error::RegistrationClosed`]. Class names are
/// accepted in binary (`a.b.C`) or internal (`a/b/C`) form.
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::config::TransformerConfig;
/// use bytehook::hook::Hook;
/// use bytehook::mapping::{SymbolRef, SymbolTable};
/// use bytehook::transformer::HookRegistry;
///
/// let symbols = SymbolTable::new();
/// symbols.declare_method("net/minecraft/client/Minecraft", "func_71407_l", "()V");
///
/// let registry = HookRegistry::new(TransformerConfig::production()).with_symbols(symbols);
/// registry.register(Hook::new(
///     "tick",
///     SymbolRef::method("net/minecraft/client/Minecraft", "runTick", "func_71407_l", "()V"),
/// ))?;
///
/// assert_eq!(registry.hooks_for("net/minecraft/client/Minecraft").len(), 1);
/// # Ok::<(), bytehook::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct HookRegistry {
    config: TransformerConfig,
    symbols: Option<SymbolTable>,
    hooks: DashMap<String, Vec<Arc<Hook>>>,
    names: DashSet<String>,
    sealed: AtomicBool,
    gate: RwLock<()>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: TransformerConfig) -> Self {
        HookRegistry {
            config,
            ..Self::default()
        }
    }

    /// Sets the table used to validate hook targets.
    #[must_use]
    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Returns the symbol table, if one was supplied.
    #[must_use]
    pub fn symbols(&self) -> Option<&SymbolTable> {
        self.symbols.as_ref()
    }

    /// Validates and registers a hook.
    ///
    /// # Errors
    ///
    /// - [`Error::RegistrationClosed`] once dispatch has begun
    /// - [`Error::Configuration`] if a hook with the same name exists, or member validation is
    ///   enabled and the target method or a member referred to through
    ///   [`crate::bytecode::Instruction::symbol`] is not declared under either name
    /// - Any error of [`Hook::validate`]
    pub fn register(&self, hook: Hook) -> Result<()> {
        let _open = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        if self.is_sealed() {
            return Err(Error::RegistrationClosed);
        }

        hook.validate()?;
        self.validate_target(&hook)?;

        if !self.names.insert(hook.name().to_string()) {
            return Err(config_error!("hook '{}' is already registered", hook.name()));
        }

        debug!(
            "registered hook '{}' for {} ({} op(s))",
            hook.name(),
            hook.target(),
            hook.ops().len()
        );

        let mut hooks = self.hooks.entry(hook.target_class().to_string()).or_default();
        hooks.push(Arc::new(hook));
        hooks.sort_by_key(|h| Reverse(h.priority()));
        Ok(())
    }

    /// Registers every hook of `hooks`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`Self::register`].
    pub fn register_all(&self, hooks: impl IntoIterator<Item = Hook>) -> Result<()> {
        hooks.into_iter().try_for_each(|hook| self.register(hook))
    }

    fn validate_target(&self, hook: &Hook) -> Result<()> {
        if !self.config.validate_members {
            return Ok(());
        }

        match &self.symbols {
            Some(symbols) => {
                symbols.validate(hook.target())?;
                hook.symbols().try_for_each(|symbol| symbols.validate(symbol))
            }
            None => {
                debug!(
                    "no symbol table, member validation skipped for '{}'",
                    hook.name()
                );
                Ok(())
            }
        }
    }

    /// Closes registration.
    ///
    /// Called by [`crate::transformer::ClassTransformer`] before the first class is
    /// transformed. Waits for registrations in flight; none is accepted after it returns.
    pub fn seal(&self) {
        if self.is_sealed() {
            return;
        }

        let _closing = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        if !self.sealed.swap(true, Ordering::AcqRel) {
            debug!("hook registration closed with {} hook(s)", self.len());
        }
    }

    /// Returns `true` once registration is closed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Returns the hooks patching `class_name`, in application order.
    #[must_use]
    pub fn hooks_for(&self, class_name: &str) -> Vec<Arc<Hook>> {
        self.hooks
            .get(&internal_name(class_name))
            .map(|hooks| hooks.value().clone())
            .unwrap_or_default()
    }

    /// Returns `true` if at least one hook patches `class_name`.
    #[must_use]
    pub fn targets(&self, class_name: &str) -> bool {
        self.hooks.contains_key(&internal_name(class_name))
    }

    /// Returns the internal names of all hooked classes.
    #[must_use]
    pub fn target_classes(&self) -> Vec<String> {
        self.hooks.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Returns the number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{opcodes, Instruction};
    use crate::hook::HookPriority;
    use crate::mapping::SymbolRef;
    use crate::pattern::Pattern;
    use crate::test::factories::{insn, pattern};
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    const CLASS: &str = "net/minecraft/client/Minecraft";

    fn hook(name: &str) -> Hook {
        Hook::new(name, SymbolRef::method(CLASS, "runTick", "func_71407_l", "()V"))
            .seek_past(pattern("A"))
            .insert(vec![insn('X')])
    }

    #[test]
    fn test_register_and_lookup() -> Result<()> {
        let registry = HookRegistry::new(TransformerConfig::production());
        registry.register(hook("first"))?;
        registry.register(hook("second"))?;

        assert_eq!(registry.len(), 2);
        assert!(registry.targets(CLASS));
        assert!(!registry.targets("net/minecraft/world/World"));
        assert!(registry.hooks_for("net/minecraft/world/World").is_empty());
        assert!(registry.targets("net.minecraft.client.Minecraft"));
        assert_eq!(registry.hooks_for("net.minecraft.client.Minecraft").len(), 2);
        assert_eq!(registry.target_classes(), vec![CLASS.to_string()]);
        Ok(())
    }

    #[test]
    fn test_priority_then_registration_order() -> Result<()> {
        let registry = HookRegistry::new(TransformerConfig::minimal());
        registry.register_all([
            hook("normal-1"),
            hook("low").with_priority(HookPriority::LOW),
            hook("high").with_priority(HookPriority::HIGH),
            hook("normal-2"),
        ])?;

        let order: Vec<String> = registry
            .hooks_for(CLASS)
            .iter()
            .map(|h| h.name().to_string())
            .collect();
        assert_eq!(order, ["high", "normal-1", "normal-2", "low"]);
        Ok(())
    }

    #[test]
    fn test_duplicate_name_rejected() -> Result<()> {
        let registry = HookRegistry::new(TransformerConfig::minimal());
        registry.register(hook("tick"))?;
        assert!(matches!(
            registry.register(hook("tick")),
            Err(Error::Configuration { .. })
        ));
        assert_eq!(registry.len(), 1);
        Ok(())
    }

    #[test]
    fn test_sealed_registry_rejects() {
        let registry = HookRegistry::new(TransformerConfig::minimal());
        registry.seal();
        assert!(registry.is_sealed());
        assert!(matches!(
            registry.register(hook("late")),
            Err(Error::RegistrationClosed)
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_member_validation() -> Result<()> {
        let symbols = SymbolTable::new();
        symbols.declare_method(CLASS, "func_71407_l", "()V");
        let registry = HookRegistry::new(TransformerConfig::production()).with_symbols(symbols);

        registry.register(hook("known"))?;

        let missing = Hook::new(
            "missing",
            SymbolRef::method(CLASS, "runGameLoop", "func_71411_J", "()V"),
        );
        assert!(matches!(
            registry.register(missing),
            Err(Error::Configuration { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_referenced_members_validated() -> Result<()> {
        const KEY_BINDING: &str = "net/minecraft/client/settings/KeyBinding";
        let symbols = SymbolTable::new();
        symbols.declare_method(CLASS, "func_71407_l", "()V");
        symbols.declare_method(KEY_BINDING, "func_74510_a", "(IZ)V");
        let registry = HookRegistry::new(TransformerConfig::production()).with_symbols(symbols);

        let seek = |name: &str, symbol: SymbolRef| {
            Hook::new(name, SymbolRef::method(CLASS, "runTick", "func_71407_l", "()V"))
                .seek_past(Pattern::single(Instruction::symbol(opcodes::INVOKESTATIC, symbol)))
        };

        registry.register(seek(
            "declared",
            SymbolRef::method(KEY_BINDING, "setKeyBindState", "func_74510_a", "(IZ)V"),
        ))?;

        let renamed = seek(
            "renamed",
            SymbolRef::method(KEY_BINDING, "onTick", "func_74507_a", "(I)V"),
        );
        assert!(matches!(
            registry.register(renamed),
            Err(Error::Configuration { ref message, .. }) if message.contains("func_74507_a")
        ));
        assert_eq!(registry.len(), 1);
        Ok(())
    }

    #[test]
    fn test_seal_waits_for_registrations_in_flight() {
        let registry = HookRegistry::new(TransformerConfig::minimal());
        let accepted = AtomicUsize::new(0);

        let sealed_with = thread::scope(|scope| {
            for worker in 0..4 {
                let (registry, accepted) = (&registry, &accepted);
                scope.spawn(move || {
                    for i in 0..200 {
                        match registry.register(hook(&format!("hook-{worker}-{i}"))) {
                            Ok(()) => {
                                accepted.fetch_add(1, Ordering::SeqCst);
                            }
                            Err(Error::RegistrationClosed) => break,
                            Err(err) => panic!("unexpected {err:?}"),
                        }
                    }
                });
            }

            let sealer = scope.spawn(|| {
                thread::yield_now();
                registry.seal();
                registry.hooks_for(CLASS).len()
            });
            sealer.join().unwrap()
        });

        assert_eq!(registry.hooks_for(CLASS).len(), sealed_with);
        assert_eq!(registry.len(), sealed_with);
        assert_eq!(accepted.load(Ordering::SeqCst), sealed_with);
    }

    #[test]
    fn test_member_validation_skipped_without_table() -> Result<()> {
        let registry = HookRegistry::new(TransformerConfig::production());
        registry.register(Hook::new(
            "unchecked",
            SymbolRef::method(CLASS, "runGameLoop", "func_71411_J", "()V"),
        ))?;
        assert!(registry.symbols().is_none());
        Ok(())
    }

    #[test]
    fn test_invalid_hook_rejected() {
        let registry = HookRegistry::new(TransformerConfig::minimal());
        let broken = Hook::new("broken", SymbolRef::unmapped_method(CLASS, "run", "()V"))
            .insert(vec![Instruction::int(opcodes::ALOAD, 1)]);
        assert!(matches!(
            registry.register(broken),
            Err(Error::OperandMismatch { .. })
        ));
        assert!(registry.is_empty());
    }
}
