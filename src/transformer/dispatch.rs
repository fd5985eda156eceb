//! Per-class hook dispatch.
//!
//! [`apply`] is the single entry point that patches one class: it runs every hook that targets
//! the class against the matching method body and reports one [`HookResult`] per hook.

use std::collections::HashSet;

use log::{debug, error, info, warn};

use crate::{
    bytecode::MemberRef,
    config::TransformerConfig,
    hook::{EditContext, Hook, HookResult, HookStatus, SeekFailure},
    mapping::internal_name,
    transformer::class::MethodTable,
};

/// Applies `hooks` to the methods of the class `class_name`.
///
/// For every hook, in the order given:
///
/// 1. Hooks whose target type is not `class_name` are reported as [`HookStatus::Skipped`]
/// 2. The target method is looked up by its name for [`TransformerConfig::mode`] and its
///    descriptor; a missing or bodiless method is reported as [`HookStatus::TargetNotFound`]
/// 3. The edit chain runs against the method body, which is patched in place. Mapped members
///    in its patterns and inserted code are resolved for [`TransformerConfig::mode`]
/// 4. With [`TransformerConfig::verify_labels`] the labels of the patched body are checked.
///    Only faults the hook introduced fail it; faults left by earlier hooks are not its own
///
/// A hook that fails does not stop the others. Its partial edits stay in the body unless
/// [`TransformerConfig::rollback_on_failure`] is set. A hook appearing twice in `hooks` (by
/// name) runs once; the repetition is reported as [`HookStatus::AlreadyApplied`].
///
/// Class names may be given in binary (`a.b.C`) or internal (`a/b/C`) form.
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::bytecode::{opcodes::*, Instruction};
/// use bytehook::config::TransformerConfig;
/// use bytehook::hook::{Hook, HookStatus};
/// use bytehook::mapping::SymbolRef;
/// use bytehook::transformer::{apply, MethodAccessFlags, MethodNode, MethodTable};
///
/// let mut methods: MethodTable = [MethodNode::new(
///     "func_71407_l",
///     "()V",
///     MethodAccessFlags::PUBLIC,
///     vec![Instruction::simple(RETURN)],
/// )]
/// .into_iter()
/// .collect();
///
/// let hook = Hook::new(
///     "tick-counter",
///     SymbolRef::method("net/minecraft/client/Minecraft", "runTick", "func_71407_l", "()V"),
/// )
/// .insert(vec![Instruction::method(INVOKESTATIC, "a/Counter", "tick", "()V")]);
///
/// let results = apply(
///     "net.minecraft.client.Minecraft",
///     &mut methods,
///     [&hook],
///     &TransformerConfig::production(),
/// );
/// assert_eq!(results[0].status, HookStatus::Applied { edits: 1 });
/// ```
pub fn apply<'a, I>(
    class_name: &str,
    methods: &mut MethodTable,
    hooks: I,
    config: &TransformerConfig,
) -> Vec<HookResult>
where
    I: IntoIterator<Item = &'a Hook>,
{
    let class_name = internal_name(class_name);
    let mut seen = HashSet::new();

    hooks
        .into_iter()
        .map(|hook| {
            let target = hook.target().member_ref(config.mode);
            if hook.target_class() != class_name {
                return HookResult::new(hook.name(), target, HookStatus::Skipped);
            }
            if !seen.insert(hook.name()) {
                warn!("hook '{}' listed twice for {class_name}", hook.name());
                return HookResult::new(hook.name(), target, HookStatus::AlreadyApplied);
            }
            apply_hook(&class_name, methods, hook, target, config)
        })
        .collect()
}

fn apply_hook(
    class_name: &str,
    methods: &mut MethodTable,
    hook: &Hook,
    target: MemberRef,
    config: &TransformerConfig,
) -> HookResult {
    let name = hook.target().resolve(config.mode);
    let descriptor = hook.target().descriptor();

    let Some(method) = methods.find_mut(name, descriptor) else {
        error!("hook '{}': no method {name}{descriptor} in {class_name}", hook.name());
        return HookResult::new(hook.name(), target, HookStatus::TargetNotFound);
    };
    if !method.has_body() {
        warn!(
            "hook '{}': {name}{descriptor} in {class_name} has no body ({:?})",
            hook.name(),
            method.access
        );
        return HookResult::new(hook.name(), target, HookStatus::TargetNotFound);
    }

    let snapshot = config
        .rollback_on_failure
        .then(|| method.instructions.clone());
    let baseline = config
        .verify_labels
        .then(|| method.instructions.label_faults());

    let mut status = {
        let mut ctx = EditContext::new(hook, &mut method.instructions, config.mode);
        match ctx.run() {
            Ok(edits) => HookStatus::Applied { edits },
            Err(SeekFailure {
                op_index, pattern, ..
            }) => HookStatus::PatternNotFound {
                op_index,
                pattern,
                partial_edits: ctx.edits(),
            },
        }
    };

    if let Some(baseline) = baseline.as_ref().filter(|_| status.is_applied()) {
        if !baseline.is_empty() {
            debug!(
                "hook '{}': {name}{descriptor} had {} label fault(s) before it ran",
                hook.name(),
                baseline.len()
            );
        }
        if let Some(fault) = method.instructions.label_faults().difference(baseline).next() {
            status = HookStatus::InvalidLabels(fault.clone());
        }
    }

    let mut result = HookResult::new(hook.name(), target, status);
    match &result.status {
        HookStatus::Applied { edits } => {
            info!("hook '{}' applied to {} ({edits} edit(s))", hook.name(), result.target);
        }
        status => {
            error!("hook '{}' failed on {}: {status}", hook.name(), result.target);
            if let Some(original) = snapshot {
                method.instructions = original;
                result.rolled_back = true;
                debug!("hook '{}': restored {name}{descriptor}", hook.name());
            } else if matches!(status, HookStatus::PatternNotFound { partial_edits, .. } if *partial_edits > 0)
            {
                warn!(
                    "hook '{}' left {name}{descriptor} partially patched",
                    hook.name()
                );
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{opcodes::*, Instruction, LabelFault};
    use crate::mapping::{MappingMode, SymbolRef};
    use crate::pattern::Pattern;
    use crate::test::factories::{insn, pattern, stream};
    use crate::test::init_logging;
    use crate::transformer::class::{MethodAccessFlags, MethodNode};

    const CLASS: &str = "net/minecraft/client/Minecraft";

    fn run_tick() -> SymbolRef {
        SymbolRef::method(CLASS, "runTick", "func_71407_l", "()V")
    }

    fn methods(body: &str) -> MethodTable {
        [MethodNode::new(
            "func_71407_l",
            "()V",
            MethodAccessFlags::PUBLIC,
            stream(body).into_vec(),
        )]
        .into_iter()
        .collect()
    }

    fn body(methods: &MethodTable) -> &[Instruction] {
        methods
            .find("func_71407_l", "()V")
            .map(|m| m.instructions.as_slice())
            .unwrap_or_default()
    }

    #[test]
    fn test_applied_in_place() {
        init_logging();
        let mut table = methods("ABCD");
        let hook = Hook::new("insert", run_tick())
            .seek_past(pattern("B"))
            .insert(vec![insn('X')]);

        let results = apply(
            "net.minecraft.client.Minecraft",
            &mut table,
            [&hook],
            &TransformerConfig::production(),
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, HookStatus::Applied { edits: 1 });
        assert_eq!(
            results[0].target,
            MemberRef::new("net/minecraft/client/Minecraft", "func_71407_l", "()V")
        );
        assert_eq!(body(&table), stream("ABXCD").as_slice());
    }

    #[test]
    fn test_skipped_for_other_class() {
        let mut table = methods("AB");
        let other = Hook::new(
            "other",
            SymbolRef::unmapped_method("net/minecraft/world/World", "tick", "()V"),
        )
        .insert(vec![insn('X')]);

        let results = apply(CLASS, &mut table, [&other], &TransformerConfig::production());
        assert_eq!(results[0].status, HookStatus::Skipped);
        assert_eq!(body(&table), stream("AB").as_slice());
    }

    #[test]
    fn test_target_not_found_in_wrong_mode() {
        let mut table = methods("AB");
        let hook = Hook::new("named", run_tick()).insert(vec![insn('X')]);

        let config = TransformerConfig::production().with_mode(MappingMode::Named);
        let results = apply(CLASS, &mut table, [&hook], &config);
        assert_eq!(results[0].status, HookStatus::TargetNotFound);
    }

    #[test]
    fn test_abstract_target() {
        let mut table: MethodTable = [MethodNode::new(
            "func_71407_l",
            "()V",
            MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT,
            Vec::new(),
        )]
        .into_iter()
        .collect();
        let hook = Hook::new("abstract", run_tick()).insert(vec![insn('X')]);

        let results = apply(CLASS, &mut table, [&hook], &TransformerConfig::production());
        assert_eq!(results[0].status, HookStatus::TargetNotFound);
        assert!(body(&table).is_empty());
    }

    #[test]
    fn test_failure_is_per_hook() {
        let mut table = methods("ABCD");
        let stale = Hook::new("stale", run_tick()).seek_past(pattern("Z"));
        let good = Hook::new("good", run_tick())
            .seek_to(pattern("D"))
            .insert(vec![insn('Y')]);

        let results = apply(CLASS, &mut table, [&stale, &good], &TransformerConfig::production());
        assert!(matches!(
            results[0].status,
            HookStatus::PatternNotFound {
                op_index: 0,
                partial_edits: 0,
                ..
            }
        ));
        assert!(results[1].status.is_applied());
        assert_eq!(body(&table), stream("ABCYD").as_slice());
    }

    #[test]
    fn test_partial_edits_kept_without_rollback() {
        let mut table = methods("ABCD");
        let hook = Hook::new("partial", run_tick())
            .seek_past(pattern("A"))
            .insert(vec![insn('X')])
            .seek_past(pattern("Z"));

        let results = apply(CLASS, &mut table, [&hook], &TransformerConfig::production());
        assert!(!results[0].rolled_back);
        assert!(matches!(
            results[0].status,
            HookStatus::PatternNotFound { partial_edits: 1, .. }
        ));
        assert_eq!(body(&table), stream("AXBCD").as_slice());
    }

    #[test]
    fn test_rollback_restores_body() {
        let mut table = methods("ABCD");
        let hook = Hook::new("partial", run_tick())
            .seek_past(pattern("A"))
            .insert(vec![insn('X')])
            .seek_past(pattern("Z"));

        let config = TransformerConfig::production().with_rollback(true);
        let results = apply(CLASS, &mut table, [&hook], &config);
        assert!(results[0].rolled_back);
        assert_eq!(body(&table), stream("ABCD").as_slice());
    }

    #[test]
    fn test_dangling_label_rejected_at_commit() {
        let mut table = methods("AB");
        let hook = Hook::new("dangling", run_tick())
            .insert(vec![Instruction::jump(GOTO, "nowhere")]);

        let results = apply(CLASS, &mut table, [&hook], &TransformerConfig::development().with_mode(MappingMode::Remapped));
        assert!(matches!(
            results[0].status,
            HookStatus::InvalidLabels(LabelFault::Undefined(ref label)) if label.name() == "nowhere"
        ));
        assert!(results[0].rolled_back);
        assert_eq!(body(&table), stream("AB").as_slice());

        let unchecked = TransformerConfig::minimal().with_mode(MappingMode::Remapped);
        let results = apply(CLASS, &mut table, [&hook], &unchecked);
        assert!(results[0].status.is_applied());
    }

    #[test]
    fn test_same_hook_twice_runs_once() {
        let mut table = methods("ABC");
        let hook = Hook::new("once", run_tick()).replace(pattern("B"), vec![insn('X')]);

        let results = apply(CLASS, &mut table, [&hook, &hook], &TransformerConfig::production());
        assert!(results[0].status.is_applied());
        assert_eq!(results[1].status, HookStatus::AlreadyApplied);
        assert_eq!(body(&table), stream("AXC").as_slice());

        // a second dispatch pass no longer finds the replaced pattern
        let results = apply(CLASS, &mut table, [&hook], &TransformerConfig::production());
        assert!(matches!(results[0].status, HookStatus::PatternNotFound { .. }));
    }

    #[test]
    fn test_label_faults_of_earlier_hook_not_attributed() {
        let mut table = methods("ABCD");
        let stale = Hook::new("stale", run_tick())
            .insert(vec![Instruction::jump(IFEQ, "skip")])
            .seek_past(Pattern::single(Instruction::simple(ATHROW)))
            .mark_label("skip");
        let good = Hook::new("good", run_tick())
            .seek_to(pattern("D"))
            .insert(vec![insn('Y')]);

        let results = apply(CLASS, &mut table, [&stale, &good], &TransformerConfig::production());
        assert!(matches!(
            results[0].status,
            HookStatus::PatternNotFound {
                op_index: 1,
                partial_edits: 1,
                ..
            }
        ));
        assert_eq!(results[1].status, HookStatus::Applied { edits: 1 });
        assert_eq!(body(&table)[0], Instruction::jump(IFEQ, "stale:skip"));
        assert_eq!(body(&table)[4], insn('Y'));

        // a fault of its own still fails a hook on the already broken body
        let dangling = Hook::new("dangling", run_tick()).insert(vec![Instruction::jump(GOTO, "gone")]);
        let results = apply(CLASS, &mut table, [&dangling], &TransformerConfig::production());
        assert!(matches!(
            results[0].status,
            HookStatus::InvalidLabels(LabelFault::Undefined(ref label)) if label.name() == "gone"
        ));
    }

    #[test]
    fn test_mapped_pattern_follows_dispatch_mode() {
        let set = SymbolRef::method(
            "net/minecraft/client/settings/KeyBinding",
            "setKeyBindState",
            "func_74510_a",
            "(IZ)V",
        );
        let hook = Hook::new("key-bind", run_tick())
            .seek_past(Pattern::single(Instruction::symbol(INVOKESTATIC, set.clone())))
            .insert(vec![insn('X')]);

        for mode in [MappingMode::Named, MappingMode::Remapped] {
            let mut table: MethodTable = [MethodNode::new(
                run_tick().resolve(mode),
                "()V",
                MethodAccessFlags::PUBLIC,
                vec![insn('A'), set.instruction(INVOKESTATIC, mode), Instruction::simple(RETURN)],
            )]
            .into_iter()
            .collect();

            let config = TransformerConfig::production().with_mode(mode);
            let results = apply(CLASS, &mut table, [&hook], &config);
            assert_eq!(results[0].status, HookStatus::Applied { edits: 1 }, "{mode}");
            let patched = table
                .find(run_tick().resolve(mode), "()V")
                .map(|m| m.instructions.as_slice())
                .unwrap_or_default();
            assert_eq!(patched[2], insn('X'), "{mode}");
        }
    }
}
