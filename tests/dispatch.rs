//! Integration tests for registration and class dispatch.
//!
//! These tests drive the full load-time pipeline: hooks are registered against a symbol table,
//! the registry is handed to a [`ClassTransformer`], and classes are transformed one by one or
//! in parallel, in both mapping modes.

use bytehook::{
    bytecode::{opcodes::*, Instruction, MemberRef},
    hook::{Hook, HookPriority, HookStatus},
    mapping::{MappingMode, SymbolRef, SymbolTable},
    pattern::Pattern,
    transformer::{
        ClassNode, ClassTransformer, DispatchReport, HookRegistry, MethodAccessFlags, MethodNode,
    },
    Error, Result, TransformerConfig,
};

const MINECRAFT: &str = "net/minecraft/client/Minecraft";
const WORLD: &str = "net/minecraft/world/World";
const COUNTER: &str = "net/malisis/core/util/TickCounter";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run_tick() -> SymbolRef {
    SymbolRef::method(MINECRAFT, "runTick", "func_71407_l", "()V")
}

fn update_entities() -> SymbolRef {
    SymbolRef::method(WORLD, "updateEntities", "func_72939_s", "()V")
}

fn count(name: &str) -> Instruction {
    Instruction::method(INVOKESTATIC, COUNTER, name, "()V")
}

fn tick_hook(name: &str, target: SymbolRef) -> Hook {
    Hook::new(name, target).insert(vec![count(name)])
}

/// A class with one hookable method, named for `mode`.
fn class(owner: &str, method: &SymbolRef, mode: MappingMode) -> ClassNode {
    ClassNode::new(owner).with_method(MethodNode::new(
        method.resolve(mode),
        method.descriptor(),
        MethodAccessFlags::PUBLIC,
        vec![
            Instruction::local(ALOAD, 0),
            Instruction::method(INVOKESPECIAL, owner, "tickInternal", "()V"),
            Instruction::simple(RETURN),
        ],
    ))
}

fn body<'a>(class: &'a ClassNode, method: &SymbolRef, mode: MappingMode) -> &'a [Instruction] {
    class
        .methods
        .find(method.resolve(mode), method.descriptor())
        .map(|m| m.instructions.as_slice())
        .unwrap_or_default()
}

/// Symbols of a shipped build: only remapped names exist.
fn remapped_symbols() -> SymbolTable {
    let symbols = SymbolTable::new();
    for class in [
        class(MINECRAFT, &run_tick(), MappingMode::Remapped),
        class(WORLD, &update_entities(), MappingMode::Remapped),
    ] {
        class.declare_members(&symbols);
    }
    symbols
}

#[test]
fn test_transform_in_both_modes() -> Result<()> {
    init_logging();
    for mode in [MappingMode::Named, MappingMode::Remapped] {
        let registry = HookRegistry::new(TransformerConfig::development().with_mode(mode));
        registry.register(tick_hook("client-tick", run_tick()))?;
        let transformer = ClassTransformer::new(registry);

        let mut minecraft = class("net.minecraft.client.Minecraft", &run_tick(), mode);
        let report = transformer.transform(&mut minecraft).into_result()?;

        assert!(report.is_modified(), "{mode}");
        assert_eq!(body(&minecraft, &run_tick(), mode)[0], count("client-tick"));
        assert_eq!(
            report.get("client-tick").map(|r| &r.target),
            Some(&MemberRef::new(MINECRAFT, run_tick().resolve(mode), "()V"))
        );
    }
    Ok(())
}

#[test]
fn test_wrong_mode_reports_target_not_found() -> Result<()> {
    let registry = HookRegistry::new(TransformerConfig::production());
    registry.register(tick_hook("client-tick", run_tick()))?;
    let transformer = ClassTransformer::new(registry);

    // development class, shipped configuration
    let mut minecraft = class(MINECRAFT, &run_tick(), MappingMode::Named);
    let before = minecraft.clone();
    let report = transformer.transform(&mut minecraft);

    assert_eq!(report.status("client-tick"), Some(&HookStatus::TargetNotFound));
    assert_eq!(minecraft, before);
    match report.into_result() {
        Err(Error::HookFailed { class, failures }) => {
            assert_eq!(class, MINECRAFT);
            match failures.as_slice() {
                [Error::TargetNotFound {
                    hook,
                    name,
                    descriptor,
                    ..
                }] => {
                    assert_eq!(hook, "client-tick");
                    assert_eq!(name, "func_71407_l");
                    assert_eq!(descriptor, "()V");
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[test]
fn test_registration_validates_members() -> Result<()> {
    let registry =
        HookRegistry::new(TransformerConfig::production()).with_symbols(remapped_symbols());

    registry.register(tick_hook("client-tick", run_tick()))?;
    registry.register(tick_hook("world-tick", update_entities()))?;

    // renamed in a newer version: rejected before any class is loaded
    let stale = tick_hook(
        "stale",
        SymbolRef::method(MINECRAFT, "runGameLoop", "func_71411_J", "()V"),
    );
    assert!(matches!(
        registry.register(stale),
        Err(Error::Configuration { .. })
    ));

    let field = Hook::new(
        "field",
        SymbolRef::field(
            MINECRAFT,
            "thePlayer",
            "field_71439_g",
            "Lnet/minecraft/client/entity/EntityPlayerSP;",
        ),
    );
    assert!(matches!(
        registry.register(field),
        Err(Error::Configuration { .. })
    ));

    assert_eq!(registry.len(), 2);
    let mut targets = registry.target_classes();
    targets.sort();
    assert_eq!(targets, [MINECRAFT, WORLD]);
    Ok(())
}

#[test]
fn test_priority_order_in_report() -> Result<()> {
    let registry = HookRegistry::new(TransformerConfig::production());
    registry.register_all([
        tick_hook("normal", run_tick()),
        tick_hook("first", run_tick()).with_priority(HookPriority::HIGHEST),
        tick_hook("last", run_tick()).with_priority(HookPriority::LOWEST),
    ])?;
    let transformer = ClassTransformer::new(registry);

    let mut minecraft = class(MINECRAFT, &run_tick(), MappingMode::Remapped);
    let report = transformer.transform(&mut minecraft).into_result()?;

    let order: Vec<&str> = report.results.iter().map(|r| r.hook.as_str()).collect();
    assert_eq!(order, ["first", "normal", "last"]);

    // every hook inserts at the start, so the last one applied ends up first
    let patched = body(&minecraft, &run_tick(), MappingMode::Remapped);
    assert_eq!(&patched[..3], [count("last"), count("normal"), count("first")]);
    Ok(())
}

#[test]
fn test_rollback_in_development() -> Result<()> {
    let stale = Hook::new("stale", run_tick())
        .insert(vec![count("stale")])
        .seek_past(Pattern::single(Instruction::simple(ATHROW)))
        .insert(vec![count("after-throw")]);

    for (config, rolled_back) in [
        (TransformerConfig::development().with_mode(MappingMode::Remapped), true),
        (TransformerConfig::production(), false),
    ] {
        let registry = HookRegistry::new(config);
        registry.register(stale.clone())?;
        registry.register(tick_hook("good", run_tick()).with_priority(HookPriority::LOW))?;
        let transformer = ClassTransformer::new(registry);

        let mut minecraft = class(MINECRAFT, &run_tick(), MappingMode::Remapped);
        let report = transformer.transform(&mut minecraft);
        let result = report.get("stale").unwrap();

        assert_eq!(result.rolled_back, rolled_back);
        assert!(matches!(
            result.status,
            HookStatus::PatternNotFound {
                op_index: 1,
                partial_edits: 1,
                ..
            }
        ));
        assert!(report.status("good").is_some_and(HookStatus::is_applied));

        let patched = body(&minecraft, &run_tick(), MappingMode::Remapped);
        assert_eq!(patched[0], count("good"));
        assert_eq!(patched.contains(&count("stale")), !rolled_back);
    }
    Ok(())
}

#[test]
fn test_transform_all_independent_classes() -> Result<()> {
    init_logging();
    let registry =
        HookRegistry::new(TransformerConfig::production()).with_symbols(remapped_symbols());
    registry.register(tick_hook("client-tick", run_tick()))?;
    registry.register(tick_hook("world-tick", update_entities()))?;
    let transformer = ClassTransformer::new(registry);

    let mut classes = vec![
        class(MINECRAFT, &run_tick(), MappingMode::Remapped),
        class(WORLD, &update_entities(), MappingMode::Remapped),
        ClassNode::new("net/minecraft/util/Timer"),
    ];
    let reports = transformer.transform_all(&mut classes);

    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(DispatchReport::is_clean));
    assert!(reports[0].is_modified() && reports[1].is_modified());
    assert!(reports[2].results.is_empty());
    assert_eq!(body(&classes[0], &run_tick(), MappingMode::Remapped)[0], count("client-tick"));
    assert_eq!(body(&classes[1], &update_entities(), MappingMode::Remapped)[0], count("world-tick"));

    // a class reloaded later is not patched twice
    let mut reloaded = class(WORLD, &update_entities(), MappingMode::Remapped);
    let report = transformer.transform(&mut reloaded);
    assert_eq!(report.status("world-tick"), Some(&HookStatus::AlreadyApplied));
    assert_eq!(reloaded, class(WORLD, &update_entities(), MappingMode::Remapped));

    assert!(matches!(
        transformer.registry().register(tick_hook("late", run_tick())),
        Err(Error::RegistrationClosed)
    ));
    Ok(())
}
