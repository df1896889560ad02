//! # Statistics Tests
//!
//! Instruction mix, control-flow counters and compute unit counters.

use tandem_core::stats::{STATS_SECTIONS, SimStats};

use crate::common::TestContext;

#[test]
fn test_default_is_zero() {
    let stats = SimStats::default();
    assert_eq!(stats.instructions_retired, 0);
    assert_eq!(stats.micro_ops, 0);
    assert_eq!(stats.faults, 0);
}

#[test]
fn test_instruction_mix() {
    let source = "
        MOV R0, 2
        STORE R0, 5
        ADD R0, 1
        CMP R0, 3
        JZ done
        NOP
    done:
        PUSH R0
        POP R1
        GWAIT
        HLT
    ";
    let mut ctx = TestContext::new().load(source);
    let _ = ctx.run_to_halt();
    let stats = &ctx.cpu().stats;

    assert_eq!(stats.instructions_retired, 9);
    assert_eq!(stats.inst_memory, 2);
    assert_eq!(stats.inst_alu, 2);
    assert_eq!(stats.inst_control, 1);
    assert_eq!(stats.inst_stack, 2);
    assert_eq!(stats.inst_bridge, 1);
    assert_eq!(stats.inst_system, 1);
    assert_eq!(stats.branches_taken, 1);
    assert_eq!(stats.micro_ops, 0);
}

#[test]
fn test_micro_ops_counted() {
    let mut ctx = TestContext::new().load("MOV R0, 1\nHLT");
    let _ = ctx.sim.run_micro();
    assert_eq!(ctx.cpu().stats.instructions_retired, 2);
    assert_eq!(ctx.cpu().stats.micro_ops, 8);
}

#[test]
fn test_faulted_instruction_not_retired() {
    let mut ctx = TestContext::new().load("MOV R1, 0\nDIV R0, R1");
    let _ = ctx.run();
    assert_eq!(ctx.cpu().stats.instructions_retired, 1);
    assert_eq!(ctx.cpu().stats.faults, 1);
}

#[test]
fn test_compute_counters() {
    let mut ctx = TestContext::new().load("GLOAD 0, 0, 10\nGEXEC SUM, 0, 0, 10\nGWAIT\nHLT");
    let _ = ctx.run_to_halt();
    let gpu = &ctx.gpu().stats;
    assert_eq!(gpu.words_transferred, 10);
    assert_eq!(gpu.batches, 2);
    assert_eq!(gpu.phases, 8);
    assert_eq!(gpu.operations, 1);
}

#[test]
fn test_stats_are_pure_counters() {
    let mut ctx = TestContext::new().load("MOV R0, 1\nJMP end\nend: HLT");
    let _ = ctx.run_to_halt();
    let json = serde_json::to_value(&ctx.cpu().stats).unwrap_or_else(|e| panic!("{e}"));
    let keys: Vec<&str> = json
        .as_object()
        .map(|o| o.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert!(keys.iter().all(|k| !k.contains("second") && !k.contains("time")));
    assert_eq!(json["instructions_retired"], 3);

    ctx.sim.reset();
    assert_eq!(ctx.cpu().stats, SimStats::default());
}

#[test]
fn test_section_names() {
    assert_eq!(STATS_SECTIONS, &["summary", "instruction_mix", "control"]);
}
