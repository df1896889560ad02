//! # Micro-Stepping Tests
//!
//! Micro-operations are descriptive; the instruction commits exactly once, in the
//! call that replays its writeback.

use pretty_assertions::assert_eq;
use tandem_core::core::cpu::{CpuEvent, Progress};
use tandem_core::core::pipeline::Stage;

use crate::common::TestContext;

fn micro_stages(ctx: &TestContext) -> Vec<Stage> {
    ctx.cpu_events()
        .iter()
        .filter_map(|e| match e {
            CpuEvent::Micro { micro, .. } => Some(micro.stage),
            _ => None,
        })
        .collect()
}

#[test]
fn test_mov_micro_sequence() {
    let mut ctx = TestContext::new().load("MOV R0, 5\nHLT").recording();

    assert_eq!(ctx.micro(), Progress::Advanced(Stage::Fetch));
    assert_eq!(ctx.cpu().stage(), Some(Stage::Fetch));
    assert_eq!(ctx.micro(), Progress::Advanced(Stage::Decode));
    assert_eq!(ctx.micro(), Progress::Advanced(Stage::Execute));
    assert_eq!(ctx.reg(0), 0, "state must not change before writeback");
    assert_eq!(ctx.cpu().pc(), 0);

    assert_eq!(ctx.micro(), Progress::Committed);
    assert_eq!(ctx.reg(0), 5);
    assert_eq!(ctx.cpu().pc(), 1);
    assert_eq!(ctx.cpu().stage(), None);

    assert_eq!(
        micro_stages(&ctx),
        vec![Stage::Fetch, Stage::Decode, Stage::Execute, Stage::Writeback]
    );
    assert_eq!(
        ctx.cpu_event_kinds(),
        vec!["micro", "micro", "micro", "micro", "step"]
    );
}

#[test]
fn test_every_instruction_commits_once() {
    let source = "
        MOV R0, 3
    loop:
        PUSH R0
        POP R1
        SUB R0, 1
        JNZ loop
        CALL sub
        HLT
    sub:
        STORE R1, 20
        LOAD R2, 20
        RET
    ";
    let mut ctx = TestContext::new().load(source).recording();
    let _ = ctx.sim.run_micro();

    let events = ctx.cpu_events();
    let steps = events.iter().filter(|e| e.kind() == "step").count() as u64;
    assert_eq!(steps, ctx.cpu().stats.instructions_retired);

    // Each commit is preceded by fetch and decode and closed by one writeback.
    let mut stages = Vec::new();
    for event in &events {
        match event {
            CpuEvent::Micro { micro, .. } => stages.push(micro.stage),
            CpuEvent::Step { .. } => {
                assert_eq!(stages.first(), Some(&Stage::Fetch));
                assert_eq!(stages.get(1), Some(&Stage::Decode));
                assert_eq!(stages.last(), Some(&Stage::Writeback));
                assert_eq!(
                    stages.iter().filter(|s| **s == Stage::Writeback).count(),
                    1
                );
                assert!(stages[2..stages.len() - 1].iter().all(|s| *s == Stage::Execute));
                stages.clear();
            }
            _ => {}
        }
    }
    assert!(ctx.cpu().stats.micro_ops >= 4 * steps);
}

#[test]
fn test_micro_and_step_reach_same_state() {
    let source = "
        MOV R0, 6
        MOV R1, 0
    again:
        ADD R1, R0
        PUSH R1
        DEC R0
        JG again
        POP R5
        SHL R5, 2
        HLT
    ";
    let mut whole = TestContext::new().load(source);
    let mut micro = TestContext::new().load(source);
    let _ = whole.run_to_halt();
    let _ = micro.sim.run_micro();

    assert_eq!(whole.cpu().snapshot(), micro.cpu().snapshot());
    assert_eq!(
        whole.cpu().stats.instructions_retired,
        micro.cpu().stats.instructions_retired
    );
}

#[test]
fn test_step_commits_instruction_in_flight() {
    let mut ctx = TestContext::new().load("MOV R0, 5\nMOV R1, 6\nHLT").recording();
    assert_eq!(ctx.micro(), Progress::Advanced(Stage::Fetch));
    assert_eq!(ctx.micro(), Progress::Advanced(Stage::Decode));

    assert_eq!(ctx.step(), Progress::Committed);
    assert_eq!(ctx.reg(0), 5);
    assert_eq!(ctx.reg(1), 0);
    assert_eq!(ctx.cpu().pc(), 1);
    assert_eq!(ctx.cpu_event_kinds(), vec!["micro", "micro", "step"]);
}

#[test]
fn test_step_after_fetch_only() {
    let mut ctx = TestContext::new().load("MOV R0, 5\nHLT");
    assert_eq!(ctx.micro(), Progress::Advanced(Stage::Fetch));
    assert_eq!(ctx.step(), Progress::Committed);
    assert_eq!(ctx.reg(0), 5);
}

#[test]
fn test_halt_commits_on_writeback() {
    let mut ctx = TestContext::new().load("HLT").recording();
    let mut progress = Vec::new();
    loop {
        let p = ctx.micro();
        progress.push(p);
        if p == Progress::Halted {
            break;
        }
    }
    assert_eq!(
        progress,
        vec![
            Progress::Advanced(Stage::Fetch),
            Progress::Advanced(Stage::Decode),
            Progress::Advanced(Stage::Execute),
            Progress::Halted,
        ]
    );
    assert_eq!(
        ctx.cpu_event_kinds(),
        vec!["micro", "micro", "micro", "micro", "step", "halt"]
    );
}

#[test]
fn test_fetch_describes_instruction() {
    let mut ctx = TestContext::new().load("NOP\nINC R3").recording();
    let _ = ctx.step();
    ctx.clear_events();
    let _ = ctx.micro();

    let events = ctx.cpu_events();
    let CpuEvent::Micro { micro, state } = &events[0] else {
        panic!("expected a micro event, got {:?}", events[0]);
    };
    assert_eq!(micro.description, "Fetch instruction 1: INC R3");
    assert_eq!(micro.value, Some(1));
    assert_eq!(state.stage, Some(Stage::Fetch));
}

#[test]
fn test_alu_writeback_carries_result() {
    let mut ctx = TestContext::new().load("MOV R0, 0xFFFF\nADD R0, 2").recording();
    let _ = ctx.step();
    ctx.clear_events();
    let _ = ctx.sim.run_micro();

    let writeback = ctx
        .cpu_events()
        .into_iter()
        .find_map(|e| match e {
            CpuEvent::Micro { micro, .. } if micro.stage == Stage::Writeback => Some(micro),
            _ => None,
        })
        .unwrap();
    assert_eq!(writeback.destination.as_deref(), Some("R0"));
    assert_eq!(writeback.value, Some(1));
    assert_eq!(ctx.reg(0), 1);
}
