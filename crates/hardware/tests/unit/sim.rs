//! # Simulator Tests
//!
//! Bounded runs, the facade over the CPU, and loading sources from disk.

use std::io::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tandem_core::common::AsmErrorKind;
use tandem_core::config::Config;
use tandem_core::sim::{LoadError, RunOutcome, Simulator, load_program};

use crate::common::TestContext;

#[test]
fn test_run_to_halt() {
    let mut sim = Simulator::new(&Config::default());
    sim.load_source("MOV R0, 6\nMUL R0, 7\nHLT").unwrap();
    assert_eq!(sim.run(), RunOutcome::Halted { steps: 3 });
    assert_eq!(sim.cpu.registers()[0], 42);
}

#[test]
fn test_step_limit() {
    let config = Config::from_json(r#"{ "general": { "max_steps": 50 } }"#).unwrap();
    let mut ctx = TestContext::with_config(&config).load("loop: INC R0\nJMP loop");
    assert_eq!(ctx.run(), RunOutcome::StepLimit { steps: 50 });
    assert_eq!(ctx.reg(0), 25);
    assert!(!ctx.cpu().is_halted());

    // A later run continues where the previous one stopped.
    assert_eq!(ctx.run().steps(), 50);
    assert_eq!(ctx.reg(0), 50);
}

#[test]
fn test_micro_run_respects_step_limit() {
    let config = Config::from_json(r#"{ "general": { "max_steps": 10 } }"#).unwrap();
    let mut ctx = TestContext::with_config(&config).load("loop: JMP loop");
    assert_eq!(ctx.sim.run_micro(), RunOutcome::StepLimit { steps: 10 });
}

#[test]
fn test_failed_load_keeps_previous_program() {
    let mut ctx = TestContext::new().load("MOV R0, 1\nHLT");
    let diagnostics = ctx.sim.load_source("JMP nowhere").unwrap_err();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(ctx.cpu().program().len(), 2);
    assert_eq!(ctx.run_to_halt(), 2);
}

#[test]
fn test_reset_reruns_program() {
    let mut ctx = TestContext::new().load("INC R0\nHLT");
    let _ = ctx.run_to_halt();
    ctx.sim.reset();
    assert_eq!(ctx.reg(0), 0);
    assert_eq!(ctx.run_to_halt(), 2);
    assert_eq!(ctx.reg(0), 1);
}

#[test]
fn test_outcome_serializes_with_kind_tag() {
    let json = serde_json::to_value(RunOutcome::Halted { steps: 4 }).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "halted", "steps": 4 }));
}

#[test]
fn test_load_program_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "; sum 1..3\nMOV R0, 3\nloop: ADD R1, R0\nDEC R0\nJNZ loop\nHLT").unwrap();

    let program = load_program(file.path()).unwrap();
    assert_eq!(program.len(), 5);
    assert_eq!(program.label("loop"), Some(1));
    assert_eq!(program.source_line(0), Some(2));

    let mut sim = Simulator::new(&Config::default());
    sim.load_program(program);
    assert_eq!(sim.run(), RunOutcome::Halted { steps: 11 });
    assert_eq!(sim.cpu.registers()[1], 6);
}

#[test]
fn test_load_program_reports_every_diagnostic() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "FROB\nMOV R9, 1").unwrap();

    let err = load_program(file.path()).unwrap_err();
    let kinds: Vec<&AsmErrorKind> = err.diagnostics().iter().map(|d| &d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &AsmErrorKind::UnknownInstruction("FROB".into()),
            &AsmErrorKind::InvalidRegister("R9".into()),
        ]
    );
}

#[test]
fn test_load_program_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_program(dir.path().join("missing.asm")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
    assert!(err.diagnostics().is_empty());
}

#[rstest]
#[case::dot("dot.asm", 0, 20)]
#[case::loop_sum("loop.asm", 1, 55)]
#[case::scale_max("scale.asm", 7, 33)]
fn test_bundled_programs(#[case] name: &str, #[case] reg: usize, #[case] expected: u16) {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../programs")
        .join(name);
    let program = load_program(&path).unwrap();

    let mut sim = Simulator::new(&Config::default());
    sim.load_program(program);
    assert!(matches!(sim.run(), RunOutcome::Halted { .. }));
    assert_eq!(sim.cpu.registers()[reg], expected);
}
