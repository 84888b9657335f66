//! Invariants around the five-phase tick: same-tick write/read transfer is
//! atomic and a second simultaneous writer raises `BusConflict`; auto-clear
//! controls reset every tick while sticky controls persist until their
//! `.clear` sub-control has been asserted in an earlier tick.

mod support;

use signal_core::error::TickError;

use support::{computer_with, conflicting_write_set, halt_set, mov_set};

#[test]
fn same_tick_transfer_moves_the_value_and_clears_the_controls() {
    let mut computer = computer_with(mov_set());

    computer.tick().unwrap();

    assert_eq!(computer.register("x"), computer.register("a"));
    assert!(computer.tree().asserted_control_paths().is_empty());
}

#[test]
fn two_writers_in_one_step_raise_bus_conflict() {
    let mut computer = computer_with(conflicting_write_set());

    let result = computer.tick();

    assert!(matches!(result, Err(TickError::BusConflict { .. })));
}

#[test]
fn halt_is_sticky_across_ticks_once_asserted() {
    let mut computer = computer_with(halt_set());

    computer.tick_until_halt_with_budget(4).unwrap();
    assert!(computer.halted());

    computer.tick().unwrap();
    assert!(computer.halted());
    let asserted = computer.tree().asserted_control_paths();
    assert!(
        asserted.contains("computer.halt"),
        "halt must still read true on later ticks since it is not auto-clear: {asserted:?}"
    );
}

#[test]
fn auto_clear_controls_never_survive_into_the_next_tick() {
    let mut computer = computer_with(mov_set());

    computer.tick().unwrap();
    let after_first = computer.tree().asserted_control_paths();
    assert!(
        !after_first.contains("computer.a.write") && !after_first.contains("computer.x.read"),
        "write/read are auto-clear and must not persist after their tick: {after_first:?}"
    );
}
