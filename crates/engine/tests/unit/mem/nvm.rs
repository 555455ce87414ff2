//! NVM Sink Unit Tests.
//!
//! Verifies the timing model (reads ack after tRCD + tCL, writes after tWR),
//! bank serialization of back-to-back accesses, stored contents, and the
//! protocol check on unaligned addresses.

use thoth_core::common::data::WriteRecord;
use thoth_core::config::NvmConfig;
use thoth_core::mem::nvm::{NvmModel, NvmSink};

fn test_config() -> NvmConfig {
    NvmConfig {
        t_rcd: 40,
        t_cl: 10,
        t_wr: 100,
    }
}

#[test]
fn write_completes_after_t_wr() {
    let mut nvm = NvmModel::new(&test_config());
    assert_eq!(nvm.ready_at(), 0);

    let done = nvm.write(WriteRecord::new(0x8, 0xAA), 0);
    assert_eq!(done, 100);
    assert_eq!(nvm.ready_at(), 100);
}

#[test]
fn read_completes_after_t_rcd_plus_t_cl() {
    let mut nvm = NvmModel::new(&test_config());
    let (_, done) = nvm.read(0x8, 0);
    assert_eq!(done, 50);
}

#[test]
fn back_to_back_accesses_serialize() {
    let mut nvm = NvmModel::new(&test_config());

    nvm.write(WriteRecord::new(0x0, 1), 0); // busy until 100
    let done = nvm.write(WriteRecord::new(0x8, 2), 10); // queues behind
    assert_eq!(done, 200, "second write starts when the first completes");

    // An access issued after the sink went idle starts immediately.
    let done = nvm.write(WriteRecord::new(0x10, 3), 500);
    assert_eq!(done, 600);
}

#[test]
fn contents_round_trip() {
    let mut nvm = NvmModel::new(&test_config());
    nvm.write(WriteRecord::new(0x40, 0xDEAD), 0);

    assert_eq!(nvm.read_functional(0x40), 0xDEAD);
    let (value, _) = nvm.read(0x40, 1000);
    assert_eq!(value, 0xDEAD);
}

#[test]
fn unwritten_cells_read_zero() {
    let nvm = NvmModel::new(&test_config());
    assert_eq!(nvm.read_functional(0x12345678), 0);
}

#[test]
fn last_write_to_a_cell_wins() {
    let mut nvm = NvmModel::new(&test_config());
    nvm.write(WriteRecord::new(0x8, 1), 0);
    nvm.write(WriteRecord::new(0x8, 2), 200);
    assert_eq!(nvm.read_functional(0x8), 2);
}

#[test]
#[should_panic(expected = "unaligned")]
fn unaligned_write_is_a_protocol_violation() {
    let mut nvm = NvmModel::new(&test_config());
    nvm.write(WriteRecord::new(0x3, 0), 0);
}

#[test]
#[should_panic(expected = "unaligned")]
fn unaligned_read_is_a_protocol_violation() {
    let mut nvm = NvmModel::new(&test_config());
    nvm.read(0x5, 0);
}
