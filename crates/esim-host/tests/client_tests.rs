//! End-to-end tests: the real transaction client driving the in-process
//! module simulator byte-for-byte over the transport seam.

use std::time::{Duration, Instant};

use esim_host::{Client, ModuleSim, TransactionError};
use esim_protocol::{Param, ParamValue, SystemState};

const TIMEOUT: Duration = Duration::from_millis(100);

fn fresh_client() -> Client<ModuleSim> {
    Client::new(ModuleSim::new(), TIMEOUT)
}

// ============================================================================
// Status
// ============================================================================

#[test]
fn test_status_of_fresh_module() {
    let mut client = fresh_client();

    let report = client.get_status().expect("status round trip");
    assert!(matches!(report.state, SystemState::Init | SystemState::Run));
    assert_eq!(report.error_flags, 0);
    assert_eq!(report.rx_errors, 0);
    assert_eq!(report.tx_errors, 0);
    assert_eq!(report.sensor_fault, 0);
}

#[test]
fn test_status_round_trip_latency() {
    let mut client = fresh_client();

    let start = Instant::now();
    client.get_status().expect("status round trip");
    let elapsed = start.elapsed();

    // The device target is 20 ms; in-process there is no wire, so even a
    // generous bound catches accidental blocking in the read loop.
    assert!(elapsed < Duration::from_millis(100), "took {:?}", elapsed);
}

// ============================================================================
// Parameter defaults and round trips
// ============================================================================

#[test]
fn test_default_parameter_values() {
    let mut client = fresh_client();

    assert_eq!(
        client.get_param(Param::SensorSampleRate).unwrap(),
        ParamValue::SensorSampleRate(100)
    );
    assert_eq!(
        client.get_param(Param::StatusPeriodMs).unwrap(),
        ParamValue::StatusPeriodMs(1000)
    );
    assert_eq!(
        client.get_param(Param::SensorEnable).unwrap(),
        ParamValue::SensorEnable(true)
    );
}

#[test]
fn test_set_then_get_parameters() {
    let mut client = fresh_client();

    client
        .set_param(ParamValue::SensorSampleRate(500))
        .expect("set sample rate 500");
    assert_eq!(
        client.get_param(Param::SensorSampleRate).unwrap(),
        ParamValue::SensorSampleRate(500)
    );

    client
        .set_param(ParamValue::StatusPeriodMs(4000))
        .expect("set period 4000");
    assert_eq!(
        client.get_param(Param::StatusPeriodMs).unwrap(),
        ParamValue::StatusPeriodMs(4000)
    );

    client
        .set_param(ParamValue::SensorEnable(false))
        .expect("disable sensor");
    assert_eq!(
        client.get_param(Param::SensorEnable).unwrap(),
        ParamValue::SensorEnable(false)
    );
}

// ============================================================================
// Range enforcement
// ============================================================================

#[test]
fn test_out_of_range_sets_are_rejected_and_leave_value_unchanged() {
    let mut client = fresh_client();

    client
        .set_param(ParamValue::SensorSampleRate(500))
        .expect("set sample rate 500");

    // Above the 1..=1000 range.
    assert!(matches!(
        client.set_param(ParamValue::SensorSampleRate(2000)),
        Err(TransactionError::Rejected { .. })
    ));
    assert_eq!(
        client.get_param(Param::SensorSampleRate).unwrap(),
        ParamValue::SensorSampleRate(500)
    );

    // Below the 100..=5000 range.
    assert!(matches!(
        client.set_param(ParamValue::StatusPeriodMs(50)),
        Err(TransactionError::Rejected { .. })
    ));
    assert_eq!(
        client.get_param(Param::StatusPeriodMs).unwrap(),
        ParamValue::StatusPeriodMs(1000)
    );
}

#[test]
fn test_sample_rate_range_boundaries() {
    let mut client = fresh_client();

    client
        .set_param(ParamValue::SensorSampleRate(1))
        .expect("minimum rate accepted");
    client
        .set_param(ParamValue::SensorSampleRate(1000))
        .expect("maximum rate accepted");
    assert!(client.set_param(ParamValue::SensorSampleRate(0)).is_err());
    assert!(client.set_param(ParamValue::SensorSampleRate(1001)).is_err());
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_reset_restores_defaults() {
    let mut client = fresh_client();

    client
        .set_param(ParamValue::SensorSampleRate(750))
        .expect("set sample rate 750");
    client.reset_module().expect("reset is fire-and-forget");

    assert_eq!(
        client.get_param(Param::SensorSampleRate).unwrap(),
        ParamValue::SensorSampleRate(100)
    );
}

// ============================================================================
// Link corruption
// ============================================================================

#[test]
fn test_module_counts_corrupted_requests() {
    use esim_host::Transport;

    let mut sim = ModuleSim::new();

    // A request frame with its last CRC byte flipped never gets answered,
    // but the module records the receive error.
    let mut bad = esim_protocol::encode_frame(esim_protocol::MSG_GET_STATUS, &[]);
    let last = bad.len() - 1;
    bad[last] ^= 0x01;
    sim.write_all(&bad).unwrap();
    assert_eq!(sim.rx_errors(), 1);

    let mut client = Client::new(sim, TIMEOUT);
    let report = client.get_status().expect("clean request still works");
    assert_eq!(report.rx_errors, 1);
}
