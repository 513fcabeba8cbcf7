use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_micros(1), SimTime(1_000));
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
}

#[test]
fn sim_time_unit_conversions_saturate_on_overflow() {
    assert_eq!(SimTime::from_micros(u64::MAX), SimTime::MAX);
    assert_eq!(SimTime::from_millis(u64::MAX), SimTime::MAX);
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime::MAX);
}

#[test]
fn sim_time_arithmetic_saturates() {
    assert_eq!(SimTime(5).after(SimTime(7)), SimTime(12));
    assert_eq!(SimTime::MAX.after(SimTime(1)), SimTime::MAX);
    assert_eq!(SimTime(10).since(SimTime(4)), SimTime(6));
    assert_eq!(SimTime(4).since(SimTime(10)), SimTime::ZERO);
}

#[test]
fn sim_time_displays_seconds() {
    assert_eq!(SimTime::from_millis(1_500).to_string(), "1.500000s");
    assert_eq!(SimTime::ZERO.to_string(), "0.000000s");
    assert!((SimTime::from_micros(250).as_secs_f64() - 0.00025).abs() < 1e-12);
}
