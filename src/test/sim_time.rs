use crate::sim::SimTime;

#[test]
fn sim_time_unit_constructors_saturate() {
    assert_eq!(SimTime::from_micros(3), SimTime(3_000));
    assert_eq!(SimTime::from_millis(2), SimTime(2_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime(u64::MAX));
}

#[test]
fn sim_time_arithmetic_saturates() {
    assert_eq!(SimTime(u64::MAX).saturating_add(SimTime(1)), SimTime(u64::MAX));
    assert_eq!(SimTime(5).saturating_sub(SimTime(7)), SimTime::ZERO);
    assert_eq!(SimTime::from_millis(1500).to_string(), "1.500000s");
}
