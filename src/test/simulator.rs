use crate::sim::{Event, SimTime, Simulator, World};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld {
    ticks: usize,
}

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks = self.ticks.saturating_add(1);
    }
}

type Log = Arc<Mutex<Vec<(u32, SimTime)>>>;

struct Record {
    id: u32,
    log: Log,
}

impl Event for Record {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let Record { id, log } = *self;
        log.lock().expect("log lock").push((id, sim.now()));
    }
}

/// 记录自己，并在 `delay` 之后再调度一个 `next`
struct RecordThenChain {
    id: u32,
    next: u32,
    delay: SimTime,
    log: Log,
}

impl Event for RecordThenChain {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let RecordThenChain { id, next, delay, log } = *self;
        log.lock().expect("log lock").push((id, sim.now()));
        sim.schedule_in(delay, Record { id: next, log });
    }
}

fn ids(log: &Log) -> Vec<u32> {
    log.lock().expect("log lock").iter().map(|(id, _)| *id).collect()
}

#[test]
fn same_timestamp_events_run_in_insertion_order() {
    let log = Log::default();
    let mut sim = Simulator::default();
    for id in [3, 1, 2] {
        sim.schedule(SimTime(10), Record { id, log: Arc::clone(&log) });
    }
    sim.schedule(SimTime(5), Record { id: 9, log: Arc::clone(&log) });

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(ids(&log), vec![9, 3, 1, 2]);
    assert_eq!(world.ticks, 4);
    assert_eq!(sim.executed(), 4);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn zero_delay_follow_up_runs_after_current_timestamp_peers() {
    let log = Log::default();
    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        RecordThenChain {
            id: 1,
            next: 3,
            delay: SimTime::ZERO,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(SimTime::ZERO, Record { id: 2, log: Arc::clone(&log) });

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(ids(&log), vec![1, 2, 3]);
    assert_eq!(sim.now(), SimTime::ZERO);
}

#[test]
fn scheduling_in_the_past_is_clamped_to_now() {
    let log = Log::default();
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();

    sim.run_until(SimTime(100), &mut world);
    sim.schedule(SimTime(10), Record { id: 1, log: Arc::clone(&log) });
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[(1, SimTime(100))]);
}

#[test]
fn run_until_includes_the_boundary_and_keeps_later_events() {
    let log = Log::default();
    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(2),
        RecordThenChain {
            id: 1,
            next: 2,
            delay: SimTime(3),
            log: Arc::clone(&log),
        },
    );
    sim.schedule(SimTime(6), Record { id: 3, log: Arc::clone(&log) });

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(5), &mut world);

    assert_eq!(ids(&log), vec![1, 2]);
    assert_eq!(sim.pending(), 1);
    assert_eq!(sim.now(), SimTime(5));

    sim.run(&mut world);
    assert_eq!(ids(&log), vec![1, 2, 3]);
    assert_eq!(sim.now(), SimTime(6));
}

#[test]
fn run_until_advances_time_without_events() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();

    sim.run_until(SimTime(7), &mut world);
    assert_eq!(sim.now(), SimTime(7));
    assert_eq!(world.ticks, 0);
    assert_eq!(sim.pending(), 0);
}
