//! Unit tests for dtn-schedule.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::{MobilitySchedule, MobilityWindow, Scheduler};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Log = Arc<Mutex<Vec<&'static str>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(log: &Log, label: &'static str) -> impl FnOnce(&Scheduler) + Send + 'static {
    let log = Arc::clone(log);
    move |_| log.lock().unwrap().push(label)
}

fn win(location: &str, begin: f64, end: f64) -> MobilityWindow {
    MobilityWindow::new(location, begin, end)
}

// ── Scheduler: ordering ───────────────────────────────────────────────────────

#[cfg(test)]
mod ordering {
    use super::*;
    use crate::{JOIN_PRIORITY, LEAVE_PRIORITY};

    #[test]
    fn runs_in_fire_time_order() {
        let sched = Scheduler::new();
        let events = log();
        let origin = Instant::now();
        sched.schedule_at(origin + Duration::from_millis(30), 5, push(&events, "c"));
        sched.schedule_at(origin + Duration::from_millis(10), 5, push(&events, "a"));
        sched.schedule_at(origin + Duration::from_millis(20), 5, push(&events, "b"));

        sched.run_blocking();

        assert_eq!(*events.lock().unwrap(), ["a", "b", "c"]);
        assert!(sched.is_empty());
    }

    #[test]
    fn leave_beats_join_at_same_instant() {
        let sched = Scheduler::new();
        let events = log();
        let at = Instant::now() + Duration::from_millis(5);
        sched.schedule_at(at, JOIN_PRIORITY, push(&events, "join"));
        sched.schedule_at(at, LEAVE_PRIORITY, push(&events, "leave"));

        sched.run_blocking();

        assert_eq!(*events.lock().unwrap(), ["leave", "join"]);
    }

    #[test]
    fn full_ties_run_in_insertion_order() {
        let sched = Scheduler::new();
        let events = log();
        let at = Instant::now();
        sched.schedule_at(at, 2, push(&events, "first"));
        sched.schedule_at(at, 2, push(&events, "second"));
        sched.schedule_at(at, 2, push(&events, "third"));

        sched.run_blocking();

        assert_eq!(*events.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn past_instants_run_immediately() {
        let sched = Scheduler::new();
        let events = log();
        let past = Instant::now() - Duration::from_millis(50);
        sched.schedule_at(past, 2, push(&events, "late"));
        let started = Instant::now();
        sched.run_blocking();
        assert!(started.elapsed() < Duration::from_millis(40));
        assert_eq!(*events.lock().unwrap(), ["late"]);
    }

    #[test]
    fn waits_until_due() {
        let sched = Scheduler::new();
        let started = Instant::now();
        sched.schedule_after(Duration::from_millis(30), 2, |_| {});
        sched.run_blocking();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn empty_queue_returns_immediately() {
        let sched = Scheduler::new();
        sched.run_blocking();
        assert_eq!(sched.next_fire_time(), None);
    }

    #[test]
    fn task_can_reschedule_itself() {
        fn tick(sched: &Scheduler, count: Arc<Mutex<u32>>) {
            let mut n = count.lock().unwrap();
            *n += 1;
            if *n < 5 {
                let next = Arc::clone(&count);
                sched.schedule_after(Duration::from_millis(1), 2, move |s| tick(s, next));
            }
        }

        let sched = Scheduler::new();
        let count = Arc::new(Mutex::new(0));
        let first = Arc::clone(&count);
        sched.schedule_after(Duration::ZERO, 2, move |s| tick(s, first));
        sched.run_blocking();
        assert_eq!(*count.lock().unwrap(), 5);
    }

    #[test]
    fn worker_wakes_for_earlier_task() {
        let sched = Scheduler::new();
        let events = log();
        sched.schedule_after(Duration::from_secs(60), 2, push(&events, "far"));
        let worker = sched.spawn_worker("test-worker").unwrap();

        std::thread::sleep(Duration::from_millis(10));
        sched.schedule_after(Duration::from_millis(5), 2, push(&events, "near"));

        let deadline = Instant::now() + Duration::from_secs(2);
        while events.lock().unwrap().is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(*events.lock().unwrap(), ["near"]);

        assert_eq!(sched.drain(), 1);
        worker.join().unwrap();
        assert_eq!(*events.lock().unwrap(), ["near"]);
    }
}

// ── Scheduler: delays ─────────────────────────────────────────────────────────

#[cfg(test)]
mod delays {
    use super::*;
    use crate::ScheduleError;

    #[test]
    fn negative_delay_is_rejected() {
        let sched = Scheduler::new();
        let err = sched.schedule_after_secs(-1.0, 2, |_| {}).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDelay(d) if d == -1.0));
        assert!(sched.is_empty());
    }

    #[test]
    fn delay_past_instant_range_is_rejected() {
        let sched = Scheduler::new();
        let err = sched.schedule_after_secs(1.8e19, 2, |_| {}).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDelay(_)));
        assert!(sched.is_empty());
    }

    #[test]
    fn non_finite_delay_is_rejected() {
        let sched = Scheduler::new();
        assert!(sched.schedule_after_secs(f64::NAN, 2, |_| {}).is_err());
        assert!(sched.schedule_after_secs(f64::INFINITY, 2, |_| {}).is_err());
    }

    #[test]
    fn fractional_seconds_accepted() {
        let sched = Scheduler::new();
        let before = Instant::now();
        let handle = sched.schedule_after_secs(0.25, 2, |_| {}).unwrap();
        assert!(handle.fire_at() >= before + Duration::from_millis(250));
        assert_eq!(handle.priority(), 2);
        assert_eq!(sched.len(), 1);
    }
}

// ── Scheduler: cancellation and drain ─────────────────────────────────────────

#[cfg(test)]
mod cancellation {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn cancel_pending_task() {
        let sched = Scheduler::new();
        let events = log();
        let keep = sched.schedule_after(Duration::from_millis(5), 2, push(&events, "keep"));
        let gone = sched.schedule_after(Duration::from_millis(1), 2, push(&events, "gone"));

        assert!(sched.cancel(&gone));
        sched.run_blocking();

        assert_eq!(*events.lock().unwrap(), ["keep"]);
        assert!(!sched.cancel(&keep), "already ran");
        assert!(!sched.cancel(&gone), "already cancelled");
    }

    #[test]
    fn cancel_racing_dispatch_has_exactly_one_outcome() {
        for _ in 0..200 {
            let sched = Scheduler::new();
            let ran = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&ran);
            let handle = sched.schedule_after(Duration::ZERO, 2, move |_| {
                flag.store(true, Ordering::SeqCst);
            });

            let worker = sched.spawn_worker("race-worker").unwrap();
            let cancelled = sched.cancel(&handle);
            worker.join().unwrap();

            assert_ne!(cancelled, ran.load(Ordering::SeqCst));
        }
    }

    #[test]
    fn drain_waits_for_in_flight_task() {
        let sched = Scheduler::new();
        let started = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));
        sched.schedule_after(Duration::ZERO, 2, move |_| {
            s.store(true, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            f.store(true, Ordering::SeqCst);
        });
        sched.schedule_after(Duration::from_secs(60), 2, |_| {});

        let worker = sched.spawn_worker("drain-worker").unwrap();
        while !started.load(Ordering::SeqCst) {
            thread::yield_now();
        }

        assert_eq!(sched.drain(), 1);
        assert!(finished.load(Ordering::SeqCst), "drain returned mid-task");
        worker.join().unwrap();
    }

    #[test]
    fn drain_clears_work_enqueued_by_in_flight_task() {
        let sched = Scheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let started = Arc::new(AtomicBool::new(false));

        let (r, s) = (Arc::clone(&runs), Arc::clone(&started));
        sched.schedule_after(Duration::ZERO, 2, move |sched| {
            r.fetch_add(1, Ordering::SeqCst);
            s.store(true, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(30));
            let again = Arc::clone(&r);
            sched.schedule_after(Duration::ZERO, 2, move |_| {
                again.fetch_add(1, Ordering::SeqCst);
            });
        });

        let worker = sched.spawn_worker("retry-worker").unwrap();
        while !started.load(Ordering::SeqCst) {
            thread::yield_now();
        }
        sched.drain();
        worker.join().unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(sched.is_empty());
    }

    #[test]
    fn drain_from_inside_task_does_not_deadlock() {
        let sched = Scheduler::new();
        let events = log();
        sched.schedule_after(Duration::from_millis(50), 2, push(&events, "later"));
        sched.schedule_after(Duration::ZERO, 1, |s| {
            s.drain();
        });

        sched.run_blocking();

        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn concurrent_enqueue_and_drain() {
        let sched = Scheduler::new();
        let worker = {
            sched.schedule_after(Duration::from_secs(60), 2, |_| {});
            sched.spawn_worker("stress-worker").unwrap()
        };

        let producers: Vec<_> = (0..4)
            .map(|_| {
                let sched = sched.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        sched.schedule_after(Duration::from_millis(i % 3), 2, |_| {});
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }

        sched.drain();
        worker.join().unwrap();
        assert!(sched.is_empty());
    }
}

// ── MobilityWindow / MobilitySchedule ─────────────────────────────────────────

#[cfg(test)]
mod windows {
    use super::*;
    use crate::ScheduleError;

    #[test]
    fn wrapping_window() {
        let w = win("A", 5.0, 2.0);
        assert!(w.wraps());
        assert!(w.occupied_at_start());
        assert!(w.contains(0.0));
        assert!(w.contains(1.9));
        assert!(!w.contains(2.0));
        assert!(!w.contains(4.0));
        assert!(w.contains(5.0));
        assert!(w.contains(23.9));
        assert!(w.contains(25.0), "hours wrap modulo a day");
    }

    #[test]
    fn window_ending_at_reference_point_is_not_occupied_at_start() {
        let w = win("A", 20.0, 0.0);
        assert!(w.wraps());
        assert!(!w.occupied_at_start());
        assert!(!w.contains(0.0));
    }

    #[test]
    fn new_sorts_by_begin() {
        let schedule = MobilitySchedule::new(vec![
            win("c", 18.0, 20.0),
            win("a", 1.0, 3.0),
            win("b", 8.0, 12.0),
        ])
        .unwrap();
        let order: Vec<&str> = schedule.windows().iter().map(|w| w.location.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn touching_windows_are_allowed() {
        let schedule = MobilitySchedule::new(vec![win("A", 0.0, 10.0), win("B", 10.0, 20.0)]).unwrap();
        assert_eq!(schedule.location_at(9.99), Some("A"));
        assert_eq!(schedule.location_at(10.0), Some("B"));
        assert_eq!(schedule.location_at(21.0), None);
    }

    #[test]
    fn overlap_is_rejected() {
        let err = MobilitySchedule::new(vec![win("A", 0.0, 10.0), win("B", 9.0, 12.0)]).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidSchedule(_)));
    }

    #[test]
    fn overlap_through_wrap_is_rejected() {
        assert!(MobilitySchedule::new(vec![win("A", 22.0, 3.0), win("B", 1.0, 2.0)]).is_err());
        assert!(MobilitySchedule::new(vec![win("A", 22.0, 3.0), win("B", 23.0, 23.5)]).is_err());
        assert!(MobilitySchedule::new(vec![win("A", 22.0, 3.0), win("B", 3.0, 22.0)]).is_ok());
    }

    #[test]
    fn malformed_windows_are_rejected() {
        assert!(MobilitySchedule::new(vec![]).is_err());
        assert!(MobilitySchedule::new(vec![win("", 1.0, 2.0)]).is_err());
        assert!(MobilitySchedule::new(vec![win("A", 3.0, 3.0)]).is_err());
        assert!(MobilitySchedule::new(vec![win("A", -1.0, 3.0)]).is_err());
        assert!(MobilitySchedule::new(vec![win("A", 1.0, 24.0)]).is_err());
        assert!(MobilitySchedule::new(vec![win("A", f64::NAN, 3.0)]).is_err());
    }

    #[test]
    fn initial_location_comes_from_wrapping_window() {
        let schedule = MobilitySchedule::new(vec![win("day", 8.0, 17.0), win("night", 20.0, 6.0)]).unwrap();
        assert_eq!(schedule.initial_location(), Some("night"));

        let plain = MobilitySchedule::new(vec![win("day", 8.0, 17.0)]).unwrap();
        assert_eq!(plain.initial_location(), None);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use crate::{
        ScheduleError, load_schedule, load_schedule_csv, load_schedule_reader, load_schedule_yaml,
        load_schedule_yaml_reader,
    };

    const CSV: &str = "\
location,begin,end\n\
library, 8, 12\n\
cafeteria,12,13.5\n\
dorm,18,7\n\
";

    const YAML: &str = "\
- location: library
  begin: 8
  end: 12
- location: cafeteria
  begin: 12
  end: 13.5
- location: dorm
  begin: 18
  end: 7
";

    #[test]
    fn parses_rows() {
        let schedule = load_schedule_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(schedule.len(), 3);
        let w = &schedule.windows()[1];
        assert_eq!(w.location, "cafeteria");
        assert_eq!(w.begin, 12.0);
        assert_eq!(w.end, 13.5);
        assert_eq!(schedule.initial_location(), Some("dorm"));
    }

    #[test]
    fn bad_number_is_invalid_schedule() {
        let csv = "location,begin,end\nlibrary,eight,12\n";
        let err = load_schedule_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidSchedule(_)));
    }

    #[test]
    fn missing_column_is_invalid_schedule() {
        let csv = "location,begin\nlibrary,8\n";
        assert!(load_schedule_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn header_only_is_invalid_schedule() {
        let csv = "location,begin,end\n";
        assert!(matches!(
            load_schedule_reader(Cursor::new(csv)),
            Err(ScheduleError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_schedule_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ScheduleError::Unreadable { .. }));
        assert!(err.to_string().starts_with("invalid schedule"));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("7.csv");
        std::fs::File::create(&path).unwrap().write_all(CSV.as_bytes()).unwrap();
        assert_eq!(load_schedule_csv(&path).unwrap().len(), 3);
    }

    #[test]
    fn parses_yaml_sequence() {
        let schedule = load_schedule_yaml_reader(Cursor::new(YAML)).unwrap();
        assert_eq!(schedule, load_schedule_reader(Cursor::new(CSV)).unwrap());
        assert_eq!(schedule.initial_location(), Some("dorm"));
    }

    #[test]
    fn yaml_with_wrong_shape_is_invalid_schedule() {
        for yaml in ["location: library\nbegin: 8\nend: 12\n", "- location: library\n  begin: 8\n", "[]"] {
            assert!(
                matches!(load_schedule_yaml_reader(Cursor::new(yaml)), Err(ScheduleError::InvalidSchedule(_))),
                "{yaml:?}"
            );
        }
    }

    #[test]
    fn overlapping_yaml_windows_are_rejected() {
        let yaml = "- {location: a, begin: 8, end: 12}\n- {location: b, begin: 11, end: 14}\n";
        assert!(matches!(
            load_schedule_yaml_reader(Cursor::new(yaml)),
            Err(ScheduleError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn format_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [("a.yaml", YAML), ("b.YML", YAML), ("c.csv", CSV), ("d", CSV)] {
            let path = dir.path().join(name);
            std::fs::File::create(&path).unwrap().write_all(body.as_bytes()).unwrap();
            assert_eq!(load_schedule(&path).unwrap().len(), 3, "{name}");
        }
        assert_eq!(load_schedule_yaml(&dir.path().join("a.yaml")).unwrap().len(), 3);
    }

    #[test]
    fn missing_yaml_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_schedule(&dir.path().join("pi3.yaml")).unwrap_err();
        assert!(matches!(err, ScheduleError::Unreadable { .. }));
    }
}
