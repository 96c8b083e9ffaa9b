//! End-to-end focus session flow: timer ticks, reward accumulation and
//! persistence through the database, across simulated restarts.

use tasko_core::{Database, FocusTimer, RewardLedger, TimerPhase};

fn open_db(dir: &tempfile::TempDir) -> Database {
    Database::open_at(&dir.path().join("tasko.db")).unwrap()
}

#[test]
fn focus_session_survives_restart_mid_run() {
    let dir = tempfile::tempdir().unwrap();

    // First "process": run a third of a 3-minute session, persist each tick.
    {
        let db = open_db(&dir);
        let mut timer = FocusTimer::with_duration(180);
        let mut ledger = db.load_reward_ledger();
        timer.start();
        for _ in 0..60 {
            timer.tick(&mut ledger);
            db.save_focus_timer(&timer).unwrap();
        }
        db.save_reward_ledger(&ledger).unwrap();
    }

    // Second "process": reload and finish the countdown.
    {
        let db = open_db(&dir);
        let mut timer = db.load_focus_timer();
        let mut ledger = db.load_reward_ledger();
        assert_eq!(timer.remaining_secs(), 120);
        assert!(timer.is_running());

        let mut completed = false;
        for _ in 0..120 {
            if timer.tick(&mut ledger).is_some() {
                completed = true;
            }
        }
        assert!(completed);
        db.save_focus_timer(&timer).unwrap();
        db.save_reward_ledger(&ledger).unwrap();
    }

    // Third "process": observe the settled state.
    let db = open_db(&dir);
    let timer = db.load_focus_timer();
    let ledger = db.load_reward_ledger();
    assert_eq!(timer.phase(), TimerPhase::Expired);
    assert!(!timer.is_running());
    assert_eq!(ledger.total_focus_minutes(), 3);
}

#[test]
fn repeated_sessions_climb_the_reward_ladder() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);

    // Six 10-minute sessions: 10 -> dust, 30 -> nebula, 60 -> planet.
    for session in 1..=6u64 {
        let mut timer = db.load_focus_timer();
        let mut ledger = db.load_reward_ledger();
        timer.set_duration(600);
        timer.start();
        for _ in 0..600 {
            timer.tick(&mut ledger);
        }
        db.save_focus_timer(&timer).unwrap();
        db.save_reward_ledger(&ledger).unwrap();

        let ledger = db.load_reward_ledger();
        assert_eq!(ledger.total_focus_minutes(), session * 10);
    }

    let ledger = db.load_reward_ledger();
    assert!(ledger.is_unlocked("dust"));
    assert!(ledger.is_unlocked("nebula"));
    assert!(ledger.is_unlocked("planet"));
    assert!(!ledger.is_unlocked("rings"));
    assert!(!ledger.is_unlocked("galaxy"));
    assert_eq!(ledger.unlocked_count(), 3);
}

#[test]
fn manual_unlock_persists_alongside_accumulation() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = open_db(&dir);
        let mut ledger = db.load_reward_ledger();
        ledger.unlock_manually("galaxy");
        ledger.accumulate(15);
        db.save_reward_ledger(&ledger).unwrap();
    }

    let db = open_db(&dir);
    let snapshot = db.load_reward_ledger().snapshot();
    assert_eq!(snapshot.total_focus_minutes, 15);
    let unlocked: Vec<&str> = snapshot
        .rewards
        .iter()
        .filter(|r| r.unlocked)
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(unlocked, ["dust", "galaxy"]);
}
