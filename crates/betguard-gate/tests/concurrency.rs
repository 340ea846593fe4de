//! Concurrency tests: the shared guards must stay exact under contention.

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use betguard_gate::{ActionGate, ManualClock, NonceRegistry, RateLimiter};
use betguard_types::{ActionRequest, DenialReason, GateConfig, Identity, Nonce};

const T0: u64 = 1_700_000_000_000;
const CENT: u64 = 10_000_000;
const THREADS: usize = 16;

fn bet(identity: &Identity) -> ActionRequest {
    ActionRequest::new(identity.clone(), CENT, Vec::new()).unwrap()
}

#[test]
fn same_identity_gets_exactly_the_limit() {
    let limiter = RateLimiter::new(10, 60_000);
    let a = Identity::dummy(1);
    let allowed = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..10 {
                    if limiter.is_allowed(&a, T0) {
                        allowed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert_eq!(allowed.load(Ordering::Relaxed), 10);
    assert_eq!(limiter.recent_count(&a, T0), 10);
}

#[test]
fn gate_approvals_capped_across_threads() {
    let clock = Arc::new(ManualClock::new(T0));
    let gate = ActionGate::try_new(GateConfig::default(), clock).unwrap();
    let a = Identity::dummy(7);

    let outcomes: Vec<Option<DenialReason>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS * 4)
            .map(|_| s.spawn(|| gate.evaluate(&bet(&a)).denial()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let approved = outcomes.iter().filter(|o| o.is_none()).count();
    assert_eq!(approved, 10);
    assert!(
        outcomes
            .iter()
            .flatten()
            .all(|d| *d == DenialReason::RateLimited)
    );
    assert_eq!(gate.stats().evaluated, (THREADS * 4) as u64);
}

#[test]
fn distinct_identities_do_not_share_a_window() {
    let limiter = RateLimiter::new(10, 60_000);
    let allowed = AtomicUsize::new(0);

    thread::scope(|s| {
        for seed in 0..THREADS {
            let limiter = &limiter;
            let allowed = &allowed;
            s.spawn(move || {
                let who = Identity::dummy(u8::try_from(seed).unwrap());
                for _ in 0..15 {
                    if limiter.is_allowed(&who, T0) {
                        allowed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert_eq!(allowed.load(Ordering::Relaxed), THREADS * 10);
    assert_eq!(limiter.tracked_identities(), THREADS);
}

#[test]
fn racing_replays_accept_once() {
    let registry = NonceRegistry::new(1000);
    let nonce = Nonce::from_raw("contested").unwrap();
    let accepted = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                if registry.validate(&nonce) {
                    accepted.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    assert_eq!(accepted.load(Ordering::Relaxed), 1);
}

#[test]
fn registry_size_never_exceeds_capacity_under_load() {
    let registry = NonceRegistry::new(100);

    thread::scope(|s| {
        for t in 0..THREADS {
            let registry = &registry;
            s.spawn(move || {
                for i in 0..200 {
                    let n = Nonce::from_raw(format!("{t}-{i}")).unwrap();
                    assert!(registry.validate(&n));
                    assert!(registry.len() <= 100);
                }
            });
        }
    });

    assert_eq!(registry.len(), 100);
}

#[test]
fn contexts_share_limiter_and_nonces() {
    let clock = Arc::new(ManualClock::new(T0));
    let root = ActionGate::try_new(GateConfig::default(), clock).unwrap();
    let contexts: Vec<ActionGate> = (0..5).map(|_| root.new_context()).collect();
    let a = Identity::dummy(3);

    let approvals: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = contexts
            .iter()
            .map(|ctx| {
                let a = &a;
                s.spawn(move || {
                    (0..5)
                        .filter_map(|_| ctx.evaluate(&bet(a)).into_result().ok())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    // 25 attempts across 5 contexts, one shared window of 10.
    assert_eq!(approvals.len(), 10);
    let nonces: HashSet<_> = approvals.iter().map(|a| a.nonce.clone()).collect();
    assert_eq!(nonces.len(), 10);
    assert_eq!(root.nonces().len(), 10);
    assert_eq!(root.stats().evaluated, 25);

    // Every context kept its own session.
    let contexts_seen: HashSet<_> = approvals.iter().map(|a| a.context).collect();
    assert!(contexts_seen.iter().all(|c| *c != root.context()));
    assert!(root.sessions().current().is_none());
}

#[test]
fn racing_evaluations_in_one_context_share_the_live_session() {
    let clock = Arc::new(ManualClock::new(T0));
    let gate = ActionGate::try_new(GateConfig::default(), clock).unwrap();
    let a = Identity::dummy(5);

    let approvals: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..10)
            .map(|_| s.spawn(|| gate.evaluate(&bet(&a)).into_result().ok()))
            .collect();
        handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect()
    });

    assert_eq!(approvals.len(), 10);
    let live = gate.sessions().current().unwrap().session_id;
    assert!(approvals.iter().all(|ap| ap.session_id == live));
    assert_eq!(gate.stats().sessions_healed, 1);
}
