//! Property tests: arbitrary toggle sequences never leak or duplicate sessions.

use std::time::Duration;

use proptest::prelude::*;
use tranquil_core::ManualClock;
use tranquil_soundscape::{
    OfflineEnvironment, SessionState, SoundscapeManager, SoundscapeSpec, UnlockScript,
};

const SHORELINE_NODES: usize = 11;

#[derive(Debug, Clone)]
enum Op {
    Enable(bool),
    Poll,
    Wait(u64),
    Shutdown,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<bool>().prop_map(Op::Enable),
        4 => Just(Op::Poll),
        3 => (0u64..15_000).prop_map(Op::Wait),
        1 => Just(Op::Shutdown),
    ]
}

fn script() -> impl Strategy<Value = UnlockScript> {
    prop_oneof![
        Just(UnlockScript::Immediate),
        (1u32..4).prop_map(UnlockScript::AfterPolls),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// At most one graph is ever alive, and Absent means nothing is left over.
    #[test]
    fn toggles_never_leak(script in script(), ops in prop::collection::vec(op(), 1..60)) {
        let clock = ManualClock::new();
        let env = OfflineEnvironment::new(4000.0).with_script(script);
        let mut m = SoundscapeManager::new(env, clock.clone(), SoundscapeSpec::shoreline());

        for op in ops {
            match op {
                Op::Enable(on) => m.set_enabled(on),
                Op::Poll => {
                    m.poll();
                }
                Op::Wait(ms) => {
                    clock.advance(Duration::from_millis(ms));
                    m.poll();
                }
                Op::Shutdown => m.shutdown(),
            }

            let live = m.live_nodes();
            prop_assert!(live == 0 || live == SHORELINE_NODES, "live nodes {}", live);
            prop_assert_eq!(live > 0, m.state().is_live());
            prop_assert_eq!(m.environment().is_connected(), m.state().is_live());
            prop_assert_eq!(m.environment().holds_output(), m.state().is_live());
            if m.state() == SessionState::Absent {
                prop_assert_eq!(m.pending_timers(), 0);
                prop_assert!(m.session_id().is_none());
            }
        }

        // Switching off always converges to Absent
        m.set_enabled(false);
        for _ in 0..8 {
            clock.advance(Duration::from_secs(5));
            m.poll();
        }
        prop_assert_eq!(m.state(), SessionState::Absent);
        prop_assert_eq!(m.live_nodes(), 0);
    }

    /// Leaving the switch on always ends Active with one graph.
    #[test]
    fn ending_enabled_converges_to_active(ops in prop::collection::vec(any::<bool>(), 1..20)) {
        let clock = ManualClock::new();
        let mut m = SoundscapeManager::new(
            OfflineEnvironment::new(4000.0),
            clock.clone(),
            SoundscapeSpec::shoreline(),
        );

        for on in ops {
            m.set_enabled(on);
            clock.advance(Duration::from_millis(700));
            m.poll();
        }
        m.set_enabled(true);
        for _ in 0..10 {
            clock.advance(Duration::from_secs(5));
            m.poll();
        }
        prop_assert_eq!(m.state(), SessionState::Active);
        prop_assert_eq!(m.live_nodes(), SHORELINE_NODES);
    }
}
